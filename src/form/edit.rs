use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::form::{FormNode, FormResult, Path, add, remove, update};

/// One editor action, as sent by the client.
///
/// ```json
/// { "op": "update", "path": ["key_phrases", 0, "examples"], "index": 1, "patch": "Hi there" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FormEdit {
    Add { path: Path },
    Update { path: Path, index: usize, patch: Value },
    Remove { path: Path, index: usize },
}

impl FormEdit {
    pub fn path(&self) -> &Path {
        match self {
            Self::Add { path } | Self::Update { path, .. } | Self::Remove { path, .. } => path,
        }
    }

    pub fn apply<N: FormNode + Clone>(self, form: &N) -> FormResult<N> {
        match self {
            Self::Add { path } => add(form, &path),
            Self::Update { path, index, patch } => update(form, &path, index, patch),
            Self::Remove { path, index } => remove(form, &path, index),
        }
    }
}
