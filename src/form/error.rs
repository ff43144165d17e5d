use thiserror::Error;

use crate::form::Path;

pub type FormResult<T> = std::result::Result<T, FormError>;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("path is empty")]
    EmptyPath,
    #[error("invalid path segment `{0}`")]
    InvalidSegment(String),
    #[error("no editable list at `{0}`")]
    UnknownPath(Path),
    #[error("index {index} is out of bounds for `{path}` (len {len})")]
    IndexOutOfBounds { path: Path, index: usize, len: usize },
    #[error("`{path}` has no field `{field}`")]
    UnknownField { path: Path, field: String },
    #[error("invalid patch for `{path}`: {error}")]
    InvalidPatch {
        path: Path,
        error: serde_json::Error,
    },
}
