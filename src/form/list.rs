use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::form::{FormError, FormResult, Path, Segment};

/// Row of an editable list. `Default` is the blank row appended by [`add`].
pub trait Row: Clone + Serialize + DeserializeOwned + Default {}

impl<T> Row for T where T: Clone + Serialize + DeserializeOwned + Default {}

/// Type-erased view over a `Vec<R: Row>`, reached through [`FormNode::list_at`].
pub trait EditableList {
    fn len(&self) -> usize;

    fn push_blank(&mut self);

    fn remove_row(&mut self, path: &Path, index: usize) -> FormResult<()>;

    /// Shallow merge of `patch` into the row at `index`.
    ///
    /// Record rows take a JSON object naming some of their fields, string
    /// rows take a JSON string.
    fn merge_row(&mut self, path: &Path, index: usize, patch: Value) -> FormResult<()>;
}

impl<R: Row> EditableList for Vec<R> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn push_blank(&mut self) {
        self.push(R::default());
    }

    fn remove_row(&mut self, path: &Path, index: usize) -> FormResult<()> {
        check_bounds(path, index, Vec::len(self))?;
        self.remove(index);
        Ok(())
    }

    fn merge_row(&mut self, path: &Path, index: usize, patch: Value) -> FormResult<()> {
        check_bounds(path, index, Vec::len(self))?;
        let invalid = |error| FormError::InvalidPatch {
            path: path.clone(),
            error,
        };

        let current = serde_json::to_value(&self[index]).map_err(invalid)?;
        let merged = match (current, &patch) {
            (Value::Object(mut fields), Value::Object(changes)) => {
                for (key, value) in changes {
                    fields.insert(key.clone(), value.clone());
                }
                Value::Object(fields)
            }
            (_, patch) => patch.clone(),
        };

        let row: R = serde_json::from_value(merged).map_err(invalid)?;

        // serde drops keys it does not know, so a patch key missing from the
        // re-serialized row names a field the row does not have.
        if let Value::Object(changes) = &patch {
            let written = serde_json::to_value(&row).map_err(invalid)?;
            for (key, value) in changes {
                let known = written.get(key).is_some();
                if !known && !value.is_null() {
                    return Err(FormError::UnknownField {
                        path: path.clone(),
                        field: key.clone(),
                    });
                }
            }
        }

        self[index] = row;
        Ok(())
    }
}

fn check_bounds(path: &Path, index: usize, len: usize) -> FormResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(FormError::IndexOutOfBounds {
            path: path.clone(),
            index,
            len,
        })
    }
}

/// A form record that owns editable lists.
pub trait FormNode {
    /// Resolves `path` (relative to `self`) to one of its lists.
    fn list_at(&mut self, path: &[Segment]) -> Option<&mut dyn EditableList>;

    /// Gives every empty list one blank row, recursively.
    fn ensure_rows(&mut self);
}

pub(crate) fn editable<R: Row>(rows: &mut Vec<R>) -> Option<&mut dyn EditableList> {
    Some(rows)
}

/// Resolves `[index, ..rest]` inside a list of nested records.
pub(crate) fn nested<'a, N: FormNode>(
    rows: &'a mut [N],
    rest: &[Segment],
) -> Option<&'a mut dyn EditableList> {
    match rest.split_first() {
        Some((Segment::Index(index), tail)) if !tail.is_empty() => {
            rows.get_mut(*index)?.list_at(tail)
        }
        _ => None,
    }
}

pub(crate) fn ensure_one<R: Row>(rows: &mut Vec<R>) {
    if rows.is_empty() {
        rows.push(R::default());
    }
}

/// Splits a path into its leading field name and the remainder.
pub(crate) fn split_field(path: &[Segment]) -> Option<(&str, &[Segment])> {
    match path.split_first()? {
        (Segment::Field(name), rest) => Some((name.as_str(), rest)),
        _ => None,
    }
}

/// Copy-on-write update of the list at `path`: `tree` is cloned, `updater`
/// runs against the list inside the clone, and the clone is returned.
pub fn update_at<N, F>(tree: &N, path: &Path, updater: F) -> FormResult<N>
where
    N: FormNode + Clone,
    F: FnOnce(&mut dyn EditableList) -> FormResult<()>,
{
    if path.is_empty() {
        return Err(FormError::EmptyPath);
    }

    let mut next = tree.clone();
    let list = next
        .list_at(path.segments())
        .ok_or_else(|| FormError::UnknownPath(path.clone()))?;
    updater(list)?;
    Ok(next)
}

/// Appends a blank row to the list at `path`.
pub fn add<N: FormNode + Clone>(tree: &N, path: &Path) -> FormResult<N> {
    update_at(tree, path, |list| {
        list.push_blank();
        Ok(())
    })
}

/// Merges `patch` into row `index` of the list at `path`.
pub fn update<N: FormNode + Clone>(
    tree: &N,
    path: &Path,
    index: usize,
    patch: Value,
) -> FormResult<N> {
    update_at(tree, path, |list| list.merge_row(path, index, patch))
}

/// Removes row `index` of the list at `path`. The last row of a list stays.
pub fn remove<N: FormNode + Clone>(tree: &N, path: &Path, index: usize) -> FormResult<N> {
    update_at(tree, path, |list| {
        check_bounds(path, index, list.len())?;
        if list.len() <= 1 {
            return Ok(());
        }
        list.remove_row(path, index)
    })
}
