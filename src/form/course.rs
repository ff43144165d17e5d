use serde::{Deserialize, Serialize};

use crate::form::list::{editable, ensure_one, split_field};
use crate::form::{
    Difficulty, EditableList, FormNode, Segment, blank_to_none, collapse, retain_filled,
};

/// Editable state of the course create/edit screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct CourseForm {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub objectives: Vec<String>,
    pub prerequisites: Vec<String>,
    pub is_active: bool,
}

impl Default for CourseForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            difficulty: Difficulty::default(),
            objectives: vec![String::new()],
            prerequisites: vec![String::new()],
            is_active: true,
        }
    }
}

impl FormNode for CourseForm {
    fn list_at(&mut self, path: &[Segment]) -> Option<&mut dyn EditableList> {
        match split_field(path)? {
            ("objectives", []) => editable(&mut self.objectives),
            ("prerequisites", []) => editable(&mut self.prerequisites),
            _ => None,
        }
    }

    fn ensure_rows(&mut self) {
        ensure_one(&mut self.objectives);
        ensure_one(&mut self.prerequisites);
    }
}

/// Persistence-ready course: blanks dropped, empty lists collapsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoursePayload {
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Difficulty,
    pub objectives: Option<Vec<String>>,
    pub prerequisites: Option<Vec<String>>,
    pub is_active: bool,
}

impl CourseForm {
    pub fn to_payload(&self) -> CoursePayload {
        CoursePayload {
            title: self.title.clone(),
            description: blank_to_none(&self.description),
            difficulty: self.difficulty,
            objectives: collapse(retain_filled(&self.objectives)),
            prerequisites: collapse(retain_filled(&self.prerequisites)),
            is_active: self.is_active,
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::form::{FormError, Path, add, remove, update};

    fn objectives() -> Path {
        "objectives".parse().unwrap()
    }

    #[test]
    fn blank_form_submits_nulls() {
        let payload = CourseForm::default().to_payload();
        assert_eq!(payload.objectives, None);
        assert_eq!(payload.prerequisites, None);
        assert_eq!(payload.description, None);
        assert!(payload.is_active);
    }

    #[test]
    fn edits_objectives_copy_on_write() {
        let form = CourseForm::default();
        let added = add(&form, &objectives()).unwrap();
        let edited = update(&added, &objectives(), 1, json!("Order at a café")).unwrap();

        assert_eq!(form.objectives, vec![String::new()]);
        assert_eq!(edited.objectives, vec![String::new(), "Order at a café".to_string()]);
        assert_eq!(edited.prerequisites, form.prerequisites);

        let payload = edited.to_payload();
        assert_eq!(payload.objectives, Some(vec!["Order at a café".to_string()]));
    }

    #[test]
    fn last_prerequisite_cannot_be_removed() {
        let path: Path = "prerequisites".parse().unwrap();
        let form = CourseForm::default();
        let after = remove(&form, &path, 0).unwrap();
        assert_eq!(after, form);
    }

    #[test]
    fn unknown_list_is_rejected() {
        let path: Path = "title".parse().unwrap();
        let result = add(&CourseForm::default(), &path);
        assert!(matches!(result, Err(FormError::UnknownPath(_))));
    }
}
