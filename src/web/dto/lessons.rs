use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    form::{Difficulty, FormEdit, LessonForm, LessonType},
    model::entity::LessonListRow,
};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonListItem {
    pub id: Uuid,
    pub module_id: Option<Uuid>,
    pub module_title: Option<String>,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub difficulty: Difficulty,
    pub estimated_minutes: i32,
    pub is_active: bool,
    /// How many exercise collections hold at least one entry.
    pub exercise_kinds: i32,
    pub created_at: DateTime<Utc>,
}

impl From<LessonListRow> for LessonListItem {
    fn from(row: LessonListRow) -> Self {
        Self {
            id: row.id,
            module_id: row.module_id,
            module_title: row.module_title,
            title: row.title,
            description: row.description,
            lesson_type: LessonType::from(row.lesson_type.as_str()),
            difficulty: Difficulty::from(row.difficulty.as_str()),
            estimated_minutes: row.estimated_minutes,
            is_active: row.is_active,
            exercise_kinds: row.exercise_kinds,
            created_at: row.created_at,
        }
    }
}

/// Lesson listing with the summary counts shown above the table.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonListing {
    pub items: Vec<LessonListItem>,
    pub total: usize,
    pub active: usize,
    pub conversation: usize,
}

impl LessonListing {
    pub fn new(items: Vec<LessonListItem>) -> Self {
        let active = items.iter().filter(|item| item.is_active).count();
        let conversation = items
            .iter()
            .filter(|item| item.lesson_type == LessonType::Conversation)
            .count();

        Self {
            total: items.len(),
            items,
            active,
            conversation,
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct LessonFormEditBody {
    pub form: LessonForm,
    #[schema(value_type = Object)]
    pub edit: FormEdit,
}

#[cfg(test)]
mod test {
    use super::*;

    fn item(lesson_type: LessonType, is_active: bool) -> LessonListItem {
        LessonListItem {
            id: Uuid::new_v4(),
            module_id: None,
            module_title: None,
            title: String::from("Ordering coffee"),
            description: None,
            lesson_type,
            difficulty: Difficulty::Beginner,
            estimated_minutes: 5,
            is_active,
            exercise_kinds: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn listing_counts_active_and_conversation_lessons() {
        let listing = LessonListing::new(vec![
            item(LessonType::Conversation, true),
            item(LessonType::Vocabulary, true),
            item(LessonType::Conversation, false),
        ]);

        assert_eq!(listing.total, 3);
        assert_eq!(listing.active, 2);
        assert_eq!(listing.conversation, 2);
    }

    #[test]
    fn empty_listing_counts_nothing() {
        let listing = LessonListing::new(vec![]);
        assert_eq!((listing.total, listing.active, listing.conversation), (0, 0, 0));
    }
}
