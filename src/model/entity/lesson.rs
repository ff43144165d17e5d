use crate::form::{
    ApplicationExercise, ConversationScenario, Dialogue, Difficulty, FormNode, KeyPhrase,
    LessonForm, LessonPayload, LessonType, ListeningExercise, VocabularyQuestion,
};
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Lesson {
    id: Uuid,
    module_id: Option<Uuid>,
    title: String,
    description: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    lesson_type: String,
    difficulty: String,
    estimated_minutes: i32,
    character_id: String,
    objectives: Option<Vec<String>>,
    #[schema(value_type = Option<Vec<KeyPhrase>>)]
    key_phrases: Option<Json<Vec<KeyPhrase>>>,
    #[schema(value_type = Option<Vec<Dialogue>>)]
    dialogues: Option<Json<Vec<Dialogue>>>,
    #[schema(value_type = Option<Vec<VocabularyQuestion>>)]
    vocabulary_questions: Option<Json<Vec<VocabularyQuestion>>>,
    #[schema(value_type = Option<Vec<ListeningExercise>>)]
    listening_exercises: Option<Json<Vec<ListeningExercise>>>,
    #[schema(value_type = Option<Vec<ApplicationExercise>>)]
    application_exercises: Option<Json<Vec<ApplicationExercise>>>,
    #[schema(value_type = Option<ConversationScenario>)]
    scenario: Option<Json<ConversationScenario>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ResourceTyped for Lesson {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Lesson
    }
}

fn rows<T: Clone>(column: &Option<Json<Vec<T>>>) -> Vec<T> {
    column.as_ref().map(|json| json.0.clone()).unwrap_or_default()
}

impl Lesson {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn module_id(&self) -> Option<Uuid> {
        self.module_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn lesson_type(&self) -> LessonType {
        LessonType::from(self.lesson_type.as_str())
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from(self.difficulty.as_str())
    }

    pub fn key_phrases(&self) -> Vec<KeyPhrase> {
        rows(&self.key_phrases)
    }

    pub fn vocabulary_questions(&self) -> Vec<VocabularyQuestion> {
        rows(&self.vocabulary_questions)
    }

    pub fn scenario(&self) -> Option<&ConversationScenario> {
        self.scenario.as_ref().map(|json| &json.0)
    }

    /// Lesson as editor state, with one blank row in every empty list.
    pub fn to_form(&self) -> LessonForm {
        let mut form = LessonForm {
            module_id: self.module_id,
            title: self.title.clone(),
            description: self.description.clone().unwrap_or_default(),
            lesson_type: self.lesson_type(),
            difficulty: self.difficulty(),
            estimated_minutes: self.estimated_minutes,
            character_id: self.character_id.clone(),
            objectives: self.objectives.clone().unwrap_or_default(),
            key_phrases: rows(&self.key_phrases),
            dialogues: rows(&self.dialogues),
            vocabulary_questions: rows(&self.vocabulary_questions),
            listening_exercises: rows(&self.listening_exercises),
            application_exercises: rows(&self.application_exercises),
            scenario: self.scenario().cloned().unwrap_or_default(),
            is_active: self.is_active,
        };
        form.ensure_rows();
        form
    }
}

#[async_trait]
impl CrudRepository<Lesson, LessonPayload, Uuid> for Lesson {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: LessonPayload,
    ) -> DatabaseResult<Self> {
        let lesson = sqlx::query_as(
            r#"
            INSERT INTO lessons (
                id, module_id, title, description, type, difficulty, estimated_minutes,
                character_id, objectives, key_phrases, dialogues, vocabulary_questions,
                listening_exercises, application_exercises, scenario, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.module_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.lesson_type.as_str())
        .bind(data.difficulty.as_str())
        .bind(data.estimated_minutes)
        .bind(&data.character_id)
        .bind(&data.objectives)
        .bind(data.key_phrases.map(Json))
        .bind(data.dialogues.map(Json))
        .bind(data.vocabulary_questions.map(Json))
        .bind(data.listening_exercises.map(Json))
        .bind(data.application_exercises.map(Json))
        .bind(data.scenario.map(Json))
        .bind(data.is_active)
        .fetch_one(mm.executor())
        .await?;

        Ok(lesson)
    }

    async fn update(
        self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: LessonPayload,
    ) -> DatabaseResult<Self> {
        let lesson = sqlx::query_as(
            r#"
            UPDATE lessons
            SET module_id = $1, title = $2, description = $3, type = $4, difficulty = $5,
                estimated_minutes = $6, character_id = $7, objectives = $8, key_phrases = $9,
                dialogues = $10, vocabulary_questions = $11, listening_exercises = $12,
                application_exercises = $13, scenario = $14, is_active = $15,
                updated_at = now()
            WHERE id = $16
            RETURNING *
            "#,
        )
        .bind(data.module_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.lesson_type.as_str())
        .bind(data.difficulty.as_str())
        .bind(data.estimated_minutes)
        .bind(&data.character_id)
        .bind(&data.objectives)
        .bind(data.key_phrases.map(Json))
        .bind(data.dialogues.map(Json))
        .bind(data.vocabulary_questions.map(Json))
        .bind(data.listening_exercises.map(Json))
        .bind(data.application_exercises.map(Json))
        .bind(data.scenario.map(Json))
        .bind(data.is_active)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        Ok(lesson)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons ORDER BY created_at DESC")
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

// Utils

/// Lesson listing row: the lesson's summary columns plus its module title.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LessonListRow {
    pub id: Uuid,
    pub module_id: Option<Uuid>,
    pub module_title: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub lesson_type: String,
    pub difficulty: String,
    pub estimated_minutes: i32,
    pub is_active: bool,
    pub exercise_kinds: i32,
    pub created_at: DateTime<Utc>,
}

impl LessonListRow {
    pub async fn fetch_all(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                l.id,
                l.module_id,
                m.title AS module_title,
                l.title,
                l.description,
                l.type AS lesson_type,
                l.difficulty,
                l.estimated_minutes,
                l.is_active,
                (
                    (COALESCE(jsonb_array_length(l.vocabulary_questions), 0) > 0)::int +
                    (COALESCE(jsonb_array_length(l.key_phrases), 0) > 0)::int +
                    (COALESCE(jsonb_array_length(l.listening_exercises), 0) > 0)::int +
                    (COALESCE(jsonb_array_length(l.dialogues), 0) > 0)::int +
                    (COALESCE(jsonb_array_length(l.application_exercises), 0) > 0)::int
                ) AS exercise_kinds,
                l.created_at
            FROM lessons l
            LEFT JOIN modules m ON m.id = l.module_id
            ORDER BY l.created_at DESC;
            "#,
        )
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn stored_lesson() -> Lesson {
        Lesson {
            id: Uuid::new_v4(),
            module_id: None,
            title: "At the café".into(),
            description: None,
            lesson_type: "vocabulary".into(),
            difficulty: "intermediate".into(),
            estimated_minutes: 20,
            character_id: "maya".into(),
            objectives: None,
            key_phrases: Some(Json(vec![KeyPhrase {
                phrase: "a latte, please".into(),
                examples: vec![],
                ..KeyPhrase::default()
            }])),
            dialogues: Some(Json(vec![])),
            vocabulary_questions: None,
            listening_exercises: None,
            application_exercises: None,
            scenario: None,
            is_active: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn loading_gives_every_list_one_row() {
        let form = stored_lesson().to_form();

        assert_eq!(form.lesson_type, LessonType::Vocabulary);
        assert_eq!(form.difficulty, Difficulty::Intermediate);
        assert_eq!(form.objectives, vec![String::new()]);
        assert_eq!(form.key_phrases[0].phrase, "a latte, please");
        assert_eq!(form.key_phrases[0].examples, vec![String::new()]);
        assert_eq!(form.dialogues.len(), 1);
        assert_eq!(form.vocabulary_questions, vec![VocabularyQuestion::default()]);
        assert_eq!(form.scenario, ConversationScenario::default());
        assert!(!form.is_active);
    }

    #[test]
    fn loaded_form_submits_back_the_same_content() {
        let payload = stored_lesson().to_form().to_payload();
        let phrases = payload.key_phrases.unwrap();
        assert_eq!(phrases.len(), 1);
        assert!(phrases[0].examples.is_empty());
        assert_eq!(payload.dialogues, None);
        assert_eq!(payload.scenario, None);
        assert_eq!(payload.character_id, "maya");
    }
}
