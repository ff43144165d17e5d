use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::list::{editable, ensure_one, nested, split_field};
use crate::form::{
    Difficulty, EditableList, FormNode, LessonType, ListeningKind, Prune, Segment, Speaker,
    blank_to_none, collapse, is_blank, prune_all, retain_filled,
};

pub const DEFAULT_ESTIMATED_MINUTES: i32 = 30;
pub const MIN_ESTIMATED_MINUTES: i32 = 5;
pub const MAX_ESTIMATED_MINUTES: i32 = 120;
pub const DEFAULT_CHARACTER: &str = "sarah";
const OPTION_COUNT: usize = 4;

fn blank_options() -> Vec<String> {
    vec![String::new(); OPTION_COUNT]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct KeyPhrase {
    pub phrase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    pub meaning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    pub examples: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct Dialogue {
    pub speaker: Speaker,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct VocabularyQuestion {
    pub word: String,
    pub meaning: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct ListeningQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct ListeningExercise {
    #[serde(rename = "type")]
    pub kind: ListeningKind,
    pub audio_text: String,
    pub questions: Vec<ListeningQuestion>,
    pub hints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct ApplicationExercise {
    pub scenario: String,
    pub task: String,
    pub hints: Vec<String>,
    pub sample_responses: Vec<String>,
    pub evaluation_criteria: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversationScenario {
    pub situation: String,
    pub location: String,
    pub ai_role: String,
    pub user_role: String,
    pub context: String,
    pub suggested_topics: Vec<String>,
}

impl Default for KeyPhrase {
    fn default() -> Self {
        Self {
            phrase: String::new(),
            phonetic: None,
            meaning: String::new(),
            usage: None,
            examples: vec![String::new()],
            audio_url: None,
        }
    }
}

impl Default for VocabularyQuestion {
    fn default() -> Self {
        Self {
            word: String::new(),
            meaning: String::new(),
            options: blank_options(),
            correct_answer: String::new(),
            hint: None,
        }
    }
}

impl Default for ListeningQuestion {
    fn default() -> Self {
        Self {
            question: String::new(),
            options: blank_options(),
            correct_answer: String::new(),
        }
    }
}

impl Default for ListeningExercise {
    fn default() -> Self {
        Self {
            kind: ListeningKind::default(),
            audio_text: String::new(),
            questions: vec![ListeningQuestion::default()],
            hints: vec![String::new()],
        }
    }
}

impl Default for ApplicationExercise {
    fn default() -> Self {
        Self {
            scenario: String::new(),
            task: String::new(),
            hints: vec![String::new()],
            sample_responses: vec![String::new()],
            evaluation_criteria: vec![String::new()],
        }
    }
}

impl Default for ConversationScenario {
    fn default() -> Self {
        Self {
            situation: String::new(),
            location: String::new(),
            ai_role: String::new(),
            user_role: String::new(),
            context: String::new(),
            suggested_topics: vec![String::new()],
        }
    }
}

impl FormNode for KeyPhrase {
    fn list_at(&mut self, path: &[Segment]) -> Option<&mut dyn EditableList> {
        match split_field(path)? {
            ("examples", []) => editable(&mut self.examples),
            _ => None,
        }
    }

    fn ensure_rows(&mut self) {
        ensure_one(&mut self.examples);
    }
}

impl FormNode for VocabularyQuestion {
    fn list_at(&mut self, path: &[Segment]) -> Option<&mut dyn EditableList> {
        match split_field(path)? {
            ("options", []) => editable(&mut self.options),
            _ => None,
        }
    }

    fn ensure_rows(&mut self) {
        if self.options.is_empty() {
            self.options = blank_options();
        }
    }
}

impl FormNode for ListeningQuestion {
    fn list_at(&mut self, path: &[Segment]) -> Option<&mut dyn EditableList> {
        match split_field(path)? {
            ("options", []) => editable(&mut self.options),
            _ => None,
        }
    }

    fn ensure_rows(&mut self) {
        if self.options.is_empty() {
            self.options = blank_options();
        }
    }
}

impl FormNode for ListeningExercise {
    fn list_at(&mut self, path: &[Segment]) -> Option<&mut dyn EditableList> {
        match split_field(path)? {
            ("questions", []) => editable(&mut self.questions),
            ("questions", rest) => nested(&mut self.questions, rest),
            ("hints", []) => editable(&mut self.hints),
            _ => None,
        }
    }

    fn ensure_rows(&mut self) {
        ensure_one(&mut self.questions);
        self.questions.iter_mut().for_each(FormNode::ensure_rows);
        ensure_one(&mut self.hints);
    }
}

impl FormNode for ApplicationExercise {
    fn list_at(&mut self, path: &[Segment]) -> Option<&mut dyn EditableList> {
        match split_field(path)? {
            ("hints", []) => editable(&mut self.hints),
            ("sample_responses", []) => editable(&mut self.sample_responses),
            ("evaluation_criteria", []) => editable(&mut self.evaluation_criteria),
            _ => None,
        }
    }

    fn ensure_rows(&mut self) {
        ensure_one(&mut self.hints);
        ensure_one(&mut self.sample_responses);
        ensure_one(&mut self.evaluation_criteria);
    }
}

impl FormNode for ConversationScenario {
    fn list_at(&mut self, path: &[Segment]) -> Option<&mut dyn EditableList> {
        match split_field(path)? {
            ("suggestedTopics", []) => editable(&mut self.suggested_topics),
            _ => None,
        }
    }

    fn ensure_rows(&mut self) {
        ensure_one(&mut self.suggested_topics);
    }
}

impl Prune for KeyPhrase {
    fn prune(&self) -> Option<Self> {
        if is_blank(&self.phrase) {
            return None;
        }
        Some(Self {
            phrase: self.phrase.clone(),
            phonetic: self.phonetic.as_deref().and_then(blank_to_none),
            meaning: self.meaning.clone(),
            usage: self.usage.as_deref().and_then(blank_to_none),
            examples: retain_filled(&self.examples),
            audio_url: self.audio_url.as_deref().and_then(blank_to_none),
        })
    }
}

impl Prune for Dialogue {
    fn prune(&self) -> Option<Self> {
        if is_blank(&self.text) {
            return None;
        }
        Some(Self {
            speaker: self.speaker,
            text: self.text.clone(),
            translation: self.translation.as_deref().and_then(blank_to_none),
        })
    }
}

impl Prune for VocabularyQuestion {
    fn prune(&self) -> Option<Self> {
        if is_blank(&self.word) {
            return None;
        }
        Some(Self {
            word: self.word.clone(),
            meaning: self.meaning.clone(),
            options: retain_filled(&self.options),
            correct_answer: self.correct_answer.clone(),
            hint: self.hint.as_deref().and_then(blank_to_none),
        })
    }
}

impl Prune for ListeningQuestion {
    fn prune(&self) -> Option<Self> {
        if is_blank(&self.question) {
            return None;
        }
        Some(Self {
            question: self.question.clone(),
            options: retain_filled(&self.options),
            correct_answer: self.correct_answer.clone(),
        })
    }
}

impl Prune for ListeningExercise {
    fn prune(&self) -> Option<Self> {
        if is_blank(&self.audio_text) {
            return None;
        }
        Some(Self {
            kind: self.kind,
            audio_text: self.audio_text.clone(),
            questions: prune_all(&self.questions),
            hints: retain_filled(&self.hints),
        })
    }
}

impl Prune for ApplicationExercise {
    fn prune(&self) -> Option<Self> {
        if is_blank(&self.scenario) || is_blank(&self.task) {
            return None;
        }
        Some(Self {
            scenario: self.scenario.clone(),
            task: self.task.clone(),
            hints: retain_filled(&self.hints),
            sample_responses: retain_filled(&self.sample_responses),
            evaluation_criteria: retain_filled(&self.evaluation_criteria),
        })
    }
}

impl ConversationScenario {
    fn cleaned(&self) -> Self {
        Self {
            suggested_topics: retain_filled(&self.suggested_topics),
            ..self.clone()
        }
    }
}

/// Editable state of the lesson editor. One field per editor tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct LessonForm {
    pub module_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub difficulty: Difficulty,
    pub estimated_minutes: i32,
    pub character_id: String,
    pub objectives: Vec<String>,
    pub key_phrases: Vec<KeyPhrase>,
    pub dialogues: Vec<Dialogue>,
    pub vocabulary_questions: Vec<VocabularyQuestion>,
    pub listening_exercises: Vec<ListeningExercise>,
    pub application_exercises: Vec<ApplicationExercise>,
    pub scenario: ConversationScenario,
    pub is_active: bool,
}

impl Default for LessonForm {
    fn default() -> Self {
        Self {
            module_id: None,
            title: String::new(),
            description: String::new(),
            lesson_type: LessonType::default(),
            difficulty: Difficulty::default(),
            estimated_minutes: DEFAULT_ESTIMATED_MINUTES,
            character_id: DEFAULT_CHARACTER.to_string(),
            objectives: vec![String::new()],
            key_phrases: vec![KeyPhrase::default()],
            dialogues: vec![Dialogue::default()],
            vocabulary_questions: vec![VocabularyQuestion::default()],
            listening_exercises: vec![ListeningExercise::default()],
            application_exercises: vec![ApplicationExercise::default()],
            scenario: ConversationScenario::default(),
            is_active: true,
        }
    }
}

impl FormNode for LessonForm {
    fn list_at(&mut self, path: &[Segment]) -> Option<&mut dyn EditableList> {
        match split_field(path)? {
            ("objectives", []) => editable(&mut self.objectives),
            ("key_phrases", []) => editable(&mut self.key_phrases),
            ("key_phrases", rest) => nested(&mut self.key_phrases, rest),
            ("dialogues", []) => editable(&mut self.dialogues),
            ("vocabulary_questions", []) => editable(&mut self.vocabulary_questions),
            ("vocabulary_questions", rest) => nested(&mut self.vocabulary_questions, rest),
            ("listening_exercises", []) => editable(&mut self.listening_exercises),
            ("listening_exercises", rest) => nested(&mut self.listening_exercises, rest),
            ("application_exercises", []) => editable(&mut self.application_exercises),
            ("application_exercises", rest) => nested(&mut self.application_exercises, rest),
            ("scenario", rest) => self.scenario.list_at(rest),
            _ => None,
        }
    }

    fn ensure_rows(&mut self) {
        ensure_one(&mut self.objectives);
        ensure_one(&mut self.key_phrases);
        ensure_one(&mut self.dialogues);
        ensure_one(&mut self.vocabulary_questions);
        ensure_one(&mut self.listening_exercises);
        ensure_one(&mut self.application_exercises);
        self.key_phrases.iter_mut().for_each(FormNode::ensure_rows);
        self.vocabulary_questions.iter_mut().for_each(FormNode::ensure_rows);
        self.listening_exercises.iter_mut().for_each(FormNode::ensure_rows);
        self.application_exercises.iter_mut().for_each(FormNode::ensure_rows);
        self.scenario.ensure_rows();
    }
}

/// Persistence-ready lesson produced by the submit pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonPayload {
    pub module_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub difficulty: Difficulty,
    pub estimated_minutes: i32,
    pub character_id: String,
    pub objectives: Option<Vec<String>>,
    pub key_phrases: Option<Vec<KeyPhrase>>,
    pub dialogues: Option<Vec<Dialogue>>,
    pub vocabulary_questions: Option<Vec<VocabularyQuestion>>,
    pub listening_exercises: Option<Vec<ListeningExercise>>,
    pub application_exercises: Option<Vec<ApplicationExercise>>,
    pub scenario: Option<ConversationScenario>,
    pub is_active: bool,
}

impl LessonForm {
    /// Runs the submit pipeline. `self` is left as it was.
    pub fn to_payload(&self) -> LessonPayload {
        let scenario = match self.lesson_type {
            LessonType::Conversation => Some(self.scenario.cleaned()),
            _ => None,
        };

        LessonPayload {
            module_id: self.module_id,
            title: self.title.clone(),
            description: blank_to_none(&self.description),
            lesson_type: self.lesson_type,
            difficulty: self.difficulty,
            estimated_minutes: self
                .estimated_minutes
                .clamp(MIN_ESTIMATED_MINUTES, MAX_ESTIMATED_MINUTES),
            character_id: blank_to_none(&self.character_id)
                .unwrap_or_else(|| DEFAULT_CHARACTER.to_string()),
            objectives: collapse(retain_filled(&self.objectives)),
            key_phrases: collapse(prune_all(&self.key_phrases)),
            dialogues: collapse(prune_all(&self.dialogues)),
            vocabulary_questions: collapse(prune_all(&self.vocabulary_questions)),
            listening_exercises: collapse(prune_all(&self.listening_exercises)),
            application_exercises: collapse(prune_all(&self.application_exercises)),
            scenario,
            is_active: self.is_active,
        }
    }
}
