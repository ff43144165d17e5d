use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Beginner,
    Elementary,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    #[default]
    Conversation,
    Pronunciation,
    Vocabulary,
    Grammar,
    Review,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    #[default]
    Ai,
    User,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ListeningKind {
    #[default]
    Comprehension,
    Dictation,
    FillBlank,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Elementary => "elementary",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl LessonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conversation => "conversation",
            Self::Pronunciation => "pronunciation",
            Self::Vocabulary => "vocabulary",
            Self::Grammar => "grammar",
            Self::Review => "review",
        }
    }
}

// Stored values that no longer match a variant fall back to the default.
impl From<&str> for Difficulty {
    fn from(value: &str) -> Self {
        match value {
            "elementary" => Self::Elementary,
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            _ => Self::Beginner,
        }
    }
}

/// Strict parsing for operator input; unknown names are rejected.
impl FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "beginner" => Ok(Self::Beginner),
            "elementary" => Ok(Self::Elementary),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!(
                "unknown difficulty `{other}`, expected beginner, elementary, intermediate or advanced"
            )),
        }
    }
}

impl From<&str> for LessonType {
    fn from(value: &str) -> Self {
        match value {
            "pronunciation" => Self::Pronunciation,
            "vocabulary" => Self::Vocabulary,
            "grammar" => Self::Grammar,
            "review" => Self::Review,
            _ => Self::Conversation,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for LessonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stored_strings_round_trip() {
        for difficulty in [
            Difficulty::Beginner,
            Difficulty::Elementary,
            Difficulty::Intermediate,
            Difficulty::Advanced,
        ] {
            assert_eq!(Difficulty::from(difficulty.as_str()), difficulty);
        }
        assert_eq!(LessonType::from("grammar"), LessonType::Grammar);
        assert_eq!(LessonType::from("unknown"), LessonType::Conversation);
    }

    #[test]
    fn operator_input_must_name_a_difficulty() {
        assert_eq!("advanced".parse::<Difficulty>(), Ok(Difficulty::Advanced));
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn listening_kind_uses_snake_case() {
        let json = serde_json::to_string(&ListeningKind::FillBlank).unwrap();
        assert_eq!(json, r#""fill_blank""#);
    }
}
