//! Form state of the admin editors.
//!
//! A form is a strongly-typed record whose list fields are edited in place
//! through [`add`], [`update`] and [`remove`]. Every edit returns a new form
//! value and leaves its input untouched. On submit the form is turned into a
//! payload by dropping blank entries and collapsing empty lists to `None`.

mod error;
pub use error::{FormError, FormResult};

mod path;
pub use path::{Path, Segment};

mod list;
pub use list::{EditableList, FormNode, Row, add, remove, update, update_at};

mod edit;
pub use edit::FormEdit;

mod filter;
pub use filter::{Prune, blank_to_none, collapse, is_blank, prune_all, retain_filled};

mod kinds;
pub use kinds::{Difficulty, LessonType, ListeningKind, Speaker};

mod course;
pub use course::{CourseForm, CoursePayload};

mod lesson;
pub use lesson::{
    ApplicationExercise, ConversationScenario, Dialogue, KeyPhrase, LessonForm, LessonPayload,
    ListeningExercise, ListeningQuestion, VocabularyQuestion,
};
