mod user;
pub use user::{UserEntity, UserEntityCreateUpdate, UserWithRoleRow};

mod role;
pub use role::UserOrganizationRole;

mod course;
pub use course::Course;

mod module;
pub use module::{Module, ModuleCreate, ModuleWithCountsRow};

mod lesson;
pub use lesson::{Lesson, LessonListRow};
