use serde::{Deserialize, Serialize};

use crate::model::entity::{Course, Lesson, Module, UserEntity};
use crate::model::{CrudRepository, DatabaseResult, ModelManager};
use crate::web::AuthenticatedUser;

/// Entity counts shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DashboardStats {
    pub courses: i64,
    pub modules: i64,
    pub lessons: i64,
    pub users: i64,
}

impl DashboardStats {
    /// Runs the four counts concurrently; the first failure fails the batch.
    #[tracing::instrument(skip_all)]
    pub async fn fetch(mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<Self> {
        let (courses, modules, lessons, users) = tokio::try_join!(
            Course::count(mm, actor),
            Module::count(mm, actor),
            Lesson::count(mm, actor),
            UserEntity::count(mm, actor),
        )?;

        Ok(Self {
            courses,
            modules,
            lessons,
            users,
        })
    }
}
