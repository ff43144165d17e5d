use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::{
    form::{CourseForm, FormEdit},
    model::{CrudRepository, DatabaseResult, ModelManager, entity::{Course, Module}},
    web::AuthenticatedUser,
};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CourseListItem {
    #[serde(flatten)]
    pub course: Course,
    pub module_count: i64,
}

impl CourseListItem {
    /// All courses, newest first, each with its module count. The counts run
    /// as one concurrent batch; a single failure fails the listing.
    #[tracing::instrument(skip_all)]
    pub async fn fetch_all(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
    ) -> DatabaseResult<Vec<Self>> {
        let courses = Course::list(mm, actor).await?;
        let counts = try_join_all(
            courses
                .iter()
                .map(|course| Module::count_by_course(mm, actor, course.id())),
        )
        .await?;

        Ok(courses
            .into_iter()
            .zip(counts)
            .map(|(course, module_count)| Self {
                course,
                module_count,
            })
            .collect())
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CourseFormEditBody {
    pub form: CourseForm,
    #[schema(value_type = Object)]
    pub edit: FormEdit,
}
