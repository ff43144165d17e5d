use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ModuleListQuery {
    /// Only modules of this course.
    pub course_id: Option<Uuid>,
}
