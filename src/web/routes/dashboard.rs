use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};

use crate::{
    model::{DashboardStats, ResourceType},
    web::{AppState, RequestContext, WebError, WebResult, error::ErrorResponse, routes::guarded},
};

pub fn routes<S>(state: AppState) -> Router<S> {
    guarded(Router::new().route("/", get(dashboard_handler)), &state)
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    description = "Course, module, lesson and user counts",
    responses(
        (status = 200, description = "Counts collected", body = DashboardStats),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "dashboard",
    security(
        ("cookie" = [])
    )
)]
async fn dashboard_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let stats = DashboardStats::fetch(state.mm(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(ResourceType::Dashboard, e))?;

    Ok((StatusCode::OK, Json(stats)))
}
