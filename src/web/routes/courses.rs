use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    form::{CourseForm, CoursePayload},
    model::{CrudRepository, Listing, ModelManager, ResourceTyped, entity::Course},
    web::{
        AppState, AuthenticatedUser, RequestContext, WebError, WebResult,
        dto::courses::{CourseFormEditBody, CourseListItem},
        error::ErrorResponse,
        routes::{DeleteQuery, guarded},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    let router = Router::new()
        .route("/", get(courses_list_handler).post(courses_create_handler))
        .route("/form", get(courses_blank_form_handler))
        .route("/form/edit", post(courses_form_edit_handler))
        .route(
            "/{id}",
            get(courses_get_handler)
                .put(courses_update_handler)
                .delete(courses_delete_handler),
        )
        .route("/{id}/form", get(courses_form_handler));

    guarded(router, &state)
}

async fn listing(mm: &ModelManager, user: &AuthenticatedUser) -> WebResult<Listing<CourseListItem>> {
    CourseListItem::fetch_all(mm, user)
        .await
        .map(Listing::new)
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))
}

async fn find(mm: &ModelManager, user: &AuthenticatedUser, id: Uuid) -> WebResult<Course> {
    Course::find_by_id(mm, user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Course::get_resource_type()))
}

/// Lookup that is part of a write: a backend failure reports its own text.
async fn find_for_write(mm: &ModelManager, user: &AuthenticatedUser, id: Uuid) -> WebResult<Course> {
    Course::find_by_id(mm, user, id)
        .await
        .map_err(|e| WebError::resource_write_error(Course::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Course::get_resource_type()))
}

fn submit(form: &CourseForm) -> WebResult<CoursePayload> {
    if form.title.trim().is_empty() {
        return Err(WebError::resource_bad_request(
            Course::get_resource_type(),
            "title is required",
        ));
    }
    Ok(form.to_payload())
}

#[utoipa::path(
    get,
    path = "/api/v1/courses",
    description = "All courses, newest first, with their module counts",
    responses(
        (status = 200, description = "Courses collected", body = Listing<CourseListItem>),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    Ok((StatusCode::OK, Json(listing(state.mm(), user).await?)))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses",
    description = "Filters the submitted form and writes it as a new course",
    request_body = CourseForm,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Blank title", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 500, description = "Rejected by the database, message passed through", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
#[tracing::instrument(skip_all)]
async fn courses_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(form): Json<CourseForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let created = Course::create(state.mm(), user, submit(&form)?)
        .await
        .map_err(|e| WebError::resource_write_error(Course::get_resource_type(), e))?;

    tracing::info!(course_id = %created.id(), "course created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/form",
    description = "Blank course form, one empty row per list",
    responses(
        (status = 200, description = "Blank form", body = CourseForm),
        (status = 401, description = "No session", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_blank_form_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(CourseForm::default()))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/form/edit",
    description = "Applies one add, update or remove to a list of the course form",
    request_body = CourseFormEditBody,
    responses(
        (status = 200, description = "Edited form", body = CourseForm),
        (status = 400, description = "Unknown path, index or field", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_form_edit_handler(
    Json(body): Json<CourseFormEditBody>,
) -> WebResult<impl IntoResponse> {
    let form = body
        .edit
        .apply(&body.form)
        .map_err(|e| WebError::form_rejected(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(form)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Course found", body = Course),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    Ok((StatusCode::OK, Json(find(state.mm(), user, id).await?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}/form",
    description = "Stored course as editor state",
    params(
        ("id" = Uuid, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Course form", body = CourseForm),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_form_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let course = find(state.mm(), user, id).await?;
    Ok((StatusCode::OK, Json(course.to_form())))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    description = "Filters the submitted form and overwrites the course",
    params(
        ("id" = Uuid, Path, description = "ID of the course")
    ),
    request_body = CourseForm,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 400, description = "Blank title", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Rejected by the database, message passed through", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
#[tracing::instrument(skip_all, fields(course_id = %id))]
async fn courses_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<CourseForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let payload = submit(&form)?;
    let updated = find_for_write(state.mm(), user, id)
        .await?
        .update(state.mm(), user, payload)
        .await
        .map_err(|e| WebError::resource_write_error(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    description = "Deletes the course with its modules and lessons, then returns the fresh listing",
    params(
        ("id" = Uuid, Path, description = "ID of the course"),
        DeleteQuery,
    ),
    responses(
        (status = 200, description = "Course deleted", body = Listing<CourseListItem>),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 428, description = "Deletion not confirmed", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Rejected by the database, message passed through", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
#[tracing::instrument(skip_all, fields(course_id = %id))]
async fn courses_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    query.require(Course::get_resource_type())?;

    find_for_write(state.mm(), user, id)
        .await?
        .delete(state.mm(), user)
        .await
        .map_err(|e| WebError::resource_write_error(Course::get_resource_type(), e))?;

    tracing::info!("course deleted");
    Ok((StatusCode::OK, Json(listing(state.mm(), user).await?)))
}
