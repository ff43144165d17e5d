use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    form::{LessonForm, LessonPayload},
    model::{
        CrudRepository, ModelManager, ResourceTyped,
        entity::{Lesson, LessonListRow},
    },
    web::{
        AppState, AuthenticatedUser, RequestContext, WebError, WebResult,
        dto::lessons::{LessonFormEditBody, LessonListItem, LessonListing},
        error::ErrorResponse,
        routes::{DeleteQuery, guarded},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    let router = Router::new()
        .route("/", get(lessons_list_handler).post(lessons_create_handler))
        .route("/form", get(lessons_blank_form_handler))
        .route("/form/edit", post(lessons_form_edit_handler))
        .route(
            "/{id}",
            get(lessons_get_handler)
                .put(lessons_update_handler)
                .delete(lessons_delete_handler),
        )
        .route("/{id}/form", get(lessons_form_handler));

    guarded(router, &state)
}

async fn listing(mm: &ModelManager, user: &AuthenticatedUser) -> WebResult<LessonListing> {
    let rows = LessonListRow::fetch_all(mm, user)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok(LessonListing::new(rows.into_iter().map(LessonListItem::from).collect()))
}

async fn find(mm: &ModelManager, user: &AuthenticatedUser, id: Uuid) -> WebResult<Lesson> {
    Lesson::find_by_id(mm, user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Lesson::get_resource_type()))
}

/// Lookup that is part of a write: a backend failure reports its own text.
async fn find_for_write(mm: &ModelManager, user: &AuthenticatedUser, id: Uuid) -> WebResult<Lesson> {
    Lesson::find_by_id(mm, user, id)
        .await
        .map_err(|e| WebError::resource_write_error(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Lesson::get_resource_type()))
}

fn submit(form: &LessonForm) -> WebResult<LessonPayload> {
    if form.title.trim().is_empty() {
        return Err(WebError::resource_bad_request(
            Lesson::get_resource_type(),
            "title is required",
        ));
    }
    Ok(form.to_payload())
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons",
    description = "All lessons, newest first, with module title and exercise kinds, plus active and conversation counts",
    responses(
        (status = 200, description = "Lessons collected", body = LessonListing),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons",
    security(
        ("cookie" = [])
    )
)]
async fn lessons_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    Ok((StatusCode::OK, Json(listing(state.mm(), user).await?)))
}

#[utoipa::path(
    post,
    path = "/api/v1/lessons",
    description = "Runs the submit pipeline over the form and writes a new lesson",
    request_body = LessonForm,
    responses(
        (status = 201, description = "Lesson created", body = Lesson),
        (status = 400, description = "Blank title", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 500, description = "Rejected by the database, message passed through", body = ErrorResponse),
    ),
    tag = "lessons",
    security(
        ("cookie" = [])
    )
)]
#[tracing::instrument(skip_all)]
async fn lessons_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(form): Json<LessonForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let created = Lesson::create(state.mm(), user, submit(&form)?)
        .await
        .map_err(|e| WebError::resource_write_error(Lesson::get_resource_type(), e))?;

    tracing::info!(lesson_id = %created.id(), "lesson created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons/form",
    description = "Blank lesson form with defaults and one empty row per list",
    responses(
        (status = 200, description = "Blank form", body = LessonForm),
        (status = 401, description = "No session", body = ErrorResponse),
    ),
    tag = "lessons",
    security(
        ("cookie" = [])
    )
)]
async fn lessons_blank_form_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(LessonForm::default()))
}

#[utoipa::path(
    post,
    path = "/api/v1/lessons/form/edit",
    description = "Applies one add, update or remove to a (possibly nested) list of the lesson form",
    request_body = LessonFormEditBody,
    responses(
        (status = 200, description = "Edited form", body = LessonForm),
        (status = 400, description = "Unknown path, index or field", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
    ),
    tag = "lessons",
    security(
        ("cookie" = [])
    )
)]
async fn lessons_form_edit_handler(
    Json(body): Json<LessonFormEditBody>,
) -> WebResult<impl IntoResponse> {
    let path = body.edit.path().to_string();
    let form = body
        .edit
        .apply(&body.form)
        .map_err(|e| WebError::form_rejected(Lesson::get_resource_type(), e))?;

    tracing::trace!(%path, "lesson form edited");
    Ok((StatusCode::OK, Json(form)))
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons/{id}",
    params(
        ("id" = Uuid, Path, description = "ID of the lesson")
    ),
    responses(
        (status = 200, description = "Lesson found", body = Lesson),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons",
    security(
        ("cookie" = [])
    )
)]
async fn lessons_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    Ok((StatusCode::OK, Json(find(state.mm(), user, id).await?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons/{id}/form",
    description = "Stored lesson as editor state",
    params(
        ("id" = Uuid, Path, description = "ID of the lesson")
    ),
    responses(
        (status = 200, description = "Lesson form", body = LessonForm),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons",
    security(
        ("cookie" = [])
    )
)]
async fn lessons_form_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let lesson = find(state.mm(), user, id).await?;
    Ok((StatusCode::OK, Json(lesson.to_form())))
}

#[utoipa::path(
    put,
    path = "/api/v1/lessons/{id}",
    description = "Runs the submit pipeline over the form and overwrites the lesson",
    params(
        ("id" = Uuid, Path, description = "ID of the lesson")
    ),
    request_body = LessonForm,
    responses(
        (status = 200, description = "Lesson updated", body = Lesson),
        (status = 400, description = "Blank title", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Rejected by the database, message passed through", body = ErrorResponse),
    ),
    tag = "lessons",
    security(
        ("cookie" = [])
    )
)]
#[tracing::instrument(skip_all, fields(lesson_id = %id))]
async fn lessons_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<LessonForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let payload = submit(&form)?;
    let updated = find_for_write(state.mm(), user, id)
        .await?
        .update(state.mm(), user, payload)
        .await
        .map_err(|e| WebError::resource_write_error(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/lessons/{id}",
    description = "Deletes the lesson, then returns the fresh listing",
    params(
        ("id" = Uuid, Path, description = "ID of the lesson"),
        DeleteQuery,
    ),
    responses(
        (status = 200, description = "Lesson deleted", body = LessonListing),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 428, description = "Deletion not confirmed", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Rejected by the database, message passed through", body = ErrorResponse),
    ),
    tag = "lessons",
    security(
        ("cookie" = [])
    )
)]
#[tracing::instrument(skip_all, fields(lesson_id = %id))]
async fn lessons_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    query.require(Lesson::get_resource_type())?;

    find_for_write(state.mm(), user, id)
        .await?
        .delete(state.mm(), user)
        .await
        .map_err(|e| WebError::resource_write_error(Lesson::get_resource_type(), e))?;

    tracing::info!("lesson deleted");
    Ok((StatusCode::OK, Json(listing(state.mm(), user).await?)))
}
