use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, Listing, ModelManager, ResourceTyped,
        entity::{Course, Module, ModuleCreate, ModuleWithCountsRow},
    },
    web::{
        AppState, AuthenticatedUser, RequestContext, WebError, WebResult,
        dto::modules::ModuleListQuery,
        error::ErrorResponse,
        routes::{DeleteQuery, guarded},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    let router = Router::new()
        .route("/", get(modules_list_handler).post(modules_create_handler))
        .route(
            "/{id}",
            get(modules_get_handler)
                .put(modules_update_handler)
                .delete(modules_delete_handler),
        );

    guarded(router, &state)
}

async fn listing(
    mm: &ModelManager,
    user: &AuthenticatedUser,
    course_id: Option<Uuid>,
) -> WebResult<Listing<ModuleWithCountsRow>> {
    ModuleWithCountsRow::fetch_all(mm, user, course_id)
        .await
        .map(Listing::new)
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))
}

async fn find(mm: &ModelManager, user: &AuthenticatedUser, id: Uuid) -> WebResult<Module> {
    Module::find_by_id(mm, user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Module::get_resource_type()))
}

/// Lookup that is part of a write: a backend failure reports its own text.
async fn find_for_write(mm: &ModelManager, user: &AuthenticatedUser, id: Uuid) -> WebResult<Module> {
    Module::find_by_id(mm, user, id)
        .await
        .map_err(|e| WebError::resource_write_error(Module::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Module::get_resource_type()))
}

/// Rejects blank titles and unknown courses before anything is written.
async fn validate(mm: &ModelManager, user: &AuthenticatedUser, body: &ModuleCreate) -> WebResult<()> {
    if body.title.trim().is_empty() {
        return Err(WebError::resource_bad_request(
            Module::get_resource_type(),
            "title is required",
        ));
    }

    let course = Course::find_by_id(mm, user, body.course_id)
        .await
        .map_err(|e| WebError::resource_write_error(Module::get_resource_type(), e))?;

    match course {
        Some(_) => Ok(()),
        None => Err(WebError::resource_bad_request(
            Module::get_resource_type(),
            format!("course {} does not exist", body.course_id),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/modules",
    description = "Modules ordered by course and position, with lesson counts",
    params(ModuleListQuery),
    responses(
        (status = 200, description = "Modules collected", body = Listing<ModuleWithCountsRow>),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules",
    security(
        ("cookie" = [])
    )
)]
async fn modules_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(query): Query<ModuleListQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    Ok((StatusCode::OK, Json(listing(state.mm(), user, query.course_id).await?)))
}

#[utoipa::path(
    post,
    path = "/api/v1/modules",
    request_body = ModuleCreate,
    responses(
        (status = 201, description = "Module created", body = Module),
        (status = 400, description = "Blank title or unknown course", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules",
    security(
        ("cookie" = [])
    )
)]
#[tracing::instrument(skip_all)]
async fn modules_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(body): Json<ModuleCreate>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    validate(state.mm(), user, &body).await?;

    let created = Module::create(state.mm(), user, body)
        .await
        .map_err(|e| WebError::resource_write_error(Module::get_resource_type(), e))?;

    tracing::info!(module_id = %created.id(), "module created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/modules/{id}",
    params(
        ("id" = Uuid, Path, description = "ID of the module")
    ),
    responses(
        (status = 200, description = "Module found", body = Module),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules",
    security(
        ("cookie" = [])
    )
)]
async fn modules_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    Ok((StatusCode::OK, Json(find(state.mm(), user, id).await?)))
}

#[utoipa::path(
    put,
    path = "/api/v1/modules/{id}",
    params(
        ("id" = Uuid, Path, description = "ID of the module")
    ),
    request_body = ModuleCreate,
    responses(
        (status = 200, description = "Module updated", body = Module),
        (status = 400, description = "Blank title or unknown course", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules",
    security(
        ("cookie" = [])
    )
)]
#[tracing::instrument(skip_all, fields(module_id = %id))]
async fn modules_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ModuleCreate>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let module = find_for_write(state.mm(), user, id).await?;
    validate(state.mm(), user, &body).await?;

    let updated = module
        .update(state.mm(), user, body)
        .await
        .map_err(|e| WebError::resource_write_error(Module::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/modules/{id}",
    description = "Deletes the module with its lessons, then returns the fresh listing (same `course_id` filter)",
    params(
        ("id" = Uuid, Path, description = "ID of the module"),
        DeleteQuery,
        ModuleListQuery,
    ),
    responses(
        (status = 200, description = "Module deleted", body = Listing<ModuleWithCountsRow>),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 428, description = "Deletion not confirmed", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules",
    security(
        ("cookie" = [])
    )
)]
#[tracing::instrument(skip_all, fields(module_id = %id))]
async fn modules_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(confirm): Query<DeleteQuery>,
    Query(filter): Query<ModuleListQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    confirm.require(Module::get_resource_type())?;

    find_for_write(state.mm(), user, id)
        .await?
        .delete(state.mm(), user)
        .await
        .map_err(|e| WebError::resource_write_error(Module::get_resource_type(), e))?;

    tracing::info!("module deleted");
    Ok((StatusCode::OK, Json(listing(state.mm(), user, filter.course_id).await?)))
}
