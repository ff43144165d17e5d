use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, put},
};
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, Listing, ModelManager, ResourceTyped,
        entity::{UserEntity, UserOrganizationRole, UserWithRoleRow},
    },
    web::{
        AppState, AuthenticatedUser, RequestContext, WebError, WebResult,
        dto::users::{RoleUpdateBody, UserListItem},
        error::ErrorResponse,
        routes::{DeleteQuery, guarded},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    let router = Router::new()
        .route("/", get(users_list_handler))
        .route("/{id}", delete(users_delete_handler))
        .route("/{id}/role", put(users_role_handler));

    guarded(router, &state)
}

async fn listing(mm: &ModelManager, user: &AuthenticatedUser) -> WebResult<Listing<UserListItem>> {
    let rows = UserWithRoleRow::fetch_all(mm, user)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    Ok(Listing::new(rows.into_iter().map(UserListItem::from).collect()))
}

/// Every lookup here precedes a write, so backend failures report their own text.
async fn find_for_write(
    mm: &ModelManager,
    user: &AuthenticatedUser,
    id: Uuid,
) -> WebResult<UserEntity> {
    UserEntity::find_by_id(mm, user, id)
        .await
        .map_err(|e| WebError::resource_write_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(UserEntity::get_resource_type()))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    description = "Every user with its role",
    responses(
        (status = 200, description = "Users collected", body = Listing<UserListItem>),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users",
    security(
        ("cookie" = [])
    )
)]
async fn users_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    Ok((StatusCode::OK, Json(listing(state.mm(), user).await?)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/role",
    params(
        ("id" = Uuid, Path, description = "ID of the user")
    ),
    request_body = RoleUpdateBody,
    responses(
        (status = 200, description = "Role assigned", body = UserOrganizationRole),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users",
    security(
        ("cookie" = [])
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %id, role = %body.role))]
async fn users_role_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RoleUpdateBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let target = find_for_write(state.mm(), user, id).await?;

    let assigned = UserOrganizationRole::assign(state.mm(), user, target.id(), body.role)
        .await
        .map_err(|e| WebError::resource_write_error(UserOrganizationRole::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(assigned)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    description = "Deletes the user and its role, then returns the fresh listing",
    params(
        ("id" = Uuid, Path, description = "ID of the user"),
        DeleteQuery,
    ),
    responses(
        (status = 200, description = "User deleted", body = Listing<UserListItem>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 428, description = "Deletion not confirmed", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users",
    security(
        ("cookie" = [])
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %id))]
async fn users_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    query.require(UserEntity::get_resource_type())?;

    find_for_write(state.mm(), user, id)
        .await?
        .delete(state.mm(), user)
        .await
        .map_err(|e| WebError::resource_write_error(UserEntity::get_resource_type(), e))?;

    tracing::info!("user deleted");
    Ok((StatusCode::OK, Json(listing(state.mm(), user).await?)))
}
