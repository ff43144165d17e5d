use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use tower_cookies::{Cookie, Cookies, cookie::SameSite};

use crate::{
    auth::{self, UserClaims, verify_password},
    model::{
        CrudRepository, ResourceTyped,
        entity::{UserEntity, UserOrganizationRole},
    },
    web::{
        AppState, AuthenticatedUser, RequestContext, WebError, WebResult,
        dto::account::{AccountResponse, SigninBody},
        error::ErrorResponse,
        middlewares::{self, AUTH_TOKEN},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    let protected = Router::new()
        .route("/me", get(account_me_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ));

    Router::new()
        .route("/signin", post(account_signin_handler))
        .route("/signout", post(account_signout_handler))
        .merge(protected)
        .with_state(state)
}

fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_TOKEN, token);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie
}

#[utoipa::path(
    post,
    path = "/api/v1/account/signin",
    description = "Checks the credentials and starts a one-day session cookie",
    request_body = SigninBody,
    responses(
        (status = 200, description = "User signed in", body = AccountResponse),
        (status = 401, description = "Credentials invalid", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "account",
)]
#[tracing::instrument(skip_all, fields(email = %payload.email))]
async fn account_signin_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<SigninBody>,
) -> WebResult<impl IntoResponse> {
    let system = AuthenticatedUser::system();
    let found = UserEntity::find_by_email(state.mm(), &system, &payload.email)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(WebError::auth_invalid_credentials)?;

    let is_verified =
        verify_password(found.hash(), &payload.password).map_err(WebError::server_crypt_error)?;

    if !is_verified {
        return Err(WebError::auth_invalid_credentials());
    }

    let role = UserOrganizationRole::find_by_user(state.mm(), &system, found.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserOrganizationRole::get_resource_type(), e))?
        .map(|r| r.role())
        .unwrap_or_default();

    let token = auth::generate_token(UserClaims::for_session(found.id()), state.config().app().jwt())
        .map_err(|e| WebError::server_crypt_error(e.into()))?;
    cookies.add(session_cookie(token));

    tracing::info!(user_id = %found.id(), %role, "signed in");
    Ok((StatusCode::OK, Json(AccountResponse::new(&found, role))))
}

#[utoipa::path(
    post,
    path = "/api/v1/account/signout",
    description = "Drops the session cookie",
    responses(
        (status = 204, description = "Signed out"),
    ),
    tag = "account",
)]
async fn account_signout_handler(cookies: Cookies) -> impl IntoResponse {
    cookies.remove(session_cookie(String::new()));
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    get,
    path = "/api/v1/account/me",
    description = "Current user and its role",
    responses(
        (status = 200, description = "Signed-in user", body = AccountResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "account",
    security(
        ("cookie" = [])
    )
)]
async fn account_me_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let found = UserEntity::find_by_id(state.mm(), user, user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(WebError::auth_required)?;

    Ok((StatusCode::OK, Json(AccountResponse::new(&found, user.user_role()))))
}
