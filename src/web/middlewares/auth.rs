use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{
    auth,
    model::{ResourceTyped, entity::UserOrganizationRole},
    web::{AppState, RequestContext, context::AuthenticatedUser, error::WebError},
};

pub static AUTH_TOKEN: &str = "SID";

/// Resolves the `SID` cookie into a [`RequestContext`]. A missing cookie
/// yields an anonymous context; a bad one is rejected.
pub async fn extract_context_fn(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = match cookies.get(AUTH_TOKEN) {
        Some(token) => token,
        None => {
            req.extensions_mut().insert(RequestContext::new(None));
            return Ok(next.run(req).await);
        }
    };

    let claims = auth::process_token(token.value(), state.config().app().jwt())
        .map_err(|e| WebError::auth_cookie_invalid(AUTH_TOKEN, e))?
        .claims;

    let id = claims
        .user_id()
        .ok_or_else(|| WebError::auth_subject_invalid(&claims.sub))?;

    let role = UserOrganizationRole::find_by_user(state.mm(), &AuthenticatedUser::system(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserOrganizationRole::get_resource_type(), e))?
        .map(|r| r.role())
        .unwrap_or_default();

    tracing::debug!(user_id = %id, %role, "session resolved");
    req.extensions_mut()
        .insert(RequestContext::new(Some(AuthenticatedUser::new(id, role))));

    Ok(next.run(req).await)
}

/// Lets the request through only for the configured privileged role.
pub async fn require_privileged_fn(
    State(state): State<AppState>,
    ctx: RequestContext,
    req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let user = ctx.user()?;
    let required = state.config().app().privileged_role();

    if user.user_role() != required {
        return Err(WebError::access_forbidden(user.user_role()));
    }

    Ok(next.run(req).await)
}
