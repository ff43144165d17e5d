//! Request context: the signed-in user and its role.
//!

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};

use crate::web::{WebResult, error::WebError};

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    user_id: uuid::Uuid,
    user_role: UserRole,
}

impl AuthenticatedUser {
    pub fn new(user_id: uuid::Uuid, user_role: UserRole) -> Self {
        Self { user_id, user_role }
    }

    /// Actor for lookups the server makes on its own behalf (sign-in, CLI).
    pub fn system() -> Self {
        Self {
            user_role: UserRole::SuperAdmin,
            user_id: uuid::Uuid::max(),
        }
    }

    pub fn user_id(&self) -> uuid::Uuid {
        self.user_id
    }

    pub fn user_role(&self) -> UserRole {
        self.user_role
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    Viewer,
    #[default]
    Learner,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Viewer => "viewer",
            Self::Learner => "learner",
        }
    }
}

impl From<&str> for UserRole {
    fn from(value: &str) -> Self {
        match value {
            "super_admin" => Self::SuperAdmin,
            "admin" => Self::Admin,
            "viewer" => Self::Viewer,
            _ => Self::Learner,
        }
    }
}

/// Strict parsing for operator input; unknown names are rejected.
impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            "learner" => Ok(Self::Learner),
            other => Err(format!(
                "unknown role `{other}`, expected super_admin, admin, viewer or learner"
            )),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    maybe_user: Option<AuthenticatedUser>,
}

impl RequestContext {
    pub fn new(maybe_user: Option<AuthenticatedUser>) -> Self {
        Self { maybe_user }
    }

    pub fn maybe_user(&self) -> Option<&AuthenticatedUser> {
        self.maybe_user.as_ref()
    }

    pub fn user(&self) -> WebResult<&AuthenticatedUser> {
        self.maybe_user.as_ref().ok_or(WebError::auth_required())
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts.extensions.get::<RequestContext>();
        if let Some(ctx) = ctx {
            Ok(ctx.clone())
        } else {
            Ok(RequestContext::new(None))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn role_text_round_trips() {
        for role in [
            UserRole::SuperAdmin,
            UserRole::Admin,
            UserRole::Viewer,
            UserRole::Learner,
        ] {
            assert_eq!(UserRole::from(role.to_string().as_str()), role);
        }
    }

    #[test]
    fn unknown_role_is_learner() {
        assert_eq!(UserRole::from("owner"), UserRole::Learner);
        assert_eq!(UserRole::from(""), UserRole::Learner);
    }

    #[test]
    fn operator_input_must_name_a_role() {
        assert_eq!("admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert!("superadmin".parse::<UserRole>().is_err());
    }

    #[test]
    fn context_without_user_requires_auth() {
        let ctx = RequestContext::new(None);
        assert!(matches!(
            ctx.user(),
            Err(WebError::AuthenticationError(_))
        ));
    }
}
