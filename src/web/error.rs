use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::{
    auth::CryptError,
    error::log_error,
    form::FormError,
    model::{DatabaseError, ResourceType},
    web::UserRole,
};

pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("AuthenticationCookieInvalid, cookie: {cookie}. Error: {error}")]
    AuthenticationCookieInvalid {
        cookie: String,
        error: jsonwebtoken::errors::Error,
    },

    #[error("AuthenticationSubjectInvalid, subject: {subject}")]
    AuthenticationSubjectInvalid { subject: String },

    #[error("AuthenticationRequired")]
    AuthenticationRequired,

    #[error("AuthenticationInvalidCredentials")]
    AuthenticationInvalidCredentials,
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("AccessForbidden, role: {role}")]
    AccessForbidden { role: UserRole },

    #[error("AccessConfirmationRequired: {resource_type:?}")]
    AccessConfirmationRequired { resource_type: ResourceType },
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("ResourceNotFound: {resource_type:?}")]
    ResourceNotFound { resource_type: ResourceType },

    #[error("ResourceFetchError: {resource_type:?}. Error: {error}")]
    ResourceFetchError {
        resource_type: ResourceType,
        error: DatabaseError,
    },

    #[error("ResourceWriteError: {resource_type:?}. Error: {error}")]
    ResourceWriteError {
        resource_type: ResourceType,
        error: DatabaseError,
    },

    #[error("ResourceBadRequest: {resource_type:?}. {detail}")]
    ResourceBadRequest {
        resource_type: ResourceType,
        detail: String,
    },
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("ServerCryptError: {0}")]
    ServerCryptError(#[from] crate::auth::CryptError),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    pub fn client_display(&self) -> String {
        String::from("Internal server error.")
    }
}

impl AuthenticationError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::AuthenticationCookieInvalid { .. } | Self::AuthenticationSubjectInvalid { .. } => {
                String::from("Authentication error, session invalid or expired.")
            }
            Self::AuthenticationRequired => String::from("Authentication required."),
            Self::AuthenticationInvalidCredentials => {
                String::from("Authentication error, user not found or password is invalid.")
            }
        }
    }
}

impl AccessError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AccessForbidden { .. } => StatusCode::FORBIDDEN,
            Self::AccessConfirmationRequired { .. } => StatusCode::PRECONDITION_REQUIRED,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::AccessForbidden { .. } => {
                String::from("Access error, your role is not allowed to do this.")
            }
            Self::AccessConfirmationRequired { .. } => {
                String::from("Deletion not confirmed, nothing was changed.")
            }
        }
    }
}

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ResourceFetchError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ResourceWriteError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ResourceBadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceNotFound { .. } => String::from("Resource error, resource not found."),
            Self::ResourceFetchError { .. } => {
                String::from("Resource error, unable to fetch resource.")
            }
            Self::ResourceWriteError { error, .. } => error.backend_message(),
            Self::ResourceBadRequest { detail, .. } => {
                format!("Resource error, bad request: {detail}")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("ResourceError - {0}")]
    ResourceError(#[from] ResourceError),
    #[error("AuthenticationError - {0}")]
    AuthenticationError(#[from] AuthenticationError),
    #[error("AccessError - {0}")]
    AccessError(#[from] AccessError),
    #[error("ServerError - {0}")]
    ServerError(#[from] ServerError),
}

impl WebError {
    pub fn resource_not_found(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceNotFound {
            resource_type: r#type,
        })
    }

    pub fn resource_fetch_error(r#type: ResourceType, error: DatabaseError) -> Self {
        Self::ResourceError(ResourceError::ResourceFetchError {
            resource_type: r#type,
            error,
        })
    }

    pub fn resource_write_error(r#type: ResourceType, error: DatabaseError) -> Self {
        Self::ResourceError(ResourceError::ResourceWriteError {
            resource_type: r#type,
            error,
        })
    }

    pub fn resource_bad_request<S: Into<String>>(r#type: ResourceType, detail: S) -> Self {
        Self::ResourceError(ResourceError::ResourceBadRequest {
            resource_type: r#type,
            detail: detail.into(),
        })
    }

    pub fn form_rejected(r#type: ResourceType, error: FormError) -> Self {
        Self::resource_bad_request(r#type, error.to_string())
    }

    pub fn auth_cookie_invalid<S: Into<String>>(
        cookie: S,
        error: jsonwebtoken::errors::Error,
    ) -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationCookieInvalid {
            cookie: cookie.into(),
            error,
        })
    }

    pub fn auth_subject_invalid<S: Into<String>>(subject: S) -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationSubjectInvalid {
            subject: subject.into(),
        })
    }

    pub fn auth_required() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationRequired)
    }

    pub fn auth_invalid_credentials() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationInvalidCredentials)
    }

    pub fn access_forbidden(role: UserRole) -> Self {
        Self::AccessError(AccessError::AccessForbidden { role })
    }

    pub fn confirmation_required(r#type: ResourceType) -> Self {
        Self::AccessError(AccessError::AccessConfirmationRequired {
            resource_type: r#type,
        })
    }

    pub fn server_crypt_error(e: CryptError) -> Self {
        Self::ServerError(ServerError::ServerCryptError(e))
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            Self::ResourceError(e) => e.status_code(),
            Self::AuthenticationError(e) => e.status_code(),
            Self::AccessError(e) => e.status_code(),
            Self::ServerError(e) => e.status_code(),
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceError(e) => e.client_display(),
            Self::AuthenticationError(e) => e.client_display(),
            Self::AccessError(e) => e.client_display(),
            Self::ServerError(e) => e.client_display(),
        }
    }

    fn is_declined(&self) -> bool {
        matches!(
            self,
            Self::AccessError(AccessError::AccessConfirmationRequired { .. })
        )
    }
}

#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message for the client
    pub message: String,
    /// HTTP status code (stringified)
    pub status_code: String,
    /// Optional debug details (only in debug mode)
    pub details: Option<String>,
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        if self.is_declined() {
            tracing::debug!("{}", self);
        } else {
            log_error(&self);
        }

        let status_code = self.status_code();
        let display = self.client_display();

        let body = ErrorResponse {
            message: display,
            status_code: status_code.as_str().to_string(),
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        };

        (status_code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::form::Path;

    #[test]
    fn form_errors_are_bad_requests() {
        let err = WebError::form_rejected(
            ResourceType::Lesson,
            FormError::UnknownPath("nope".parse::<Path>().unwrap()),
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.client_display().contains("nope"));
    }

    #[test]
    fn unconfirmed_delete_is_precondition_required() {
        let err = WebError::confirmation_required(ResourceType::Course);
        assert_eq!(err.status_code(), StatusCode::PRECONDITION_REQUIRED);
        assert!(err.is_declined());
    }

    #[test]
    fn write_errors_surface_backend_text() {
        let err = WebError::resource_write_error(
            ResourceType::Course,
            DatabaseError::SqlxError(sqlx::Error::RowNotFound),
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_display(), sqlx::Error::RowNotFound.to_string());
    }

    #[test]
    fn write_errors_share_one_status() {
        let protocol = WebError::resource_write_error(
            ResourceType::Lesson,
            DatabaseError::SqlxError(sqlx::Error::Protocol(String::from("unexpected message"))),
        );
        let serde = WebError::resource_write_error(
            ResourceType::Lesson,
            DatabaseError::SerdeError(serde_json::from_str::<u8>("x").unwrap_err()),
        );
        assert_eq!(protocol.status_code(), serde.status_code());
        assert_eq!(
            protocol.client_display(),
            sqlx::Error::Protocol(String::from("unexpected message")).to_string()
        );
    }

    #[test]
    fn fetch_errors_hide_backend_text() {
        let err = WebError::resource_fetch_error(
            ResourceType::Course,
            DatabaseError::SqlxError(sqlx::Error::RowNotFound),
        );
        assert_eq!(err.client_display(), "Resource error, unable to fetch resource.");
    }

    #[test]
    fn auth_errors_are_unauthorized() {
        assert_eq!(WebError::auth_required().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            WebError::access_forbidden(UserRole::Viewer).status_code(),
            StatusCode::FORBIDDEN
        );
    }
}
