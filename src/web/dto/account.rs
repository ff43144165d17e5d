use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{model::entity::UserEntity, web::UserRole};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SigninBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub role: UserRole,
}

impl AccountResponse {
    pub fn new(user: &UserEntity, role: UserRole) -> Self {
        Self {
            id: user.id(),
            email: user.email().to_string(),
            display_name: user.display_name().map(str::to_string),
            role,
        }
    }
}
