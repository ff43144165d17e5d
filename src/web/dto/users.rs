use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{model::entity::UserWithRoleRow, web::UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserListItem {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    pub created_at: DateTime<Utc>,
}

impl From<UserWithRoleRow> for UserListItem {
    fn from(row: UserWithRoleRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            role: row.role.as_deref().map(UserRole::from),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct RoleUpdateBody {
    pub role: UserRole,
}
