use crate::model::{ModelManager, ResourceType, ResourceTyped, error::DatabaseResult};
use crate::web::{AuthenticatedUser, UserRole};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// A user's role, optionally scoped to an organization. One row per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserOrganizationRole {
    id: Uuid,
    user_id: Uuid,
    organization_id: Option<Uuid>,
    role: String,
}

impl ResourceTyped for UserOrganizationRole {
    fn get_resource_type() -> ResourceType {
        ResourceType::Role
    }
}

impl UserOrganizationRole {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn organization_id(&self) -> Option<Uuid> {
        self.organization_id
    }

    pub fn role(&self) -> UserRole {
        UserRole::from(self.role.as_str())
    }

    pub async fn find_by_user(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            "SELECT id, user_id, organization_id, role FROM user_organization_roles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }

    /// Sets the role of `user_id`, replacing any previous one.
    pub async fn assign(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
        role: UserRole,
    ) -> DatabaseResult<Self> {
        let result = sqlx::query_as(
            r#"
            INSERT INTO user_organization_roles (id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE SET role = EXCLUDED.role, updated_at = now()
            RETURNING id, user_id, organization_id, role
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(role.to_string())
        .fetch_one(mm.executor())
        .await?;
        Ok(result)
    }
}
