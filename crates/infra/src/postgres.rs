//! Postgres-backed identity store (feature `postgres`).
//!
//! Every lookup uses parameterized queries; identifiers are bound, never
//! interpolated into SQL text.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use campus_auth::{Identity, IdentityStore, Role, StoreError, UserStatus};
use campus_core::UserId;

pub struct PostgresIdentityStore {
    pool: PgPool,
}

impl PostgresIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn roles_of(&self, user_id: UserId) -> Result<Vec<Role>, StoreError> {
        let rows = sqlx::query("SELECT role FROM user_roles WHERE user_id = $1 ORDER BY role")
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("load_roles", e))?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("role")
                    .map(Role::new)
                    .map_err(|e| StoreError::Query(format!("role column: {e}")))
            })
            .collect()
    }

    async fn identity_from_row(&self, row: sqlx::postgres::PgRow) -> Result<Identity, StoreError> {
        let id: uuid::Uuid = column(&row, "id")?;
        let token_version: i32 = column(&row, "token_version")?;

        Ok(Identity {
            id: UserId::from_uuid(id),
            email: column(&row, "email")?,
            status: parse_status(&column::<String>(&row, "status")?)?,
            tenant_id: campus_core::TenantId::from_uuid(column(&row, "tenant_id")?),
            node_id: column::<Option<uuid::Uuid>>(&row, "node_id")?
                .map(campus_core::NodeId::from_uuid),
            roles: self.roles_of(UserId::from_uuid(id)).await?,
            token_version: token_version.max(0) as u32,
        })
    }
}

fn column<'r, T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>>(
    row: &'r sqlx::postgres::PgRow,
    name: &str,
) -> Result<T, StoreError> {
    row.try_get(name)
        .map_err(|e| StoreError::Query(format!("{name} column: {e}")))
}

fn parse_status(raw: &str) -> Result<UserStatus, StoreError> {
    match raw {
        "ACTIVE" => Ok(UserStatus::Active),
        "SUSPENDED" => Ok(UserStatus::Suspended),
        "DEACTIVATED" => Ok(UserStatus::Deactivated),
        other => Err(StoreError::Query(format!("unknown user status {other:?}"))),
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(format!("{operation}: {err}"))
        }
        other => StoreError::Query(format!("{operation}: {other}")),
    }
}

const SELECT_IDENTITY: &str =
    "SELECT id, email, status, tenant_id, node_id, token_version FROM users";

#[async_trait]
impl IdentityStore for PostgresIdentityStore {
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query(&format!("{SELECT_IDENTITY} WHERE id = $1"))
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        match row {
            Some(row) => Ok(Some(self.identity_from_row(row).await?)),
            None => Ok(None),
        }
    }

    async fn bump_token_version(&self, user_id: UserId) -> Result<Option<u32>, StoreError> {
        // Single-statement increment: atomic, and acknowledged writes are
        // visible to every subsequent read.
        let row = sqlx::query(
            "UPDATE users SET token_version = token_version + 1 WHERE id = $1 RETURNING token_version",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("bump_token_version", e))?;

        row.map(|r| {
            r.try_get::<i32, _>("token_version")
                .map(|v| v.max(0) as u32)
                .map_err(|e| StoreError::Query(format!("token_version column: {e}")))
        })
        .transpose()
    }
}
