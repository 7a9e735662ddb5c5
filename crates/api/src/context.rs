use campus_auth::{Claims, Role};
use campus_core::{TenantId, UserId};

/// Verified session for a request (decoded claim set).
///
/// Inserted into request extensions by the auth middleware; present on all
/// protected routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    claims: Claims,
}

impl SessionContext {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn user_id(&self) -> UserId {
        self.claims.user_id
    }

    pub fn tenant_id(&self) -> TenantId {
        self.claims.tenant_id
    }

    pub fn active_role(&self) -> &Role {
        &self.claims.active_role
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}
