use farmgate_auth::Role;
use farmgate_core::UserId;

/// Authenticated request context derived from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: UserId,
    pub username: String,
    pub roles: Vec<Role>,
}

impl AuthContext {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == role)
    }
}
