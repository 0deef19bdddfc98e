pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_DEVOPS: &str = "DEVOPS";
pub const ROLE_SUPPORT: &str = "SUPPORT";
pub const ROLE_MEMBER: &str = "MEMBER";

/// A user of the network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}
