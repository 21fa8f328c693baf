//! Storage key layout. Values under every key are JSON text.

pub const COMPLAINTS: &str = "complaints";
pub const REGISTERED_USERS: &str = "registeredUsers";

/// Key holding the password hash of a registered user.
pub fn password(user_id: &str) -> String {
    format!("user_{}_password", user_id)
}
