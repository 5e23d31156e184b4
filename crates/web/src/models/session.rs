//! Session-related types.
//!
//! Types stored in the session to identify the signed-in user.

use serde::{Deserialize, Serialize};

use sous_chef_core::{UserId, Username};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the current user. Handlers
/// receive it through the `RequireUser` / `OptionalUser` extractors and pass
/// the ID on explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's display handle.
    pub username: Username,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";
}
