//! Account model for credential storage.

use serde::{Deserialize, Serialize};

/// Registered account stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Opaque account ID (also used as document ID and token subject)
    pub id: String,
    /// Email address, unique across accounts
    pub email: String,
    /// Display name shown on leaderboards
    pub username: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// When the account was registered (RFC3339)
    pub created_at: String,
}
