//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// Accounts, keyed by account ID
    pub const ACCOUNTS: &str = "auth-users";
    /// Email reservations pointing at an account, keyed by encoded email
    pub const EMAILS: &str = "auth-emails";
    /// Fitness profiles, keyed by encoded email
    pub const PROFILES: &str = "user-profiles";
    /// Leaderboard entries, keyed by encoded email
    pub const LEADERBOARD: &str = "leaderboard";
}

/// Document ID for rows keyed by email.
///
/// Firestore IDs may not contain `/`, so the email is percent-encoded.
pub fn email_doc_id(email: &str) -> String {
    urlencoding::encode(&email.trim().to_lowercase()).into_owned()
}
