//! Row types for the `users` table and the session payload.

use serde::{Deserialize, Serialize};

/// Account role as stored in the `role` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Moderator,
    User,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Role::Administrator => "administrator",
            Role::Moderator => "moderator",
            Role::User => "user",
        })
    }
}

/// Full row of the `users` table. The plaintext `password` column is part
/// of the record on purpose; the detail page displays it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub created_at: String,
}

/// Narrow projection backing the listing page.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// The cookie-borne session payload. Fixed shape, string values only.
///
/// Constructed fresh on every save; nothing ties it to an authenticated
/// identity, and nothing signs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub user: String,
    pub role: String,
    pub timestamp: String,
}

impl SessionPayload {
    /// The demo payload written by `/session/save`.
    pub fn sample() -> Self {
        Self {
            user: "guest".to_string(),
            role: "user".to_string(),
            timestamp: "2026-02-14".to_string(),
        }
    }
}
