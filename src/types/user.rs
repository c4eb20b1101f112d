//! User record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Record id
    pub id: Uuid,
    /// Full name
    pub name: String,
    /// Phone number in international format
    pub phone: String,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /user`
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Full name; at least two words
    pub name: String,
    /// Phone number in international format, e.g. +256751124310
    pub phone: String,
}

/// Response body for `POST /user`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    /// Whether a record was written
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// The saved record on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,
}

impl RegisterResponse {
    /// A successful registration
    pub fn saved(user: UserRecord) -> Self {
        Self {
            success: true,
            message: "User data saved".to_string(),
            user: Some(user),
        }
    }

    /// A non-fatal refusal, e.g. a duplicate phone number
    pub fn refused(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            user: None,
        }
    }
}
