//! User entity - the slice of the account record owned by phone verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account fields relevant to phone verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Verified phone number in E.164 format, if any
    pub phone: Option<String>,

    /// Whether the phone number has been verified
    pub phone_verified: bool,

    /// Timestamp of the successful verification
    pub phone_verified_at: Option<DateTime<Utc>>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with no verified phone
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            phone: None,
            phone_verified: false,
            phone_verified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records a successfully verified phone number
    pub fn set_phone_verified(&mut self, phone: String, at: DateTime<Utc>) {
        self.phone = Some(phone);
        self.phone_verified = true;
        self.phone_verified_at = Some(at);
        self.updated_at = at;
    }
}
