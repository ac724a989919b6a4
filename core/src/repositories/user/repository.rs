//! User repository trait - the persistence interface for the phone
//! verification fields of the user record.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for the user-side effects of phone verification
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Record a successful phone verification on the user profile
    ///
    /// Sets `phone`, `phone_verified = true` and `phone_verified_at = at`
    /// in a single write.
    async fn mark_phone_verified(
        &self,
        user_id: Uuid,
        phone: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError>;
}
