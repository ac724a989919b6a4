//! Phone verification repository trait defining the persistence interface
//! for verification records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::phone_verification::PhoneVerification;
use crate::errors::DomainError;

/// Repository trait for PhoneVerification persistence operations
///
/// Implementations handle the actual database operations while keeping the
/// abstraction boundary between the domain and infrastructure layers.
#[async_trait]
pub trait PhoneVerificationRepository: Send + Sync {
    /// Persist a new verification record
    async fn create(&self, record: PhoneVerification) -> Result<PhoneVerification, DomainError>;

    /// Find the newest unverified, unexpired record for a (user, phone) pair
    ///
    /// # Returns
    /// * `Ok(Some(record))` - An active record exists
    /// * `Ok(None)` - No active record for this pair
    async fn find_latest_active(
        &self,
        user_id: Uuid,
        phone: &str,
    ) -> Result<Option<PhoneVerification>, DomainError>;

    /// Find the newest record for a (user, phone) pair created at or after
    /// `since`, regardless of its verification state. Used for the resend
    /// cooldown check.
    async fn find_recent(
        &self,
        user_id: Uuid,
        phone: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<PhoneVerification>, DomainError>;

    /// Persist changes to an existing record (attempt counter, verified flag)
    async fn update(&self, record: &PhoneVerification) -> Result<(), DomainError>;

    /// Bulk-delete all records that are both expired and still unverified
    ///
    /// # Returns
    /// The number of records removed
    async fn delete_expired_unverified(&self) -> Result<u64, DomainError>;
}
