//! Mock implementation of PhoneVerificationRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::phone_verification::PhoneVerification;
use crate::errors::DomainError;

use super::repository::PhoneVerificationRepository;

/// In-memory phone verification repository for tests
#[derive(Clone)]
pub struct MockPhoneVerificationRepository {
    records: Arc<RwLock<HashMap<Uuid, PhoneVerification>>>,
    /// When set, every operation fails with an internal error
    fail: Arc<RwLock<bool>>,
}

impl MockPhoneVerificationRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            fail: Arc::new(RwLock::new(false)),
        }
    }

    /// Make every subsequent operation fail (for degradation tests)
    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Fetch a record by id (test helper)
    pub async fn get(&self, id: Uuid) -> Option<PhoneVerification> {
        self.records.read().await.get(&id).cloned()
    }

    async fn check_fail(&self) -> Result<(), DomainError> {
        if *self.fail.read().await {
            return Err(DomainError::Internal {
                message: "simulated repository failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockPhoneVerificationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PhoneVerificationRepository for MockPhoneVerificationRepository {
    async fn create(&self, record: PhoneVerification) -> Result<PhoneVerification, DomainError> {
        self.check_fail().await?;
        let mut records = self.records.write().await;
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_latest_active(
        &self,
        user_id: Uuid,
        phone: &str,
    ) -> Result<Option<PhoneVerification>, DomainError> {
        self.check_fail().await?;
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.user_id == user_id && r.phone == phone && r.is_active())
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn find_recent(
        &self,
        user_id: Uuid,
        phone: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<PhoneVerification>, DomainError> {
        self.check_fail().await?;
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.user_id == user_id && r.phone == phone && r.created_at >= since)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn update(&self, record: &PhoneVerification) -> Result<(), DomainError> {
        self.check_fail().await?;
        let mut records = self.records.write().await;
        match records.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(DomainError::Internal {
                message: format!("verification record not found: {}", record.id),
            }),
        }
    }

    async fn delete_expired_unverified(&self) -> Result<u64, DomainError> {
        self.check_fail().await?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.verified || !r.is_expired());
        Ok((before - records.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_create_and_find_latest_active() {
        let repo = MockPhoneVerificationRepository::new();
        let user_id = Uuid::new_v4();

        let record = PhoneVerification::new(user_id, "+905551234567".to_string());
        repo.create(record.clone()).await.unwrap();

        let found = repo
            .find_latest_active(user_id, "+905551234567")
            .await
            .unwrap();
        assert_eq!(found.map(|r| r.id), Some(record.id));
    }

    #[tokio::test]
    async fn test_find_latest_active_skips_expired_and_verified() {
        let repo = MockPhoneVerificationRepository::new();
        let user_id = Uuid::new_v4();
        let phone = "+905551234567".to_string();

        let mut expired = PhoneVerification::new(user_id, phone.clone());
        expired.expires_at = Utc::now() - Duration::seconds(1);
        repo.create(expired).await.unwrap();

        let mut verified = PhoneVerification::new(user_id, phone.clone());
        verified.mark_verified();
        repo.create(verified).await.unwrap();

        assert!(repo
            .find_latest_active(user_id, &phone)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_find_latest_active_prefers_newest() {
        let repo = MockPhoneVerificationRepository::new();
        let user_id = Uuid::new_v4();
        let phone = "+905551234567".to_string();

        let mut older = PhoneVerification::new(user_id, phone.clone());
        older.created_at = Utc::now() - Duration::minutes(2);
        repo.create(older).await.unwrap();

        let newer = PhoneVerification::new(user_id, phone.clone());
        let newer_id = newer.id;
        repo.create(newer).await.unwrap();

        let found = repo.find_latest_active(user_id, &phone).await.unwrap();
        assert_eq!(found.map(|r| r.id), Some(newer_id));
    }

    #[tokio::test]
    async fn test_delete_expired_unverified() {
        let repo = MockPhoneVerificationRepository::new();
        let user_id = Uuid::new_v4();

        let mut expired = PhoneVerification::new(user_id, "+905551111111".to_string());
        expired.expires_at = Utc::now() - Duration::seconds(1);
        repo.create(expired).await.unwrap();

        let mut expired_but_verified =
            PhoneVerification::new(user_id, "+905552222222".to_string());
        expired_but_verified.expires_at = Utc::now() - Duration::seconds(1);
        expired_but_verified.mark_verified();
        repo.create(expired_but_verified).await.unwrap();

        let active = PhoneVerification::new(user_id, "+905553333333".to_string());
        repo.create(active).await.unwrap();

        let removed = repo.delete_expired_unverified().await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_update_missing_record_fails() {
        let repo = MockPhoneVerificationRepository::new();
        let record = PhoneVerification::new(Uuid::new_v4(), "+905551234567".to_string());
        assert!(repo.update(&record).await.is_err());
    }
}
