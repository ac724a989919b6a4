//! Mock implementation of UserRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

use super::repository::UserRepository;

/// In-memory user repository for tests
#[derive(Clone)]
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MockUserRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a user directly (test helper)
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn mark_phone_verified(
        &self,
        user_id: Uuid,
        phone: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user_id) {
            Some(user) => {
                user.set_phone_verified(phone.to_string(), at);
                Ok(())
            }
            None => Err(DomainError::Internal {
                message: format!("user not found: {}", user_id),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mark_phone_verified() {
        let repo = MockUserRepository::new();
        let user = User::new(Uuid::new_v4());
        let id = user.id;
        repo.insert(user).await;

        let at = Utc::now();
        repo.mark_phone_verified(id, "+905551234567", at)
            .await
            .unwrap();

        let user = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.phone.as_deref(), Some("+905551234567"));
        assert!(user.phone_verified);
        assert_eq!(user.phone_verified_at, Some(at));
    }

    #[tokio::test]
    async fn test_mark_phone_verified_unknown_user() {
        let repo = MockUserRepository::new();
        let result = repo
            .mark_phone_verified(Uuid::new_v4(), "+905551234567", Utc::now())
            .await;
        assert!(result.is_err());
    }
}
