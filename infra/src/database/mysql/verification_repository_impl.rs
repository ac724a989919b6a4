//! MySQL implementation of the PhoneVerificationRepository trait.
//!
//! Verification codes are stored in the `phone_verifications` table. Codes
//! are short-lived and low-entropy, so they are stored as-is; cleanup of
//! expired rows is handled by `delete_expired_unverified`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use nk_core::domain::entities::phone_verification::PhoneVerification;
use nk_core::errors::DomainError;
use nk_core::repositories::PhoneVerificationRepository;

/// MySQL implementation of PhoneVerificationRepository
pub struct MySqlPhoneVerificationRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlPhoneVerificationRepository {
    /// Create a new MySQL phone verification repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to PhoneVerification entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<PhoneVerification, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;

        let user_id: String = row.try_get("user_id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get user_id: {}", e),
        })?;

        Ok(PhoneVerification {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid verification UUID: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            phone: row.try_get("phone").map_err(|e| DomainError::Internal {
                message: format!("Failed to get phone: {}", e),
            })?,
            code: row.try_get("code").map_err(|e| DomainError::Internal {
                message: format!("Failed to get code: {}", e),
            })?,
            attempts: row.try_get("attempts").map_err(|e| DomainError::Internal {
                message: format!("Failed to get attempts: {}", e),
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get expires_at: {}", e),
                })?,
            verified: row.try_get("verified").map_err(|e| DomainError::Internal {
                message: format!("Failed to get verified: {}", e),
            })?,
            verified_at: row
                .try_get::<Option<DateTime<Utc>>, _>("verified_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get verified_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl PhoneVerificationRepository for MySqlPhoneVerificationRepository {
    async fn create(&self, record: PhoneVerification) -> Result<PhoneVerification, DomainError> {
        let query = r#"
            INSERT INTO phone_verifications (
                id, user_id, phone, code, attempts, created_at, expires_at, verified, verified_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(record.user_id.to_string())
            .bind(&record.phone)
            .bind(&record.code)
            .bind(record.attempts)
            .bind(record.created_at)
            .bind(record.expires_at)
            .bind(record.verified)
            .bind(record.verified_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to save verification record: {}", e),
            })?;

        Ok(record)
    }

    async fn find_latest_active(
        &self,
        user_id: Uuid,
        phone: &str,
    ) -> Result<Option<PhoneVerification>, DomainError> {
        let query = r#"
            SELECT id, user_id, phone, code, attempts, created_at, expires_at, verified, verified_at
            FROM phone_verifications
            WHERE user_id = ?
                AND phone = ?
                AND verified = FALSE
                AND expires_at > ?
            ORDER BY created_at DESC
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(user_id.to_string())
            .bind(phone)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find active verification: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_recent(
        &self,
        user_id: Uuid,
        phone: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<PhoneVerification>, DomainError> {
        let query = r#"
            SELECT id, user_id, phone, code, attempts, created_at, expires_at, verified, verified_at
            FROM phone_verifications
            WHERE user_id = ?
                AND phone = ?
                AND created_at >= ?
            ORDER BY created_at DESC
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(user_id.to_string())
            .bind(phone)
            .bind(since)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find recent verification: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, record: &PhoneVerification) -> Result<(), DomainError> {
        let query = r#"
            UPDATE phone_verifications
            SET attempts = ?, verified = ?, verified_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(record.attempts)
            .bind(record.verified)
            .bind(record.verified_at)
            .bind(record.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update verification record: {}", e),
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Internal {
                message: format!("Verification record {} not found", record.id),
            });
        }

        Ok(())
    }

    async fn delete_expired_unverified(&self) -> Result<u64, DomainError> {
        let query = r#"
            DELETE FROM phone_verifications
            WHERE verified = FALSE AND expires_at <= ?
        "#;

        let result = sqlx::query(query)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete expired verifications: {}", e),
            })?;

        Ok(result.rows_affected())
    }
}
