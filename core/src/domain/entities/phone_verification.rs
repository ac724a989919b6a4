//! Phone verification record entity for SMS-based phone ownership proof.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of verification attempts allowed per code
pub const MAX_ATTEMPTS: i32 = 3;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for verification codes (10 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 10;

/// A single phone verification record
///
/// At most one *active* (unverified, unexpired) record is treated as current
/// per (user, phone) pair; the service always queries the most recent one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneVerification {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Phone number the code was sent to (E.164-normalized)
    pub phone: String,

    /// The 6-digit verification code
    pub code: String,

    /// Number of verification attempts made against this code
    pub attempts: i32,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,

    /// Whether the code has been successfully verified
    pub verified: bool,

    /// Timestamp of successful verification
    pub verified_at: Option<DateTime<Utc>>,
}

impl PhoneVerification {
    /// Creates a new verification record with a cryptographically secure
    /// random 6-digit code and the default expiration window.
    pub fn new(user_id: Uuid, phone: String) -> Self {
        Self::new_with_expiration(user_id, phone, DEFAULT_EXPIRATION_MINUTES)
    }

    /// Creates a new verification record with a custom expiration time
    pub fn new_with_expiration(user_id: Uuid, phone: String, expiration_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            phone,
            code: Self::generate_code(),
            attempts: 0,
            created_at: now,
            expires_at: now + Duration::minutes(expiration_minutes),
            verified: false,
            verified_at: None,
        }
    }

    /// Generates a random 6-digit code in the range [100000, 999999]
    /// using the OS CSPRNG.
    pub fn generate_code() -> String {
        let code: u32 = OsRng.gen_range(100_000..=999_999);
        format!("{}", code)
    }

    /// Checks if the verification code has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// A record is active while it is unverified and unexpired
    pub fn is_active(&self) -> bool {
        !self.verified && !self.is_expired()
    }

    /// Whether the attempt budget for this code is spent
    pub fn attempts_exhausted(&self) -> bool {
        self.attempts >= MAX_ATTEMPTS
    }

    /// Remaining verification attempts (0 if exhausted)
    pub fn remaining_attempts(&self) -> i32 {
        (MAX_ATTEMPTS - self.attempts).max(0)
    }

    /// Marks the record as verified now
    pub fn mark_verified(&mut self) {
        self.verified = true;
        self.verified_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_active() {
        let record = PhoneVerification::new(Uuid::new_v4(), "+905551234567".to_string());

        assert_eq!(record.phone, "+905551234567");
        assert_eq!(record.code.len(), CODE_LENGTH);
        assert_eq!(record.attempts, 0);
        assert!(!record.verified);
        assert!(record.verified_at.is_none());
        assert!(record.is_active());
        assert_eq!(
            record.expires_at,
            record.created_at + Duration::minutes(DEFAULT_EXPIRATION_MINUTES)
        );
    }

    #[test]
    fn test_generate_code_range() {
        for _ in 0..100 {
            let code = PhoneVerification::generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            let num: u32 = code.parse().expect("code should be numeric");
            assert!((100_000..=999_999).contains(&num));
        }
    }

    #[test]
    fn test_code_uniqueness() {
        let codes: Vec<String> = (0..100)
            .map(|_| PhoneVerification::generate_code())
            .collect();
        let unique = codes.iter().collect::<std::collections::HashSet<_>>().len();
        assert!(unique > 1);
    }

    #[test]
    fn test_expired_record_is_not_active() {
        let mut record = PhoneVerification::new(Uuid::new_v4(), "+905551234567".to_string());
        record.expires_at = Utc::now() - Duration::seconds(1);

        assert!(record.is_expired());
        assert!(!record.is_active());
    }

    #[test]
    fn test_verified_record_is_not_active() {
        let mut record = PhoneVerification::new(Uuid::new_v4(), "+905551234567".to_string());
        record.mark_verified();

        assert!(record.verified);
        assert!(record.verified_at.is_some());
        assert!(!record.is_active());
    }

    #[test]
    fn test_remaining_attempts() {
        let mut record = PhoneVerification::new(Uuid::new_v4(), "+905551234567".to_string());
        assert_eq!(record.remaining_attempts(), MAX_ATTEMPTS);

        record.attempts = 2;
        assert_eq!(record.remaining_attempts(), 1);
        assert!(!record.attempts_exhausted());

        record.attempts = MAX_ATTEMPTS;
        assert_eq!(record.remaining_attempts(), 0);
        assert!(record.attempts_exhausted());
    }
}
