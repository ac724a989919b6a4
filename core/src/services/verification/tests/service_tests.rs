//! Behavioral tests for the phone verification service

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::phone_verification::PhoneVerification;
use crate::domain::entities::user::User;
use crate::errors::SmsError;
use crate::repositories::{
    MockPhoneVerificationRepository, MockUserRepository, PhoneVerificationRepository,
    UserRepository,
};
use crate::services::verification::config::VerificationConfig;
use crate::services::verification::service::PhoneVerificationService;

use super::mocks::RecordingSmsService;

struct Fixture {
    service: PhoneVerificationService,
    sms: RecordingSmsService,
    verifications: MockPhoneVerificationRepository,
    users: MockUserRepository,
    user_id: Uuid,
}

async fn fixture(config: VerificationConfig) -> Fixture {
    let sms = RecordingSmsService::new();
    let verifications = MockPhoneVerificationRepository::new();
    let users = MockUserRepository::new();

    let user_id = Uuid::new_v4();
    users.insert(User::new(user_id)).await;

    let service = PhoneVerificationService::new(
        Arc::new(sms.clone()),
        Arc::new(verifications.clone()),
        Arc::new(users.clone()),
        config,
    );

    Fixture {
        service,
        sms,
        verifications,
        users,
        user_id,
    }
}

#[tokio::test]
async fn test_send_then_verify_succeeds() {
    let f = fixture(VerificationConfig::default().without_rate_limiting()).await;

    let sent = f.service.send_verification_code(f.user_id, "05551234567").await;
    assert!(sent.success, "{}", sent.message);
    assert!(sent.expires_at.is_some());

    let code = f.sms.last_code().await.expect("a code should have been sent");
    let result = f.service.verify_code(f.user_id, "05551234567", &code).await;

    assert!(result.success);
    assert!(result.verified);

    let user = f.users.find_by_id(f.user_id).await.unwrap().unwrap();
    assert!(user.phone_verified);
    assert_eq!(user.phone.as_deref(), Some("+905551234567"));
    assert!(user.phone_verified_at.is_some());
}

#[tokio::test]
async fn test_send_normalizes_destination() {
    let f = fixture(VerificationConfig::default().without_rate_limiting()).await;

    f.service.send_verification_code(f.user_id, "05551234567").await;
    assert_eq!(
        f.sms.last_destination().await.as_deref(),
        Some("+905551234567")
    );
}

#[tokio::test]
async fn test_send_sets_ten_minute_expiry() {
    let f = fixture(VerificationConfig::default().without_rate_limiting()).await;

    let before = Utc::now();
    let sent = f.service.send_verification_code(f.user_id, "05551234567").await;
    let expires_at = sent.expires_at.unwrap();

    assert!(expires_at >= before + Duration::minutes(10));
    assert!(expires_at <= Utc::now() + Duration::minutes(10));
}

#[tokio::test]
async fn test_send_rejects_invalid_phone() {
    let f = fixture(VerificationConfig::default()).await;

    let result = f.service.send_verification_code(f.user_id, "not a phone").await;
    assert!(!result.success);
    assert_eq!(result.message, "Invalid phone number format");
    assert_eq!(f.sms.sent_count().await, 0);
}

#[tokio::test]
async fn test_verify_with_different_spelling_of_same_number() {
    let f = fixture(VerificationConfig::default().without_rate_limiting()).await;

    f.service.send_verification_code(f.user_id, "05551234567").await;
    let code = f.sms.last_code().await.unwrap();

    // 905551234567 normalizes to the same +905551234567.
    let result = f.service.verify_code(f.user_id, "905551234567", &code).await;
    assert!(result.success);
}

#[tokio::test]
async fn test_wrong_code_reports_remaining_attempts() {
    let f = fixture(VerificationConfig::default().without_rate_limiting()).await;

    f.service.send_verification_code(f.user_id, "05551234567").await;

    let result = f.service.verify_code(f.user_id, "05551234567", "000000").await;
    assert!(!result.success);
    assert_eq!(result.remaining_attempts, Some(2));
    assert!(result.message.contains("2 attempts remaining"));

    // A correct code still works after a single miss.
    let code = f.sms.last_code().await.unwrap();
    let result = f.service.verify_code(f.user_id, "05551234567", &code).await;
    assert!(result.success);
}

#[tokio::test]
async fn test_three_misses_exhaust_the_code() {
    let f = fixture(VerificationConfig::default().without_rate_limiting()).await;

    f.service.send_verification_code(f.user_id, "05551234567").await;
    let code = f.sms.last_code().await.unwrap();

    for expected_remaining in [2, 1, 0] {
        let result = f.service.verify_code(f.user_id, "05551234567", "000000").await;
        assert!(!result.success);
        assert_eq!(result.remaining_attempts, Some(expected_remaining));
    }

    // Even the correct code is now rejected until a new one is requested.
    let result = f.service.verify_code(f.user_id, "05551234567", &code).await;
    assert!(!result.success);
    assert!(result.message.contains("request a new code"));
}

#[tokio::test]
async fn test_verify_without_active_code() {
    let f = fixture(VerificationConfig::default()).await;

    let result = f.service.verify_code(f.user_id, "05551234567", "123456").await;
    assert!(!result.success);
    assert!(result.message.contains("request a new code"));
}

#[tokio::test]
async fn test_resend_within_cooldown_is_throttled() {
    let f = fixture(VerificationConfig::default()).await;

    let first = f.service.send_verification_code(f.user_id, "05551234567").await;
    assert!(first.success);

    let second = f.service.send_verification_code(f.user_id, "05551234567").await;
    assert!(!second.success);
    let cooldown = second.cooldown_seconds.expect("cooldown should be reported");
    assert!(cooldown > 0 && cooldown <= 60);
    assert_eq!(f.sms.sent_count().await, 1);
}

#[tokio::test]
async fn test_resend_allowed_when_rate_limiting_disabled() {
    let f = fixture(VerificationConfig::default().without_rate_limiting()).await;

    assert!(f.service.send_verification_code(f.user_id, "05551234567").await.success);
    assert!(f.service.send_verification_code(f.user_id, "05551234567").await.success);
    assert_eq!(f.sms.sent_count().await, 2);
}

#[tokio::test]
async fn test_cooldown_is_per_user_phone_pair() {
    let f = fixture(VerificationConfig::default()).await;

    assert!(f.service.send_verification_code(f.user_id, "05551234567").await.success);
    // A different phone for the same user is not throttled.
    assert!(f.service.send_verification_code(f.user_id, "05559876543").await.success);
}

#[tokio::test]
async fn test_provider_failure_keeps_pending_record() {
    let f = fixture(VerificationConfig::default().without_rate_limiting()).await;

    f.sms
        .fail_with(SmsError::Delivery {
            message: "gateway unavailable".to_string(),
            retry_after_seconds: Some(30),
        })
        .await;

    let result = f.service.send_verification_code(f.user_id, "05551234567").await;
    assert!(!result.success);
    assert_eq!(result.cooldown_seconds, Some(30));

    // The unverified record remains and is superseded by the next send.
    assert_eq!(f.verifications.len().await, 1);
    let retry = f.service.send_verification_code(f.user_id, "05551234567").await;
    assert!(retry.success);
}

#[tokio::test]
async fn test_repository_failure_degrades_gracefully() {
    let f = fixture(VerificationConfig::default().without_rate_limiting()).await;
    f.verifications.set_fail(true).await;

    let result = f.service.send_verification_code(f.user_id, "05551234567").await;
    assert!(!result.success);
    assert!(result.message.contains("try again later"));
}

#[tokio::test]
async fn test_is_phone_verified() {
    let f = fixture(VerificationConfig::default().without_rate_limiting()).await;

    assert!(!f.service.is_phone_verified(f.user_id, "05551234567").await);

    f.service.send_verification_code(f.user_id, "05551234567").await;
    let code = f.sms.last_code().await.unwrap();
    f.service.verify_code(f.user_id, "05551234567", &code).await;

    assert!(f.service.is_phone_verified(f.user_id, "05551234567").await);
    // Same number in a different spelling still counts.
    assert!(f.service.is_phone_verified(f.user_id, "905551234567").await);
    // A different number does not.
    assert!(!f.service.is_phone_verified(f.user_id, "05559876543").await);
}

#[tokio::test]
async fn test_cleanup_removes_expired_unverified_records() {
    let f = fixture(VerificationConfig::default()).await;

    let mut expired = PhoneVerification::new(f.user_id, "+905551234567".to_string());
    expired.expires_at = Utc::now() - Duration::seconds(1);
    f.verifications.create(expired).await.unwrap();

    let removed = f.service.cleanup_expired_verifications().await;
    assert_eq!(removed, 1);
    assert_eq!(f.verifications.len().await, 0);
}
