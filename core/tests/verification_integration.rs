//! End-to-end phone verification flow over the in-memory repositories

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use nk_core::domain::entities::user::User;
use nk_core::errors::SmsError;
use nk_core::repositories::{MockPhoneVerificationRepository, MockUserRepository, UserRepository};
use nk_core::services::verification::{
    PhoneVerificationService, SmsService, VerificationConfig,
};

/// SMS double that hands back the last code it delivered
struct CapturingSms {
    last_message: Mutex<Option<String>>,
}

impl CapturingSms {
    fn new() -> Self {
        Self {
            last_message: Mutex::new(None),
        }
    }

    async fn last_code(&self) -> Option<String> {
        let message = self.last_message.lock().await;
        message.as_ref()?.split(|c: char| !c.is_ascii_digit())
            .find(|chunk| chunk.len() == 6)
            .map(str::to_string)
    }
}

#[async_trait]
impl SmsService for CapturingSms {
    async fn send_sms(&self, _phone_number: &str, message: &str) -> Result<String, SmsError> {
        *self.last_message.lock().await = Some(message.to_string());
        Ok("captured".to_string())
    }

    fn provider_name(&self) -> &str {
        "Capturing"
    }
}

#[tokio::test]
async fn full_verification_flow() {
    let sms = Arc::new(CapturingSms::new());
    let verifications = Arc::new(MockPhoneVerificationRepository::new());
    let users = Arc::new(MockUserRepository::new());

    let user_id = Uuid::new_v4();
    users.insert(User::new(user_id)).await;

    let service = PhoneVerificationService::new(
        sms.clone(),
        verifications.clone(),
        users.clone(),
        VerificationConfig::default(),
    );

    // Send: local-format number, 6-digit code, expiry ten minutes out.
    let before = Utc::now();
    let sent = service.send_verification_code(user_id, "05551234567").await;
    assert!(sent.success, "{}", sent.message);
    let expires_at = sent.expires_at.expect("expiry should be reported");
    assert!(expires_at >= before + Duration::minutes(10));

    let code = sms.last_code().await.expect("code should have been delivered");
    assert_eq!(code.len(), 6);

    // One wrong guess burns an attempt.
    let wrong = if code == "111111" { "222222" } else { "111111" };
    let miss = service.verify_code(user_id, "05551234567", wrong).await;
    assert!(!miss.success);
    assert!(miss.message.contains("2 attempts remaining"));

    // The correct code verifies the phone and updates the user profile.
    let hit = service.verify_code(user_id, "05551234567", &code).await;
    assert!(hit.success);
    assert!(hit.verified);

    let user = users.find_by_id(user_id).await.unwrap().unwrap();
    assert_eq!(user.phone.as_deref(), Some("+905551234567"));
    assert!(user.phone_verified);
    assert!(user.phone_verified_at.is_some());

    assert!(service.is_phone_verified(user_id, "05551234567").await);

    // The consumed record is verified, so a fresh verify attempt needs a new code.
    let replay = service.verify_code(user_id, "05551234567", &code).await;
    assert!(!replay.success);
    assert!(replay.message.contains("request a new code"));
}

#[tokio::test]
async fn resend_cooldown_reports_wait_seconds() {
    let sms = Arc::new(CapturingSms::new());
    let verifications = Arc::new(MockPhoneVerificationRepository::new());
    let users = Arc::new(MockUserRepository::new());

    let user_id = Uuid::new_v4();
    users.insert(User::new(user_id)).await;

    let service = PhoneVerificationService::new(
        sms,
        verifications,
        users,
        VerificationConfig::default(),
    );

    assert!(service.send_verification_code(user_id, "05551234567").await.success);

    let throttled = service.send_verification_code(user_id, "05551234567").await;
    assert!(!throttled.success);
    let cooldown = throttled.cooldown_seconds.expect("cooldown should be set");
    assert!(cooldown > 0);
    assert!(throttled.message.contains(&cooldown.to_string()));
}
