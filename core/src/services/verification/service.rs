//! Phone verification service implementation

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use nk_shared::utils::phone::{is_valid_e164, mask_phone_number, normalize_phone_number};

use crate::domain::entities::phone_verification::PhoneVerification;
use crate::errors::SmsError;
use crate::repositories::{PhoneVerificationRepository, UserRepository};

use super::config::VerificationConfig;
use super::traits::SmsService;
use super::types::{SendCodeOutcome, VerifyCodeOutcome};

/// Service coordinating OTP issuance, delivery and verification
///
/// Per (user, phone) pair the lifecycle is
/// `NONE -> PENDING -> {VERIFIED | EXPIRED | EXHAUSTED}`; only the newest
/// active record counts. All collaborators are injected at construction so
/// tests can substitute doubles.
pub struct PhoneVerificationService {
    sms: Arc<dyn SmsService>,
    verifications: Arc<dyn PhoneVerificationRepository>,
    users: Arc<dyn UserRepository>,
    config: VerificationConfig,
}

impl PhoneVerificationService {
    /// Create a new verification service
    pub fn new(
        sms: Arc<dyn SmsService>,
        verifications: Arc<dyn PhoneVerificationRepository>,
        users: Arc<dyn UserRepository>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            sms,
            verifications,
            users,
            config,
        }
    }

    /// Issue a verification code and deliver it via SMS
    ///
    /// Rejects malformed phone numbers and, when rate limiting is enabled,
    /// resend requests inside the cooldown window (the remaining seconds are
    /// returned so the caller can back off deterministically). The
    /// read-then-write cooldown check is deliberately untransactional: two
    /// racing requests may both pass, which at worst issues two codes of
    /// which only the newest is consumable.
    pub async fn send_verification_code(&self, user_id: Uuid, phone: &str) -> SendCodeOutcome {
        let normalized = normalize_phone_number(phone);
        if !is_valid_e164(&normalized) {
            return SendCodeOutcome::rejected("Invalid phone number format");
        }

        if self.config.rate_limiting_enabled {
            match self.cooldown_remaining(user_id, &normalized).await {
                Ok(Some(remaining)) => {
                    warn!(
                        phone = %mask_phone_number(&normalized),
                        cooldown_remaining = remaining,
                        event = "rate_limit_exceeded",
                        "Verification code resend throttled"
                    );
                    return SendCodeOutcome::throttled(
                        format!("Please wait {} seconds before requesting a new code", remaining),
                        remaining,
                    );
                }
                Ok(None) => {}
                Err(e) => {
                    error!(error = %e, "Failed to check resend cooldown");
                    return SendCodeOutcome::rejected(
                        "Unable to send verification code. Please try again later",
                    );
                }
            }
        }

        let record = PhoneVerification::new_with_expiration(
            user_id,
            normalized.clone(),
            self.config.code_expiration_minutes,
        );

        let record = match self.verifications.create(record).await {
            Ok(record) => record,
            Err(e) => {
                error!(error = %e, "Failed to persist verification record");
                return SendCodeOutcome::rejected(
                    "Unable to send verification code. Please try again later",
                );
            }
        };

        info!(
            phone = %mask_phone_number(&normalized),
            record_id = %record.id,
            event = "otp_generated",
            "Generated verification code"
        );

        match self.sms.send_verification_code(&normalized, &record.code).await {
            Ok(message_id) => {
                info!(
                    phone = %mask_phone_number(&normalized),
                    provider = self.sms.provider_name(),
                    message_id = %message_id,
                    event = "otp_sent",
                    "Verification code sent"
                );
                SendCodeOutcome::sent(record.expires_at)
            }
            Err(e) => {
                // The pending record is kept: a later resend can still
                // supersede it, and the attempt budget stays intact.
                error!(
                    phone = %mask_phone_number(&normalized),
                    provider = self.sms.provider_name(),
                    error = %e,
                    event = "otp_delivery_failed",
                    "SMS provider rejected the message"
                );
                let retry_after = match e {
                    SmsError::Delivery {
                        retry_after_seconds: Some(secs),
                        ..
                    } => Some(secs as i64),
                    _ => None,
                };
                SendCodeOutcome {
                    success: false,
                    message: "Failed to send verification code. Please try again".to_string(),
                    cooldown_seconds: retry_after,
                    expires_at: None,
                }
            }
        }
    }

    /// Verify a submitted code against the newest active record
    ///
    /// The attempt counter is incremented and persisted before the code
    /// comparison on every call, so a crashed or retried request still
    /// counts against the budget and the effective number of guesses is
    /// exactly `max_attempts`.
    pub async fn verify_code(&self, user_id: Uuid, phone: &str, code: &str) -> VerifyCodeOutcome {
        let normalized = normalize_phone_number(phone);

        let record = match self.verifications.find_latest_active(user_id, &normalized).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                return VerifyCodeOutcome::rejected(
                    "No active verification code found. Please request a new code",
                );
            }
            Err(e) => {
                error!(error = %e, "Failed to load verification record");
                return VerifyCodeOutcome::rejected(
                    "Unable to verify code. Please try again later",
                );
            }
        };

        // Pre-increment check: a record that has already burned its budget
        // is dead until a new code is requested.
        if record.attempts >= self.config.max_attempts {
            warn!(
                phone = %mask_phone_number(&normalized),
                record_id = %record.id,
                event = "max_attempts_exceeded",
                "Verification attempted on exhausted code"
            );
            return VerifyCodeOutcome::rejected(
                "Too many failed attempts. Please request a new code",
            );
        }

        let mut record = record;
        record.attempts += 1;
        if let Err(e) = self.verifications.update(&record).await {
            error!(error = %e, "Failed to persist attempt counter");
            return VerifyCodeOutcome::rejected("Unable to verify code. Please try again later");
        }

        if record.code != code {
            let remaining = self.config.max_attempts - record.attempts;
            warn!(
                phone = %mask_phone_number(&normalized),
                remaining_attempts = remaining,
                event = "otp_verification_failed",
                "Verification code mismatch"
            );
            return VerifyCodeOutcome::wrong_code(remaining);
        }

        record.mark_verified();
        let verified_at = record.verified_at.unwrap_or_else(Utc::now);

        // Two writes issued together, not a transaction: the record flips to
        // verified and the user profile picks up the phone fields.
        let (record_update, user_update) = tokio::join!(
            self.verifications.update(&record),
            self.users
                .mark_phone_verified(user_id, &record.phone, verified_at),
        );

        if let Err(e) = record_update.and(user_update) {
            error!(error = %e, "Failed to persist verified state");
            return VerifyCodeOutcome::rejected("Unable to verify code. Please try again later");
        }

        info!(
            phone = %mask_phone_number(&normalized),
            record_id = %record.id,
            event = "otp_verified",
            "Phone number verified"
        );
        VerifyCodeOutcome::verified()
    }

    /// Whether the user's stored phone equals the candidate and is verified
    pub async fn is_phone_verified(&self, user_id: Uuid, phone: &str) -> bool {
        let normalized = normalize_phone_number(phone);
        match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => {
                user.phone_verified && user.phone.as_deref() == Some(normalized.as_str())
            }
            Ok(None) => false,
            Err(e) => {
                error!(error = %e, "Failed to load user for verification check");
                false
            }
        }
    }

    /// Bulk-delete expired, unverified records
    ///
    /// Intended for a periodic external trigger (cron/job runner); never
    /// called from request paths.
    pub async fn cleanup_expired_verifications(&self) -> u64 {
        match self.verifications.delete_expired_unverified().await {
            Ok(removed) => {
                if removed > 0 {
                    info!(removed, "Removed expired verification records");
                }
                removed
            }
            Err(e) => {
                error!(error = %e, "Verification cleanup sweep failed");
                0
            }
        }
    }

    /// Seconds left in the resend cooldown window, if one applies
    async fn cooldown_remaining(
        &self,
        user_id: Uuid,
        phone: &str,
    ) -> Result<Option<i64>, crate::errors::DomainError> {
        let since = Utc::now() - Duration::seconds(self.config.resend_cooldown_seconds);
        let recent = self.verifications.find_recent(user_id, phone, since).await?;

        Ok(recent.and_then(|record| {
            let elapsed = (Utc::now() - record.created_at).num_seconds();
            let remaining = self.config.resend_cooldown_seconds - elapsed;
            (remaining > 0).then_some(remaining)
        }))
    }
}
