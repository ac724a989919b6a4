//! Mock SMS service implementation
//!
//! Logs messages instead of sending them. Used in development and as a test
//! double at the infrastructure level.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use nk_core::errors::SmsError;
use nk_core::services::verification::SmsService;
use nk_shared::utils::phone::{is_valid_e164, mask_phone_number};

/// Mock SMS service for development and testing
#[derive(Clone)]
pub struct MockSmsService {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
}

impl MockSmsService {
    /// Create a new mock SMS service
    pub fn new() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
        }
    }

    /// Create a mock service that fails every send
    pub fn failing() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: true,
        }
    }

    /// Get the total number of messages sent
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

impl Default for MockSmsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsService for MockSmsService {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, SmsError> {
        if !is_valid_e164(phone_number) {
            return Err(SmsError::delivery(format!(
                "Invalid phone number format: {}",
                mask_phone_number(phone_number)
            )));
        }

        if self.simulate_failure {
            warn!(
                phone = %mask_phone_number(phone_number),
                "Mock SMS service simulating failure"
            );
            return Err(SmsError::delivery("Simulated SMS sending failure"));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        info!(
            provider = "mock",
            phone = %mask_phone_number(phone_number),
            message_id = %message_id,
            message_length = message.len(),
            count,
            "SMS sent (mock)"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_success() {
        let service = MockSmsService::new();
        let message_id = service
            .send_sms("+905551234567", "Test message")
            .await
            .unwrap();

        assert!(message_id.starts_with("mock_"));
        assert_eq!(service.message_count(), 1);
    }

    #[tokio::test]
    async fn test_rejects_invalid_phone() {
        let service = MockSmsService::new();
        let result = service.send_sms("5551234567", "Test message").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_simulated_failure() {
        let service = MockSmsService::failing();
        let result = service.send_sms("+905551234567", "Test message").await;
        assert!(result.is_err());
        assert_eq!(service.message_count(), 0);
    }

    #[tokio::test]
    async fn test_verification_code_wording() {
        let service = MockSmsService::new();
        let result = service
            .send_verification_code("+905551234567", "123456")
            .await;
        assert!(result.is_ok());
    }
}
