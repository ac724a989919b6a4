//! SMS delivery seam
//!
//! The single canonical trait every gateway client implements. Concrete
//! providers live in the infrastructure crate; the verification service only
//! sees this interface, injected at construction.

use async_trait::async_trait;

use crate::errors::SmsError;

/// SMS service trait for sending text messages
///
/// Implementations include AWS SNS, Twilio, the Turkish gateways
/// (İletim Merkezi, NetGSM, Mutlucell) and a mock for development.
#[async_trait]
pub trait SmsService: Send + Sync {
    /// Send an SMS message to a phone number
    ///
    /// # Arguments
    ///
    /// * `phone_number` - Recipient in E.164 format; each provider converts
    ///   to the shape its gateway expects
    /// * `message` - Message content
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Gateway identifier for the sent message
    /// * `Err(SmsError)` - Delivery or configuration failure
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, SmsError>;

    /// Send a verification code using the application's standard wording
    async fn send_verification_code(
        &self,
        phone_number: &str,
        code: &str,
    ) -> Result<String, SmsError> {
        let message = format!(
            "Your NitroKit verification code is: {}. This code will expire in 10 minutes.",
            code
        );
        self.send_sms(phone_number, &message).await
    }

    /// Name of the SMS provider (for logs)
    fn provider_name(&self) -> &str;
}
