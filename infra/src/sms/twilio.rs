//! Twilio SMS gateway client
//!
//! International delivery through the Twilio REST API. Numbers are sent in
//! full E.164 form; no retries are attempted, a failed send is reported to
//! the caller as-is.

use async_trait::async_trait;
use tracing::{error, info};
use twilio::{Client, OutboundMessage};

use nk_core::errors::SmsError;
use nk_core::services::verification::SmsService;
use nk_shared::utils::phone::{is_valid_e164, mask_phone_number, normalize_phone_number};

use crate::InfrastructureError;

/// Twilio SMS limit for a single (concatenated) message
const MAX_MESSAGE_CHARS: usize = 1600;

/// Twilio SMS service configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// From phone number (must be a Twilio phone number)
    pub from_number: String,
}

impl TwilioConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let account_sid = std::env::var("TWILIO_ACCOUNT_SID")
            .map_err(|_| InfrastructureError::Config("TWILIO_ACCOUNT_SID not set".to_string()))?;
        let auth_token = std::env::var("TWILIO_AUTH_TOKEN")
            .map_err(|_| InfrastructureError::Config("TWILIO_AUTH_TOKEN not set".to_string()))?;
        let from_number = std::env::var("TWILIO_FROM_NUMBER")
            .map_err(|_| InfrastructureError::Config("TWILIO_FROM_NUMBER not set".to_string()))?;

        if !from_number.starts_with('+') {
            return Err(InfrastructureError::Config(
                "TWILIO_FROM_NUMBER must be in E.164 format (starting with '+')".to_string(),
            ));
        }

        Ok(Self {
            account_sid,
            auth_token,
            from_number,
        })
    }
}

/// Twilio SMS service implementation
pub struct TwilioSmsService {
    client: Client,
    config: TwilioConfig,
}

impl TwilioSmsService {
    /// Create a new Twilio SMS service
    pub fn new(config: TwilioConfig) -> Self {
        let client = Client::new(&config.account_sid, &config.auth_token);

        info!(
            from = %mask_phone_number(&config.from_number),
            "Twilio SMS service initialized"
        );

        Self { client, config }
    }
}

#[async_trait]
impl SmsService for TwilioSmsService {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, SmsError> {
        let normalized = normalize_phone_number(phone_number);
        if !is_valid_e164(&normalized) {
            return Err(SmsError::delivery(format!(
                "Invalid phone number format: {}",
                mask_phone_number(phone_number)
            )));
        }

        if message.len() > MAX_MESSAGE_CHARS {
            return Err(SmsError::delivery(format!(
                "Message exceeds maximum length of {} characters",
                MAX_MESSAGE_CHARS
            )));
        }

        let outbound = OutboundMessage::new(&self.config.from_number, &normalized, message);
        let response = self.client.send_message(outbound).await.map_err(|e| {
            error!(
                phone = %mask_phone_number(&normalized),
                error = %e,
                "Twilio send failed"
            );
            SmsError::delivery(format!("Twilio send failed: {}", e))
        })?;

        info!(
            phone = %mask_phone_number(&normalized),
            sid = %response.sid,
            "SMS sent via Twilio"
        );
        Ok(response.sid)
    }

    fn provider_name(&self) -> &str {
        "Twilio"
    }
}
