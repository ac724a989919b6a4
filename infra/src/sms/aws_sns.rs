//! AWS SNS SMS gateway client
//!
//! Direct-to-phone publishing through SNS. Numbers are sent in full E.164
//! form; no retries are attempted, a failed publish is reported to the
//! caller as-is.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::{config::Region, types::MessageAttributeValue, Client as SnsClient};
use std::collections::HashMap;
use tracing::{error, info};

use nk_core::errors::SmsError;
use nk_core::services::verification::SmsService;
use nk_shared::utils::phone::{is_valid_e164, mask_phone_number, normalize_phone_number};

use crate::InfrastructureError;

/// SNS SMS limit for a single (concatenated) message
const MAX_MESSAGE_CHARS: usize = 1600;

/// AWS SNS SMS service configuration
#[derive(Debug, Clone)]
pub struct AwsSnsConfig {
    /// AWS Access Key ID
    pub access_key_id: String,
    /// AWS Secret Access Key
    pub secret_access_key: String,
    /// AWS Region (e.g., "us-east-1")
    pub region: String,
    /// SMS sender ID (optional, not supported in all regions)
    pub sender_id: Option<String>,
    /// SMS type: "Transactional" or "Promotional"
    pub sms_type: String,
}

impl AwsSnsConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let access_key_id = std::env::var("AWS_ACCESS_KEY_ID")
            .map_err(|_| InfrastructureError::Config("AWS_ACCESS_KEY_ID not set".to_string()))?;
        let secret_access_key = std::env::var("AWS_SECRET_ACCESS_KEY").map_err(|_| {
            InfrastructureError::Config("AWS_SECRET_ACCESS_KEY not set".to_string())
        })?;
        let region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        let sender_id = std::env::var("AWS_SNS_SENDER_ID").ok();
        let sms_type =
            std::env::var("AWS_SNS_SMS_TYPE").unwrap_or_else(|_| "Transactional".to_string());

        if sms_type != "Transactional" && sms_type != "Promotional" {
            return Err(InfrastructureError::Config(
                "AWS_SNS_SMS_TYPE must be either 'Transactional' or 'Promotional'".to_string(),
            ));
        }

        Ok(Self {
            access_key_id,
            secret_access_key,
            region,
            sender_id,
            sms_type,
        })
    }
}

/// AWS SNS SMS service implementation
pub struct AwsSnsSmsService {
    client: SnsClient,
    config: AwsSnsConfig,
}

impl AwsSnsSmsService {
    /// Create a new AWS SNS SMS service
    pub async fn new(config: AwsSnsConfig) -> Self {
        let credentials = aws_credential_types::Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "nitrokit_sns_sms",
        );

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let client = SnsClient::new(&aws_config);

        info!(region = %config.region, "AWS SNS SMS service initialized");
        if let Some(ref sender_id) = config.sender_id {
            info!(sender_id = %sender_id, "Using SNS sender ID");
        }

        Self { client, config }
    }

    /// Per-message attributes: SMS type and optional sender ID
    fn sms_attributes(&self) -> Result<HashMap<String, MessageAttributeValue>, SmsError> {
        let mut attributes = HashMap::new();

        let sms_type = MessageAttributeValue::builder()
            .data_type("String")
            .string_value(&self.config.sms_type)
            .build()
            .map_err(|e| SmsError::delivery(format!("Invalid SNS message attribute: {}", e)))?;
        attributes.insert("AWS.SNS.SMS.SMSType".to_string(), sms_type);

        if let Some(ref sender_id) = self.config.sender_id {
            let value = MessageAttributeValue::builder()
                .data_type("String")
                .string_value(sender_id)
                .build()
                .map_err(|e| SmsError::delivery(format!("Invalid SNS message attribute: {}", e)))?;
            attributes.insert("AWS.SNS.SMS.SenderID".to_string(), value);
        }

        Ok(attributes)
    }
}

#[async_trait]
impl SmsService for AwsSnsSmsService {
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

        let attributes = self.sms_attributes()?;
        let response = self
            .client
            .publish()
            .phone_number(&normalized)
            .message(message)
            .set_message_attributes(Some(attributes))
            .send()
            .await
            .map_err(|e| {
                error!(
                    phone = %mask_phone_number(&normalized),
                    error = %e,
                    "AWS SNS publish failed"
                );
                SmsError::delivery(format!("AWS SNS publish failed: {}", e))
            })?;

        let message_id = response.message_id().unwrap_or("unknown").to_string();
        info!(
            phone = %mask_phone_number(&normalized),
            message_id = %message_id,
            "SMS sent via AWS SNS"
        );
        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "AWS SNS"
    }
}
