//! İletim Merkezi SMS gateway client
//!
//! JSON POST API. The gateway expects Turkish local-format digits (country
//! code stripped) and, notably, spells the recipient field `receipients`.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{error, info};

use nk_core::errors::SmsError;
use nk_core::services::verification::SmsService;
use nk_shared::utils::phone::{mask_phone_number, normalize_phone_number, to_local_format};

use crate::InfrastructureError;

const DEFAULT_API_URL: &str = "https://api.iletimerkezi.com/v1/send-sms/json";

/// İletim Merkezi configuration
#[derive(Debug, Clone)]
pub struct IletimerkeziConfig {
    /// Account username
    pub username: String,
    /// Account password
    pub password: String,
    /// Registered sender title
    pub sender: String,
    /// Gateway endpoint
    pub api_url: String,
}

impl IletimerkeziConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let username = std::env::var("ILETIMERKEZI_USERNAME").map_err(|_| {
            InfrastructureError::Config("ILETIMERKEZI_USERNAME not set".to_string())
        })?;
        let password = std::env::var("ILETIMERKEZI_PASSWORD").map_err(|_| {
            InfrastructureError::Config("ILETIMERKEZI_PASSWORD not set".to_string())
        })?;
        let sender = std::env::var("ILETIMERKEZI_SENDER").map_err(|_| {
            InfrastructureError::Config("ILETIMERKEZI_SENDER not set".to_string())
        })?;

        Ok(Self {
            username,
            password,
            sender,
            api_url: std::env::var("ILETIMERKEZI_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        })
    }
}

/// İletim Merkezi SMS service implementation
pub struct IletimerkeziSmsService {
    client: reqwest::Client,
    config: IletimerkeziConfig,
}

impl IletimerkeziSmsService {
    /// Create a new İletim Merkezi SMS service
    pub fn new(config: IletimerkeziConfig) -> Self {
        info!(sender = %config.sender, "Iletim Merkezi SMS service initialized");
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Map the gateway response body into the uniform result shape
    fn parse_response(body: &Value) -> Result<String, SmsError> {
        let status = body.get("status").and_then(Value::as_str).unwrap_or("");
        if status == "success" {
            let id = match body.get("id") {
                Some(Value::String(id)) => id.clone(),
                Some(Value::Number(id)) => id.to_string(),
                _ => {
                    return Err(SmsError::delivery(
                        "Gateway reported success without a message id",
                    ))
                }
            };
            return Ok(id);
        }

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unrecognized gateway response");
        Err(SmsError::delivery(format!(
            "Iletim Merkezi rejected the message: {}",
            message
        )))
    }
}

#[async_trait]
impl SmsService for IletimerkeziSmsService {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, SmsError> {
        let normalized = normalize_phone_number(phone_number);
        let local = to_local_format(&normalized);

        let payload = json!({
            "username": self.config.username,
            "password": self.config.password,
            "text": message,
            "receipients": [local],
            "sender": self.config.sender,
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Iletim Merkezi request failed");
                SmsError::delivery(format!("Gateway request failed: {}", e))
            })?;

        let body: Value = response.json().await.map_err(|e| {
            error!(error = %e, "Iletim Merkezi returned a non-JSON response");
            SmsError::delivery(format!("Unreadable gateway response: {}", e))
        })?;

        let message_id = Self::parse_response(&body)?;
        info!(
            phone = %mask_phone_number(&normalized),
            message_id = %message_id,
            "SMS sent via Iletim Merkezi"
        );
        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "IletimMerkezi"
    }
}
