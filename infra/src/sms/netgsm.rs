//! NetGSM SMS gateway client
//!
//! GET-based API. The response body is either a bare message id or a
//! single-digit error code; there is no structured envelope to parse.

use async_trait::async_trait;
use tracing::{error, info};

use nk_core::errors::SmsError;
use nk_core::services::verification::SmsService;
use nk_shared::utils::phone::{mask_phone_number, normalize_phone_number, to_local_format};

use crate::InfrastructureError;

const DEFAULT_API_URL: &str = "https://api.netgsm.com.tr/sms/send/get";

/// NetGSM configuration
#[derive(Debug, Clone)]
pub struct NetgsmConfig {
    /// Account user code
    pub usercode: String,
    /// Account password
    pub password: String,
    /// Registered message header (sender title)
    pub msgheader: String,
    /// Gateway endpoint
    pub api_url: String,
}

impl NetgsmConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let usercode = std::env::var("NETGSM_USERCODE")
            .map_err(|_| InfrastructureError::Config("NETGSM_USERCODE not set".to_string()))?;
        let password = std::env::var("NETGSM_PASSWORD")
            .map_err(|_| InfrastructureError::Config("NETGSM_PASSWORD not set".to_string()))?;
        let msgheader = std::env::var("NETGSM_MSGHEADER")
            .map_err(|_| InfrastructureError::Config("NETGSM_MSGHEADER not set".to_string()))?;

        Ok(Self {
            usercode,
            password,
            msgheader,
            api_url: std::env::var("NETGSM_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        })
    }
}

/// NetGSM SMS service implementation
pub struct NetgsmSmsService {
    client: reqwest::Client,
    config: NetgsmConfig,
}

impl NetgsmSmsService {
    /// Create a new NetGSM SMS service
    pub fn new(config: NetgsmConfig) -> Self {
        info!(msgheader = %config.msgheader, "NetGSM SMS service initialized");
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Interpret the bare-text gateway response
    ///
    /// Accepted sends come back as `00 <jobid>`. Any other body whose first
    /// token starts with `0`, `1` or `2` is an error code (`20`, `2x`
    /// rejections included); anything else is taken as the message id.
    fn parse_response(body: &str) -> Result<String, SmsError> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(SmsError::delivery("NetGSM returned an empty response"));
        }

        let code = trimmed.split_whitespace().next().unwrap_or(trimmed);
        if code != "00" {
            let reason = match code.as_bytes()[0] {
                b'0' => Some("invalid username or password"),
                b'1' => Some("message header not registered"),
                b'2' => Some("insufficient credit or quota"),
                _ => None,
            };
            if let Some(reason) = reason {
                return Err(SmsError::delivery(format!(
                    "NetGSM rejected the message: {} (code {})",
                    reason, code
                )));
            }
        }

        Ok(trimmed.to_string())
    }
}

#[async_trait]
impl SmsService for NetgsmSmsService {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, SmsError> {
        let normalized = normalize_phone_number(phone_number);
        let local = to_local_format(&normalized);

        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[
                ("usercode", self.config.usercode.as_str()),
                ("password", self.config.password.as_str()),
                ("gsmno", local.as_str()),
                ("message", message),
                ("msgheader", self.config.msgheader.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "NetGSM request failed");
                SmsError::delivery(format!("Gateway request failed: {}", e))
            })?;

        let body = response.text().await.map_err(|e| {
            error!(error = %e, "NetGSM returned an unreadable response");
            SmsError::delivery(format!("Unreadable gateway response: {}", e))
        })?;

        let message_id = Self::parse_response(&body)?;
        info!(
            phone = %mask_phone_number(&normalized),
            message_id = %message_id,
            "SMS sent via NetGSM"
        );
        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "NetGSM"
    }
}
