//! Mutlucell SMS gateway client
//!
//! Form-encoded POST API. Responses are bare text: `ID:<job id>` on
//! success, `ERROR:<code>` on rejection.

use async_trait::async_trait;
use tracing::{error, info};

use nk_core::errors::SmsError;
use nk_core::services::verification::SmsService;
use nk_shared::utils::phone::{mask_phone_number, normalize_phone_number, to_local_format};

use crate::InfrastructureError;

const DEFAULT_API_URL: &str = "https://smsgw.mutlucell.com/smsgw-ws/sndblkex";

/// Mutlucell configuration
#[derive(Debug, Clone)]
pub struct MutlucellConfig {
    /// Account username
    pub username: String,
    /// Account password
    pub password: String,
    /// Registered originator title
    pub originator: String,
    /// Gateway endpoint
    pub api_url: String,
}

impl MutlucellConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let username = std::env::var("MUTLUCELL_USERNAME")
            .map_err(|_| InfrastructureError::Config("MUTLUCELL_USERNAME not set".to_string()))?;
        let password = std::env::var("MUTLUCELL_PASSWORD")
            .map_err(|_| InfrastructureError::Config("MUTLUCELL_PASSWORD not set".to_string()))?;
        let originator = std::env::var("MUTLUCELL_ORIGINATOR").map_err(|_| {
            InfrastructureError::Config("MUTLUCELL_ORIGINATOR not set".to_string())
        })?;

        Ok(Self {
            username,
            password,
            originator,
            api_url: std::env::var("MUTLUCELL_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        })
    }
}

/// Mutlucell SMS service implementation
pub struct MutlucellSmsService {
    client: reqwest::Client,
    config: MutlucellConfig,
}

impl MutlucellSmsService {
    /// Create a new Mutlucell SMS service
    pub fn new(config: MutlucellConfig) -> Self {
        info!(originator = %config.originator, "Mutlucell SMS service initialized");
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Interpret the `ID:`/`ERROR:` response body
    fn parse_response(body: &str) -> Result<String, SmsError> {
        let trimmed = body.trim();
        if let Some(id) = trimmed.strip_prefix("ID:") {
            let id = id.trim();
            if id.is_empty() {
                return Err(SmsError::delivery(
                    "Mutlucell reported success without a job id",
                ));
            }
            return Ok(id.to_string());
        }

        if let Some(code) = trimmed.strip_prefix("ERROR:") {
            return Err(SmsError::delivery(format!(
                "Mutlucell rejected the message: error code {}",
                code.trim()
            )));
        }

        Err(SmsError::delivery(format!(
            "Unrecognized Mutlucell response: {}",
            trimmed
        )))
    }
}

#[async_trait]
impl SmsService for MutlucellSmsService {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, SmsError> {
        let normalized = normalize_phone_number(phone_number);
        let local = to_local_format(&normalized);

        let params = [
            ("ka", self.config.username.as_str()),
            ("pwd", self.config.password.as_str()),
            ("org", self.config.originator.as_str()),
            ("numbers", local.as_str()),
            ("msg", message),
        ];

        let response = self
            .client
            .post(&self.config.api_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Mutlucell request failed");
                SmsError::delivery(format!("Gateway request failed: {}", e))
            })?;

        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Mutlucell returned an unreadable response");
            SmsError::delivery(format!("Unreadable gateway response: {}", e))
        })?;

        let message_id = Self::parse_response(&body)?;
        info!(
            phone = %mask_phone_number(&normalized),
            message_id = %message_id,
            "SMS sent via Mutlucell"
        );
        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mutlucell"
    }
}
