//! Infrastructure configuration
//!
//! Provider selection is a closed enum so an unsupported value fails at
//! configuration load, and the factory match over providers is checked at
//! compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::InfrastructureError;

/// The SMS gateways this deployment can be pointed at
///
/// Exactly one provider is configured per process (`SMS_PROVIDER`); changing
/// it requires a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    /// AWS SNS
    Aws,
    /// Twilio
    Twilio,
    /// İletim Merkezi (Turkish gateway)
    Iletimerkezi,
    /// NetGSM (Turkish gateway)
    Netgsm,
    /// Mutlucell (Turkish gateway)
    Mutlucell,
    /// Console/tracing mock for development
    Mock,
}

impl FromStr for SmsProvider {
    type Err = InfrastructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aws" | "aws-sns" => Ok(SmsProvider::Aws),
            "twilio" => Ok(SmsProvider::Twilio),
            "iletimerkezi" => Ok(SmsProvider::Iletimerkezi),
            "netgsm" => Ok(SmsProvider::Netgsm),
            "mutlucell" => Ok(SmsProvider::Mutlucell),
            "mock" => Ok(SmsProvider::Mock),
            other => Err(InfrastructureError::Config(format!(
                "Unknown SMS provider: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for SmsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SmsProvider::Aws => "aws",
            SmsProvider::Twilio => "twilio",
            SmsProvider::Iletimerkezi => "iletimerkezi",
            SmsProvider::Netgsm => "netgsm",
            SmsProvider::Mutlucell => "mutlucell",
            SmsProvider::Mock => "mock",
        };
        f.write_str(name)
    }
}

/// Top-level SMS configuration
#[derive(Debug, Clone)]
pub struct SmsConfig {
    /// Which gateway to construct
    pub provider: SmsProvider,
}

impl SmsConfig {
    /// Load from the environment (`SMS_PROVIDER`, defaulting to `mock`)
    ///
    /// Provider credentials are loaded by the concrete provider's own
    /// `from_env` at construction time.
    pub fn from_env() -> Result<Self, InfrastructureError> {
        dotenvy::dotenv().ok();
        let provider = std::env::var("SMS_PROVIDER")
            .unwrap_or_else(|_| "mock".to_string())
            .parse()?;
        Ok(Self { provider })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_providers() {
        assert_eq!("aws".parse::<SmsProvider>().unwrap(), SmsProvider::Aws);
        assert_eq!("aws-sns".parse::<SmsProvider>().unwrap(), SmsProvider::Aws);
        assert_eq!("twilio".parse::<SmsProvider>().unwrap(), SmsProvider::Twilio);
        assert_eq!(
            "iletimerkezi".parse::<SmsProvider>().unwrap(),
            SmsProvider::Iletimerkezi
        );
        assert_eq!("NETGSM".parse::<SmsProvider>().unwrap(), SmsProvider::Netgsm);
        assert_eq!(
            "mutlucell".parse::<SmsProvider>().unwrap(),
            SmsProvider::Mutlucell
        );
        assert_eq!("mock".parse::<SmsProvider>().unwrap(), SmsProvider::Mock);
    }

    #[test]
    fn test_parse_unknown_provider_fails() {
        assert!("pigeon".parse::<SmsProvider>().is_err());
    }
}
