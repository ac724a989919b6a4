//! SMS gateway clients
//!
//! One concrete implementation of the core [`SmsService`] trait per
//! supported gateway, plus a mock for development. Exactly one provider is
//! constructed per process, selected by configuration at startup; every
//! provider validates its credentials eagerly so misconfiguration surfaces
//! at boot rather than on the first user request.

use std::sync::Arc;
use tracing::info;

use nk_core::services::verification::SmsService;

use crate::config::{SmsConfig, SmsProvider};
use crate::InfrastructureError;

pub mod iletimerkezi;
pub mod mock_sms;
pub mod mutlucell;
pub mod netgsm;

// Twilio SMS service (feature-gated)
#[cfg(feature = "twilio-sms")]
pub mod twilio;

// AWS SNS SMS service (feature-gated)
#[cfg(feature = "aws-sns")]
pub mod aws_sns;

pub use iletimerkezi::{IletimerkeziConfig, IletimerkeziSmsService};
pub use mock_sms::MockSmsService;
pub use mutlucell::{MutlucellConfig, MutlucellSmsService};
pub use netgsm::{NetgsmConfig, NetgsmSmsService};

#[cfg(feature = "twilio-sms")]
pub use twilio::{TwilioConfig, TwilioSmsService};

#[cfg(feature = "aws-sns")]
pub use aws_sns::{AwsSnsConfig, AwsSnsSmsService};

/// Construct the configured SMS service
///
/// Maps the provider tag to a concrete gateway client. Construction is
/// fail-fast: a missing credential or unsupported provider stops startup
/// instead of being deferred to the first send. The returned service is
/// meant to be built once and injected wherever SMS delivery is needed.
pub async fn create_sms_service(
    config: &SmsConfig,
) -> Result<Arc<dyn SmsService>, InfrastructureError> {
    let service: Arc<dyn SmsService> = match config.provider {
        SmsProvider::Mock => Arc::new(MockSmsService::new()),
        SmsProvider::Iletimerkezi => {
            Arc::new(IletimerkeziSmsService::new(IletimerkeziConfig::from_env()?))
        }
        SmsProvider::Netgsm => Arc::new(NetgsmSmsService::new(NetgsmConfig::from_env()?)),
        SmsProvider::Mutlucell => {
            Arc::new(MutlucellSmsService::new(MutlucellConfig::from_env()?))
        }
        #[cfg(feature = "twilio-sms")]
        SmsProvider::Twilio => Arc::new(TwilioSmsService::new(TwilioConfig::from_env()?)),
        #[cfg(not(feature = "twilio-sms"))]
        SmsProvider::Twilio => {
            return Err(InfrastructureError::Config(
                "SMS provider 'twilio' requires the twilio-sms feature".to_string(),
            ))
        }
        #[cfg(feature = "aws-sns")]
        SmsProvider::Aws => Arc::new(AwsSnsSmsService::new(AwsSnsConfig::from_env()?).await),
        #[cfg(not(feature = "aws-sns"))]
        SmsProvider::Aws => {
            return Err(InfrastructureError::Config(
                "SMS provider 'aws' requires the aws-sns feature".to_string(),
            ))
        }
    };

    info!(provider = %config.provider, "SMS service initialized");
    Ok(service)
}
