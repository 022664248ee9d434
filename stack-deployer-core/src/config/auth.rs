//! Connection and credential parameters for the CloudFormation client

use super::{string_value, Configuration};
use crate::error::{DeployError, DeployResult};
use log::{debug, warn};
use std::fmt;

pub(crate) const REGION: &str = "region";
pub(crate) const ACCESS_KEY_ID: &str = "accessKeyId";
pub(crate) const SECRET_ACCESS_KEY: &str = "secretAccessKey";
pub(crate) const PROFILE: &str = "profile";

/// Option names consumed by [`AuthParams`] and never forwarded to stack requests.
pub const AUTH_KEYS: [&str; 4] = [REGION, ACCESS_KEY_ID, SECRET_ACCESS_KEY, PROFILE];

/// Where client credentials come from.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// The SDK's default provider chain (environment, shared config, instance role).
    DefaultChain,
    /// A named profile from the local shared config files.
    Profile(String),
    /// An explicit access key pair.
    Static {
        access_key_id: String,
        secret_access_key: String,
    },
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefaultChain => f.write_str("DefaultChain"),
            Self::Profile(name) => f.debug_tuple("Profile").field(name).finish(),
            Self::Static { access_key_id, .. } => f
                .debug_struct("Static")
                .field("access_key_id", access_key_id)
                .field("secret_access_key", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthParams {
    pub region: Option<String>,
    pub credentials: CredentialSource,
}

impl AuthParams {
    /// Read the authentication fields of a configuration.
    ///
    /// A named profile takes precedence over an explicit key pair. Supplying only
    /// one half of a key pair is rejected.
    pub fn from_config(config: &Configuration) -> DeployResult<Self> {
        let field = |name: &str| match config.get(name) {
            Some(value) => string_value(name, value),
            None => Ok(None),
        };

        let region = field(REGION)?;
        let profile = field(PROFILE)?;
        let access_key_id = field(ACCESS_KEY_ID)?;
        let secret_access_key = field(SECRET_ACCESS_KEY)?;

        let credentials = match (profile, access_key_id, secret_access_key) {
            (Some(profile), keys, secret) => {
                if keys.is_some() || secret.is_some() {
                    warn!("Both '{PROFILE}' and an access key were configured; using profile '{profile}'");
                }
                CredentialSource::Profile(profile)
            }
            (None, Some(access_key_id), Some(secret_access_key)) => CredentialSource::Static {
                access_key_id,
                secret_access_key,
            },
            (None, Some(_), None) => {
                return Err(DeployError::configuration(format!(
                    "'{ACCESS_KEY_ID}' requires '{SECRET_ACCESS_KEY}'"
                )))
            }
            (None, None, Some(_)) => {
                return Err(DeployError::configuration(format!(
                    "'{SECRET_ACCESS_KEY}' requires '{ACCESS_KEY_ID}'"
                )))
            }
            (None, None, None) => CredentialSource::DefaultChain,
        };

        debug!("Resolved credential source: {credentials:?}");
        Ok(Self {
            region,
            credentials,
        })
    }
}
