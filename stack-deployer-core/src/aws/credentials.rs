//! SDK configuration from authentication parameters

use crate::config::{AuthParams, CredentialSource};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use log::debug;

const STATIC_PROVIDER_NAME: &str = "stack-deployer-static";

/// Load SDK configuration, overriding region and credentials where configured.
pub(crate) async fn load_sdk_config(auth: &AuthParams) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &auth.region {
        loader = loader.region(Region::new(region.clone()));
    }

    loader = match &auth.credentials {
        CredentialSource::DefaultChain => loader,
        CredentialSource::Profile(name) => {
            debug!("Using credentials from profile '{name}'");
            loader.profile_name(name)
        }
        CredentialSource::Static {
            access_key_id,
            secret_access_key,
        } => {
            debug!("Using static credentials for access key {access_key_id}");
            loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                STATIC_PROVIDER_NAME,
            ))
        }
    };

    loader.load().await
}
