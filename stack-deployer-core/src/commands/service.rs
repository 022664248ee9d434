//! Stack Deployer Service Layer
//!
//! This module provides the adapter that holds a CloudFormation API handle together
//! with the stack options and request payload derived from one configuration.
//! The operations themselves live in `validate.rs`, `deploy.rs` and `outputs.rs`.

use crate::aws::credentials::load_sdk_config;
use crate::aws::{CloudFormationApi, StackApi};
use crate::config::{AuthParams, Configuration, StackOptions};
use crate::error::DeployResult;
use crate::request::StackRequest;
use aws_sdk_cloudformation::Client as CloudFormationClient;
use log::info;

/// Main adapter struct: a CloudFormation API handle plus the prepared stack request.
pub struct StackDeployer {
    pub(crate) api: Box<dyn StackApi>,
    options: StackOptions,
    request: StackRequest,
}

impl StackDeployer {
    /// Create a deployer backed by the AWS SDK.
    ///
    /// Authentication fields select the region and credentials; every other field
    /// becomes a stack option.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if credentials or stack options are malformed.
    pub async fn new(config: &Configuration) -> DeployResult<Self> {
        let auth = AuthParams::from_config(config)?;
        let sdk_config = load_sdk_config(&auth).await;
        info!(
            "Using CloudFormation in region {}",
            sdk_config
                .region()
                .map_or_else(|| "<unresolved>".to_string(), ToString::to_string)
        );

        Self::with_api(
            CloudFormationApi::new(CloudFormationClient::new(&sdk_config)),
            config,
        )
    }

    /// Create a deployer over any [`StackApi`] implementation.
    ///
    /// Authentication fields in `config` are ignored.
    pub fn with_api(api: impl StackApi + 'static, config: &Configuration) -> DeployResult<Self> {
        let (options, request) = prepare(config)?;
        Ok(Self {
            api: Box::new(api),
            options,
            request,
        })
    }

    /// Replace the stack options; the request payload is rebuilt with them.
    ///
    /// On error the previous options and request are kept.
    pub fn set_options(&mut self, config: &Configuration) -> DeployResult<()> {
        let (options, request) = prepare(config)?;
        self.options = options;
        self.request = request;
        Ok(())
    }

    pub fn options(&self) -> &StackOptions {
        &self.options
    }

    pub fn request(&self) -> &StackRequest {
        &self.request
    }

    // validate_template() is in validate.rs
    // stack_exists(), create_stack(), update_stack(), create_or_update_stack() are in deploy.rs
    // fetch_outputs() is in outputs.rs
}

fn prepare(config: &Configuration) -> DeployResult<(StackOptions, StackRequest)> {
    let options = StackOptions::from_config(config)?;
    let request = StackRequest::from_options(&options);
    Ok((options, request))
}
