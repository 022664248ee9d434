//! This crate provides the core business logic for Stack Deployer:
//! - Splitting flat configuration into credentials and stack options
//! - Shaping stack options into CloudFormation stack requests
//! - Template validation, create / update / create-or-update with waits, and output retrieval
//!

mod aws;
pub mod commands;
mod config;
mod error;
mod request;
mod types;

// Re-exports for a small, focused public API
pub use aws::{
    CloudFormationApi, DescribedStack, Operation, RemoteError, StackApi, WaitTarget,
    DEFAULT_MAX_WAIT, NO_UPDATES_MESSAGE, STACK_MISSING_SUFFIX,
};
pub use commands::StackDeployer;
pub use config::{
    AuthParams, Configuration, CredentialSource, KeyValues, RollbackConfiguration,
    RollbackTrigger, StackOption, StackOptions, AUTH_KEYS, FILE_REFERENCE_PREFIX,
};
pub use error::{DeployError, DeployResult};
pub use request::{ParameterRecord, StackRequest, TagRecord};
pub use types::{DeployOutcome, StackOutput, StackOutputs, TemplateSummary};
