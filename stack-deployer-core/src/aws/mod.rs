//! AWS integration: the CloudFormation API seam, its SDK-backed implementation,
//! credential resolution, and classification of remote failures.

mod cloudformation;
pub(crate) mod credentials;

pub use cloudformation::{CloudFormationApi, DEFAULT_MAX_WAIT};

use crate::error::DeployResult;
use crate::request::StackRequest;
use crate::types::{StackOutput, TemplateSummary};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Message suffix CloudFormation uses when a described stack is missing.
pub const STACK_MISSING_SUFFIX: &str = "does not exist";

/// Message fragment CloudFormation uses when an update would change nothing.
pub const NO_UPDATES_MESSAGE: &str = "No updates are to be performed";

/// Remote operation a [`RemoteError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ValidateTemplate,
    DescribeStacks,
    CreateStack,
    UpdateStack,
    Wait(WaitTarget),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidateTemplate => f.write_str("ValidateTemplate"),
            Self::DescribeStacks => f.write_str("DescribeStacks"),
            Self::CreateStack => f.write_str("CreateStack"),
            Self::UpdateStack => f.write_str("UpdateStack"),
            Self::Wait(target) => write!(f, "Wait({target})"),
        }
    }
}

/// Terminal state a stack is waited into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTarget {
    StackCreateComplete,
    StackUpdateComplete,
}

impl fmt::Display for WaitTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackCreateComplete => f.write_str("stackCreateComplete"),
            Self::StackUpdateComplete => f.write_str("stackUpdateComplete"),
        }
    }
}

/// A failure reported by the CloudFormation API.
///
/// Displays the remote message verbatim; the operation and error code are kept
/// alongside for logging and classification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    operation: Operation,
    code: Option<String>,
    message: String,
}

impl RemoteError {
    pub fn new(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            operation,
            code: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this is CloudFormation's "stack does not exist" failure.
    ///
    /// CloudFormation reports this under the generic `ValidationError` code, shared
    /// with many unrelated failures, so the message suffix is the only discriminator
    /// available. This couples us to the API's prose and breaks if it is reworded.
    pub fn is_stack_missing(&self) -> bool {
        self.message.trim_end().ends_with(STACK_MISSING_SUFFIX)
    }

    /// Whether this is the "No updates are to be performed" update rejection.
    ///
    /// Same caveat as [`RemoteError::is_stack_missing`]: matched on message text.
    pub fn is_no_updates(&self) -> bool {
        self.message.contains(NO_UPDATES_MESSAGE)
    }
}

/// A stack as returned by `DescribeStacks`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribedStack {
    pub stack_id: Option<String>,
    pub outputs: Option<Vec<StackOutput>>,
}

/// The subset of the CloudFormation API the deployer drives.
#[async_trait]
pub trait StackApi: Send + Sync {
    /// Validate a template given inline, by URL, or both.
    async fn validate_template(
        &self,
        template_body: Option<&str>,
        template_url: Option<&str>,
    ) -> DeployResult<TemplateSummary>;

    /// Describe the named stack.
    async fn describe_stacks(&self, stack_name: &str) -> DeployResult<Vec<DescribedStack>>;

    /// Start stack creation, returning the new stack id.
    async fn create_stack(&self, request: &StackRequest) -> DeployResult<Option<String>>;

    /// Start a stack update, returning the stack id.
    async fn update_stack(&self, request: &StackRequest) -> DeployResult<Option<String>>;

    /// Block until the stack reaches `target`, failing if it reaches a failure state.
    async fn wait_until(&self, stack_name: &str, target: WaitTarget) -> DeployResult<()>;
}
