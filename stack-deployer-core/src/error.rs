//! Error types for Stack Deployer operations

use crate::aws::RemoteError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the stack deployment adapter.
///
/// Remote failures are carried as [`RemoteError`] and display the remote API's
/// original message unchanged.
#[derive(Error, Debug)]
pub enum DeployError {
    /// Malformed or rejected configuration, reported before any remote call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A configuration file or referenced template could not be read.
    #[error("Failed to read '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CloudFormation API rejected a call.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub type DeployResult<T> = Result<T, DeployError>;

impl DeployError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The remote failure behind this error, if any.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(err) => Some(err),
            _ => None,
        }
    }
}
