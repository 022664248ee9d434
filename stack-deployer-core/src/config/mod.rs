//! Flat deployer configuration and its split into credentials and stack options.
//!
//! A [`Configuration`] is an ordered mapping from option name to JSON value. The
//! same configuration is read twice, independently: once into [`AuthParams`] for
//! building the CloudFormation client, once into [`StackOptions`] for shaping
//! stack requests.

mod auth;
mod options;

pub use auth::{AuthParams, CredentialSource, AUTH_KEYS};
pub use options::{KeyValues, RollbackConfiguration, RollbackTrigger, StackOption, StackOptions};

use crate::error::{DeployError, DeployResult};
use log::debug;
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

/// Prefix marking a `templateBody` value as a reference to a file on disk.
pub const FILE_REFERENCE_PREFIX: &str = "file://";

#[derive(Clone, Default, PartialEq)]
pub struct Configuration {
    entries: Map<String, Value>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from a JSON object.
    pub fn from_value(value: Value) -> DeployResult<Self> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(DeployError::configuration(format!(
                "Configuration must be a JSON object, found {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn from_json_str(text: &str) -> DeployResult<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            DeployError::configuration(format!("Failed to parse configuration JSON: {e}"))
        })?;
        Self::from_value(value)
    }

    /// Load a JSON configuration file.
    ///
    /// A `templateBody` of the form `file://<path>` is replaced with the contents of
    /// that file, resolved relative to the configuration file's directory.
    pub async fn load(path: impl AsRef<Path>) -> DeployResult<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DeployError::io(path, e))?;
        let mut config = Self::from_json_str(&text)?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_template_file(base_dir).await?;
        Ok(config)
    }

    /// Dereference a `file://` template body, relative to `base_dir`.
    pub async fn resolve_template_file(&mut self, base_dir: &Path) -> DeployResult<()> {
        let key = StackOption::TemplateBody.option_name();
        let reference = match self.entries.get(key) {
            Some(Value::String(body)) => match body.strip_prefix(FILE_REFERENCE_PREFIX) {
                Some(reference) => reference.to_string(),
                None => return Ok(()),
            },
            _ => return Ok(()),
        };

        let template_path = base_dir.join(reference);
        debug!("Reading template body from {}", template_path.display());
        let body = tokio::fs::read_to_string(&template_path)
            .await
            .map_err(|e| DeployError::io(&template_path, e))?;
        self.entries.insert(key.to_string(), Value::String(body));
        Ok(())
    }

    /// Set an option, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl From<Map<String, Value>> for Configuration {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.entries {
            if key == auth::SECRET_ACCESS_KEY {
                map.entry(key, &"<redacted>");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

/// Read a string-valued option; `null` reads as absent.
pub(crate) fn string_value(name: &str, value: &Value) -> DeployResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => Err(type_mismatch(name, "a string", other)),
    }
}

pub(crate) fn type_mismatch(name: &str, expected: &str, found: &Value) -> DeployError {
    DeployError::configuration(format!(
        "Option '{name}' must be {expected}, found {}",
        json_type_name(found)
    ))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
