//! Stack options and the option-name to request-field table

use super::auth::AUTH_KEYS;
use super::{string_value, type_mismatch, Configuration};
use crate::error::{DeployError, DeployResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every stack option the deployer understands.
///
/// This is the single table mapping configuration option names to CloudFormation
/// request field names. Options not listed here are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackOption {
    StackName,
    TemplateBody,
    TemplateUrl,
    Parameters,
    Tags,
    Capabilities,
    ResourceTypes,
    RoleArn,
    StackPolicyBody,
    StackPolicyUrl,
    NotificationArns,
    TimeoutInMinutes,
    DisableRollback,
    RollbackConfiguration,
    OnFailure,
    EnableTerminationProtection,
}

impl StackOption {
    pub const ALL: [StackOption; 16] = [
        Self::StackName,
        Self::TemplateBody,
        Self::TemplateUrl,
        Self::Parameters,
        Self::Tags,
        Self::Capabilities,
        Self::ResourceTypes,
        Self::RoleArn,
        Self::StackPolicyBody,
        Self::StackPolicyUrl,
        Self::NotificationArns,
        Self::TimeoutInMinutes,
        Self::DisableRollback,
        Self::RollbackConfiguration,
        Self::OnFailure,
        Self::EnableTerminationProtection,
    ];

    /// Name of the option in a [`Configuration`].
    pub const fn option_name(self) -> &'static str {
        match self {
            Self::StackName => "stackName",
            Self::TemplateBody => "templateBody",
            Self::TemplateUrl => "templateURL",
            Self::Parameters => "parameters",
            Self::Tags => "tags",
            Self::Capabilities => "capabilities",
            Self::ResourceTypes => "resourceTypes",
            Self::RoleArn => "roleARN",
            Self::StackPolicyBody => "stackPolicyBody",
            Self::StackPolicyUrl => "stackPolicyURL",
            Self::NotificationArns => "notificationARNs",
            Self::TimeoutInMinutes => "timeoutInMinutes",
            Self::DisableRollback => "disableRollback",
            Self::RollbackConfiguration => "rollbackConfiguration",
            Self::OnFailure => "onFailure",
            Self::EnableTerminationProtection => "enableTerminationProtection",
        }
    }

    /// Name of the field in a CloudFormation stack request.
    pub const fn request_field(self) -> &'static str {
        match self {
            Self::StackName => "StackName",
            Self::TemplateBody => "TemplateBody",
            Self::TemplateUrl => "TemplateURL",
            Self::Parameters => "Parameters",
            Self::Tags => "Tags",
            Self::Capabilities => "Capabilities",
            Self::ResourceTypes => "ResourceTypes",
            Self::RoleArn => "RoleARN",
            Self::StackPolicyBody => "StackPolicyBody",
            Self::StackPolicyUrl => "StackPolicyURL",
            Self::NotificationArns => "NotificationARNs",
            Self::TimeoutInMinutes => "TimeoutInMinutes",
            Self::DisableRollback => "DisableRollback",
            Self::RollbackConfiguration => "RollbackConfiguration",
            Self::OnFailure => "OnFailure",
            Self::EnableTerminationProtection => "EnableTerminationProtection",
        }
    }

    /// Accepted by `CreateStack` but not by `UpdateStack`.
    pub const fn is_create_only(self) -> bool {
        matches!(
            self,
            Self::TimeoutInMinutes | Self::OnFailure | Self::EnableTerminationProtection
        )
    }

    pub fn from_option_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|option| option.option_name() == name)
    }
}

/// Ordered name/value entries of a `parameters` or `tags` option.
///
/// A `None` value marks an entry that was present but `null`; such entries are
/// kept here and dropped when the request is built.
pub type KeyValues = Vec<(String, Option<String>)>;

/// Rollback triggers, forwarded verbatim in CloudFormation's own field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RollbackConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollback_triggers: Option<Vec<RollbackTrigger>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring_time_in_minutes: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RollbackTrigger {
    pub arn: String,
    #[serde(rename = "Type")]
    pub trigger_type: String,
}

/// Stack-shaped options read from a [`Configuration`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackOptions {
    pub stack_name: Option<String>,
    pub template_body: Option<String>,
    pub template_url: Option<String>,
    pub parameters: Option<KeyValues>,
    pub tags: Option<KeyValues>,
    pub capabilities: Option<Vec<String>>,
    pub resource_types: Option<Vec<String>>,
    pub role_arn: Option<String>,
    pub stack_policy_body: Option<String>,
    pub stack_policy_url: Option<String>,
    pub notification_arns: Option<Vec<String>>,
    pub timeout_in_minutes: Option<i32>,
    pub disable_rollback: Option<bool>,
    pub rollback_configuration: Option<RollbackConfiguration>,
    pub on_failure: Option<String>,
    pub enable_termination_protection: Option<bool>,
}

impl StackOptions {
    /// Read every non-authentication option of a configuration.
    pub fn from_config(config: &Configuration) -> DeployResult<Self> {
        let mut options = Self::default();
        for (name, value) in config.iter() {
            if AUTH_KEYS.contains(&name) {
                continue;
            }
            let option = StackOption::from_option_name(name)
                .ok_or_else(|| DeployError::configuration(format!("Unknown option '{name}'")))?;
            options.apply(option, value)?;
        }
        Ok(options)
    }

    fn apply(&mut self, option: StackOption, value: &Value) -> DeployResult<()> {
        let name = option.option_name();
        match option {
            StackOption::StackName => self.stack_name = string_value(name, value)?,
            StackOption::TemplateBody => self.template_body = string_value(name, value)?,
            StackOption::TemplateUrl => self.template_url = string_value(name, value)?,
            StackOption::Parameters => self.parameters = key_values(name, value)?,
            StackOption::Tags => self.tags = key_values(name, value)?,
            StackOption::Capabilities => self.capabilities = string_list(name, value)?,
            StackOption::ResourceTypes => self.resource_types = string_list(name, value)?,
            StackOption::RoleArn => self.role_arn = string_value(name, value)?,
            StackOption::StackPolicyBody => self.stack_policy_body = string_value(name, value)?,
            StackOption::StackPolicyUrl => self.stack_policy_url = string_value(name, value)?,
            StackOption::NotificationArns => self.notification_arns = string_list(name, value)?,
            StackOption::TimeoutInMinutes => self.timeout_in_minutes = integer(name, value)?,
            StackOption::DisableRollback => self.disable_rollback = boolean(name, value)?,
            StackOption::RollbackConfiguration => {
                self.rollback_configuration = rollback_configuration(name, value)?;
            }
            StackOption::OnFailure => self.on_failure = string_value(name, value)?,
            StackOption::EnableTerminationProtection => {
                self.enable_termination_protection = boolean(name, value)?;
            }
        }
        Ok(())
    }
}

fn key_values(name: &str, value: &Value) -> DeployResult<Option<KeyValues>> {
    let entries = match value {
        Value::Null => return Ok(None),
        Value::Object(entries) => entries,
        other => return Err(type_mismatch(name, "an object", other)),
    };

    entries
        .iter()
        .map(|(key, entry)| {
            let entry = match entry {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                other => {
                    return Err(type_mismatch(
                        &format!("{name}.{key}"),
                        "a string, number or boolean",
                        other,
                    ))
                }
            };
            Ok((key.clone(), entry))
        })
        .collect::<DeployResult<KeyValues>>()
        .map(Some)
}

fn string_list(name: &str, value: &Value) -> DeployResult<Option<Vec<String>>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(type_mismatch(name, "an array of strings", other)),
            })
            .collect::<DeployResult<Vec<String>>>()
            .map(Some),
        other => Err(type_mismatch(name, "an array of strings", other)),
    }
}

fn integer(name: &str, value: &Value) -> DeployResult<Option<i32>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| type_mismatch(name, "a 32-bit integer", value)),
        other => Err(type_mismatch(name, "an integer", other)),
    }
}

fn boolean(name: &str, value: &Value) -> DeployResult<Option<bool>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        other => Err(type_mismatch(name, "a boolean", other)),
    }
}

fn rollback_configuration(
    name: &str,
    value: &Value,
) -> DeployResult<Option<RollbackConfiguration>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(_) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| DeployError::configuration(format!("Option '{name}' is invalid: {e}"))),
        other => Err(type_mismatch(name, "an object", other)),
    }
}
