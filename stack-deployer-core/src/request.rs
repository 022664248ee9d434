//! CloudFormation stack request payload derived from stack options

use crate::config::{KeyValues, RollbackConfiguration, StackOption, StackOptions};
use crate::error::{DeployError, DeployResult};
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRecord {
    pub parameter_key: String,
    pub parameter_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    pub key: String,
    pub value: String,
}

/// The request sent to `CreateStack` and `UpdateStack`.
///
/// Built from [`StackOptions`]; parameter and tag entries whose value is `null`
/// are dropped, the rest keep their configured order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackRequest {
    pub stack_name: Option<String>,
    pub template_body: Option<String>,
    pub template_url: Option<String>,
    pub parameters: Option<Vec<ParameterRecord>>,
    pub tags: Option<Vec<TagRecord>>,
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

impl StackRequest {
    pub fn from_options(options: &StackOptions) -> Self {
        Self {
            stack_name: options.stack_name.clone(),
            template_body: options.template_body.clone(),
            template_url: options.template_url.clone(),
            parameters: options.parameters.as_ref().map(|entries| {
                defined(entries)
                    .map(|(key, value)| ParameterRecord {
                        parameter_key: key,
                        parameter_value: value,
                    })
                    .collect()
            }),
            tags: options.tags.as_ref().map(|entries| {
                defined(entries)
                    .map(|(key, value)| TagRecord { key, value })
                    .collect()
            }),
            capabilities: options.capabilities.clone(),
            resource_types: options.resource_types.clone(),
            role_arn: options.role_arn.clone(),
            stack_policy_body: options.stack_policy_body.clone(),
            stack_policy_url: options.stack_policy_url.clone(),
            notification_arns: options.notification_arns.clone(),
            timeout_in_minutes: options.timeout_in_minutes,
            disable_rollback: options.disable_rollback,
            rollback_configuration: options.rollback_configuration.clone(),
            on_failure: options.on_failure.clone(),
            enable_termination_protection: options.enable_termination_protection,
        }
    }

    pub fn require_stack_name(&self) -> DeployResult<&str> {
        self.stack_name.as_deref().ok_or_else(|| {
            DeployError::configuration(format!(
                "'{}' is required",
                StackOption::StackName.option_name()
            ))
        })
    }

    /// Options that are set but not accepted by `UpdateStack`.
    pub fn create_only_options(&self) -> Vec<StackOption> {
        StackOption::ALL
            .into_iter()
            .filter(|option| option.is_create_only() && self.field(*option).is_some())
            .collect()
    }

    /// The request as a flat JSON object keyed by CloudFormation field names.
    pub fn to_value(&self) -> Value {
        let mut payload = Map::new();
        for option in StackOption::ALL {
            if let Some(value) = self.field(option) {
                payload.insert(option.request_field().to_string(), value);
            }
        }
        Value::Object(payload)
    }

    fn field(&self, option: StackOption) -> Option<Value> {
        match option {
            StackOption::StackName => self.stack_name.as_deref().map(Value::from),
            StackOption::TemplateBody => self.template_body.as_deref().map(Value::from),
            StackOption::TemplateUrl => self.template_url.as_deref().map(Value::from),
            StackOption::Parameters => self.parameters.as_ref().map(|records| {
                records
                    .iter()
                    .map(|p| json!({"ParameterKey": p.parameter_key, "ParameterValue": p.parameter_value}))
                    .collect()
            }),
            StackOption::Tags => self.tags.as_ref().map(|records| {
                records
                    .iter()
                    .map(|t| json!({"Key": t.key, "Value": t.value}))
                    .collect()
            }),
            StackOption::Capabilities => self.capabilities.clone().map(Value::from),
            StackOption::ResourceTypes => self.resource_types.clone().map(Value::from),
            StackOption::RoleArn => self.role_arn.as_deref().map(Value::from),
            StackOption::StackPolicyBody => self.stack_policy_body.as_deref().map(Value::from),
            StackOption::StackPolicyUrl => self.stack_policy_url.as_deref().map(Value::from),
            StackOption::NotificationArns => self.notification_arns.clone().map(Value::from),
            StackOption::TimeoutInMinutes => self.timeout_in_minutes.map(Value::from),
            StackOption::DisableRollback => self.disable_rollback.map(Value::from),
            StackOption::RollbackConfiguration => {
                self.rollback_configuration.as_ref().map(|config| json!(config))
            }
            StackOption::OnFailure => self.on_failure.as_deref().map(Value::from),
            StackOption::EnableTerminationProtection => {
                self.enable_termination_protection.map(Value::from)
            }
        }
    }
}

impl Serialize for StackRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn defined(entries: &KeyValues) -> impl Iterator<Item = (String, String)> + '_ {
    entries
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|value| (key.clone(), value.clone())))
}
