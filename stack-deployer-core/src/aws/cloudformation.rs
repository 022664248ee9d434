//! AWS CloudFormation client wrapper for stack operations
//!
// TODO: Fold the create and update builders together if the SDK grows a shared
// input type for the fields both operations accept.

use crate::aws::{DescribedStack, Operation, RemoteError, StackApi, WaitTarget};
use crate::config::RollbackConfiguration;
use crate::error::DeployResult;
use crate::request::{ParameterRecord, StackRequest, TagRecord};
use crate::types::{StackOutput, TemplateSummary};
use async_trait::async_trait;
use aws_sdk_cloudformation::client::Waiters;
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::types::{
    Capability, OnFailure, Parameter, RollbackConfiguration as SdkRollbackConfiguration,
    RollbackTrigger as SdkRollbackTrigger, Tag,
};
use aws_sdk_cloudformation::Client as CloudFormationClient;
use log::debug;
use std::time::Duration;

/// Upper bound on a single wait, matching the service's default waiter
/// (120 attempts, 30 seconds apart).
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(60 * 60);

pub struct CloudFormationApi {
    client: CloudFormationClient,
    max_wait: Duration,
}

impl CloudFormationApi {
    pub fn new(client: CloudFormationClient) -> Self {
        Self {
            client,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }

    #[must_use]
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }
}

#[async_trait]
impl StackApi for CloudFormationApi {
    async fn validate_template(
        &self,
        template_body: Option<&str>,
        template_url: Option<&str>,
    ) -> DeployResult<TemplateSummary> {
        let output = self
            .client
            .validate_template()
            .set_template_body(template_body.map(str::to_string))
            .set_template_url(template_url.map(str::to_string))
            .send()
            .await
            .map_err(|e| remote_error(Operation::ValidateTemplate, &e))?;

        Ok(TemplateSummary {
            description: output.description,
            parameters: output
                .parameters
                .unwrap_or_default()
                .into_iter()
                .filter_map(|p| p.parameter_key)
                .collect(),
            capabilities: output
                .capabilities
                .unwrap_or_default()
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
            capabilities_reason: output.capabilities_reason,
        })
    }

    async fn describe_stacks(&self, stack_name: &str) -> DeployResult<Vec<DescribedStack>> {
        let output = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| remote_error(Operation::DescribeStacks, &e))?;

        Ok(output
            .stacks
            .unwrap_or_default()
            .into_iter()
            .map(|stack| DescribedStack {
                stack_id: stack.stack_id,
                outputs: stack.outputs.map(|outputs| {
                    outputs
                        .into_iter()
                        .map(|o| StackOutput {
                            output_key: o.output_key,
                            output_value: o.output_value,
                            description: o.description,
                        })
                        .collect()
                }),
            })
            .collect())
    }

    async fn create_stack(&self, request: &StackRequest) -> DeployResult<Option<String>> {
        let stack_name = request.require_stack_name()?;
        let output = self
            .client
            .create_stack()
            .stack_name(stack_name)
            .set_template_body(request.template_body.clone())
            .set_template_url(request.template_url.clone())
            .set_parameters(request.parameters.as_deref().map(sdk_parameters))
            .set_tags(request.tags.as_deref().map(sdk_tags))
            .set_capabilities(request.capabilities.as_deref().map(sdk_capabilities))
            .set_resource_types(request.resource_types.clone())
            .set_role_arn(request.role_arn.clone())
            .set_stack_policy_body(request.stack_policy_body.clone())
            .set_stack_policy_url(request.stack_policy_url.clone())
            .set_notification_arns(request.notification_arns.clone())
            .set_timeout_in_minutes(request.timeout_in_minutes)
            .set_disable_rollback(request.disable_rollback)
            .set_rollback_configuration(
                request
                    .rollback_configuration
                    .as_ref()
                    .map(sdk_rollback_configuration),
            )
            .set_on_failure(request.on_failure.as_deref().map(OnFailure::from))
            .set_enable_termination_protection(request.enable_termination_protection)
            .send()
            .await
            .map_err(|e| remote_error(Operation::CreateStack, &e))?;
        Ok(output.stack_id)
    }

    async fn update_stack(&self, request: &StackRequest) -> DeployResult<Option<String>> {
        let stack_name = request.require_stack_name()?;
        for option in request.create_only_options() {
            debug!(
                "{} is not accepted by UpdateStack; skipping it for stack {stack_name}",
                option.request_field()
            );
        }

        let output = self
            .client
            .update_stack()
            .stack_name(stack_name)
            .set_template_body(request.template_body.clone())
            .set_template_url(request.template_url.clone())
            .set_parameters(request.parameters.as_deref().map(sdk_parameters))
            .set_tags(request.tags.as_deref().map(sdk_tags))
            .set_capabilities(request.capabilities.as_deref().map(sdk_capabilities))
            .set_resource_types(request.resource_types.clone())
            .set_role_arn(request.role_arn.clone())
            .set_stack_policy_body(request.stack_policy_body.clone())
            .set_stack_policy_url(request.stack_policy_url.clone())
            .set_notification_arns(request.notification_arns.clone())
            .set_disable_rollback(request.disable_rollback)
            .set_rollback_configuration(
                request
                    .rollback_configuration
                    .as_ref()
                    .map(sdk_rollback_configuration),
            )
            .send()
            .await
            .map_err(|e| remote_error(Operation::UpdateStack, &e))?;
        Ok(output.stack_id)
    }

    async fn wait_until(&self, stack_name: &str, target: WaitTarget) -> DeployResult<()> {
        debug!(
            "Waiting up to {:?} for stack {stack_name} to reach {target}",
            self.max_wait
        );
        match target {
            WaitTarget::StackCreateComplete => {
                self.client
                    .wait_until_stack_create_complete()
                    .stack_name(stack_name)
                    .wait(self.max_wait)
                    .await
                    .map_err(|e| wait_error(target, &e))?;
            }
            WaitTarget::StackUpdateComplete => {
                self.client
                    .wait_until_stack_update_complete()
                    .stack_name(stack_name)
                    .wait(self.max_wait)
                    .await
                    .map_err(|e| wait_error(target, &e))?;
            }
        }
        Ok(())
    }
}

/// Keep the service's own message and code; fall back to the full error chain
/// for failures that never reached the service (dispatch, timeouts).
fn remote_error<E, R>(operation: Operation, err: &SdkError<E, R>) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = err
        .message()
        .map_or_else(|| DisplayErrorContext(err).to_string(), str::to_string);
    let remote = RemoteError::new(operation, message);
    match err.code() {
        Some(code) => remote.with_code(code),
        None => remote,
    }
}

fn wait_error<E: std::error::Error>(target: WaitTarget, err: &E) -> RemoteError {
    RemoteError::new(Operation::Wait(target), DisplayErrorContext(err).to_string())
}

fn sdk_parameters(records: &[ParameterRecord]) -> Vec<Parameter> {
    records
        .iter()
        .map(|p| {
            Parameter::builder()
                .parameter_key(&p.parameter_key)
                .parameter_value(&p.parameter_value)
                .build()
        })
        .collect()
}

fn sdk_tags(records: &[TagRecord]) -> Vec<Tag> {
    records
        .iter()
        .map(|t| Tag::builder().key(&t.key).value(&t.value).build())
        .collect()
}

fn sdk_capabilities(capabilities: &[String]) -> Vec<Capability> {
    capabilities
        .iter()
        .map(|c| Capability::from(c.as_str()))
        .collect()
}

fn sdk_rollback_configuration(config: &RollbackConfiguration) -> SdkRollbackConfiguration {
    let triggers = config.rollback_triggers.as_ref().map(|triggers| {
        triggers
            .iter()
            .map(|t| {
                SdkRollbackTrigger::builder()
                    .arn(&t.arn)
                    .r#type(&t.trigger_type)
                    .build()
            })
            .collect()
    });

    SdkRollbackConfiguration::builder()
        .set_rollback_triggers(triggers)
        .set_monitoring_time_in_minutes(config.monitoring_time_in_minutes)
        .build()
}
