//! Stack output retrieval

use crate::error::DeployResult;
use crate::types::StackOutputs;
use log::debug;
use serde_json::Value;

impl super::service::StackDeployer {
    /// Fetch the stack's outputs as a flat key to value mapping.
    ///
    /// Returns an empty mapping when the stack has no outputs.
    pub async fn fetch_outputs(&self) -> DeployResult<StackOutputs> {
        let stack_name = self.request().require_stack_name()?;
        let stacks = self.api.describe_stacks(stack_name).await?;

        let outputs: StackOutputs = stacks
            .into_iter()
            .next()
            .and_then(|stack| stack.outputs)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|output| {
                let key = output.output_key?;
                Some((key, Value::from(output.output_value.unwrap_or_default())))
            })
            .collect();

        debug!("Stack {stack_name} has {} outputs", outputs.len());
        Ok(outputs)
    }
}
