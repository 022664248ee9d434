//! Create, update and create-or-update logic for the stack deployer

use crate::aws::WaitTarget;
use crate::error::{DeployError, DeployResult};
use crate::types::DeployOutcome;
use log::{debug, info};

impl super::service::StackDeployer {
    /// Whether the configured stack exists.
    ///
    /// Only a failure whose message ends in "does not exist" reads as `false`;
    /// every other failure is returned unchanged.
    pub async fn stack_exists(&self) -> DeployResult<bool> {
        let stack_name = self.request().require_stack_name()?;
        match self.api.describe_stacks(stack_name).await {
            Ok(_) => Ok(true),
            Err(DeployError::Remote(err)) if err.is_stack_missing() => {
                debug!("Stack {stack_name} not found: {err}");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Create the stack and wait until creation completes.
    pub async fn create_stack(&self) -> DeployResult<DeployOutcome> {
        let stack_name = self.request().require_stack_name()?;

        info!("Creating stack {stack_name}");
        let stack_id = self.api.create_stack(self.request()).await?;
        self.api
            .wait_until(stack_name, WaitTarget::StackCreateComplete)
            .await?;
        info!("Stack {stack_name} created");

        Ok(DeployOutcome::Created { stack_id })
    }

    /// Update the stack and wait until the update completes.
    ///
    /// An update CloudFormation rejects with "No updates are to be performed" is a
    /// successful no-op and is not waited on.
    pub async fn update_stack(&self) -> DeployResult<DeployOutcome> {
        let stack_name = self.request().require_stack_name()?;

        info!("Updating stack {stack_name}");
        let stack_id = match self.api.update_stack(self.request()).await {
            Ok(stack_id) => stack_id,
            Err(DeployError::Remote(err)) if err.is_no_updates() => {
                info!("Stack {stack_name} is already up to date");
                return Ok(DeployOutcome::NoChanges);
            }
            Err(err) => return Err(err),
        };

        self.api
            .wait_until(stack_name, WaitTarget::StackUpdateComplete)
            .await?;
        info!("Stack {stack_name} updated");

        Ok(DeployOutcome::Updated { stack_id })
    }

    /// Update the stack if it exists, create it otherwise.
    pub async fn create_or_update_stack(&self) -> DeployResult<DeployOutcome> {
        if self.stack_exists().await? {
            self.update_stack().await
        } else {
            self.create_stack().await
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::aws::{Operation, RemoteError, WaitTarget};
    use crate::commands::test_support::{Call, FakeStackApi, STACK_ID};
    use crate::commands::StackDeployer;
    use crate::config::Configuration;
    use crate::error::DeployError;
    use crate::types::DeployOutcome;
    use serde_json::json;

    fn deployer(api: &FakeStackApi) -> StackDeployer {
        let config = Configuration::from_value(json!({
            "stackName": "myStack",
            "templateBody": "<body>",
            "parameters": {"key1": "val1", "key2": "val2", "key3": null},
            "tags": {"key1": "val1"},
        }))
        .unwrap();
        StackDeployer::with_api(api.clone(), &config).unwrap()
    }

    fn missing_stack() -> RemoteError {
        RemoteError::new(
            Operation::DescribeStacks,
            "Stack with id myStack does not exist",
        )
        .with_code("ValidationError")
    }

    fn no_updates() -> RemoteError {
        RemoteError::new(Operation::UpdateStack, "No updates are to be performed.")
            .with_code("ValidationError")
    }

    #[tokio::test]
    async fn test_stack_exists_true_on_success() {
        let api = FakeStackApi::default();
        assert!(deployer(&api).stack_exists().await.unwrap());
        assert_eq!(api.calls(), vec![Call::DescribeStacks("myStack".into())]);
    }

    #[tokio::test]
    async fn test_stack_exists_false_when_missing() {
        let api = FakeStackApi::default().with_describe(Err(missing_stack()));
        assert!(!deployer(&api).stack_exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_stack_exists_propagates_other_errors() {
        let denied = RemoteError::new(
            Operation::DescribeStacks,
            "User: arn:aws:iam::123456789012:user/ci is not authorized to perform: cloudformation:DescribeStacks",
        )
        .with_code("AccessDenied");
        let api = FakeStackApi::default().with_describe(Err(denied.clone()));

        let err = deployer(&api).stack_exists().await.unwrap_err();
        assert_eq!(err.remote(), Some(&denied));
    }

    #[tokio::test]
    async fn test_stack_exists_requires_stack_name() {
        let api = FakeStackApi::default();
        let deployer = StackDeployer::with_api(
            api.clone(),
            &Configuration::from_value(json!({"templateBody": "<body>"})).unwrap(),
        )
        .unwrap();

        let err = deployer.stack_exists().await.unwrap_err();
        assert!(matches!(err, DeployError::Configuration(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_stack_sends_request_then_waits() {
        let api = FakeStackApi::default();
        let deployer = deployer(&api);

        let outcome = deployer.create_stack().await.unwrap();
        assert_eq!(
            outcome,
            DeployOutcome::Created {
                stack_id: Some(STACK_ID.into())
            }
        );

        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        match &calls[0] {
            Call::CreateStack(request) => {
                assert_eq!(
                    request.to_value(),
                    json!({
                        "StackName": "myStack",
                        "TemplateBody": "<body>",
                        "Parameters": [
                            {"ParameterKey": "key1", "ParameterValue": "val1"},
                            {"ParameterKey": "key2", "ParameterValue": "val2"},
                        ],
                        "Tags": [{"Key": "key1", "Value": "val1"}],
                    })
                );
            }
            other => panic!("Expected CreateStack, got {other:?}"),
        }
        assert_eq!(
            calls[1],
            Call::WaitUntil("myStack".into(), WaitTarget::StackCreateComplete)
        );
    }

    #[tokio::test]
    async fn test_create_stack_failure_skips_wait() {
        let exists = RemoteError::new(Operation::CreateStack, "Stack [myStack] already exists")
            .with_code("AlreadyExistsException");
        let api = FakeStackApi::default().with_create(Err(exists.clone()));

        let err = deployer(&api).create_stack().await.unwrap_err();
        assert_eq!(err.remote(), Some(&exists));
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_create_stack_propagates_wait_failure() {
        let rolled_back = RemoteError::new(
            Operation::Wait(WaitTarget::StackCreateComplete),
            "failed to wait: waiter entered a failure state",
        );
        let api = FakeStackApi::default().with_wait(Err(rolled_back.clone()));

        let err = deployer(&api).create_stack().await.unwrap_err();
        assert_eq!(err.remote(), Some(&rolled_back));
    }

    #[tokio::test]
    async fn test_update_stack_sends_request_then_waits() {
        let api = FakeStackApi::default();
        let outcome = deployer(&api).update_stack().await.unwrap();
        assert_eq!(
            outcome,
            DeployOutcome::Updated {
                stack_id: Some(STACK_ID.into())
            }
        );

        let calls = api.calls();
        assert!(matches!(calls[0], Call::UpdateStack(_)));
        assert_eq!(
            calls[1],
            Call::WaitUntil("myStack".into(), WaitTarget::StackUpdateComplete)
        );
    }

    #[tokio::test]
    async fn test_update_stack_no_updates_is_noop() {
        let api = FakeStackApi::default().with_update(Err(no_updates()));

        let outcome = deployer(&api).update_stack().await.unwrap();
        assert_eq!(outcome, DeployOutcome::NoChanges);

        // No wait after a no-op update
        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(calls[0], Call::UpdateStack(_)));
    }

    #[tokio::test]
    async fn test_update_stack_propagates_other_errors() {
        let in_progress = RemoteError::new(
            Operation::UpdateStack,
            "Stack:arn:aws:cloudformation:us-east-1:123456789012:stack/myStack/1 is in UPDATE_IN_PROGRESS state and can not be updated.",
        )
        .with_code("ValidationError");
        let api = FakeStackApi::default().with_update(Err(in_progress.clone()));

        let err = deployer(&api).update_stack().await.unwrap_err();
        assert_eq!(err.remote(), Some(&in_progress));
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_create_or_update_creates_missing_stack() {
        let api = FakeStackApi::default().with_describe(Err(missing_stack()));

        let outcome = deployer(&api).create_or_update_stack().await.unwrap();
        assert!(matches!(outcome, DeployOutcome::Created { .. }));

        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], Call::DescribeStacks("myStack".into()));
        assert!(matches!(calls[1], Call::CreateStack(_)));
        assert_eq!(
            calls[2],
            Call::WaitUntil("myStack".into(), WaitTarget::StackCreateComplete)
        );
    }

    #[tokio::test]
    async fn test_create_or_update_updates_existing_stack() {
        let api = FakeStackApi::default();

        let outcome = deployer(&api).create_or_update_stack().await.unwrap();
        assert!(matches!(outcome, DeployOutcome::Updated { .. }));

        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[1], Call::UpdateStack(_)));
        assert!(!calls.iter().any(|c| matches!(c, Call::CreateStack(_))));
    }

    #[tokio::test]
    async fn test_create_or_update_with_unchanged_stack() {
        let api = FakeStackApi::default().with_update(Err(no_updates()));

        let outcome = deployer(&api).create_or_update_stack().await.unwrap();
        assert_eq!(outcome, DeployOutcome::NoChanges);
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_create_or_update_stops_on_describe_failure() {
        let throttled = RemoteError::new(Operation::DescribeStacks, "Rate exceeded")
            .with_code("Throttling");
        let api = FakeStackApi::default().with_describe(Err(throttled.clone()));

        let err = deployer(&api).create_or_update_stack().await.unwrap_err();
        assert_eq!(err.remote(), Some(&throttled));
        assert_eq!(api.calls().len(), 1);
    }
}
