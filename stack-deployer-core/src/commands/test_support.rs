//! Recording in-memory `StackApi` for service tests

use crate::aws::{DescribedStack, RemoteError, StackApi, WaitTarget};
use crate::error::{DeployError, DeployResult};
use crate::request::StackRequest;
use crate::types::TemplateSummary;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

pub(crate) const STACK_ID: &str =
    "arn:aws:cloudformation:us-east-1:123456789012:stack/myStack/4f2b0c60-1a2b-11ee-9c1d-0a1b2c3d4e5f";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    ValidateTemplate {
        template_body: Option<String>,
        template_url: Option<String>,
    },
    DescribeStacks(String),
    CreateStack(StackRequest),
    UpdateStack(StackRequest),
    WaitUntil(String, WaitTarget),
}

struct FakeState {
    calls: Vec<Call>,
    validate: Result<TemplateSummary, RemoteError>,
    describe: Result<Vec<DescribedStack>, RemoteError>,
    create: Result<Option<String>, RemoteError>,
    update: Result<Option<String>, RemoteError>,
    wait: Result<(), RemoteError>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            validate: Ok(TemplateSummary::default()),
            describe: Ok(vec![DescribedStack {
                stack_id: Some(STACK_ID.to_string()),
                outputs: None,
            }]),
            create: Ok(Some(STACK_ID.to_string())),
            update: Ok(Some(STACK_ID.to_string())),
            wait: Ok(()),
        }
    }
}

/// Clones share state, so a test can keep a handle after moving one into a deployer.
#[derive(Clone, Default)]
pub(crate) struct FakeStackApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeStackApi {
    pub(crate) fn with_validate(self, result: Result<TemplateSummary, RemoteError>) -> Self {
        self.state.lock().unwrap().validate = result;
        self
    }

    pub(crate) fn with_describe(self, result: Result<Vec<DescribedStack>, RemoteError>) -> Self {
        self.state.lock().unwrap().describe = result;
        self
    }

    pub(crate) fn with_create(self, result: Result<Option<String>, RemoteError>) -> Self {
        self.state.lock().unwrap().create = result;
        self
    }

    pub(crate) fn with_update(self, result: Result<Option<String>, RemoteError>) -> Self {
        self.state.lock().unwrap().update = result;
        self
    }

    pub(crate) fn with_wait(self, result: Result<(), RemoteError>) -> Self {
        self.state.lock().unwrap().wait = result;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn respond<T: Clone>(
        &self,
        pick: impl Fn(&FakeState) -> &Result<T, RemoteError>,
    ) -> DeployResult<T> {
        let state = self.state.lock().unwrap();
        pick(&*state).clone().map_err(DeployError::from)
    }
}

#[async_trait]
impl StackApi for FakeStackApi {
    async fn validate_template(
        &self,
        template_body: Option<&str>,
        template_url: Option<&str>,
    ) -> DeployResult<TemplateSummary> {
        self.record(Call::ValidateTemplate {
            template_body: template_body.map(str::to_string),
            template_url: template_url.map(str::to_string),
        });
        self.respond(|state| &state.validate)
    }

    async fn describe_stacks(&self, stack_name: &str) -> DeployResult<Vec<DescribedStack>> {
        self.record(Call::DescribeStacks(stack_name.to_string()));
        self.respond(|state| &state.describe)
    }

    async fn create_stack(&self, request: &StackRequest) -> DeployResult<Option<String>> {
        self.record(Call::CreateStack(request.clone()));
        self.respond(|state| &state.create)
    }

    async fn update_stack(&self, request: &StackRequest) -> DeployResult<Option<String>> {
        self.record(Call::UpdateStack(request.clone()));
        self.respond(|state| &state.update)
    }

    async fn wait_until(&self, stack_name: &str, target: WaitTarget) -> DeployResult<()> {
        self.record(Call::WaitUntil(stack_name.to_string(), target));
        self.respond(|state| &state.wait)
    }
}
