//! Template validation for the stack deployer

use crate::config::StackOption;
use crate::error::{DeployError, DeployResult};
use crate::types::TemplateSummary;
use log::debug;

impl super::service::StackDeployer {
    /// Validate the configured template body and/or URL with CloudFormation.
    ///
    /// Remote validation failures are returned unchanged.
    pub async fn validate_template(&self) -> DeployResult<TemplateSummary> {
        let request = self.request();
        let template_body = request.template_body.as_deref();
        let template_url = request.template_url.as_deref();

        if template_body.is_none() && template_url.is_none() {
            return Err(DeployError::configuration(format!(
                "'{}' or '{}' is required to validate a template",
                StackOption::TemplateBody.option_name(),
                StackOption::TemplateUrl.option_name()
            )));
        }

        debug!(
            "Validating template (inline body: {}, url: {})",
            template_body.is_some(),
            template_url.unwrap_or("none")
        );
        self.api.validate_template(template_body, template_url).await
    }
}

#[cfg(test)]
mod tests {
    use crate::aws::{Operation, RemoteError};
    use crate::commands::test_support::{Call, FakeStackApi};
    use crate::commands::StackDeployer;
    use crate::config::Configuration;
    use crate::error::DeployError;
    use crate::types::TemplateSummary;
    use serde_json::json;

    fn deployer(api: &FakeStackApi, value: serde_json::Value) -> StackDeployer {
        StackDeployer::with_api(api.clone(), &Configuration::from_value(value).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_validate_sends_body_and_url() {
        let summary = TemplateSummary {
            description: Some("Bucket stack".into()),
            parameters: vec!["BucketName".into()],
            capabilities: vec![],
            capabilities_reason: None,
        };
        let api = FakeStackApi::default().with_validate(Ok(summary.clone()));
        let deployer = deployer(
            &api,
            json!({
                "templateBody": "<body>",
                "templateURL": "https://s3.amazonaws.com/bucket/template.yaml",
            }),
        );

        let result = deployer.validate_template().await.unwrap();
        assert_eq!(result, summary);
        assert_eq!(
            api.calls(),
            vec![Call::ValidateTemplate {
                template_body: Some("<body>".into()),
                template_url: Some("https://s3.amazonaws.com/bucket/template.yaml".into()),
            }]
        );
    }

    #[tokio::test]
    async fn test_validate_propagates_remote_error_unchanged() {
        let remote = RemoteError::new(
            Operation::ValidateTemplate,
            "Template format error: Unresolved resource dependencies [Bucket] in the Resources block of the template",
        )
        .with_code("ValidationError");
        let api = FakeStackApi::default().with_validate(Err(remote.clone()));
        let deployer = deployer(&api, json!({"templateBody": "<body>"}));

        let err = deployer.validate_template().await.unwrap_err();
        assert_eq!(err.remote(), Some(&remote));
        assert_eq!(err.to_string(), remote.message());
    }

    #[tokio::test]
    async fn test_validate_requires_a_template() {
        let api = FakeStackApi::default();
        let deployer = deployer(&api, json!({"stackName": "myStack"}));

        let err = deployer.validate_template().await.unwrap_err();
        assert!(matches!(err, DeployError::Configuration(_)));
        assert!(api.calls().is_empty());
    }
}
