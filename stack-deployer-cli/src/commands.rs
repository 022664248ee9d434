//! Subcommand handlers for the stack-deployer binary

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use stack_deployer_core::{Configuration, StackDeployer, StackOption, StackOptions, StackRequest};

use crate::{Cli, Command};

pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli).await?;

    match cli.command {
        Command::Payload => {
            let options = StackOptions::from_config(&config).context("Invalid stack options")?;
            print_json(&StackRequest::from_options(&options))
        }
        Command::Validate => {
            let summary = connect(&config)
                .await?
                .validate_template()
                .await
                .context("Template validation failed")?;
            print_json(&summary)
        }
        Command::Exists => {
            let exists = connect(&config)
                .await?
                .stack_exists()
                .await
                .context("Failed to describe stack")?;
            println!("{exists}");
            Ok(())
        }
        Command::Create => {
            let outcome = connect(&config)
                .await?
                .create_stack()
                .await
                .context("Stack creation failed")?;
            print_json(&outcome)
        }
        Command::Update => {
            let outcome = connect(&config)
                .await?
                .update_stack()
                .await
                .context("Stack update failed")?;
            print_json(&outcome)
        }
        Command::Deploy => {
            let outcome = connect(&config)
                .await?
                .create_or_update_stack()
                .await
                .context("Stack deployment failed")?;
            info!("Deployment finished: {outcome:?}");
            print_json(&outcome)
        }
        Command::Outputs => {
            let outputs = connect(&config)
                .await?
                .fetch_outputs()
                .await
                .context("Failed to fetch stack outputs")?;
            print_json(&outputs)
        }
    }
}

/// Build an SDK-backed deployer; only subcommands that talk to AWS call this.
async fn connect(config: &Configuration) -> Result<StackDeployer> {
    StackDeployer::new(config)
        .await
        .context("Failed to initialize stack deployer")
}

/// Load the configuration file and apply command-line overrides.
async fn load_config(cli: &Cli) -> Result<Configuration> {
    let mut config = Configuration::load(&cli.config)
        .await
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    if let Some(region) = &cli.region {
        config.set("region", region.as_str());
    }
    if let Some(profile) = &cli.profile {
        config.set("profile", profile.as_str());
    }
    if let Some(stack_name) = &cli.stack_name {
        config.set(StackOption::StackName.option_name(), stack_name.as_str());
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{rendered}");
    Ok(())
}
