mod cli;
mod color;
mod config;
mod input;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::Config;
use github_backend::GitHubClient;
use input::{Invocation, RawInputs};
use label_state_core::{LabelStore, OperationContext, Outcome};
use label_state_mock::FixtureStore;
use output::{output_error, output_outcome, StepOutputs};
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::filter::LevelFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    color::init(cli.color);
    init_tracing(&cli);

    let outputs = StepOutputs::from_env();

    match run(&cli) {
        Ok((outcome, invocation)) => {
            let operation = invocation.request.operation();
            output_outcome(&outcome, operation, cli.format);
            if let Err(e) = outputs.write_outcome(&outcome, operation) {
                warn!("{:#}", e);
            }
            // A soft miss (success == false) is not a failure
            ExitCode::SUCCESS
        }
        Err(e) => {
            let message = format!("{:#}", e);
            output_error(&message, cli.format);
            if let Err(e) = outputs.write_failure(&message) {
                warn!("{:#}", e);
            }
            ExitCode::from(1)
        }
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        LevelFilter::ERROR
    } else if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(Outcome, Invocation)> {
    let invocation = input::validate(&RawInputs {
        operation: cli.operation.clone(),
        issue_number: cli.issue_number.clone(),
        repository: cli
            .repository
            .clone()
            .or_else(|| std::env::var("GITHUB_REPOSITORY").ok()),
        key: cli.key.clone(),
        value: cli.value.clone(),
    })?;

    let mut config = Config::load(cli.config.as_deref())?;
    config.merge_with_cli(
        cli.prefix.clone(),
        cli.separator.clone(),
        cli.token.clone(),
        cli.api_url.clone(),
    );
    let state_config = config.state_config()?;

    let store = open_store(&config)?;
    let ctx = OperationContext::new(
        store.as_ref(),
        &invocation.owner,
        &invocation.repo,
        invocation.issue_number,
        &state_config,
    );

    let outcome = label_state_core::execute(&ctx, &invocation.request)?;
    Ok((outcome, invocation))
}

/// Pick the label store: fixture directory in mock mode, GitHub otherwise
fn open_store(config: &Config) -> Result<Box<dyn LabelStore>> {
    if let Some(dir) = label_state_mock::get_mock_dir() {
        debug!(dir = %dir.display(), "Using fixture label store");
        return Ok(Box::new(FixtureStore::new(dir)?));
    }

    let token = config.require_token()?;
    debug!(api_url = %config.api_url, "Using GitHub label store");
    Ok(Box::new(GitHubClient::with_base_url(&config.api_url, token)))
}
