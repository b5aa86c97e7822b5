mod args;
mod output;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use restorrent_core::{
    load_config, load_config_from_env, resolve_data_dir, run_session, validate_config, Config,
    NoPrompt, Prompt, PromptInterrupts, RestoreOptions, Restorer, SanitizedConfig,
    TerminalPrompt, TrackerCredentials, TrackerSession, TransmissionClient,
};

use args::Args;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    // Logs go to stderr so stdout only carries the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load(&args)?;
    info!(
        "Configuration: {}",
        serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default()
    );

    let credentials = tracker_credentials(&config)?;
    let data_dir = resolve_data_dir(&args.data_dir)
        .with_context(|| format!("Invalid data directory {:?}", args.data_dir))?;

    let client = TransmissionClient::new(&config.transmission)
        .context("Failed to create Transmission client")?;
    info!("Using Transmission at {}", client.url());

    let options = RestoreOptions::from(&config.restore);
    let (prompt, interrupts): (Box<dyn Prompt>, Option<Arc<PromptInterrupts>>) =
        if options.batch_mode {
            (Box::new(NoPrompt), None)
        } else {
            let prompt = TerminalPrompt::new();
            let interrupts = prompt.interrupts();
            (Box::new(prompt), Some(interrupts))
        };

    let restorer = Restorer::new(Arc::new(client), options);
    let mut tracker = TrackerSession::new(&config.tracker, credentials, prompt);

    let outcome = tokio::select! {
        biased;
        _ = wait_for_interrupt(interrupts) => None,
        result = run_session(&mut tracker, &restorer, &data_dir) => Some(result),
    };

    // No-op when the run finished on its own
    tracker.exit().await;

    let report = match outcome {
        Some(result) => result.context("Restore failed")?,
        None => bail!("Interrupted"),
    };

    output::print_report(&report, args.json)
}

fn load(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None => load_config_from_env().context("Failed to load config from environment")?,
    };

    args.apply(&mut config);
    validate_config(&config).context("Configuration validation failed")?;

    Ok(config)
}

fn tracker_credentials(config: &Config) -> Result<TrackerCredentials> {
    if config.tracker.username.is_empty() {
        bail!("Tracker user name is required (--tracker-user or RESTORRENT_TRACKER_USER)");
    }
    if config.tracker.password.is_empty() {
        bail!("Tracker password is required (--tracker-password or RESTORRENT_TRACKER_PASSWORD)");
    }

    Ok(TrackerCredentials::new(
        config.tracker.username.clone(),
        config.tracker.password.clone(),
    ))
}

/// Resolves on the first Ctrl-C that did not cancel a question.
async fn wait_for_interrupt(interrupts: Option<Arc<PromptInterrupts>>) {
    let mut seen = 0;

    loop {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }

        match &interrupts {
            Some(interrupts) if interrupts.belongs_to_prompt(&mut seen) => continue,
            _ => {
                warn!("Interrupted, logging out");
                return;
            }
        }
    }
}
