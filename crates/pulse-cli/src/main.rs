use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod output;
mod progress;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("pulse error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    let config = bootstrap::load_config()?;
    let mut ctx = context::AppContext::init(config).await?;

    commands::dispatch::dispatch(cli.command, &mut ctx, &flags)
        .await
        .map_err(explain_auth_expiry)
}

fn explain_auth_expiry(error: anyhow::Error) -> anyhow::Error {
    let expired = error
        .downcast_ref::<pulse_client::ApiError>()
        .is_some_and(pulse_client::ApiError::is_auth_expired)
        || error
            .downcast_ref::<pulse_sync::SyncError>()
            .is_some_and(pulse_sync::SyncError::is_auth_expired);
    if expired {
        error.context("session expired: run `pulse auth login`")
    } else {
        error
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("PULSE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
