//! CLI entry point - the composition root.
//!
//! Bootstrap builds the context once; command dispatch routes to handlers.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use recite_cli::handlers::speak::SpeakArgs;
use recite_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

/// Logs go to stderr so `--json` output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = bootstrap(CliConfig::from_env()?)?;

    match cli.command {
        Commands::Speak {
            text,
            file,
            rate,
            pitch,
            voice,
            json,
            interactive,
        } => {
            let args = SpeakArgs {
                text,
                file,
                rate,
                pitch,
                voice,
                json,
                interactive,
            };
            handlers::speak::execute(&ctx, args).await?;
        }
        Commands::Voices { json } => handlers::voices::execute(&ctx, json)?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads RECITE_* fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        tracing::debug!(error = ?err, "Command failed");
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }

    Ok(())
}
