use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Parse CLI arguments first to get verbosity level
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Parse(args) => {
            info!("Parse command: {:?}", args);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(cli::commands::parse::execute(args, cli.config))?;
        }
        Commands::Init => {
            info!("Initializing callout configuration");
            cli::commands::init::execute(cli.config)?;
        }
    }

    Ok(())
}
