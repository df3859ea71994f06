//! fieldlog CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fieldlog::cli::{Cli, Commands};

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Emit(args) => fieldlog::cli::commands::emit::execute(args),
        Commands::Levels => {
            fieldlog::cli::commands::levels::execute(cli.json);
            Ok(())
        }
    };

    if let Err(err) = result {
        fieldlog::cli::handle_error(err, cli.json);
    }
}
