//! CLI entry point - the composition root.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use addrgen_cli::{Cli, CliError, Commands, handlers};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Web(args) => handlers::web::execute(&args).await,
        Commands::Countries(location) => handlers::countries::execute(&location).await,
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables before clap reads ADDRGEN_* defaults
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        // No command provided - show help
        let _ = Cli::command().print_help();
        return;
    };

    if let Err(e) = run(command).await {
        tracing::error!(error = %e, "addrgen failed");
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
