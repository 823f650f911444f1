//! `addrgen web` - run the admin API server.

use addrgen_axum::{ServerConfig, start_server};

use crate::commands::WebArgs;
use crate::error::CliError;

/// Build the server config from CLI arguments.
pub fn server_config(args: &WebArgs) -> Result<ServerConfig, CliError> {
    let generator = args.generator.to_settings()?;
    let mut config = ServerConfig::for_generator(generator);
    config.port = args.port;
    config.countries_file = args.generator.location.countries_file();

    if let Some(dir) = &args.static_dir {
        if !dir.is_dir() {
            return Err(CliError::Config(format!(
                "Static directory does not exist: {}",
                dir.display()
            )));
        }
        config = config.with_static_dir(dir);
    }

    if !args.allowed_origins.is_empty() {
        config = config.with_allowed_origins(args.allowed_origins.clone());
    }

    Ok(config)
}

/// Run the server until it stops.
pub async fn execute(args: &WebArgs) -> Result<(), CliError> {
    let config = server_config(args)?;
    tracing::info!(port = config.port, "Starting addrgen web server");
    start_server(config)
        .await
        .map_err(|e| CliError::Server(format!("{e:#}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Commands;
    use crate::parser::Cli;
    use addrgen_axum::CorsConfig;
    use clap::Parser;

    fn web_args(extra: &[&str]) -> WebArgs {
        let mut argv = vec!["addrgen", "web"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Some(Commands::Web(args)) => args,
            _ => panic!("expected web command"),
        }
    }

    #[test]
    fn missing_static_dir_is_rejected() {
        let err = server_config(&web_args(&["--static-dir", "/nonexistent/dist"])).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn origins_restrict_cors() {
        let dir = tempfile::tempdir().unwrap();
        let config = server_config(&web_args(&[
            "--allowed-origin",
            "http://admin.local",
            "--static-dir",
            dir.path().to_str().unwrap(),
        ]))
        .unwrap();

        assert!(matches!(
            config.cors,
            CorsConfig::AllowOrigins(ref origins) if origins == &["http://admin.local"]
        ));
        assert_eq!(config.static_dir.as_deref(), Some(dir.path()));
    }
}
