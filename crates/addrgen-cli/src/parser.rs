//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the address generation admin server.
#[derive(Parser)]
#[command(name = "addrgen")]
#[command(about = "Run and monitor address generation jobs")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn web_defaults() {
        let cli = Cli::parse_from(["addrgen", "web"]);
        let Some(Commands::Web(args)) = cli.command else {
            panic!("expected web command");
        };
        assert_eq!(args.port, 8787);
        assert!(args.allowed_origins.is_empty());

        let settings = args.generator.to_settings().unwrap();
        assert_eq!(settings.program, PathBuf::from("python3"));
        assert_eq!(settings.args, vec!["index.py"]);
        assert_eq!(settings.kill_grace_ms, 2000);
        assert_eq!(
            args.generator.location.countries_file(),
            PathBuf::from("./address/countries_cache.json")
        );
    }

    #[test]
    fn web_overrides() {
        let cli = Cli::parse_from([
            "addrgen",
            "-v",
            "web",
            "--port",
            "9000",
            "--generator-program",
            "/usr/bin/python3",
            "--generator-arg",
            "-u",
            "--generator-arg",
            "index.py",
            "--generator-dir",
            "/srv/address",
            "--kill-grace-ms",
            "500",
            "--allowed-origin",
            "http://localhost:5173",
        ]);
        assert!(cli.verbose);
        let Some(Commands::Web(args)) = cli.command else {
            panic!("expected web command");
        };
        assert_eq!(args.port, 9000);
        assert_eq!(args.allowed_origins, vec!["http://localhost:5173"]);

        let settings = args.generator.to_settings().unwrap();
        assert_eq!(settings.args, vec!["-u", "index.py"]);
        assert_eq!(settings.working_dir, PathBuf::from("/srv/address"));
        assert_eq!(settings.kill_grace_ms, 500);
    }

    #[test]
    fn invalid_grace_is_a_config_error() {
        let cli = Cli::parse_from(["addrgen", "web", "--kill-grace-ms", "10"]);
        let Some(Commands::Web(args)) = cli.command else {
            panic!("expected web command");
        };
        let err = args.generator.to_settings().unwrap_err();
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn explicit_countries_file_wins() {
        let cli = Cli::parse_from([
            "addrgen",
            "countries",
            "--countries-file",
            "/tmp/countries.json",
        ]);
        let Some(Commands::Countries(location)) = cli.command else {
            panic!("expected countries command");
        };
        assert_eq!(
            location.countries_file(),
            PathBuf::from("/tmp/countries.json")
        );
    }
}
