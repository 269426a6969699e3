use clap::Parser;
use inkystock::cli::{Cli, Commands, ConfigCommands};
use inkystock::infrastructure::logging::LogFormat;
use std::path::PathBuf;

#[test]
fn test_parse_config_check_defaults() {
    let cli = temp_env::with_var_unset("INKYSTOCK_CONFIG", || {
        Cli::try_parse_from(["inkystock", "config", "check"]).unwrap()
    });

    match cli.command {
        Commands::Config(command) => assert_eq!(command, ConfigCommands::Check),
    }
    assert_eq!(cli.global.config, PathBuf::from("config.ini"));
    assert!(cli.global.env_allowlist.is_empty());
    assert!(!cli.global.json);
    assert_eq!(cli.global.log_format, LogFormat::Pretty);
    assert!(cli.global.log_dir.is_none());
}

#[test]
fn test_parse_config_show_with_globals() {
    let cli = Cli::try_parse_from([
        "inkystock",
        "config",
        "show",
        "--config",
        "/etc/inkystock/config.ini",
        "--env",
        "IEX_TOKEN,DB_PATH",
        "--env",
        "EXTRA",
        "--json",
        "--log-format",
        "json",
    ])
    .unwrap();

    match cli.command {
        Commands::Config(command) => assert_eq!(command, ConfigCommands::Show),
    }
    assert_eq!(cli.global.config, PathBuf::from("/etc/inkystock/config.ini"));
    assert_eq!(cli.global.env_allowlist, vec!["IEX_TOKEN", "DB_PATH", "EXTRA"]);
    assert!(cli.global.json);
    assert_eq!(cli.global.log_format, LogFormat::Json);
}

#[test]
fn test_config_path_from_environment() {
    let cli = temp_env::with_var("INKYSTOCK_CONFIG", Some("/srv/display.ini"), || {
        Cli::try_parse_from(["inkystock", "config", "check"]).unwrap()
    });
    assert_eq!(cli.global.config, PathBuf::from("/srv/display.ini"));
}

#[test]
fn test_rejects_unknown_log_format() {
    assert!(Cli::try_parse_from(["inkystock", "config", "check", "--log-format", "xml"]).is_err());
}

#[test]
fn test_requires_subcommand() {
    assert!(Cli::try_parse_from(["inkystock"]).is_err());
    assert!(Cli::try_parse_from(["inkystock", "config"]).is_err());
}
