//! CLI Integration Tests for Bookshelf
//!
//! Argument parsing goes through `Cli::try_parse_from`; the binary itself is
//! run for help, version, init and config.

use bookshelf::cli::{Cli, Commands};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Helper to run bookshelf-server with arguments
fn run_bookshelf(args: &[&str], working_dir: Option<&std::path::Path>) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bookshelf-server"));
    cmd.args(args).arg("--no-color");
    cmd.env_remove("BOOKSHELF_JWT_SECRET");

    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    cmd.output().expect("Failed to execute command")
}

// =============================================================================
// Argument parsing
// =============================================================================

#[test]
fn test_defaults_to_serve_without_subcommand() {
    let cli = Cli::try_parse_from(["bookshelf-server"]).expect("should parse");

    assert_eq!(cli.config, PathBuf::from("bookshelf.toml"));
    assert!(!cli.verbose);
    assert!(cli.command.is_none());
}

#[test]
fn test_serve_overrides() {
    let cli = Cli::try_parse_from([
        "bookshelf-server",
        "--config",
        "custom.toml",
        "serve",
        "--host",
        "0.0.0.0",
        "--port",
        "8080",
    ])
    .expect("should parse");

    assert_eq!(cli.config, PathBuf::from("custom.toml"));
    match cli.command {
        Some(Commands::Serve { host, port }) => {
            assert_eq!(host.as_deref(), Some("0.0.0.0"));
            assert_eq!(port, Some(8080));
        }
        other => panic!("expected serve, got {:?}", other),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["bookshelf-server", "config", "--validate", "-v", "--no-color"])
        .expect("should parse");

    assert!(cli.verbose);
    assert!(cli.no_color);
    assert!(matches!(cli.command, Some(Commands::Config { validate: true })));
}

#[test]
fn test_invalid_port_is_rejected() {
    let result = Cli::try_parse_from(["bookshelf-server", "serve", "--port", "not-a-port"]);
    assert!(result.is_err());
}

// =============================================================================
// Binary
// =============================================================================

#[test]
fn test_help_command() {
    let output = run_bookshelf(&["--help"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("init"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_version_command() {
    let output = run_bookshelf(&["--version"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("bookshelf-server"));
}

#[test]
fn test_init_then_config() {
    let temp_dir = TempDir::new().expect("tempdir");

    let init = run_bookshelf(&["init"], Some(temp_dir.path()));
    assert!(init.status.success());
    assert!(temp_dir.path().join("bookshelf.toml").is_file());
    assert!(temp_dir.path().join(".env.example").is_file());

    let again = run_bookshelf(&["init"], Some(temp_dir.path()));
    assert!(!again.status.success(), "second init without --force must fail");

    let config = run_bookshelf(&["config"], Some(temp_dir.path()));
    assert!(config.status.success());
    let stdout = String::from_utf8_lossy(&config.stdout);
    assert!(stdout.contains("127.0.0.1:5000"));
    assert!(stdout.contains("ClaimOnTouch"));
}

#[test]
fn test_config_validate_requires_secret() {
    let temp_dir = TempDir::new().expect("tempdir");
    fs::write(
        temp_dir.path().join("bookshelf.toml"),
        "[auth]\njwt_secret_env = \"BOOKSHELF_CLI_TEST_MISSING_SECRET\"\n",
    )
    .expect("write config");

    let output = run_bookshelf(&["config", "--validate"], Some(temp_dir.path()));

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("BOOKSHELF_CLI_TEST_MISSING_SECRET"));
}

#[test]
fn test_serve_without_config_fails() {
    let temp_dir = TempDir::new().expect("tempdir");

    let output = run_bookshelf(&["serve"], Some(temp_dir.path()));

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bookshelf.toml"));
}
