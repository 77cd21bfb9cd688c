//! Safebank CLI - interactive terminal banking
//!
//! Usage:
//! ```bash
//! safebank
//! safebank --config safebank.json
//! safebank --verifier lenient
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use safebank_core::{AccountRegistry, BankConfig, VerifierKind};
use std::io;
use std::path::PathBuf;

mod console;
mod menu;

use console::Console;

/// Safebank - account security and transaction simulator
#[derive(Parser)]
#[command(name = "safebank")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON config file (lockout, account policy, identity verifier)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Identity verifier, overrides the config file
    #[arg(long)]
    pub verifier: Option<VerifierArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum VerifierArg {
    Strict,
    Lenient,
}

impl VerifierArg {
    pub fn to_core_kind(&self) -> VerifierKind {
        match self {
            VerifierArg::Strict => VerifierKind::Strict,
            VerifierArg::Lenient => VerifierKind::Lenient,
        }
    }
}

fn load_config(cli: &Cli) -> Result<BankConfig> {
    let mut config = match &cli.config {
        Some(path) => BankConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => BankConfig::default(),
    };

    if let Some(verifier) = cli.verifier {
        config.identity.verifier = verifier.to_core_kind();
    }
    Ok(config)
}

fn main() -> Result<()> {
    // Logs go to stderr so they don't mix with menu prompts
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    tracing::info!(
        verifier = ?config.identity.verifier,
        lock_secs = config.lockout.lock_duration_secs,
        "Starting safebank"
    );

    let mut registry = AccountRegistry::new(config);
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());

    menu::run(&mut registry, &mut console).context("Console I/O failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        let cli = Cli::parse_from(["safebank", "--verifier", "lenient"]);
        assert!(cli.config.is_none());

        let config = load_config(&cli).unwrap();
        assert_eq!(config.identity.verifier, VerifierKind::Lenient);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::parse_from(["safebank", "--config", "/nonexistent/safebank.json"]);
        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }
}
