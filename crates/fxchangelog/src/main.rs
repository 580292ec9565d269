//! fxchangelog CLI - Confluence page tree change log.
//!
//! Rebuilds a change log page listing every version of every page below an
//! include root, minus the pages below an exclude root.

mod error;
mod output;

use std::path::PathBuf;

use clap::Parser;
use fx_changelog::ChangelogMonitor;
use fx_config::{CliSettings, Config};
use fx_confluence::ConfluenceClient;
use tracing_subscriber::EnvFilter;

use error::CliError;
use output::Output;

/// Rebuild a Confluence change log page from the version history of a page tree.
#[derive(Parser)]
#[command(name = "fxchangelog", version, about)]
struct Cli {
    /// Account email for Confluence authentication.
    #[arg(long, env = "CONFLUENCE_EMAIL")]
    email: Option<String>,

    /// API token for Confluence authentication.
    #[arg(long = "api_token", env = "CONFLUENCE_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Root page ID whose descendants are monitored.
    #[arg(long)]
    include: Option<String>,

    /// Root page ID whose descendants are not monitored.
    #[arg(long)]
    exclude: Option<String>,

    /// Page ID that receives the change log table.
    #[arg(long = "logpage")]
    log_page: Option<String>,

    /// Confluence base URL [default: https://factory-x.atlassian.net/wiki].
    #[arg(long)]
    base_url: Option<String>,

    /// Path to configuration file (default: auto-discover fxchangelog.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output (INFO level logging).
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            base_url: self.base_url.clone(),
            email: self.email.clone(),
            api_token: self.api_token.clone(),
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            log_page: self.log_page.clone(),
        }
    }

    /// Execute a change log rebuild.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete, a page tree
    /// cannot be traversed or the log page cannot be cleared.
    fn execute(&self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        let confluence = config.require_confluence()?;
        let monitor_config = config.require_monitor()?;

        let client = ConfluenceClient::from_config(
            &confluence.base_url,
            &confluence.email,
            &confluence.api_token,
            confluence.timeout_secs,
        );
        let monitor = ChangelogMonitor::new(&client, monitor_config);

        let pages = monitor.monitored_set()?;
        let log_page = monitor.clear_log_page()?;
        output.cleared(&log_page.id);

        let report = monitor.log_pages(pages);
        output.report(&report);
        Ok(())
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = cli.execute(&output) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_page_arguments() {
        let cli = Cli::try_parse_from([
            "fxchangelog",
            "--include",
            "1000",
            "--exclude",
            "2000",
            "--logpage",
            "3000",
        ])
        .unwrap();

        let settings = cli.cli_settings();
        assert_eq!(settings.include.as_deref(), Some("1000"));
        assert_eq!(settings.exclude.as_deref(), Some("2000"));
        assert_eq!(settings.log_page.as_deref(), Some("3000"));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_credentials_and_base_url() {
        let cli = Cli::try_parse_from([
            "fxchangelog",
            "--email",
            "jane@example.com",
            "--api_token",
            "abc123",
            "--base-url",
            "https://wiki.example.com/wiki",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.email.as_deref(), Some("jane@example.com"));
        assert_eq!(cli.api_token.as_deref(), Some("abc123"));
        assert_eq!(
            cli.base_url.as_deref(),
            Some("https://wiki.example.com/wiki")
        );
        assert!(cli.verbose);
    }

    #[test]
    fn test_exclude_is_optional() {
        let cli = Cli::try_parse_from(["fxchangelog", "--include", "1", "--logpage", "2"]).unwrap();
        assert_eq!(cli.cli_settings().exclude, None);
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::try_parse_from(["fxchangelog", "-c", "conf/fxchangelog.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("conf/fxchangelog.toml")));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["fxchangelog", "--log-page", "1"]).is_err());
    }
}
