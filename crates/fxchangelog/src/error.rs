//! CLI error types.

use fx_changelog::MonitorError;
use fx_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Monitor(#[from] MonitorError),
}
