//! Error types for the ledgerfab CLI.

use ledgerfab::FabricError;
use thiserror::Error;

/// CLI result type alias.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error type.
#[derive(Error, Debug)]
pub enum CliError {
    /// Generation or validation failed.
    #[error(transparent)]
    Fabric(#[from] FabricError),

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid command line or configuration input.
    #[error("Configuration error: {0}")]
    Config(String),
}
