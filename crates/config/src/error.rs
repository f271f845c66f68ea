//! Config Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration loading.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("config file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    #[display("unsupported config file format: {_0:?} (expected toml, yaml, yml or json)")]
    UnsupportedFormat(#[error(not(source))] String),
    /// The layered sources could not be merged into a config.
    #[display("could not read configuration")]
    Parse,
    #[display("invalid configuration: {_0}")]
    Invalid(#[error(not(source))] String),
}
