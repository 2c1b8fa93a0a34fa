//! Configuration Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A configuration source could not be read or has the wrong shape.
    #[display("could not load configuration")]
    Load,
    /// An explicitly requested configuration file does not exist.
    #[display("configuration file not found: {}", _0.display())]
    MissingFile(#[error(not(source))] PathBuf),
    /// Settings loaded fine but make no sense together.
    #[display("invalid configuration: {_0}")]
    Invalid(#[error(not(source))] String),
    /// No storage path configured and no platform data directory to fall back on.
    #[display("no data directory available; set storage.path")]
    NoDataDir,
}
