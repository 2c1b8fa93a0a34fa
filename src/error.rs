//! CLI Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("configuration error")]
    Config,
    #[display("device storage error")]
    Storage,
    #[display("could not set up the generative model client")]
    Generator,
    #[display("could not write output")]
    Output,
    #[display("could not read {}", _0.display())]
    Input(#[error(not(source))] PathBuf),
}
