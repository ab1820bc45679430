use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::parser::ParseError;

/// Everything that can stop a conversion. Every variant that concerns a
/// document names it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("could not write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("could not list directory '{path}': {source}")]
    ListDir { path: PathBuf, source: io::Error },

    /// `text` is the document as (lossily decoded) text, for rendering the
    /// error against its source.
    #[error("could not parse '{path}': {error}")]
    Parse {
        path: PathBuf,
        text: String,
        error: ParseError,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
