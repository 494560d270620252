// src/error.rs

use thiserror::Error;

/// Errors raised while reading command-line input.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("line {line}: invalid hex: {source}")]
    InvalidHex {
        line: usize,
        #[source]
        source: hex::FromHexError,
    },

    #[error("invalid byte value {0:?}: expected decimal or 0x-prefixed hex in 0..=255")]
    InvalidByte(String),
}
