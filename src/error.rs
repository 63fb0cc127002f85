use std::io;

use thiserror::Error;

use crate::common::io_error_msg;

/// Top-level error for one encode or decode invocation.
#[derive(Debug, Error)]
pub enum Error {
    /// The named input file does not exist.
    #[error("could not open file '{0}'")]
    NotFound(String),

    /// Read or write failure on an open stream.
    #[error("{}", io_error_msg(.0))]
    Io(#[from] io::Error),

    /// Malformed base64 content (decode only).
    #[error("{0}")]
    Format(#[from] FormatError),
}

/// Defects in base64 input, detected while decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// A byte outside the alphabet in a non-separator position.
    #[error("invalid base64 character '{}'", .0.escape_ascii())]
    InvalidByte(u8),

    /// `=` anywhere other than the last one or two positions of a quantum.
    #[error("misplaced padding character")]
    MisplacedPadding,

    /// Meaningful characters after the final padded quantum.
    #[error("trailing data after final padded group")]
    TrailingData,

    /// Meaningful character count is not a multiple of 4.
    #[error("truncated base64 input: length is not a multiple of 4")]
    Truncated,
}
