use thiserror::Error;

/// Errors from decoding a tree-internal key back into an application key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The input does not end with the terminator byte.
    #[error("tree key is missing its terminator")]
    MissingTerminator,
    /// The terminator is followed by more bytes.
    #[error("{0} trailing byte(s) after the terminator")]
    TrailingBytes(usize),
    /// The escape byte at this offset is not followed by a valid escaped value.
    #[error("invalid escape sequence at offset {0}")]
    InvalidEscape(usize),
}
