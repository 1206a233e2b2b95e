use std::io;

use thiserror::Error;

/// Error for when an HTTP request can't be read.
#[derive(Debug, Error)]
pub enum ParsingError {
    /// Invalid syntax in the message.
    #[error("Invalid syntax: {0}")]
    BadSyntax(&'static str),
    /// Message has wrong HTTP version.
    #[error("Unsupported HTTP version {0:?}")]
    InvalidHttpVersion(String),
    /// Content length is not a number.
    #[error("Invalid content length {0:?}")]
    InvalidContentLength(String),
    /// Request line and headers exceed the maximum size.
    #[error("Headers exceed {0} bytes")]
    HeadersTooLarge(usize),
    /// Body exceeds the maximum size.
    #[error("Body exceeds {0} bytes")]
    ContentLengthTooLarge(u64),
    /// Request line or headers are not valid UTF8.
    #[error("Request line or headers are not valid UTF-8")]
    InvalidUtf8,
    /// The message could not be read.
    #[error(transparent)]
    Io(#[from] io::Error),
}
