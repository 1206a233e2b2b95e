use std::io;

use thiserror::Error;

/// Error for when part of a request can't be read or interpreted.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A header could not be converted to the requested type.
    #[error("Header {name} has invalid value {value:?}")]
    InvalidHeader { name: String, value: String },
    /// The request method does not allow a body and no entity was supplied.
    #[error("Method {0} does not allow a body")]
    BodyNotAllowed(String),
    /// The request has no session.
    #[error("Request has no session")]
    NoSession,
    /// The body could not be read.
    #[error("Body could not be read: {0}")]
    Io(#[from] io::Error),
    /// The body declares a charset that can not be decoded.
    #[error("Unsupported charset {0:?}")]
    UnsupportedCharset(String),
    /// The body is not valid text in its declared charset.
    #[error("Body is not valid {charset}")]
    MalformedText { charset: String },
}
