/// Parsing errors.
pub mod error;
/// Form and query string decoding.
pub mod form;
/// Quality values, quoted strings and other pieces of preference headers.
pub mod quality;
/// Request reading.
pub mod request;
