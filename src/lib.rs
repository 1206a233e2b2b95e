/// Command-line argument parser
pub mod args;
/// HTTP data types.
pub mod common;
/// The request view and its body, sessions and attributes.
pub mod http;
/// Components for parsing HTTP requests and header values.
pub mod parse;
/// Method rules for routes.
pub mod router;

/// Utility components.
pub mod util;
