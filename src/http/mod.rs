pub use config::Config;
pub use error::RequestError;
pub use view::RequestView;

/// Request bodies.
pub mod body;
/// Settings of a request view.
pub mod config;
/// Per request attributes.
pub mod context;
/// Errors of a request view.
pub mod error;
/// The request view.
pub mod view;
