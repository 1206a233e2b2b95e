/// Builders for requests read from raw text.
pub mod raw;
