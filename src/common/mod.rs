/// Cookie data type and cookie header parsing.
pub mod cookie;
/// HTTP header data types and functions.
pub mod header;
/// Locales and `Accept-Language` parsing.
pub mod locale;
/// Media types and `Accept` parsing.
pub mod media_type;
/// HTTP method data type and functions.
pub mod method;
/// HTTP request data type and entity.
pub mod request;
/// Sessions and session managers.
pub mod session;
/// URI data type and parsing.
pub mod uri;
