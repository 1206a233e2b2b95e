use crate::common::locale::Locale;
use crate::common::session::SESSION_NAME;

/// Settings of a request view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The name of the cookie that carries the session id.
    pub session_cookie: String,
    /// The locale used when a request has no usable `Accept-Language` header.
    pub default_locale: Locale,
}

impl Default for Config {
    fn default() -> Self {
        Config { session_cookie: SESSION_NAME.to_string(), default_locale: Locale::system_default() }
    }
}
