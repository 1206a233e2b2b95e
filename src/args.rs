use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::common::locale::Locale;
use crate::common::session::SESSION_NAME;
use crate::http::Config;
use crate::router::MethodRule;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

/// Error for when the arguments can't be turned into settings.
#[derive(Debug, Error)]
pub enum ArgsError {
    #[error("Invalid default locale {0:?}")]
    InvalidLocale(String),
}

/// Reads a raw HTTP request and prints what a handler would see: URI, query, negotiated media types and
/// languages, cookies, session and parameters.
#[derive(Parser, Debug)]
#[command(author = AUTHORS, version = VERSION, about)]
pub struct Args {
    /// (Optional) File holding the raw request. Standard input is read if none is given.
    pub file: Option<PathBuf>,
    /// (Optional) Name of the cookie holding the session id.
    #[arg(long, default_value_t = String::from(SESSION_NAME))]
    pub session_cookie: String,
    /// (Optional) Language tag to use when the request has no Accept-Language header. Defaults to the system locale.
    #[arg(long)]
    pub default_locale: Option<String>,
    /// (Optional) Method the request is checked against. Repeat to allow several.
    #[arg(long = "allow")]
    pub allow: Vec<String>,
    /// (Optional) Log parsing details.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Gets the view settings described by the arguments.
    pub fn config(&self) -> Result<Config, ArgsError> {
        let default_locale = match &self.default_locale {
            Some(tag) => Locale::from_language_tag(tag).ok_or_else(|| ArgsError::InvalidLocale(tag.clone()))?,
            None => Locale::system_default(),
        };
        Ok(Config { session_cookie: self.session_cookie.clone(), default_locale })
    }

    /// Gets the methods the request is checked against.
    pub fn method_rule(&self) -> MethodRule {
        self.allow.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;

    use crate::args::{Args, ArgsError};
    use crate::common::locale::Locale;
    use crate::common::method::Method;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["reqview"]);
        assert_eq!(args.file, None);
        assert_eq!(args.config().unwrap().session_cookie, "ASESSIONID");
        assert!(args.method_rule().rules().is_empty());
        assert!(!args.verbose);
    }

    #[test]
    fn all_arguments() {
        let args = Args::parse_from(["reqview", "request.txt", "--session-cookie", "SID", "--default-locale", "de_CH",
            "--allow", "get", "--allow", "POST", "-v"]);
        let config = args.config().unwrap();

        assert_eq!(args.file.as_deref(), Some(Path::new("request.txt")));
        assert_eq!(config.session_cookie, "SID");
        assert_eq!(config.default_locale, Locale::new("de", "CH", ""));
        assert_eq!(args.method_rule().rules(), &[Method::GET, Method::POST]);
        assert!(args.verbose);
    }

    #[test]
    fn invalid_locale() {
        let args = Args::parse_from(["reqview", "--default-locale", "not a locale"]);
        assert!(matches!(args.config(), Err(ArgsError::InvalidLocale(_))));
    }
}
