use std::fmt::{Display, Formatter};

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::parse::form::parse_query;
use crate::util::multi_value::MultiValueMap;

lazy_static! {
    /// Component split from RFC 3986 appendix B.
    static ref COMPONENTS: Regex = Regex::new(r"^(?:([^:/?#]+):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .expect("uri pattern is valid");
    static ref SCHEME: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*$").expect("scheme pattern is valid");
}

/// The URI used in place of a request target that can not be parsed.
pub const PLACEHOLDER: &str = "scheme://host:ip/";

/// Error for when a URI can't be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UriError {
    /// A character that may not appear in a URI.
    #[error("Illegal character {character:?} at index {index}")]
    IllegalCharacter { index: usize, character: char },
    /// A `%` not followed by two hex digits.
    #[error("Malformed escape at index {0}")]
    MalformedEscape(usize),
    /// The scheme does not start with a letter or contains illegal characters.
    #[error("Illegal scheme {0:?}")]
    IllegalScheme(String),
    /// The port is not a number between 0 and 65535.
    #[error("Illegal port {0:?}")]
    IllegalPort(String),
}

/// A parsed URI. Every component can be replaced, which gives a new URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uri {
    scheme: Option<String>,
    user_info: Option<String>,
    host: Option<String>,
    port: Option<String>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
    params: MultiValueMap<String, String>,
}

impl Uri {
    /// Parses an absolute URI or a relative reference such as a request target.
    pub fn parse(raw: &str) -> Result<Uri, UriError> {
        check_characters(raw)?;

        // the pattern matches every string
        let captures = match COMPONENTS.captures(raw) {
            Some(captures) => captures,
            None => return Err(UriError::IllegalCharacter { index: 0, character: raw.chars().next().unwrap_or(' ') }),
        };
        let component = |i: usize| captures.get(i).map(|m| m.as_str().to_string());

        let scheme = component(1);
        if let Some(scheme) = &scheme {
            if !SCHEME.is_match(scheme) {
                return Err(UriError::IllegalScheme(scheme.clone()));
            }
        }

        let (user_info, host, port) = match component(2) {
            Some(authority) => split_authority(&authority)?,
            None => (None, None, None),
        };

        Ok(Uri::from_parts(scheme, user_info, host, port, component(3).unwrap_or_default(), component(4), component(5)))
    }

    /// The URI used when a request target can not be parsed: `scheme://host:ip/`.
    pub fn placeholder() -> Uri {
        Uri::from_parts(Some("scheme".into()), None, Some("host".into()), Some("ip".into()), "/".into(), None, None)
    }

    fn from_parts(scheme: Option<String>, user_info: Option<String>, host: Option<String>, port: Option<String>,
                  path: String, query: Option<String>, fragment: Option<String>) -> Uri {
        let params = query.as_deref().map(parse_query).unwrap_or_default();
        Uri { scheme, user_info, host, port, path, query, fragment, params }
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn user_info(&self) -> Option<&str> {
        self.user_info.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// The port, if one is given and is numeric.
    pub fn port(&self) -> Option<u16> {
        self.port.as_deref().and_then(|port| port.parse().ok())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// The decoded query parameters.
    pub fn params(&self) -> &MultiValueMap<String, String> {
        &self.params
    }

    pub fn with_scheme(&self, scheme: Option<&str>) -> Uri {
        Uri { scheme: scheme.map(String::from), ..self.clone() }
    }

    pub fn with_host(&self, host: Option<&str>) -> Uri {
        Uri { host: host.map(String::from), ..self.clone() }
    }

    pub fn with_port(&self, port: Option<u16>) -> Uri {
        Uri { port: port.map(|port| port.to_string()), ..self.clone() }
    }

    /// Replaces the path, keeping every other component.
    pub fn with_path(&self, path: &str) -> Uri {
        Uri { path: path.to_string(), ..self.clone() }
    }

    /// Replaces the query string and its parameters.
    pub fn with_query(&self, query: Option<&str>) -> Uri {
        let query = query.map(String::from);
        Uri::from_parts(self.scheme.clone(), self.user_info.clone(), self.host.clone(), self.port.clone(),
                        self.path.clone(), query, self.fragment.clone())
    }

    pub fn with_fragment(&self, fragment: Option<&str>) -> Uri {
        Uri { fragment: fragment.map(String::from), ..self.clone() }
    }
}

impl Display for Uri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{}:", scheme)?;
        }
        if let Some(host) = &self.host {
            f.write_str("//")?;
            if let Some(user_info) = &self.user_info {
                write!(f, "{}@", user_info)?;
            }
            f.write_str(host)?;
            if let Some(port) = &self.port {
                write!(f, ":{}", port)?;
            }
        }
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

/// Rejects whitespace, control characters and ASCII characters RFC 3986 never allows, and checks percent escapes.
fn check_characters(raw: &str) -> Result<(), UriError> {
    let bytes = raw.as_bytes();
    for (index, character) in raw.char_indices() {
        let illegal = character.is_control() || character.is_whitespace() || "\"<>\\^`{|}".contains(character);
        if illegal {
            return Err(UriError::IllegalCharacter { index, character });
        }

        if character == '%' {
            let escape = bytes.get(index + 1..index + 3);
            if !matches!(escape, Some(hex) if hex.iter().all(u8::is_ascii_hexdigit)) {
                return Err(UriError::MalformedEscape(index));
            }
        }
    }
    Ok(())
}

/// Splits `user@host:port` into its parts. IPv6 hosts keep their brackets.
fn split_authority(authority: &str) -> Result<(Option<String>, Option<String>, Option<String>), UriError> {
    let (user_info, host_port) = match authority.rsplit_once('@') {
        Some((user_info, host_port)) => (Some(user_info.to_string()), host_port),
        None => (None, authority),
    };

    let (host, port) = if host_port.starts_with('[') {
        match host_port.find(']') {
            Some(end) => (&host_port[..=end], host_port[end + 1..].strip_prefix(':')),
            None => return Err(UriError::IllegalCharacter { index: 0, character: '[' }),
        }
    } else {
        match host_port.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };

    let port = match port {
        Some("") | None => None,
        Some(port) if port.parse::<u16>().is_ok() => Some(port.to_string()),
        Some(port) => return Err(UriError::IllegalPort(port.to_string())),
    };

    Ok((user_info, Some(host.to_string()), port))
}
