use std::fmt::{Display, Formatter};

/// An HTTP method.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method.
    GET,
    /// POST method.
    POST,
    /// PUT method.
    PUT,
    /// DELETE method.
    DELETE,
    /// HEAD method.
    HEAD,
    /// OPTIONS method.
    OPTIONS,
    /// PATCH method.
    PATCH,
    /// TRACE method.
    TRACE,
    /// CONNECT method.
    CONNECT,
    /// Any method token that is not recognized.
    UNKNOWN,
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Method {
    /// Converts the given string to a method. Methods are case sensitive. Returns None if no Method matches.
    pub fn try_from_str(s: &str) -> Option<Method> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            "PATCH" => Some(Method::PATCH),
            "TRACE" => Some(Method::TRACE),
            "CONNECT" => Some(Method::CONNECT),
            _ => None
        }
    }

    /// Converts the given token to a method, ignoring case. Unrecognized tokens become UNKNOWN.
    pub fn from_token(token: &str) -> Method {
        Method::try_from_str(&token.trim().to_ascii_uppercase()).unwrap_or(Method::UNKNOWN)
    }

    /// Returns true if requests with this method may carry a body.
    pub fn allows_body(&self) -> bool {
        matches!(self, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
    }
}
