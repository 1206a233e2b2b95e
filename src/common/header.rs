use std::fmt::{Display, Formatter};

use crate::common::header::Header::{Custom, Standard};
use crate::util::multi_value::MultiValueMap;

/// A header name. Is either a "Standard" header with a static string, or a "Custom" header with a uniquely allocated String.
/// Names are stored in lower case so lookups ignore case.
#[derive(PartialEq, Eq, Hash, Debug, Clone)]
pub enum Header {
    Standard(&'static str),
    Custom(String),
}

impl Header {
    pub fn as_str(&self) -> &str {
        match self {
            Standard(str) => str,
            Custom(str) => str.as_str()
        }
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! standard_headers {
    (
        $(
            $(#[$docs:meta])*
            ($name:ident, $value:expr);
        )+
    ) => {
        $(
            $(#[$docs])*
            pub const $name: Header = Header::Standard($value);
        )+

        impl From<String> for Header {
            /// Gets a header from the given string representing the header name.
            fn from(mut value: String) -> Header {
                value.make_ascii_lowercase();
                match value.as_str() {
                    $(
                    $value => $name,
                    )+
                    _ => Header::Custom(value)
                }
            }
        }
    }
}

impl From<&str> for Header {
    /// Gets a header from the given string representing the header name.
    fn from(value: &str) -> Header {
        Header::from(value.to_string())
    }
}

standard_headers! {
    /// Media types the client will accept.
    (ACCEPT, "accept");
    (ACCEPT_CHARSET, "accept-charset");
    (ACCEPT_ENCODING, "accept-encoding");
    /// Languages the client prefers.
    (ACCEPT_LANGUAGE, "accept-language");
    (AUTHORIZATION, "authorization");
    (CACHE_CONTROL, "cache-control");
    (CONNECTION, "connection");
    (CONTENT_ENCODING, "content-encoding");
    (CONTENT_LANGUAGE, "content-language");
    (CONTENT_LENGTH, "content-length");
    (CONTENT_TYPE, "content-type");
    /// Cookies sent by the client.
    (COOKIE, "cookie");
    (DATE, "date");
    (HOST, "host");
    (IF_MATCH, "if-match");
    (IF_MODIFIED_SINCE, "if-modified-since");
    (IF_NONE_MATCH, "if-none-match");
    (IF_UNMODIFIED_SINCE, "if-unmodified-since");
    (MAX_FORWARDS, "max-forwards");
    (ORIGIN, "origin");
    (RANGE, "range");
    (REFERER, "referer");
    (TRANSFER_ENCODING, "transfer-encoding");
    (USER_AGENT, "user-agent");
}

/// Creates a map of headers.
/// ```
/// use reqview::common::header::{CONNECTION, CONTENT_TYPE, CONTENT_LENGTH, Header, TRANSFER_ENCODING, HeaderMapOps};
/// use reqview::header_map;
///
/// let headers = header_map![
///    (CONNECTION, "keep-alive"),
///    (CONTENT_LENGTH, "5"),
///    ("custom-header", "hello"),
///    ("coNtEnt-TyPE", "something"),
///    ("Transfer-encoding", "chunked")
/// ];
///
/// assert!(headers.contains_header_value(&CONNECTION, "keep-alive"));
/// assert!(headers.contains_header_value(&CONTENT_LENGTH, "5"));
/// assert!(headers.contains_header_value(&CONTENT_TYPE, "something"));
/// assert!(headers.contains_header_value(&Header::Custom("custom-header".into()), "hello"));
/// assert!(headers.contains_header_value(&TRANSFER_ENCODING, "chunked"));
/// ```
#[macro_export]
macro_rules! header_map {
    () => { $crate::common::header::HeaderMap::new() };
    ($(($header:expr, $value:expr)),+ $(,)?) => {
        <$crate::common::header::HeaderMap as $crate::common::header::HeaderMapOps>::from_pairs(vec![
            $(($header.into(), $value.into()),)+
        ])
    }
}

/// Operations for a header map.
pub trait HeaderMapOps {
    /// Gets a header map from the given vector of header value and key pairs.
    fn from_pairs(header_values: Vec<(Header, String)>) -> Self;
    /// Adds a header to the map.
    fn add_header(&mut self, k: Header, v: String);
    /// Checks if the map contains the given header and corresponding header value.
    fn contains_header_value(&self, k: &Header, v: &str) -> bool;
    /// Gets the first value for the given header.
    fn get_first_header_value(&self, k: &Header) -> Option<&String>;
    /// Gets every value for the given header, in the order they were received.
    fn get_header_values(&self, k: &Header) -> &[String];
}

/// An ordered multimap of headers to values.
pub type HeaderMap = MultiValueMap<Header, String>;

impl HeaderMapOps for HeaderMap {
    fn from_pairs(header_values: Vec<(Header, String)>) -> HeaderMap {
        header_values.into_iter().collect()
    }

    fn add_header(&mut self, k: Header, v: String) {
        self.add(k, v)
    }

    fn contains_header_value(&self, k: &Header, v: &str) -> bool {
        self.get(k).iter().any(|value| value == v)
    }

    fn get_first_header_value(&self, k: &Header) -> Option<&String> {
        self.get_first(k)
    }

    fn get_header_values(&self, k: &Header) -> &[String] {
        self.get(k)
    }
}

#[cfg(test)]
mod tests {
    use crate::common::header::{ACCEPT, CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, Header, HeaderMap, HeaderMapOps, TRANSFER_ENCODING};

    #[test]
    fn header_map() {
        let mut headers = HeaderMap::new();
        headers.add_header(CONNECTION, String::from("value 1"));
        headers.add_header(CONNECTION, String::from("value 2"));
        headers.add_header(CONTENT_LENGTH, String::from("5"));
        headers.add_header(CONTENT_TYPE, String::from("something"));

        assert!(headers.contains_header_value(&CONNECTION, "value 1"));
        assert!(headers.contains_header_value(&CONNECTION, "value 2"));
        assert!(!headers.contains_header_value(&CONNECTION, "value 3"));
        assert_eq!(headers.get_first_header_value(&CONNECTION).unwrap(), "value 1");
        assert_eq!(headers.get_first_header_value(&CONTENT_LENGTH).unwrap(), "5");
        assert!(headers.get_first_header_value(&COOKIE).is_none());
    }

    #[test]
    fn header_values_keep_received_order() {
        let headers = header_map![
            (ACCEPT, "text/html"),
            (CONTENT_LENGTH, "5"),
            ("Accept", "application/json"),
            ("ACCEPT", "*/*")
        ];

        assert_eq!(headers.get_header_values(&ACCEPT), &["text/html".to_string(), "application/json".to_string(), "*/*".to_string()]);
        let names: Vec<&Header> = headers.keys().collect();
        assert_eq!(names, vec![&ACCEPT, &CONTENT_LENGTH]);
    }

    #[test]
    fn header_map_macro_empty_header_map() {
        assert!(header_map![].is_empty());
    }

    #[test]
    fn header_map_macro() {
        let headers = header_map![
            (CONNECTION, "value 1"),
            ("custom-header", "hello"),
            ("coNneCtion", "value 2"),
            ("transfer-encoding", "chunked")
        ];

        assert!(headers.contains_header_value(&CONNECTION, "value 2"));
        assert!(headers.contains_header_value(&Header::Custom("custom-header".into()), "hello"));
        assert_eq!(headers.get_first_header_value(&TRANSFER_ENCODING).unwrap(), "chunked");
    }

    #[test]
    fn from_str() {
        assert_eq!(Header::from("hello"), Header::Custom("hello".to_string()));
        assert_eq!(Header::from("HeLlO"), Header::Custom("hello".to_string()));
        assert_eq!(Header::from("Accept-Language"), crate::common::header::ACCEPT_LANGUAGE);
        assert_eq!(Header::from("ContenT-leNgth".to_string()), CONTENT_LENGTH);
    }
}
