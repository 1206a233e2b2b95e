use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Serialize;

use crate::parse::quality::{split_unquoted, unquote};

lazy_static! {
    /// RFC 6265 cookie name: an RFC 7230 token.
    static ref COOKIE_NAME: Regex = Regex::new(r"^[!#$%&'*+.^_`|~0-9A-Za-z-]+$").expect("cookie name pattern is valid");
}

/// A cookie sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: &str, value: &str) -> Cookie {
        Cookie { name: name.to_string(), value: value.to_string() }
    }
}

/// Parses the values of `Cookie` headers into cookies.
pub trait CookieProcessor {
    /// Parses every given header value, returning the cookies in the order they appear.
    fn parse_cookie_header(&self, headers: &[String]) -> Vec<Cookie>;
}

/// A cookie processor following RFC 6265. Pairs are separated by `;`, and pairs with no `=` or an invalid name are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCookieProcessor;

impl CookieProcessor for StandardCookieProcessor {
    fn parse_cookie_header(&self, headers: &[String]) -> Vec<Cookie> {
        headers.iter()
            .flat_map(|header| split_unquoted(header, ';'))
            .filter_map(|pair| {
                let cookie = parse_pair(pair);
                if cookie.is_none() {
                    debug!("Skipping malformed cookie {:?}", pair);
                }
                cookie
            })
            .collect()
    }
}

fn parse_pair(pair: &str) -> Option<Cookie> {
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if !COOKIE_NAME.is_match(name) {
        return None;
    }
    Some(Cookie::new(name, unquote(value.trim())))
}

#[cfg(test)]
mod tests {
    use crate::common::cookie::{Cookie, CookieProcessor, StandardCookieProcessor};

    fn parse(headers: Vec<&str>) -> Vec<Cookie> {
        let headers: Vec<String> = headers.into_iter().map(String::from).collect();
        StandardCookieProcessor.parse_cookie_header(&headers)
    }

    #[test]
    fn pairs_in_order() {
        assert_eq!(parse(vec!["a=1; b=2", "c=3"]), vec![Cookie::new("a", "1"), Cookie::new("b", "2"), Cookie::new("c", "3")]);
    }

    #[test]
    fn quoted_and_empty_values() {
        assert_eq!(parse(vec![r#"theme="dark"; empty="#]), vec![Cookie::new("theme", "dark"), Cookie::new("empty", "")]);
    }

    #[test]
    fn value_may_contain_equals() {
        assert_eq!(parse(vec!["token=abc==; x=1"]), vec![Cookie::new("token", "abc=="), Cookie::new("x", "1")]);
    }

    #[test]
    fn malformed_pairs_skipped() {
        assert_eq!(parse(vec!["novalue; =v; bad name=1; ok=1;;"]), vec![Cookie::new("ok", "1")]);
        assert!(parse(vec![]).is_empty());
    }
}
