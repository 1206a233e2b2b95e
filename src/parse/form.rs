use log::debug;

use crate::util::multi_value::MultiValueMap;

/// Parses an `application/x-www-form-urlencoded` request body.
/// The input is split on `&`, then each token on its first `=`. Tokens that have no `=`, or that start or
/// end with `=`, are dropped. Keys and values are percent decoded as UTF-8, with `+` decoding to a space.
pub fn parse_form(input: &str) -> MultiValueMap<String, String> {
    let mut parameters = MultiValueMap::new();

    for token in input.split('&').filter(|token| !token.is_empty()) {
        let valid = matches!(token.find('='), Some(end) if end > 0 && end < token.len() - 1);
        if !valid {
            debug!("Dropping malformed form token {:?}", token);
            continue;
        }

        if let Some((key, value)) = form_urlencoded::parse(token.as_bytes()).next() {
            parameters.add(key.into_owned(), value.into_owned());
        }
    }

    parameters
}

/// Parses a URI query string. Unlike a form body, keys without a value are kept with an empty value.
pub fn parse_query(query: &str) -> MultiValueMap<String, String> {
    form_urlencoded::parse(query.as_bytes()).into_owned().collect()
}
