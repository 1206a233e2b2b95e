use std::cmp::Ordering;

use crate::util::comparator::InvertibleComparator;

/// The quality of an entry that declares none.
pub const DEFAULT_QUALITY: f32 = 1.0;

/// A value read from a comma separated preference header such as `Accept`,
/// along with its quality and its position in the header.
#[derive(Debug, Clone, PartialEq)]
pub struct Weighted<T> {
    pub value: T,
    pub quality: f32,
    pub position: usize,
}

/// Splits the given string on the delimiter, ignoring delimiters inside double quotes.
/// Parts are trimmed and empty parts are skipped.
pub fn split_unquoted(s: &str, delimiter: char) -> Vec<&str> {
    let mut parts = vec![];
    let mut quoted = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            c if c == delimiter && !quoted => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);

    parts.into_iter().map(str::trim).filter(|part| !part.is_empty()).collect()
}

/// Splits a `key=value` token at the first `=`. Both sides are trimmed and surrounding quotes are removed from the value.
/// Returns None if there is no `=` or the key is empty.
pub fn key_value(token: &str) -> Option<(&str, &str)> {
    let (key, value) = token.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, unquote(value.trim())))
}

/// Removes one pair of surrounding double quotes, if present.
pub fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Parses a quality value. Must be a number between 0 and 1 inclusive.
pub fn parse_quality(raw: &str) -> Option<f32> {
    let quality: f32 = raw.trim().parse().ok()?;
    if quality.is_finite() && (0.0..=1.0).contains(&quality) {
        Some(quality)
    } else {
        None
    }
}

/// Orders by quality, highest first.
pub fn by_quality<T: 'static>() -> InvertibleComparator<Weighted<T>> {
    InvertibleComparator::with_order(|a: &Weighted<T>, b: &Weighted<T>| a.quality.total_cmp(&b.quality), false)
}

/// Orders by position in the header, first declared first.
pub fn by_position<T: 'static>() -> InvertibleComparator<Weighted<T>> {
    InvertibleComparator::new(|a: &Weighted<T>, b: &Weighted<T>| a.position.cmp(&b.position))
}

/// Orders by the given key of the value.
pub fn by_value_key<T: 'static, K: Ord + 'static>(key: impl Fn(&T) -> K + Send + Sync + 'static, ascending: bool) -> InvertibleComparator<Weighted<T>> {
    InvertibleComparator::with_order(move |a: &Weighted<T>, b: &Weighted<T>| -> Ordering { key(&a.value).cmp(&key(&b.value)) }, ascending)
}

#[cfg(test)]
mod tests {
    use crate::parse::quality::{by_position, by_quality, key_value, parse_quality, split_unquoted, unquote, Weighted};
    use crate::util::comparator::CompoundComparator;

    #[test]
    fn split_list() {
        assert_eq!(split_unquoted("a, b ,c", ','), vec!["a", "b", "c"]);
        assert_eq!(split_unquoted(" , a,,", ','), vec!["a"]);
        assert!(split_unquoted("", ',').is_empty());
    }

    #[test]
    fn split_ignores_quoted_delimiters() {
        assert_eq!(split_unquoted(r#"text/plain; a="x,y", text/html"#, ','), vec![r#"text/plain; a="x,y""#, "text/html"]);
        assert_eq!(split_unquoted(r#"a="q\";r"; b"#, ';'), vec![r#"a="q\";r""#, "b"]);
    }

    #[test]
    fn key_value_splits_at_first_equals() {
        assert_eq!(key_value("q=0.5"), Some(("q", "0.5")));
        assert_eq!(key_value(" charset = \"utf-8\" "), Some(("charset", "utf-8")));
        assert_eq!(key_value("a=b=c"), Some(("a", "b=c")));
        assert_eq!(key_value("novalue"), None);
        assert_eq!(key_value("=value"), None);
    }

    #[test]
    fn unquote_value() {
        assert_eq!(unquote("\"x\""), "x");
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote("x"), "x");
    }

    #[test]
    fn quality_values() {
        assert_eq!(parse_quality("1"), Some(1.0));
        assert_eq!(parse_quality("0.25"), Some(0.25));
        assert_eq!(parse_quality(" 0 "), Some(0.0));
        assert_eq!(parse_quality("1.5"), None);
        assert_eq!(parse_quality("-0.1"), None);
        assert_eq!(parse_quality("NaN"), None);
        assert_eq!(parse_quality("abc"), None);
    }

    #[test]
    fn quality_then_declaration_order() {
        let mut values: Vec<Weighted<&'static str>> = vec![("x", 0.5), ("y", 1.0), ("z", 0.5), ("w", 1.0)]
            .into_iter()
            .enumerate()
            .map(|(position, (value, quality))| Weighted { value, quality, position })
            .collect();

        let chain = CompoundComparator::from_comparators(vec![by_quality(), by_position()]);
        chain.sort(&mut values).unwrap();

        let order: Vec<&str> = values.iter().map(|w| w.value).collect();
        assert_eq!(order, vec!["y", "w", "x", "z"]);
    }
}
