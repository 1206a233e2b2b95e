use std::env;
use std::fmt::{Display, Formatter};

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use crate::parse::quality::{by_position, by_quality, key_value, parse_quality, split_unquoted, Weighted, DEFAULT_QUALITY};
use crate::util::comparator::CompoundComparator;

lazy_static! {
    /// An RFC 4647 language range, either `*` or subtags of up to 8 alphanumerics separated by `-`.
    static ref LANGUAGE_RANGE: Regex = Regex::new(r"^(?:\*|[A-Za-z]{1,8}(?:-[A-Za-z0-9]{1,8})*)$").expect("language range pattern is valid");

    static ref PREFERENCE_ORDER: CompoundComparator<Weighted<Locale>> = CompoundComparator::from_comparators(vec![
        by_quality(),
        by_position(),
    ]);
}

/// A language with an optional country and variant, such as `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    country: String,
    variant: String,
}

impl Locale {
    /// Creates a locale. The language is lower cased and the country upper cased.
    pub fn new(language: &str, country: &str, variant: &str) -> Locale {
        Locale {
            language: language.to_ascii_lowercase(),
            country: country.to_ascii_uppercase(),
            variant: variant.to_string(),
        }
    }

    /// Parses a language tag such as `en`, `en-US` or `de-CH-1996`. Underscores are accepted as separators.
    /// Returns None if the tag is not a valid language range.
    pub fn from_language_tag(tag: &str) -> Option<Locale> {
        let tag = tag.trim().replace('_', "-");
        if !LANGUAGE_RANGE.is_match(&tag) {
            return None;
        }

        let mut subtags = tag.splitn(3, '-');
        let language = subtags.next().unwrap_or_default();
        let country = subtags.next().unwrap_or_default();
        let variant = subtags.next().unwrap_or_default();
        Some(Locale::new(language, country, variant))
    }

    /// The locale of the running process, read from `LC_ALL`, `LC_MESSAGES` or `LANG`. Falls back to `en-US`.
    pub fn system_default() -> Locale {
        ["LC_ALL", "LC_MESSAGES", "LANG"].iter()
            .filter_map(|name| env::var(name).ok())
            .filter(|value| !value.is_empty())
            .find_map(|value| Locale::from_posix(&value))
            .unwrap_or_else(|| Locale::new("en", "US", ""))
    }

    /// Parses a POSIX locale such as `de_DE.UTF-8@euro`. `C` and `POSIX` have no language and give None.
    fn from_posix(value: &str) -> Option<Locale> {
        let name = value.split(&['.', '@'][..]).next().unwrap_or_default();
        match name {
            "C" | "POSIX" | "" => None,
            _ => Locale::from_language_tag(name),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Returns the language tag of this locale, such as `en-US`.
    pub fn to_language_tag(&self) -> String {
        self.to_string()
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.language)?;
        for subtag in [&self.country, &self.variant] {
            if !subtag.is_empty() {
                write!(f, "-{}", subtag)?;
            }
        }
        Ok(())
    }
}

/// A language range from an `Accept-Language` header with its quality.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptLanguage {
    pub locale: Locale,
    pub quality: f32,
}

impl AcceptLanguage {
    /// Parses an `Accept-Language` header value such as `da, en-GB;q=0.8, en;q=0.7`, ordered by quality and then
    /// by declaration order. Malformed ranges are skipped.
    pub fn parse(header: &str) -> Vec<AcceptLanguage> {
        let mut weighted: Vec<Weighted<Locale>> = split_unquoted(header, ',').into_iter()
            .filter_map(|raw| {
                let parsed = parse_language_range(raw);
                if parsed.is_none() {
                    debug!("Skipping malformed language range {:?}", raw);
                }
                parsed
            })
            .enumerate()
            .map(|(position, (value, quality))| Weighted { value, quality, position })
            .collect();

        if let Err(err) = PREFERENCE_ORDER.sort(&mut weighted) {
            warn!("Language ranges left in declaration order: {}", err);
        }
        weighted.into_iter().map(|w| AcceptLanguage { locale: w.value, quality: w.quality }).collect()
    }
}

/// Parses one `range;q=value` entry.
fn parse_language_range(raw: &str) -> Option<(Locale, f32)> {
    let mut parts = split_unquoted(raw, ';').into_iter();
    let locale = Locale::from_language_tag(parts.next()?)?;

    let mut quality = DEFAULT_QUALITY;
    for param in parts {
        match key_value(param) {
            Some((key, value)) if key.eq_ignore_ascii_case("q") => quality = parse_quality(value)?,
            _ => return None,
        }
    }
    Some((locale, quality))
}

#[cfg(test)]
mod tests {
    use crate::common::locale::{AcceptLanguage, Locale};

    fn tags(header: &str) -> Vec<String> {
        AcceptLanguage::parse(header).iter().map(|l| l.locale.to_string()).collect()
    }

    #[test]
    fn language_tags() {
        let locale = Locale::from_language_tag("en-us").unwrap();
        assert_eq!(locale.language(), "en");
        assert_eq!(locale.country(), "US");
        assert_eq!(locale.to_language_tag(), "en-US");

        assert_eq!(Locale::from_language_tag("de_CH").unwrap(), Locale::new("de", "CH", ""));
        assert_eq!(Locale::from_language_tag("sl-IT-nedis").unwrap().variant(), "nedis");
        assert_eq!(Locale::from_language_tag("*").unwrap().language(), "*");
    }

    #[test]
    fn malformed_language_tags() {
        assert!(Locale::from_language_tag("").is_none());
        assert!(Locale::from_language_tag("en--US").is_none());
        assert!(Locale::from_language_tag("toolonglanguage").is_none());
        assert!(Locale::from_language_tag("e n").is_none());
    }

    #[test]
    fn posix_locales() {
        assert_eq!(Locale::from_posix("de_DE.UTF-8"), Some(Locale::new("de", "DE", "")));
        assert_eq!(Locale::from_posix("fr_FR@euro"), Some(Locale::new("fr", "FR", "")));
        assert_eq!(Locale::from_posix("C.UTF-8"), None);
        assert_eq!(Locale::from_posix("POSIX"), None);
    }

    #[test]
    fn ordered_by_quality_then_declaration() {
        assert_eq!(tags("da, en-GB;q=0.8, en;q=0.7"), vec!["da", "en-GB", "en"]);
        assert_eq!(tags("fr;q=0.5, de;q=0.9, it;q=0.5, *;q=0.1"), vec!["de", "fr", "it", "*"]);
    }

    #[test]
    fn qualities_are_kept() {
        let languages = AcceptLanguage::parse("en;q=0.3, de");
        assert_eq!(languages[0].quality, 1.0);
        assert_eq!(languages[1].quality, 0.3);
    }

    #[test]
    fn malformed_ranges_skipped() {
        assert_eq!(tags("en;q=2, de;level=1, 12, fr"), vec!["fr"]);
        assert!(tags("").is_empty());
    }
}
