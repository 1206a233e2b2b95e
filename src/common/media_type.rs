use std::fmt::{Display, Formatter};

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use crate::parse::quality::{by_position, by_quality, by_value_key, key_value, parse_quality, split_unquoted, Weighted, DEFAULT_QUALITY};
use crate::util::comparator::CompoundComparator;

/// The wildcard type or subtype.
pub const WILDCARD: &str = "*";
/// The media type that matches anything.
pub const ALL_VALUE: &str = "*/*";
/// The media type of form bodies.
pub const APPLICATION_FORM_URLENCODED_VALUE: &str = "application/x-www-form-urlencoded";

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"^[!#$%&'*+.^_`|~0-9A-Za-z-]+$").expect("token pattern is valid");

    /// Quality first, then specificity, then the order the entries were declared in.
    static ref NEGOTIATION_ORDER: CompoundComparator<Weighted<MediaType>> = CompoundComparator::from_comparators(vec![
        by_quality(),
        by_value_key(MediaType::specificity, false),
        by_position(),
    ]);
}

/// A media type with its parameters and quality, as found in `Accept` and `Content-Type` headers.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaType {
    type_: String,
    subtype: String,
    params: Vec<(String, String)>,
    quality: f32,
}

impl MediaType {
    /// Creates a media type with no parameters. The type and subtype are lower cased.
    pub fn new(type_: &str, subtype: &str) -> MediaType {
        MediaType {
            type_: type_.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            params: vec![],
            quality: DEFAULT_QUALITY,
        }
    }

    /// `*/*`
    pub fn all() -> MediaType {
        MediaType::new(WILDCARD, WILDCARD)
    }

    /// `application/x-www-form-urlencoded`
    pub fn application_form_urlencoded() -> MediaType {
        MediaType::new("application", "x-www-form-urlencoded")
    }

    /// Adds a parameter. A `q` parameter sets the quality instead.
    pub fn with_param(mut self, key: &str, value: &str) -> MediaType {
        let key = key.to_ascii_lowercase();
        match key.as_str() {
            "q" => self.quality = parse_quality(value).unwrap_or(DEFAULT_QUALITY),
            _ => self.params.push((key, value.to_string())),
        }
        self
    }

    /// Parses a single media type such as `text/html; charset=utf-8; q=0.5`.
    /// A lone `*` is read as `*/*`. Returns None if the type, subtype, a parameter or the quality is malformed.
    pub fn parse(raw: &str) -> Option<MediaType> {
        let mut parts = split_unquoted(raw, ';').into_iter();
        let full_type = parts.next()?;

        let (type_, subtype) = match full_type {
            WILDCARD => (WILDCARD, WILDCARD),
            _ => full_type.split_once('/')?,
        };
        let (type_, subtype) = (type_.trim(), subtype.trim());
        if !TOKEN.is_match(type_) || !TOKEN.is_match(subtype) || (type_ == WILDCARD && subtype != WILDCARD) {
            return None;
        }

        let mut media_type = MediaType::new(type_, subtype);
        for param in parts {
            let (key, value) = key_value(param)?;
            if key.eq_ignore_ascii_case("q") {
                media_type.quality = parse_quality(value)?;
            } else if TOKEN.is_match(key) {
                media_type.params.push((key.to_ascii_lowercase(), value.to_string()));
            } else {
                return None;
            }
        }
        Some(media_type)
    }

    /// Parses every media type of a comma separated header value, ordered by quality, then specificity,
    /// then declaration order. Malformed entries are skipped.
    pub fn parse_media_types(header: &str) -> Vec<MediaType> {
        let mut weighted: Vec<Weighted<MediaType>> = split_unquoted(header, ',').into_iter()
            .filter_map(|raw| {
                let parsed = MediaType::parse(raw);
                if parsed.is_none() {
                    debug!("Skipping malformed media type {:?}", raw);
                }
                parsed
            })
            .enumerate()
            .map(|(position, value)| Weighted { quality: value.quality, value, position })
            .collect();

        if let Err(err) = NEGOTIATION_ORDER.sort(&mut weighted) {
            warn!("Media types left in declaration order: {}", err);
        }
        weighted.into_iter().map(|w| w.value).collect()
    }

    pub fn type_(&self) -> &str {
        &self.type_
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Gets a parameter by name, ignoring case.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The `charset` parameter.
    pub fn charset(&self) -> Option<&str> {
        self.param("charset")
    }

    pub fn is_wildcard_type(&self) -> bool {
        self.type_ == WILDCARD
    }

    pub fn is_wildcard_subtype(&self) -> bool {
        self.subtype == WILDCARD
    }

    /// 2 for an exact type, 1 for `type/*`, 0 for `*/*`.
    pub fn specificity(&self) -> u8 {
        match (self.is_wildcard_type(), self.is_wildcard_subtype()) {
            (true, _) => 0,
            (false, true) => 1,
            (false, false) => 2,
        }
    }

    /// Checks if this media type includes the other one. `*/*` includes everything, `text/*` includes `text/html`.
    /// Parameters are not considered.
    pub fn includes(&self, other: &MediaType) -> bool {
        if self.is_wildcard_type() {
            return true;
        }
        self.type_ == other.type_ && (self.is_wildcard_subtype() || self.subtype == other.subtype)
    }

    /// Checks if the type and subtype are the same, ignoring parameters and quality.
    pub fn equals_type_and_subtype(&self, other: &MediaType) -> bool {
        self.type_ == other.type_ && self.subtype == other.subtype
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (key, value) in &self.params {
            write!(f, ";{}={}", key, value)?;
        }
        if self.quality != DEFAULT_QUALITY {
            write!(f, ";q={}", self.quality)?;
        }
        Ok(())
    }
}
