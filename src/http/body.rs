use std::io::Read;

use encoding_rs::Encoding;
use flate2::read::GzDecoder;

use crate::common::media_type::MediaType;
use crate::common::request::HttpEntity;
use crate::http::error::RequestError;

/// The body of a request.
pub struct RequestBody<'a> {
    entity: &'a dyn HttpEntity,
}

impl<'a> RequestBody<'a> {
    pub fn new(entity: &'a dyn HttpEntity) -> RequestBody<'a> {
        RequestBody { entity }
    }

    /// The `Content-Encoding` of the body, or an empty string if there is none.
    pub fn content_encoding(&self) -> &'a str {
        self.entity.content_encoding().unwrap_or_default()
    }

    /// The length of the body as sent, before any decoding.
    pub fn length(&self) -> Option<u64> {
        self.entity.content_length()
    }

    pub fn content_type(&self) -> Option<&'a str> {
        self.entity.content_type()
    }

    /// Opens the body. Bodies with a gzip content encoding are decompressed while reading.
    pub fn stream(&self) -> Result<Box<dyn Read + 'a>, RequestError> {
        let content = self.entity.content()?;
        if self.content_encoding().to_ascii_lowercase().contains("gzip") {
            Ok(Box::new(GzDecoder::new(content)))
        } else {
            Ok(content)
        }
    }

    /// Reads the whole body as text in the charset of its content type.
    /// Any charset label known to browsers is supported. With no charset, invalid UTF-8 is replaced.
    pub fn string(&self) -> Result<String, RequestError> {
        let mut bytes = vec![];
        self.stream()?.read_to_end(&mut bytes)?;

        let charset = self.content_type()
            .and_then(MediaType::parse)
            .and_then(|media_type| media_type.charset().map(String::from));
        let charset = match charset {
            Some(charset) => charset,
            None => return Ok(String::from_utf8_lossy(&bytes).into_owned()),
        };

        let encoding = Encoding::for_label(charset.as_bytes())
            .ok_or_else(|| RequestError::UnsupportedCharset(charset.clone()))?;
        let (text, malformed) = encoding.decode_with_bom_removal(&bytes);
        if malformed {
            Err(RequestError::MalformedText { charset: encoding.name().to_string() })
        } else {
            Ok(text.into_owned())
        }
    }
}
