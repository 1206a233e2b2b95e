use std::io;
use std::io::Read;

use crate::common::header::{CONTENT_ENCODING, CONTENT_TYPE, Header, HeaderMap, HeaderMapOps};

/// The entity of a request: its body and the headers that describe it.
pub trait HttpEntity {
    /// The length of the content in bytes, if known.
    fn content_length(&self) -> Option<u64>;
    /// The raw `Content-Type` value.
    fn content_type(&self) -> Option<&str>;
    /// The raw `Content-Encoding` value.
    fn content_encoding(&self) -> Option<&str>;
    /// Opens a new reader over the content.
    fn content(&self) -> io::Result<Box<dyn Read + '_>>;
}

/// An entity held in memory.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct ByteEntity {
    pub content: Vec<u8>,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
}

impl ByteEntity {
    pub fn new(content: Vec<u8>) -> ByteEntity {
        ByteEntity { content, ..Default::default() }
    }

    /// Creates an entity described by the content headers of the given map.
    pub fn from_headers(headers: &HeaderMap, content: Vec<u8>) -> ByteEntity {
        ByteEntity {
            content,
            content_type: headers.get_first_header_value(&CONTENT_TYPE).cloned(),
            content_encoding: headers.get_first_header_value(&CONTENT_ENCODING).cloned(),
        }
    }
}

impl HttpEntity for ByteEntity {
    fn content_length(&self) -> Option<u64> {
        Some(self.content.len() as u64)
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn content_encoding(&self) -> Option<&str> {
        self.content_encoding.as_deref()
    }

    fn content(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(self.content.as_slice()))
    }
}

/// A received HTTP request, before any of it is interpreted.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Request {
    /// The method token as received.
    pub method: String,
    /// The request target as received.
    pub uri: String,
    /// The headers.
    pub headers: HeaderMap,
    /// The entity, if the request has a body.
    pub entity: Option<ByteEntity>,
}

impl Request {
    pub fn new(method: &str, uri: &str) -> Request {
        Request { method: method.to_string(), uri: uri.to_string(), headers: HeaderMap::new(), entity: None }
    }

    pub fn with_header(mut self, header: impl Into<Header>, value: &str) -> Request {
        self.headers.add_header(header.into(), value.to_string());
        self
    }

    /// Sets the body. The entity takes its content type and encoding from the headers added so far.
    pub fn with_body(mut self, body: &[u8]) -> Request {
        self.entity = Some(ByteEntity::from_headers(&self.headers, body.to_vec()));
        self
    }
}
