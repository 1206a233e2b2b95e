use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

use reqview::common::request::Request;
use reqview::parse::request::read_request;

/// Reads a request from its raw text. Lines may end with a bare LF.
pub fn request(raw: &str) -> Request {
    read_request(&mut raw.as_bytes()).unwrap()
}

/// A request carrying the given session cookie.
pub fn with_session(method: &str, uri: &str, id: &str) -> Request {
    request(&format!("{} {} HTTP/1.1\ncookie: theme=dark; ASESSIONID={}\n\n", method, uri, id))
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(vec![], Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}
