use std::io;
use std::io::{BufRead, ErrorKind, Read};

use crate::common::header::{CONTENT_LENGTH, Header, HeaderMap, HeaderMapOps};
use crate::common::request::{ByteEntity, Request};
use crate::parse::error::ParsingError;

/// Max size in bytes for the request line and headers together.
const MAX_HEADERS_SIZE: usize = 4096;
/// Max size in bytes for a body.
const MAX_BODY_SIZE: u64 = 3 * 1024 * 1024;
/// HTTP versions that can be read.
const SUPPORTED_VERSIONS: [&str; 2] = ["HTTP/1.0", "HTTP/1.1"];

/// Reads one request. The body is read by its `Content-Length`, or until the end of the input if there is none.
/// Lines may end with CRLF or a bare LF.
pub fn read_request(reader: &mut impl BufRead) -> Result<Request, ParsingError> {
    let mut remaining = MAX_HEADERS_SIZE;

    let first_line = read_line(reader, &mut remaining)?;
    let (method, uri) = parse_first_line(&first_line)?;

    let mut headers = HeaderMap::new();
    loop {
        let line = read_line(reader, &mut remaining)?;
        if line.is_empty() {
            break;
        }
        let (header, value) = parse_header(&line)?;
        headers.add_header(header, value);
    }

    let body = read_body(reader, &headers)?;
    let entity = if body.is_empty() { None } else { Some(ByteEntity::from_headers(&headers, body)) };

    Ok(Request { method, uri, headers, entity })
}

/// Reads a line, without its line ending, taking its size from the remaining header budget.
fn read_line(reader: &mut impl BufRead, remaining: &mut usize) -> Result<String, ParsingError> {
    let mut line = vec![];
    let read = reader.by_ref().take(*remaining as u64).read_until(b'\n', &mut line)?;

    if line.last() != Some(&b'\n') {
        return if read == *remaining {
            Err(ParsingError::HeadersTooLarge(MAX_HEADERS_SIZE))
        } else {
            Err(io::Error::from(ErrorKind::UnexpectedEof).into())
        };
    }
    *remaining -= read;

    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    String::from_utf8(line).map_err(|_| ParsingError::InvalidUtf8)
}

/// Parses the request line. Verifies the HTTP version and returns the method and target.
fn parse_first_line(line: &str) -> Result<(String, String), ParsingError> {
    let mut split = line.split(' ');

    let method = split.next().filter(|method| !method.is_empty()).ok_or(ParsingError::BadSyntax("missing method"))?;
    let uri = split.next().filter(|uri| !uri.is_empty()).ok_or(ParsingError::BadSyntax("missing request target"))?;
    let http_version = split.next().ok_or(ParsingError::BadSyntax("missing HTTP version"))?;

    if !SUPPORTED_VERSIONS.contains(&http_version) {
        return Err(ParsingError::InvalidHttpVersion(http_version.to_string()));
    }

    Ok((method.to_string(), uri.to_string()))
}

/// Parses a header line. Splits the line at the first `:` and trims the value.
fn parse_header(line: &str) -> Result<(Header, String), ParsingError> {
    let (name, value) = line.split_once(':').ok_or(ParsingError::BadSyntax("header without a colon"))?;
    Ok((Header::from(name.trim()), value.trim().to_string()))
}

fn read_body(reader: &mut impl BufRead, headers: &HeaderMap) -> Result<Vec<u8>, ParsingError> {
    let mut body = vec![];

    match headers.get_first_header_value(&CONTENT_LENGTH) {
        Some(length) => {
            let length: u64 = length.trim().parse().map_err(|_| ParsingError::InvalidContentLength(length.clone()))?;
            if length > MAX_BODY_SIZE {
                return Err(ParsingError::ContentLengthTooLarge(MAX_BODY_SIZE));
            }
            body.resize(length as usize, 0);
            reader.read_exact(&mut body)?;
        }
        None => {
            reader.by_ref().take(MAX_BODY_SIZE + 1).read_to_end(&mut body)?;
            if body.len() as u64 > MAX_BODY_SIZE {
                return Err(ParsingError::ContentLengthTooLarge(MAX_BODY_SIZE));
            }
        }
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, ErrorKind};

    use crate::common::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};
    use crate::common::request::{HttpEntity, Request};
    use crate::header_map;
    use crate::parse::error::ParsingError;
    use crate::parse::request::read_request;
    use crate::util::mock::MockReader;

    fn read(data: Vec<&str>) -> Result<Request, ParsingError> {
        read_request(&mut BufReader::new(MockReader::from_strs(data)))
    }

    #[test]
    fn no_header_or_body() {
        let request = read(vec!["GET / HTTP/1.1\r\n\r\n"]).unwrap();
        assert_eq!(request, Request { method: "GET".into(), uri: "/".into(), headers: HeaderMap::new(), entity: None });
    }

    #[test]
    fn fragmented() {
        let request = read(vec!["G", "ET /a?b=c ", "HTTP/1", ".0\r\n", "conte", "nt-length: 5\r", "\n\r\n", "he", "llo"]).unwrap();
        assert_eq!(request.uri, "/a?b=c");
        assert_eq!(request.headers, header_map![(CONTENT_LENGTH, "5")]);
        assert_eq!(request.entity.unwrap().content, b"hello");
    }

    #[test]
    fn unknown_methods_are_kept() {
        assert_eq!(read(vec!["brew /pot HTTP/1.1\r\n\r\n"]).unwrap().method, "brew");
    }

    #[test]
    fn headers_weird_case_and_spacing() {
        let request = read(vec!["GET / HTTP/1.1\r\ncoNtEnt-tYpe:text/plain\r\nCoNNECTION:   close  \r\nsomething: a: b\r\n\r\n"]).unwrap();
        assert_eq!(request.headers, header_map![
            (CONTENT_TYPE, "text/plain"),
            (CONNECTION, "close"),
            ("something", "a: b"),
        ]);
    }

    #[test]
    fn bare_line_feeds() {
        let request = read(vec!["POST /form HTTP/1.1\ncontent-type: application/x-www-form-urlencoded\n\na=1"]).unwrap();
        let entity = request.entity.unwrap();
        assert_eq!(entity.content, b"a=1");
        assert_eq!(entity.content_type(), Some("application/x-www-form-urlencoded"));
    }

    #[test]
    fn body_without_length_reads_to_end() {
        let request = read(vec!["PUT / HTTP/1.1\r\n\r\n", "part one, ", "part two"]).unwrap();
        assert_eq!(request.entity.unwrap().content, b"part one, part two");
    }

    #[test]
    fn only_reads_content_length() {
        let request = read(vec!["GET / HTTP/1.1\r\ncontent-length: 2\r\n\r\nhi there"]).unwrap();
        assert_eq!(request.entity.unwrap().content, b"hi");
    }

    #[test]
    fn bad_request_lines() {
        assert!(matches!(read(vec!["GET\r\n\r\n"]), Err(ParsingError::BadSyntax(_))));
        assert!(matches!(read(vec!["GET /\r\n\r\n"]), Err(ParsingError::BadSyntax(_))));
        assert!(matches!(read(vec!["\r\n\r\n"]), Err(ParsingError::BadSyntax(_))));
        assert!(matches!(read(vec!["GET / HTTP/1.2\r\n\r\n"]), Err(ParsingError::InvalidHttpVersion(v)) if v == "HTTP/1.2"));
    }

    #[test]
    fn header_without_colon() {
        assert!(matches!(read(vec!["GET / HTTP/1.1\r\nnocolon\r\n\r\n"]), Err(ParsingError::BadSyntax(_))));
    }

    #[test]
    fn unexpected_eof() {
        assert!(matches!(read(vec![]), Err(ParsingError::Io(err)) if err.kind() == ErrorKind::UnexpectedEof));
        assert!(matches!(read(vec!["GET / HTTP/1.1\r\nhost: x"]), Err(ParsingError::Io(err)) if err.kind() == ErrorKind::UnexpectedEof));
        assert!(matches!(read(vec!["GET / HTTP/1.1\r\ncontent-length: 10\r\n\r\nshort"]), Err(ParsingError::Io(err)) if err.kind() == ErrorKind::UnexpectedEof));
    }

    #[test]
    fn headers_too_large() {
        let header = format!("x: {}\r\n", "a".repeat(5000));
        let data = format!("GET / HTTP/1.1\r\n{}\r\n", header);
        assert!(matches!(read(vec![&data]), Err(ParsingError::HeadersTooLarge(4096))));
    }

    #[test]
    fn invalid_content_length() {
        assert!(matches!(read(vec!["GET / HTTP/1.1\r\ncontent-length: five\r\n\r\n"]), Err(ParsingError::InvalidContentLength(_))));
        assert!(matches!(read(vec!["GET / HTTP/1.1\r\ncontent-length: 4000000\r\n\r\n"]), Err(ParsingError::ContentLengthTooLarge(_))));
    }

    #[test]
    fn invalid_utf8() {
        let reader = MockReader::from_bytes(vec![&b"GET /\xff HTTP/1.1\r\n\r\n"[..]]);
        assert!(matches!(read_request(&mut BufReader::new(reader)), Err(ParsingError::InvalidUtf8)));
    }
}
