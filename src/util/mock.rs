use std::cell::Cell;
use std::cmp::min;
use std::io::{Error, ErrorKind, Read, Write};
use std::sync::Arc;

use crate::common::request::{ByteEntity, HttpEntity};
use crate::common::session::{MemorySessionManager, Session, SessionError, SessionManager};

/// A reader that hands out its data in the given fragments.
pub struct MockReader {
    pub data: Vec<Vec<u8>>,
}

impl MockReader {
    pub fn from_strs(data: Vec<&str>) -> MockReader {
        MockReader { data: data.into_iter().map(|s| s.as_bytes().to_vec()).collect() }
    }

    pub fn from_bytes(data: Vec<&[u8]>) -> MockReader {
        MockReader { data: data.into_iter().map(|s| s.to_vec()).collect() }
    }
}

impl Read for MockReader {
    fn read(&mut self, mut buf: &mut [u8]) -> std::io::Result<usize> {
        if self.data.is_empty() {
            return Ok(0);
        }

        let next = &mut self.data[0];

        let amount = min(buf.len(), next.len());
        let to_read: Vec<u8> = next.drain(0..amount).collect();
        buf.write_all(&to_read)?;

        if next.is_empty() {
            self.data.remove(0);
        }

        Ok(amount)
    }
}

/// An entity that counts how often its content is opened.
pub struct CountingEntity {
    pub entity: ByteEntity,
    reads: Cell<usize>,
}

impl CountingEntity {
    pub fn new(content: &[u8], content_type: &str) -> CountingEntity {
        let entity = ByteEntity { content_type: Some(content_type.to_string()), ..ByteEntity::new(content.to_vec()) };
        CountingEntity { entity, reads: Cell::new(0) }
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl HttpEntity for CountingEntity {
    fn content_length(&self) -> Option<u64> {
        self.entity.content_length()
    }

    fn content_type(&self) -> Option<&str> {
        self.entity.content_type()
    }

    fn content_encoding(&self) -> Option<&str> {
        self.entity.content_encoding()
    }

    fn content(&self) -> std::io::Result<Box<dyn Read + '_>> {
        self.reads.set(self.reads.get() + 1);
        self.entity.content()
    }
}

/// A session manager whose store can never be read. Sessions can still be created.
#[derive(Default)]
pub struct FailingSessionManager {
    pub inner: MemorySessionManager,
}

impl SessionManager for FailingSessionManager {
    fn find_session(&self, _id: &str) -> Result<Option<Arc<dyn Session>>, SessionError> {
        Err(SessionError::Io(Error::new(ErrorKind::ConnectionRefused, "session store is down")))
    }

    fn create_session(&self) -> Arc<dyn Session> {
        self.inner.create_session()
    }

    fn change_session_id(&self, session: &dyn Session) {
        self.inner.change_session_id(session)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use crate::common::request::HttpEntity;
    use crate::util::mock::{CountingEntity, MockReader};

    fn test_read(reader: &mut impl Read, expected: &str, buf_size: usize) {
        let mut buf = vec![0u8; buf_size];
        let len = reader.read(&mut buf).unwrap();
        assert_eq!(expected, String::from_utf8_lossy(&buf[..len]));
    }

    #[test]
    fn mock_reader_fragments() {
        let mut reader = MockReader::from_strs(vec!["hello", "world"]);

        test_read(&mut reader, "hel", 3);
        test_read(&mut reader, "lo", 10);
        test_read(&mut reader, "world", 10);
        test_read(&mut reader, "", 10);
    }

    #[test]
    fn counting_entity() {
        let entity = CountingEntity::new(b"a=1", "text/plain");
        assert_eq!(entity.reads(), 0);
        entity.content().unwrap();
        entity.content().unwrap();
        assert_eq!(entity.reads(), 2);
    }
}
