use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use log::debug;
use thiserror::Error;
use uuid::Uuid;

/// The name of the cookie that carries the session id.
pub const SESSION_NAME: &str = "ASESSIONID";

/// Error for when a session can't be loaded from its store.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The store could not be read.
    #[error("Session store could not be read: {0}")]
    Io(#[from] io::Error),
    /// A stored session could not be restored.
    #[error("Session {id} could not be restored: {reason}")]
    Corrupt { id: String, reason: String },
}

/// A server side session.
pub trait Session: Send + Sync {
    /// The current id of the session.
    fn id(&self) -> String;
    /// Returns false once the session has been invalidated or has expired.
    fn is_valid(&self) -> bool;
}

/// Finds, creates and rotates sessions.
pub trait SessionManager {
    /// Finds the session with the given id.
    fn find_session(&self, id: &str) -> Result<Option<Arc<dyn Session>>, SessionError>;
    /// Creates and stores a new session.
    fn create_session(&self) -> Arc<dyn Session>;
    /// Gives the session a new id.
    fn change_session_id(&self, session: &dyn Session);
}

/// A session kept in memory that expires after a period of inactivity.
#[derive(Debug)]
pub struct StandardSession {
    id: RwLock<String>,
    created: DateTime<Utc>,
    last_accessed: RwLock<DateTime<Utc>>,
    max_inactive_interval: Duration,
    valid: AtomicBool,
}

impl StandardSession {
    /// Creates a session. A max inactive interval of zero or less means the session never expires.
    pub fn new(id: &str, max_inactive_interval: Duration) -> StandardSession {
        let now = Utc::now();
        StandardSession {
            id: RwLock::new(id.to_string()),
            created: now,
            last_accessed: RwLock::new(now),
            max_inactive_interval,
            valid: AtomicBool::new(true),
        }
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn last_accessed(&self) -> DateTime<Utc> {
        *self.last_accessed.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks the session as accessed now.
    pub fn touch(&self) {
        *self.last_accessed.write().unwrap_or_else(PoisonError::into_inner) = Utc::now()
    }

    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::SeqCst)
    }

    fn set_id(&self, id: String) {
        *self.id.write().unwrap_or_else(PoisonError::into_inner) = id
    }

    fn is_expired(&self) -> bool {
        self.max_inactive_interval > Duration::zero()
            && Utc::now() - self.last_accessed() >= self.max_inactive_interval
    }
}

impl Session for StandardSession {
    fn id(&self) -> String {
        self.id.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn is_valid(&self) -> bool {
        self.valid.load(Ordering::SeqCst) && !self.is_expired()
    }
}

/// A session manager that keeps sessions in memory.
#[derive(Debug)]
pub struct MemorySessionManager {
    sessions: Mutex<HashMap<String, Arc<StandardSession>>>,
    max_inactive_interval: Duration,
}

impl MemorySessionManager {
    /// Creates a manager whose sessions expire after the given period of inactivity.
    pub fn new(max_inactive_interval: Duration) -> MemorySessionManager {
        MemorySessionManager { sessions: Mutex::new(HashMap::new()), max_inactive_interval }
    }

    /// The number of sessions being stored.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<StandardSession>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn new_id() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

impl Default for MemorySessionManager {
    fn default() -> Self {
        MemorySessionManager::new(Duration::minutes(30))
    }
}

impl SessionManager for MemorySessionManager {
    fn find_session(&self, id: &str) -> Result<Option<Arc<dyn Session>>, SessionError> {
        let mut sessions = self.lock();
        let session = match sessions.get(id) {
            Some(session) => Arc::clone(session),
            None => return Ok(None),
        };

        if !session.is_valid() {
            debug!("Removing expired session {}", id);
            sessions.remove(id);
            return Ok(None);
        }

        session.touch();
        Ok(Some(session))
    }

    fn create_session(&self) -> Arc<dyn Session> {
        let session = Arc::new(StandardSession::new(&MemorySessionManager::new_id(), self.max_inactive_interval));
        self.lock().insert(session.id(), Arc::clone(&session));
        session
    }

    fn change_session_id(&self, session: &dyn Session) {
        let mut sessions = self.lock();
        match sessions.remove(&session.id()) {
            Some(stored) => {
                let id = MemorySessionManager::new_id();
                stored.set_id(id.clone());
                sessions.insert(id, stored);
            }
            None => debug!("Session {} is not stored here, its id is unchanged", session.id()),
        }
    }
}
