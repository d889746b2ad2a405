//! Sessions and the session cache.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Mutex;

use nom::bytes::complete::take;
use nom::error::{Error as NomError, ErrorKind};
use nom::number::complete::be_u8;
use nom::{Err, IResult};
use rand::Rng;
use tinyvec::ArrayVec;
use zeroize::Zeroizing;

use crate::types::CipherSuite;

/// Session identifier, 0 to 32 bytes.
#[derive(Clone, Default)]
pub struct SessionId(ArrayVec<[u8; 32]>);

impl SessionId {
    pub const MAX_LEN: usize = 32;

    /// Create from a slice, `None` if longer than 32 bytes.
    pub fn try_new(data: &[u8]) -> Option<Self> {
        if data.len() > Self::MAX_LEN {
            return None;
        }
        let mut id = ArrayVec::new();
        id.extend_from_slice(data);
        Some(SessionId(id))
    }

    /// A random id of full length.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill(&mut bytes[..]);
        SessionId(ArrayVec::from(bytes))
    }

    /// Parse a length-prefixed session id.
    pub fn parse(input: &[u8]) -> IResult<&[u8], SessionId> {
        let (input, len) = be_u8(input)?;
        if len as usize > Self::MAX_LEN {
            return Err(Err::Failure(NomError::new(input, ErrorKind::LengthValue)));
        }
        let (input, data) = take(len as usize)(input)?;
        let mut id = ArrayVec::new();
        id.extend_from_slice(data);
        Ok((input, SessionId(id)))
    }
}

impl Deref for SessionId {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl PartialEq for SessionId {
    fn eq(&self, other: &Self) -> bool {
        self.deref() == other.deref()
    }
}

impl Eq for SessionId {}

impl Hash for SessionId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.deref().hash(state);
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({:02x?})", self.deref())
    }
}

/// Master secret of a session. Wiped on drop.
#[derive(Clone, Default)]
pub struct MasterSecret(Zeroizing<Vec<u8>>);

impl MasterSecret {
    pub fn new(secret: Vec<u8>) -> Self {
        MasterSecret(Zeroizing::new(secret))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for MasterSecret {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MasterSecret(len: {})", self.0.len())
    }
}

/// A negotiated (or resumed) session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub id: SessionId,
    pub master_secret: MasterSecret,
    /// Cipher suite bound at change-cipher-spec time.
    pub cipher_suite: Option<CipherSuite>,
}

impl Session {
    pub fn new(id: SessionId, master_secret: MasterSecret) -> Self {
        Session {
            id,
            master_secret,
            cipher_suite: None,
        }
    }

    /// Whether key material can be derived from this session.
    pub fn has_master_secret(&self) -> bool {
        !self.master_secret.is_empty()
    }
}

/// Cache of resumable sessions, shared between connections.
pub trait SessionCache: Send + Sync {
    fn insert(&self, session: Session);

    fn get(&self, id: &SessionId) -> Option<Session>;

    /// Remove the session. Returns whether it was present.
    fn remove(&self, id: &SessionId) -> bool;
}

/// Session cache backed by a `HashMap`.
#[derive(Default)]
pub struct MemorySessionCache {
    sessions: Mutex<HashMap<SessionId, Session>>,
}

impl MemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SessionId, Session>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionCache for MemorySessionCache {
    fn insert(&self, session: Session) {
        trace!("Cache session {:?}", session.id);
        self.lock().insert(session.id.clone(), session);
    }

    fn get(&self, id: &SessionId) -> Option<Session> {
        self.lock().get(id).cloned()
    }

    fn remove(&self, id: &SessionId) -> bool {
        self.lock().remove(id).is_some()
    }
}

impl fmt::Debug for MemorySessionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySessionCache")
            .field("sessions", &self.len())
            .finish()
    }
}
