//! Shared helpers for connection integration tests.

#![allow(unused)]

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use recstate::*;

/// A record as handed to the record layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub content_type: ContentType,
    pub version: ProtocolVersion,
    pub payload: Vec<u8>,
}

/// What the scripted transport does and what it saw.
#[derive(Debug, Default)]
pub struct Wire {
    /// Writes and retries fail with WouldBlock.
    pub blocked: bool,
    /// A write is outstanding in the record layer.
    pub pending: bool,
    /// Retries fail with BrokenPipe, keeping the write outstanding.
    pub broken: bool,
    /// Flushes fail with WouldBlock.
    pub flush_fails: bool,
    pub writes: Vec<Written>,
    pub retries: usize,
    pub flushes: usize,
}

/// Record layer driven by a shared [`Wire`].
pub struct ScriptedRecordLayer(pub Rc<RefCell<Wire>>);

impl RecordLayer for ScriptedRecordLayer {
    fn has_pending_write(&self) -> bool {
        self.0.borrow().pending
    }

    fn write_records(&mut self, records: &[RecordTemplate<'_>]) -> io::Result<()> {
        let mut wire = self.0.borrow_mut();
        for r in records {
            wire.writes.push(Written {
                content_type: r.content_type,
                version: r.version,
                payload: r.payload.to_vec(),
            });
        }
        if wire.blocked {
            wire.pending = true;
            return Err(io::ErrorKind::WouldBlock.into());
        }
        Ok(())
    }

    fn retry_pending_write(&mut self) -> io::Result<()> {
        let mut wire = self.0.borrow_mut();
        wire.retries += 1;
        if wire.broken {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        if wire.blocked {
            return Err(io::ErrorKind::WouldBlock.into());
        }
        wire.pending = false;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut wire = self.0.borrow_mut();
        wire.flushes += 1;
        if wire.flush_fails {
            return Err(io::ErrorKind::WouldBlock.into());
        }
        Ok(())
    }
}

/// Key schedule that records every call.
#[derive(Debug, Default)]
pub struct Keys {
    pub derived: usize,
    pub installed: Vec<CipherDirection>,
    pub bound_suite: Option<CipherSuite>,
}

/// Key schedule handle that can be inspected after being moved into a
/// connection.
#[derive(Clone, Default)]
pub struct SharedKeys(pub Rc<RefCell<Keys>>);

impl KeySchedule for SharedKeys {
    fn derive_key_block(&mut self, state: &ConnectionState) -> Result<KeyBlock, Error> {
        let mut keys = self.0.borrow_mut();
        keys.derived += 1;
        keys.bound_suite = state.session.as_ref().and_then(|s| s.cipher_suite);
        Ok(KeyBlock::new(vec![0x5a; 72]))
    }

    fn install_cipher_state(
        &mut self,
        _state: &ConnectionState,
        direction: CipherDirection,
    ) -> Result<(), Error> {
        self.0.borrow_mut().installed.push(direction);
        Ok(())
    }
}

/// Session cache counting removals.
#[derive(Default)]
pub struct CountingCache {
    pub inner: MemorySessionCache,
    pub removals: AtomicUsize,
}

impl CountingCache {
    pub fn removals(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }
}

impl SessionCache for CountingCache {
    fn insert(&self, session: Session) {
        self.inner.insert(session)
    }

    fn get(&self, id: &SessionId) -> Option<Session> {
        self.inner.get(id)
    }

    fn remove(&self, id: &SessionId) -> bool {
        self.removals.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(id)
    }
}

/// A session with a random id and a non-empty master secret.
pub fn session() -> Session {
    Session::new(SessionId::random(), MasterSecret::new(vec![7; 48]))
}

/// A fully wired test connection.
pub struct Harness {
    pub conn: Connection,
    pub wire: Rc<RefCell<Wire>>,
    pub keys: Rc<RefCell<Keys>>,
    pub cache: Arc<CountingCache>,
}

pub fn harness(role: Role, version: ProtocolVersion) -> Harness {
    harness_with(Config::default(), role, version)
}

pub fn harness_with(config: Config, role: Role, version: ProtocolVersion) -> Harness {
    let cache = Arc::new(CountingCache::default());
    let context = Arc::new(Context::new(config).with_session_cache(cache.clone()));

    let keys = SharedKeys::default();
    let keys_handle = keys.0.clone();

    let mut conn = Connection::new(context, role, version, Box::new(keys));

    let wire = Rc::new(RefCell::new(Wire::default()));
    conn.set_record_layer(Box::new(ScriptedRecordLayer(wire.clone())));

    Harness {
        conn,
        wire,
        keys: keys_handle,
        cache,
    }
}
