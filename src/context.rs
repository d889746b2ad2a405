use std::fmt;
use std::sync::Arc;

use crate::callback::SharedInfoCallback;
use crate::connection::ConnectionState;
use crate::session::{MemorySessionCache, Session, SessionCache};
use crate::{Config, InfoEvent};

/// State shared by all connections created from it.
///
/// Holds the configuration, the session cache and an optional info callback
/// used by connections that have none of their own.
pub struct Context {
    config: Config,
    session_cache: Arc<dyn SessionCache>,
    info_callback: Option<SharedInfoCallback>,
}

impl Context {
    /// Create a context with an in-memory session cache.
    pub fn new(config: Config) -> Self {
        Context {
            config,
            session_cache: Arc::new(MemorySessionCache::new()),
            info_callback: None,
        }
    }

    /// Replace the session cache.
    pub fn with_session_cache(mut self, cache: Arc<dyn SessionCache>) -> Self {
        self.session_cache = cache;
        self
    }

    /// Set the context-wide info callback.
    pub fn with_info_callback<F>(mut self, cb: F) -> Self
    where
        F: Fn(&ConnectionState, InfoEvent, u16) + Send + Sync + 'static,
    {
        self.info_callback = Some(Arc::new(cb));
        self
    }

    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session_cache(&self) -> &Arc<dyn SessionCache> {
        &self.session_cache
    }

    pub(crate) fn info_callback(&self) -> Option<&SharedInfoCallback> {
        self.info_callback.as_ref()
    }

    /// Evict a session so it cannot be resumed.
    pub fn remove_session(&self, session: &Session) {
        let removed = self.session_cache.remove(&session.id);
        debug!("Evict session {:?} (cached: {})", session.id, removed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new(Config::default())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("info_callback", &self.info_callback.is_some())
            .finish()
    }
}
