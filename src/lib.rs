#![forbid(unsafe_code)]
#![warn(clippy::all)]
// #![deny(missing_docs)]

//! TLS record-protocol state for cipher activation and alerts.
//!
//! A [`Connection`] handles the peer's change-cipher-spec by activating the
//! pending read cipher, and sends two-byte alerts over a [`RecordLayer`] that
//! may not accept a whole record at once. An alert that blocks is kept and
//! retried byte for byte with [`Connection::dispatch_alert`].
//!
//! ```
//! use std::sync::Arc;
//! use recstate::*;
//!
//! struct Keys;
//!
//! impl KeySchedule for Keys {
//!     fn derive_key_block(&mut self, _: &ConnectionState) -> Result<KeyBlock, Error> {
//!         Ok(KeyBlock::new(vec![0; 32]))
//!     }
//!
//!     fn install_cipher_state(
//!         &mut self,
//!         _: &ConnectionState,
//!         _: CipherDirection,
//!     ) -> Result<(), Error> {
//!         Ok(())
//!     }
//! }
//!
//! let context = Arc::new(Context::default());
//! let mut conn = Connection::new(context, Role::Client, ProtocolVersion::Tls1_2, Box::new(Keys));
//! conn.set_record_layer(Box::new(StreamRecordLayer::new(Vec::new())));
//!
//! let queued = conn.close_notify().unwrap();
//! assert_eq!(queued, Queued::Sent);
//! assert!(conn.state().shutdown.contains(Shutdown::SENT));
//! ```

#[macro_use]
extern crate log;

mod alert;
pub use alert::{Alert, AlertDescription, AlertDispatchState, AlertLevel};
pub use alert::{AlertTranslator, Dispatch, Queued, StandardAlerts};

mod callback;
pub use callback::{InfoCallback, InfoEvent, MessageCallback, MessageTrace};
pub use callback::{SharedInfoCallback, TraceDirection};

mod cipher;
pub use cipher::{CipherDirection, KeyBlock, KeySchedule};

mod config;
pub use config::{Config, ConfigBuilder};

mod connection;
pub use connection::{Connection, ConnectionState, Shutdown};

mod context;
pub use context::Context;

mod error;
pub use error::Error;

mod record;
pub use record::{PendingWrite, RecordHeader, RecordLayer, RecordTemplate};
pub use record::{StreamRecordLayer, MAX_FRAGMENT_LEN};

mod session;
pub use session::{MasterSecret, MemorySessionCache, Session, SessionCache, SessionId};

mod types;
pub use types::{CipherSuite, ContentType, HandshakeStage, ProtocolVersion, Role};
