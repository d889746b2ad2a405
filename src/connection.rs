use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::alert::{Alert, AlertDescription, AlertDispatchState, AlertLevel};
use crate::alert::{AlertTranslator, Queued, StandardAlerts};
use crate::callback::{InfoCallback, InfoEvent, MessageCallback, MessageTrace, TraceDirection};
use crate::cipher::{self, KeyBlock, KeySchedule};
use crate::record::{PendingWrite, RecordLayer};
use crate::session::Session;
use crate::types::{CipherSuite, ContentType, HandshakeStage, ProtocolVersion, Role};
use crate::{Context, Error};

bitflags! {
    /// Shutdown progress.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Shutdown: u8 {
        /// We sent (or queued) close_notify.
        const SENT = 0b01;
        /// The peer's close_notify arrived.
        const RECEIVED = 0b10;
    }
}

/// Per-connection protocol state.
///
/// The handshake owns most of this. Alert dispatch fields are only changed
/// through [`Connection::queue_alert`] and [`Connection::dispatch_alert`].
#[derive(Debug)]
pub struct ConnectionState {
    pub role: Role,

    /// Negotiated version. While the ClientHello is being written this is
    /// the highest version offered.
    pub version: ProtocolVersion,

    pub handshake: HandshakeStage,

    /// Whether the current handshake is a renegotiation.
    pub renegotiating: bool,

    /// Whether a HelloRetryRequest was seen in this handshake.
    pub hello_retry: bool,

    /// Cipher suite chosen by the handshake, bound to the session on
    /// change-cipher-spec.
    pub new_cipher_suite: Option<CipherSuite>,

    pub session: Option<Session>,

    /// Set by the first change-cipher-spec of an epoch.
    pub pending_key_block: Option<KeyBlock>,

    pub shutdown: Shutdown,

    pub(crate) alert_state: AlertDispatchState,
    pub(crate) queued_alert: Option<Alert>,
    pub(crate) pending_write: Option<PendingWrite>,
}

impl ConnectionState {
    pub fn new(role: Role, version: ProtocolVersion) -> Self {
        ConnectionState {
            role,
            version,
            handshake: HandshakeStage::Before,
            renegotiating: false,
            hello_retry: false,
            new_cipher_suite: None,
            session: None,
            pending_key_block: None,
            shutdown: Shutdown::empty(),
            alert_state: AlertDispatchState::None,
            queued_alert: None,
            pending_write: None,
        }
    }

    pub fn alert_state(&self) -> AlertDispatchState {
        self.alert_state
    }

    /// The translated alert waiting to be sent, if any.
    pub fn queued_alert(&self) -> Option<Alert> {
        self.queued_alert
    }

    /// The alert record kept for the retry path.
    pub fn pending_write(&self) -> Option<PendingWrite> {
        self.pending_write
    }

    /// Record version to put on an alert.
    ///
    /// Normally the negotiated version (TLS 1.3 downgraded to TLS 1.2). An
    /// alert sent while writing the first ClientHello of a fresh handshake
    /// uses TLS 1.0, the most tolerated record version, unless a
    /// HelloRetryRequest already fixed the version.
    pub fn alert_record_version(&self) -> ProtocolVersion {
        if self.handshake == HandshakeStage::WritingClientHello
            && !self.renegotiating
            && self.version > ProtocolVersion::Tls1_0
            && !self.hello_retry
        {
            return ProtocolVersion::Tls1_0;
        }

        self.version.record_version()
    }

    pub(crate) fn reset_alert(&mut self) {
        self.alert_state = AlertDispatchState::None;
        self.queued_alert = None;
        self.pending_write = None;
    }
}

/// A TLS connection, as far as cipher activation and alerts go.
pub struct Connection {
    pub(crate) context: Arc<Context>,
    pub(crate) state: ConnectionState,
    key_schedule: Box<dyn KeySchedule>,
    pub(crate) record_layer: Option<Box<dyn RecordLayer>>,
    pub(crate) translator: Box<dyn AlertTranslator>,
    msg_callback: Option<MessageCallback>,
    info_callback: Option<InfoCallback>,
}

impl Connection {
    pub fn new(
        context: Arc<Context>,
        role: Role,
        version: ProtocolVersion,
        key_schedule: Box<dyn KeySchedule>,
    ) -> Self {
        Connection {
            context,
            state: ConnectionState::new(role, version),
            key_schedule,
            record_layer: None,
            translator: Box::new(StandardAlerts),
            msg_callback: None,
            info_callback: None,
        }
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ConnectionState {
        &mut self.state
    }

    /// Bind the record-layer writer. Without one, alerts are dropped.
    pub fn set_record_layer(&mut self, record_layer: Box<dyn RecordLayer>) {
        self.record_layer = Some(record_layer);
    }

    pub fn has_record_layer(&self) -> bool {
        self.record_layer.is_some()
    }

    /// The bound record layer, to finish writes the alert dispatcher did not
    /// start (see [`Queued::Deferred`]).
    pub fn record_layer_mut(&mut self) -> Option<&mut (dyn RecordLayer + 'static)> {
        self.record_layer.as_deref_mut()
    }

    /// Replace the default [`StandardAlerts`] translator.
    pub fn set_alert_translator(&mut self, translator: Box<dyn AlertTranslator>) {
        self.translator = translator;
    }

    pub fn set_message_callback<F>(&mut self, cb: F)
    where
        F: FnMut(&MessageTrace<'_>) + 'static,
    {
        self.msg_callback = Some(Box::new(cb));
    }

    /// Set the info callback. Overrides the context-wide one.
    pub fn set_info_callback<F>(&mut self, cb: F)
    where
        F: FnMut(&ConnectionState, InfoEvent, u16) + 'static,
    {
        self.info_callback = Some(Box::new(cb));
    }

    /// Handle the peer's change-cipher-spec by activating our read cipher.
    pub fn change_cipher_spec(&mut self) -> Result<(), Error> {
        let is_server = self.state.role.is_server();
        cipher::activate(&mut self.state, self.key_schedule.as_mut(), is_server)
    }

    /// Begin an orderly shutdown by queueing close_notify.
    pub fn close_notify(&mut self) -> Result<Queued, Error> {
        let queued = self.queue_alert(AlertLevel::Warning, AlertDescription::CloseNotify)?;
        self.state.shutdown.insert(Shutdown::SENT);
        Ok(queued)
    }

    /// Record that the peer's close_notify arrived.
    pub fn close_notify_received(&mut self) {
        debug!("Peer sent close_notify");
        self.state.shutdown.insert(Shutdown::RECEIVED);
    }

    /// Fire the trace and info callbacks for a written alert.
    pub(crate) fn notify_alert_written(&mut self, alert: Alert) {
        let bytes = alert.to_bytes();

        if let Some(cb) = self.msg_callback.as_mut() {
            cb(&MessageTrace {
                direction: TraceDirection::Outbound,
                version: self.state.version,
                content_type: ContentType::Alert,
                data: &bytes,
            });
        }

        let value = alert.info_value();
        if let Some(cb) = self.info_callback.as_mut() {
            cb(&self.state, InfoEvent::AlertWrite, value);
        } else if let Some(cb) = self.context.info_callback() {
            cb(&self.state, InfoEvent::AlertWrite, value);
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("state", &self.state)
            .field("record_layer", &self.record_layer.is_some())
            .finish()
    }
}
