//! Queueing and sending alerts over a record layer that may block.
//!
//! ```text
//!            queue_alert               write complete
//!   None ─────────────────▶ Pending ─────────────────────▶ None
//!                              │
//!                              │ write incomplete
//!                              ▼            retry complete
//!                        RetryPending ─────────────────────▶ None
//!                          ▲      │
//!                          └──────┘ retry incomplete
//! ```

use std::io;

use super::{Alert, AlertDescription, AlertDispatchState, AlertLevel};
use crate::connection::{Connection, Shutdown};
use crate::record::{PendingWrite, RecordTemplate};
use crate::types::{ContentType, ProtocolVersion};
use crate::Error;

/// Result of [`Connection::queue_alert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Queued {
    /// Written to the record layer right away.
    Sent,
    /// The write started but blocked. Drive it with
    /// [`Connection::dispatch_alert`].
    WouldBlock,
    /// Other data is still being written. Finish that write through
    /// [`Connection::record_layer_mut`], then call
    /// [`Connection::dispatch_alert`]. Dispatching before the record layer is
    /// idle fails with [`Error::UnexpectedPendingWrite`].
    Deferred,
}

/// Result of [`Connection::dispatch_alert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The alert left (or there was nothing to send).
    Sent,
    /// The transport is not ready. Call again once it is writable.
    WouldBlock,
}

impl From<Dispatch> for Queued {
    fn from(value: Dispatch) -> Self {
        match value {
            Dispatch::Sent => Queued::Sent,
            Dispatch::WouldBlock => Queued::WouldBlock,
        }
    }
}

impl Connection {
    /// Queue an alert and try to send it.
    ///
    /// The description is translated for the connection's version. Fatal
    /// alerts evict the session from the cache, whether or not the alert ever
    /// reaches the peer.
    ///
    /// Only one alert can be outstanding. Queueing while another is pending
    /// or being retried fails with [`Error::AlertBusy`]. A fatal alert still
    /// evicts the session in that case.
    pub fn queue_alert(
        &mut self,
        level: AlertLevel,
        description: AlertDescription,
    ) -> Result<Queued, Error> {
        let version = self.state.version;

        let code = self
            .translator
            .alert_code(description, version)
            .map(|code| {
                // SSL 3.0 has no protocol_version alert.
                if version == ProtocolVersion::Ssl3_0
                    && code == AlertDescription::ProtocolVersion.as_u8()
                {
                    AlertDescription::HandshakeFailure.as_u8()
                } else {
                    code
                }
            });

        let Some(code) = code else {
            debug!("No {} alert for {}", description, version);
            return Err(Error::AlertUnsupported(description));
        };
        let alert = Alert::new(level, AlertDescription::from_u8(code));

        if self.state.shutdown.contains(Shutdown::SENT) {
            let is_close_notify = alert.description == AlertDescription::CloseNotify;
            if !is_close_notify || !self.context.config().repeat_close_notify() {
                debug!("Refuse alert {} after close_notify", alert);
                return Err(Error::AlertAfterCloseNotify(description));
            }
        }

        if alert.is_fatal() {
            if let Some(session) = &self.state.session {
                self.context.remove_session(session);
            }
        }

        if self.state.alert_state != AlertDispatchState::None {
            debug!(
                "Refuse alert {}, {:?} still outstanding",
                alert, self.state.queued_alert
            );
            return Err(Error::AlertBusy);
        }

        debug!("Queue alert {}", alert);
        self.state.queued_alert = Some(alert);
        self.state.alert_state = AlertDispatchState::Pending;

        let write_pending = self
            .record_layer
            .as_ref()
            .is_some_and(|rl| rl.has_pending_write());

        if write_pending {
            trace!("Record layer busy, alert deferred");
            return Ok(Queued::Deferred);
        }

        self.dispatch_alert().map(Queued::from)
    }

    /// Drive the queued alert towards the transport.
    ///
    /// Call repeatedly until it returns [`Dispatch::Sent`] or an error. While
    /// it returns [`Dispatch::WouldBlock`] the exact same bytes stay queued.
    ///
    /// A transport error other than would-block is not told apart from
    /// blocking: the write is kept for retry either way.
    pub fn dispatch_alert(&mut self) -> Result<Dispatch, Error> {
        let version = self.state.alert_record_version();

        let Some(record_layer) = self.record_layer.as_deref_mut() else {
            debug!("No record layer, drop alert {:?}", self.state.queued_alert);
            self.state.reset_alert();
            return Ok(Dispatch::Sent);
        };

        let Some(alert) = self.state.queued_alert else {
            trace!("No alert to dispatch");
            return Ok(Dispatch::Sent);
        };

        if record_layer.has_pending_write() {
            if self.state.alert_state != AlertDispatchState::RetryPending {
                warn!(
                    "Pending write not started by alert dispatch, drop alert {}",
                    alert
                );
                self.state.reset_alert();
                return Err(Error::UnexpectedPendingWrite);
            }

            if let Err(e) = record_layer.retry_pending_write() {
                log_incomplete(alert, &e);
                return Ok(Dispatch::WouldBlock);
            }

            debug!("Alert {} sent on retry", alert);
            self.state.reset_alert();
            return Ok(Dispatch::Sent);
        }

        let payload = alert.to_bytes();
        let record = RecordTemplate {
            content_type: ContentType::Alert,
            version,
            payload: &payload,
        };

        if let Err(e) = record_layer.write_records(&[record]) {
            log_incomplete(alert, &e);
            self.state.alert_state = AlertDispatchState::RetryPending;
            self.state.pending_write = Some(PendingWrite {
                content_type: ContentType::Alert,
                payload,
            });
            return Ok(Dispatch::WouldBlock);
        }

        if self.context.config().flush_after_alert() {
            // Non-blocking transports may defer the flush.
            if let Err(e) = record_layer.flush() {
                warn!("Flush after alert {} failed: {}", alert, e);
            }
        }

        debug!("Alert {} sent ({})", alert, version);
        self.state.reset_alert();
        self.notify_alert_written(alert);

        Ok(Dispatch::Sent)
    }
}

fn log_incomplete(alert: Alert, e: &io::Error) {
    if e.kind() == io::ErrorKind::WouldBlock {
        debug!("Alert {} write would block", alert);
    } else {
        warn!("Alert {} write incomplete: {}", alert, e);
    }
}
