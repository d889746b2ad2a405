#![no_main]

//! Fuzz target for the alert dispatch state machine.
//!
//! Each input byte is one operation against a connection whose transport
//! blocks and unblocks on command. After every step the dispatch state must
//! be consistent with what is queued.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;

use libfuzzer_sys::fuzz_target;

use recstate::*;

struct NoKeys;

impl KeySchedule for NoKeys {
    fn derive_key_block(&mut self, _: &ConnectionState) -> Result<KeyBlock, Error> {
        Ok(KeyBlock::new(vec![0; 16]))
    }

    fn install_cipher_state(&mut self, _: &ConnectionState, _: CipherDirection) -> Result<(), Error> {
        Ok(())
    }
}

#[derive(Default)]
struct Wire {
    blocked: bool,
    pending: bool,
    records: usize,
}

struct Scripted(Rc<RefCell<Wire>>);

impl RecordLayer for Scripted {
    fn has_pending_write(&self) -> bool {
        self.0.borrow().pending
    }

    fn write_records(&mut self, records: &[RecordTemplate<'_>]) -> io::Result<()> {
        let mut wire = self.0.borrow_mut();
        wire.records += records.len();
        if wire.blocked {
            wire.pending = true;
            return Err(io::ErrorKind::WouldBlock.into());
        }
        Ok(())
    }

    fn retry_pending_write(&mut self) -> io::Result<()> {
        let mut wire = self.0.borrow_mut();
        if wire.blocked {
            return Err(io::ErrorKind::WouldBlock.into());
        }
        wire.pending = false;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

const VERSIONS: [ProtocolVersion; 5] = [
    ProtocolVersion::Ssl3_0,
    ProtocolVersion::Tls1_0,
    ProtocolVersion::Tls1_1,
    ProtocolVersion::Tls1_2,
    ProtocolVersion::Tls1_3,
];

fuzz_target!(|data: &[u8]| {
    let Some((&first, ops)) = data.split_first() else {
        return;
    };

    let version = VERSIONS[first as usize % VERSIONS.len()];
    let wire = Rc::new(RefCell::new(Wire::default()));

    let mut conn = Connection::new(
        Arc::new(Context::default()),
        Role::Client,
        version,
        Box::new(NoKeys),
    );
    conn.set_record_layer(Box::new(Scripted(wire.clone())));

    for op in ops.chunks(2) {
        let arg = op.get(1).copied().unwrap_or(0);

        let result = match op[0] % 5 {
            0 => conn
                .queue_alert(AlertLevel::from_u8(1 + arg % 2), AlertDescription::from_u8(arg))
                .map(|_| ()),
            1 => conn.dispatch_alert().map(|_| ()),
            2 => {
                wire.borrow_mut().blocked = arg % 2 == 0;
                Ok(())
            }
            3 => conn.close_notify().map(|_| ()),
            _ => {
                conn.close_notify_received();
                Ok(())
            }
        };

        let state = conn.state();
        match state.alert_state() {
            AlertDispatchState::None => {
                assert!(state.queued_alert().is_none());
                assert!(state.pending_write().is_none());
            }
            AlertDispatchState::Pending => {
                assert!(state.queued_alert().is_some());
                assert!(state.pending_write().is_none());
            }
            AlertDispatchState::RetryPending => {
                let alert = state.queued_alert().expect("retry without alert");
                let pending = state.pending_write().expect("retry without payload");
                assert_eq!(pending.payload, alert.to_bytes());
            }
        }

        if let Err(e) = result {
            if e.is_fatal() {
                return;
            }
        }
    }
});
