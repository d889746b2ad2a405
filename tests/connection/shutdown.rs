//! Orderly shutdown with close_notify.

use recstate::*;

use crate::common::*;

#[test]
fn close_notify_marks_sent() {
    let _ = env_logger::try_init();

    let mut h = harness(Role::Client, ProtocolVersion::Tls1_2);

    assert_eq!(h.conn.close_notify(), Ok(Queued::Sent));
    assert!(h.conn.state().shutdown.contains(Shutdown::SENT));
    assert_eq!(h.wire.borrow().writes[0].payload, vec![1, 0]);
}

#[test]
fn other_alerts_refused_after_close_notify() {
    let _ = env_logger::try_init();

    let mut h = harness(Role::Client, ProtocolVersion::Tls1_2);
    h.conn.state_mut().session = Some(session());
    h.conn.close_notify().unwrap();

    let err = h
        .conn
        .queue_alert(AlertLevel::Fatal, AlertDescription::InternalError)
        .unwrap_err();
    assert_eq!(
        err,
        Error::AlertAfterCloseNotify(AlertDescription::InternalError)
    );
    assert!(!err.is_fatal());

    // Nothing was written and the session survives.
    assert_eq!(h.wire.borrow().writes.len(), 1);
    assert_eq!(h.cache.removals(), 0);
    assert_eq!(h.conn.state().alert_state(), AlertDispatchState::None);
}

#[test]
fn repeat_close_notify_allowed_by_default() {
    let _ = env_logger::try_init();

    let mut h = harness(Role::Server, ProtocolVersion::Tls1_2);
    h.conn.close_notify().unwrap();

    assert_eq!(h.conn.close_notify(), Ok(Queued::Sent));
    assert_eq!(h.wire.borrow().writes.len(), 2);
}

#[test]
fn repeat_close_notify_refused_when_disabled() {
    let _ = env_logger::try_init();

    let config = Config::builder().repeat_close_notify(false).build();
    let mut h = harness_with(config, Role::Server, ProtocolVersion::Tls1_2);
    h.conn.close_notify().unwrap();

    assert_eq!(
        h.conn.close_notify(),
        Err(Error::AlertAfterCloseNotify(AlertDescription::CloseNotify))
    );
}

#[test]
fn close_notify_busy_does_not_mark_sent() {
    let _ = env_logger::try_init();

    let mut h = harness(Role::Client, ProtocolVersion::Tls1_2);
    h.wire.borrow_mut().blocked = true;

    h.conn
        .queue_alert(AlertLevel::Fatal, AlertDescription::InternalError)
        .unwrap();

    assert_eq!(h.conn.close_notify(), Err(Error::AlertBusy));
    assert!(!h.conn.state().shutdown.contains(Shutdown::SENT));
}

#[test]
fn peer_close_notify_recorded() {
    let _ = env_logger::try_init();

    let mut h = harness(Role::Server, ProtocolVersion::Tls1_3);
    h.conn.close_notify_received();

    let shutdown = h.conn.state().shutdown;
    assert!(shutdown.contains(Shutdown::RECEIVED));
    assert!(!shutdown.contains(Shutdown::SENT));

    // Receiving close_notify does not stop us from sending alerts.
    assert_eq!(
        h.conn
            .queue_alert(AlertLevel::Warning, AlertDescription::CloseNotify),
        Ok(Queued::Sent)
    );
}
