//! Observer callbacks fired when an alert reaches the record layer.

use std::sync::Arc;

use crate::connection::ConnectionState;
use crate::types::{ContentType, ProtocolVersion};

/// Direction of a traced protocol message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceDirection {
    Inbound,
    Outbound,
}

/// A protocol message handed to the message-trace callback.
#[derive(Debug, Clone, Copy)]
pub struct MessageTrace<'a> {
    pub direction: TraceDirection,
    /// The negotiated version, not the record-header version.
    pub version: ProtocolVersion,
    pub content_type: ContentType,
    pub data: &'a [u8],
}

/// Events reported to the info callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoEvent {
    /// An alert was written. The value is `(level << 8) | code`.
    AlertWrite,
}

/// Per-connection message-trace callback.
pub type MessageCallback = Box<dyn FnMut(&MessageTrace<'_>)>;

/// Per-connection info callback.
pub type InfoCallback = Box<dyn FnMut(&ConnectionState, InfoEvent, u16)>;

/// Info callback shared by every connection of a [`Context`](crate::Context).
pub type SharedInfoCallback = Arc<dyn Fn(&ConnectionState, InfoEvent, u16) + Send + Sync>;
