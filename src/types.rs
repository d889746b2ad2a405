//! Protocol enums shared by cipher activation and alert dispatch.

use std::cmp::Ordering;
use std::fmt;

use nom::number::complete::{be_u16, be_u8};
use nom::IResult;

// ============================================================================
// Protocol Version
// ============================================================================

/// TLS/SSL protocol versions, oldest first.
///
/// The ordering follows the wire value, so `Ssl3_0 < Tls1_3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    /// SSL 3.0, the oldest version this crate knows about.
    Ssl3_0,
    /// TLS 1.0
    Tls1_0,
    /// TLS 1.1
    Tls1_1,
    /// TLS 1.2
    Tls1_2,
    /// TLS 1.3
    Tls1_3,
    /// Unknown version.
    Unknown(u16),
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::Unknown(0)
    }
}

impl ProtocolVersion {
    /// Convert a 16-bit wire value into a `ProtocolVersion`.
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0300 => ProtocolVersion::Ssl3_0,
            0x0301 => ProtocolVersion::Tls1_0,
            0x0302 => ProtocolVersion::Tls1_1,
            0x0303 => ProtocolVersion::Tls1_2,
            0x0304 => ProtocolVersion::Tls1_3,
            _ => ProtocolVersion::Unknown(value),
        }
    }

    /// Convert this `ProtocolVersion` into its 16-bit wire value.
    pub fn as_u16(&self) -> u16 {
        match self {
            ProtocolVersion::Ssl3_0 => 0x0300,
            ProtocolVersion::Tls1_0 => 0x0301,
            ProtocolVersion::Tls1_1 => 0x0302,
            ProtocolVersion::Tls1_2 => 0x0303,
            ProtocolVersion::Tls1_3 => 0x0304,
            ProtocolVersion::Unknown(value) => *value,
        }
    }

    /// Whether TLS 1.3 rules (alert table, record version) apply.
    pub fn is_tls13(&self) -> bool {
        *self == ProtocolVersion::Tls1_3
    }

    /// The version written in the record header.
    ///
    /// TLS 1.3 records claim to be TLS 1.2 on the wire (RFC 8446 5.1).
    pub fn record_version(&self) -> ProtocolVersion {
        if self.is_tls13() {
            ProtocolVersion::Tls1_2
        } else {
            *self
        }
    }

    /// Parse a `ProtocolVersion` from network bytes.
    pub fn parse(input: &[u8]) -> IResult<&[u8], ProtocolVersion> {
        let (input, value) = be_u16(input)?;
        Ok((input, Self::from_u16(value)))
    }

    /// Serialize this `ProtocolVersion` to network bytes.
    pub fn serialize(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&self.as_u16().to_be_bytes());
    }
}

impl Ord for ProtocolVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_u16().cmp(&other.as_u16())
    }
}

impl PartialOrd for ProtocolVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::Ssl3_0 => write!(f, "SSL 3.0"),
            ProtocolVersion::Tls1_0 => write!(f, "TLS 1.0"),
            ProtocolVersion::Tls1_1 => write!(f, "TLS 1.1"),
            ProtocolVersion::Tls1_2 => write!(f, "TLS 1.2"),
            ProtocolVersion::Tls1_3 => write!(f, "TLS 1.3"),
            ProtocolVersion::Unknown(v) => write!(f, "Unknown(0x{:04x})", v),
        }
    }
}

// ============================================================================
// Content Type
// ============================================================================

/// TLS record content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// Change Cipher Spec.
    ChangeCipherSpec,
    /// Alert message.
    Alert,
    /// Handshake message.
    Handshake,
    /// Application data.
    ApplicationData,
    /// Unknown content type.
    Unknown(u8),
}

impl Default for ContentType {
    fn default() -> Self {
        Self::Unknown(0)
    }
}

impl ContentType {
    /// Convert a u8 value to a `ContentType`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            20 => ContentType::ChangeCipherSpec,
            21 => ContentType::Alert,
            22 => ContentType::Handshake,
            23 => ContentType::ApplicationData,
            _ => ContentType::Unknown(value),
        }
    }

    /// Convert this `ContentType` to its u8 value.
    pub fn as_u8(&self) -> u8 {
        match self {
            ContentType::ChangeCipherSpec => 20,
            ContentType::Alert => 21,
            ContentType::Handshake => 22,
            ContentType::ApplicationData => 23,
            ContentType::Unknown(value) => *value,
        }
    }

    /// Parse a `ContentType` from wire format.
    pub fn parse(input: &[u8]) -> IResult<&[u8], ContentType> {
        let (input, byte) = be_u8(input)?;
        Ok((input, Self::from_u8(byte)))
    }
}

// ============================================================================
// Cipher Suite
// ============================================================================

/// Negotiated cipher suite identifier.
///
/// Only the 16-bit code point is carried. The cipher itself lives behind the
/// key schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CipherSuite(pub u16);

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CipherSuite(0x{:04x})", self.0)
    }
}

// ============================================================================
// Role and handshake stage
// ============================================================================

/// Which side of the connection we are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Server,
}

impl Role {
    pub fn is_server(&self) -> bool {
        *self == Role::Server
    }
}

/// Coarse handshake progress, as far as alert dispatch cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandshakeStage {
    /// Nothing sent or received yet.
    #[default]
    Before,
    /// The client is writing its ClientHello.
    WritingClientHello,
    /// Past the first flight.
    InProgress,
    /// Handshake finished.
    Complete,
}
