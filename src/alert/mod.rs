//! Alert protocol: wire types, code translation and the dispatch state machine.
//!
//! An alert record carries exactly two bytes, the level followed by the
//! description code. Which code a given [`AlertDescription`] maps to depends on
//! the negotiated protocol version, see [`AlertTranslator`].

use std::fmt;

use nom::number::complete::be_u8;
use nom::IResult;

mod dispatch;
pub use dispatch::{Dispatch, Queued};

mod translate;
pub use translate::{AlertTranslator, StandardAlerts};

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Warning,
    Fatal,
    Unknown(u8),
}

impl AlertLevel {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => AlertLevel::Warning,
            2 => AlertLevel::Fatal,
            _ => AlertLevel::Unknown(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            AlertLevel::Warning => 1,
            AlertLevel::Fatal => 2,
            AlertLevel::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], AlertLevel> {
        let (input, byte) = be_u8(input)?;
        Ok((input, Self::from_u8(byte)))
    }
}

/// Alert description.
///
/// The registry of RFC 5246 and RFC 8446 plus the SSL 3.0 `no_certificate`.
/// Not every description has a code in every protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDescription {
    CloseNotify,
    UnexpectedMessage,
    BadRecordMac,
    DecryptionFailed,
    RecordOverflow,
    DecompressionFailure,
    HandshakeFailure,
    /// SSL 3.0 only.
    NoCertificate,
    BadCertificate,
    UnsupportedCertificate,
    CertificateRevoked,
    CertificateExpired,
    CertificateUnknown,
    IllegalParameter,
    UnknownCa,
    AccessDenied,
    DecodeError,
    DecryptError,
    ExportRestriction,
    ProtocolVersion,
    InsufficientSecurity,
    InternalError,
    InappropriateFallback,
    UserCanceled,
    NoRenegotiation,
    /// TLS 1.3 only.
    MissingExtension,
    UnsupportedExtension,
    CertificateUnobtainable,
    UnrecognizedName,
    BadCertificateStatusResponse,
    BadCertificateHashValue,
    UnknownPskIdentity,
    /// TLS 1.3 only.
    CertificateRequired,
    NoApplicationProtocol,
    Unknown(u8),
}

impl AlertDescription {
    pub fn from_u8(value: u8) -> Self {
        use AlertDescription::*;
        match value {
            0 => CloseNotify,
            10 => UnexpectedMessage,
            20 => BadRecordMac,
            21 => DecryptionFailed,
            22 => RecordOverflow,
            30 => DecompressionFailure,
            40 => HandshakeFailure,
            41 => NoCertificate,
            42 => BadCertificate,
            43 => UnsupportedCertificate,
            44 => CertificateRevoked,
            45 => CertificateExpired,
            46 => CertificateUnknown,
            47 => IllegalParameter,
            48 => UnknownCa,
            49 => AccessDenied,
            50 => DecodeError,
            51 => DecryptError,
            60 => ExportRestriction,
            70 => ProtocolVersion,
            71 => InsufficientSecurity,
            80 => InternalError,
            86 => InappropriateFallback,
            90 => UserCanceled,
            100 => NoRenegotiation,
            109 => MissingExtension,
            110 => UnsupportedExtension,
            111 => CertificateUnobtainable,
            112 => UnrecognizedName,
            113 => BadCertificateStatusResponse,
            114 => BadCertificateHashValue,
            115 => UnknownPskIdentity,
            116 => CertificateRequired,
            120 => NoApplicationProtocol,
            _ => Unknown(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        use AlertDescription::*;
        match self {
            CloseNotify => 0,
            UnexpectedMessage => 10,
            BadRecordMac => 20,
            DecryptionFailed => 21,
            RecordOverflow => 22,
            DecompressionFailure => 30,
            HandshakeFailure => 40,
            NoCertificate => 41,
            BadCertificate => 42,
            UnsupportedCertificate => 43,
            CertificateRevoked => 44,
            CertificateExpired => 45,
            CertificateUnknown => 46,
            IllegalParameter => 47,
            UnknownCa => 48,
            AccessDenied => 49,
            DecodeError => 50,
            DecryptError => 51,
            ExportRestriction => 60,
            ProtocolVersion => 70,
            InsufficientSecurity => 71,
            InternalError => 80,
            InappropriateFallback => 86,
            UserCanceled => 90,
            NoRenegotiation => 100,
            MissingExtension => 109,
            UnsupportedExtension => 110,
            CertificateUnobtainable => 111,
            UnrecognizedName => 112,
            BadCertificateStatusResponse => 113,
            BadCertificateHashValue => 114,
            UnknownPskIdentity => 115,
            CertificateRequired => 116,
            NoApplicationProtocol => 120,
            Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], AlertDescription> {
        let (input, byte) = be_u8(input)?;
        Ok((input, Self::from_u8(byte)))
    }
}

impl fmt::Display for AlertDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AlertDescription::*;
        let name = match self {
            CloseNotify => "close_notify",
            UnexpectedMessage => "unexpected_message",
            BadRecordMac => "bad_record_mac",
            DecryptionFailed => "decryption_failed",
            RecordOverflow => "record_overflow",
            DecompressionFailure => "decompression_failure",
            HandshakeFailure => "handshake_failure",
            NoCertificate => "no_certificate",
            BadCertificate => "bad_certificate",
            UnsupportedCertificate => "unsupported_certificate",
            CertificateRevoked => "certificate_revoked",
            CertificateExpired => "certificate_expired",
            CertificateUnknown => "certificate_unknown",
            IllegalParameter => "illegal_parameter",
            UnknownCa => "unknown_ca",
            AccessDenied => "access_denied",
            DecodeError => "decode_error",
            DecryptError => "decrypt_error",
            ExportRestriction => "export_restriction",
            ProtocolVersion => "protocol_version",
            InsufficientSecurity => "insufficient_security",
            InternalError => "internal_error",
            InappropriateFallback => "inappropriate_fallback",
            UserCanceled => "user_canceled",
            NoRenegotiation => "no_renegotiation",
            MissingExtension => "missing_extension",
            UnsupportedExtension => "unsupported_extension",
            CertificateUnobtainable => "certificate_unobtainable",
            UnrecognizedName => "unrecognized_name",
            BadCertificateStatusResponse => "bad_certificate_status_response",
            BadCertificateHashValue => "bad_certificate_hash_value",
            UnknownPskIdentity => "unknown_psk_identity",
            CertificateRequired => "certificate_required",
            NoApplicationProtocol => "no_application_protocol",
            Unknown(v) => return write!(f, "unknown({})", v),
        };
        f.write_str(name)
    }
}

/// A translated alert, ready for the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub description: AlertDescription,
}

impl Alert {
    /// Length of an alert record payload.
    pub const LEN: usize = 2;

    pub fn new(level: AlertLevel, description: AlertDescription) -> Self {
        Alert { level, description }
    }

    /// The two payload bytes: level, then description code.
    pub fn to_bytes(&self) -> [u8; Alert::LEN] {
        [self.level.as_u8(), self.description.as_u8()]
    }

    /// Value reported to the info callback, `(level << 8) | code`.
    pub fn info_value(&self) -> u16 {
        u16::from_be_bytes(self.to_bytes())
    }

    pub fn is_fatal(&self) -> bool {
        self.level == AlertLevel::Fatal
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], Alert> {
        let (input, level) = AlertLevel::parse(input)?;
        let (input, description) = AlertDescription::parse(input)?;
        Ok((input, Alert { level, description }))
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            AlertLevel::Warning => "warning",
            AlertLevel::Fatal => "fatal",
            AlertLevel::Unknown(_) => "unknown",
        };
        write!(f, "{} {}", level, self.description)
    }
}

/// Where the alert dispatcher is in its send cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertDispatchState {
    /// Nothing queued or in flight.
    #[default]
    None,
    /// Queued, no write attempted yet.
    Pending,
    /// A write was attempted and did not complete. The same two bytes must be
    /// pushed through the record layer's retry path.
    RetryPending,
}
