use super::AlertDescription;
use crate::types::ProtocolVersion;

/// Maps an alert description to the code used on the wire for a version.
///
/// Returning `None` means the alert does not exist in that context and must
/// not be sent.
pub trait AlertTranslator {
    fn alert_code(&self, description: AlertDescription, version: ProtocolVersion) -> Option<u8>;
}

/// The stock translation tables.
///
/// * TLS 1.3: `missing_extension` and `certificate_required` pass through,
///   everything else follows the legacy table.
/// * TLS 1.0 - 1.2: the TLS 1.3-only alerts fold to `handshake_failure`,
///   `no_certificate` has no code.
/// * SSL 3.0: the TLS-only alerts fold into the closest SSL 3.0 alert,
///   `no_renegotiation` has no code.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAlerts;

impl AlertTranslator for StandardAlerts {
    fn alert_code(&self, description: AlertDescription, version: ProtocolVersion) -> Option<u8> {
        match version {
            v if v.is_tls13() => tls13_code(description),
            ProtocolVersion::Ssl3_0 => ssl3_code(description),
            _ => tls_code(description),
        }
    }
}

fn tls13_code(description: AlertDescription) -> Option<u8> {
    match description {
        AlertDescription::MissingExtension | AlertDescription::CertificateRequired => {
            Some(description.as_u8())
        }
        _ => tls_code(description),
    }
}

fn tls_code(description: AlertDescription) -> Option<u8> {
    use AlertDescription::*;
    let mapped = match description {
        NoCertificate | Unknown(_) => return None,
        MissingExtension | CertificateRequired => HandshakeFailure,
        d => d,
    };
    Some(mapped.as_u8())
}

fn ssl3_code(description: AlertDescription) -> Option<u8> {
    use AlertDescription::*;
    let mapped = match description {
        CloseNotify | UnexpectedMessage | BadRecordMac | DecompressionFailure
        | HandshakeFailure | NoCertificate | BadCertificate | UnsupportedCertificate
        | CertificateRevoked | CertificateExpired | CertificateUnknown | IllegalParameter
        | InappropriateFallback | UnknownPskIdentity | NoApplicationProtocol => description,

        DecryptionFailed | RecordOverflow => BadRecordMac,
        UnknownCa => BadCertificate,

        AccessDenied
        | DecodeError
        | DecryptError
        | ExportRestriction
        | AlertDescription::ProtocolVersion
        | InsufficientSecurity
        | InternalError
        | UserCanceled
        | MissingExtension
        | UnsupportedExtension
        | CertificateUnobtainable
        | UnrecognizedName
        | BadCertificateStatusResponse
        | BadCertificateHashValue
        | CertificateRequired => HandshakeFailure,

        NoRenegotiation | Unknown(_) => return None,
    };
    Some(mapped.as_u8())
}
