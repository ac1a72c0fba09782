//! Error types
//!
//! Defines domain-specific error types for each module of the reflector.

use std::fmt;
use std::io;

/// Client registry errors
///
/// Lookups that miss and removals of unknown clients are not errors; they are
/// reported through `Option` return values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Address or port rejected before the registry state is touched.
    InvalidIdentity(String),
    /// The index and the client sequence disagree. Unrecoverable.
    InternalInconsistency(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::InvalidIdentity(msg) => write!(f, "Invalid client identity: {}", msg),
            RegistryError::InternalInconsistency(msg) => {
                write!(f, "Client registry is inconsistent: {}", msg)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Wire protocol errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    TooShort(usize),
    InvalidLength {
        tag: &'static str,
        expected: usize,
        actual: usize,
    },
    UnknownTag([u8; 4]),
    MalformedCallsign(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::TooShort(len) => write!(f, "Packet too short: {} bytes", len),
            ProtocolError::InvalidLength {
                tag,
                expected,
                actual,
            } => write!(
                f,
                "Invalid {} packet length: expected {}, got {}",
                tag, expected, actual
            ),
            ProtocolError::UnknownTag(tag) => {
                write!(f, "Unknown packet tag: {:?}", String::from_utf8_lossy(tag))
            }
            ProtocolError::MalformedCallsign(raw) => write!(f, "Malformed callsign: {:?}", raw),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// General reflector error that encompasses all error types
#[derive(Debug)]
pub enum ReflectorError {
    Registry(RegistryError),
    Protocol(ProtocolError),
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for ReflectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReflectorError::Registry(e) => write!(f, "Registry error: {}", e),
            ReflectorError::Protocol(e) => write!(f, "Protocol error: {}", e),
            ReflectorError::Config(e) => write!(f, "Configuration error: {}", e),
            ReflectorError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ReflectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReflectorError::Registry(e) => Some(e),
            ReflectorError::Protocol(e) => Some(e),
            ReflectorError::Config(e) => Some(e),
            ReflectorError::IoError(e) => Some(e),
        }
    }
}

impl From<RegistryError> for ReflectorError {
    fn from(error: RegistryError) -> Self {
        ReflectorError::Registry(error)
    }
}

impl From<ProtocolError> for ReflectorError {
    fn from(error: ProtocolError) -> Self {
        ReflectorError::Protocol(error)
    }
}

impl From<config::ConfigError> for ReflectorError {
    fn from(error: config::ConfigError) -> Self {
        ReflectorError::Config(error)
    }
}

impl From<io::Error> for ReflectorError {
    fn from(error: io::Error) -> Self {
        ReflectorError::IoError(error)
    }
}
