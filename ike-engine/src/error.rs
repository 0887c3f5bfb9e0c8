//! Engine-wide error type.

use std::net::SocketAddr;

use isakmp::v1::parser::errors::IsakmpParseError;

use crate::state::TableError;

/// Top level error produced by the engine outside of per-message handling.
///
/// Per-message failures do not appear here: they are folded into
/// [crate::result::HandlerResult::Fail] and [crate::result::HandlerResult::Fatal]
/// by the decoder and dispatcher instead, since a malformed or hostile packet
/// is an expected input, not a fault of the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The microcode table failed self-validation at startup.
    #[error("state table is invalid: {0}")]
    InvalidTable(#[from] TableError),

    /// The UDP socket could not be bound or read from.
    #[error("socket I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// A crypto collaborator call failed outside the context of a single message.
    #[error("crypto collaborator error: {0}")]
    Crypto(String),

    /// A kernel SA installation call failed outside the context of a single message.
    #[error("kernel collaborator error: {0}")]
    Kernel(String),
}

/// Error describing why an inbound datagram never reached the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    /// The datagram was too short to contain even an ISAKMP header.
    #[error("datagram from {0} shorter than an ISAKMP header")]
    Truncated(SocketAddr),

    /// The datagram's declared length did not match the bytes actually received.
    #[error("datagram from {0} declares length {declared} but received {actual}")]
    LengthMismatch {
        /// Peer the datagram was received from
        peer: SocketAddr,
        /// Length declared in the ISAKMP header
        declared: u32,
        /// Actual byte count received
        actual: usize,
    },

    /// No existing SA or demux rule matched the header's cookies and exchange type.
    #[error("no SA or demux rule matches this message from {0}")]
    NoMatchingSa(SocketAddr),

    /// Structural parsing of the payload chain failed.
    #[error("payload parse error: {0}")]
    Parse(#[from] IsakmpParseError),
}
