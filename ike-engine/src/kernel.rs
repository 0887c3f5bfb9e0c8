//! The kernel IPsec collaborator interface, see §2 "Identity & Connection
//! Refinement" and §4.6 for when SA installation happens.

use std::net::IpAddr;

use isakmp::v1::EncryptionAlgorithm;
use isakmp::v1::HashAlgorithm;

/// Direction a negotiated IPsec SA protects traffic in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Protects traffic leaving this host
    Outbound,
    /// Protects traffic entering this host
    Inbound,
}

/// Parameters of one IPsec SA to install into the kernel's SPD/SAD.
#[derive(Debug, Clone)]
pub struct KernelSaParams {
    /// SPI this SA is addressed by
    pub spi: u32,
    /// Direction this SA protects
    pub direction: Direction,
    /// Local tunnel or transport endpoint
    pub local: IpAddr,
    /// Remote tunnel or transport endpoint
    pub remote: IpAddr,
    /// Negotiated encryption transform, `None` for AH-only proposals
    pub encryption: Option<EncryptionAlgorithm>,
    /// Negotiated authentication transform
    pub authentication: HashAlgorithm,
    /// Derived encryption key
    pub encryption_key: Vec<u8>,
    /// Derived authentication key
    pub authentication_key: Vec<u8>,
    /// Negotiated lifetime in seconds
    pub lifetime_seconds: u32,
}

/// Error surfaced by a [KernelInstaller] call.
#[derive(Debug, Clone, thiserror::Error)]
#[error("kernel collaborator error: {0}")]
pub struct KernelError(pub String);

/// Collaborator installing negotiated IPsec SAs into the local kernel (or a
/// userspace datapath acting as one).
pub trait KernelInstaller: Send + Sync {
    /// Install a freshly negotiated SA.
    fn install(&self, params: &KernelSaParams) -> Result<(), KernelError>;

    /// Remove a previously installed SA by SPI, in response to a Delete
    /// payload or local rekey.
    fn remove(&self, spi: u32, direction: Direction) -> Result<(), KernelError>;
}
