//! Connection policy: the administrator-configured counterpart to a peer,
//! see §3 Data Model, "Connection".

use std::net::IpAddr;
use std::time::Duration;

use isakmp::v1::AuthenticationMethod;
use isakmp::v1::EncryptionAlgorithm;
use isakmp::v1::HashAlgorithm;

/// A configured tunnel endpoint description: the policy an [crate::sa::IkeSa]
/// is matched against once its peer identity is known.
#[derive(Debug, Clone)]
pub struct Connection {
    /// Administrator-assigned name, used in logs and the admin interface
    pub name: String,
    /// Expected remote address, `None` for road-warrior (any source) connections
    pub remote: Option<IpAddr>,
    /// Pre-shared key, if this connection authenticates by PSK
    pub psk: Option<Vec<u8>>,
    /// Acceptable authentication methods, in preference order
    pub auth_methods: Vec<AuthenticationMethod>,
    /// Acceptable Phase-1 encryption transforms, in preference order
    pub phase1_encryption: Vec<EncryptionAlgorithm>,
    /// Acceptable Phase-1 hash transforms, in preference order
    pub phase1_hash: Vec<HashAlgorithm>,
    /// Phase-1 SA lifetime before a rekey is initiated
    pub phase1_lifetime: Duration,
    /// Phase-2 SA lifetime before a rekey is initiated
    pub phase2_lifetime: Duration,
    /// Whether Aggressive Mode is permitted for this connection
    pub allow_aggressive: bool,
    /// Whether the Cisco Unity / `SOFTREMOTE_CLIENT_WORKAROUND` vendor quirk
    /// should be honored for peers matching this connection, see DESIGN.md
    pub softremote_workaround: bool,
    /// `DONT_REKEY`: never initiate a replacement negotiation for SAs on this
    /// connection: let them run to expiry instead, per §4.6.
    pub dont_rekey: bool,
}

/// Error surfaced while resolving a connection for an [crate::sa::IkeSa].
#[derive(Debug, Clone, thiserror::Error)]
pub enum PolicyError {
    /// No configured connection matched the peer's address and identity.
    #[error("no connection configured for this peer")]
    NoMatch,
}

/// Collaborator resolving which [Connection] governs a given peer.
pub trait PolicyProvider: Send + Sync {
    /// Find the best matching connection for a peer address, before identity
    /// is known (used to pick an initial proposal set and auth methods).
    fn match_by_address(&self, remote: IpAddr) -> Result<Connection, PolicyError>;

    /// Re-resolve the connection once the peer's Identification payload has
    /// been decoded, possibly narrowing a road-warrior match to a specific
    /// configured peer. See §4.9, recursion bounded to depth one.
    fn refine_by_identity(&self, remote: IpAddr, identity: &[u8]) -> Result<Connection, PolicyError>;
}

#[cfg(test)]
pub(crate) fn test_connection(name: &str) -> Connection {
    Connection {
        name: name.to_string(),
        remote: None,
        psk: Some(b"test-psk".to_vec()),
        auth_methods: vec![AuthenticationMethod::PreSharedKey],
        phase1_encryption: vec![EncryptionAlgorithm::AES_CBC],
        phase1_hash: vec![HashAlgorithm::SHA],
        phase1_lifetime: Duration::from_secs(28800),
        phase2_lifetime: Duration::from_secs(3600),
        allow_aggressive: false,
        softremote_workaround: false,
        dont_rekey: false,
    }
}
