//! The cryptographic collaborator interface.
//!
//! The engine never touches key material directly: Diffie-Hellman, PRF/HMAC
//! derivation and bulk encryption are all delegated here so that the state
//! machine stays pure and testable against fakes, matching how `ikebuster`
//! keeps `recv.rs`'s socket handling separate from its transform negotiation.

use std::fmt;

use isakmp::v1::EncryptionAlgorithm;
use isakmp::v1::HashAlgorithm;
use tokio::sync::mpsc::UnboundedSender;

use crate::demux::SaKey;

/// A Diffie-Hellman key pair's public half plus a handle to the private half.
pub struct DhKeyPair {
    /// The public value to send on the wire
    pub public_value: Vec<u8>,
    /// Opaque handle the collaborator uses to recover the private half later
    pub handle: DhHandle,
}

/// Opaque handle to a Diffie-Hellman private value held by the collaborator.
#[derive(Debug, Clone)]
pub struct DhHandle(pub u64);

/// Derived Oakley key material for one Phase-1 SA, per RFC 2409 §5.
#[derive(Clone)]
pub struct SkeyidSet {
    /// Authenticates subsequent ISAKMP messages (HASH payloads)
    pub skeyid_a: Vec<u8>,
    /// Derives keys for non-ISAKMP security associations
    pub skeyid_d: Vec<u8>,
    /// Encrypts subsequent ISAKMP messages
    pub skeyid_e: Vec<u8>,
}

impl fmt::Debug for SkeyidSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkeyidSet").finish_non_exhaustive()
    }
}

/// Error surfaced by a [CryptoProvider] call.
#[derive(Debug, Clone, thiserror::Error)]
#[error("crypto collaborator error: {0}")]
pub struct CryptoError(pub String);

/// Collaborator performing the cryptographic primitives IKEv1 needs.
///
/// Implementations are expected to be cheap to clone (an `Arc` around a
/// handle to a hardware or software backend) since the engine is single
/// threaded but may hold several SAs concurrently suspended on crypto calls.
pub trait CryptoProvider: Send + Sync {
    /// Generate a fresh Diffie-Hellman key pair for the given group.
    fn generate_dh(&self, group: u16) -> Result<DhKeyPair, CryptoError>;

    /// Compute the shared secret `g^xy` from our private half and the peer's
    /// public value.
    fn dh_shared_secret(&self, handle: &DhHandle, peer_public: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Derive SKEYID (and then SKEYID_a/d/e) for a PSK-authenticated exchange.
    fn derive_skeyid_psk(
        &self,
        hash: HashAlgorithm,
        psk: &[u8],
        ni: &[u8],
        nr: &[u8],
        g_xy: &[u8],
        icookie: u64,
        rcookie: u64,
    ) -> Result<SkeyidSet, CryptoError>;

    /// Derive SKEYID for a signature-authenticated exchange (`prf(Ni_b | Nr_b, g^xy)`).
    fn derive_skeyid_sig(
        &self,
        hash: HashAlgorithm,
        ni: &[u8],
        nr: &[u8],
        g_xy: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    /// Compute a keyed HASH payload contents (HASH_I / HASH_R / Informational /
    /// Quick Mode HASH(1..3)) from pre-assembled input bytes.
    fn prf(&self, hash: HashAlgorithm, key: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Verify a digital signature over `data` using the peer's certified public key.
    fn verify_signature(&self, public_key: &[u8], data: &[u8], signature: &[u8]) -> Result<bool, CryptoError>;

    /// Sign `data` with our own private key for `SIG_I`/`SIG_R`.
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt an encrypted message body in place given the negotiated cipher,
    /// key and IV, returning the plaintext.
    fn decrypt(&self, algorithm: EncryptionAlgorithm, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Encrypt a plaintext message body, returning ciphertext and the IV to
    /// carry forward for the next message.
    fn encrypt(&self, algorithm: EncryptionAlgorithm, key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Fill `buf` with cryptographically random bytes, used for nonces and cookies.
    fn random(&self, buf: &mut [u8]) -> Result<(), CryptoError>;

    /// Register the channel a helper should post an [SaKey] to once an
    /// asynchronous operation for that SA completes, per §4.8/§5. The engine
    /// calls this once at startup; a collaborator that never suspends (every
    /// call above returns synchronously) can leave the default no-op in place.
    fn set_completion_channel(&self, _tx: UnboundedSender<SaKey>) {}
}
