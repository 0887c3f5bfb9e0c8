//! Minimal collaborator stand-ins for the `bin` target.
//!
//! The engine is deliberately agnostic to which crypto library, kernel
//! datapath or policy store a deployment uses; wiring in a production-grade
//! IKE crypto backend (Diffie-Hellman groups, AES/3DES, HMAC-based PRFs) and
//! a real kernel SA installer is out of scope for this crate, matching how
//! `ikebuster` itself only ever scans and never establishes a tunnel. These
//! stand-ins exist so the `bin` target links and runs against a config file,
//! not to negotiate a real tunnel.

use rand::RngCore;

use crate::crypto::CryptoError;
use crate::crypto::CryptoProvider;
use crate::crypto::DhHandle;
use crate::crypto::DhKeyPair;
use crate::crypto::SkeyidSet;
use crate::kernel::Direction;
use crate::kernel::KernelError;
use crate::kernel::KernelInstaller;
use crate::kernel::KernelSaParams;
use crate::policy::Connection;
use crate::policy::PolicyError;
use crate::policy::PolicyProvider;
use isakmp::v1::EncryptionAlgorithm;
use isakmp::v1::HashAlgorithm;
use std::net::IpAddr;

/// A [CryptoProvider] that can mint randomness but refuses every
/// cryptographic operation; useful to boot the engine against real traffic
/// shape without claiming to protect anything.
#[derive(Debug, Default)]
pub struct UnimplementedCrypto;

impl CryptoProvider for UnimplementedCrypto {
    fn generate_dh(&self, _group: u16) -> Result<DhKeyPair, CryptoError> {
        Err(CryptoError("no Diffie-Hellman backend configured".into()))
    }

    fn dh_shared_secret(&self, _handle: &DhHandle, _peer_public: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError("no Diffie-Hellman backend configured".into()))
    }

    fn derive_skeyid_psk(
        &self,
        _hash: HashAlgorithm,
        _psk: &[u8],
        _ni: &[u8],
        _nr: &[u8],
        _g_xy: &[u8],
        _icookie: u64,
        _rcookie: u64,
    ) -> Result<SkeyidSet, CryptoError> {
        Err(CryptoError("no PRF backend configured".into()))
    }

    fn derive_skeyid_sig(&self, _hash: HashAlgorithm, _ni: &[u8], _nr: &[u8], _g_xy: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError("no PRF backend configured".into()))
    }

    fn prf(&self, _hash: HashAlgorithm, _key: &[u8], _data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError("no PRF backend configured".into()))
    }

    fn verify_signature(&self, _public_key: &[u8], _data: &[u8], _signature: &[u8]) -> Result<bool, CryptoError> {
        Err(CryptoError("no signature backend configured".into()))
    }

    fn sign(&self, _data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError("no signature backend configured".into()))
    }

    fn decrypt(&self, _algorithm: EncryptionAlgorithm, _key: &[u8], _iv: &[u8], _ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError("no cipher backend configured".into()))
    }

    fn encrypt(&self, _algorithm: EncryptionAlgorithm, _key: &[u8], _iv: &[u8], _plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError("no cipher backend configured".into()))
    }

    fn random(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        rand::thread_rng().fill_bytes(buf);
        Ok(())
    }
}

/// A [KernelInstaller] that logs what it would have installed instead of
/// touching the kernel SPD/SAD.
#[derive(Debug, Default)]
pub struct LoggingKernel;

impl KernelInstaller for LoggingKernel {
    fn install(&self, params: &KernelSaParams) -> Result<(), KernelError> {
        tracing::info!(spi = params.spi, direction = ?params.direction, "would install kernel SA");
        Ok(())
    }

    fn remove(&self, spi: u32, direction: Direction) -> Result<(), KernelError> {
        tracing::info!(spi, ?direction, "would remove kernel SA");
        Ok(())
    }
}

/// A [PolicyProvider] backed by a fixed list of connections, matched only by
/// address; identity-based refinement always reports no better match.
#[derive(Debug, Clone, Default)]
pub struct StaticPolicy {
    /// Configured connections, in preference order
    pub connections: Vec<Connection>,
}

impl PolicyProvider for StaticPolicy {
    fn match_by_address(&self, remote: IpAddr) -> Result<Connection, PolicyError> {
        self.connections
            .iter()
            .find(|c| c.remote == Some(remote))
            .or_else(|| self.connections.iter().find(|c| c.remote.is_none()))
            .cloned()
            .ok_or(PolicyError::NoMatch)
    }

    fn refine_by_identity(&self, remote: IpAddr, _identity: &[u8]) -> Result<Connection, PolicyError> {
        self.match_by_address(remote)
    }
}
