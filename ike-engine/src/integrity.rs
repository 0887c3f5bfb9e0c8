//! Integrity Gate, see §4.4: decrypts encrypted message bodies and verifies
//! HASH(1/2/3)/Informational-HASH protection before the payload decoder runs.

use isakmp::v1::HashAlgorithm;
use subtle::ConstantTimeEq;

use crate::crypto::CryptoProvider;
use crate::digest::HashRequirement;
use crate::sa::IkeSa;

/// Why an encrypted message was rejected by the integrity gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityError {
    /// No SKEYID has been derived yet; the message cannot be decrypted.
    NoKeyingMaterial,
    /// The ciphertext length was not a multiple of the cipher's block size.
    BadBlockAlignment,
    /// A hash-protected transition's computed HASH did not match the received one.
    HashMismatch,
    /// The underlying crypto collaborator call failed.
    CryptoFailure,
}

/// Decrypt `body` in place using the SA's current IV, selecting `new_iv`
/// (already seeded for Phase-2) over `iv`, and advance the IV chain.
pub fn decrypt_body(
    sa: &mut IkeSa,
    crypto: &dyn CryptoProvider,
    body: &[u8],
) -> Result<Vec<u8>, IntegrityError> {
    let Some(oakley) = &sa.oakley else {
        return Err(IntegrityError::NoKeyingMaterial);
    };
    let Some(skeyid) = &sa.skeyid else {
        return Err(IntegrityError::NoKeyingMaterial);
    };

    let block_size = oakley.cipher.block_size();
    if body.len() % block_size != 0 {
        return Err(IntegrityError::BadBlockAlignment);
    }

    let iv = if !sa.iv.new_iv.is_empty() { &sa.iv.new_iv } else { &sa.iv.iv };
    let plaintext = crypto
        .decrypt(oakley.cipher, &skeyid.skeyid_e, iv, body)
        .map_err(|_| IntegrityError::CryptoFailure)?;

    let mut next_iv = body[body.len() - block_size..].to_vec();
    next_iv.truncate(block_size);
    sa.iv.new_iv = next_iv;

    Ok(plaintext)
}

/// Seed the Phase-2 IV from the Phase-1 IV and the message-id, per §4.1/§4.4:
/// `new_iv = hash(phase1_iv | msgid)`, truncated to one cipher block.
pub fn seed_phase2_iv(sa: &mut IkeSa, crypto: &dyn CryptoProvider, hash: HashAlgorithm, msgid: u32) {
    let mut input = sa.iv.phase1_iv.clone();
    input.extend_from_slice(&msgid.to_be_bytes());
    if let Ok(digest) = crypto.prf(hash, &[], &input) {
        let block_size = sa.oakley.as_ref().map_or(digest.len(), |o| o.cipher.block_size());
        sa.iv.new_iv = digest.into_iter().take(block_size).collect();
    }
}

/// Compute the expected HASH for a protected transition and compare it,
/// constant-time, against the one actually received.
pub fn verify_hash(
    sa: &IkeSa,
    crypto: &dyn CryptoProvider,
    requirement: HashRequirement,
    msgid: u32,
    ni_b: &[u8],
    nr_b: &[u8],
    rest: &[u8],
    received: &[u8],
) -> Result<(), IntegrityError> {
    if requirement == HashRequirement::None {
        return Ok(());
    }
    let (Some(oakley), Some(skeyid)) = (&sa.oakley, &sa.skeyid) else {
        return Err(IntegrityError::NoKeyingMaterial);
    };

    let mut input = Vec::new();
    match requirement {
        HashRequirement::None => unreachable!(),
        HashRequirement::InformationalHash => {
            input.extend_from_slice(&msgid.to_be_bytes());
            input.extend_from_slice(rest);
        }
        HashRequirement::Quick1 => {
            input.extend_from_slice(&msgid.to_be_bytes());
            input.extend_from_slice(rest);
        }
        HashRequirement::Quick2 => {
            input.extend_from_slice(&msgid.to_be_bytes());
            input.extend_from_slice(ni_b);
            input.extend_from_slice(rest);
        }
        HashRequirement::Quick3 => {
            input.push(0);
            input.extend_from_slice(&msgid.to_be_bytes());
            input.extend_from_slice(ni_b);
            input.extend_from_slice(nr_b);
        }
    }

    let expected = crypto
        .prf(oakley.integrity, &skeyid.skeyid_a, &input)
        .map_err(|_| IntegrityError::CryptoFailure)?;

    if bool::from(expected.ct_eq(received)) {
        Ok(())
    } else {
        Err(IntegrityError::HashMismatch)
    }
}
