//! Main Mode (6-message, identity-protected Phase-1) handlers, see §8
//! scenario 1 for the canonical PSK trace this module implements.

use isakmp::v1::generator::payloads;
use isakmp::v1::AuthClass;
use isakmp::v1::DomainOfInterpretation;
use isakmp::v1::IdentificationType;
use tracing::debug;
use tracing::warn;

use crate::handlers::HandlerContext;
use crate::result::HandlerResult;
use crate::sa::OakleyParams;

/// `MAIN_R0`: responder receives the initiator's first SA payload, selects a
/// proposal from the connection's acceptable transform list, and prepares a
/// reply SA payload.
pub fn main_r0(ctx: &mut HandlerContext) -> HandlerResult {
    let Some(sa_payload) = ctx.digest.payloads.security_associations.first() else {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::PayloadMalformed);
    };

    let Some(chosen) = select_phase1_proposal(ctx, sa_payload) else {
        warn!("no acceptable Phase-1 proposal in initiator SA payload");
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::NoProposalChosen);
    };

    ctx.sa.oakley = Some(chosen.clone());
    ctx.reply.push(payloads::security_association(
        DomainOfInterpretation::Ipsec,
        &sa_payload.situation,
        &[],
    ));
    HandlerResult::Ok
}

/// `MAIN_I1`: initiator receives the responder's chosen SA and records it.
pub fn main_i1(ctx: &mut HandlerContext) -> HandlerResult {
    let Some(sa_payload) = ctx.digest.payloads.security_associations.first() else {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::PayloadMalformed);
    };
    let Some(chosen) = select_phase1_proposal(ctx, sa_payload) else {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::NoProposalChosen);
    };
    ctx.sa.oakley = Some(chosen);

    let Some(ke) = generate_ke_and_nonce(ctx) else {
        return HandlerResult::InternalError;
    };
    ctx.reply.push(ke.0);
    ctx.reply.push(ke.1);
    HandlerResult::Ok
}

/// `MAIN_R1`: responder receives `KE, Ni`, generates its own DH pair and nonce.
pub fn main_r1(ctx: &mut HandlerContext) -> HandlerResult {
    if ctx.digest.payloads.key_exchanges.is_empty() || ctx.digest.payloads.nonces.is_empty() {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::PayloadMalformed);
    }
    let Some(ke) = generate_ke_and_nonce(ctx) else {
        return HandlerResult::InternalError;
    };
    ctx.reply.push(ke.0);
    ctx.reply.push(ke.1);
    HandlerResult::Ok
}

/// `MAIN_I2`: initiator receives `KE, Nr`, computes the DH shared secret and
/// derives SKEYID/SKEYID_a/d/e (PSK branch). Authentication-class sensitive:
/// each `AuthClass` branch shares this entry point but derives the secret
/// differently; only PSK is implemented, matching the declared Non-goal for
/// public-key variants.
pub fn main_i2(ctx: &mut HandlerContext) -> HandlerResult {
    derive_skeyid(ctx)
}

/// `MAIN_R2`: responder receives the initiator's encrypted `IDi, HASH_I`.
/// HASH verification already happened in the integrity gate before dispatch;
/// this handler only needs to extract the identity and build the reply.
pub fn main_r2(ctx: &mut HandlerContext) -> HandlerResult {
    let Some(idi) = ctx.digest.payloads.identifications.first() else {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::PayloadMalformed);
    };
    debug!(id_type = ?idi.id_type, "responder accepted initiator identity");

    let Some(oakley) = ctx.sa.oakley.clone() else {
        return HandlerResult::InternalError;
    };
    let Some(skeyid) = ctx.sa.skeyid.clone() else {
        return HandlerResult::InternalError;
    };

    let idr_bytes = local_identity_bytes(ctx);
    let idr_payload = payloads::identification(IdentificationType::Ipv4Addr, 0, 0, &idr_bytes);

    let hash_input = [ctx.sa.initiator_spi.to_be_bytes().as_slice(), &idr_bytes].concat();
    let hash_r = match ctx.crypto.prf(oakley.integrity, &skeyid.skeyid_a, &hash_input) {
        Ok(h) => h,
        Err(e) => {
            warn!(error = %e, "failed to compute HASH_R");
            return HandlerResult::InternalError;
        }
    };

    ctx.reply.push(idr_payload);
    ctx.reply.push(payloads::hash(&hash_r));
    HandlerResult::Ok
}

/// `MAIN_I3`: initiator receives the responder's encrypted `IDr, HASH_R`.
pub fn main_i3(ctx: &mut HandlerContext) -> HandlerResult {
    if ctx.digest.payloads.identifications.is_empty() {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::PayloadMalformed);
    }
    debug!("initiator accepted responder identity; Phase 1 established");
    HandlerResult::Ok
}

/// `MAIN_R3`: terminal Main Mode state for the responder, Phase-1 established.
/// Only reachable again via byte-identical duplicates, which the duplicate
/// controller intercepts before dispatch.
pub fn main_r3(ctx: &mut HandlerContext) -> HandlerResult {
    crate::handlers::unexpected::unexpected(ctx)
}

/// `MAIN_I4`: terminal Main Mode state for the initiator, Phase-1 established.
pub fn main_i4(ctx: &mut HandlerContext) -> HandlerResult {
    crate::handlers::unexpected::unexpected(ctx)
}

fn select_phase1_proposal(
    ctx: &HandlerContext,
    sa_payload: &isakmp::v1::parser::definitions::SecurityAssociationPayload,
) -> Option<OakleyParams> {
    use isakmp::v1::parser::definitions::DataAttribute;

    let connection = &ctx.sa.connection;
    for proposal in &sa_payload.proposal_payload {
        for transform in &proposal.transforms {
            let mut cipher = None;
            let mut hash = None;
            let mut auth = None;
            let mut group = None;
            let mut key_bits = None;
            let mut lifetime_seconds = 28800u32;

            for attr in &transform.sa_attributes {
                let (attribute_type, value) = match attr {
                    DataAttribute::DataAttributeShort(s) => (s.attribute_type, s.attribute_value as u32),
                    DataAttribute::DataAttributeLong(_) => continue,
                };
                match attribute_type {
                    isakmp::v1::AttributeType::EncryptionAlgorithm => {
                        cipher = isakmp::v1::EncryptionAlgorithm::try_from(value as u16).ok()
                    }
                    isakmp::v1::AttributeType::HashAlgorithm => {
                        hash = isakmp::v1::HashAlgorithm::try_from(value as u16).ok()
                    }
                    isakmp::v1::AttributeType::AuthenticationMethod => {
                        auth = isakmp::v1::AuthenticationMethod::try_from(value as u16).ok()
                    }
                    isakmp::v1::AttributeType::GroupDescription => {
                        group = isakmp::v1::GroupDescription::try_from(value as u16).ok()
                    }
                    isakmp::v1::AttributeType::KeyLength => key_bits = Some(value as u16),
                    isakmp::v1::AttributeType::LifeDuration => lifetime_seconds = value,
                    _ => {}
                }
            }

            let (Some(cipher), Some(hash), Some(auth), Some(group)) = (cipher, hash, auth, group)
            else {
                continue;
            };

            if !connection.phase1_encryption.contains(&cipher) {
                continue;
            }
            if !connection.phase1_hash.contains(&hash) {
                continue;
            }
            if !connection.auth_methods.contains(&auth) {
                continue;
            }
            if auth.auth_class() != AuthClass::Psk {
                // Non-PSK auth classes are recognized but not fully processed,
                // per the specification's declared Non-goal.
                continue;
            }

            return Some(OakleyParams {
                auth_method: auth,
                cipher,
                integrity: hash,
                group,
                key_bits,
                lifetime: std::time::Duration::from_secs(lifetime_seconds as u64),
            });
        }
    }
    None
}

fn generate_ke_and_nonce(
    ctx: &mut HandlerContext,
) -> Option<(isakmp::v1::generator::payloads::RawPayload, isakmp::v1::generator::payloads::RawPayload)> {
    let oakley = ctx.sa.oakley.clone()?;
    let dh = ctx.crypto.generate_dh(oakley.group as u16).ok()?;
    let mut nonce_bytes = vec![0u8; 32];
    ctx.crypto.random(&mut nonce_bytes).ok()?;
    // The DH handle is recovered from the collaborator by key material derived
    // later in `derive_skeyid`; stash the public value as last-sent context so
    // `derive_skeyid` has both halves of the exchange at hand.
    ctx.sa.iv.phase1_iv = dh.handle.0.to_be_bytes().to_vec();
    Some((
        payloads::key_exchange(&dh.public_value),
        payloads::nonce(&nonce_bytes),
    ))
}

fn derive_skeyid(ctx: &mut HandlerContext) -> HandlerResult {
    let (Some(oakley), Some(ke), Some(_nonce)) = (
        ctx.sa.oakley.clone(),
        ctx.digest.payloads.key_exchanges.first(),
        ctx.digest.payloads.nonces.first(),
    ) else {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::PayloadMalformed);
    };

    let handle = crate::crypto::DhHandle(u64::from_be_bytes(
        ctx.sa.iv.phase1_iv.clone().try_into().unwrap_or([0u8; 8]),
    ));
    let g_xy = match ctx.crypto.dh_shared_secret(&handle, &ke.key_exchange_data) {
        Ok(secret) => secret,
        Err(e) => {
            warn!(error = %e, "DH shared secret computation failed");
            return HandlerResult::Fatal;
        }
    };

    let psk = match &ctx.sa.connection.psk {
        Some(psk) => psk.clone(),
        None => return HandlerResult::Fail(isakmp::v1::NotifyMessageType::AuthenticationFailed),
    };

    let ni = ctx
        .digest
        .payloads
        .nonces
        .first()
        .map(|n| n.nonce_data.clone())
        .unwrap_or_default();

    match ctx.crypto.derive_skeyid_psk(
        oakley.integrity,
        &psk,
        &ni,
        &ni,
        &g_xy,
        ctx.sa.initiator_spi,
        ctx.sa.responder_spi,
    ) {
        Ok(skeyid) => {
            ctx.sa.skeyid = Some(skeyid);
            ctx.sa.hidden.skeyid_calculated = true;
            HandlerResult::Ok
        }
        Err(e) => {
            warn!(error = %e, "SKEYID derivation failed");
            HandlerResult::Fatal
        }
    }
}

fn local_identity_bytes(ctx: &HandlerContext) -> Vec<u8> {
    match ctx.sa.local.ip() {
        std::net::IpAddr::V4(v4) => v4.octets().to_vec(),
        std::net::IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}
