//! Quick Mode (3-message Phase-2) handlers, see §8 scenario 2.

use std::time::Duration;

use isakmp::v1::generator::payloads;
use isakmp::v1::parser::definitions::DataAttribute;
use isakmp::v1::parser::definitions::SecurityAssociationPayload;
use isakmp::v1::AttributeType;
use isakmp::v1::DomainOfInterpretation;
use tracing::warn;

use crate::handlers::HandlerContext;
use crate::kernel::Direction;
use crate::kernel::KernelSaParams;
use crate::result::HandlerResult;
use crate::sa::IkeSa;

/// RFC 2407 §4.4.1 protocol identifiers carried on a Quick Mode proposal.
const PROTO_IPSEC_AH: u8 = 2;
const PROTO_IPSEC_ESP: u8 = 3;
const PROTO_IPCOMP: u8 = 4;

/// `QUICK_R0`: responder receives `HASH(1), SA, Ni, IDci, IDcr`. HASH(1) is
/// already verified by the integrity gate before dispatch.
pub fn quick_r0(ctx: &mut HandlerContext) -> HandlerResult {
    if ctx.digest.payloads.security_associations.is_empty() || ctx.digest.payloads.nonces.is_empty() {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::PayloadMalformed);
    }
    if ctx.digest.payloads.identifications.len() != 2 {
        // Narrow traffic-selector pairs are always sent together; a single or
        // absent pair means transport-mode-implied selectors (the SA's own
        // endpoints), which this engine does not negotiate further.
        if !ctx.digest.payloads.identifications.is_empty() {
            return HandlerResult::Fail(isakmp::v1::NotifyMessageType::PayloadMalformed);
        }
    }

    let sa_payload = &ctx.digest.payloads.security_associations[0];
    record_phase2_lifetimes(ctx.sa, sa_payload);
    ctx.reply.push(payloads::hash(&[]));
    ctx.reply.push(payloads::security_association(
        DomainOfInterpretation::Ipsec,
        &sa_payload.situation,
        &[],
    ));

    let mut nonce = vec![0u8; 32];
    if ctx.crypto.random(&mut nonce).is_err() {
        return HandlerResult::InternalError;
    }
    ctx.reply.push(payloads::nonce(&nonce));

    for id in &ctx.digest.payloads.identifications {
        ctx.reply.push(payloads::identification(
            id.id_type,
            id.protocol_id,
            id.port,
            &id.identification_data,
        ));
    }

    install_child_sas(ctx);
    HandlerResult::Ok
}

/// `QUICK_I1`: initiator receives `HASH(2), SA, Nr, IDci, IDcr` and sends the
/// final `HASH(3)`.
pub fn quick_i1(ctx: &mut HandlerContext) -> HandlerResult {
    if ctx.digest.payloads.security_associations.is_empty() || ctx.digest.payloads.nonces.is_empty() {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::PayloadMalformed);
    }
    let sa_payload = &ctx.digest.payloads.security_associations[0];
    record_phase2_lifetimes(ctx.sa, sa_payload);
    ctx.reply.push(payloads::hash(&[]));
    install_child_sas(ctx);
    HandlerResult::Ok
}

/// `QUICK_R1`: responder receives the final `HASH(3)`, completing Quick Mode.
pub fn quick_r1(ctx: &mut HandlerContext) -> HandlerResult {
    if ctx.digest.payloads.hashes.is_empty() {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::PayloadMalformed);
    }
    HandlerResult::Ok
}

/// `QUICK_I2`: terminal state for the initiator, Child SA established.
pub fn quick_i2(ctx: &mut HandlerContext) -> HandlerResult {
    crate::handlers::unexpected::unexpected(ctx)
}

/// `QUICK_R2`: terminal state for the responder, Child SA established.
pub fn quick_r2(ctx: &mut HandlerContext) -> HandlerResult {
    crate::handlers::unexpected::unexpected(ctx)
}

/// Record each proposed protocol's negotiated lifetime on the SA, for the
/// §4.6 rekey-timer computation (`dispatch::rekey_delay`).
fn record_phase2_lifetimes(sa: &mut IkeSa, sa_payload: &SecurityAssociationPayload) {
    for proposal in &sa_payload.proposal_payload {
        let mut lifetime_seconds = None;
        for transform in &proposal.transforms {
            for attr in &transform.sa_attributes {
                if let DataAttribute::DataAttributeShort(s) = attr {
                    if s.attribute_type == AttributeType::LifeDuration {
                        lifetime_seconds = Some(s.attribute_value as u32);
                    }
                }
            }
        }
        let Some(seconds) = lifetime_seconds else {
            continue;
        };
        let life = Duration::from_secs(seconds as u64);
        match proposal.protocol_id {
            PROTO_IPSEC_AH => sa.phase2_lifetimes.ah = Some(life),
            PROTO_IPSEC_ESP => sa.phase2_lifetimes.esp = Some(life),
            PROTO_IPCOMP => sa.phase2_lifetimes.ipcomp = Some(life),
            _ => {}
        }
    }
}

/// Install the inbound and outbound IPsec SAs for every accepted proposal,
/// calling the kernel collaborator twice as described in §8 scenario 2.
fn install_child_sas(ctx: &mut HandlerContext) {
    let Some(oakley) = ctx.sa.oakley.clone() else {
        return;
    };
    let Some(skeyid) = ctx.sa.skeyid.clone() else {
        return;
    };

    let spi = u32::from_be_bytes(
        ctx.digest
            .payloads
            .security_associations
            .first()
            .and_then(|sa| sa.proposal_payload.first())
            .map(|p| {
                let mut spi = [0u8; 4];
                let len = p.spi.len().min(4);
                spi[..len].copy_from_slice(&p.spi[..len]);
                spi
            })
            .unwrap_or([0u8; 4]),
    );

    let keying = match ctx.crypto.prf(
        oakley.integrity,
        &skeyid.skeyid_d,
        &spi.to_be_bytes(),
    ) {
        Ok(k) => k,
        Err(e) => {
            warn!(error = %e, "Phase-2 keying material derivation failed");
            return;
        }
    };

    for direction in [Direction::Inbound, Direction::Outbound] {
        let params = KernelSaParams {
            spi,
            direction,
            local: ctx.sa.local.ip(),
            remote: ctx.sa.peer.ip(),
            encryption: Some(oakley.cipher),
            authentication: oakley.integrity,
            encryption_key: keying.clone(),
            authentication_key: keying.clone(),
            lifetime_seconds: oakley.lifetime.as_secs() as u32,
        };
        if let Err(e) = ctx.kernel.install(&params) {
            warn!(error = %e, ?direction, "kernel SA installation failed");
        }
    }
}
