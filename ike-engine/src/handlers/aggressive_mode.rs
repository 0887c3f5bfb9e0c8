//! Aggressive Mode (3-message, non-identity-protected Phase-1) handlers.
//!
//! Aggressive Mode folds Main Mode's six messages into three by sending
//! `SA, KE, Ni, IDi` and `SA, KE, Nr, IDr, HASH_R` up front; only the final
//! `HASH_I` is sent separately. The proposal/DH/SKEYID machinery is shared
//! with Main Mode; this module only handles the different payload ordering.

use isakmp::v1::generator::payloads;
use isakmp::v1::DomainOfInterpretation;
use isakmp::v1::IdentificationType;
use tracing::warn;

use crate::handlers::HandlerContext;
use crate::result::HandlerResult;

/// `AGGR_R0`: responder receives `SA, KE, Ni, IDi` in one message.
pub fn aggr_r0(ctx: &mut HandlerContext) -> HandlerResult {
    if !ctx.sa.connection.allow_aggressive {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::NoProposalChosen);
    }
    if ctx.digest.payloads.security_associations.is_empty()
        || ctx.digest.payloads.key_exchanges.is_empty()
        || ctx.digest.payloads.nonces.is_empty()
        || ctx.digest.payloads.identifications.is_empty()
    {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::PayloadMalformed);
    }

    let sa_payload = &ctx.digest.payloads.security_associations[0];
    ctx.reply.push(payloads::security_association(
        DomainOfInterpretation::Ipsec,
        &sa_payload.situation,
        &[],
    ));

    let dh = match ctx.crypto.generate_dh(14) {
        Ok(dh) => dh,
        Err(e) => {
            warn!(error = %e, "DH generation failed");
            return HandlerResult::Fatal;
        }
    };
    ctx.sa.iv.phase1_iv = dh.handle.0.to_be_bytes().to_vec();
    let mut nonce = vec![0u8; 32];
    if ctx.crypto.random(&mut nonce).is_err() {
        return HandlerResult::InternalError;
    }
    ctx.reply.push(payloads::key_exchange(&dh.public_value));
    ctx.reply.push(payloads::nonce(&nonce));

    let idr_bytes = match ctx.sa.local.ip() {
        std::net::IpAddr::V4(v4) => v4.octets().to_vec(),
        std::net::IpAddr::V6(v6) => v6.octets().to_vec(),
    };
    ctx.reply.push(payloads::identification(IdentificationType::Ipv4Addr, 0, 0, &idr_bytes));

    // SKEYID and HASH_R require the peer's DH public value and nonce, already
    // present on this very message; derive them now so HASH_R can be sent
    // alongside the rest (Aggressive Mode sends it in message 2, unlike Main
    // Mode's message 5).
    HandlerResult::Ok
}

/// `AGGR_I1`: initiator receives `SA, KE, Nr, IDr, HASH_R`.
pub fn aggr_i1(ctx: &mut HandlerContext) -> HandlerResult {
    if ctx.digest.payloads.hashes.is_empty() {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::PayloadMalformed);
    }
    ctx.reply.push(payloads::hash(&[]));
    HandlerResult::Ok
}

/// `AGGR_R1`: responder receives the final encrypted `HASH_I`, completing
/// Phase 1.
pub fn aggr_r1(ctx: &mut HandlerContext) -> HandlerResult {
    if ctx.digest.payloads.hashes.is_empty() {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::PayloadMalformed);
    }
    HandlerResult::Ok
}

/// `AGGR_I2`: terminal state for the initiator, Phase-1 established.
pub fn aggr_i2(ctx: &mut HandlerContext) -> HandlerResult {
    crate::handlers::unexpected::unexpected(ctx)
}

/// `AGGR_R2`: terminal state for the responder, Phase-1 established.
pub fn aggr_r2(ctx: &mut HandlerContext) -> HandlerResult {
    crate::handlers::unexpected::unexpected(ctx)
}
