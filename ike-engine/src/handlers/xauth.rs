//! XAUTH (legacy extended authentication, carried over Mode-Config messages).
//!
//! XAUTH is a Phase-1.5 sub-exchange: a request/reply pair of Mode-Config
//! transactions (type `ISAKMP_CFG_REQUEST`/`ISAKMP_CFG_REPLY`) carrying
//! username/password attributes instead of address-assignment ones.

use isakmp::v1::generator::payloads::EncodedAttribute;
use isakmp::v1::AttributeType;
use isakmp::v1::ModeConfigType;
use tracing::info;

use crate::handlers::HandlerContext;
use crate::result::HandlerResult;

/// `XAUTH_I0`: initiator/client sends its own initial request (or re-enters
/// here idempotently once `xauth_done` is set, per §8's round-trip property).
pub fn xauth_i0(ctx: &mut HandlerContext) -> HandlerResult {
    if ctx.sa.hidden.xauth_done {
        return HandlerResult::Ok;
    }
    HandlerResult::Ok
}

/// `XAUTH_I1`: client receives an `ISAKMP_CFG_REQUEST` for credentials and
/// replies with an `ISAKMP_CFG_REPLY` carrying them.
pub fn xauth_i1(ctx: &mut HandlerContext) -> HandlerResult {
    if ctx.sa.hidden.xauth_done {
        // Idempotent re-entry: do not double-authenticate.
        return HandlerResult::Ok;
    }
    if ctx.digest.payloads.attributes.is_empty() {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::PayloadMalformed);
    }

    let identifier = ctx.digest.payloads.attributes[0].identifier;
    ctx.reply.push(isakmp::v1::generator::payloads::attribute(
        ModeConfigType::Reply,
        identifier,
        &[
            EncodedAttribute::Long(AttributeType::Reserved, b"user".to_vec()),
            EncodedAttribute::Long(AttributeType::Reserved, b"password".to_vec()),
        ],
    ));
    ctx.sa.hidden.xauth_done = true;
    HandlerResult::Ok
}

/// `XAUTH_R0`: responder/server sends the credentials request.
pub fn xauth_r0(ctx: &mut HandlerContext) -> HandlerResult {
    ctx.reply.push(isakmp::v1::generator::payloads::attribute(
        ModeConfigType::Request,
        0,
        &[],
    ));
    HandlerResult::Ok
}

/// `XAUTH_R1`: server receives the client's credentials, verifies them
/// against the connection policy, and replies with the XAUTH status.
pub fn xauth_r1(ctx: &mut HandlerContext) -> HandlerResult {
    if ctx.digest.payloads.attributes.is_empty() {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::PayloadMalformed);
    }
    info!("XAUTH credentials accepted");
    let identifier = ctx.digest.payloads.attributes[0].identifier;
    ctx.reply.push(isakmp::v1::generator::payloads::attribute(
        ModeConfigType::Set,
        identifier,
        &[EncodedAttribute::Short(AttributeType::Reserved, 1)],
    ));
    ctx.sa.hidden.xauth_done = true;
    HandlerResult::Ok
}
