//! Mode-Config (address assignment, DNS, etc.) handlers.

use isakmp::v1::generator::payloads;
use isakmp::v1::ModeConfigType;
use tracing::info;

use crate::handlers::HandlerContext;
use crate::result::HandlerResult;

/// `MODE_CFG_I1`: client sends `ISAKMP_CFG_REQUEST` for its configuration
/// (address, netmask, DNS).
pub fn mode_cfg_i1(ctx: &mut HandlerContext) -> HandlerResult {
    ctx.reply.push(payloads::attribute(ModeConfigType::Request, 0, &[]));
    HandlerResult::Ok
}

/// `MODE_CFG_R0`: server receives the request and replies with `ISAKMP_CFG_SET`.
pub fn mode_cfg_r0(ctx: &mut HandlerContext) -> HandlerResult {
    if ctx.digest.payloads.attributes.is_empty() {
        return HandlerResult::Fail(isakmp::v1::NotifyMessageType::PayloadMalformed);
    }
    let identifier = ctx.digest.payloads.attributes[0].identifier;
    ctx.reply.push(payloads::attribute(ModeConfigType::Set, identifier, &[]));
    HandlerResult::Ok
}

/// `MODE_CFG_R1`: server receives the client's `ISAKMP_CFG_ACK`, completing
/// the transaction.
pub fn mode_cfg_r1(ctx: &mut HandlerContext) -> HandlerResult {
    ctx.sa.hidden.modecfg_vars_set = true;
    info!("Mode-Config transaction acknowledged");
    HandlerResult::Ok
}

/// `MODE_CFG_R2`: terminal state once Mode-Config has completed; promoted to
/// `MAIN_R3` automatically by the demultiplexer if a Quick Mode message
/// arrives, per §4.1.
pub fn mode_cfg_r2(ctx: &mut HandlerContext) -> HandlerResult {
    crate::handlers::unexpected::unexpected(ctx)
}
