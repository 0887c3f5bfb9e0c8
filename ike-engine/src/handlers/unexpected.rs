//! Handler for terminal "packet-loss" states that only accept retransmits,
//! see §4.5.

use tracing::debug;

use crate::handlers::HandlerContext;
use crate::result::HandlerResult;

/// Any message reaching a terminal state that is not a byte-identical
/// duplicate (duplicates are intercepted earlier, by the duplicate
/// controller) is simply ignored: there is no further protocol step defined
/// from here.
pub fn unexpected(ctx: &mut HandlerContext) -> HandlerResult {
    debug!(state = ?ctx.sa.state, "message received in terminal state, ignoring");
    HandlerResult::Ignore
}
