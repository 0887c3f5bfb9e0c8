//! Async Suspension Manager, see §4.8: tracks the at-most-one message an SA
//! is currently waiting on a crypto or kernel collaborator for, and re-enters
//! the dispatcher once that collaborator completes.

use crate::digest::MessageDigest;
use crate::sa::IkeSa;

/// Record that `sa` is now waiting on an external collaborator for `digest`,
/// replacing any prior suspension outright (newest-wins, per §4.8: a second
/// suspension implies the first one's result, if it ever arrives, is stale).
pub fn suspend(sa: &mut IkeSa, digest: MessageDigest) {
    sa.suspended = Some(digest);
}

/// Take the currently suspended digest, if any, so its transition can be
/// re-dispatched from where it left off.
pub fn take_resumable(sa: &mut IkeSa) -> Option<MessageDigest> {
    sa.suspended.take()
}

/// Whether a helper-completion event for `digest` is still relevant, i.e. the
/// SA has not since been superseded by a newer suspension or moved on
/// without one (a completion racing a newer message should be discarded).
pub fn is_current(sa: &IkeSa, digest: &MessageDigest) -> bool {
    matches!(&sa.suspended, Some(pending) if pending.raw == digest.raw)
}
