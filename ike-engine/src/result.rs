//! The sum type every handler returns; the dispatcher owns all side effects
//! and reacts to this alone, per §4.6.

use isakmp::v1::NotifyMessageType;

/// Outcome of running a transition's handler against a decoded message.
#[derive(Debug, Clone)]
pub enum HandlerResult {
    /// The transition succeeded; the dispatcher should move the SA to
    /// [crate::state::Transition::resolved_to_state] and run its flags.
    Ok,
    /// The handler is waiting on an external collaborator (crypto, kernel) and
    /// will resume the same message later; the SA stays in `from_state`.
    Suspend,
    /// The message should be silently dropped with no state change and no reply.
    Ignore,
    /// The message is rejected; if the transition's flags call for a reply, an
    /// Informational exchange carrying this notification should be sent.
    Fail(NotifyMessageType),
    /// The SA is no longer viable and must be torn down without a reply.
    Fatal,
    /// A defect internal to the engine itself, not attributable to the peer.
    InternalError,
}

impl HandlerResult {
    /// Whether this outcome advances the SA to the transition's target state.
    pub fn advances_state(&self) -> bool {
        matches!(self, HandlerResult::Ok)
    }
}
