//! Timers armed against an [crate::sa::IkeSa] by the dispatcher, see §5.

use std::time::Duration;
use std::time::Instant;

/// The single timer slot an [crate::sa::IkeSa] carries.
///
/// The specification models one timer wheel per SA rather than per-event
/// timers, since at most one of retransmit/replace/discard is ever pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// No timer is armed.
    Null,
    /// Re-send the last outbound message after an exponential backoff if no
    /// reply has arrived.
    Retransmit,
    /// Begin a Phase-1 or Phase-2 rekey before the negotiated lifetime elapses.
    SaReplace,
    /// Discard a half-open or expired SA with no further notification.
    SoDiscard,
}

impl TimerEvent {
    /// Whether this event keeps the SA alive in the timer wheel.
    pub fn is_armed(self) -> bool {
        !matches!(self, TimerEvent::Null)
    }
}

/// One entry of an SA's timer wheel: the event due and when it fires.
#[derive(Debug, Clone, Copy)]
pub struct ArmedTimer {
    /// The event to run when this timer fires
    pub event: TimerEvent,
    /// Delay from the moment the timer was armed
    pub delay: Duration,
    /// Number of times this timer has already fired for the current event
    /// (used to compute retransmit backoff)
    pub attempt: u32,
    /// When this timer was armed, used to tell whether `delay` has elapsed
    pub armed_at: Instant,
}

impl ArmedTimer {
    /// Base retransmit delay before backoff is applied.
    pub const RETRANSMIT_BASE: Duration = Duration::from_secs(2);
    /// Maximum number of retransmit attempts before the SA is abandoned.
    pub const MAX_RETRANSMITS: u32 = 5;

    /// Arm a fresh retransmit timer at attempt zero.
    pub fn retransmit_initial() -> Self {
        Self {
            event: TimerEvent::Retransmit,
            delay: Self::RETRANSMIT_BASE,
            attempt: 0,
            armed_at: Instant::now(),
        }
    }

    /// The next retransmit timer, doubling the delay, or `None` once the
    /// attempt budget is exhausted and the SA should be discarded instead.
    pub fn next_retransmit(self) -> Option<Self> {
        if self.attempt + 1 >= Self::MAX_RETRANSMITS {
            return None;
        }
        Some(Self {
            event: TimerEvent::Retransmit,
            delay: self.delay * 2,
            attempt: self.attempt + 1,
            armed_at: Instant::now(),
        })
    }

    /// Arm a replace timer at a fraction of the negotiated lifetime, per §4.6
    /// ("rekey margin"): refresh at roughly 90% of the full lifetime so the
    /// replacement negotiation has time to complete before expiry.
    pub fn sa_replace(lifetime: Duration) -> Self {
        Self {
            event: TimerEvent::SaReplace,
            delay: lifetime.mul_f32(0.9),
            attempt: 0,
            armed_at: Instant::now(),
        }
    }

    /// Arm a discard timer at the full negotiated lifetime.
    pub fn so_discard(lifetime: Duration) -> Self {
        Self {
            event: TimerEvent::SoDiscard,
            delay: lifetime,
            attempt: 0,
            armed_at: Instant::now(),
        }
    }

    /// Whether `delay` has elapsed since this timer was armed.
    pub fn is_due(&self) -> bool {
        self.armed_at.elapsed() >= self.delay
    }
}
