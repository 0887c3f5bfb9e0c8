//! Duplicate & Retransmit Controller, see §4.7: decides whether an inbound
//! message that is byte-identical to one already processed should be served
//! from the retransmit buffer instead of re-entering the dispatcher.

use crate::sa::IkeSa;
use crate::state::Transition;
use crate::state::TransitionFlags;
use crate::timer::TimerEvent;

/// What to do with an inbound datagram once it has been checked for being a
/// duplicate of the last message this SA fully processed.
pub enum DuplicateOutcome {
    /// Not a duplicate; process normally.
    Fresh,
    /// A duplicate the SA should retransmit its last reply for.
    Retransmit(Vec<u8>),
    /// A duplicate with no reply to retransmit (nothing was sent last time),
    /// or the SA's duplicate budget is exhausted; drop silently.
    Drop,
}

/// Check `raw` against `sa.rpacket`, applying the retransmit and budget rules
/// of §4.7. `last_transition` is the transition that produced `sa.rpacket`,
/// used to decide whether duplicates of it are retransmit-eligible at all.
pub fn check(sa: &mut IkeSa, raw: &[u8], last_transition: Option<&Transition>, max_accepted_duplicates: u32) -> DuplicateOutcome {
    let Some(rpacket) = &sa.rpacket else {
        return DuplicateOutcome::Fresh;
    };
    if rpacket != raw {
        return DuplicateOutcome::Fresh;
    }

    let armed_so_discard = sa.timer.is_some_and(|t| t.event == TimerEvent::SoDiscard);
    let retransmit_eligible = armed_so_discard
        || last_transition.is_some_and(|t| {
            t.flags.contains(TransitionFlags::REPLY) && t.flags.contains(TransitionFlags::RETRANSMIT_ON_DUPLICATE)
        });

    if !retransmit_eligible {
        return DuplicateOutcome::Drop;
    }

    if sa.duplicate_count >= max_accepted_duplicates {
        return DuplicateOutcome::Drop;
    }
    sa.duplicate_count += 1;

    match &sa.last_sent {
        Some(bytes) => DuplicateOutcome::Retransmit(bytes.clone()),
        None => DuplicateOutcome::Drop,
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use super::*;
    use crate::policy::test_connection;
    use crate::sa::IkeSa;
    use crate::state::State;

    fn fresh_sa() -> IkeSa {
        let peer: SocketAddr = "198.51.100.1:500".parse().unwrap();
        let local: SocketAddr = "198.51.100.2:500".parse().unwrap();
        IkeSa::new_responder(1, peer, local, State::MAIN_R1, Arc::new(test_connection("test")))
    }

    #[test]
    fn non_matching_bytes_are_fresh() {
        let mut sa = fresh_sa();
        sa.rpacket = Some(vec![1, 2, 3]);
        assert!(matches!(check(&mut sa, &[4, 5, 6], None, 5), DuplicateOutcome::Fresh));
    }

    #[test]
    fn no_prior_packet_is_fresh() {
        let mut sa = fresh_sa();
        assert!(matches!(check(&mut sa, &[1, 2, 3], None, 5), DuplicateOutcome::Fresh));
    }

    #[test]
    fn duplicate_without_retransmit_eligibility_is_dropped() {
        let mut sa = fresh_sa();
        sa.rpacket = Some(vec![1, 2, 3]);
        sa.last_sent = Some(vec![9, 9, 9]);
        assert!(matches!(check(&mut sa, &[1, 2, 3], None, 5), DuplicateOutcome::Drop));
    }

    #[test]
    fn duplicate_with_armed_so_discard_retransmits_last_sent() {
        let mut sa = fresh_sa();
        sa.rpacket = Some(vec![1, 2, 3]);
        sa.last_sent = Some(vec![9, 9, 9]);
        sa.timer = Some(crate::timer::ArmedTimer::so_discard(std::time::Duration::from_secs(30)));
        match check(&mut sa, &[1, 2, 3], None, 5) {
            DuplicateOutcome::Retransmit(bytes) => assert_eq!(bytes, vec![9, 9, 9]),
            _ => panic!("expected Retransmit"),
        }
        assert_eq!(sa.duplicate_count, 1);
    }

    #[test]
    fn duplicate_budget_is_exhausted_eventually() {
        let mut sa = fresh_sa();
        sa.rpacket = Some(vec![1, 2, 3]);
        sa.last_sent = Some(vec![9, 9, 9]);
        sa.timer = Some(crate::timer::ArmedTimer::so_discard(std::time::Duration::from_secs(30)));
        for _ in 0..2 {
            assert!(matches!(check(&mut sa, &[1, 2, 3], None, 2), DuplicateOutcome::Retransmit(_)));
        }
        assert!(matches!(check(&mut sa, &[1, 2, 3], None, 2), DuplicateOutcome::Drop));
    }
}
