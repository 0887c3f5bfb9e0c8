//! Fragment Reassembler, see §4.2.

use isakmp::v1::NotifyMessageType;
use isakmp::v1::PayloadType;

use crate::sa::FragmentEntry;
use crate::sa::IkeSa;

/// A freshly decoded fragment, before it is filed into the SA's fragment list.
pub struct IncomingFragment {
    /// Shared fragment-set identifier
    pub fragment_id: u16,
    /// 1-based index within the fragment set
    pub index: u8,
    /// Whether this fragment carries the last-flag
    pub last: bool,
    /// This fragment's share of the encrypted body
    pub bytes: Vec<u8>,
    /// Type of the first real payload following reassembly, meaningful only
    /// when `last` is set
    pub next_payload: PayloadType,
}

/// Result of filing one fragment against an SA's pending set.
pub enum ReassemblyOutcome {
    /// The fragment set is not yet complete; nothing more to do.
    Pending,
    /// The fragment set is complete: the concatenated buffer and the type of
    /// its first payload, to be fed back into the demultiplexer as an
    /// ordinary datagram.
    Complete(Vec<u8>, PayloadType),
    /// The fragment header was malformed.
    Malformed,
}

/// File a fragment against `sa.fragments`, replacing any prior entry at the
/// same index (freeing its buffer), and check whether reassembly is complete.
///
/// Fragmentation policy (whether the SA's connection allows it at all) is the
/// caller's responsibility: a disallowed fragment should be discarded before
/// this function is ever called, per §4.2.
pub fn accept_fragment(sa: &mut IkeSa, fragment: IncomingFragment) -> ReassemblyOutcome {
    if fragment.index == 0 || fragment.index > 16 {
        return ReassemblyOutcome::Malformed;
    }

    if let Some(existing) = sa.fragments.iter_mut().find(|f| f.index == fragment.index) {
        existing.bytes = fragment.bytes;
        existing.last = fragment.last;
        existing.next_payload = fragment.next_payload;
    } else {
        sa.fragments.push(FragmentEntry {
            fragment_id: fragment.fragment_id,
            index: fragment.index,
            last: fragment.last,
            bytes: fragment.bytes,
            next_payload: fragment.next_payload,
        });
    }

    let Some(last) = sa.fragments.iter().find(|f| f.last) else {
        return ReassemblyOutcome::Pending;
    };
    let last_index = last.index;
    let next_payload = last.next_payload;

    let have_all = (1..=last_index).all(|i| sa.fragments.iter().any(|f| f.index == i));
    if !have_all {
        return ReassemblyOutcome::Pending;
    }

    let mut ordered: Vec<&FragmentEntry> = sa.fragments.iter().filter(|f| f.index <= last_index).collect();
    ordered.sort_by_key(|f| f.index);
    let mut buf = Vec::new();
    for f in ordered {
        buf.extend_from_slice(&f.bytes);
    }
    sa.fragments.retain(|f| f.index > last_index);
    ReassemblyOutcome::Complete(buf, next_payload)
}

/// Notification to use for a malformed fragment header.
pub const MALFORMED_FRAGMENT: NotifyMessageType = NotifyMessageType::PayloadMalformed;

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use super::*;
    use crate::policy::test_connection;
    use crate::state::State;

    fn fresh_sa() -> IkeSa {
        let peer: SocketAddr = "198.51.100.1:500".parse().unwrap();
        let local: SocketAddr = "198.51.100.2:500".parse().unwrap();
        IkeSa::new_responder(1, peer, local, State::MAIN_R2, Arc::new(test_connection("test")))
    }

    fn frag(index: u8, last: bool, bytes: &[u8]) -> IncomingFragment {
        IncomingFragment {
            fragment_id: 7,
            index,
            last,
            bytes: bytes.to_vec(),
            next_payload: PayloadType::Hash,
        }
    }

    #[test]
    fn index_zero_is_malformed() {
        let mut sa = fresh_sa();
        assert!(matches!(accept_fragment(&mut sa, frag(0, true, &[1])), ReassemblyOutcome::Malformed));
    }

    #[test]
    fn single_fragment_marked_last_completes_immediately() {
        let mut sa = fresh_sa();
        match accept_fragment(&mut sa, frag(1, true, &[1, 2, 3])) {
            ReassemblyOutcome::Complete(buf, next_payload) => {
                assert_eq!(buf, vec![1, 2, 3]);
                assert_eq!(next_payload, PayloadType::Hash);
            }
            _ => panic!("expected Complete"),
        }
        assert!(sa.fragments.is_empty());
    }

    #[test]
    fn out_of_order_fragments_wait_for_the_gap() {
        let mut sa = fresh_sa();
        assert!(matches!(accept_fragment(&mut sa, frag(2, true, &[4, 5])), ReassemblyOutcome::Pending));
        match accept_fragment(&mut sa, frag(1, false, &[1, 2, 3])) {
            ReassemblyOutcome::Complete(buf, _) => assert_eq!(buf, vec![1, 2, 3, 4, 5]),
            _ => panic!("expected Complete"),
        }
    }

    #[test]
    fn resending_a_fragment_replaces_the_stored_copy() {
        let mut sa = fresh_sa();
        assert!(matches!(accept_fragment(&mut sa, frag(1, false, &[0, 0, 0])), ReassemblyOutcome::Pending));
        match accept_fragment(&mut sa, frag(1, true, &[9])) {
            ReassemblyOutcome::Complete(buf, _) => assert_eq!(buf, vec![9]),
            _ => panic!("expected Complete"),
        }
    }
}
