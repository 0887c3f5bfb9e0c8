//! Packet Demultiplexer, see §4.1: classifies an inbound datagram by exchange
//! type and message-id, resolves the owning SA (or decides to create one),
//! and picks the `from_state` that drives microcode selection.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use isakmp::v1::parser::definitions::Header;
use isakmp::v1::ExchangeType;
use isakmp::v1::NotifyMessageType;
use tracing::warn;

use crate::policy::Connection;
use crate::sa::IkeSa;
use crate::sa::Role;
use crate::state::State;

/// Key an [IkeSa] is looked up by: the SPI pair. The responder SPI is zero
/// until the responder has picked one, so an initial-message lookup and a
/// full-pair lookup are distinct keys.
pub type SaKey = (u64, u64);

/// Outcome of demultiplexing one inbound datagram.
pub enum DemuxOutcome {
    /// Route to an existing SA at the given `from_state`.
    Existing { key: SaKey, from_state: State },
    /// No SA exists yet; create one at the given initial state.
    New { from_state: State },
    /// The datagram should be dropped with the given notification, if any.
    Reject(Option<NotifyMessageType>),
}

/// Resolve `from_state` and SA routing for one inbound header, per the rules
/// of §4.1, indexed by exchange type.
pub fn demultiplex(
    header: &Header,
    sas: &HashMap<SaKey, IkeSa>,
) -> DemuxOutcome {
    if header.initiator_cookie == 0 {
        return DemuxOutcome::Reject(Some(NotifyMessageType::InvalidCookie));
    }

    match header.exchange_mode {
        ExchangeType::IdentityProtection | ExchangeType::Aggressive => {
            if header.message_id != 0 {
                return DemuxOutcome::Reject(Some(NotifyMessageType::InvalidMessageId));
            }
            if header.responder_cookie == 0 {
                let key = (header.initiator_cookie, 0);
                if sas.contains_key(&key) {
                    return DemuxOutcome::Existing {
                        key,
                        from_state: sas[&key].state,
                    };
                }
                let from_state = if header.exchange_mode == ExchangeType::Aggressive {
                    State::AGGR_R0
                } else {
                    State::MAIN_R0
                };
                DemuxOutcome::New { from_state }
            } else {
                let full = (header.initiator_cookie, header.responder_cookie);
                if let Some(sa) = sas.get(&full) {
                    return DemuxOutcome::Existing {
                        key: full,
                        from_state: sa.state,
                    };
                }
                let initial = (header.initiator_cookie, 0);
                match sas.get(&initial) {
                    Some(sa) => DemuxOutcome::Existing {
                        key: initial,
                        from_state: sa.state,
                    },
                    None => DemuxOutcome::Reject(None),
                }
            }
        }
        ExchangeType::Informational => {
            let full = (header.initiator_cookie, header.responder_cookie);
            let key = if sas.contains_key(&full) {
                full
            } else {
                (header.initiator_cookie, 0)
            };
            let Some(sa) = sas.get(&key) else {
                return DemuxOutcome::Reject(None);
            };

            let encrypted = header.flags & isakmp::v1::FLAG_ENCRYPTION != 0;
            if encrypted && sa.skeyid.is_none() {
                return DemuxOutcome::Reject(None);
            }
            if encrypted {
                if header.message_id == 0 || !sa.msgids.is_unique(header.message_id) {
                    return DemuxOutcome::Reject(Some(NotifyMessageType::InvalidMessageId));
                }
                DemuxOutcome::Existing {
                    key,
                    from_state: State::INFO_PROTECTED,
                }
            } else {
                DemuxOutcome::Existing {
                    key,
                    from_state: State::INFO,
                }
            }
        }
        ExchangeType::QuickMode => {
            if header.responder_cookie == 0 || header.message_id == 0 {
                return DemuxOutcome::Reject(Some(NotifyMessageType::InvalidMessageId));
            }
            let full = (header.initiator_cookie, header.responder_cookie);
            let Some(parent) = sas.get(&full) else {
                return DemuxOutcome::Reject(None);
            };
            if matches!(parent.state, State::XAUTH_I0 | State::XAUTH_I1 | State::XAUTH_R0 | State::XAUTH_R1) {
                warn!("Quick Mode rejected: XAUTH in progress");
                return DemuxOutcome::Reject(None);
            }
            let effective_state = if parent.state == State::MODE_CFG_R2 {
                State::MAIN_R3
            } else {
                parent.state
            };
            if !effective_state.is_phase1_established() {
                return DemuxOutcome::Reject(None);
            }
            if !parent.msgids.is_unique(header.message_id) {
                return DemuxOutcome::Reject(Some(NotifyMessageType::InvalidMessageId));
            }
            DemuxOutcome::Existing {
                key: full,
                from_state: State::QUICK_R0,
            }
        }
        ExchangeType::Transaction => {
            if header.initiator_cookie == 0 || header.responder_cookie == 0 || header.message_id == 0 {
                return DemuxOutcome::Reject(Some(NotifyMessageType::UnsupportedExchangeType));
            }
            let full = (header.initiator_cookie, header.responder_cookie);
            let Some(parent) = sas.get(&full) else {
                return DemuxOutcome::Reject(None);
            };
            let from_state = match parent.state {
                State::MAIN_R3 | State::MAIN_I4 => State::XAUTH_R1,
                State::XAUTH_I0 => State::XAUTH_I1,
                State::XAUTH_R1 => State::MODE_CFG_R0,
                State::MODE_CFG_R0 => State::MODE_CFG_R1,
                _ => return DemuxOutcome::Reject(Some(NotifyMessageType::UnsupportedExchangeType)),
            };
            DemuxOutcome::Existing { key: full, from_state }
        }
        _ => DemuxOutcome::Reject(Some(NotifyMessageType::UnsupportedExchangeType)),
    }
}

/// Construct a fresh SA bound to a best-effort connection match for an initial
/// Main/Aggressive Mode message, ahead of identity refinement (§4.9).
pub fn create_responder_sa(
    header: &Header,
    peer: SocketAddr,
    local: SocketAddr,
    from_state: State,
    connection: Arc<Connection>,
) -> IkeSa {
    let mut sa = IkeSa::new_responder(header.initiator_cookie, peer, local, from_state, connection);
    sa.role = Role::Responder;
    sa
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use isakmp::v1::PayloadType;

    use super::*;
    use crate::policy::test_connection;

    fn header(exchange_mode: ExchangeType, icookie: u64, rcookie: u64, msgid: u32) -> Header {
        Header {
            initiator_cookie: icookie,
            responder_cookie: rcookie,
            next_payload: PayloadType::None,
            major_version: 1,
            minor_version: 0,
            exchange_mode,
            flags: 0,
            message_id: msgid,
            length: 28,
        }
    }

    fn established_sa() -> IkeSa {
        let peer: SocketAddr = "198.51.100.1:500".parse().unwrap();
        let local: SocketAddr = "198.51.100.2:500".parse().unwrap();
        IkeSa::new_responder(1, peer, local, State::MAIN_R3, Arc::new(test_connection("test")))
    }

    #[test]
    fn quick_mode_against_unestablished_phase1_is_rejected() {
        let mut sas = HashMap::new();
        let peer: SocketAddr = "198.51.100.1:500".parse().unwrap();
        let local: SocketAddr = "198.51.100.2:500".parse().unwrap();
        sas.insert((1, 2), IkeSa::new_responder(1, peer, local, State::MAIN_R1, Arc::new(test_connection("test"))));

        let h = header(ExchangeType::QuickMode, 1, 2, 7);
        assert!(matches!(demultiplex(&h, &sas), DemuxOutcome::Reject(None)));
    }

    #[test]
    fn quick_mode_against_established_phase1_routes_to_quick_r0() {
        let mut sas = HashMap::new();
        sas.insert((1, 2), established_sa());

        let h = header(ExchangeType::QuickMode, 1, 2, 7);
        match demultiplex(&h, &sas) {
            DemuxOutcome::Existing { key, from_state } => {
                assert_eq!(key, (1, 2));
                assert_eq!(from_state, State::QUICK_R0);
            }
            _ => panic!("expected Existing"),
        }
    }

    #[test]
    fn quick_mode_with_reused_message_id_is_rejected() {
        let mut sas = HashMap::new();
        let mut sa = established_sa();
        sa.msgids.reserve(7);
        sas.insert((1, 2), sa);

        let h = header(ExchangeType::QuickMode, 1, 2, 7);
        assert!(matches!(
            demultiplex(&h, &sas),
            DemuxOutcome::Reject(Some(NotifyMessageType::InvalidMessageId))
        ));
    }

    #[test]
    fn quick_mode_while_xauth_in_progress_is_rejected() {
        let mut sas = HashMap::new();
        let peer: SocketAddr = "198.51.100.1:500".parse().unwrap();
        let local: SocketAddr = "198.51.100.2:500".parse().unwrap();
        sas.insert(
            (1, 2),
            IkeSa::new_responder(1, peer, local, State::XAUTH_R0, Arc::new(test_connection("test"))),
        );

        let h = header(ExchangeType::QuickMode, 1, 2, 7);
        assert!(matches!(demultiplex(&h, &sas), DemuxOutcome::Reject(None)));
    }

    #[test]
    fn main_mode_initial_message_creates_new_sa() {
        let sas = HashMap::new();
        let h = header(ExchangeType::IdentityProtection, 5, 0, 0);
        assert!(matches!(demultiplex(&h, &sas), DemuxOutcome::New { from_state: State::MAIN_R0 }));
    }
}
