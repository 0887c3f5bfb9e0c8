//! The IKEv1 state space and the table-driven microcode that moves an [crate::sa::IkeSa]
//! between states.

use isakmp::v1::AuthClass;
use isakmp::v1::NotifyMessageType;
use isakmp::v1::PayloadType;

use crate::digest::HashRequirement;
use crate::handlers::HandlerFn;
use crate::timer::TimerEvent;

/// Every state an [crate::sa::IkeSa] can occupy.
///
/// Ordering follows the exchange families from the specification: Main Mode,
/// Aggressive Mode, Quick Mode, Informational, XAUTH, Mode-Config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types, missing_docs)]
pub enum State {
    MAIN_R0,
    MAIN_I1,
    MAIN_R1,
    MAIN_I2,
    MAIN_R2,
    MAIN_I3,
    MAIN_R3,
    MAIN_I4,

    AGGR_R0,
    AGGR_I1,
    AGGR_R1,
    AGGR_I2,
    AGGR_R2,

    QUICK_R0,
    QUICK_I1,
    QUICK_R1,
    QUICK_I2,
    QUICK_R2,

    INFO,
    INFO_PROTECTED,

    XAUTH_I0,
    XAUTH_I1,
    XAUTH_R0,
    XAUTH_R1,

    MODE_CFG_I1,
    MODE_CFG_R0,
    MODE_CFG_R1,
    MODE_CFG_R2,
}

impl State {
    /// Whether a fully established Phase-1 SA in this state may initiate or accept Quick Mode.
    pub fn is_phase1_established(self) -> bool {
        matches!(self, State::MAIN_R3 | State::MAIN_I4)
    }
}

bitflags::bitflags! {
    /// Per-transition behavior flags, see §3 of the specification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TransitionFlags: u16 {
        /// This transition is only taken by the exchange initiator.
        const INITIATOR = 0b0000_0000_0001;
        /// The dispatcher must serialize and transmit a reply on success.
        const REPLY = 0b0000_0000_0010;
        /// The inbound message body is encrypted.
        const INPUT_ENCRYPTED = 0b0000_0000_0100;
        /// The outbound reply body must be encrypted.
        const OUTPUT_ENCRYPTED = 0b0000_0000_1000;
        /// This is the first encrypted message of the exchange (carries the
        /// authentication itself, so no HASH payload is required of it).
        const FIRST_ENCRYPTED_INPUT = 0b0000_0001_0000;
        /// On a byte-identical duplicate, retransmit the stored reply.
        const RETRANSMIT_ON_DUPLICATE = 0b0000_0010_0000;
        /// On success, fire any Phase-2 negotiations queued against this SA.
        const RELEASE_PENDING_P2 = 0b0000_0100_0000;
        /// Part of an XAUTH authentication sub-exchange.
        const XAUTH_AUTH = 0b0000_1000_0000;
    }
}

/// One entry of the state transition table (microcode).
pub struct Transition {
    /// State a message in this slot must currently be in
    pub from_state: State,
    /// State to move to on [crate::result::HandlerResult::Ok]
    pub to_state: Option<State>,
    /// Auth class this entry applies to
    pub auth_class: AuthClass,
    /// Payloads that must be present
    pub required_payloads: &'static [PayloadType],
    /// Payloads that may optionally be present
    pub optional_payloads: &'static [PayloadType],
    /// Timer armed on success
    pub timer_event: TimerEvent,
    /// HASH protection required of this transition, if any
    pub hash_type: HashRequirement,
    /// Behavior flags
    pub flags: TransitionFlags,
    /// Handler invoked for this transition
    pub handler: HandlerFn,
}

impl Transition {
    /// `to_state`, resolving the legacy `UNDEFINED` (`None`) slot to "stay in the
    /// current state", per the open question resolved in DESIGN.md.
    pub fn resolved_to_state(&self) -> State {
        self.to_state.unwrap_or(self.from_state)
    }
}

/// Error returned when the state table fails self-validation at startup.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TableError {
    /// An auth-sensitive `from_state` does not cover all four auth classes
    #[error("state {0:?} is auth-sensitive but does not cover all auth classes")]
    IncompleteAuthCoverage(State),
    /// An encrypted, non-first transition is missing HASH protection
    #[error("transition from {0:?} is INPUT_ENCRYPTED without FIRST_ENCRYPTED_INPUT but declares no hash requirement")]
    MissingHashProtection(State),
    /// Two entries for the same `(from_state, auth_class)` pair
    #[error("duplicate table entry for ({0:?}, {1:?})")]
    DuplicateEntry(State, AuthClass),
}

/// States whose microcode branches on the negotiated auth method, and therefore
/// must cover `{Psk, DigitalSignature, PublicKeyEncryption, RevisedPublicKeyEncryption}`
/// exhaustively (see §8 Testable Properties, "Universal invariants").
const AUTH_SENSITIVE_STATES: &[State] = &[State::MAIN_I2, State::MAIN_R2, State::AGGR_I1];

/// Validate the structural invariants the specification requires of the microcode
/// table: auth-class coverage for auth-sensitive states, HASH protection on
/// non-initial encrypted transitions, and absence of duplicate entries.
pub fn validate_table(table: &[Transition]) -> Result<(), TableError> {
    use std::collections::HashSet;

    let mut seen: HashSet<(State, AuthClass)> = HashSet::new();
    for t in table {
        if !seen.insert((t.from_state, t.auth_class)) {
            return Err(TableError::DuplicateEntry(t.from_state, t.auth_class));
        }

        if t.flags.contains(TransitionFlags::INPUT_ENCRYPTED)
            && !t.flags.contains(TransitionFlags::FIRST_ENCRYPTED_INPUT)
            && t.hash_type == HashRequirement::None
        {
            return Err(TableError::MissingHashProtection(t.from_state));
        }
    }

    for &state in AUTH_SENSITIVE_STATES {
        let classes: HashSet<AuthClass> = table
            .iter()
            .filter(|t| t.from_state == state)
            .map(|t| t.auth_class)
            .collect();
        let required: HashSet<AuthClass> = [
            AuthClass::Psk,
            AuthClass::DigitalSignature,
            AuthClass::PublicKeyEncryption,
            AuthClass::RevisedPublicKeyEncryption,
        ]
        .into_iter()
        .collect();
        if classes != required {
            return Err(TableError::IncompleteAuthCoverage(state));
        }
    }

    Ok(())
}

/// Find the microcode entry for `(from_state, auth_class)`. If the SA has no
/// negotiated auth method yet (initial messages), the first entry for the
/// state is used, matching the specification's linear-scan fallback.
pub fn lookup<'t>(
    table: &'t [Transition],
    from_state: State,
    auth_class: Option<AuthClass>,
) -> Option<&'t Transition> {
    let Some(wanted) = auth_class else {
        return table.iter().find(|t| t.from_state == from_state);
    };
    table
        .iter()
        .find(|t| t.from_state == from_state && t.auth_class == wanted)
        .or_else(|| {
            table
                .iter()
                .find(|t| t.from_state == from_state && t.auth_class == AuthClass::All)
        })
}

/// Notifications the table's own entries may reference when pre-declaring a
/// failure outcome is useful (most transitions compute their notify code at
/// runtime instead; kept here for discoverability).
pub const UNSUPPORTED_EXCHANGE_TYPE: NotifyMessageType = NotifyMessageType::UnsupportedExchangeType;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HandlerContext;

    fn noop(_ctx: &mut HandlerContext) -> crate::result::HandlerResult {
        crate::result::HandlerResult::Ok
    }

    fn entry(from: State, auth: AuthClass, flags: TransitionFlags, hash: HashRequirement) -> Transition {
        Transition {
            from_state: from,
            to_state: None,
            auth_class: auth,
            required_payloads: &[],
            optional_payloads: &[],
            timer_event: crate::timer::TimerEvent::Null,
            hash_type: hash,
            flags,
            handler: noop,
        }
    }

    #[test]
    fn resolved_to_state_self_loops_on_undefined() {
        let t = entry(State::MAIN_R3, AuthClass::All, TransitionFlags::empty(), HashRequirement::None);
        assert_eq!(t.resolved_to_state(), State::MAIN_R3);
    }

    #[test]
    fn rejects_duplicate_entries() {
        let table = vec![
            entry(State::MAIN_R0, AuthClass::All, TransitionFlags::empty(), HashRequirement::None),
            entry(State::MAIN_R0, AuthClass::All, TransitionFlags::empty(), HashRequirement::None),
        ];
        assert!(matches!(validate_table(&table), Err(TableError::DuplicateEntry(State::MAIN_R0, AuthClass::All))));
    }

    #[test]
    fn rejects_incomplete_auth_coverage() {
        let table = vec![entry(State::MAIN_I2, AuthClass::Psk, TransitionFlags::empty(), HashRequirement::None)];
        assert!(matches!(validate_table(&table), Err(TableError::IncompleteAuthCoverage(State::MAIN_I2))));
    }

    #[test]
    fn rejects_encrypted_transition_without_hash_protection() {
        let table = vec![entry(
            State::QUICK_R1,
            AuthClass::All,
            TransitionFlags::INPUT_ENCRYPTED,
            HashRequirement::None,
        )];
        assert!(matches!(validate_table(&table), Err(TableError::MissingHashProtection(State::QUICK_R1))));
    }

    #[test]
    fn first_encrypted_input_is_exempt_from_hash_requirement() {
        let table = vec![entry(
            State::MAIN_R2,
            AuthClass::All,
            TransitionFlags::INPUT_ENCRYPTED | TransitionFlags::FIRST_ENCRYPTED_INPUT,
            HashRequirement::None,
        )];
        assert!(validate_table(&table).is_ok());
    }

    #[test]
    fn lookup_falls_back_to_all_when_auth_class_unknown() {
        let table = vec![entry(State::MAIN_R0, AuthClass::All, TransitionFlags::empty(), HashRequirement::None)];
        assert!(lookup(&table, State::MAIN_R0, None).is_some());
    }

    #[test]
    fn lookup_prefers_specific_auth_class_over_all() {
        let table = vec![
            entry(State::MAIN_I2, AuthClass::All, TransitionFlags::empty(), HashRequirement::None),
            entry(State::MAIN_I2, AuthClass::Psk, TransitionFlags::empty(), HashRequirement::None),
        ];
        let found = lookup(&table, State::MAIN_I2, Some(AuthClass::Psk)).unwrap();
        assert_eq!(found.auth_class, AuthClass::Psk);
    }

    #[test]
    fn lookup_falls_back_to_all_when_specific_class_absent() {
        let table = vec![entry(State::MAIN_I2, AuthClass::All, TransitionFlags::empty(), HashRequirement::None)];
        let found = lookup(&table, State::MAIN_I2, Some(AuthClass::DigitalSignature)).unwrap();
        assert_eq!(found.auth_class, AuthClass::All);
    }

    #[test]
    fn the_real_table_validates() {
        validate_table(&crate::table::build_table()).expect("shipped microcode table must be internally consistent");
    }
}
