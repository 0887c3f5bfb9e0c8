//! The static state transition table, keyed by `(from_state, auth_class)`,
//! see §4.5. Constructed once at startup and validated by
//! [crate::state::validate_table].

use isakmp::v1::AuthClass;
use isakmp::v1::PayloadType;

use crate::digest::HashRequirement;
use crate::handlers;
use crate::state::State;
use crate::state::Transition;
use crate::state::TransitionFlags;
use crate::timer::TimerEvent;

const SA: &[PayloadType] = &[PayloadType::SecurityAssociation];
const KE_NONCE: &[PayloadType] = &[PayloadType::KeyExchange, PayloadType::Nonce];
const ID_HASH: &[PayloadType] = &[PayloadType::Identification, PayloadType::Hash];
const HASH_ONLY: &[PayloadType] = &[PayloadType::Hash];
const HASH_SA_NONCE: &[PayloadType] = &[PayloadType::Hash, PayloadType::SecurityAssociation, PayloadType::Nonce];
const ATTRIBUTE: &[PayloadType] = &[PayloadType::Attribute];
const HASH_ATTRIBUTE: &[PayloadType] = &[PayloadType::Hash, PayloadType::Attribute];
const NONE: &[PayloadType] = &[];
const VENDOR_OPT: &[PayloadType] = &[PayloadType::VendorID];
const ID_OPT: &[PayloadType] = &[PayloadType::Identification, PayloadType::Certificate, PayloadType::CertificateRequest];

/// Build the full, immutable microcode table for every state, auth-class pair.
pub fn build_table() -> Vec<Transition> {
    vec![
        // --- Main Mode -----------------------------------------------------
        Transition {
            from_state: State::MAIN_R0,
            to_state: Some(State::MAIN_R1),
            auth_class: AuthClass::All,
            required_payloads: SA,
            optional_payloads: VENDOR_OPT,
            timer_event: TimerEvent::SoDiscard,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::REPLY,
            handler: handlers::main_mode::main_r0,
        },
        Transition {
            from_state: State::MAIN_I1,
            to_state: Some(State::MAIN_I2),
            auth_class: AuthClass::All,
            required_payloads: SA,
            optional_payloads: VENDOR_OPT,
            timer_event: TimerEvent::Retransmit,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::REPLY,
            handler: handlers::main_mode::main_i1,
        },
        Transition {
            from_state: State::MAIN_R1,
            to_state: Some(State::MAIN_R2),
            auth_class: AuthClass::All,
            required_payloads: KE_NONCE,
            optional_payloads: VENDOR_OPT,
            timer_event: TimerEvent::SoDiscard,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::REPLY | TransitionFlags::RETRANSMIT_ON_DUPLICATE,
            handler: handlers::main_mode::main_r1,
        },
        Transition {
            from_state: State::MAIN_I2,
            to_state: Some(State::MAIN_I3),
            auth_class: AuthClass::Psk,
            required_payloads: KE_NONCE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Retransmit,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::INITIATOR | TransitionFlags::REPLY | TransitionFlags::OUTPUT_ENCRYPTED,
            handler: handlers::main_mode::main_i2,
        },
        Transition {
            from_state: State::MAIN_I2,
            to_state: Some(State::MAIN_I3),
            auth_class: AuthClass::DigitalSignature,
            required_payloads: KE_NONCE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Retransmit,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::INITIATOR | TransitionFlags::REPLY | TransitionFlags::OUTPUT_ENCRYPTED,
            handler: handlers::main_mode::main_i2,
        },
        Transition {
            from_state: State::MAIN_I2,
            to_state: Some(State::MAIN_I3),
            auth_class: AuthClass::PublicKeyEncryption,
            required_payloads: KE_NONCE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Retransmit,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::INITIATOR | TransitionFlags::REPLY | TransitionFlags::OUTPUT_ENCRYPTED,
            handler: handlers::main_mode::main_i2,
        },
        Transition {
            from_state: State::MAIN_I2,
            to_state: Some(State::MAIN_I3),
            auth_class: AuthClass::RevisedPublicKeyEncryption,
            required_payloads: KE_NONCE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Retransmit,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::INITIATOR | TransitionFlags::REPLY | TransitionFlags::OUTPUT_ENCRYPTED,
            handler: handlers::main_mode::main_i2,
        },
        Transition {
            from_state: State::MAIN_R2,
            to_state: Some(State::MAIN_R3),
            auth_class: AuthClass::Psk,
            required_payloads: ID_HASH,
            optional_payloads: ID_OPT,
            timer_event: TimerEvent::SaReplace,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::REPLY
                | TransitionFlags::INPUT_ENCRYPTED
                | TransitionFlags::OUTPUT_ENCRYPTED
                | TransitionFlags::FIRST_ENCRYPTED_INPUT
                | TransitionFlags::RELEASE_PENDING_P2,
            handler: handlers::main_mode::main_r2,
        },
        Transition {
            from_state: State::MAIN_R2,
            to_state: Some(State::MAIN_R3),
            auth_class: AuthClass::DigitalSignature,
            required_payloads: ID_HASH,
            optional_payloads: ID_OPT,
            timer_event: TimerEvent::SaReplace,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::REPLY
                | TransitionFlags::INPUT_ENCRYPTED
                | TransitionFlags::OUTPUT_ENCRYPTED
                | TransitionFlags::FIRST_ENCRYPTED_INPUT
                | TransitionFlags::RELEASE_PENDING_P2,
            handler: handlers::main_mode::main_r2,
        },
        Transition {
            from_state: State::MAIN_R2,
            to_state: Some(State::MAIN_R3),
            auth_class: AuthClass::PublicKeyEncryption,
            required_payloads: ID_HASH,
            optional_payloads: ID_OPT,
            timer_event: TimerEvent::SaReplace,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::REPLY
                | TransitionFlags::INPUT_ENCRYPTED
                | TransitionFlags::OUTPUT_ENCRYPTED
                | TransitionFlags::FIRST_ENCRYPTED_INPUT
                | TransitionFlags::RELEASE_PENDING_P2,
            handler: handlers::main_mode::main_r2,
        },
        Transition {
            from_state: State::MAIN_R2,
            to_state: Some(State::MAIN_R3),
            auth_class: AuthClass::RevisedPublicKeyEncryption,
            required_payloads: ID_HASH,
            optional_payloads: ID_OPT,
            timer_event: TimerEvent::SaReplace,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::REPLY
                | TransitionFlags::INPUT_ENCRYPTED
                | TransitionFlags::OUTPUT_ENCRYPTED
                | TransitionFlags::FIRST_ENCRYPTED_INPUT
                | TransitionFlags::RELEASE_PENDING_P2,
            handler: handlers::main_mode::main_r2,
        },
        Transition {
            from_state: State::MAIN_I3,
            to_state: Some(State::MAIN_I4),
            auth_class: AuthClass::All,
            required_payloads: ID_HASH,
            optional_payloads: ID_OPT,
            timer_event: TimerEvent::SaReplace,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::INITIATOR
                | TransitionFlags::INPUT_ENCRYPTED
                | TransitionFlags::FIRST_ENCRYPTED_INPUT
                | TransitionFlags::RELEASE_PENDING_P2,
            handler: handlers::main_mode::main_i3,
        },
        Transition {
            from_state: State::MAIN_R3,
            to_state: None,
            auth_class: AuthClass::All,
            required_payloads: NONE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Null,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::empty(),
            handler: handlers::main_mode::main_r3,
        },
        Transition {
            from_state: State::MAIN_I4,
            to_state: None,
            auth_class: AuthClass::All,
            required_payloads: NONE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Null,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::empty(),
            handler: handlers::main_mode::main_i4,
        },
        // --- Aggressive Mode -------------------------------------------------
        Transition {
            from_state: State::AGGR_R0,
            to_state: Some(State::AGGR_R1),
            auth_class: AuthClass::All,
            required_payloads: &[
                PayloadType::SecurityAssociation,
                PayloadType::KeyExchange,
                PayloadType::Nonce,
                PayloadType::Identification,
            ],
            optional_payloads: VENDOR_OPT,
            timer_event: TimerEvent::SoDiscard,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::REPLY,
            handler: handlers::aggressive_mode::aggr_r0,
        },
        Transition {
            from_state: State::AGGR_I1,
            to_state: Some(State::AGGR_I2),
            auth_class: AuthClass::Psk,
            required_payloads: &[
                PayloadType::SecurityAssociation,
                PayloadType::KeyExchange,
                PayloadType::Nonce,
                PayloadType::Identification,
                PayloadType::Hash,
            ],
            optional_payloads: VENDOR_OPT,
            timer_event: TimerEvent::Retransmit,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::INITIATOR | TransitionFlags::REPLY | TransitionFlags::OUTPUT_ENCRYPTED,
            handler: handlers::aggressive_mode::aggr_i1,
        },
        Transition {
            from_state: State::AGGR_I1,
            to_state: Some(State::AGGR_I2),
            auth_class: AuthClass::DigitalSignature,
            required_payloads: &[
                PayloadType::SecurityAssociation,
                PayloadType::KeyExchange,
                PayloadType::Nonce,
                PayloadType::Identification,
                PayloadType::Signature,
            ],
            optional_payloads: VENDOR_OPT,
            timer_event: TimerEvent::Retransmit,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::INITIATOR | TransitionFlags::REPLY | TransitionFlags::OUTPUT_ENCRYPTED,
            handler: handlers::aggressive_mode::aggr_i1,
        },
        Transition {
            from_state: State::AGGR_I1,
            to_state: Some(State::AGGR_I2),
            auth_class: AuthClass::PublicKeyEncryption,
            required_payloads: &[
                PayloadType::SecurityAssociation,
                PayloadType::KeyExchange,
                PayloadType::Nonce,
                PayloadType::Identification,
            ],
            optional_payloads: VENDOR_OPT,
            timer_event: TimerEvent::Retransmit,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::INITIATOR | TransitionFlags::REPLY | TransitionFlags::OUTPUT_ENCRYPTED,
            handler: handlers::aggressive_mode::aggr_i1,
        },
        Transition {
            from_state: State::AGGR_I1,
            to_state: Some(State::AGGR_I2),
            auth_class: AuthClass::RevisedPublicKeyEncryption,
            required_payloads: &[
                PayloadType::SecurityAssociation,
                PayloadType::KeyExchange,
                PayloadType::Nonce,
                PayloadType::Identification,
            ],
            optional_payloads: VENDOR_OPT,
            timer_event: TimerEvent::Retransmit,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::INITIATOR | TransitionFlags::REPLY | TransitionFlags::OUTPUT_ENCRYPTED,
            handler: handlers::aggressive_mode::aggr_i1,
        },
        Transition {
            from_state: State::AGGR_R1,
            to_state: Some(State::AGGR_R2),
            auth_class: AuthClass::All,
            required_payloads: HASH_ONLY,
            optional_payloads: NONE,
            timer_event: TimerEvent::SaReplace,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::INPUT_ENCRYPTED
                | TransitionFlags::FIRST_ENCRYPTED_INPUT
                | TransitionFlags::RELEASE_PENDING_P2,
            handler: handlers::aggressive_mode::aggr_r1,
        },
        Transition {
            from_state: State::AGGR_I2,
            to_state: None,
            auth_class: AuthClass::All,
            required_payloads: NONE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Null,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::empty(),
            handler: handlers::aggressive_mode::aggr_i2,
        },
        Transition {
            from_state: State::AGGR_R2,
            to_state: None,
            auth_class: AuthClass::All,
            required_payloads: NONE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Null,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::empty(),
            handler: handlers::aggressive_mode::aggr_r2,
        },
        // --- Quick Mode ------------------------------------------------------
        Transition {
            from_state: State::QUICK_R0,
            to_state: Some(State::QUICK_R1),
            auth_class: AuthClass::All,
            required_payloads: HASH_SA_NONCE,
            optional_payloads: &[PayloadType::Identification],
            timer_event: TimerEvent::SoDiscard,
            hash_type: HashRequirement::Quick1,
            flags: TransitionFlags::REPLY | TransitionFlags::INPUT_ENCRYPTED | TransitionFlags::OUTPUT_ENCRYPTED,
            handler: handlers::quick_mode::quick_r0,
        },
        Transition {
            from_state: State::QUICK_I1,
            to_state: Some(State::QUICK_I2),
            auth_class: AuthClass::All,
            required_payloads: HASH_SA_NONCE,
            optional_payloads: &[PayloadType::Identification],
            timer_event: TimerEvent::SaReplace,
            hash_type: HashRequirement::Quick2,
            flags: TransitionFlags::INITIATOR
                | TransitionFlags::REPLY
                | TransitionFlags::INPUT_ENCRYPTED
                | TransitionFlags::OUTPUT_ENCRYPTED,
            handler: handlers::quick_mode::quick_i1,
        },
        Transition {
            from_state: State::QUICK_R1,
            to_state: Some(State::QUICK_R2),
            auth_class: AuthClass::All,
            required_payloads: HASH_ONLY,
            optional_payloads: NONE,
            timer_event: TimerEvent::SaReplace,
            hash_type: HashRequirement::Quick3,
            flags: TransitionFlags::INPUT_ENCRYPTED,
            handler: handlers::quick_mode::quick_r1,
        },
        Transition {
            from_state: State::QUICK_I2,
            to_state: None,
            auth_class: AuthClass::All,
            required_payloads: NONE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Null,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::empty(),
            handler: handlers::quick_mode::quick_i2,
        },
        Transition {
            from_state: State::QUICK_R2,
            to_state: None,
            auth_class: AuthClass::All,
            required_payloads: NONE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Null,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::empty(),
            handler: handlers::quick_mode::quick_r2,
        },
        // --- Informational -----------------------------------------------------
        Transition {
            from_state: State::INFO,
            to_state: None,
            auth_class: AuthClass::All,
            required_payloads: NONE,
            optional_payloads: &[PayloadType::Notification, PayloadType::Delete],
            timer_event: TimerEvent::Null,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::empty(),
            handler: handlers::informational::info,
        },
        Transition {
            from_state: State::INFO_PROTECTED,
            to_state: None,
            auth_class: AuthClass::All,
            required_payloads: HASH_ONLY,
            optional_payloads: &[PayloadType::Notification, PayloadType::Delete],
            timer_event: TimerEvent::Null,
            hash_type: HashRequirement::InformationalHash,
            flags: TransitionFlags::REPLY | TransitionFlags::INPUT_ENCRYPTED | TransitionFlags::OUTPUT_ENCRYPTED,
            handler: handlers::informational::info_protected,
        },
        // --- XAUTH ------------------------------------------------------------
        Transition {
            from_state: State::XAUTH_I0,
            to_state: Some(State::XAUTH_I1),
            auth_class: AuthClass::All,
            required_payloads: NONE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Retransmit,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::INITIATOR | TransitionFlags::XAUTH_AUTH,
            handler: handlers::xauth::xauth_i0,
        },
        Transition {
            from_state: State::XAUTH_I1,
            to_state: Some(State::XAUTH_I0),
            auth_class: AuthClass::All,
            required_payloads: HASH_ATTRIBUTE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Retransmit,
            hash_type: HashRequirement::InformationalHash,
            flags: TransitionFlags::INITIATOR
                | TransitionFlags::REPLY
                | TransitionFlags::INPUT_ENCRYPTED
                | TransitionFlags::OUTPUT_ENCRYPTED
                | TransitionFlags::XAUTH_AUTH,
            handler: handlers::xauth::xauth_i1,
        },
        Transition {
            from_state: State::XAUTH_R0,
            to_state: Some(State::XAUTH_R1),
            auth_class: AuthClass::All,
            required_payloads: NONE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Retransmit,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::REPLY | TransitionFlags::OUTPUT_ENCRYPTED | TransitionFlags::XAUTH_AUTH,
            handler: handlers::xauth::xauth_r0,
        },
        Transition {
            from_state: State::XAUTH_R1,
            to_state: Some(State::MODE_CFG_R0),
            auth_class: AuthClass::All,
            required_payloads: HASH_ATTRIBUTE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Retransmit,
            hash_type: HashRequirement::InformationalHash,
            flags: TransitionFlags::REPLY
                | TransitionFlags::INPUT_ENCRYPTED
                | TransitionFlags::OUTPUT_ENCRYPTED
                | TransitionFlags::XAUTH_AUTH,
            handler: handlers::xauth::xauth_r1,
        },
        // --- Mode-Config --------------------------------------------------------
        Transition {
            from_state: State::MODE_CFG_I1,
            to_state: Some(State::MODE_CFG_R2),
            auth_class: AuthClass::All,
            required_payloads: NONE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Retransmit,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::INITIATOR | TransitionFlags::REPLY | TransitionFlags::OUTPUT_ENCRYPTED,
            handler: handlers::mode_config::mode_cfg_i1,
        },
        Transition {
            from_state: State::MODE_CFG_R0,
            to_state: Some(State::MODE_CFG_R1),
            auth_class: AuthClass::All,
            required_payloads: HASH_ATTRIBUTE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Retransmit,
            hash_type: HashRequirement::InformationalHash,
            flags: TransitionFlags::REPLY | TransitionFlags::INPUT_ENCRYPTED | TransitionFlags::OUTPUT_ENCRYPTED,
            handler: handlers::mode_config::mode_cfg_r0,
        },
        Transition {
            from_state: State::MODE_CFG_R1,
            to_state: Some(State::MODE_CFG_R2),
            auth_class: AuthClass::All,
            required_payloads: HASH_ONLY,
            optional_payloads: ATTRIBUTE,
            timer_event: TimerEvent::SaReplace,
            hash_type: HashRequirement::InformationalHash,
            flags: TransitionFlags::INPUT_ENCRYPTED | TransitionFlags::RELEASE_PENDING_P2,
            handler: handlers::mode_config::mode_cfg_r1,
        },
        Transition {
            from_state: State::MODE_CFG_R2,
            to_state: None,
            auth_class: AuthClass::All,
            required_payloads: NONE,
            optional_payloads: NONE,
            timer_event: TimerEvent::Null,
            hash_type: HashRequirement::None,
            flags: TransitionFlags::empty(),
            handler: handlers::mode_config::mode_cfg_r2,
        },
    ]
}
