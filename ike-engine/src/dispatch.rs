//! Transition Dispatcher, see §4.6: the single place that turns a
//! [HandlerResult] into state advancement, timer arming, retransmit-buffer
//! bookkeeping and reply transmission. Handlers never touch any of this
//! directly.

use std::time::Duration;

use isakmp::v1::generator::message::assemble;
use isakmp::v1::generator::payloads;
use isakmp::v1::generator::payloads::RawPayload;
use isakmp::v1::DomainOfInterpretation;
use isakmp::v1::ExchangeType;
use isakmp::v1::PayloadType;
use isakmp::v1::FLAG_ENCRYPTION;
use tracing::debug;
use tracing::warn;

use crate::config::EngineConfig;
use crate::crypto::CryptoProvider;
use crate::digest::MessageDigest;
use crate::integrity::seed_phase2_iv;
use crate::kernel::KernelInstaller;
use crate::policy::PolicyProvider;
use crate::result::HandlerResult;
use crate::sa::IkeSa;
use crate::sa::QuickModeRequest;
use crate::sa::Role;
use crate::state::State;
use crate::state::Transition;
use crate::state::TransitionFlags;
use crate::timer::ArmedTimer;

/// What the caller (the engine's main loop) should do after a dispatch pass.
pub enum DispatchAction {
    /// Nothing further; the SA stays as it is.
    None,
    /// Transmit this buffer to the SA's peer.
    Transmit(Vec<u8>),
    /// Transmit several buffers to the SA's peer, in order (a reply plus any
    /// Quick Mode initiations released by [TransitionFlags::RELEASE_PENDING_P2]).
    TransmitMany(Vec<Vec<u8>>),
    /// Tear down the SA entirely (no further messages will be accepted for it).
    TearDown,
}

/// Run `transition`'s handler against `digest`, then apply its [HandlerResult]
/// to `sa` per the rules of §4.6.
#[allow(clippy::too_many_arguments)]
pub fn dispatch(
    sa: &mut IkeSa,
    digest: &MessageDigest,
    transition: &Transition,
    crypto: &dyn CryptoProvider,
    kernel: &dyn KernelInstaller,
    policy: &dyn PolicyProvider,
    config: &EngineConfig,
) -> DispatchAction {
    let mut reply: Vec<RawPayload> = Vec::new();
    let outcome = {
        let mut ctx = crate::handlers::HandlerContext {
            sa,
            digest,
            crypto,
            kernel,
            policy,
            config,
            reply: &mut reply,
        };
        (transition.handler)(&mut ctx)
    };

    match outcome {
        HandlerResult::Suspend => {
            sa.suspended = Some(digest.clone());
            DispatchAction::None
        }
        HandlerResult::Ignore => DispatchAction::None,
        HandlerResult::Ok => apply_success(sa, digest, transition, &reply, crypto, config),
        HandlerResult::Fail(notify) => {
            warn!(code = ?notify, state = ?sa.state, "transition failed");
            if transition.from_state.is_phase1_established() || sa.is_established() {
                // Quick-Mode-only failures tear down just the in-flight negotiation;
                // the Phase-1 SA survives to retry.
                DispatchAction::None
            } else {
                DispatchAction::TearDown
            }
        }
        HandlerResult::Fatal => {
            sa.suspended = None;
            DispatchAction::TearDown
        }
        HandlerResult::InternalError => {
            warn!(state = ?sa.state, "internal error processing transition");
            sa.suspended = None;
            DispatchAction::None
        }
    }
}

fn apply_success(
    sa: &mut IkeSa,
    digest: &MessageDigest,
    transition: &Transition,
    reply: &[RawPayload],
    crypto: &dyn CryptoProvider,
    config: &EngineConfig,
) -> DispatchAction {
    sa.suspended = None;
    sa.state = transition.resolved_to_state();

    arm_timer(sa, transition);

    let mut outgoing: Vec<Vec<u8>> = Vec::new();

    if !transition.flags.contains(TransitionFlags::REPLY) || reply.is_empty() {
        // no primary reply to send
    } else {
        let flags = if transition.flags.contains(TransitionFlags::OUTPUT_ENCRYPTED) {
            FLAG_ENCRYPTION
        } else {
            0
        };
        let exchange_type = exchange_type_for(sa.state);
        let message_id = digest.header.message_id;
        let bytes = assemble(sa.initiator_spi, sa.responder_spi, exchange_type, flags, message_id, reply);
        sa.last_sent = Some(bytes.clone());
        outgoing.push(bytes);
    }

    if transition.flags.contains(TransitionFlags::RELEASE_PENDING_P2) && !sa.pending_quick_mode.is_empty() {
        let queued = std::mem::take(&mut sa.pending_quick_mode);
        debug!(count = queued.len(), "releasing queued Quick Mode negotiations");
        for request in &queued {
            if let Some(bytes) = fire_quick_mode(sa, crypto, request) {
                outgoing.push(bytes);
            } else {
                warn!(connection = %sa.connection.name, "failed to fire a queued Quick Mode initiation");
            }
        }
    }

    if config.softremote_workaround_default && sa.connection.softremote_workaround {
        sa.hidden.modecfg_vars_set = sa.hidden.modecfg_vars_set || sa.state == State::MODE_CFG_R2;
    }

    match outgoing.len() {
        0 => DispatchAction::None,
        1 => DispatchAction::Transmit(outgoing.into_iter().next().unwrap()),
        _ => DispatchAction::TransmitMany(outgoing),
    }
}

/// Build and transmit the first message (`HASH(1), SA, Ni, IDci, IDcr`) of one
/// queued [QuickModeRequest], reserving a fresh message-id and seeding the
/// Phase-2 IV from it, per §4.1/§4.4.
fn fire_quick_mode(sa: &mut IkeSa, crypto: &dyn CryptoProvider, request: &QuickModeRequest) -> Option<Vec<u8>> {
    let oakley = sa.oakley.clone()?;

    let mut msgid_bytes = [0u8; 4];
    let msgid = loop {
        crypto.random(&mut msgid_bytes).ok()?;
        let candidate = u32::from_be_bytes(msgid_bytes);
        if sa.msgids.reserve(candidate) {
            break candidate;
        }
    };

    seed_phase2_iv(sa, crypto, oakley.integrity, msgid);

    let mut nonce = vec![0u8; 32];
    crypto.random(&mut nonce).ok()?;

    let reply = vec![
        payloads::hash(&[]),
        payloads::security_association(DomainOfInterpretation::Ipsec, &[], &[]),
        payloads::nonce(&nonce),
        RawPayload { payload_type: PayloadType::Identification, body: request.local_id.clone() },
        RawPayload { payload_type: PayloadType::Identification, body: request.remote_id.clone() },
    ];

    let bytes = assemble(sa.initiator_spi, sa.responder_spi, ExchangeType::QuickMode, FLAG_ENCRYPTION, msgid, &reply);
    sa.last_sent = Some(bytes.clone());
    sa.timer = Some(ArmedTimer::retransmit_initial());
    Some(bytes)
}

fn arm_timer(sa: &mut IkeSa, transition: &Transition) {
    use crate::timer::TimerEvent;

    sa.timer = match transition.timer_event {
        TimerEvent::Null => None,
        TimerEvent::Retransmit => Some(ArmedTimer::retransmit_initial()),
        TimerEvent::SaReplace => Some(ArmedTimer::sa_replace(rekey_delay(sa))),
        TimerEvent::SoDiscard => Some(ArmedTimer::so_discard(so_discard_lifetime(sa))),
    };
}

/// Fraction of the governing lifetime reserved as rekey margin.
const REKEY_MARGIN_FRACTION: f64 = 0.1;
/// How far the initiator's margin is randomly fuzzed, as a fraction of itself.
const REKEY_FUZZ_FRACTION: f64 = 0.2;

/// Rekey-timer delay for a freshly established SA, per §4.6: the governing
/// lifetime minus a rekey margin, unless `DONT_REKEY` applies, in which case
/// the SA is left to run to expiry instead of being scheduled for an early
/// replacement.
fn rekey_delay(sa: &IkeSa) -> Duration {
    let governing = governing_lifetime(sa);
    if sa.connection.dont_rekey {
        governing
    } else {
        apply_rekey_margin(sa, governing)
    }
}

fn so_discard_lifetime(sa: &IkeSa) -> Duration {
    governing_lifetime(sa)
}

/// The lifetime a rekey or discard timer is measured against, before any
/// margin is subtracted.
fn governing_lifetime(sa: &IkeSa) -> Duration {
    if sa.state.is_phase1_established() {
        phase1_governing_lifetime(sa)
    } else {
        phase2_governing_lifetime(sa)
    }
}

/// Compare the locally configured `sa_ike_life` against the negotiated Oakley
/// lifetime; accept the peer's (longer) value if `DONT_REKEY` applies or the
/// peer simply negotiated a longer lifetime than our own default.
fn phase1_governing_lifetime(sa: &IkeSa) -> Duration {
    let local_life = sa.connection.phase1_lifetime;
    let negotiated = sa.oakley.as_ref().map_or(local_life, |o| o.lifetime);
    if sa.connection.dont_rekey || negotiated > local_life {
        negotiated
    } else {
        local_life
    }
}

/// The minimum across `sa_ipsec_life` and every per-protocol lifetime seen in
/// the most recent Quick Mode proposal (AH/ESP/IPComp), per §4.6.
fn phase2_governing_lifetime(sa: &IkeSa) -> Duration {
    [
        Some(sa.connection.phase2_lifetime),
        sa.phase2_lifetimes.ah,
        sa.phase2_lifetimes.esp,
        sa.phase2_lifetimes.ipcomp,
    ]
    .into_iter()
    .flatten()
    .min()
    .unwrap_or(sa.connection.phase2_lifetime)
}

/// Subtract the rekey margin from `lifetime`: the initiator randomizes its
/// margin to avoid both peers rekeying in lockstep, the responder halves its
/// margin since it only reacts to the initiator's renegotiation.
fn apply_rekey_margin(sa: &IkeSa, lifetime: Duration) -> Duration {
    use rand::Rng;

    let margin = lifetime.mul_f64(REKEY_MARGIN_FRACTION);
    let margin = if sa.role == Role::Initiator {
        let fuzz = rand::thread_rng().gen_range(1.0 - REKEY_FUZZ_FRACTION..=1.0 + REKEY_FUZZ_FRACTION);
        margin.mul_f64(fuzz)
    } else {
        margin.mul_f64(0.5)
    };
    lifetime.checked_sub(margin).unwrap_or(lifetime)
}

fn exchange_type_for(state: State) -> ExchangeType {
    match state {
        State::MAIN_R0
        | State::MAIN_I1
        | State::MAIN_R1
        | State::MAIN_I2
        | State::MAIN_R2
        | State::MAIN_I3
        | State::MAIN_R3
        | State::MAIN_I4 => ExchangeType::IdentityProtection,
        State::AGGR_R0 | State::AGGR_I1 | State::AGGR_R1 | State::AGGR_I2 | State::AGGR_R2 => {
            ExchangeType::Aggressive
        }
        State::QUICK_R0 | State::QUICK_I1 | State::QUICK_R1 | State::QUICK_I2 | State::QUICK_R2 => {
            ExchangeType::QuickMode
        }
        State::INFO | State::INFO_PROTECTED => ExchangeType::Informational,
        State::XAUTH_I0
        | State::XAUTH_I1
        | State::XAUTH_R0
        | State::XAUTH_R1
        | State::MODE_CFG_I1
        | State::MODE_CFG_R0
        | State::MODE_CFG_R1
        | State::MODE_CFG_R2 => ExchangeType::Transaction,
    }
}
