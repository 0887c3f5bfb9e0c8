//! The single-threaded cooperative event loop, see §5: one `tokio::select!`
//! pump reading both the ISAKMP and NAT-T UDP sockets, ticking the timer
//! wheel, and draining helper-completion notices, feeding every inbound
//! datagram through the same demultiplex → reassemble → integrity →
//! decode → dispatch pipeline.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use isakmp::v1::parser::header::parse_header;
use isakmp::v1::parser::parse_packet;
use isakmp::v1::NotifyMessageType;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::time::interval;
use tokio::time::Duration as TokioDuration;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::config::EngineConfig;
use crate::crypto::CryptoProvider;
use crate::demux::create_responder_sa;
use crate::demux::demultiplex;
use crate::demux::DemuxOutcome;
use crate::demux::SaKey;
use crate::digest::HashRequirement;
use crate::digest::MessageDigest;
use crate::dispatch::dispatch;
use crate::dispatch::DispatchAction;
use crate::duplicate::check as check_duplicate;
use crate::duplicate::DuplicateOutcome;
use crate::error::EngineError;
use crate::error::IntakeError;
use crate::integrity::decrypt_body;
use crate::integrity::seed_phase2_iv;
use crate::integrity::verify_hash;
use crate::kernel::KernelInstaller;
use crate::policy::PolicyProvider;
use crate::reassembly::accept_fragment;
use crate::reassembly::IncomingFragment;
use crate::reassembly::ReassemblyOutcome;
use crate::state::lookup;
use crate::state::validate_table;
use crate::state::State;
use crate::state::Transition;
use crate::table::build_table;
use crate::timer::ArmedTimer;
use crate::timer::TimerEvent;

/// The 4-byte all-zero marker that distinguishes a NAT-T ISAKMP datagram from
/// an ESP one arriving on the same port.
const NON_ESP_MARKER: [u8; 4] = [0; 4];

/// Maximum UDP datagram this engine will accept.
const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Everything the engine needs from its host application.
pub struct Engine {
    config: EngineConfig,
    crypto: Arc<dyn CryptoProvider>,
    kernel: Arc<dyn KernelInstaller>,
    policy: Arc<dyn PolicyProvider>,
    table: Vec<Transition>,
    sas: HashMap<SaKey, crate::sa::IkeSa>,
}

impl Engine {
    /// Build an engine, validating the microcode table at construction time
    /// per §8's "table self-validates before first use" property.
    pub fn new(
        config: EngineConfig,
        crypto: Arc<dyn CryptoProvider>,
        kernel: Arc<dyn KernelInstaller>,
        policy: Arc<dyn PolicyProvider>,
    ) -> Result<Self, EngineError> {
        let table = build_table();
        validate_table(&table)?;
        Ok(Self {
            config,
            crypto,
            kernel,
            policy,
            table,
            sas: HashMap::new(),
        })
    }

    /// Run the event loop until one of the sockets errors out.
    pub async fn run(mut self) -> Result<(), EngineError> {
        let isakmp_socket = UdpSocket::bind(self.config.listen).await?;
        let nat_t_socket = UdpSocket::bind(self.config.listen_nat_t).await?;
        let (helper_tx, mut helper_rx) = mpsc::unbounded_channel::<SaKey>();
        self.crypto.set_completion_channel(helper_tx);
        let mut ticker = interval(TokioDuration::from_secs(1));

        let mut isakmp_buf = vec![0u8; MAX_DATAGRAM_SIZE];
        let mut nat_t_buf = vec![0u8; MAX_DATAGRAM_SIZE];

        loop {
            tokio::select! {
                res = isakmp_socket.recv_from(&mut isakmp_buf) => {
                    let (len, peer) = res?;
                    self.handle_datagram(&isakmp_buf[..len], peer, isakmp_socket.local_addr()?, &isakmp_socket).await;
                }
                res = nat_t_socket.recv_from(&mut nat_t_buf) => {
                    let (len, peer) = res?;
                    let body = strip_non_esp_marker(&nat_t_buf[..len]);
                    self.handle_datagram(body, peer, nat_t_socket.local_addr()?, &nat_t_socket).await;
                }
                Some(key) = helper_rx.recv() => {
                    self.resume_suspended(key).await;
                }
                _ = ticker.tick() => {
                    self.tick_timers(&isakmp_socket, &nat_t_socket).await;
                }
            }
        }
    }

    async fn handle_datagram(&mut self, raw: &[u8], peer: SocketAddr, local: SocketAddr, socket: &UdpSocket) {
        match self.process_datagram(raw, peer, local) {
            Ok(Some((key, action))) => self.apply_action(key, action, socket).await,
            Ok(None) => {}
            Err(err) => debug!(%err, "dropping datagram"),
        }
    }

    fn process_datagram(
        &mut self,
        raw: &[u8],
        peer: SocketAddr,
        local: SocketAddr,
    ) -> Result<Option<(SaKey, DispatchAction)>, IntakeError> {
        if raw.len() < 28 {
            return Err(IntakeError::Truncated(peer));
        }
        let header = parse_header(raw).map_err(IntakeError::Parse)?;
        if header.length as usize != raw.len() {
            return Err(IntakeError::LengthMismatch {
                peer,
                declared: header.length,
                actual: raw.len(),
            });
        }

        let outcome = demultiplex(&header, &self.sas);
        let (key, from_state) = match outcome {
            DemuxOutcome::Existing { key, from_state } => (key, from_state),
            DemuxOutcome::New { from_state } => {
                let connection = self
                    .policy
                    .match_by_address(peer.ip())
                    .map_err(|_| IntakeError::NoMatchingSa(peer))?;
                let sa = create_responder_sa(&header, peer, local, from_state, Arc::new(connection));
                let key = (header.initiator_cookie, 0);
                self.sas.insert(key, sa);
                (key, from_state)
            }
            DemuxOutcome::Reject(notify) => {
                if let Some(code) = notify {
                    trace!(?code, "rejecting datagram at demux");
                }
                return Err(IntakeError::NoMatchingSa(peer));
            }
        };

        let duplicate_transition = {
            let sa = self.sas.get(&key).ok_or(IntakeError::NoMatchingSa(peer))?;
            lookup(&self.table, sa.state, sa.oakley.as_ref().map(|o| o.auth_method.auth_class()))
        };
        if let Some(sa) = self.sas.get_mut(&key) {
            match check_duplicate(sa, raw, duplicate_transition, self.config.max_accepted_duplicates) {
                DuplicateOutcome::Fresh => {}
                DuplicateOutcome::Retransmit(bytes) => return Ok(Some((key, DispatchAction::Transmit(bytes)))),
                DuplicateOutcome::Drop => return Ok(None),
            }
        }

        // A fragment's own body is never independently encrypted: the
        // FRAGMENTATION payload wraps a raw share of the original (possibly
        // still-to-be-decrypted) ciphertext, so fragments must be peeled off
        // by inspecting the unencrypted header's next-payload field before any
        // decryption is attempted, not after. See §4.2.
        if header.next_payload == isakmp::v1::PayloadType::IkeFragmentation {
            let fragment_packet = parse_packet(&raw[28..]).map_err(IntakeError::Parse)?;
            let Some(frag) = fragment_packet.fragments.first() else {
                return Err(IntakeError::NoMatchingSa(peer));
            };
            let sa = self.sas.get_mut(&key).ok_or(IntakeError::NoMatchingSa(peer))?;
            let outcome = accept_fragment(
                sa,
                IncomingFragment {
                    fragment_id: frag.fragment_id,
                    index: frag.fragment_number,
                    last: frag.is_last,
                    bytes: frag.data.clone(),
                    next_payload: frag.next_payload,
                },
            );
            return match outcome {
                ReassemblyOutcome::Pending => Ok(None),
                ReassemblyOutcome::Malformed => Err(IntakeError::NoMatchingSa(peer)),
                ReassemblyOutcome::Complete(reassembled, next_payload) => {
                    // Feed the concatenated buffer back through demultiplex, decrypt,
                    // decode and dispatch as an ordinary (now unfragmented) datagram.
                    let datagram = synthesize_reassembled_datagram(&header, next_payload, &reassembled);
                    self.process_datagram(&datagram, peer, local)
                }
            };
        }

        let mut body = raw.to_vec();
        let mut new_iv_set = false;
        if header.flags & isakmp::v1::FLAG_ENCRYPTION != 0 {
            let sa = self.sas.get_mut(&key).ok_or(IntakeError::NoMatchingSa(peer))?;
            if matches!(from_state, State::QUICK_R0 | State::QUICK_I1 | State::INFO_PROTECTED) {
                if let Some(integrity) = sa.oakley.as_ref().map(|o| o.integrity) {
                    seed_phase2_iv(sa, self.crypto.as_ref(), integrity, header.message_id);
                    new_iv_set = true;
                }
            }
            let encrypted_body = &raw[28..];
            body = decrypt_body(sa, self.crypto.as_ref(), encrypted_body)
                .map_err(|_| IntakeError::NoMatchingSa(peer))?;
        }

        let packet = parse_packet(&body).map_err(IntakeError::Parse)?;

        let mut digest = MessageDigest::new(raw.to_vec(), header.clone(), from_state, header.flags & isakmp::v1::FLAG_ENCRYPTION != 0);
        digest.new_iv_set = new_iv_set;
        let Some(sa) = self.sas.get(&key) else {
            return Err(IntakeError::NoMatchingSa(peer));
        };
        let Some(transition) = lookup(&self.table, from_state, sa.oakley.as_ref().map(|o| o.auth_method.auth_class())) else {
            return Err(IntakeError::NoMatchingSa(peer));
        };

        match crate::decoder::decode(packet, transition, &mut digest) {
            crate::decoder::DecodeOutcome::Ok => {}
            crate::decoder::DecodeOutcome::Reject(code) => {
                digest.notify_on_failure = Some(code);
            }
        }

        if transition.hash_type != HashRequirement::None {
            let sa = self.sas.get(&key).ok_or(IntakeError::NoMatchingSa(peer))?;
            let Some(hash_payload) = digest.payloads.hashes.first() else {
                trace!("dropping message missing a required HASH payload");
                return Ok(None);
            };
            let rest = body.get(hash_payload.length as usize..).unwrap_or(&[]);
            let ni_b = digest.payloads.nonces.first().map_or(&[][..], |n| &n.nonce_data);
            let nr_b: &[u8] = &[];
            let verified = verify_hash(
                sa,
                self.crypto.as_ref(),
                transition.hash_type,
                header.message_id,
                ni_b,
                nr_b,
                rest,
                &hash_payload.hash_data,
            );
            if verified.is_err() {
                trace!(state = ?from_state, "dropping message failing the integrity gate");
                return Ok(None);
            }
        }

        let sa = self.sas.get_mut(&key).ok_or(IntakeError::NoMatchingSa(peer))?;
        sa.rpacket = Some(raw.to_vec());
        let action = dispatch(sa, &digest, transition, self.crypto.as_ref(), self.kernel.as_ref(), self.policy.as_ref(), &self.config);
        Ok(Some((key, action)))
    }

    async fn apply_action(&mut self, key: SaKey, action: DispatchAction, socket: &UdpSocket) {
        match action {
            DispatchAction::None => {}
            DispatchAction::Transmit(bytes) => {
                if let Some(sa) = self.sas.get(&key) {
                    if let Err(err) = socket.send_to(&bytes, sa.peer).await {
                        warn!(%err, "failed to send reply");
                    }
                }
            }
            DispatchAction::TransmitMany(buffers) => {
                if let Some(sa) = self.sas.get(&key) {
                    let peer = sa.peer;
                    for bytes in buffers {
                        if let Err(err) = socket.send_to(&bytes, peer).await {
                            warn!(%err, "failed to send reply");
                        }
                    }
                }
            }
            DispatchAction::TearDown => {
                self.sas.remove(&key);
            }
        }
    }

    async fn resume_suspended(&mut self, key: SaKey) {
        let Some(sa) = self.sas.get_mut(&key) else {
            return;
        };
        let Some(digest) = crate::suspend::take_resumable(sa) else {
            return;
        };
        let Some(transition) = lookup(&self.table, digest.from_state, sa.oakley.as_ref().map(|o| o.auth_method.auth_class())) else {
            return;
        };
        let _ = dispatch(sa, &digest, transition, self.crypto.as_ref(), self.kernel.as_ref(), self.policy.as_ref(), &self.config);
    }

    async fn tick_timers(&mut self, isakmp_socket: &UdpSocket, nat_t_socket: &UdpSocket) {
        let mut due = Vec::new();
        for (key, sa) in self.sas.iter() {
            if let Some(timer) = sa.timer {
                if timer.is_due() {
                    due.push((*key, timer));
                }
            }
        }

        for (key, timer) in due {
            let action = match timer.event {
                TimerEvent::Null => TimerAction::None,
                TimerEvent::Retransmit => match self.sas.get(&key).and_then(|sa| sa.last_sent.clone()) {
                    Some(bytes) => match timer.next_retransmit() {
                        Some(next) => TimerAction::Retransmit(bytes, next),
                        None => {
                            warn!(?key, "retransmit budget exhausted, discarding SA");
                            TimerAction::TearDown
                        }
                    },
                    None => TimerAction::TearDown,
                },
                TimerEvent::SaReplace => {
                    warn!(?key, "SA lifetime due for replacement; no rekey-initiation path exists, tearing down");
                    TimerAction::TearDown
                }
                TimerEvent::SoDiscard => {
                    debug!(?key, "SA lifetime expired, discarding");
                    TimerAction::TearDown
                }
            };

            match action {
                TimerAction::None => {}
                TimerAction::Retransmit(bytes, next) => {
                    let peer = match self.sas.get(&key) {
                        Some(sa) => sa.peer,
                        None => continue,
                    };
                    let socket = self.socket_for(&key, isakmp_socket, nat_t_socket);
                    if let Err(err) = socket.send_to(&bytes, peer).await {
                        warn!(%err, ?key, "timer-driven retransmit failed");
                    }
                    if let Some(sa) = self.sas.get_mut(&key) {
                        sa.timer = Some(next);
                    }
                }
                TimerAction::TearDown => {
                    self.sas.remove(&key);
                }
            }
        }
    }

    /// Pick the listener an SA's traffic arrived on, so timer-driven
    /// retransmits go out the same socket as the original exchange.
    fn socket_for<'a>(&self, key: &SaKey, isakmp_socket: &'a UdpSocket, nat_t_socket: &'a UdpSocket) -> &'a UdpSocket {
        match self.sas.get(key) {
            Some(sa) if sa.local.port() == self.config.listen_nat_t.port() => nat_t_socket,
            _ => isakmp_socket,
        }
    }
}

/// What a single armed timer's expiry should do, computed while holding only
/// shared borrows so the follow-up mutation loop can borrow `self.sas` freely.
enum TimerAction {
    /// Nothing to do (only reachable for a timer that is armed but `Null`).
    None,
    /// Resend this buffer and rearm with the given backed-off timer.
    Retransmit(Vec<u8>, ArmedTimer),
    /// Remove the SA entirely.
    TearDown,
}

/// Rebuild a complete ISAKMP datagram around a reassembled fragment buffer,
/// reusing the original message's header fields and patching in the real
/// next-payload type and the updated total length.
fn synthesize_reassembled_datagram(
    header: &isakmp::v1::parser::definitions::Header,
    next_payload: isakmp::v1::PayloadType,
    body: &[u8],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(28 + body.len());
    out.extend_from_slice(&header.initiator_cookie.to_be_bytes());
    out.extend_from_slice(&header.responder_cookie.to_be_bytes());
    out.push(next_payload as u8);
    out.push((header.major_version << 4) | (header.minor_version & 0x0F));
    out.push(header.exchange_mode as u8);
    out.push(header.flags);
    out.extend_from_slice(&header.message_id.to_be_bytes());
    out.extend_from_slice(&(28u32 + body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
    out
}

fn strip_non_esp_marker(buf: &[u8]) -> &[u8] {
    if buf.len() >= 4 && buf[..4] == NON_ESP_MARKER {
        &buf[4..]
    } else {
        buf
    }
}

/// Notification used when a datagram cannot be attributed to any SA or
/// demultiplex rule.
pub const NO_MATCH: NotifyMessageType = NotifyMessageType::InvalidCookie;
