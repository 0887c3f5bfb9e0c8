//! The IKE SA: one Phase-1 security association in progress or established,
//! see §3 Data Model.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use isakmp::v1::AuthenticationMethod;
use isakmp::v1::EncryptionAlgorithm;
use isakmp::v1::GroupDescription;
use isakmp::v1::HashAlgorithm;
use isakmp::v1::PayloadType;

use crate::crypto::SkeyidSet;
use crate::digest::MessageDigest;
use crate::policy::Connection;
use crate::state::State;
use crate::timer::ArmedTimer;

/// Role an [IkeSa] plays in its Phase-1 exchange; exactly one per SA, per §3's
/// invariant "exactly one of {initiator, responder} role per SA".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// We sent the first Main/Aggressive Mode message
    Initiator,
    /// We received the first Main/Aggressive Mode message
    Responder,
}

/// Negotiated Oakley (Phase-1 IKE SA) parameters, once a proposal has been
/// chosen.
#[derive(Debug, Clone)]
pub struct OakleyParams {
    /// Chosen authentication method
    pub auth_method: AuthenticationMethod,
    /// Chosen symmetric cipher
    pub cipher: EncryptionAlgorithm,
    /// Chosen integrity/hash algorithm
    pub integrity: HashAlgorithm,
    /// Chosen Diffie-Hellman group
    pub group: GroupDescription,
    /// Negotiated key size in bits, if the cipher is variable-length
    pub key_bits: Option<u16>,
    /// Negotiated SA lifetime
    pub lifetime: Duration,
}

/// IV chain carried by an [IkeSa], see §4.4.
#[derive(Debug, Clone, Default)]
pub struct IvChain {
    /// Current IV used to decrypt/encrypt the next Phase-1 message
    pub iv: Vec<u8>,
    /// Phase-2 IV, seeded from `phase1_iv ^ msgid` on the first message of an exchange
    pub new_iv: Vec<u8>,
    /// The Phase-1 IV at the moment Phase-1 completed, used to seed `new_iv`
    pub phase1_iv: Vec<u8>,
}

/// Hidden/implicit variables carried on an [IkeSa], see §3.
#[derive(Debug, Clone, Default)]
pub struct HiddenVars {
    /// XAUTH sub-exchange completed
    pub xauth_done: bool,
    /// Mode-Config variables have been set by the peer
    pub modecfg_vars_set: bool,
    /// SKEYID/SKEYID_a/d/e have been derived
    pub skeyid_calculated: bool,
    /// Count of malformed-payload notifications received from the peer
    pub malformed_received: u32,
    /// Count of malformed-payload notifications we have sent
    pub malformed_sent: u32,
    /// Peer has advertised DPD support via vendor ID
    pub peer_supports_dpd: bool,
    /// Peer has advertised the fragmentation vendor ID
    pub seen_fragmentation_vid: bool,
    /// Peer has advertised the Nortel vendor ID
    pub seen_nortel_vid: bool,
}

/// Reservation book for Phase-2/1.5 message IDs, see §3.
#[derive(Debug, Clone, Default)]
pub struct MessageIdBook {
    /// Message IDs already claimed by an in-progress or completed Quick/Mode-Config exchange
    pub reserved: Vec<u32>,
    /// Message ID of the currently active Phase-1.5 (XAUTH/Mode-Config) exchange, if any
    pub current_phase15: Option<u32>,
}

impl MessageIdBook {
    /// Whether `msgid` has already been claimed by a prior exchange on this SA.
    pub fn is_unique(&self, msgid: u32) -> bool {
        msgid != 0 && !self.reserved.contains(&msgid)
    }

    /// Reserve a message ID, failing the "previously unseen" requirement of §4.1 if reused.
    pub fn reserve(&mut self, msgid: u32) -> bool {
        if self.is_unique(msgid) {
            self.reserved.push(msgid);
            true
        } else {
            false
        }
    }
}

/// One Phase-1 security association in progress or established.
pub struct IkeSa {
    /// Initiator's 8-byte SPI (cookie)
    pub initiator_spi: u64,
    /// Responder's 8-byte SPI, zero until the responder picks one
    pub responder_spi: u64,
    /// Role this endpoint plays in the exchange
    pub role: Role,
    /// Current state
    pub state: State,
    /// Connection policy this SA is currently bound to
    pub connection: Arc<Connection>,
    /// Negotiated Oakley parameters, set once a proposal is accepted
    pub oakley: Option<OakleyParams>,
    /// Derived SKEYID material, set once `hidden.skeyid_calculated`
    pub skeyid: Option<SkeyidSet>,
    /// Peer's UDP endpoint
    pub peer: SocketAddr,
    /// Our local UDP endpoint this SA is bound to
    pub local: SocketAddr,
    /// IV chain
    pub iv: IvChain,
    /// Bytes of the last packet we sent on this SA, for retransmit
    pub last_sent: Option<Vec<u8>>,
    /// Bytes of the last packet we fully processed from the peer, for duplicate detection
    pub rpacket: Option<Vec<u8>>,
    /// Pending, not-yet-reassembled fragments
    pub fragments: Vec<FragmentEntry>,
    /// Count of duplicate retransmissions accepted so far, per §4.7
    pub duplicate_count: u32,
    /// Hidden/implicit state variables
    pub hidden: HiddenVars,
    /// Message-id reservation book
    pub msgids: MessageIdBook,
    /// A suspended message digest awaiting a crypto helper completion, per §4.8.
    /// The newest suspension always replaces any prior one.
    pub suspended: Option<MessageDigest>,
    /// The currently armed timer, if any
    pub timer: Option<ArmedTimer>,
    /// Queued Phase-2 initiations to fire once `RELEASE_PENDING_P2` runs
    pub pending_quick_mode: Vec<QuickModeRequest>,
    /// Per-protocol lifetimes from the most recent Quick Mode proposal
    pub phase2_lifetimes: Phase2Lifetimes,
}

/// A Phase-2 negotiation queued against a not-yet-established Phase-1 SA.
#[derive(Debug, Clone)]
pub struct QuickModeRequest {
    /// Local traffic selector, encoded as an Identification payload body
    pub local_id: Vec<u8>,
    /// Remote traffic selector, encoded as an Identification payload body
    pub remote_id: Vec<u8>,
}

/// Per-protocol Phase-2 lifetimes seen in the most recent Quick Mode proposal,
/// used by the §4.6 rekey-timer computation. Any protocol absent from the
/// negotiated proposal leaves its slot `None` and does not constrain the
/// minimum.
#[derive(Debug, Clone, Copy, Default)]
pub struct Phase2Lifetimes {
    /// AH (RFC 2407 protocol id 2) lifetime, if AH was proposed
    pub ah: Option<Duration>,
    /// ESP (protocol id 3) lifetime, if ESP was proposed
    pub esp: Option<Duration>,
    /// IPComp (protocol id 4) lifetime, if IPComp was proposed
    pub ipcomp: Option<Duration>,
}

/// Per-SA ordered fragment entry, see §3 and §4.2.
#[derive(Debug, Clone)]
pub struct FragmentEntry {
    /// Shared fragment-set identifier
    pub fragment_id: u16,
    /// 1-based index within the fragment set
    pub index: u8,
    /// Whether this fragment carries the last-flag
    pub last: bool,
    /// This fragment's share of the encrypted body
    pub bytes: Vec<u8>,
    /// Type of the first real payload following reassembly, meaningful only
    /// on the fragment with `last` set
    pub next_payload: PayloadType,
}

impl IkeSa {
    /// Construct a fresh SA for an inbound initial Main/Aggressive Mode message.
    pub fn new_responder(
        initiator_spi: u64,
        peer: SocketAddr,
        local: SocketAddr,
        state: State,
        connection: Arc<Connection>,
    ) -> Self {
        Self {
            initiator_spi,
            responder_spi: 0,
            role: Role::Responder,
            state,
            connection,
            oakley: None,
            skeyid: None,
            peer,
            local,
            iv: IvChain::default(),
            last_sent: None,
            rpacket: None,
            fragments: Vec::new(),
            duplicate_count: 0,
            hidden: HiddenVars::default(),
            msgids: MessageIdBook::default(),
            suspended: None,
            timer: None,
            pending_quick_mode: Vec::new(),
            phase2_lifetimes: Phase2Lifetimes::default(),
        }
    }

    /// Whether Phase-1 has fully completed on this SA.
    pub fn is_established(&self) -> bool {
        self.state.is_phase1_established()
    }

    /// Whether exactly one crypto helper request is in flight, per the §3 invariant.
    pub fn is_suspended(&self) -> bool {
        self.suspended.is_some()
    }
}
