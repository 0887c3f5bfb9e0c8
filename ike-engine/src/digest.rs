//! The transient per-packet record threaded through decoding and dispatch.

use isakmp::v1::parser::definitions::AttributePayload;
use isakmp::v1::parser::definitions::CertificatePayload;
use isakmp::v1::parser::definitions::CertificateRequestPayload;
use isakmp::v1::parser::definitions::DeletePayload;
use isakmp::v1::parser::definitions::HashPayload;
use isakmp::v1::parser::definitions::Header;
use isakmp::v1::parser::definitions::IdentificationPayload;
use isakmp::v1::parser::definitions::KeyExchangePayload;
use isakmp::v1::parser::definitions::NatDiscoveryPayload;
use isakmp::v1::parser::definitions::NatOriginalAddressPayload;
use isakmp::v1::parser::definitions::NoncePayload;
use isakmp::v1::parser::definitions::NotificationPayload;
use isakmp::v1::parser::definitions::SecurityAssociationPayload;
use isakmp::v1::parser::definitions::SignaturePayload;
use isakmp::v1::parser::definitions::VendorIDPayload;
use isakmp::v1::NotifyMessageType;

use crate::state::State;

/// Hash protection a transition may require of an encrypted message, see §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum HashRequirement {
    None,
    /// Informational: `SKEYID_a | msgid | N/D`
    InformationalHash,
    /// Quick Mode message 1: `SKEYID_a | msgid | rest`
    Quick1,
    /// Quick Mode message 2: `SKEYID_a | msgid | Ni_b | rest`
    Quick2,
    /// Quick Mode message 3: `SKEYID_a | 0 | msgid | Ni_b | Nr_b`
    Quick3,
}

/// Payload chains of a decoded message, one `Vec` per type, preserving arrival order.
///
/// The specification suggests a fixed array of small arrays over a payload-number
/// bitset; a struct of named `Vec`s gives the same arrival-order-preserving chains
/// with direct field access instead of a numeric index, which reads better against
/// the named accessors the handlers need.
#[derive(Debug, Clone, Default)]
pub struct PayloadChains {
    /// Security Association payloads, in arrival order
    pub security_associations: Vec<SecurityAssociationPayload>,
    /// Key Exchange payloads
    pub key_exchanges: Vec<KeyExchangePayload>,
    /// Identification payloads
    pub identifications: Vec<IdentificationPayload>,
    /// Certificate payloads
    pub certificates: Vec<CertificatePayload>,
    /// Certificate Request payloads
    pub certificate_requests: Vec<CertificateRequestPayload>,
    /// Hash payloads
    pub hashes: Vec<HashPayload>,
    /// Signature payloads
    pub signatures: Vec<SignaturePayload>,
    /// Nonce payloads
    pub nonces: Vec<NoncePayload>,
    /// Notification payloads
    pub notifications: Vec<NotificationPayload>,
    /// Delete payloads
    pub deletes: Vec<DeletePayload>,
    /// Vendor ID payloads
    pub vendor_ids: Vec<VendorIDPayload>,
    /// Mode-Config / XAUTH attribute payloads
    pub attributes: Vec<AttributePayload>,
    /// NAT discovery payloads
    pub nat_discoveries: Vec<NatDiscoveryPayload>,
    /// NAT original address payloads
    pub nat_original_addresses: Vec<NatOriginalAddressPayload>,
}

/// Transient, per-packet record produced by the decoder and consumed by dispatch.
#[derive(Debug, Clone)]
pub struct MessageDigest {
    /// Raw bytes of the packet as received (post NAT-T marker stripping, pre-decryption)
    pub raw: Vec<u8>,
    /// The parsed ISAKMP header
    pub header: Header,
    /// Whether the body was found to be encrypted
    pub encrypted: bool,
    /// Whether a fresh Phase-2 IV was seeded while processing this message
    pub new_iv_set: bool,
    /// `from_state` resolved by the demultiplexer
    pub from_state: State,
    /// Payload chains found during decoding
    pub payloads: PayloadChains,
    /// Notification code computed on a decode failure, if any
    pub notify_on_failure: Option<NotifyMessageType>,
}

impl MessageDigest {
    /// Construct an empty digest anchored to a parsed header and resolved state.
    pub fn new(raw: Vec<u8>, header: Header, from_state: State, encrypted: bool) -> Self {
        Self {
            raw,
            header,
            encrypted,
            new_iv_set: false,
            from_state,
            payloads: PayloadChains::default(),
            notify_on_failure: None,
        }
    }
}
