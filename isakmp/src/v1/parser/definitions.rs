//! The high level definitions of parts of an isakmp message

use crate::v1::definitions::AttributeType;
use crate::v1::definitions::CertificateEncoding;
use crate::v1::definitions::DomainOfInterpretation;
use crate::v1::definitions::ExchangeType;
use crate::v1::definitions::IdentificationType;
use crate::v1::definitions::ModeConfigType;
use crate::v1::definitions::NotifyMessageType;
use crate::v1::definitions::PayloadType;

/// The high level representation of an ISAKMP message, version 1
#[derive(Debug, Clone)]
pub struct Packet {
    /// The header of the message
    pub header: Header,
    /// Notification payloads
    pub notification_payloads: Vec<NotificationPayload>,
    /// Security Association payloads
    pub security_associations: Vec<SecurityAssociationPayload>,
    /// List of vendor ids
    pub vendor_ids: Vec<VendorIDPayload>,
    /// List of transform payloads
    pub transforms: Vec<TransformPayload>,
    /// List of proposal payloads
    pub proposals: Vec<ProposalPayload>,
    /// Key exchange payloads
    pub key_exchanges: Vec<KeyExchangePayload>,
    /// Identification payloads
    pub identifications: Vec<IdentificationPayload>,
    /// Hash payloads
    pub hashes: Vec<HashPayload>,
    /// Signature payloads
    pub signatures: Vec<SignaturePayload>,
    /// Nonce payloads
    pub nonces: Vec<NoncePayload>,
    /// Certificate payloads
    pub certificates: Vec<CertificatePayload>,
    /// Certificate request payloads
    pub certificate_requests: Vec<CertificateRequestPayload>,
    /// Delete payloads
    pub deletes: Vec<DeletePayload>,
    /// Mode-Config / XAUTH attribute payloads
    pub attributes: Vec<AttributePayload>,
    /// NAT discovery payloads
    pub nat_discoveries: Vec<NatDiscoveryPayload>,
    /// NAT original address payloads
    pub nat_original_addresses: Vec<NatOriginalAddressPayload>,
    /// Fragments of a larger message
    pub fragments: Vec<FragmentationPayload>,
}

/// High level presentation of an ISAKMP header
#[derive(Debug, Clone)]
pub struct Header {
    /// Cookie of the initiator party
    pub initiator_cookie: u64,
    /// Responder cookie
    pub responder_cookie: u64,
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Major version
    pub major_version: u8,
    /// Minor version
    pub minor_version: u8,
    /// Mode of exchange
    pub exchange_mode: ExchangeType,
    /// Additional flags
    pub flags: u8,
    /// Phase 1: Set to 0
    /// Phase 2: Set to random value
    pub message_id: u32,
    /// Length of the total message
    pub length: u32,
}

/// High-level representation of a Notification payload
#[derive(Debug, Clone)]
pub struct NotificationPayload {
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Length of this payload including header and sub-payloads
    pub length: u16,
    /// Specifies the protocol identifier for the current notification.
    ///
    /// Examples might include ISAKMP, IPSEC ESP, IPSEC AH, OSPF, TLS, etc.
    // TODO: Replace with enum
    pub protocol_id: u8,
    /// Notify message type
    pub notify_message_type: NotifyMessageType,
    /// Notification interpreted as a string
    pub notification: Vec<u8>,
}

/// High-level representation of a security association payload
#[derive(Debug, Clone)]
pub struct SecurityAssociationPayload {
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Length of this payload including header and sub-payloads
    pub length: u16,
    /// The domain of interpretation
    pub domain_of_interpretation: DomainOfInterpretation,
    /// A DOI-specific field that identifies the situation under which this negotiation
    /// is taking place.
    pub situation: Vec<u8>,
    /// Proposal payloads
    pub proposal_payload: Vec<ProposalPayload>,
}

/// High-level representation of a proposal payload
#[derive(Debug, Clone)]
pub struct ProposalPayload {
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Length of this payload including header and sub-payloads
    pub length: u16,
    /// Identifies the Proposal number for the current payload
    pub proposal_no: u8,
    /// Specifies the protocol identifier for the current notification.
    ///
    /// Examples might include ISAKMP, IPSEC ESP, IPSEC AH, OSPF, TLS, etc.
    // TODO: Replace with enum
    pub protocol_id: u8,
    /// Size of the SPI field
    pub spi_size: u8,
    /// Specifies the number of transforms for the Proposal. Each of these is contained in
    /// a Transform payload.
    pub no_of_transforms: u8,
    /// The sending entity's SPI. In the event the SPI Size is not a multiple of 4 octets,
    /// there is no padding applied to the payload, however, it can be applied
    /// at the end of the message.
    pub spi: Vec<u8>,
    /// Transform payloads
    pub transforms: Vec<TransformPayload>,
}

/// High-level representation of a transform payload
#[derive(Debug, Clone)]
pub struct TransformPayload {
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Length of this payload including header and sub-payloads
    pub length: u16,
    /// Identifies the Transform number for the current payload. If there is more than one transform
    /// proposed for a specific protocol within the Proposal payload, then each Transform payload
    /// has a unique Transform number
    pub transform_no: u8,
    /// Specifies the Transform identifier for the protocol within the current proposal.
    /// These transforms are defined by the DOI and are dependent on the protocol being negotiated.
    // TODO: Make enum
    pub transform_id: u8,
    /// This field contains the security association attributes as defined for the transform given
    /// in the Transform-Id field.
    pub sa_attributes: Vec<DataAttribute>,
}

/// High-level representation of a vendor id payload
#[derive(Debug, Clone)]
pub struct VendorIDPayload {
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Length of this payload including header and sub-payloads
    pub length: u16,
    /// Hashed vendor id string
    pub vendor_id: Vec<u8>,
}

/// Possible data attributes
#[derive(Debug, Clone)]
pub enum DataAttribute {
    /// Short data attribute with static value
    DataAttributeShort(DataAttributeShort),
    /// Variable length data attribute
    DataAttributeLong(DataAttributeLong),
}

/// High-level representation of a short data attribute
#[derive(Debug, Clone)]
pub struct DataAttributeShort {
    /// Type of the data attribute
    pub attribute_type: AttributeType,
    /// Value of the data attributee
    pub attribute_value: u16,
}

/// High-level representation of a variable-length data attribute
#[derive(Debug, Clone)]
pub struct DataAttributeLong {
    /// Type of the data attribute
    pub attribute_type: AttributeType,
    /// Value of the data attribute
    pub attribute_value: Vec<u8>,
}

/// High-level representation of a Key Exchange payload
#[derive(Debug, Clone)]
pub struct KeyExchangePayload {
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Length of this payload including header
    pub length: u16,
    /// The sender's Diffie-Hellman public value
    pub key_exchange_data: Vec<u8>,
}

/// High-level representation of an Identification payload
#[derive(Debug, Clone)]
pub struct IdentificationPayload {
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Length of this payload including header
    pub length: u16,
    /// Type of identification data carried
    pub id_type: IdentificationType,
    /// Protocol ID, zero outside of Phase 2
    pub protocol_id: u8,
    /// Port, zero outside of Phase 2
    pub port: u16,
    /// Identification data, interpretation depends on `id_type`
    pub identification_data: Vec<u8>,
}

/// High-level representation of a Hash payload
#[derive(Debug, Clone)]
pub struct HashPayload {
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Length of this payload including header
    pub length: u16,
    /// The hash data itself
    pub hash_data: Vec<u8>,
}

/// High-level representation of a Signature payload
#[derive(Debug, Clone)]
pub struct SignaturePayload {
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Length of this payload including header
    pub length: u16,
    /// The signature data itself
    pub signature_data: Vec<u8>,
}

/// High-level representation of a Nonce payload
#[derive(Debug, Clone)]
pub struct NoncePayload {
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Length of this payload including header
    pub length: u16,
    /// The nonce data itself
    pub nonce_data: Vec<u8>,
}

/// High-level representation of a Certificate payload
#[derive(Debug, Clone)]
pub struct CertificatePayload {
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Length of this payload including header
    pub length: u16,
    /// Encoding of the certificate data
    pub certificate_encoding: CertificateEncoding,
    /// The encoded certificate data
    pub certificate_data: Vec<u8>,
}

/// High-level representation of a Certificate Request payload
#[derive(Debug, Clone)]
pub struct CertificateRequestPayload {
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Length of this payload including header
    pub length: u16,
    /// Encoding of the requested certificate authority
    pub certificate_encoding: CertificateEncoding,
    /// Certificate authority data
    pub certificate_authority: Vec<u8>,
}

/// High-level representation of a Delete payload
#[derive(Debug, Clone)]
pub struct DeletePayload {
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Length of this payload including header
    pub length: u16,
    /// Domain of interpretation
    pub domain_of_interpretation: DomainOfInterpretation,
    /// Protocol the deleted SA(s) belong to
    pub protocol_id: u8,
    /// Size in octets of each SPI
    pub spi_size: u8,
    /// The SPIs being deleted
    pub spis: Vec<Vec<u8>>,
}

/// High-level representation of a Mode-Config / XAUTH Attribute payload
#[derive(Debug, Clone)]
pub struct AttributePayload {
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Length of this payload including header
    pub length: u16,
    /// Transaction type
    pub attribute_payload_type: ModeConfigType,
    /// Transaction identifier
    pub identifier: u16,
    /// The attributes carried in this transaction
    pub attributes: Vec<DataAttribute>,
}

/// High-level representation of a NAT discovery (NAT-D) payload
#[derive(Debug, Clone)]
pub struct NatDiscoveryPayload {
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Length of this payload including header
    pub length: u16,
    /// Hash of the address/port as seen by the sender
    pub hash_data: Vec<u8>,
}

/// High-level representation of a NAT original address (NAT-OA) payload
#[derive(Debug, Clone)]
pub struct NatOriginalAddressPayload {
    /// The type of the next payload
    pub next_payload: PayloadType,
    /// Length of this payload including header
    pub length: u16,
    /// `1` for IPv4, `2` for IPv6
    pub id_type: u8,
    /// The original, pre-NAT address
    pub address: Vec<u8>,
}

/// High-level representation of one fragment of a fragmented ISAKMP message
#[derive(Debug, Clone)]
pub struct FragmentationPayload {
    /// The type of the next payload, only meaningful on the final fragment
    pub next_payload: PayloadType,
    /// Length of this payload including header
    pub length: u16,
    /// Identifier shared by all fragments of the same message
    pub fragment_id: u16,
    /// 1-based index of this fragment
    pub fragment_number: u8,
    /// Whether this is the last fragment
    pub is_last: bool,
    /// The fragment's share of the encrypted body
    pub data: Vec<u8>,
}
