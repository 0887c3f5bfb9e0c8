//! Parser for all payloads

use crate::v1::definitions::PayloadType;
use crate::v1::parser::definitions::AttributePayload;
use crate::v1::parser::definitions::CertificatePayload;
use crate::v1::parser::definitions::CertificateRequestPayload;
use crate::v1::parser::definitions::DeletePayload;
use crate::v1::parser::definitions::FragmentationPayload;
use crate::v1::parser::definitions::HashPayload;
use crate::v1::parser::definitions::IdentificationPayload;
use crate::v1::parser::definitions::KeyExchangePayload;
use crate::v1::parser::definitions::NatDiscoveryPayload;
use crate::v1::parser::definitions::NatOriginalAddressPayload;
use crate::v1::parser::definitions::NoncePayload;
use crate::v1::parser::definitions::NotificationPayload;
use crate::v1::parser::definitions::ProposalPayload;
use crate::v1::parser::definitions::SecurityAssociationPayload;
use crate::v1::parser::definitions::SignaturePayload;
use crate::v1::parser::definitions::TransformPayload;
use crate::v1::parser::definitions::VendorIDPayload;
use crate::v1::parser::errors::IsakmpParseError;
use crate::v1::parser::payload_attribute::parse_attribute;
use crate::v1::parser::payload_certificate::parse_certificate;
use crate::v1::parser::payload_cert_request::parse_certificate_request;
use crate::v1::parser::payload_delete::parse_delete;
use crate::v1::parser::payload_fragmentation::parse_fragmentation;
use crate::v1::parser::payload_hash::parse_hash;
use crate::v1::parser::payload_identification::parse_identification;
use crate::v1::parser::payload_key_exchange::parse_key_exchange;
use crate::v1::parser::payload_nat_discovery::parse_nat_discovery;
use crate::v1::parser::payload_nat_original_address::parse_nat_original_address;
use crate::v1::parser::payload_nonce::parse_nonce;
use crate::v1::parser::payload_notification::parse_notification;
use crate::v1::parser::payload_proposal::parse_proposal;
use crate::v1::parser::payload_sa::parse_security_association;
use crate::v1::parser::payload_signature::parse_signature;
use crate::v1::parser::payload_transform::parse_transform;
use crate::v1::parser::payload_vendor_id::parse_vendor_id;

/// All parsable payload types
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum Payload {
    Notification(NotificationPayload),
    SecurityAssociation(SecurityAssociationPayload),
    VendorID(VendorIDPayload),
    Proposal(ProposalPayload),
    Transform(TransformPayload),
    KeyExchange(KeyExchangePayload),
    Identification(IdentificationPayload),
    Hash(HashPayload),
    Signature(SignaturePayload),
    Nonce(NoncePayload),
    Certificate(CertificatePayload),
    CertificateRequest(CertificateRequestPayload),
    Delete(DeletePayload),
    Attribute(AttributePayload),
    NatDiscovery(NatDiscoveryPayload),
    NatOriginalAddress(NatOriginalAddressPayload),
    Fragmentation(FragmentationPayload),
}

/// Representation of a generic payload
#[derive(Debug, Clone)]
pub struct GenericPayload {
    /// Size of the payload
    pub payload_size: usize,
    /// type of the next payload
    pub next_payload_type: PayloadType,
    /// The payload itself
    pub payload: Payload,
}

/// Parse the next payload of the message
pub fn parse_next_payload(
    buf: &[u8],
    payload_type: PayloadType,
) -> Result<GenericPayload, IsakmpParseError> {
    match payload_type {
        PayloadType::None => Err(IsakmpParseError::UnexpectedPayload),
        PayloadType::Notification => {
            let p = parse_notification(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::Notification(p),
            })
        }
        PayloadType::SecurityAssociation => {
            let p = parse_security_association(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::SecurityAssociation(p),
            })
        }
        PayloadType::VendorID => {
            let p = parse_vendor_id(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::VendorID(p),
            })
        }
        PayloadType::Proposal => {
            let p = parse_proposal(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::Proposal(p),
            })
        }
        PayloadType::Transform => {
            let p = parse_transform(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::Transform(p),
            })
        }
        PayloadType::KeyExchange => {
            let p = parse_key_exchange(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::KeyExchange(p),
            })
        }
        PayloadType::Identification => {
            let p = parse_identification(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::Identification(p),
            })
        }
        PayloadType::Hash => {
            let p = parse_hash(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::Hash(p),
            })
        }
        PayloadType::Signature => {
            let p = parse_signature(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::Signature(p),
            })
        }
        PayloadType::Nonce => {
            let p = parse_nonce(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::Nonce(p),
            })
        }
        PayloadType::Certificate => {
            let p = parse_certificate(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::Certificate(p),
            })
        }
        PayloadType::CertificateRequest => {
            let p = parse_certificate_request(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::CertificateRequest(p),
            })
        }
        PayloadType::Delete => {
            let p = parse_delete(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::Delete(p),
            })
        }
        PayloadType::Attribute => {
            let p = parse_attribute(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::Attribute(p),
            })
        }
        PayloadType::NatDiscoveryRfc | PayloadType::NatDiscoveryDraft => {
            let p = parse_nat_discovery(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::NatDiscovery(p),
            })
        }
        PayloadType::NatOriginalAddressRfc | PayloadType::NatOriginalAddressDraft => {
            let p = parse_nat_original_address(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::NatOriginalAddress(p),
            })
        }
        PayloadType::IkeFragmentation => {
            let p = parse_fragmentation(buf)?;
            Ok(GenericPayload {
                payload_size: p.length as usize,
                next_payload_type: p.next_payload,
                payload: Payload::Fragmentation(p),
            })
        }
        PayloadType::Sak => Err(IsakmpParseError::UnexpectedPayload),
    }
}
