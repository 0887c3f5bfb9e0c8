//! Parsers for IKEv1 ISAKMP messages

use zerocopy::FromBytes;

use crate::v1::definitions::ExchangeType;
use crate::v1::definitions::Header as WireHeader;
use crate::v1::definitions::PayloadType;
use crate::v1::parser::definitions::Packet;
use crate::v1::parser::errors::IsakmpParseError;
use crate::v1::parser::payload::parse_next_payload;
use crate::v1::parser::payload::GenericPayload;
use crate::v1::parser::payload::Payload;

pub mod data_attribute;
pub mod definitions;
pub mod errors;
pub mod header;
pub mod payload;
pub mod payload_attribute;
pub mod payload_certificate;
pub mod payload_cert_request;
pub mod payload_delete;
pub mod payload_fragmentation;
pub mod payload_hash;
pub mod payload_identification;
pub mod payload_key_exchange;
pub mod payload_nat_discovery;
pub mod payload_nat_original_address;
pub mod payload_nonce;
pub mod payload_notification;
pub mod payload_proposal;
pub mod payload_sa;
pub mod payload_signature;
pub mod payload_transform;
pub mod payload_vendor_id;

/// Parse an ISAKMP message into its full high level representation.
///
/// The header is always parsed independently of the body, since its length
/// and message ID determine how the body is later decrypted and whether the
/// message belongs to Phase 1 or Phase 2.
pub fn parse_packet(buf: &[u8]) -> Result<Packet, IsakmpParseError> {
    let header = header::parse_header(buf)?;

    if header.exchange_mode == ExchangeType::None {
        return Err(IsakmpParseError::UnexpectedPayload);
    }

    let mut packet = Packet {
        header,
        notification_payloads: vec![],
        security_associations: vec![],
        proposals: vec![],
        transforms: vec![],
        vendor_ids: vec![],
        key_exchanges: vec![],
        identifications: vec![],
        hashes: vec![],
        signatures: vec![],
        nonces: vec![],
        certificates: vec![],
        certificate_requests: vec![],
        deletes: vec![],
        attributes: vec![],
        nat_discoveries: vec![],
        nat_original_addresses: vec![],
        fragments: vec![],
    };

    let mut next_payload = packet.header.next_payload;
    let mut curr_offset = size_of::<WireHeader>();

    loop {
        if next_payload == PayloadType::None {
            break;
        }

        let GenericPayload {
            payload_size,
            next_payload_type,
            payload,
        } = parse_next_payload(&buf[curr_offset..], next_payload)?;

        if payload_size == 0 {
            return Err(IsakmpParseError::UnexpectedPayload);
        }

        curr_offset += payload_size;
        next_payload = next_payload_type;

        match payload {
            Payload::Notification(p) => packet.notification_payloads.push(p),
            Payload::SecurityAssociation(p) => packet.security_associations.push(p),
            Payload::VendorID(p) => packet.vendor_ids.push(p),
            Payload::Proposal(p) => packet.proposals.push(p),
            Payload::Transform(p) => packet.transforms.push(p),
            Payload::KeyExchange(p) => packet.key_exchanges.push(p),
            Payload::Identification(p) => packet.identifications.push(p),
            Payload::Hash(p) => packet.hashes.push(p),
            Payload::Signature(p) => packet.signatures.push(p),
            Payload::Nonce(p) => packet.nonces.push(p),
            Payload::Certificate(p) => packet.certificates.push(p),
            Payload::CertificateRequest(p) => packet.certificate_requests.push(p),
            Payload::Delete(p) => packet.deletes.push(p),
            Payload::Attribute(p) => packet.attributes.push(p),
            Payload::NatDiscovery(p) => packet.nat_discoveries.push(p),
            Payload::NatOriginalAddress(p) => packet.nat_original_addresses.push(p),
            Payload::Fragmentation(p) => packet.fragments.push(p),
        }
    }

    Ok(packet)
}
