//! Building blocks for constructing ISAKMP payloads, one function per payload type.
//!
//! Every function returns a [RawPayload]: its own [PayloadType] plus the encoded
//! body *without* the 4-octet generic payload header, since the `next_payload`
//! field of that header can only be filled in once the whole chain is known.
//! [crate::v1::generator::message::assemble] does that final pass.

use zerocopy::network_endian::U16;
use zerocopy::network_endian::U32;
use zerocopy::AsBytes;

use crate::v1::definitions::AttributeType;
use crate::v1::definitions::CertificateEncoding;
use crate::v1::definitions::DataAttributeShort;
use crate::v1::definitions::DomainOfInterpretation;
use crate::v1::definitions::GenericPayloadHeader;
use crate::v1::definitions::IdentificationType;
use crate::v1::definitions::ModeConfigType;
use crate::v1::definitions::NotifyMessageType;
use crate::v1::definitions::PayloadType;
use crate::v1::definitions::StaticAttributePayload;
use crate::v1::definitions::StaticCertificatePayload;
use crate::v1::definitions::StaticCertificateRequestPayload;
use crate::v1::definitions::StaticDataAttributeLong;
use crate::v1::definitions::StaticDeletePayload;
use crate::v1::definitions::StaticFragmentationPayload;
use crate::v1::definitions::StaticIdentificationPayload;
use crate::v1::definitions::StaticNatDiscoveryPayload;
use crate::v1::definitions::StaticNatOriginalAddressPayload;
use crate::v1::definitions::StaticNotificationPayload;
use crate::v1::definitions::StaticProposalPayload;
use crate::v1::definitions::StaticSecurityAssociationPayload;
use crate::v1::definitions::StaticTransformPayload;
use crate::v1::definitions::FRAGMENT_FLAG_LAST;

/// A not-yet-chained payload: type tag plus its body, generic header excluded
#[derive(Debug, Clone)]
pub struct RawPayload {
    /// Type of this payload, used by [crate::v1::generator::message::assemble]
    /// to fill in the *previous* payload's `next_payload` field
    pub payload_type: PayloadType,
    /// Encoded body, generic payload header excluded
    pub body: Vec<u8>,
}

fn empty_header() -> GenericPayloadHeader {
    GenericPayloadHeader {
        next_payload: PayloadType::None as u8,
        reserved: 0,
        payload_length: U16::new(0),
    }
}

/// A single SA attribute to encode, either as a 2-octet TV or a variable-length TLV
#[derive(Debug, Clone)]
pub enum EncodedAttribute {
    /// Short, fixed-size (TV) attribute
    Short(AttributeType, u16),
    /// Long, variable-length (TLV) attribute
    Long(AttributeType, Vec<u8>),
}

fn encode_attribute(attribute: &EncodedAttribute) -> Vec<u8> {
    match attribute {
        EncodedAttribute::Short(attribute_type, value) => DataAttributeShort {
            attribute_type: U16::new(*attribute_type as u16 | 0b1000_0000_0000_0000),
            attribute_value: U16::new(*value),
        }
        .as_bytes()
        .to_vec(),
        EncodedAttribute::Long(attribute_type, value) => {
            let mut out = StaticDataAttributeLong {
                attribute_type: U16::new(*attribute_type as u16 & 0b0111_1111_1111_1111),
                attribute_length: U16::new(value.len() as u16),
            }
            .as_bytes()
            .to_vec();
            out.extend_from_slice(value);
            out
        }
    }
}

/// A transform to be placed in a proposal, as a transform-id plus its attributes
#[derive(Debug, Clone)]
pub struct RawTransform {
    /// Transform number, unique within the enclosing proposal
    pub transform_no: u8,
    /// DOI and protocol dependent transform identifier
    pub transform_id: u8,
    /// SA attributes of this transform
    pub attributes: Vec<EncodedAttribute>,
}

/// A proposal to be placed in a Security Association payload
#[derive(Debug, Clone)]
pub struct RawProposal {
    /// Proposal number, shared with alternatives negotiated together
    pub proposal_no: u8,
    /// Protocol being proposed
    pub protocol_id: u8,
    /// Sender's SPI for this proposal, empty during Phase 1
    pub spi: Vec<u8>,
    /// Transforms offered for this proposal
    pub transforms: Vec<RawTransform>,
}

fn encode_transform(transform: &RawTransform, is_last: bool) -> Vec<u8> {
    let attributes: Vec<u8> = transform
        .attributes
        .iter()
        .flat_map(encode_attribute)
        .collect();
    let mut header = StaticTransformPayload {
        generic_payload_header: empty_header(),
        transform_no: transform.transform_no,
        transform_id: transform.transform_id,
        reserved: U16::new(0),
    };
    header.generic_payload_header.next_payload = if is_last {
        PayloadType::None as u8
    } else {
        PayloadType::Transform as u8
    };
    header.generic_payload_header.payload_length =
        U16::new((size_of::<StaticTransformPayload>() + attributes.len()) as u16);
    let mut out = header.as_bytes().to_vec();
    out.extend_from_slice(&attributes);
    out
}

fn encode_proposal(proposal: &RawProposal, is_last: bool) -> Vec<u8> {
    let transforms: Vec<u8> = proposal
        .transforms
        .iter()
        .enumerate()
        .flat_map(|(i, t)| encode_transform(t, i + 1 == proposal.transforms.len()))
        .collect();
    let mut header = StaticProposalPayload {
        generic_payload_header: empty_header(),
        proposal_no: proposal.proposal_no,
        protocol_id: proposal.protocol_id,
        spi_size: proposal.spi.len() as u8,
        no_of_transforms: proposal.transforms.len() as u8,
    };
    header.generic_payload_header.next_payload = if is_last {
        PayloadType::None as u8
    } else {
        PayloadType::Proposal as u8
    };
    header.generic_payload_header.payload_length = U16::new(
        (size_of::<StaticProposalPayload>() + proposal.spi.len() + transforms.len()) as u16,
    );
    let mut out = header.as_bytes().to_vec();
    out.extend_from_slice(&proposal.spi);
    out.extend_from_slice(&transforms);
    out
}

/// Encode a Security Association payload with one or more proposals
pub fn security_association(
    doi: DomainOfInterpretation,
    situation: &[u8],
    proposals: &[RawProposal],
) -> RawPayload {
    let proposals_bytes: Vec<u8> = proposals
        .iter()
        .enumerate()
        .flat_map(|(i, p)| encode_proposal(p, i + 1 == proposals.len()))
        .collect();
    let header = StaticSecurityAssociationPayload {
        generic_payload_header: empty_header(),
        doi: U32::new(doi as u32),
    };
    let mut body = header.as_bytes().to_vec();
    body.extend_from_slice(situation);
    body.extend_from_slice(&proposals_bytes);
    RawPayload {
        payload_type: PayloadType::SecurityAssociation,
        body,
    }
}

/// Encode a Nonce payload
pub fn nonce(data: &[u8]) -> RawPayload {
    RawPayload {
        payload_type: PayloadType::Nonce,
        body: data.to_vec(),
    }
}

/// Encode a Key Exchange payload
pub fn key_exchange(data: &[u8]) -> RawPayload {
    RawPayload {
        payload_type: PayloadType::KeyExchange,
        body: data.to_vec(),
    }
}

/// Encode a Hash payload
pub fn hash(data: &[u8]) -> RawPayload {
    RawPayload {
        payload_type: PayloadType::Hash,
        body: data.to_vec(),
    }
}

/// Encode a Signature payload
pub fn signature(data: &[u8]) -> RawPayload {
    RawPayload {
        payload_type: PayloadType::Signature,
        body: data.to_vec(),
    }
}

/// Encode a Vendor ID payload
pub fn vendor_id(data: &[u8]) -> RawPayload {
    RawPayload {
        payload_type: PayloadType::VendorID,
        body: data.to_vec(),
    }
}

/// Encode an Identification payload
pub fn identification(
    id_type: IdentificationType,
    protocol_id: u8,
    port: u16,
    data: &[u8],
) -> RawPayload {
    let header = StaticIdentificationPayload {
        generic_payload_header: empty_header(),
        id_type: id_type as u8,
        protocol_id,
        port: U16::new(port),
    };
    let mut body = header.as_bytes().to_vec();
    body.extend_from_slice(data);
    RawPayload {
        payload_type: PayloadType::Identification,
        body,
    }
}

/// Encode a Certificate payload
pub fn certificate(encoding: CertificateEncoding, data: &[u8]) -> RawPayload {
    let header = StaticCertificatePayload {
        generic_payload_header: empty_header(),
        certificate_encoding: encoding as u8,
    };
    let mut body = header.as_bytes().to_vec();
    body.extend_from_slice(data);
    RawPayload {
        payload_type: PayloadType::Certificate,
        body,
    }
}

/// Encode a Certificate Request payload
pub fn certificate_request(encoding: CertificateEncoding, authority: &[u8]) -> RawPayload {
    let header = StaticCertificateRequestPayload {
        generic_payload_header: empty_header(),
        certificate_type: encoding as u8,
    };
    let mut body = header.as_bytes().to_vec();
    body.extend_from_slice(authority);
    RawPayload {
        payload_type: PayloadType::CertificateRequest,
        body,
    }
}

/// Encode a Notification payload
pub fn notification(
    doi: DomainOfInterpretation,
    protocol_id: u8,
    spi: &[u8],
    notify_message_type: NotifyMessageType,
    data: &[u8],
) -> RawPayload {
    let header = StaticNotificationPayload {
        generic_payload_header: empty_header(),
        doi: U32::new(doi as u32),
        protocol_id,
        spi_size: spi.len() as u8,
        notify_message_type: U16::new(notify_message_type as u16),
    };
    let mut body = header.as_bytes().to_vec();
    body.extend_from_slice(spi);
    body.extend_from_slice(data);
    RawPayload {
        payload_type: PayloadType::Notification,
        body,
    }
}

/// Encode a Delete payload for one or more SPIs of the same size
pub fn delete(doi: DomainOfInterpretation, protocol_id: u8, spis: &[Vec<u8>]) -> RawPayload {
    let spi_size = spis.first().map_or(0, Vec::len) as u8;
    let header = StaticDeletePayload {
        generic_payload_header: empty_header(),
        doi: U32::new(doi as u32),
        protocol_id,
        spi_size,
        no_of_spis: U16::new(spis.len() as u16),
    };
    let mut body = header.as_bytes().to_vec();
    for spi in spis {
        body.extend_from_slice(spi);
    }
    RawPayload {
        payload_type: PayloadType::Delete,
        body,
    }
}

/// Encode a Mode-Config / XAUTH attribute payload
pub fn attribute(
    attribute_payload_type: ModeConfigType,
    identifier: u16,
    attributes: &[EncodedAttribute],
) -> RawPayload {
    let header = StaticAttributePayload {
        generic_payload_header: empty_header(),
        attribute_payload_type: attribute_payload_type as u8,
        reserved: 0,
        identifier: U16::new(identifier),
    };
    let mut body = header.as_bytes().to_vec();
    body.extend(attributes.iter().flat_map(encode_attribute));
    RawPayload {
        payload_type: PayloadType::Attribute,
        body,
    }
}

/// Encode a NAT discovery (NAT-D) payload
pub fn nat_discovery(hash_data: &[u8]) -> RawPayload {
    let header = StaticNatDiscoveryPayload {
        generic_payload_header: empty_header(),
    };
    let mut body = header.as_bytes().to_vec();
    body.extend_from_slice(hash_data);
    RawPayload {
        payload_type: PayloadType::NatDiscoveryRfc,
        body,
    }
}

/// Encode a NAT original address payload
pub fn nat_original_address(id_type: u8, address: &[u8]) -> RawPayload {
    let header = StaticNatOriginalAddressPayload {
        generic_payload_header: empty_header(),
        id_type,
        reserved: [0; 3],
    };
    let mut body = header.as_bytes().to_vec();
    body.extend_from_slice(address);
    RawPayload {
        payload_type: PayloadType::NatOriginalAddressRfc,
        body,
    }
}

/// Encode one fragment of a larger message
pub fn fragmentation(fragment_id: u16, fragment_number: u8, is_last: bool, data: &[u8]) -> RawPayload {
    let header = StaticFragmentationPayload {
        generic_payload_header: empty_header(),
        fragment_id: U16::new(fragment_id),
        fragment_number,
        flags: if is_last { FRAGMENT_FLAG_LAST } else { 0 },
    };
    let mut body = header.as_bytes().to_vec();
    body.extend_from_slice(data);
    RawPayload {
        payload_type: PayloadType::IkeFragmentation,
        body,
    }
}
