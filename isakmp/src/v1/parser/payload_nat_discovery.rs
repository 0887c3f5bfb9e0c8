//! Parser of the NAT discovery (NAT-D) payload

use zerocopy::FromBytes;

use crate::v1::definitions::PayloadType;
use crate::v1::definitions::StaticNatDiscoveryPayload;
use crate::v1::parser::definitions::NatDiscoveryPayload;
use crate::v1::parser::errors::IsakmpParseError;

/// Parse a NAT discovery payload
pub fn parse_nat_discovery(buf: &[u8]) -> Result<NatDiscoveryPayload, IsakmpParseError> {
    let static_part = StaticNatDiscoveryPayload::ref_from_prefix(buf)
        .ok_or(IsakmpParseError::BufferTooSmall)?;

    if static_part.generic_payload_header.reserved != 0 {
        return Err(IsakmpParseError::UnexpectedPayload);
    }

    let static_size = size_of::<StaticNatDiscoveryPayload>();
    let payload_length = static_part.generic_payload_header.payload_length.get() as usize;
    let hash_data = buf
        .get(static_size..payload_length)
        .ok_or(IsakmpParseError::BufferTooSmall)?
        .to_vec();

    Ok(NatDiscoveryPayload {
        next_payload: PayloadType::try_from(static_part.generic_payload_header.next_payload)?,
        length: static_part.generic_payload_header.payload_length.get(),
        hash_data,
    })
}
