//! Parser of the NAT original address (NAT-OA) payload

use zerocopy::FromBytes;

use crate::v1::definitions::PayloadType;
use crate::v1::definitions::StaticNatOriginalAddressPayload;
use crate::v1::parser::definitions::NatOriginalAddressPayload;
use crate::v1::parser::errors::IsakmpParseError;

/// Parse a NAT original address payload
pub fn parse_nat_original_address(
    buf: &[u8],
) -> Result<NatOriginalAddressPayload, IsakmpParseError> {
    let static_part = StaticNatOriginalAddressPayload::ref_from_prefix(buf)
        .ok_or(IsakmpParseError::BufferTooSmall)?;

    if static_part.generic_payload_header.reserved != 0 {
        return Err(IsakmpParseError::UnexpectedPayload);
    }

    let static_size = size_of::<StaticNatOriginalAddressPayload>();
    let payload_length = static_part.generic_payload_header.payload_length.get() as usize;
    let address = buf
        .get(static_size..payload_length)
        .ok_or(IsakmpParseError::BufferTooSmall)?
        .to_vec();

    Ok(NatOriginalAddressPayload {
        next_payload: PayloadType::try_from(static_part.generic_payload_header.next_payload)?,
        length: static_part.generic_payload_header.payload_length.get(),
        id_type: static_part.id_type,
        address,
    })
}
