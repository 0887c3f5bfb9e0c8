//! Parser of the non-standard IKE fragmentation payload

use zerocopy::FromBytes;

use crate::v1::definitions::PayloadType;
use crate::v1::definitions::StaticFragmentationPayload;
use crate::v1::definitions::FRAGMENT_FLAG_LAST;
use crate::v1::parser::definitions::FragmentationPayload;
use crate::v1::parser::errors::IsakmpParseError;

/// Parse a fragment of a larger ISAKMP message
pub fn parse_fragmentation(buf: &[u8]) -> Result<FragmentationPayload, IsakmpParseError> {
    let static_part = StaticFragmentationPayload::ref_from_prefix(buf)
        .ok_or(IsakmpParseError::BufferTooSmall)?;

    if static_part.generic_payload_header.reserved != 0 || static_part.fragment_number == 0 {
        return Err(IsakmpParseError::UnexpectedPayload);
    }

    let static_size = size_of::<StaticFragmentationPayload>();
    let payload_length = static_part.generic_payload_header.payload_length.get() as usize;
    let data = buf
        .get(static_size..payload_length)
        .ok_or(IsakmpParseError::BufferTooSmall)?
        .to_vec();

    Ok(FragmentationPayload {
        next_payload: PayloadType::try_from(static_part.generic_payload_header.next_payload)?,
        length: static_part.generic_payload_header.payload_length.get(),
        fragment_id: static_part.fragment_id.get(),
        fragment_number: static_part.fragment_number,
        is_last: static_part.flags & FRAGMENT_FLAG_LAST == FRAGMENT_FLAG_LAST,
        data,
    })
}
