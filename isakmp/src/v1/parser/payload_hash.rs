//! Parser of the hash payload

use zerocopy::FromBytes;

use crate::v1::definitions::PayloadType;
use crate::v1::definitions::StaticHashPayload;
use crate::v1::parser::definitions::HashPayload;
use crate::v1::parser::errors::IsakmpParseError;

/// Parse a hash payload
pub fn parse_hash(buf: &[u8]) -> Result<HashPayload, IsakmpParseError> {
    let static_part =
        StaticHashPayload::ref_from_prefix(buf).ok_or(IsakmpParseError::BufferTooSmall)?;

    if static_part.generic_payload_header.reserved != 0 {
        return Err(IsakmpParseError::UnexpectedPayload);
    }

    let static_size = size_of::<StaticHashPayload>();
    let payload_length = static_part.generic_payload_header.payload_length.get() as usize;
    let hash_data = buf
        .get(static_size..payload_length)
        .ok_or(IsakmpParseError::BufferTooSmall)?
        .to_vec();

    Ok(HashPayload {
        next_payload: PayloadType::try_from(static_part.generic_payload_header.next_payload)?,
        length: static_part.generic_payload_header.payload_length.get(),
        hash_data,
    })
}
