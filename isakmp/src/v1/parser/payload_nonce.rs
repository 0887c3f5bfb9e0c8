//! Parser of the nonce payload

use zerocopy::FromBytes;

use crate::v1::definitions::PayloadType;
use crate::v1::definitions::StaticNoncePayload;
use crate::v1::parser::definitions::NoncePayload;
use crate::v1::parser::errors::IsakmpParseError;

/// Parse a nonce payload
pub fn parse_nonce(buf: &[u8]) -> Result<NoncePayload, IsakmpParseError> {
    let static_part =
        StaticNoncePayload::ref_from_prefix(buf).ok_or(IsakmpParseError::BufferTooSmall)?;

    if static_part.generic_payload_header.reserved != 0 {
        return Err(IsakmpParseError::UnexpectedPayload);
    }

    let static_size = size_of::<StaticNoncePayload>();
    let payload_length = static_part.generic_payload_header.payload_length.get() as usize;
    let nonce_data = buf
        .get(static_size..payload_length)
        .ok_or(IsakmpParseError::BufferTooSmall)?
        .to_vec();

    Ok(NoncePayload {
        next_payload: PayloadType::try_from(static_part.generic_payload_header.next_payload)?,
        length: static_part.generic_payload_header.payload_length.get(),
        nonce_data,
    })
}
