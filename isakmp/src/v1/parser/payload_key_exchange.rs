//! Parser of the key exchange payload

use zerocopy::FromBytes;

use crate::v1::definitions::PayloadType;
use crate::v1::definitions::StaticKeyExchangePayload;
use crate::v1::parser::definitions::KeyExchangePayload;
use crate::v1::parser::errors::IsakmpParseError;

/// Parse a key exchange payload
pub fn parse_key_exchange(buf: &[u8]) -> Result<KeyExchangePayload, IsakmpParseError> {
    let static_part =
        StaticKeyExchangePayload::ref_from_prefix(buf).ok_or(IsakmpParseError::BufferTooSmall)?;

    if static_part.generic_payload_header.reserved != 0 {
        return Err(IsakmpParseError::UnexpectedPayload);
    }

    let static_size = size_of::<StaticKeyExchangePayload>();
    let payload_length = static_part.generic_payload_header.payload_length.get() as usize;
    let key_exchange_data = buf
        .get(static_size..payload_length)
        .ok_or(IsakmpParseError::BufferTooSmall)?
        .to_vec();

    Ok(KeyExchangePayload {
        next_payload: PayloadType::try_from(static_part.generic_payload_header.next_payload)?,
        length: static_part.generic_payload_header.payload_length.get(),
        key_exchange_data,
    })
}
