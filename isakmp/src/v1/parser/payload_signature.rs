//! Parser of the signature payload

use zerocopy::FromBytes;

use crate::v1::definitions::PayloadType;
use crate::v1::definitions::StaticSignaturePayload;
use crate::v1::parser::definitions::SignaturePayload;
use crate::v1::parser::errors::IsakmpParseError;

/// Parse a signature payload
pub fn parse_signature(buf: &[u8]) -> Result<SignaturePayload, IsakmpParseError> {
    let static_part =
        StaticSignaturePayload::ref_from_prefix(buf).ok_or(IsakmpParseError::BufferTooSmall)?;

    if static_part.generic_payload_header.reserved != 0 {
        return Err(IsakmpParseError::UnexpectedPayload);
    }

    let static_size = size_of::<StaticSignaturePayload>();
    let payload_length = static_part.generic_payload_header.payload_length.get() as usize;
    let signature_data = buf
        .get(static_size..payload_length)
        .ok_or(IsakmpParseError::BufferTooSmall)?
        .to_vec();

    Ok(SignaturePayload {
        next_payload: PayloadType::try_from(static_part.generic_payload_header.next_payload)?,
        length: static_part.generic_payload_header.payload_length.get(),
        signature_data,
    })
}
