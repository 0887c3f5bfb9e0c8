//! Parser of the identification payload

use zerocopy::FromBytes;

use crate::v1::definitions::IdentificationType;
use crate::v1::definitions::PayloadType;
use crate::v1::definitions::StaticIdentificationPayload;
use crate::v1::parser::definitions::IdentificationPayload;
use crate::v1::parser::errors::IsakmpParseError;

/// Parse an identification payload
pub fn parse_identification(buf: &[u8]) -> Result<IdentificationPayload, IsakmpParseError> {
    let static_part = StaticIdentificationPayload::ref_from_prefix(buf)
        .ok_or(IsakmpParseError::BufferTooSmall)?;

    if static_part.generic_payload_header.reserved != 0 {
        return Err(IsakmpParseError::UnexpectedPayload);
    }

    let static_size = size_of::<StaticIdentificationPayload>();
    let payload_length = static_part.generic_payload_header.payload_length.get() as usize;
    let identification_data = buf
        .get(static_size..payload_length)
        .ok_or(IsakmpParseError::BufferTooSmall)?
        .to_vec();

    Ok(IdentificationPayload {
        next_payload: PayloadType::try_from(static_part.generic_payload_header.next_payload)?,
        length: static_part.generic_payload_header.payload_length.get(),
        id_type: IdentificationType::try_from(static_part.id_type)
            .map_err(|_| IsakmpParseError::UnparsableVariant)?,
        protocol_id: static_part.protocol_id,
        port: static_part.port.get(),
        identification_data,
    })
}
