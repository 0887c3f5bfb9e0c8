//! Parser of the delete payload

use zerocopy::FromBytes;

use crate::v1::definitions::DomainOfInterpretation;
use crate::v1::definitions::PayloadType;
use crate::v1::definitions::StaticDeletePayload;
use crate::v1::parser::definitions::DeletePayload;
use crate::v1::parser::errors::IsakmpParseError;

/// Parse a delete payload
pub fn parse_delete(buf: &[u8]) -> Result<DeletePayload, IsakmpParseError> {
    let static_part =
        StaticDeletePayload::ref_from_prefix(buf).ok_or(IsakmpParseError::BufferTooSmall)?;

    if static_part.generic_payload_header.reserved != 0 {
        return Err(IsakmpParseError::UnexpectedPayload);
    }

    let static_size = size_of::<StaticDeletePayload>();
    let payload_length = static_part.generic_payload_header.payload_length.get() as usize;
    let spi_size = static_part.spi_size as usize;
    let no_of_spis = static_part.no_of_spis.get() as usize;

    let remaining = buf
        .get(static_size..payload_length)
        .ok_or(IsakmpParseError::BufferTooSmall)?;

    if spi_size != 0 && remaining.len() != spi_size * no_of_spis {
        return Err(IsakmpParseError::UnexpectedPayload);
    }

    let spis = remaining.chunks(spi_size.max(1)).map(<[u8]>::to_vec).collect();

    Ok(DeletePayload {
        next_payload: PayloadType::try_from(static_part.generic_payload_header.next_payload)?,
        length: static_part.generic_payload_header.payload_length.get(),
        domain_of_interpretation: DomainOfInterpretation::try_from(static_part.doi.get())?,
        protocol_id: static_part.protocol_id,
        spi_size: static_part.spi_size,
        spis,
    })
}
