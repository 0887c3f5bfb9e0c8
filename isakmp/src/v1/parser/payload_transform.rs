//! Parser of the transform payload

use zerocopy::FromBytes;

use crate::v1::definitions::PayloadType;
use crate::v1::parser::data_attribute::parse_data_attribute;
use crate::v1::parser::definitions::TransformPayload;
use crate::v1::parser::errors::IsakmpParseError;

/// Parse a transform payload
pub fn parse_transform(buf: &[u8]) -> Result<TransformPayload, IsakmpParseError> {
    let static_part = crate::v1::definitions::StaticTransformPayload::ref_from_prefix(buf)
        .ok_or(IsakmpParseError::BufferTooSmall)?;

    if static_part.generic_payload_header.reserved != 0 || static_part.reserved.get() != 0 {
        return Err(IsakmpParseError::UnexpectedPayload);
    }

    let static_size = size_of::<crate::v1::definitions::StaticTransformPayload>();
    let payload_length = static_part.generic_payload_header.payload_length.get() as usize;

    let remaining = buf
        .get(static_size..payload_length)
        .ok_or(IsakmpParseError::BufferTooSmall)?;

    let mut sa_attributes = vec![];
    let mut start = 0;
    while start < remaining.len() {
        let (attribute, consumed) = parse_data_attribute(&remaining[start..])?;
        start += consumed;
        sa_attributes.push(attribute);
    }

    Ok(TransformPayload {
        next_payload: PayloadType::try_from(static_part.generic_payload_header.next_payload)?,
        length: static_part.generic_payload_header.payload_length.get(),
        transform_no: static_part.transform_no,
        transform_id: static_part.transform_id,
        sa_attributes,
    })
}
