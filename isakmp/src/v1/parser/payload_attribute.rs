//! Parser of the Mode-Config / XAUTH attribute payload

use zerocopy::FromBytes;

use crate::v1::definitions::ModeConfigType;
use crate::v1::definitions::PayloadType;
use crate::v1::definitions::StaticAttributePayload;
use crate::v1::parser::data_attribute::parse_data_attribute;
use crate::v1::parser::definitions::AttributePayload;
use crate::v1::parser::errors::IsakmpParseError;

/// Parse a Mode-Config / XAUTH attribute payload
pub fn parse_attribute(buf: &[u8]) -> Result<AttributePayload, IsakmpParseError> {
    let static_part =
        StaticAttributePayload::ref_from_prefix(buf).ok_or(IsakmpParseError::BufferTooSmall)?;

    if static_part.generic_payload_header.reserved != 0 || static_part.reserved != 0 {
        return Err(IsakmpParseError::UnexpectedPayload);
    }

    let static_size = size_of::<StaticAttributePayload>();
    let payload_length = static_part.generic_payload_header.payload_length.get() as usize;
    let remaining = buf
        .get(static_size..payload_length)
        .ok_or(IsakmpParseError::BufferTooSmall)?;

    let mut attributes = vec![];
    let mut start = 0;
    while start < remaining.len() {
        let (attribute, consumed) = parse_data_attribute(&remaining[start..])?;
        start += consumed;
        attributes.push(attribute);
    }

    Ok(AttributePayload {
        next_payload: PayloadType::try_from(static_part.generic_payload_header.next_payload)?,
        length: static_part.generic_payload_header.payload_length.get(),
        attribute_payload_type: ModeConfigType::try_from(static_part.attribute_payload_type)
            .map_err(|_| IsakmpParseError::UnparsableVariant)?,
        identifier: static_part.identifier.get(),
        attributes,
    })
}
