//! Parser of the certificate payload

use zerocopy::FromBytes;

use crate::v1::definitions::CertificateEncoding;
use crate::v1::definitions::PayloadType;
use crate::v1::definitions::StaticCertificatePayload;
use crate::v1::parser::definitions::CertificatePayload;
use crate::v1::parser::errors::IsakmpParseError;

/// Parse a certificate payload
pub fn parse_certificate(buf: &[u8]) -> Result<CertificatePayload, IsakmpParseError> {
    let static_part =
        StaticCertificatePayload::ref_from_prefix(buf).ok_or(IsakmpParseError::BufferTooSmall)?;

    if static_part.generic_payload_header.reserved != 0 {
        return Err(IsakmpParseError::UnexpectedPayload);
    }

    let static_size = size_of::<StaticCertificatePayload>();
    let payload_length = static_part.generic_payload_header.payload_length.get() as usize;
    let certificate_data = buf
        .get(static_size..payload_length)
        .ok_or(IsakmpParseError::BufferTooSmall)?
        .to_vec();

    Ok(CertificatePayload {
        next_payload: PayloadType::try_from(static_part.generic_payload_header.next_payload)?,
        length: static_part.generic_payload_header.payload_length.get(),
        certificate_encoding: CertificateEncoding::try_from(static_part.certificate_encoding)?,
        certificate_data,
    })
}
