//! Chains [RawPayload]s together into a complete ISAKMP message

use zerocopy::network_endian::U32;
use zerocopy::network_endian::U64;
use zerocopy::AsBytes;

use crate::v1::definitions::ExchangeType;
use crate::v1::definitions::GenericPayloadHeader;
use crate::v1::definitions::Header;
use crate::v1::definitions::PayloadType;
use crate::v1::generator::payloads::RawPayload;
use crate::v1::IKE_1_VERSION_VALUE;

/// Encode a full ISAKMP header plus a chain of payloads into wire bytes.
///
/// `body` is passed through unencrypted; callers that need `OUTPUT_ENCRYPTED`
/// are expected to encrypt everything after the header themselves and patch
/// the encryption flag, since this module has no access to key material.
pub fn assemble(
    initiator_cookie: u64,
    responder_cookie: u64,
    exchange_type: ExchangeType,
    flags: u8,
    message_id: u32,
    payloads: &[RawPayload],
) -> Vec<u8> {
    let mut chained = Vec::with_capacity(payloads.len());
    for (i, payload) in payloads.iter().enumerate() {
        let next_payload = payloads
            .get(i + 1)
            .map_or(PayloadType::None, |p| p.payload_type);
        let generic_header = GenericPayloadHeader {
            next_payload: next_payload as u8,
            reserved: 0,
            payload_length: zerocopy::network_endian::U16::new(
                (size_of::<GenericPayloadHeader>() + payload.body.len()) as u16,
            ),
        };
        chained.push(generic_header.as_bytes().to_vec());
        chained.push(payload.body.clone());
    }

    let total_len: usize =
        size_of::<Header>() + chained.iter().map(Vec::len).sum::<usize>();

    let header = Header {
        initiator_cookie: U64::new(initiator_cookie),
        responder_cookie: U64::new(responder_cookie),
        next_payload: payloads.first().map_or(PayloadType::None, |p| p.payload_type) as u8,
        version: IKE_1_VERSION_VALUE,
        exchange_type: exchange_type as u8,
        flags,
        message_id: U32::new(message_id),
        length: U32::new(total_len as u32),
    };

    let mut out = header.as_bytes().to_vec();
    for chunk in chained {
        out.extend_from_slice(&chunk);
    }
    out
}
