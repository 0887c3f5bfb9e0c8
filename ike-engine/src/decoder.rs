//! Payload Decoder, see §4.3: validates a parsed packet's payload chain
//! against a transition's required/optional payload masks and fills a
//! [MessageDigest]'s payload chains.

use isakmp::v1::parser::definitions::Packet;
use isakmp::v1::NotifyMessageType;
use isakmp::v1::PayloadType;

use crate::digest::MessageDigest;
use crate::state::Transition;

/// Payload types that are always acceptable regardless of a transition's
/// declared masks, per §4.3.
const ALWAYS_ACCEPTABLE: &[PayloadType] = &[
    PayloadType::VendorID,
    PayloadType::Notification,
    PayloadType::Delete,
    PayloadType::CertificateRequest,
    PayloadType::Certificate,
];

/// Outcome of decoding a packet's payload chain against a transition.
pub enum DecodeOutcome {
    /// All required payloads were present and no unexpected payload was seen.
    Ok,
    /// A required payload was missing or an unexpected payload type appeared.
    Reject(NotifyMessageType),
}

/// Validate `packet`'s payload chain against `transition`'s masks and copy
/// its payloads into `digest.payloads`.
///
/// `packet` was already fully parsed structurally by
/// [isakmp::v1::parser::parse_packet]; this step only enforces the
/// engine-level grammar (which payload types are expected here, and whether
/// every required one showed up), plus the Phase-1/Quick-Mode ordering rules.
pub fn decode(packet: Packet, transition: &Transition, digest: &mut MessageDigest) -> DecodeOutcome {
    let present: Vec<PayloadType> = present_payload_types(&packet);

    for &required in transition.required_payloads {
        if !present.contains(&required) {
            return DecodeOutcome::Reject(NotifyMessageType::PayloadMalformed);
        }
    }

    for &kind in &present {
        if transition.required_payloads.contains(&kind)
            || transition.optional_payloads.contains(&kind)
            || ALWAYS_ACCEPTABLE.contains(&kind)
        {
            continue;
        }
        return DecodeOutcome::Reject(NotifyMessageType::InvalidPayloadType);
    }

    if !check_ordering(&packet) {
        return DecodeOutcome::Reject(NotifyMessageType::PayloadMalformed);
    }

    digest.payloads.security_associations = packet.security_associations;
    digest.payloads.key_exchanges = packet.key_exchanges;
    digest.payloads.identifications = packet.identifications;
    digest.payloads.certificates = packet.certificates;
    digest.payloads.certificate_requests = packet.certificate_requests;
    digest.payloads.hashes = packet.hashes;
    digest.payloads.signatures = packet.signatures;
    digest.payloads.nonces = packet.nonces;
    digest.payloads.notifications = packet.notification_payloads;
    digest.payloads.deletes = packet.deletes;
    digest.payloads.vendor_ids = packet.vendor_ids;
    digest.payloads.attributes = packet.attributes;
    digest.payloads.nat_discoveries = packet.nat_discoveries;
    digest.payloads.nat_original_addresses = packet.nat_original_addresses;

    DecodeOutcome::Ok
}

fn present_payload_types(packet: &Packet) -> Vec<PayloadType> {
    let mut present = Vec::new();
    if !packet.security_associations.is_empty() {
        present.push(PayloadType::SecurityAssociation);
    }
    if !packet.key_exchanges.is_empty() {
        present.push(PayloadType::KeyExchange);
    }
    if !packet.identifications.is_empty() {
        present.push(PayloadType::Identification);
    }
    if !packet.certificates.is_empty() {
        present.push(PayloadType::Certificate);
    }
    if !packet.certificate_requests.is_empty() {
        present.push(PayloadType::CertificateRequest);
    }
    if !packet.hashes.is_empty() {
        present.push(PayloadType::Hash);
    }
    if !packet.signatures.is_empty() {
        present.push(PayloadType::Signature);
    }
    if !packet.nonces.is_empty() {
        present.push(PayloadType::Nonce);
    }
    if !packet.notification_payloads.is_empty() {
        present.push(PayloadType::Notification);
    }
    if !packet.deletes.is_empty() {
        present.push(PayloadType::Delete);
    }
    if !packet.vendor_ids.is_empty() {
        present.push(PayloadType::VendorID);
    }
    if !packet.attributes.is_empty() {
        present.push(PayloadType::Attribute);
    }
    present
}

/// Phase-1/1.5 and Quick Mode payload ordering rules, see §4.3.
///
/// `SAK` payloads are filtered out entirely by the low-level parser (it
/// refuses to produce a structured body for a payload type with no
/// standardized shape) rather than appearing here to be skipped; the
/// practical effect is identical to "silently skipped", since no trace of
/// it survives into the digest either way.
fn check_ordering(packet: &Packet) -> bool {
    use isakmp::v1::ExchangeType;

    match packet.header.exchange_mode {
        ExchangeType::IdentityProtection | ExchangeType::Aggressive | ExchangeType::Transaction => {
            if !packet.security_associations.is_empty() && packet.header.next_payload != PayloadType::SecurityAssociation {
                return false;
            }
            true
        }
        ExchangeType::QuickMode => {
            if packet.header.next_payload != PayloadType::Hash {
                return false;
            }
            match packet.identifications.len() {
                0 | 2 => true,
                _ => false,
            }
        }
        _ => true,
    }
}
