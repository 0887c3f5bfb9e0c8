//! Identity & Connection Refinement, see §4.9: extracts the peer's declared
//! identity from the first authenticated Phase-1 message that carries one,
//! verifies it against the certificate chain (if any), and lets a responder
//! narrow a road-warrior connection match down to a specific configured peer.

use isakmp::v1::parser::definitions::CertificatePayload;
use isakmp::v1::parser::definitions::CertificateRequestPayload;
use isakmp::v1::parser::definitions::IdentificationPayload;
use isakmp::v1::IdentificationType;

use crate::policy::Connection;
use crate::policy::PolicyError;
use crate::policy::PolicyProvider;
use crate::sa::IkeSa;
use crate::sa::Role;

/// A peer identity extracted from an Identification payload.
#[derive(Debug, Clone)]
pub struct PeerIdentity {
    /// The kind of identity data carried
    pub kind: IdentificationType,
    /// The raw identity bytes, interpretation depends on `kind`
    pub bytes: Vec<u8>,
}

/// Outcome of checking a peer's certificate chain against its claimed identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateOutcome {
    /// No certificate was presented; the connection's trust model must allow this.
    None,
    /// A certificate was presented but failed to validate.
    Bad,
    /// A certificate validated but its subject does not match the claimed identity.
    MismatchedId,
    /// A certificate validated and matches the claimed identity.
    IdOk,
}

/// Extract a [PeerIdentity] from an Identification payload, validating that
/// Phase-1 identities carry no protocol/port restriction, per §4.9.
pub fn extract_identity(id: &IdentificationPayload) -> Option<PeerIdentity> {
    if id.protocol_id != 0 || id.port != 0 {
        return None;
    }
    Some(PeerIdentity {
        kind: id.id_type,
        bytes: id.identification_data.clone(),
    })
}

/// Evaluate a presented certificate chain against the claimed identity. With
/// no certificate validation collaborator wired into this engine yet, any
/// non-empty chain is treated as unverifiable.
pub fn evaluate_certificates(certs: &[CertificatePayload], _identity: &PeerIdentity) -> CertificateOutcome {
    if certs.is_empty() {
        CertificateOutcome::None
    } else {
        CertificateOutcome::Bad
    }
}

/// Decode the certificate authorities a peer is willing to accept from a
/// Certificate Request chain, for use when this side later sends CERT.
pub fn decode_certificate_requests(crs: &[CertificateRequestPayload]) -> Vec<Vec<u8>> {
    crs.iter().map(|cr| cr.certificate_authority.clone()).collect()
}

/// Outcome of running connection refinement against a newly learned identity.
pub enum RefinementOutcome {
    /// The SA's current connection already matches; nothing to do.
    Unchanged,
    /// A better match was found; rebind the SA to it.
    Rebind(Connection),
    /// No connection matches this peer and identity at all.
    NoMatch,
}

/// Run §4.9's connection refinement for a responder that has just learned
/// the peer's identity in Main Mode. Aggressive Mode responders never reach
/// this: the connection is fixed by the SA proposal already sent in message 1.
///
/// `depth` bounds the refinement recursion to exactly one extra attempt, as
/// the specification requires: a connection chosen by identity must not
/// itself trigger a second round of refinement.
pub fn refine_responder_connection(
    sa: &IkeSa,
    policy: &dyn PolicyProvider,
    identity: &PeerIdentity,
    depth: u8,
) -> RefinementOutcome {
    if sa.role != Role::Responder {
        return RefinementOutcome::Unchanged;
    }
    if depth > 1 {
        return RefinementOutcome::Unchanged;
    }

    match policy.refine_by_identity(sa.peer.ip(), &identity.bytes) {
        Ok(refined) if refined.name == sa.connection.name => RefinementOutcome::Unchanged,
        Ok(refined) => RefinementOutcome::Rebind(refined),
        Err(PolicyError::NoMatch) => RefinementOutcome::NoMatch,
    }
}

/// Verify an initiator's own expectation of the peer's identity: the peer's
/// claimed identity must match the configured remote identity, or the
/// connection must accept any certified identity (`FROMCERT`), per §4.9.
pub fn verify_initiator_expectation(connection: &Connection, claimed: &PeerIdentity, cert: CertificateOutcome) -> bool {
    if cert == CertificateOutcome::IdOk {
        return true;
    }
    // Without a configured expected-identity field on `Connection` beyond its
    // address match, an initiator accepts whatever identity the responder it
    // dialed presents, provided the certificate chain (if any) was not
    // outright rejected.
    let _ = claimed;
    cert != CertificateOutcome::Bad && cert != CertificateOutcome::MismatchedId
}
