//! Wire-format definitions for ISAKMP / IKEv1 (RFC 2408, RFC 2409, RFC 2407)
//!
//! Structs prefixed with `Static` map directly onto the fixed-size portion of a
//! payload and are laid out with [zerocopy] so they can be read from or written
//! to a byte buffer without copying. Variable-length tails (identification data,
//! key exchange material, SPI lists, ...) are carried alongside as plain `Vec<u8>`.

use strum::EnumIter;
use zerocopy::network_endian::U16;
use zerocopy::network_endian::U32;
use zerocopy::network_endian::U64;
use zerocopy::AsBytes;
use zerocopy::FromBytes;
use zerocopy::FromZeroes;

/// The fixed 28-byte ISAKMP header shared by every exchange type and IKE version
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct Header {
    /// Cookie chosen by the initiator
    pub initiator_cookie: U64,
    /// Cookie chosen by the responder, zero until it has been assigned
    pub responder_cookie: U64,
    /// Type of the first payload following this header
    pub next_payload: u8,
    /// Protocol version, major nibble << 4 | minor nibble
    pub version: u8,
    /// Exchange type, see [ExchangeType]
    pub exchange_type: u8,
    /// Bit 0 = Encryption, bit 1 = Commit, bit 2 = Authentication Only
    pub flags: u8,
    /// Zero in Phase 1, random per Phase 2 / Phase 1.5 negotiation
    pub message_id: U32,
    /// Total length of the message, header included
    pub length: U32,
}

/// The generic 4-byte payload header that precedes every payload's body
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct GenericPayloadHeader {
    /// Type of the payload following this one
    pub next_payload: u8,
    /// Must be zero
    pub reserved: u8,
    /// Length of this payload, including the generic header
    pub payload_length: U16,
}

/// Bit 0 of the header flags: body is encrypted under `SKEYID_e`
pub const FLAG_ENCRYPTION: u8 = 0b0000_0001;
/// Bit 1 of the header flags: Commit Bit, always ignored with a warning
pub const FLAG_COMMIT: u8 = 0b0000_0010;
/// Bit 2 of the header flags: Authentication Only
pub const FLAG_AUTH_ONLY: u8 = 0b0000_0100;

/// Type of the payload being used, see RFC 2408 section 3.1
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum PayloadType {
    None = 0,
    SecurityAssociation = 1,
    Proposal = 2,
    Transform = 3,
    KeyExchange = 4,
    Identification = 5,
    Certificate = 6,
    CertificateRequest = 7,
    Hash = 8,
    Signature = 9,
    Nonce = 10,
    Notification = 11,
    Delete = 12,
    VendorID = 13,
    Attribute = 14,
    /// Non-standard "SA KEK" payload used by a handful of GDOI-adjacent stacks;
    /// recognized only so it can be silently skipped, per RFC 2408bis erratum discussion.
    Sak = 15,
    /// RFC 3947, also used by the NAT-T drafts preceding it
    NatDiscoveryRfc = 20,
    /// RFC 3947, also used by the NAT-T drafts preceding it
    NatOriginalAddressRfc = 21,
    /// draft-ietf-ipsec-nat-t-ike (pre-RFC 3947)
    NatDiscoveryDraft = 130,
    /// draft-ietf-ipsec-nat-t-ike (pre-RFC 3947)
    NatOriginalAddressDraft = 131,
    /// Non-standard fragmentation extension (Cisco/Checkpoint compatible)
    IkeFragmentation = 132,
}

/// Error returned when a [PayloadType] byte does not map onto a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadTypeOther(pub u8);

impl TryFrom<u8> for PayloadType {
    type Error = PayloadTypeOther;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PayloadType::None),
            1 => Ok(PayloadType::SecurityAssociation),
            2 => Ok(PayloadType::Proposal),
            3 => Ok(PayloadType::Transform),
            4 => Ok(PayloadType::KeyExchange),
            5 => Ok(PayloadType::Identification),
            6 => Ok(PayloadType::Certificate),
            7 => Ok(PayloadType::CertificateRequest),
            8 => Ok(PayloadType::Hash),
            9 => Ok(PayloadType::Signature),
            10 => Ok(PayloadType::Nonce),
            11 => Ok(PayloadType::Notification),
            12 => Ok(PayloadType::Delete),
            13 => Ok(PayloadType::VendorID),
            14 => Ok(PayloadType::Attribute),
            15 => Ok(PayloadType::Sak),
            20 => Ok(PayloadType::NatDiscoveryRfc),
            21 => Ok(PayloadType::NatOriginalAddressRfc),
            130 => Ok(PayloadType::NatDiscoveryDraft),
            131 => Ok(PayloadType::NatOriginalAddressDraft),
            132 => Ok(PayloadType::IkeFragmentation),
            other => Err(PayloadTypeOther(other)),
        }
    }
}

/// Type of exchange being carried out, see RFC 2408 section 3.1 and RFC 2409
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum ExchangeType {
    None = 0,
    Base = 1,
    /// Main Mode
    IdentityProtection = 2,
    AuthOnly = 3,
    /// Aggressive Mode
    Aggressive = 4,
    Informational = 5,
    /// Mode-Config / XAUTH transaction exchange
    Transaction = 6,
    /// Quick Mode (Phase 2)
    QuickMode = 32,
    NewGroupMode = 33,
}

/// Error returned when an [ExchangeType] byte does not map onto a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeTypeOther(pub u8);

impl TryFrom<u8> for ExchangeType {
    type Error = ExchangeTypeOther;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ExchangeType::None),
            1 => Ok(ExchangeType::Base),
            2 => Ok(ExchangeType::IdentityProtection),
            3 => Ok(ExchangeType::AuthOnly),
            4 => Ok(ExchangeType::Aggressive),
            5 => Ok(ExchangeType::Informational),
            6 => Ok(ExchangeType::Transaction),
            32 => Ok(ExchangeType::QuickMode),
            33 => Ok(ExchangeType::NewGroupMode),
            other => Err(ExchangeTypeOther(other)),
        }
    }
}

/// Domain of interpretation carried in the Security Association payload
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash)]
#[repr(u32)]
pub enum DomainOfInterpretation {
    /// RFC 2407, the only DOI this engine negotiates
    Ipsec = 1,
}

/// Error returned when a DOI value does not map onto a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDomainOfInterpretation(pub u32);

impl TryFrom<u32> for DomainOfInterpretation {
    type Error = InvalidDomainOfInterpretation;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DomainOfInterpretation::Ipsec),
            other => Err(InvalidDomainOfInterpretation(other)),
        }
    }
}

/// Oakley SA attribute classes, RFC 2409 Appendix A
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash, EnumIter)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum AttributeType {
    Reserved = 0,
    EncryptionAlgorithm = 1,
    HashAlgorithm = 2,
    AuthenticationMethod = 3,
    GroupDescription = 4,
    GroupType = 5,
    GroupPrime = 6,
    GroupGeneratorOne = 7,
    GroupGeneratorTwo = 8,
    GroupCurveA = 9,
    GroupCurveB = 10,
    LifeType = 11,
    LifeDuration = 12,
    PRF = 13,
    KeyLength = 14,
    FieldSize = 15,
    GroupOrder = 16,
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Error returned when an [AttributeType] value does not map onto a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeTypeOther(pub u16);

impl TryFrom<u16> for AttributeType {
    type Error = AttributeTypeOther;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AttributeType::Reserved),
            1 => Ok(AttributeType::EncryptionAlgorithm),
            2 => Ok(AttributeType::HashAlgorithm),
            3 => Ok(AttributeType::AuthenticationMethod),
            4 => Ok(AttributeType::GroupDescription),
            5 => Ok(AttributeType::GroupType),
            6 => Ok(AttributeType::GroupPrime),
            7 => Ok(AttributeType::GroupGeneratorOne),
            8 => Ok(AttributeType::GroupGeneratorTwo),
            9 => Ok(AttributeType::GroupCurveA),
            10 => Ok(AttributeType::GroupCurveB),
            11 => Ok(AttributeType::LifeType),
            12 => Ok(AttributeType::LifeDuration),
            13 => Ok(AttributeType::PRF),
            14 => Ok(AttributeType::KeyLength),
            15 => Ok(AttributeType::FieldSize),
            16 => Ok(AttributeType::GroupOrder),
            other => Err(AttributeTypeOther(other)),
        }
    }
}

/// Encryption algorithm transform IDs, RFC 2409 Appendix A plus RFC 3602/4869
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash, EnumIter)]
#[repr(u16)]
#[allow(missing_docs, non_camel_case_types)]
pub enum EncryptionAlgorithm {
    DES_CBC = 1,
    IDEA_CBC = 2,
    Blowfish_CBC = 3,
    RC5_R16_B64_CBC = 4,
    TripleDES_CBC = 5,
    CAST_CBC = 6,
    AES_CBC = 7,
    Camellia_CBC = 8,
}

/// Error returned when an [EncryptionAlgorithm] value does not map onto a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptionAlgorithmOther(pub u16);

impl TryFrom<u16> for EncryptionAlgorithm {
    type Error = EncryptionAlgorithmOther;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(EncryptionAlgorithm::DES_CBC),
            2 => Ok(EncryptionAlgorithm::IDEA_CBC),
            3 => Ok(EncryptionAlgorithm::Blowfish_CBC),
            4 => Ok(EncryptionAlgorithm::RC5_R16_B64_CBC),
            5 => Ok(EncryptionAlgorithm::TripleDES_CBC),
            6 => Ok(EncryptionAlgorithm::CAST_CBC),
            7 => Ok(EncryptionAlgorithm::AES_CBC),
            8 => Ok(EncryptionAlgorithm::Camellia_CBC),
            other => Err(EncryptionAlgorithmOther(other)),
        }
    }
}

impl EncryptionAlgorithm {
    /// Cipher block size in octets, used to validate encrypted body lengths and IV sizes
    pub fn block_size(self) -> usize {
        match self {
            EncryptionAlgorithm::DES_CBC
            | EncryptionAlgorithm::IDEA_CBC
            | EncryptionAlgorithm::Blowfish_CBC
            | EncryptionAlgorithm::RC5_R16_B64_CBC
            | EncryptionAlgorithm::TripleDES_CBC
            | EncryptionAlgorithm::CAST_CBC => 8,
            EncryptionAlgorithm::AES_CBC | EncryptionAlgorithm::Camellia_CBC => 16,
        }
    }
}

/// Hash / PRF algorithms, RFC 2409 Appendix A plus RFC 4868
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash, EnumIter)]
#[repr(u16)]
#[allow(missing_docs, non_camel_case_types)]
pub enum HashAlgorithm {
    MD5 = 1,
    SHA = 2,
    Tiger = 3,
    SHA2_256 = 4,
    SHA2_384 = 5,
    SHA2_512 = 6,
}

/// Error returned when a [HashAlgorithm] value does not map onto a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashAlgorithmOther(pub u16);

impl TryFrom<u16> for HashAlgorithm {
    type Error = HashAlgorithmOther;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(HashAlgorithm::MD5),
            2 => Ok(HashAlgorithm::SHA),
            3 => Ok(HashAlgorithm::Tiger),
            4 => Ok(HashAlgorithm::SHA2_256),
            5 => Ok(HashAlgorithm::SHA2_384),
            6 => Ok(HashAlgorithm::SHA2_512),
            other => Err(HashAlgorithmOther(other)),
        }
    }
}

/// Authentication methods, RFC 2409 Appendix A plus the widely deployed
/// XAUTH and Hybrid Auth vendor extensions
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash, EnumIter)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum AuthenticationMethod {
    PreSharedKey = 1,
    DSSSignatures = 2,
    RSASignatures = 3,
    EncryptionWithRSA = 4,
    RevisedEncryptionWithRSA = 5,
    HybridInitRSA = 64221,
    HybridRespRSA = 64222,
    XAUTHInitPreShared = 65001,
    XAUTHRespPreShared = 65002,
    XAUTHInitRSA = 65005,
    XAUTHRespRSA = 65006,
}

/// Error returned when an [AuthenticationMethod] value does not map onto a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticationMethodOther(pub u16);

impl TryFrom<u16> for AuthenticationMethod {
    type Error = AuthenticationMethodOther;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AuthenticationMethod::PreSharedKey),
            2 => Ok(AuthenticationMethod::DSSSignatures),
            3 => Ok(AuthenticationMethod::RSASignatures),
            4 => Ok(AuthenticationMethod::EncryptionWithRSA),
            5 => Ok(AuthenticationMethod::RevisedEncryptionWithRSA),
            64221 => Ok(AuthenticationMethod::HybridInitRSA),
            64222 => Ok(AuthenticationMethod::HybridRespRSA),
            65001 => Ok(AuthenticationMethod::XAUTHInitPreShared),
            65002 => Ok(AuthenticationMethod::XAUTHRespPreShared),
            65005 => Ok(AuthenticationMethod::XAUTHInitRSA),
            65006 => Ok(AuthenticationMethod::XAUTHRespRSA),
            other => Err(AuthenticationMethodOther(other)),
        }
    }
}

impl AuthenticationMethod {
    /// The broad authentication class this method belongs to, as used to select
    /// a microcode entry for a given state (see the state transition table)
    pub fn auth_class(self) -> AuthClass {
        match self {
            AuthenticationMethod::PreSharedKey
            | AuthenticationMethod::XAUTHInitPreShared
            | AuthenticationMethod::XAUTHRespPreShared => AuthClass::Psk,
            AuthenticationMethod::DSSSignatures | AuthenticationMethod::RSASignatures => {
                AuthClass::DigitalSignature
            }
            AuthenticationMethod::EncryptionWithRSA | AuthenticationMethod::XAUTHInitRSA => {
                AuthClass::PublicKeyEncryption
            }
            AuthenticationMethod::RevisedEncryptionWithRSA
            | AuthenticationMethod::XAUTHRespRSA => AuthClass::RevisedPublicKeyEncryption,
            AuthenticationMethod::HybridInitRSA | AuthenticationMethod::HybridRespRSA => {
                AuthClass::DigitalSignature
            }
        }
    }
}

/// Broad authentication class, used to select a microcode entry for states that
/// branch on how the peer authenticates
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash)]
pub enum AuthClass {
    /// Matches every state entry regardless of negotiated method
    All,
    /// Pre-shared key
    Psk,
    /// Digital signatures (RSA or DSS)
    DigitalSignature,
    /// Public key encryption (original, not recognized beyond payload shape)
    PublicKeyEncryption,
    /// Revised public key encryption (not recognized beyond payload shape)
    RevisedPublicKeyEncryption,
}

/// Diffie-Hellman group descriptions, RFC 2409 Appendix A and RFC 3526
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash, EnumIter)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum GroupDescription {
    Modp768 = 1,
    Modp1024 = 2,
    EC2N155 = 3,
    EC2N185 = 4,
    Modp1536 = 5,
    Modp2048 = 14,
    Modp3072 = 15,
    Modp4096 = 16,
    Modp6144 = 17,
    Modp8192 = 18,
}

/// Error returned when a [GroupDescription] value does not map onto a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupDescriptionOther(pub u16);

impl TryFrom<u16> for GroupDescription {
    type Error = GroupDescriptionOther;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(GroupDescription::Modp768),
            2 => Ok(GroupDescription::Modp1024),
            3 => Ok(GroupDescription::EC2N155),
            4 => Ok(GroupDescription::EC2N185),
            5 => Ok(GroupDescription::Modp1536),
            14 => Ok(GroupDescription::Modp2048),
            15 => Ok(GroupDescription::Modp3072),
            16 => Ok(GroupDescription::Modp4096),
            17 => Ok(GroupDescription::Modp6144),
            18 => Ok(GroupDescription::Modp8192),
            other => Err(GroupDescriptionOther(other)),
        }
    }
}

/// Group type attribute, RFC 2409 Appendix A
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash, EnumIter)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum GroupType {
    Modp = 1,
    Ecp = 2,
    Ec2n = 3,
}

/// Error returned when a [GroupType] value does not map onto a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupTypeOther(pub u16);

impl TryFrom<u16> for GroupType {
    type Error = GroupTypeOther;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(GroupType::Modp),
            2 => Ok(GroupType::Ecp),
            3 => Ok(GroupType::Ec2n),
            other => Err(GroupTypeOther(other)),
        }
    }
}

/// Life type attribute, RFC 2409 Appendix A
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash, EnumIter)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum LifeType {
    Seconds = 1,
    Kilobytes = 2,
}

/// Error returned when a [LifeType] value does not map onto a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifeTypeOther(pub u16);

impl TryFrom<u16> for LifeType {
    type Error = LifeTypeOther;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(LifeType::Seconds),
            2 => Ok(LifeType::Kilobytes),
            other => Err(LifeTypeOther(other)),
        }
    }
}

/// Notify message types, RFC 2408 section 3.14.1 plus the RFC 2407 IPsec DOI
/// status range and a handful of widely deployed vendor extensions (DPD, load
/// balancing) that this engine must still recognize.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum NotifyMessageType {
    InvalidPayloadType = 1,
    DoiNotSupported = 2,
    SituationNotSupported = 3,
    InvalidCookie = 4,
    InvalidMajorVersion = 5,
    InvalidMinorVersion = 6,
    InvalidExchangeType = 7,
    InvalidFlags = 8,
    InvalidMessageId = 9,
    InvalidProtocolId = 10,
    InvalidSpi = 11,
    InvalidTransformId = 12,
    AttributesNotSupported = 13,
    NoProposalChosen = 14,
    BadProposalSyntax = 15,
    PayloadMalformed = 16,
    InvalidKeyInformation = 17,
    InvalidIdInformation = 18,
    InvalidCertEncoding = 19,
    InvalidCertificate = 20,
    CertTypeUnsupported = 21,
    InvalidCertAuthority = 22,
    InvalidHashInformation = 23,
    AuthenticationFailed = 24,
    InvalidSignature = 25,
    AddressNotification = 26,
    NotifySaLifetime = 27,
    CertificateUnavailable = 28,
    UnsupportedExchangeType = 29,
    UnequalPayloadLengths = 30,
    Connected = 16384,
    ResponderLifetime = 24576,
    ReplayStatus = 24577,
    InitialContact = 24578,
    RUThere = 36136,
    RUThereAck = 36137,
    CiscoLoadBalance = 40501,
}

/// Error returned when a [NotifyMessageType] value does not map onto a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyMessageTypeOther(pub u16);

impl TryFrom<u16> for NotifyMessageType {
    type Error = NotifyMessageTypeOther;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NotifyMessageType::InvalidPayloadType),
            2 => Ok(NotifyMessageType::DoiNotSupported),
            3 => Ok(NotifyMessageType::SituationNotSupported),
            4 => Ok(NotifyMessageType::InvalidCookie),
            5 => Ok(NotifyMessageType::InvalidMajorVersion),
            6 => Ok(NotifyMessageType::InvalidMinorVersion),
            7 => Ok(NotifyMessageType::InvalidExchangeType),
            8 => Ok(NotifyMessageType::InvalidFlags),
            9 => Ok(NotifyMessageType::InvalidMessageId),
            10 => Ok(NotifyMessageType::InvalidProtocolId),
            11 => Ok(NotifyMessageType::InvalidSpi),
            12 => Ok(NotifyMessageType::InvalidTransformId),
            13 => Ok(NotifyMessageType::AttributesNotSupported),
            14 => Ok(NotifyMessageType::NoProposalChosen),
            15 => Ok(NotifyMessageType::BadProposalSyntax),
            16 => Ok(NotifyMessageType::PayloadMalformed),
            17 => Ok(NotifyMessageType::InvalidKeyInformation),
            18 => Ok(NotifyMessageType::InvalidIdInformation),
            19 => Ok(NotifyMessageType::InvalidCertEncoding),
            20 => Ok(NotifyMessageType::InvalidCertificate),
            21 => Ok(NotifyMessageType::CertTypeUnsupported),
            22 => Ok(NotifyMessageType::InvalidCertAuthority),
            23 => Ok(NotifyMessageType::InvalidHashInformation),
            24 => Ok(NotifyMessageType::AuthenticationFailed),
            25 => Ok(NotifyMessageType::InvalidSignature),
            26 => Ok(NotifyMessageType::AddressNotification),
            27 => Ok(NotifyMessageType::NotifySaLifetime),
            28 => Ok(NotifyMessageType::CertificateUnavailable),
            29 => Ok(NotifyMessageType::UnsupportedExchangeType),
            30 => Ok(NotifyMessageType::UnequalPayloadLengths),
            16384 => Ok(NotifyMessageType::Connected),
            24576 => Ok(NotifyMessageType::ResponderLifetime),
            24577 => Ok(NotifyMessageType::ReplayStatus),
            24578 => Ok(NotifyMessageType::InitialContact),
            36136 => Ok(NotifyMessageType::RUThere),
            36137 => Ok(NotifyMessageType::RUThereAck),
            40501 => Ok(NotifyMessageType::CiscoLoadBalance),
            other => Err(NotifyMessageTypeOther(other)),
        }
    }
}

/// Certificate encoding, RFC 2408 section 3.9
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Copy, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum CertificateEncoding {
    Pkcs7WrappedX509 = 1,
    Pgp = 2,
    DnsSignedKey = 3,
    X509Signature = 4,
    Kerberos = 6,
    Crl = 7,
    Arl = 8,
    Spki = 9,
    X509Attribute = 10,
    RawRsaKey = 11,
    HashUrlX509 = 12,
    HashUrlX509Bundle = 13,
}

/// Error returned when a [CertificateEncoding] value does not map onto a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertificateEncodingOther(pub u8);

impl TryFrom<u8> for CertificateEncoding {
    type Error = CertificateEncodingOther;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CertificateEncoding::Pkcs7WrappedX509),
            2 => Ok(CertificateEncoding::Pgp),
            3 => Ok(CertificateEncoding::DnsSignedKey),
            4 => Ok(CertificateEncoding::X509Signature),
            6 => Ok(CertificateEncoding::Kerberos),
            7 => Ok(CertificateEncoding::Crl),
            8 => Ok(CertificateEncoding::Arl),
            9 => Ok(CertificateEncoding::Spki),
            10 => Ok(CertificateEncoding::X509Attribute),
            11 => Ok(CertificateEncoding::RawRsaKey),
            12 => Ok(CertificateEncoding::HashUrlX509),
            13 => Ok(CertificateEncoding::HashUrlX509Bundle),
            other => Err(CertificateEncodingOther(other)),
        }
    }
}

/// Identification type carried in an Identification payload, RFC 2407 section 4.6.2
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Copy, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum IdentificationType {
    Ipv4Addr = 1,
    Fqdn = 2,
    UserFqdn = 3,
    Ipv4Subnet = 4,
    Ipv6Addr = 5,
    Ipv6Subnet = 6,
    Ipv4AddrRange = 7,
    Ipv6AddrRange = 8,
    DerAsn1Dn = 9,
    DerAsn1Gn = 10,
    KeyId = 11,
}

/// Error returned when an [IdentificationType] value does not map onto a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentificationTypeOther(pub u8);

impl TryFrom<u8> for IdentificationType {
    type Error = IdentificationTypeOther;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(IdentificationType::Ipv4Addr),
            2 => Ok(IdentificationType::Fqdn),
            3 => Ok(IdentificationType::UserFqdn),
            4 => Ok(IdentificationType::Ipv4Subnet),
            5 => Ok(IdentificationType::Ipv6Addr),
            6 => Ok(IdentificationType::Ipv6Subnet),
            7 => Ok(IdentificationType::Ipv4AddrRange),
            8 => Ok(IdentificationType::Ipv6AddrRange),
            9 => Ok(IdentificationType::DerAsn1Dn),
            10 => Ok(IdentificationType::DerAsn1Gn),
            11 => Ok(IdentificationType::KeyId),
            other => Err(IdentificationTypeOther(other)),
        }
    }
}

/// Mode-Config / XAUTH attribute payload transaction type, draft-ietf-ipsec-isakmp-mode-cfg
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Copy, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum ModeConfigType {
    Request = 1,
    Reply = 2,
    Set = 3,
    Ack = 4,
}

/// Error returned when a [ModeConfigType] value does not map onto a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeConfigTypeOther(pub u8);

impl TryFrom<u8> for ModeConfigType {
    type Error = ModeConfigTypeOther;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ModeConfigType::Request),
            2 => Ok(ModeConfigType::Reply),
            3 => Ok(ModeConfigType::Set),
            4 => Ok(ModeConfigType::Ack),
            other => Err(ModeConfigTypeOther(other)),
        }
    }
}

/// Static portion of a Security Association payload, RFC 2408 section 3.4
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticSecurityAssociationPayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
    /// Domain of interpretation, always [DomainOfInterpretation::Ipsec] for this engine
    pub doi: U32,
}

/// Variable-length tail of a Security Association payload
#[derive(Debug, Clone)]
pub struct VariableSecurityAssociationPayload {
    /// DOI-specific situation field, 4 octets for the IPsec DOI
    pub situation: Vec<u8>,
}

/// Static portion of a Proposal payload, RFC 2408 section 3.5
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticProposalPayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
    /// Proposal number, shared by alternative proposals negotiated together
    pub proposal_no: u8,
    /// Protocol being proposed (ISAKMP, IPSEC-ESP, IPSEC-AH, ...)
    pub protocol_id: u8,
    /// Length in octets of the SPI that follows
    pub spi_size: u8,
    /// Number of Transform payloads following this proposal
    pub no_of_transforms: u8,
}

/// Variable-length tail of a Proposal payload
#[derive(Debug, Clone)]
pub struct VariableProposalPayload {
    /// Sender's SPI for this proposal
    pub spi: Vec<u8>,
}

/// Static portion of a Transform payload, RFC 2408 section 3.6
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticTransformPayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
    /// Transform number, unique within a proposal
    pub transform_no: u8,
    /// Transform identifier, DOI and protocol dependent
    pub transform_id: u8,
    /// Must be zero
    pub reserved: U16,
}

/// Variable-length tail of a Transform payload
#[derive(Debug, Clone)]
pub struct VariableTransformPayload {
    /// Concatenated, TLV-encoded SA attributes
    pub sa_attributes: Vec<u8>,
}

/// Static portion of a Vendor ID payload, RFC 2408 section 3.16 (the entire
/// body is variable-length, so this is just the generic header)
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticVendorIDPayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
}

/// Static portion of a Notification payload, RFC 2408 section 3.14
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticNotificationPayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
    /// Domain of interpretation
    pub doi: U32,
    /// Protocol this notification concerns
    pub protocol_id: u8,
    /// Length in octets of the SPI that follows
    pub spi_size: u8,
    /// Notify message type, see [NotifyMessageType]
    pub notify_message_type: U16,
}

/// Static portion of a Delete payload, RFC 2408 section 3.15
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticDeletePayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
    /// Domain of interpretation
    pub doi: U32,
    /// Protocol the deleted SA(s) belong to
    pub protocol_id: u8,
    /// Length in octets of each SPI that follows
    pub spi_size: u8,
    /// Number of SPIs following
    pub no_of_spis: U16,
}

/// Static portion of a Key Exchange payload, RFC 2408 section 3.7 (fully variable)
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticKeyExchangePayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
}

/// Static portion of an Identification payload, RFC 2407 section 4.6.2.
///
/// The protocol/port fields are only meaningful for Phase 2 (IPsec) identities;
/// Phase 1 senders are expected to set both to zero.
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticIdentificationPayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
    /// Type of identification data, see [IdentificationType]
    pub id_type: u8,
    /// Protocol ID, `0` unless this is a Phase 2 identity
    pub protocol_id: u8,
    /// Port, `0` unless this is a Phase 2 identity
    pub port: U16,
}

/// Static portion of a Hash payload, RFC 2408 section 3.11 (fully variable)
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticHashPayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
}

/// Static portion of a Signature payload, RFC 2408 section 3.12 (fully variable)
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticSignaturePayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
}

/// Static portion of a Nonce payload, RFC 2408 section 3.13 (fully variable)
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticNoncePayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
}

/// Static portion of a Certificate payload, RFC 2408 section 3.9
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticCertificatePayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
    /// Encoding of the certificate data that follows, see [CertificateEncoding]
    pub certificate_encoding: u8,
}

/// Static portion of a Certificate Request payload, RFC 2408 section 3.10
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticCertificateRequestPayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
    /// Encoding of the acceptable certificate authority data that follows
    pub certificate_type: u8,
}

/// Static portion of a NAT-D payload, RFC 3947 / draft-ietf-ipsec-nat-t-ike (fully variable)
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticNatDiscoveryPayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
}

/// Static portion of a NAT original address payload, RFC 3947
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticNatOriginalAddressPayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
    /// Type of address that follows, `1` = IPv4, `2` = IPv6
    pub id_type: u8,
    /// Must be zero
    pub reserved: [u8; 3],
}

/// Static portion of a Mode-Config / XAUTH Attribute payload
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticAttributePayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
    /// Transaction type, see [ModeConfigType]
    pub attribute_payload_type: u8,
    /// Must be zero
    pub reserved: u8,
    /// Transaction identifier, echoed back by the peer
    pub identifier: U16,
}

/// Static portion of a non-standard IKE fragmentation payload
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticFragmentationPayload {
    /// Generic payload header
    pub generic_payload_header: GenericPayloadHeader,
    /// Identifier shared by all fragments of one reassembled message
    pub fragment_id: U16,
    /// 1-based fragment index
    pub fragment_number: u8,
    /// Bit 0 set on the final fragment
    pub flags: u8,
}

/// Bit 0 of [StaticFragmentationPayload::flags]: this is the last fragment
pub const FRAGMENT_FLAG_LAST: u8 = 0b0000_0001;

/// Short, 4-octet data attribute: type with the high bit set, followed by a
/// 2-octet value (the "TV" form of RFC 2408 section 3.3)
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct DataAttributeShort {
    /// Attribute type, high bit set to mark this as the short form
    pub attribute_type: U16,
    /// Attribute value
    pub attribute_value: U16,
}

/// Static portion of a long-form, variable-length data attribute (the "TLV" form)
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
#[repr(C)]
pub struct StaticDataAttributeLong {
    /// Attribute type, high bit clear to mark this as the long form
    pub attribute_type: U16,
    /// Length in octets of the value that follows
    pub attribute_length: U16,
}
