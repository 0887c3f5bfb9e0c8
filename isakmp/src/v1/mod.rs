//! Implementation of parsers, definitions and message generation for IKEv1

pub mod definitions;
pub mod generator;
pub mod parser;

pub use definitions::*;

/// Constant value for IKEv1 in ISAKMP packets, as `<major>.<minor>` in 4 bits each,
/// where the `<major>` is 1 and the `<minor>` is zero.
pub const IKE_1_VERSION_VALUE: u8 = 0b0001_0000;

/// Size, in octets, of an ISAKMP cookie (SPI half).
pub const COOKIE_SIZE: usize = 8;
