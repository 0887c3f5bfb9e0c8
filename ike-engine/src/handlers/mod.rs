//! Per-transition handlers: the "WHAT" invoked by the dispatcher, see §4.6.
//!
//! Handlers are plain functions, not coroutines: when a transition needs a
//! cryptographic result it submits a request to [crate::crypto::CryptoProvider]
//! and returns [crate::result::HandlerResult::Suspend] immediately. The
//! dispatcher parks the message digest on the SA; a later helper-completion
//! event re-enters the same handler, which finds its result already recorded
//! on the SA and proceeds. This keeps handlers ordinary synchronous functions
//! while still modeling suspension, matching the single-threaded event loop
//! of §5.

pub mod aggressive_mode;
pub mod informational;
pub mod main_mode;
pub mod mode_config;
pub mod quick_mode;
pub mod unexpected;
pub mod xauth;

use crate::config::EngineConfig;
use crate::crypto::CryptoProvider;
use crate::digest::MessageDigest;
use crate::kernel::KernelInstaller;
use crate::policy::PolicyProvider;
use crate::result::HandlerResult;
use crate::sa::IkeSa;

/// Everything a handler needs to inspect the inbound message and its SA, and
/// to reach the external collaborators, without touching dispatcher-owned
/// state (state, timers, last-sent bytes) directly.
pub struct HandlerContext<'a> {
    /// The SA this message belongs to
    pub sa: &'a mut IkeSa,
    /// The decoded message being processed
    pub digest: &'a MessageDigest,
    /// Cryptographic primitives collaborator
    pub crypto: &'a dyn CryptoProvider,
    /// Kernel IPsec SA installer collaborator
    pub kernel: &'a dyn KernelInstaller,
    /// Connection policy collaborator
    pub policy: &'a dyn PolicyProvider,
    /// Engine configuration
    pub config: &'a EngineConfig,
    /// Reply payloads accumulated by the handler, serialized by the
    /// dispatcher only if the transition's `REPLY` flag is set and the
    /// result is `Ok`.
    pub reply: &'a mut Vec<isakmp::v1::generator::payloads::RawPayload>,
}

/// Signature every microcode entry's handler implements.
pub type HandlerFn = fn(&mut HandlerContext) -> HandlerResult;
