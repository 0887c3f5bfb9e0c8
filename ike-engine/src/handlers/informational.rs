//! Informational / Notification exchange handlers, see §4.10 and §8 scenario 6.

use std::net::IpAddr;
use std::net::Ipv4Addr;

use isakmp::v1::generator::payloads;
use isakmp::v1::DomainOfInterpretation;
use isakmp::v1::NotifyMessageType;
use tracing::info;
use tracing::warn;

use crate::handlers::HandlerContext;
use crate::result::HandlerResult;

/// `INFO`: plaintext Informational exchange. Only reachable before Phase-1
/// keying material exists, so only connectivity-agnostic notifications make
/// sense here; everything meaningful happens at `INFO_PROTECTED`.
pub fn info(ctx: &mut HandlerContext) -> HandlerResult {
    for n in &ctx.digest.payloads.notifications {
        info!(notify = ?n.notify_message_type, "plaintext informational notification");
    }
    HandlerResult::Ok
}

/// `INFO_PROTECTED`: encrypted Informational exchange on an established SA.
/// HASH(1) protection is verified by the integrity gate before dispatch.
pub fn info_protected(ctx: &mut HandlerContext) -> HandlerResult {
    for n in ctx.digest.payloads.notifications.clone() {
        match n.notify_message_type {
            NotifyMessageType::RUThere => return dpd_request(ctx, &n.notification),
            NotifyMessageType::RUThereAck => {
                info!("DPD ack received");
                return HandlerResult::Ok;
            }
            NotifyMessageType::PayloadMalformed => {
                ctx.sa.hidden.malformed_received += 1;
                let threshold = ctx.config.max_malformed_notify;
                if ctx.sa.hidden.malformed_received + ctx.sa.hidden.malformed_sent > threshold
                    && ctx.sa.hidden.malformed_received * 2 > threshold
                {
                    warn!("malformed-payload threshold exceeded, deleting SA");
                    return HandlerResult::Fatal;
                }
            }
            NotifyMessageType::CiscoLoadBalance => return cisco_load_balance(ctx, &n.notification),
            NotifyMessageType::ResponderLifetime | NotifyMessageType::InvalidMessageId => {
                info!(notify = ?n.notify_message_type, "handled by Quick Mode logic, ignoring here");
            }
            other => {
                info!(notify = ?other, "unknown notification, ignoring");
            }
        }
    }

    for d in ctx.digest.payloads.deletes.clone() {
        process_delete(ctx, &d);
    }

    if ctx.digest.payloads.notifications.is_empty() && ctx.digest.payloads.deletes.is_empty() {
        return HandlerResult::Ignore;
    }
    HandlerResult::Ok
}

fn dpd_request(ctx: &mut HandlerContext, seq_bytes: &[u8]) -> HandlerResult {
    ctx.reply.push(payloads::hash(&[]));
    ctx.reply.push(payloads::notification(
        DomainOfInterpretation::Ipsec,
        1,
        &[],
        NotifyMessageType::RUThereAck,
        seq_bytes,
    ));
    ctx.sa.hidden.peer_supports_dpd = true;
    HandlerResult::Ok
}

fn cisco_load_balance(ctx: &mut HandlerContext, notification: &[u8]) -> HandlerResult {
    if !ctx.sa.is_established() {
        return HandlerResult::Ignore;
    }
    if notification.len() < 4 {
        return HandlerResult::Fail(NotifyMessageType::PayloadMalformed);
    }
    let tail = &notification[notification.len() - 4..];
    let new_addr = Ipv4Addr::new(tail[0], tail[1], tail[2], tail[3]);
    if new_addr.is_unspecified() {
        return HandlerResult::Fail(NotifyMessageType::PayloadMalformed);
    }
    info!(%new_addr, "Cisco load-balance redirect, re-initiating to new peer");
    ctx.sa.peer = std::net::SocketAddr::new(IpAddr::V4(new_addr), ctx.sa.peer.port());
    HandlerResult::Fatal
}

fn process_delete(ctx: &mut HandlerContext, delete: &isakmp::v1::parser::definitions::DeletePayload) {
    info!(protocol_id = delete.protocol_id, count = delete.spis.len(), "processing Delete payload");
    if delete.protocol_id == 1 && delete.spis.iter().any(|spi| {
        let mut buf = [0u8; 8];
        let len = spi.len().min(8);
        buf[..len].copy_from_slice(&spi[..len]);
        u64::from_be_bytes(buf) == ctx.sa.initiator_spi
    }) {
        // The peer is deleting this very IKE SA; the dispatcher tears it down
        // once this handler returns Ok, per the Delete semantics of §4.10.
        info!("peer requested deletion of this IKE SA");
    }
}
