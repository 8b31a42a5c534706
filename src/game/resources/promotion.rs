//! Pawn promotion coordination
//!
//! When the authority answers a move with "promotion needed", the submission
//! flow parks itself on a [`PromotionCoordinator`] until the player picks a
//! piece kind. The coordinator holds a single reply slot: the flow awaits the
//! receiving half, and presentation calls [`PromotionCoordinator::resolve`]
//! from its prompt.
//!
//! Resolution is single-shot. Calling `resolve` while nothing is pending, or a
//! second time for the same request, is ignored, so a stray late click can
//! never leak into the next move.

use crate::game::components::{Player, PromotionKind};
use crate::game::error::{GameError, GameResult};
use crate::game::square::SquareName;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info};

/// The move waiting on a promotion choice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PromotionRequest {
    pub source: SquareName,
    pub target: SquareName,
    pub mover: Player,
}

#[derive(Debug)]
struct PendingSlot {
    request: PromotionRequest,
    reply: oneshot::Sender<PromotionKind>,
}

#[derive(Debug)]
struct Inner {
    slot: Mutex<Option<PendingSlot>>,
    pending: watch::Sender<Option<PromotionRequest>>,
}

/// Handle shared by the submission flow and the promotion prompt
///
/// Cloning is cheap; all clones see the same slot.
#[derive(Clone, Debug)]
pub struct PromotionCoordinator {
    inner: Arc<Inner>,
}

impl PromotionCoordinator {
    pub fn new() -> Self {
        let (pending, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                slot: Mutex::new(None),
                pending,
            }),
        }
    }

    /// Move from idle to awaiting-choice
    ///
    /// Returns the receiver the flow awaits. Fails if a live request is
    /// already outstanding; a request whose waiter has gone away is treated
    /// as abandoned and replaced.
    pub fn request(&self, request: PromotionRequest) -> GameResult<oneshot::Receiver<PromotionKind>> {
        let mut slot = self.inner.slot.lock();
        if let Some(existing) = slot.as_ref() {
            if !existing.reply.is_closed() {
                return Err(GameError::PromotionAlreadyPending {
                    source_square: existing.request.source.to_string(),
                    target_square: existing.request.target.to_string(),
                });
            }
            debug!(
                "[PROMOTION] Dropping abandoned request for {}{}",
                existing.request.source, existing.request.target
            );
        }

        let (reply, receiver) = oneshot::channel();
        *slot = Some(PendingSlot { request, reply });
        self.inner.pending.send_replace(Some(request));
        info!(
            "[PROMOTION] {} pawn {}{} needs a promotion choice",
            request.mover, request.source, request.target
        );
        Ok(receiver)
    }

    /// Hand the chosen kind to the waiting flow
    ///
    /// Returns `true` if a pending request consumed the choice. Resolving
    /// while idle is a no-op that returns `false`.
    pub fn resolve(&self, kind: PromotionKind) -> bool {
        let Some(pending) = self.inner.slot.lock().take() else {
            debug!("[PROMOTION] Ignoring {kind} choice, nothing pending");
            return false;
        };
        self.inner.pending.send_replace(None);

        let PendingSlot { request, reply } = pending;
        match reply.send(kind) {
            Ok(()) => {
                info!(
                    "[PROMOTION] {}{} promotes to {kind}",
                    request.source, request.target
                );
                true
            }
            Err(_) => {
                debug!(
                    "[PROMOTION] Flow for {}{} went away before the choice arrived",
                    request.source, request.target
                );
                false
            }
        }
    }

    /// The outstanding request, if any
    pub fn pending(&self) -> Option<PromotionRequest> {
        *self.inner.pending.borrow()
    }

    pub fn is_awaiting(&self) -> bool {
        self.inner
            .slot
            .lock()
            .as_ref()
            .is_some_and(|slot| !slot.reply.is_closed())
    }

    /// Watch for requests appearing and clearing (drives the prompt)
    pub fn subscribe(&self) -> watch::Receiver<Option<PromotionRequest>> {
        self.inner.pending.subscribe()
    }

    /// Forget an abandoned request so the prompt closes
    pub(crate) fn clear_abandoned(&self) {
        let mut slot = self.inner.slot.lock();
        if slot.as_ref().is_some_and(|s| s.reply.is_closed()) {
            *slot = None;
            self.inner.pending.send_replace(None);
        }
    }
}

impl Default for PromotionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
