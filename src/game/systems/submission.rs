//! Move submission state machine
//!
//! Turns the two raw gestures (grab a piece, drop it on a square) into
//! authority-confirmed state transitions:
//!
//! ```text
//! grab ──► AwaitingLegalMoves ──► Idle (AvailableMoves populated)
//!
//! drop ──► MoveInFlight ──► ApplyingResult ──► Idle
//!               │  ▲
//!               ▼  │ resolve(kind), same move resubmitted
//!     AwaitingPromotionChoice
//! ```
//!
//! The machine never predicts. The board in the [`SessionStore`] only ever
//! changes to a snapshot the authority returned, and the history only grows
//! when such a snapshot arrives for a submitted move. Any failure returns
//! the machine to `Idle` with the board untouched.
//!
//! Every method takes `&mut self`, so at most one authority call is in
//! flight per move attempt. Presentation reads the store, the phase and the
//! pending promotion through watch channels while a call is suspended.

use crate::game::components::{BoardSnapshot, GameMode, MoveLogEntry, Player};
use crate::game::error::{GameError, GameResult};
use crate::game::resources::{
    PromotionCoordinator, PromotionRequest, SessionFrame, SessionStore, SubmissionPhase,
};
use crate::game::square::Coordinate;
use crate::networking::{Authority, AuthorityError, MoveDescriptor, MoveReply};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// What a drop gesture amounted to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The authority confirmed the move; this entry was appended to history
    Applied(MoveLogEntry),
    /// The move did not happen (transport failure, rejection or bad reply)
    Rejected,
    /// Nothing was submitted (no piece in hand)
    Ignored,
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied(_))
    }
}

/// Orchestrates gestures, authority round trips and store reconciliation
pub struct MoveSubmission<A: Authority> {
    authority: A,
    store: SessionStore,
    promotions: PromotionCoordinator,
    phase: watch::Sender<SubmissionPhase>,
    record_ai_moves: bool,
}

impl<A: Authority> MoveSubmission<A> {
    pub fn new(authority: A, mode: GameMode) -> Self {
        let (phase, _) = watch::channel(SubmissionPhase::Idle);
        Self {
            authority,
            store: SessionStore::new(mode),
            promotions: PromotionCoordinator::new(),
            phase,
            record_ai_moves: false,
        }
    }

    /// Also log an inferred entry for every AI reply
    pub fn with_record_ai_moves(mut self, record: bool) -> Self {
        self.record_ai_moves = record;
        self
    }

    pub fn authority(&self) -> &A {
        &self.authority
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionFrame> {
        self.store.subscribe()
    }

    pub fn phase(&self) -> SubmissionPhase {
        *self.phase.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<SubmissionPhase> {
        self.phase.subscribe()
    }

    /// Resolver handle for the promotion prompt
    pub fn promotions(&self) -> PromotionCoordinator {
        self.promotions.clone()
    }

    /// Grab gesture
    ///
    /// Only a piece owned by the side to move is taken in hand; its legal
    /// targets are then fetched into AvailableMoves. Returns whether the
    /// piece was taken.
    pub async fn grab(&mut self, piece_id: &str) -> bool {
        self.recover_abandoned();

        if self.promotions.is_awaiting() {
            debug!("[SUBMISSION] Ignoring grab of {piece_id}, promotion choice pending");
            return false;
        }

        let board = self.store.board();
        let Some(piece) = board.piece(piece_id) else {
            debug!("[SUBMISSION] Ignoring grab of unknown piece {piece_id}");
            self.store.release_piece();
            return false;
        };
        if piece.owner != board.turn() {
            debug!(
                "[SUBMISSION] Ignoring grab of {piece_id}, it is {}'s turn",
                board.turn()
            );
            self.store.release_piece();
            return false;
        }
        let square = piece.coordinate.to_name();

        self.store.hold_piece(piece_id);
        self.set_phase(SubmissionPhase::AwaitingLegalMoves);
        let targets = self.authority.legal_targets(square).await;
        debug!(
            "[SUBMISSION] {} legal targets for {piece_id} on {square}",
            targets.len()
        );
        self.store.set_available_moves(targets);
        self.set_phase(SubmissionPhase::Idle);
        true
    }

    /// Drop gesture
    ///
    /// Submits the held piece's move to `target` without any local
    /// filtering. AvailableMoves is cleared before anything else happens.
    pub async fn drop_piece(&mut self, target: Coordinate) -> MoveOutcome {
        self.recover_abandoned();
        self.store.clear_available_moves();

        let Some(piece_id) = self.store.take_held_piece() else {
            debug!("[SUBMISSION] Drop on {} with nothing in hand", target.to_name());
            return MoveOutcome::Ignored;
        };
        let board = self.store.board();
        let Some(piece) = board.piece(&piece_id).cloned() else {
            warn!("[SUBMISSION] Held piece {piece_id} is no longer on the board");
            return MoveOutcome::Ignored;
        };
        let captured = board.piece_at(target).map(|occupant| occupant.kind);

        let descriptor = MoveDescriptor::new(piece.coordinate, target);
        info!("[SUBMISSION] Submitting {} {}", piece.owner, descriptor);
        self.set_phase(SubmissionPhase::MoveInFlight);

        let board = match self.submit_with_promotion(descriptor, piece.owner).await {
            Ok(board) => board,
            Err(e) => {
                warn!("[SUBMISSION] Move {} did not happen: {}", descriptor, e);
                self.set_phase(SubmissionPhase::Idle);
                return MoveOutcome::Rejected;
            }
        };

        self.set_phase(SubmissionPhase::ApplyingResult);
        let entry = MoveLogEntry {
            mover: piece.owner,
            piece_kind: piece.kind,
            source: piece.coordinate,
            target,
            captured,
        };
        self.store.apply_snapshot(board);
        self.store.record_move(entry.clone());
        info!("[SUBMISSION] Confirmed: {}", entry);

        if self.store.mode() == GameMode::PlayerVsAi {
            self.play_ai_turn().await;
        }

        self.set_phase(SubmissionPhase::Idle);
        MoveOutcome::Applied(entry)
    }

    /// Take back the last move
    ///
    /// The history entry goes first; the board follows only if the authority
    /// confirms the undo.
    pub async fn undo(&mut self) -> GameResult<()> {
        self.recover_abandoned();
        if let Some(entry) = self.store.pop_last_move() {
            info!("[SUBMISSION] Undoing {}", entry);
        }

        self.set_phase(SubmissionPhase::MoveInFlight);
        let result = self.authority.undo_last_move().await;
        let outcome = match result {
            Ok(board) => {
                self.set_phase(SubmissionPhase::ApplyingResult);
                self.store.apply_snapshot(board);
                Ok(())
            }
            Err(e) => {
                warn!("[SUBMISSION] Undo failed: {}", e);
                Err(e.into())
            }
        };
        self.set_phase(SubmissionPhase::Idle);
        outcome
    }

    /// Back to the initial position locally, then tell the authority
    ///
    /// The local reset never waits for or depends on the authority.
    pub async fn reset(&mut self) -> GameResult<()> {
        self.recover_abandoned();
        self.store.reset();
        info!("[SUBMISSION] Board reset");

        self.authority.reset_game().await.map_err(|e| {
            warn!("[SUBMISSION] Authority reset failed: {}", e);
            GameError::from(e)
        })
    }

    /// Switch between player-vs-player and player-vs-AI
    ///
    /// Switching starts a new game. Authority failures are logged and
    /// reported but the local mode and reset stand.
    pub async fn set_mode(&mut self, mode: GameMode) -> GameResult<()> {
        self.recover_abandoned();
        self.store.set_mode(mode);
        info!("[SUBMISSION] Mode set to {}", mode);

        let forwarded = self.authority.set_mode(mode).await.map_err(|e| {
            warn!("[SUBMISSION] Authority mode switch failed: {}", e);
            GameError::from(e)
        });
        let reset = self.reset().await;
        forwarded.and(reset)
    }

    async fn submit_with_promotion(
        &mut self,
        descriptor: MoveDescriptor,
        mover: Player,
    ) -> GameResult<BoardSnapshot> {
        if let MoveReply::Applied(board) = self.authority.submit_move(&descriptor).await? {
            return Ok(board);
        }

        let receiver = self.promotions.request(PromotionRequest {
            source: descriptor.source,
            target: descriptor.target,
            mover,
        })?;
        self.set_phase(SubmissionPhase::AwaitingPromotionChoice);
        let kind = receiver.await.map_err(|_| GameError::PromotionAbandoned)?;

        let descriptor = descriptor.with_promotion(kind);
        debug!("[SUBMISSION] Resubmitting {}", descriptor);
        self.set_phase(SubmissionPhase::MoveInFlight);
        match self.authority.submit_move(&descriptor).await? {
            MoveReply::Applied(board) => Ok(board),
            MoveReply::PromotionRequired => Err(AuthorityError::protocol(format!(
                "promotion requested again for {descriptor}"
            ))
            .into()),
        }
    }

    async fn play_ai_turn(&mut self) {
        self.set_phase(SubmissionPhase::MoveInFlight);
        match self.authority.request_ai_move().await {
            Ok(board) => {
                self.set_phase(SubmissionPhase::ApplyingResult);
                let inferred = self
                    .record_ai_moves
                    .then(|| MoveLogEntry::infer(self.store.board(), &board))
                    .flatten();
                self.store.apply_snapshot(board);
                match inferred {
                    Some(entry) => {
                        info!("[SUBMISSION] AI played {}", entry);
                        self.store.record_move(entry);
                    }
                    None => info!("[SUBMISSION] AI move applied"),
                }
            }
            Err(e) => warn!("[SUBMISSION] AI move failed, keeping confirmed position: {}", e),
        }
    }

    /// A drop future dropped mid-promotion leaves a dead slot and a stale phase
    fn recover_abandoned(&mut self) {
        self.promotions.clear_abandoned();
        if !self.promotions.is_awaiting() && *self.phase.borrow() != SubmissionPhase::Idle {
            debug!("[SUBMISSION] Recovering from abandoned {}", self.phase());
            self.set_phase(SubmissionPhase::Idle);
        }
    }

    fn set_phase(&self, phase: SubmissionPhase) {
        self.phase.send_if_modified(|current| {
            if *current == phase {
                return false;
            }
            debug!("[SUBMISSION] {} -> {}", current, phase);
            *current = phase;
            true
        });
    }
}
