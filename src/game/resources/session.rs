//! Session state store
//!
//! The single in-memory source of truth for the current game: the last
//! authority-confirmed board, the selected mode, the grabbed piece with its
//! legal targets, and the move history.
//!
//! Only the submission flow writes here (all mutators are crate-private).
//! Presentation reads through [`SessionStore::subscribe`], which hands out a
//! watch receiver of [`SessionFrame`]s that stays readable while the flow is
//! suspended on a round trip.

use crate::game::components::{BoardSnapshot, GameMode, MoveLogEntry, SessionState};
use crate::game::resources::history::MoveHistory;
use crate::game::resources::selection::Selection;
use crate::game::square::Coordinate;
use tokio::sync::watch;
use tracing::debug;

/// Read-only copy of the store published after every change
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionFrame {
    pub state: SessionState,
    pub history: Vec<MoveLogEntry>,
    pub available_moves: Vec<Coordinate>,
}

#[derive(Debug)]
pub struct SessionStore {
    state: SessionState,
    history: MoveHistory,
    selection: Selection,
    frames: watch::Sender<SessionFrame>,
}

impl SessionStore {
    pub fn new(mode: GameMode) -> Self {
        let state = SessionState::new(mode);
        let (frames, _) = watch::channel(SessionFrame {
            state: state.clone(),
            ..SessionFrame::default()
        });
        Self {
            state,
            history: MoveHistory::default(),
            selection: Selection::default(),
            frames,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn board(&self) -> &BoardSnapshot {
        &self.state.board
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn available_moves(&self) -> &[Coordinate] {
        self.selection.possible_moves()
    }

    /// Current frame as presentation would see it
    pub fn frame(&self) -> SessionFrame {
        self.frames.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionFrame> {
        self.frames.subscribe()
    }

    /// Replace the board wholesale with an authority-confirmed snapshot
    pub(crate) fn apply_snapshot(&mut self, board: BoardSnapshot) {
        debug!(
            "[SESSION] Applying snapshot: {} pieces, {} to move, {:?}",
            board.len(),
            board.turn(),
            board.outcome()
        );
        self.state.board = board;
        self.publish();
    }

    pub(crate) fn record_move(&mut self, entry: MoveLogEntry) {
        self.history.add_move(entry);
        self.publish();
    }

    pub(crate) fn pop_last_move(&mut self) -> Option<MoveLogEntry> {
        let popped = self.history.pop_last();
        if popped.is_some() {
            self.publish();
        }
        popped
    }

    pub(crate) fn set_mode(&mut self, mode: GameMode) {
        self.state.mode = mode;
        self.publish();
    }

    /// Back to the initial setup with an empty history; mode is kept
    pub(crate) fn reset(&mut self) {
        self.state.board = BoardSnapshot::initial();
        self.history.clear();
        self.selection.clear();
        self.publish();
    }

    pub(crate) fn hold_piece(&mut self, piece_id: &str) {
        self.selection.hold(piece_id);
        self.publish();
    }

    /// Nothing in hand and nothing highlighted
    pub(crate) fn release_piece(&mut self) {
        self.selection.clear();
        self.publish();
    }

    pub(crate) fn take_held_piece(&mut self) -> Option<String> {
        self.selection.take_held()
    }

    pub(crate) fn set_available_moves(&mut self, moves: Vec<Coordinate>) {
        self.selection.set_possible_moves(moves);
        self.publish();
    }

    pub(crate) fn clear_available_moves(&mut self) {
        self.selection.clear_moves();
        self.publish();
    }

    fn publish(&self) {
        let frame = SessionFrame {
            state: self.state.clone(),
            history: self.history.moves().to_vec(),
            available_moves: self.selection.possible_moves().to_vec(),
        };
        self.frames.send_replace(frame);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(GameMode::default())
    }
}
