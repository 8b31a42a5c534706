//! Game Flow Integration Tests
//!
//! Drives the move-submission state machine against a scripted in-memory
//! authority:
//! - Grab and drop handling
//! - Promotion suspension and resubmission
//! - AI replies in player-vs-AI mode
//! - Failure handling, undo, reset and mode switches

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use xfchess_remote::game::components::{
    BoardSnapshot, GameMode, Outcome, Piece, PieceKind, Player, PromotionKind,
};
use xfchess_remote::game::resources::SubmissionPhase;
use xfchess_remote::game::square::{Coordinate, SquareName};
use xfchess_remote::networking::{
    Authority, AuthorityError, AuthorityResult, MoveDescriptor, MoveReply,
};
use xfchess_remote::{MoveOutcome, MoveSubmission};

/// Authority that answers from queues and records every call
#[derive(Default)]
struct ScriptedAuthority {
    legal: HashMap<String, Vec<Coordinate>>,
    moves: Mutex<VecDeque<AuthorityResult<MoveReply>>>,
    ai_moves: Mutex<VecDeque<AuthorityResult<BoardSnapshot>>>,
    undos: Mutex<VecDeque<AuthorityResult<BoardSnapshot>>>,
    fail_admin: bool,
    calls: Mutex<Vec<String>>,
}

impl ScriptedAuthority {
    fn with_legal(mut self, square: &str, targets: Vec<Coordinate>) -> Self {
        self.legal.insert(square.to_string(), targets);
        self
    }

    fn reply_move(&self, reply: AuthorityResult<MoveReply>) {
        self.moves.lock().push_back(reply);
    }

    fn reply_ai(&self, reply: AuthorityResult<BoardSnapshot>) {
        self.ai_moves.lock().push_back(reply);
    }

    fn reply_undo(&self, reply: AuthorityResult<BoardSnapshot>) {
        self.undos.lock().push_back(reply);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn admin_result(&self) -> AuthorityResult<()> {
        if self.fail_admin {
            Err(unavailable())
        } else {
            Ok(())
        }
    }
}

fn unavailable() -> AuthorityError {
    AuthorityError::Unavailable {
        message: "scripted failure".to_string(),
    }
}

#[async_trait]
impl Authority for ScriptedAuthority {
    async fn legal_targets(&self, square: SquareName) -> Vec<Coordinate> {
        self.record(format!("legal {square}"));
        self.legal.get(square.as_str()).cloned().unwrap_or_default()
    }

    async fn submit_move(&self, descriptor: &MoveDescriptor) -> AuthorityResult<MoveReply> {
        self.record(format!("move {descriptor}"));
        self.moves.lock().pop_front().unwrap_or_else(|| Err(unavailable()))
    }

    async fn undo_last_move(&self) -> AuthorityResult<BoardSnapshot> {
        self.record("undo".to_string());
        self.undos.lock().pop_front().unwrap_or_else(|| Err(unavailable()))
    }

    async fn reset_game(&self) -> AuthorityResult<()> {
        self.record("reset".to_string());
        self.admin_result()
    }

    async fn set_mode(&self, mode: GameMode) -> AuthorityResult<()> {
        self.record(format!("mode {mode}"));
        self.admin_result()
    }

    async fn request_ai_move(&self) -> AuthorityResult<BoardSnapshot> {
        self.record("ai".to_string());
        self.ai_moves.lock().pop_front().unwrap_or_else(|| Err(unavailable()))
    }
}

fn at(file: u8, rank: u8) -> Coordinate {
    Coordinate::new(file, rank).unwrap()
}

fn sq(name: &str) -> Coordinate {
    name.parse::<SquareName>().unwrap().to_coordinate()
}

/// `board` with piece `id` moved to `to` (capturing whatever stood there)
fn moved(board: &BoardSnapshot, id: &str, to: Coordinate, turn: Player) -> BoardSnapshot {
    let pieces = board
        .pieces()
        .filter(|p| p.coordinate != to)
        .map(|p| {
            if p.id == id {
                Piece::new(id, to, p.kind, p.owner)
            } else {
                p.clone()
            }
        })
        .collect();
    BoardSnapshot::new(pieces, turn, Outcome::Ongoing).unwrap()
}

fn after_e4() -> BoardSnapshot {
    moved(&BoardSnapshot::initial(), "e2", sq("e4"), Player::Black)
}

fn start(
    authority: ScriptedAuthority,
    mode: GameMode,
) -> (Arc<ScriptedAuthority>, MoveSubmission<Arc<ScriptedAuthority>>) {
    let authority = Arc::new(authority);
    let machine = MoveSubmission::new(Arc::clone(&authority), mode);
    (authority, machine)
}

// ============================================================================
// Grab and Drop Tests
// ============================================================================

#[tokio::test]
async fn test_pawn_push_logs_one_entry() {
    //! Grab the e2 pawn, see its two targets, drop on e4
    //!
    //! The confirmed snapshot replaces the board and exactly one entry with
    //! no capture is appended.

    let scripted = ScriptedAuthority::default().with_legal("e2", vec![at(4, 5), at(4, 4)]);
    scripted.reply_move(Ok(MoveReply::Applied(after_e4())));
    let (authority, mut machine) = start(scripted, GameMode::PlayerVsPlayer);

    assert!(machine.grab("e2").await);
    assert_eq!(machine.store().available_moves(), &[at(4, 5), at(4, 4)]);

    let outcome = machine.drop_piece(at(4, 4)).await;
    let MoveOutcome::Applied(entry) = outcome else {
        panic!("expected the move to be applied");
    };

    assert_eq!(entry.mover, Player::White);
    assert_eq!(entry.piece_kind, PieceKind::Pawn);
    assert_eq!(entry.source, at(4, 6));
    assert_eq!(entry.target, at(4, 4));
    assert_eq!(entry.captured, None);
    assert_eq!(entry.to_string(), "White Pawn e2 → e4");

    assert_eq!(machine.store().history().len(), 1);
    assert_eq!(*machine.store().board(), after_e4());
    assert!(machine.store().available_moves().is_empty());
    assert_eq!(authority.calls(), vec!["legal e2", "move e2e4"]);
}

#[tokio::test]
async fn test_capture_comes_from_pre_move_occupant() {
    //! 1. e4 d5 2. exd5 records the black pawn as captured

    let scripted = ScriptedAuthority::default();
    let after_d5 = moved(&after_e4(), "d7", sq("d5"), Player::White);
    let after_exd5 = moved(&after_d5, "e2", sq("d5"), Player::Black);
    scripted.reply_move(Ok(MoveReply::Applied(after_e4())));
    scripted.reply_move(Ok(MoveReply::Applied(after_d5)));
    scripted.reply_move(Ok(MoveReply::Applied(after_exd5)));
    let (_, mut machine) = start(scripted, GameMode::PlayerVsPlayer);

    assert!(machine.grab("e2").await);
    assert!(machine.drop_piece(sq("e4")).await.is_applied());
    assert!(machine.grab("d7").await);
    assert!(machine.drop_piece(sq("d5")).await.is_applied());
    assert!(machine.grab("e2").await);
    let MoveOutcome::Applied(entry) = machine.drop_piece(sq("d5")).await else {
        panic!("expected the capture to be applied");
    };

    assert_eq!(entry.captured, Some(PieceKind::Pawn));
    assert_eq!(entry.to_string(), "White Pawn e4 → d5 (captures Pawn)");
    assert_eq!(machine.store().history().len(), 3);
    assert_eq!(machine.store().board().len(), 31);
}

#[tokio::test]
async fn test_own_piece_on_target_is_logged_as_captured() {
    //! King dropped on its own rook (castling as e1h1)
    //!
    //! The authority is the only judge of legality, so whatever stood on the
    //! target before submission is the captured kind.

    let position = BoardSnapshot::new(
        vec![
            Piece::new("e1", sq("e1"), PieceKind::King, Player::White),
            Piece::new("h1", sq("h1"), PieceKind::Rook, Player::White),
            Piece::new("e8", sq("e8"), PieceKind::King, Player::Black),
        ],
        Player::White,
        Outcome::Ongoing,
    )
    .unwrap();
    let castled = BoardSnapshot::new(
        vec![
            Piece::new("e1", sq("g1"), PieceKind::King, Player::White),
            Piece::new("h1", sq("f1"), PieceKind::Rook, Player::White),
            Piece::new("e8", sq("e8"), PieceKind::King, Player::Black),
        ],
        Player::Black,
        Outcome::Ongoing,
    )
    .unwrap();

    let scripted = ScriptedAuthority::default().with_legal("e1", vec![sq("h1")]);
    scripted.reply_undo(Ok(position));
    scripted.reply_move(Ok(MoveReply::Applied(castled.clone())));
    let (authority, mut machine) = start(scripted, GameMode::PlayerVsPlayer);
    machine.undo().await.unwrap();

    assert!(machine.grab("e1").await);
    let MoveOutcome::Applied(entry) = machine.drop_piece(sq("h1")).await else {
        panic!("expected the castling move to be applied");
    };

    assert_eq!(entry.piece_kind, PieceKind::King);
    assert_eq!(entry.captured, Some(PieceKind::Rook));
    assert_eq!(entry.to_string(), "White King e1 → h1 (captures Rook)");
    assert_eq!(*machine.store().board(), castled);
    assert_eq!(authority.calls(), vec!["undo", "legal e1", "move e1h1"]);
}

#[tokio::test]
async fn test_grab_of_opponent_piece_is_noop() {
    let (authority, mut machine) = start(ScriptedAuthority::default(), GameMode::PlayerVsPlayer);

    assert!(!machine.grab("e7").await);
    assert!(!machine.grab("no-such-piece").await);
    assert_eq!(machine.phase(), SubmissionPhase::Idle);
    assert!(machine.store().available_moves().is_empty());
    assert!(authority.calls().is_empty());
}

#[tokio::test]
async fn test_failed_grab_clears_previous_selection() {
    //! A refused grab leaves nothing in hand and nothing highlighted

    let scripted = ScriptedAuthority::default().with_legal("e2", vec![sq("e3"), sq("e4")]);
    let (authority, mut machine) = start(scripted, GameMode::PlayerVsPlayer);
    let frames = machine.subscribe();

    assert!(machine.grab("e2").await);
    assert_eq!(frames.borrow().available_moves.len(), 2);

    assert!(!machine.grab("e7").await);
    assert!(frames.borrow().available_moves.is_empty());
    assert!(machine.store().selection().held_piece().is_none());
    assert_eq!(machine.drop_piece(sq("e4")).await, MoveOutcome::Ignored);
    assert_eq!(authority.calls(), vec!["legal e2"]);
}

#[tokio::test]
async fn test_drop_without_grab_is_ignored() {
    let (authority, mut machine) = start(ScriptedAuthority::default(), GameMode::PlayerVsPlayer);

    assert_eq!(machine.drop_piece(sq("e4")).await, MoveOutcome::Ignored);
    assert!(authority.calls().is_empty());
    assert!(machine.store().history().is_empty());
}

#[tokio::test]
async fn test_drop_is_not_filtered_by_available_moves() {
    //! The authority decides; the client submits whatever was dropped

    let scripted = ScriptedAuthority::default().with_legal("e2", vec![at(4, 5)]);
    scripted.reply_move(Err(AuthorityError::Rejected {
        status: 400,
        message: "illegal move".to_string(),
    }));
    let (authority, mut machine) = start(scripted, GameMode::PlayerVsPlayer);

    machine.grab("e2").await;
    machine.drop_piece(sq("e3")).await;
    assert_eq!(authority.calls(), vec!["legal e2", "move e2e3"]);
}

#[tokio::test]
async fn test_available_moves_cleared_on_every_drop() {
    let scripted = ScriptedAuthority::default().with_legal("g1", vec![sq("f3"), sq("h3")]);
    scripted.reply_move(Err(unavailable()));
    let (_, mut machine) = start(scripted, GameMode::PlayerVsPlayer);
    let frames = machine.subscribe();

    machine.grab("g1").await;
    assert_eq!(frames.borrow().available_moves.len(), 2);

    assert_eq!(machine.drop_piece(sq("f3")).await, MoveOutcome::Rejected);
    assert!(frames.borrow().available_moves.is_empty());
    assert!(machine.store().available_moves().is_empty());
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_rejected_move_leaves_state_identical() {
    let scripted = ScriptedAuthority::default();
    scripted.reply_move(Err(AuthorityError::Rejected {
        status: 422,
        message: "illegal move".to_string(),
    }));
    scripted.reply_move(Err(unavailable()));
    let (_, mut machine) = start(scripted, GameMode::PlayerVsPlayer);
    let before = machine.store().state().clone();

    machine.grab("e2").await;
    assert_eq!(machine.drop_piece(sq("e5")).await, MoveOutcome::Rejected);
    assert_eq!(*machine.store().state(), before);

    machine.grab("e2").await;
    assert_eq!(machine.drop_piece(sq("e4")).await, MoveOutcome::Rejected);
    assert_eq!(*machine.store().state(), before);

    assert!(machine.store().history().is_empty());
    assert_eq!(machine.phase(), SubmissionPhase::Idle);
}

// ============================================================================
// Promotion Tests
// ============================================================================

/// White pawn "a2" one step from promotion, kings on e1 and e8
fn promotion_position() -> BoardSnapshot {
    BoardSnapshot::new(
        vec![
            Piece::new("e1", sq("e1"), PieceKind::King, Player::White),
            Piece::new("e8", sq("e8"), PieceKind::King, Player::Black),
            Piece::new("a2", sq("a7"), PieceKind::Pawn, Player::White),
        ],
        Player::White,
        Outcome::Ongoing,
    )
    .unwrap()
}

#[tokio::test]
async fn test_promotion_suspends_and_resubmits() {
    //! The authority asks for a promotion; the flow waits for the resolver
    //! and resubmits the same move with the chosen kind

    let scripted = ScriptedAuthority::default();
    let promoted = BoardSnapshot::new(
        vec![
            Piece::new("e1", sq("e1"), PieceKind::King, Player::White),
            Piece::new("e8", sq("e8"), PieceKind::King, Player::Black),
            Piece::new("a2", sq("a8"), PieceKind::Queen, Player::White),
        ],
        Player::Black,
        Outcome::Check,
    )
    .unwrap();
    // The undo lands the session on a position with a pawn about to promote.
    scripted.reply_undo(Ok(promotion_position()));
    scripted.reply_move(Ok(MoveReply::PromotionRequired));
    scripted.reply_move(Ok(MoveReply::Applied(promoted)));
    let (authority, mut machine) = start(scripted, GameMode::PlayerVsPlayer);
    machine.undo().await.unwrap();

    let resolver = machine.promotions();
    let mut pending = resolver.subscribe();
    let phase = machine.subscribe_phase();

    assert!(machine.grab("a2").await);
    let submission = machine.drop_piece(sq("a8"));
    let choose = async {
        pending.wait_for(Option::is_some).await.unwrap();
        assert_eq!(*phase.borrow(), SubmissionPhase::AwaitingPromotionChoice);
        let request = resolver.pending().unwrap();
        assert_eq!(request.source.as_str(), "a7");
        assert_eq!(request.target.as_str(), "a8");
        assert_eq!(request.mover, Player::White);
        assert!(resolver.resolve("q".parse::<PromotionKind>().unwrap()));
    };
    let (outcome, ()) = tokio::join!(submission, choose);

    let MoveOutcome::Applied(entry) = outcome else {
        panic!("expected the promotion to be applied");
    };
    assert_eq!(entry.piece_kind, PieceKind::Pawn);
    assert_eq!(entry.target, sq("a8"));

    let queen = machine.store().board().piece_at(sq("a8")).unwrap();
    assert_eq!(queen.id, "a2");
    assert_eq!(queen.kind, PieceKind::Queen);
    assert_eq!(machine.store().board().outcome(), Outcome::Check);
    assert_eq!(
        authority.calls(),
        vec!["undo", "legal a7", "move a7a8", "move a7a8=q"]
    );
    assert!(!resolver.is_awaiting());
    assert_eq!(machine.phase(), SubmissionPhase::Idle);
}

#[tokio::test]
async fn test_resolve_while_idle_is_noop() {
    let scripted = ScriptedAuthority::default();
    scripted.reply_move(Ok(MoveReply::Applied(after_e4())));
    let (_, mut machine) = start(scripted, GameMode::PlayerVsPlayer);
    let resolver = machine.promotions();

    assert!(!resolver.resolve(PromotionKind::Queen));

    machine.grab("e2").await;
    assert!(machine.drop_piece(sq("e4")).await.is_applied());
    assert!(!resolver.resolve(PromotionKind::Queen));
    assert_eq!(machine.store().history().len(), 1);
}

#[tokio::test]
async fn test_abandoned_promotion_recovers_on_next_gesture() {
    //! Dropping the submission mid-prompt leaves no request behind

    let scripted = ScriptedAuthority::default();
    scripted.reply_undo(Ok(promotion_position()));
    scripted.reply_move(Ok(MoveReply::PromotionRequired));
    let (_, mut machine) = start(scripted, GameMode::PlayerVsPlayer);
    machine.undo().await.unwrap();
    let resolver = machine.promotions();

    machine.grab("a2").await;
    {
        let submission = machine.drop_piece(sq("a8"));
        tokio::pin!(submission);
        let mut pending = resolver.subscribe();
        tokio::select! {
            _ = &mut submission => panic!("the flow should be waiting on the prompt"),
            _ = pending.wait_for(Option::is_some) => {}
        }
    }

    assert!(!resolver.is_awaiting());
    assert!(machine.grab("a2").await);
    assert!(resolver.pending().is_none());
    assert_eq!(machine.phase(), SubmissionPhase::Idle);
    assert_eq!(*machine.store().board(), promotion_position());
}

// ============================================================================
// AI Mode Tests
// ============================================================================

fn after_e4_e5() -> BoardSnapshot {
    moved(&after_e4(), "e7", sq("e5"), Player::White)
}

#[tokio::test]
async fn test_ai_mode_requests_exactly_one_reply() {
    let scripted = ScriptedAuthority::default();
    scripted.reply_move(Ok(MoveReply::Applied(after_e4())));
    scripted.reply_ai(Ok(after_e4_e5()));
    let (authority, mut machine) = start(scripted, GameMode::PlayerVsAi);

    machine.grab("e2").await;
    assert!(machine.drop_piece(sq("e4")).await.is_applied());

    assert_eq!(authority.calls(), vec!["legal e2", "move e2e4", "ai"]);
    assert_eq!(*machine.store().board(), after_e4_e5());
    assert_eq!(machine.store().board().turn(), Player::White);
    // The AI reply is not logged by default.
    assert_eq!(machine.store().history().len(), 1);
    assert_eq!(machine.phase(), SubmissionPhase::Idle);
}

#[tokio::test]
async fn test_ai_reply_logged_when_enabled() {
    let scripted = ScriptedAuthority::default();
    scripted.reply_move(Ok(MoveReply::Applied(after_e4())));
    scripted.reply_ai(Ok(after_e4_e5()));
    let (_, machine) = start(scripted, GameMode::PlayerVsAi);
    let mut machine = machine.with_record_ai_moves(true);

    machine.grab("e2").await;
    machine.drop_piece(sq("e4")).await;

    let history = machine.store().history();
    assert_eq!(history.len(), 2);
    let reply = history.last_move().unwrap();
    assert_eq!(reply.to_string(), "Black Pawn e7 → e5");
}

#[tokio::test]
async fn test_ai_failure_keeps_confirmed_human_move() {
    let scripted = ScriptedAuthority::default();
    scripted.reply_move(Ok(MoveReply::Applied(after_e4())));
    scripted.reply_ai(Err(unavailable()));
    let (_, mut machine) = start(scripted, GameMode::PlayerVsAi);

    machine.grab("e2").await;
    assert!(machine.drop_piece(sq("e4")).await.is_applied());
    assert_eq!(*machine.store().board(), after_e4());
    assert_eq!(machine.store().history().len(), 1);
}

#[tokio::test]
async fn test_no_ai_reply_in_pvp_mode() {
    let scripted = ScriptedAuthority::default();
    scripted.reply_move(Ok(MoveReply::Applied(after_e4())));
    let (authority, mut machine) = start(scripted, GameMode::PlayerVsPlayer);

    machine.grab("e2").await;
    machine.drop_piece(sq("e4")).await;
    assert!(!authority.calls().contains(&"ai".to_string()));
}

// ============================================================================
// Undo, Reset and Mode Tests
// ============================================================================

#[tokio::test]
async fn test_undo_removes_last_entry_and_applies_authority_board() {
    let scripted = ScriptedAuthority::default();
    scripted.reply_move(Ok(MoveReply::Applied(after_e4())));
    scripted.reply_undo(Ok(BoardSnapshot::initial()));
    let (_, mut machine) = start(scripted, GameMode::PlayerVsPlayer);

    machine.grab("e2").await;
    machine.drop_piece(sq("e4")).await;
    machine.undo().await.unwrap();

    assert!(machine.store().history().is_empty());
    assert_eq!(*machine.store().board(), BoardSnapshot::initial());
}

#[tokio::test]
async fn test_failed_undo_keeps_board() {
    let scripted = ScriptedAuthority::default();
    scripted.reply_move(Ok(MoveReply::Applied(after_e4())));
    let (_, mut machine) = start(scripted, GameMode::PlayerVsPlayer);

    machine.grab("e2").await;
    machine.drop_piece(sq("e4")).await;
    assert!(machine.undo().await.is_err());

    assert!(machine.store().history().is_empty());
    assert_eq!(*machine.store().board(), after_e4());
    assert_eq!(machine.phase(), SubmissionPhase::Idle);
}

#[tokio::test]
async fn test_reset_is_local_even_when_authority_fails() {
    let scripted = ScriptedAuthority {
        fail_admin: true,
        ..ScriptedAuthority::default()
    };
    scripted.reply_move(Ok(MoveReply::Applied(after_e4())));
    let (authority, mut machine) = start(scripted, GameMode::PlayerVsPlayer);

    machine.grab("e2").await;
    machine.drop_piece(sq("e4")).await;
    assert!(machine.reset().await.is_err());

    assert_eq!(*machine.store().board(), BoardSnapshot::initial());
    assert!(machine.store().history().is_empty());
    assert_eq!(authority.calls().last().map(String::as_str), Some("reset"));
}

#[tokio::test]
async fn test_mode_switch_starts_new_game() {
    let scripted = ScriptedAuthority::default();
    scripted.reply_move(Ok(MoveReply::Applied(after_e4())));
    let (authority, mut machine) = start(scripted, GameMode::PlayerVsPlayer);

    machine.grab("e2").await;
    machine.drop_piece(sq("e4")).await;
    machine.set_mode(GameMode::PlayerVsAi).await.unwrap();

    assert_eq!(machine.store().mode(), GameMode::PlayerVsAi);
    assert_eq!(*machine.store().board(), BoardSnapshot::initial());
    assert!(machine.store().history().is_empty());
    assert_eq!(
        authority.calls(),
        vec!["legal e2", "move e2e4", "mode ai", "reset"]
    );
}
