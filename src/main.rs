//! Terminal front end for a remote chess authority
//!
//! Reads gestures from stdin, forwards them to the submission flow and
//! prints the confirmed board after every change. Type `help` for commands.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use xfchess_remote::core::{load_or_default, save_settings, settings_path, ClientSettings};
use xfchess_remote::game::components::{GameMode, Outcome, PromotionKind};
use xfchess_remote::game::resources::SessionFrame;
use xfchess_remote::game::square::{Coordinate, SquareName, BOARD_SIZE};
use xfchess_remote::networking::HttpAuthority;
use xfchess_remote::{MoveOutcome, MoveSubmission};

type Machine = MoveSubmission<HttpAuthority>;
type Input = Lines<BufReader<Stdin>>;

#[derive(Parser, Debug)]
#[command(name = "xfchess-remote", version, about = "Play chess against a remote authority")]
struct Args {
    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Authority base URL
    #[arg(long)]
    url: Option<String>,

    /// Request timeout in seconds (0 disables it)
    #[arg(long)]
    timeout: Option<u64>,

    /// Start in player-vs-AI mode
    #[arg(long)]
    ai: bool,

    /// Add AI replies to the move history
    #[arg(long)]
    record_ai_moves: bool,

    /// Write the resolved settings back to the settings file
    #[arg(long)]
    save_config: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = resolve_settings(&args)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    runtime.block_on(run(settings))
}

/// File, then environment, then command line
fn resolve_settings(args: &Args) -> Result<ClientSettings> {
    let path = args.config.clone().unwrap_or_else(settings_path);
    let mut settings = load_or_default(&path);
    settings
        .apply_env_overrides()
        .context("invalid environment override")?;

    if let Some(url) = &args.url {
        settings.authority_url = url.clone();
    }
    if let Some(timeout) = args.timeout {
        settings.request_timeout_secs = timeout;
    }
    if args.ai {
        settings.default_mode = GameMode::PlayerVsAi;
    }
    if args.record_ai_moves {
        settings.record_ai_moves = true;
    }
    settings.validate().context("invalid settings")?;

    if args.save_config {
        save_settings(&path, &settings)
            .with_context(|| format!("failed to save settings to {}", path.display()))?;
    }
    Ok(settings)
}

async fn run(settings: ClientSettings) -> Result<()> {
    let authority = HttpAuthority::from_settings(&settings)
        .with_context(|| format!("cannot use authority at {}", settings.authority_url))?;
    let mut machine = MoveSubmission::new(authority, settings.default_mode)
        .with_record_ai_moves(settings.record_ai_moves);
    let frames = machine.subscribe();

    println!("Authority: {}", machine.authority().base_url());
    if let Err(e) = machine.set_mode(settings.default_mode).await {
        warn!("Starting offline from the authority's point of view: {}", e);
    }
    render(&frames.borrow());
    print_help();

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = input.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["help"] => print_help(),
            ["quit"] | ["exit"] => break,
            ["show"] => render(&frames.borrow()),
            ["grab", piece] => {
                grab(&mut machine, piece).await;
                render(&frames.borrow());
            }
            ["drop", square] => {
                let Some(target) = parse_square(square) else { continue };
                let outcome = drop_with_prompt(&mut machine, target, &mut input).await?;
                report(&outcome);
                render(&frames.borrow());
            }
            ["move", from, to] => {
                let Some(target) = parse_square(to) else { continue };
                if grab(&mut machine, from).await {
                    let outcome = drop_with_prompt(&mut machine, target, &mut input).await?;
                    report(&outcome);
                }
                render(&frames.borrow());
            }
            ["promote", _] => println!("No promotion is pending."),
            ["undo"] => {
                if let Err(e) = machine.undo().await {
                    println!("Undo not confirmed: {e}");
                }
                render(&frames.borrow());
            }
            ["reset"] => {
                if let Err(e) = machine.reset().await {
                    println!("Reset not confirmed: {e}");
                }
                render(&frames.borrow());
            }
            ["mode", mode] => match mode.parse::<GameMode>() {
                Ok(mode) => {
                    if let Err(e) = machine.set_mode(mode).await {
                        println!("Mode switch not confirmed: {e}");
                    }
                    render(&frames.borrow());
                }
                Err(e) => println!("{e}"),
            },
            _ => println!("Unknown command {line:?}. Type 'help' for commands."),
        }
    }
    Ok(())
}

/// Accepts a square holding a piece or a piece id
async fn grab(machine: &mut Machine, text: &str) -> bool {
    let by_square = text
        .parse::<SquareName>()
        .ok()
        .and_then(|name| machine.store().board().piece_at(name.to_coordinate()))
        .map(|piece| piece.id.clone());
    let piece_id = by_square.unwrap_or_else(|| text.to_string());

    let taken = machine.grab(&piece_id).await;
    if !taken {
        println!("Cannot pick up {text}.");
    }
    taken
}

/// Drop while answering a promotion prompt if the authority asks for one
async fn drop_with_prompt(
    machine: &mut Machine,
    target: Coordinate,
    input: &mut Input,
) -> Result<MoveOutcome> {
    let promotions = machine.promotions();
    let mut pending = promotions.subscribe();
    let submission = machine.drop_piece(target);
    tokio::pin!(submission);

    loop {
        tokio::select! {
            outcome = &mut submission => return Ok(outcome),
            Ok(()) = pending.changed() => {
                if let Some(request) = *pending.borrow_and_update() {
                    println!(
                        "{} pawn {}{} promotes. Choose q, r, b or n (promote <choice>):",
                        request.mover, request.source, request.target
                    );
                }
            }
            line = input.next_line(), if promotions.is_awaiting() => {
                let Some(line) = line? else {
                    bail!("input closed while a promotion choice was pending");
                };
                let choice = line.trim().trim_start_matches("promote").trim();
                match choice.parse::<PromotionKind>() {
                    Ok(kind) => {
                        promotions.resolve(kind);
                    }
                    Err(e) => println!("{e}"),
                }
            }
        }
    }
}

fn parse_square(text: &str) -> Option<Coordinate> {
    match text.parse::<SquareName>() {
        Ok(name) => Some(name.to_coordinate()),
        Err(e) => {
            println!("{e}");
            None
        }
    }
}

fn report(outcome: &MoveOutcome) {
    match outcome {
        MoveOutcome::Applied(entry) => println!("Played {entry}"),
        MoveOutcome::Rejected => println!("Move not accepted."),
        MoveOutcome::Ignored => println!("Nothing in hand."),
    }
}

fn render(frame: &SessionFrame) {
    let board = &frame.state.board;
    println!();
    for rank in 0..BOARD_SIZE {
        let mut row = format!("{} ", BOARD_SIZE - rank);
        for file in 0..BOARD_SIZE {
            let Some(square) = Coordinate::new(file, rank) else { continue };
            let cell = match board.piece_at(square) {
                Some(piece) => piece.kind.symbol(piece.owner),
                None if frame.available_moves.contains(&square) => '*',
                None => '.',
            };
            row.push(' ');
            row.push(cell);
        }
        println!("{row}");
    }
    println!("   a b c d e f g h");

    let status = match board.outcome() {
        Outcome::Ongoing => String::new(),
        Outcome::Check => " (check)".to_string(),
        Outcome::Checkmate => " (checkmate)".to_string(),
        Outcome::Stalemate => " (stalemate)".to_string(),
    };
    println!("{} to move{status} | mode {}", board.turn(), frame.state.mode);

    if !frame.history.is_empty() {
        println!("History:");
        for (i, entry) in frame.history.iter().enumerate() {
            println!("  {:>3}. {entry}", i + 1);
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  grab <square|id>     pick up a piece and show its legal targets (*)");
    println!("  drop <square>        drop the held piece");
    println!("  move <from> <to>     grab and drop in one go");
    println!("  promote <q|r|b|n>    answer a promotion prompt");
    println!("  undo | reset | mode <pvp|ai> | show | help | quit");
}
