//! Interactive terminal client for the StockZero move service.
//!
//! Type moves as `e2e4` (or `e2 e4`). Other commands: `engine default`,
//! `engine traditional`, `new`, `fen`, `moves`, `help`, `quit`.

use anyhow::{Context, Result};
use clap::Parser;
use shakmaty::Square;
use std::path::PathBuf;
use std::sync::Arc;
use stockzero_client::core::logging::init_logging;
use stockzero_client::core::ClientSettings;
use stockzero_client::game::{ChessRules, DropOutcome, Resolution, HUMAN_SIDE};
use stockzero_client::networking::{EngineMode, HttpArbiter};
use stockzero_client::ui::TerminalBoard;
use stockzero_client::MoveOrchestrator;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use url::Url;

/// Environment variable supplying the session cookie header
const COOKIE_ENV: &str = "STOCKZERO_COOKIE";

#[derive(Parser, Debug)]
#[command(name = "stockzero", about = "Play against the StockZero engines from a terminal")]
struct Cli {
    /// Base URL of the StockZero web app
    #[arg(long)]
    server: Option<String>,

    /// Engine answering your moves
    #[arg(long, value_enum)]
    engine: Option<EngineMode>,

    /// Seconds to wait for the engine before taking the move back
    #[arg(long)]
    timeout: Option<u64>,

    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save: bool,

    /// Debug logging for this client
    #[arg(short, long)]
    verbose: bool,
}

type TerminalOrchestrator = MoveOrchestrator<ChessRules, TerminalBoard, HttpArbiter>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings_path = cli.settings.clone().unwrap_or_else(ClientSettings::default_path);
    let mut settings = ClientSettings::load_or_default(&settings_path);
    if let Some(server) = cli.server {
        settings.server_url = server;
    }
    if let Some(engine) = cli.engine {
        settings.engine_mode = engine;
    }
    if let Some(timeout) = cli.timeout {
        settings.request_timeout_secs = timeout;
    }
    if let Ok(cookie) = std::env::var(COOKIE_ENV) {
        settings.cookie = Some(cookie);
    }
    if cli.save {
        settings
            .save_to(&settings_path)
            .with_context(|| format!("saving settings to {}", settings_path.display()))?;
    }

    let base_url = Url::parse(&settings.server_url)
        .with_context(|| format!("invalid server URL {:?}", settings.server_url))?;
    let mut arbiter = HttpArbiter::new(base_url, settings.request_timeout())?
        .with_csrf_cookie_name(settings.csrf_cookie_name.clone());
    if let Some(cookie) = settings.cookie.clone() {
        arbiter = arbiter.with_cookie(cookie);
    }

    let board = Arc::new(TerminalBoard::stdout(HUMAN_SIDE));
    let orchestrator = MoveOrchestrator::new(ChessRules::new(), board.clone(), Arc::new(arbiter))
        .with_request_timeout(settings.request_timeout())
        .with_engine_mode(settings.engine_mode);

    info!(
        "Connected to {} using the {:?} engine",
        settings.server_url, settings.engine_mode
    );
    orchestrator.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit" | "exit"] => break,
            ["help"] => print_help(),
            ["fen"] => println!("{}", orchestrator.position_notation()),
            ["moves"] => print_moves(&orchestrator),
            ["new"] => {
                if !orchestrator.new_game() {
                    println!("Wait for the engine before starting over.");
                }
            }
            ["engine", "default"] => orchestrator.set_engine_mode(EngineMode::Default),
            ["engine", "traditional"] => orchestrator.set_engine_mode(EngineMode::Traditional),
            [mv] if mv.len() == 4 => play(&orchestrator, &board, &mv[..2], &mv[2..]).await,
            [from, to] => play(&orchestrator, &board, from, to).await,
            _ => println!("Unrecognised input, try `help`."),
        }
    }
    Ok(())
}

async fn play(orchestrator: &TerminalOrchestrator, board: &TerminalBoard, from: &str, to: &str) {
    let (Ok(source), Ok(target)) = (from.parse::<Square>(), to.parse::<Square>()) else {
        println!("Squares look like e2 or g8.");
        return;
    };
    let Some(piece) = board.piece_code_at(source) else {
        println!("No piece on {source}.");
        return;
    };
    if !orchestrator.on_drag_start(source, &piece, board.orientation()) {
        println!("You cannot move that piece now.");
        return;
    }

    let outcome = orchestrator.on_drop(source, target).await;
    match &outcome {
        DropOutcome::Snapback => println!("{source}{target} is not a legal move."),
        DropOutcome::Busy | DropOutcome::Refused => println!("You cannot move now."),
        DropOutcome::Submitted(Resolution::Accepted { reply, .. }) => {
            println!("Engine played {}.", reply.san)
        }
        DropOutcome::Submitted(_) => {}
    }
    if outcome.is_snapback() {
        orchestrator.on_snap_end();
    }
}

fn print_moves(orchestrator: &TerminalOrchestrator) {
    let sans: Vec<String> = orchestrator.with_rules(|rules| {
        rules.moves().map(|mv| mv.san.clone()).collect()
    });
    if sans.is_empty() {
        println!("No moves yet.");
        return;
    }
    let numbered: Vec<String> = sans
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| format!("{}. {}", i + 1, pair.join(" ")))
        .collect();
    println!("{}", numbered.join(" "));
}

fn print_help() {
    println!("Moves: e2e4 or e2 e4 (pawns promote to a queen)");
    println!("engine default|traditional  choose the engine");
    println!("new                         start a new game");
    println!("fen                         print the current position");
    println!("moves                       list the moves played so far");
    println!("quit                        leave");
}
