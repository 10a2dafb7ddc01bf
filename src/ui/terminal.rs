//! Text board surface
//!
//! Draws the position as an 8x8 grid of piece letters (uppercase White,
//! lowercase Black, `.` for empty squares) with rank and file labels, from
//! the configured player's point of view.

use crate::game::{Side, StatusText};
use crate::ui::board::BoardSurface;
use parking_lot::Mutex;
use shakmaty::fen::Fen;
use shakmaty::{Board, Color, File, Rank, Square};
use std::io::{self, Write};
use tracing::warn;

struct TerminalState<W> {
    out: W,
    board: Board,
}

/// Board surface writing to a terminal (or any writer)
pub struct TerminalBoard<W: Write + Send = io::Stdout> {
    orientation: Side,
    state: Mutex<TerminalState<W>>,
}

impl TerminalBoard<io::Stdout> {
    pub fn stdout(orientation: Side) -> Self {
        Self::new(io::stdout(), orientation)
    }
}

impl<W: Write + Send> TerminalBoard<W> {
    pub fn new(out: W, orientation: Side) -> Self {
        Self {
            orientation,
            state: Mutex::new(TerminalState {
                out,
                board: Board::default(),
            }),
        }
    }

    pub fn orientation(&self) -> Side {
        self.orientation
    }

    /// Piece code (`"wP"`, `"bK"`, ...) of whatever was last drawn on `square`.
    pub fn piece_code_at(&self, square: Square) -> Option<String> {
        let state = self.state.lock();
        state.board.piece_at(square).map(|piece| {
            let colour = match piece.color {
                Color::White => 'w',
                Color::Black => 'b',
            };
            format!("{colour}{}", piece.role.upper_char())
        })
    }

    pub fn into_inner(self) -> W {
        self.state.into_inner().out
    }

    fn write_line(&self, line: &str) {
        let mut state = self.state.lock();
        if let Err(e) = writeln!(state.out, "{line}").and_then(|_| state.out.flush()) {
            warn!("[TERMINAL] Failed to write to terminal: {}", e);
        }
    }
}

/// Text grid for `board` as seen by `orientation`.
pub fn render_grid(board: &Board, orientation: Side) -> String {
    let ranks: Vec<Rank> = match orientation {
        Side::White => Rank::ALL.iter().rev().copied().collect(),
        Side::Black => Rank::ALL.to_vec(),
    };
    let files: Vec<File> = match orientation {
        Side::White => File::ALL.to_vec(),
        Side::Black => File::ALL.iter().rev().copied().collect(),
    };

    let mut grid = String::new();
    for rank in &ranks {
        grid.push(rank.char());
        for file in &files {
            grid.push(' ');
            let square = Square::from_coords(*file, *rank);
            grid.push(board.piece_at(square).map_or('.', |piece| piece.char()));
        }
        grid.push('\n');
    }
    grid.push(' ');
    for file in &files {
        grid.push(' ');
        grid.push(file.char());
    }
    grid
}

impl<W: Write + Send> BoardSurface for TerminalBoard<W> {
    fn render(&self, fen: &str) {
        let board = match fen.parse::<Fen>() {
            Ok(parsed) => parsed.into_setup().board,
            Err(e) => {
                warn!("[TERMINAL] Cannot render position {:?}: {}", fen, e);
                return;
            }
        };
        let grid = render_grid(&board, self.orientation);
        let mut state = self.state.lock();
        state.board = board;
        if let Err(e) = writeln!(state.out, "\n{grid}").and_then(|_| state.out.flush()) {
            warn!("[TERMINAL] Failed to write to terminal: {}", e);
        }
    }

    fn show_status(&self, status: &StatusText) {
        if status.game_over {
            self.write_line(&format!("== {} ==", status.text));
        } else {
            self.write_line(&status.text);
        }
    }

    fn alert(&self, message: &str) {
        self.write_line(&format!("[!] {message}"));
    }
}
