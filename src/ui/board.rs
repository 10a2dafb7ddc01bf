//! Board surface capability
//!
//! A board surface is where positions are drawn and where user input comes
//! from. Input flows the other way round: the surface asks the orchestrator
//! through [`MoveOrchestrator::on_drag_start`], hands it drops through
//! [`MoveOrchestrator::on_drop`], and reports finished snap animations through
//! [`MoveOrchestrator::on_snap_end`]. This trait covers only what the
//! orchestrator pushes back.
//!
//! [`MoveOrchestrator::on_drag_start`]: crate::game::MoveOrchestrator::on_drag_start
//! [`MoveOrchestrator::on_drop`]: crate::game::MoveOrchestrator::on_drop
//! [`MoveOrchestrator::on_snap_end`]: crate::game::MoveOrchestrator::on_snap_end

use crate::game::StatusText;

pub trait BoardSurface: Send + Sync {
    /// Draw the given FEN position.
    fn render(&self, fen: &str);

    /// Replace the status line, applying game-over styling when flagged.
    fn show_status(&self, status: &StatusText);

    /// Modal notice: rejections, final results, request failures.
    fn alert(&self, message: &str);
}
