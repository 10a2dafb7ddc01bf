//! Move orchestrator
//!
//! Drives a player's move from drag start to the arbitration service's
//! verdict:
//!
//! ```text
//! drag start ── allowed? ──► drop ──► apply locally ──► render ──► submit
//!                                         │                          │
//!                                     illegal: snapback     ┌────────┴─────────┐
//!                                                        verdict          transport failure
//!                                             ┌─────────────┼────────────┐        │
//!                                          rejected     game over     reply    rollback
//!                                          rollback   (+ final reply)  applied
//! ```
//!
//! The move is applied before the service answers so the board responds
//! immediately. While the answer is outstanding the session sits in
//! [`SessionPhase::AwaitingReply`] and every drag is refused; the
//! [`SubmissionPermit`] that holds that phase is released only after the
//! verdict has been fully processed, on every path.
//!
//! # Failure handling
//!
//! Nothing escapes [`MoveOrchestrator::on_drop`]. Rejections, malformed
//! replies, timeouts and transport errors all roll the optimistic move back,
//! re-render, and raise an alert on the board. The outcome is also returned
//! as a [`DropOutcome`] for callers that want to react to it.

use crate::game::rules::Rules;
use crate::game::session::{MoveGate, SessionPhase, SubmissionPermit};
use crate::game::status::{derive_status, StatusText};
use crate::game::types::{AppliedMove, ProposedMove, Side};
use crate::networking::{ArbitrationService, EngineMode, MoveReply, MoveRequest, NetworkError};
use crate::ui::BoardSurface;
use parking_lot::Mutex;
use shakmaty::Square;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default wait for the arbitration service before the move is rolled back
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The local player always has White; the service answers as Black.
pub const HUMAN_SIDE: Side = Side::White;

/// What happened to a dropped piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Illegal move; the piece goes back to its origin and nothing changed
    Snapback,
    /// Another move is still waiting on the service; refused without a request
    Busy,
    /// The game is over or it is not the player's turn; nothing changed
    Refused,
    /// The move was played and sent to the service
    Submitted(Resolution),
}

impl DropOutcome {
    /// Whether the board should animate the piece back to its origin
    pub fn is_snapback(&self) -> bool {
        matches!(
            self,
            DropOutcome::Snapback | DropOutcome::Busy | DropOutcome::Refused
        )
    }
}

/// How a submitted move was settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Service accepted the move and answered with `reply`
    Accepted {
        player: AppliedMove,
        reply: AppliedMove,
    },
    /// Game ended, either on the player's move or on the service's final reply
    GameOver {
        player: AppliedMove,
        reply: Option<AppliedMove>,
        result: String,
    },
    /// Service refused the move, or its answer could not be played; rolled back
    Rejected { player: AppliedMove, reason: String },
    /// No verdict arrived; rolled back
    TransportFailed { player: AppliedMove, detail: String },
}

/// Keeps the local game and the arbitration service in step
pub struct MoveOrchestrator<R, B: ?Sized, S: ?Sized> {
    rules: Mutex<R>,
    board: Arc<B>,
    service: Arc<S>,
    gate: MoveGate,
    engine_mode: Mutex<EngineMode>,
    /// Result announced by the service once it declared the game over
    concluded: Mutex<Option<String>>,
    request_timeout: Duration,
}

impl<R, B, S> MoveOrchestrator<R, B, S>
where
    R: Rules,
    B: BoardSurface + ?Sized,
    S: ArbitrationService + ?Sized,
{
    pub fn new(rules: R, board: Arc<B>, service: Arc<S>) -> Self {
        Self {
            rules: Mutex::new(rules),
            board,
            service,
            gate: MoveGate::default(),
            engine_mode: Mutex::new(EngineMode::default()),
            concluded: Mutex::new(None),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_engine_mode(self, mode: EngineMode) -> Self {
        *self.engine_mode.lock() = mode;
        self
    }

    pub fn engine_mode(&self) -> EngineMode {
        *self.engine_mode.lock()
    }

    /// Choose the engine for subsequent submissions. An in-flight request
    /// keeps the engine it was sent to.
    pub fn set_engine_mode(&self, mode: EngineMode) {
        info!("[ORCHESTRATOR] Engine mode set to {:?}", mode);
        *self.engine_mode.lock() = mode;
    }

    pub fn phase(&self) -> SessionPhase {
        self.gate.phase()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.gate.is_pending()
    }

    /// Result the service announced when it ended the game, if it has.
    pub fn concluded_result(&self) -> Option<String> {
        self.concluded.lock().clone()
    }

    pub fn position_notation(&self) -> String {
        self.rules.lock().position_notation()
    }

    /// Status line for the current position.
    pub fn status(&self) -> StatusText {
        let terminal = self.concluded_result();
        let rules = self.rules.lock();
        derive_status(&*rules, HUMAN_SIDE, terminal.as_deref())
    }

    /// Run `f` against the rules engine.
    pub fn with_rules<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&self.rules.lock())
    }

    /// Draw the current position and status, as on first load.
    pub fn start(&self) {
        self.render();
        self.publish_status(self.concluded_result().as_deref());
    }

    /// Whether a drag of `piece` from `source` may begin.
    ///
    /// Refused once the game is over, while a submission is in flight, and
    /// for pieces of the side not to move. Unknown piece codes are refused.
    pub fn on_drag_start(&self, source: Square, piece: &str, orientation: Side) -> bool {
        if self.concluded.lock().is_some() {
            debug!("[ORCHESTRATOR] Drag {} {} refused: game concluded", piece, source);
            return false;
        }
        if self.gate.is_pending() {
            debug!(
                "[ORCHESTRATOR] Drag {} {} refused: awaiting reply",
                piece, source
            );
            return false;
        }
        let Some(side) = Side::from_piece_code(piece) else {
            warn!("[ORCHESTRATOR] Unknown piece code {:?} on {}", piece, source);
            return false;
        };

        let rules = self.rules.lock();
        if rules.is_game_over() {
            debug!("[ORCHESTRATOR] Drag {} {} refused: game over", piece, source);
            return false;
        }
        let allowed = side == rules.turn();
        debug!(
            "[ORCHESTRATOR] Drag {} {} ({} view): {}",
            piece,
            source,
            orientation,
            if allowed { "allowed" } else { "not this side's turn" }
        );
        allowed
    }

    /// Play a dropped piece and settle it with the arbitration service.
    ///
    /// Checks the same game-over and turn conditions as
    /// [`on_drag_start`](Self::on_drag_start), so callers that skip the drag
    /// query still cannot move for the engine or after the game has ended.
    pub async fn on_drop(&self, source: Square, target: Square) -> DropOutcome {
        let proposed = ProposedMove::new(source, target);
        let Some(permit) = self.gate.try_begin(proposed) else {
            debug!("[ORCHESTRATOR] Drop {} refused: awaiting reply", proposed);
            return DropOutcome::Busy;
        };
        if let Some(reason) = self.drop_refusal() {
            debug!("[ORCHESTRATOR] Drop {} refused: {}", proposed, reason);
            return DropOutcome::Refused;
        }

        let played = {
            let mut rules = self.rules.lock();
            rules.apply_move(&proposed).map(|player| {
                let request = MoveRequest {
                    mv: player.uci.clone(),
                    fen: rules.position_notation(),
                };
                (player, request)
            })
        };
        let (player, request) = match played {
            Ok(played) => played,
            Err(e) => {
                debug!("[ORCHESTRATOR] Snapback {}: {}", proposed, e);
                return DropOutcome::Snapback;
            }
        };

        info!("[ORCHESTRATOR] Played {} ({}), submitting", player.san, player.uci);
        self.publish_status(None);
        self.render();

        let mut in_flight = InFlight {
            orchestrator: self,
            permit,
            settled: false,
        };
        let verdict = self.await_verdict(&request).await;
        in_flight.settled = true;

        let resolution = self.settle(player, verdict);
        drop(in_flight);
        DropOutcome::Submitted(resolution)
    }

    /// Redraw from the rules engine once a drag animation has finished.
    pub fn on_snap_end(&self) {
        self.render();
    }

    /// Start over from the initial position.
    ///
    /// Refused while a submission is in flight.
    pub fn new_game(&self) -> bool {
        {
            let mut rules = self.rules.lock();
            if self.gate.is_pending() {
                warn!("[ORCHESTRATOR] New game refused: awaiting reply");
                return false;
            }
            rules.reset();
            *self.concluded.lock() = None;
        }
        info!("[ORCHESTRATOR] New game");
        self.start();
        true
    }

    /// Why the player may not move right now, if they may not.
    fn drop_refusal(&self) -> Option<&'static str> {
        if self.concluded.lock().is_some() {
            return Some("game concluded");
        }
        let rules = self.rules.lock();
        if rules.is_game_over() {
            Some("game over")
        } else if rules.turn() != HUMAN_SIDE {
            Some("not the player's turn")
        } else {
            None
        }
    }

    async fn await_verdict(&self, request: &MoveRequest) -> Result<MoveReply, NetworkError> {
        let mode = self.engine_mode();
        match tokio::time::timeout(self.request_timeout, self.service.submit(mode, request)).await
        {
            Ok(verdict) => verdict,
            Err(_) => Err(NetworkError::Timeout {
                seconds: self.request_timeout.as_secs(),
            }),
        }
    }

    fn settle(
        &self,
        player: AppliedMove,
        verdict: Result<MoveReply, NetworkError>,
    ) -> Resolution {
        let reply = match verdict {
            Ok(reply) => reply,
            Err(e) => {
                warn!("[ORCHESTRATOR] Request for {} failed: {}", player.uci, e);
                self.roll_back();
                self.board.alert(&format!("Request failed: {e}"));
                return Resolution::TransportFailed {
                    player,
                    detail: e.to_string(),
                };
            }
        };

        if let Some(reason) = reply.rejection() {
            return self.reject(player, reason.to_string());
        }

        if reply.game_over {
            return self.conclude(player, &reply);
        }

        let Some(notation) = reply.ai_move.as_deref() else {
            return self.reject(player, "no reply move from the engine".to_string());
        };
        let applied = self.rules.lock().apply_notation(notation);
        match applied {
            Ok(reply_move) => {
                info!("[ORCHESTRATOR] Engine replied {}", reply_move.san);
                self.check_sync(&reply);
                self.render();
                self.publish_status(None);
                Resolution::Accepted {
                    player,
                    reply: reply_move,
                }
            }
            Err(e) => {
                warn!("[ORCHESTRATOR] Engine reply {:?} unplayable: {}", notation, e);
                self.reject(player, e.to_string())
            }
        }
    }

    fn reject(&self, player: AppliedMove, reason: String) -> Resolution {
        warn!("[ORCHESTRATOR] Move {} rejected: {}", player.uci, reason);
        self.roll_back();
        self.board.alert(&format!("Error: {reason}"));
        Resolution::Rejected { player, reason }
    }

    fn conclude(&self, player: AppliedMove, reply: &MoveReply) -> Resolution {
        let result = reply.result_text().to_string();
        self.publish_status(Some(&result));

        let mut final_reply = None;
        if let Some(notation) = reply.ai_move.as_deref() {
            let applied = self.rules.lock().apply_notation(notation);
            match applied {
                Ok(reply_move) => {
                    info!("[ORCHESTRATOR] Engine's final move {}", reply_move.san);
                    self.render();
                    self.publish_status(Some(&result));
                    final_reply = Some(reply_move);
                }
                Err(e) => warn!(
                    "[ORCHESTRATOR] Final engine move {:?} unplayable: {}",
                    notation, e
                ),
            }
        }
        self.check_sync(reply);

        info!("[ORCHESTRATOR] Game over: {}", result);
        *self.concluded.lock() = Some(result.clone());
        self.board.alert(&format!("Game Over! Result: {result}"));
        Resolution::GameOver {
            player,
            reply: final_reply,
            result,
        }
    }

    /// Take back the optimistic move and show the restored position.
    fn roll_back(&self) {
        let undone = self.rules.lock().undo_last();
        match undone {
            Ok(mv) => debug!("[ORCHESTRATOR] Rolled back {}", mv.uci),
            Err(e) => warn!("[ORCHESTRATOR] Rollback failed: {}", e),
        }
        self.render();
        self.publish_status(None);
    }

    /// Warn when the service's view of the position differs from ours.
    fn check_sync(&self, reply: &MoveReply) {
        let Some(expected) = reply.next_fen.as_deref() else {
            return;
        };
        let local = self.position_notation();
        if local != expected {
            warn!(
                "[ORCHESTRATOR] Position out of sync with service: local {:?}, service {:?}",
                local, expected
            );
        }
    }

    fn render(&self) {
        let fen = self.position_notation();
        self.board.render(&fen);
    }

    fn publish_status(&self, terminal_result: Option<&str>) {
        let status = {
            let rules = self.rules.lock();
            derive_status(&*rules, HUMAN_SIDE, terminal_result)
        };
        self.board.show_status(&status);
    }
}

/// Outstanding submission
///
/// If the `on_drop` future is dropped before the verdict arrives, the
/// optimistic move is taken back before the permit is released.
struct InFlight<'a, R, B, S>
where
    R: Rules,
    B: BoardSurface + ?Sized,
    S: ArbitrationService + ?Sized,
{
    orchestrator: &'a MoveOrchestrator<R, B, S>,
    permit: SubmissionPermit,
    settled: bool,
}

impl<R, B, S> Drop for InFlight<'_, R, B, S>
where
    R: Rules,
    B: BoardSurface + ?Sized,
    S: ArbitrationService + ?Sized,
{
    fn drop(&mut self) {
        if !self.settled {
            match self.permit.submitted() {
                Some(mv) => warn!(
                    "[ORCHESTRATOR] Submission of {} abandoned before a verdict, rolling back",
                    mv
                ),
                None => warn!("[ORCHESTRATOR] Submission abandoned before a verdict, rolling back"),
            }
            self.orchestrator.roll_back();
        }
    }
}
