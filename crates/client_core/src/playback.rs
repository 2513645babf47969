//! Playback of a solution one physical action at a time.
//!
//! The controller walks `expanded_moves` with one index while a second index
//! tracks the logical move those presses belong to. Once the last press of a
//! logical move lands, the move is applied to the mirrored cube state through
//! a [`MoveApplier`]; if that call fails the whole step is rolled back so the
//! same `advance` can simply be retried.

use shared::{
    domain::{CubeState, MoveToken, PhysicalAction, Solution},
    presses::{check_correspondence, required_presses_or_zero},
};
use tracing::{debug, info, warn};

use crate::{error::PlaybackError, services::MoveApplier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Playing,
    Completed,
}

/// What the user should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    Press(MoveToken),
    TurnBack,
    Solved,
}

impl From<PhysicalAction> for NextAction {
    fn from(value: PhysicalAction) -> Self {
        match value {
            PhysicalAction::Press(token) => Self::Press(token),
            PhysicalAction::TurnBack => Self::TurnBack,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Advanced {
        performed: PhysicalAction,
        /// Set when this press finished a logical move.
        completed_move: Option<MoveToken>,
        next: NextAction,
    },
    /// Idle or already completed.
    NothingToDo,
}

/// The coupled playback counters. Only ever replaced wholesale, so a failed
/// step leaves the previous value intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    current_move_index: usize,
    logical_move_index: usize,
    presses_remaining: u32,
}

impl Progress {
    fn start(solution: &Solution) -> Self {
        Self {
            current_move_index: 0,
            logical_move_index: 0,
            presses_remaining: required_presses_or_zero(solution.moves.first()),
        }
    }

    pub fn current_move_index(&self) -> usize {
        self.current_move_index
    }

    pub fn logical_move_index(&self) -> usize {
        self.logical_move_index
    }

    pub fn presses_remaining(&self) -> u32 {
        self.presses_remaining
    }
}

/// Everything the presentation layer needs after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackView {
    pub lifecycle: Lifecycle,
    pub next_action: Option<NextAction>,
    pub mirrored_state: Option<CubeState>,
    pub can_advance: bool,
    pub progress: Option<Progress>,
    pub solution_text: Option<String>,
    pub total_actions: usize,
    pub total_moves: usize,
}

#[derive(Debug, Clone)]
struct LoadedSolution {
    solution: Solution,
    progress: Progress,
    mirrored_state: CubeState,
}

impl LoadedSolution {
    fn is_completed(&self) -> bool {
        self.progress.current_move_index >= self.solution.expanded_moves.len()
    }

    fn next_action(&self) -> NextAction {
        self.solution
            .expanded_moves
            .get(self.progress.current_move_index)
            .copied()
            .map(NextAction::from)
            .unwrap_or(NextAction::Solved)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlaybackController {
    loaded: Option<LoadedSolution>,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any current playback. A solution whose presses do not line up
    /// with its logical moves is refused and the controller is left as it was.
    pub fn load(&mut self, solution: Solution, seed: &CubeState) -> Result<(), PlaybackError> {
        check_correspondence(&solution.moves, &solution.expanded_moves)?;
        if !solution.moves.is_empty() {
            let missing = seed.missing_faces();
            if !missing.is_empty() {
                return Err(PlaybackError::IncompleteSeed { missing });
            }
        }

        info!(
            moves = solution.moves.len(),
            actions = solution.expanded_moves.len(),
            "solution loaded"
        );
        self.loaded = Some(LoadedSolution {
            progress: Progress::start(&solution),
            mirrored_state: seed.clone(),
            solution,
        });
        Ok(())
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match &self.loaded {
            None => Lifecycle::Idle,
            Some(loaded) if loaded.is_completed() => Lifecycle::Completed,
            Some(_) => Lifecycle::Playing,
        }
    }

    pub fn can_advance(&self) -> bool {
        self.lifecycle() == Lifecycle::Playing
    }

    pub fn peek_current_action(&self) -> Result<NextAction, PlaybackError> {
        self.loaded
            .as_ref()
            .map(LoadedSolution::next_action)
            .ok_or(PlaybackError::NotLoaded)
    }

    pub fn progress(&self) -> Option<Progress> {
        self.loaded.as_ref().map(|loaded| loaded.progress)
    }

    pub fn mirrored_state(&self) -> Option<&CubeState> {
        self.loaded.as_ref().map(|loaded| &loaded.mirrored_state)
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.loaded.as_ref().map(|loaded| &loaded.solution)
    }

    /// Performs the current physical action. Exclusive access for the whole
    /// call keeps a second advance from starting while a move is in flight.
    pub async fn advance(
        &mut self,
        applier: &dyn MoveApplier,
    ) -> Result<AdvanceOutcome, PlaybackError> {
        let Some(loaded) = self.loaded.as_mut() else {
            return Ok(AdvanceOutcome::NothingToDo);
        };
        let position = loaded.progress.current_move_index;
        let Some(performed) = loaded.solution.expanded_moves.get(position).copied() else {
            return Ok(AdvanceOutcome::NothingToDo);
        };

        let mut next = loaded.progress;
        next.current_move_index += 1;
        let mut completed_move = None;

        if let PhysicalAction::Press(press) = performed {
            next.presses_remaining = next
                .presses_remaining
                .checked_sub(1)
                .ok_or(PlaybackError::PressOverrun { position })?;
            debug!(%press, position, remaining = next.presses_remaining, "press");

            if next.presses_remaining == 0 {
                if let Some(mv) = loaded.solution.moves.get(next.logical_move_index).copied() {
                    let state = applier
                        .apply_move(&loaded.mirrored_state, mv)
                        .await
                        .map_err(|source| {
                            warn!(%mv, position, %source, "apply-move failed; step rolled back");
                            PlaybackError::Collaborator { mv, source }
                        })?;
                    loaded.mirrored_state = state;
                    next.logical_move_index += 1;
                    next.presses_remaining = required_presses_or_zero(
                        loaded.solution.moves.get(next.logical_move_index),
                    );
                    completed_move = Some(mv);
                    info!(%mv, logical = next.logical_move_index, "logical move applied");
                }
            }
        } else {
            debug!(position, "turn back");
        }

        loaded.progress = next;
        let next = loaded.next_action();
        if next == NextAction::Solved {
            info!("playback completed");
        }
        Ok(AdvanceOutcome::Advanced {
            performed,
            completed_move,
            next,
        })
    }

    pub fn view(&self) -> PlaybackView {
        let loaded = self.loaded.as_ref();
        PlaybackView {
            lifecycle: self.lifecycle(),
            next_action: loaded.map(LoadedSolution::next_action),
            mirrored_state: loaded.map(|l| l.mirrored_state.clone()),
            can_advance: self.can_advance(),
            progress: loaded.map(|l| l.progress),
            solution_text: loaded.map(|l| l.solution.display.clone()),
            total_actions: loaded.map_or(0, |l| l.solution.expanded_moves.len()),
            total_moves: loaded.map_or(0, |l| l.solution.moves.len()),
        }
    }
}

#[cfg(test)]
#[path = "tests/playback_tests.rs"]
mod tests;
