use std::sync::Arc;

use shared::domain::{Face, FaceColorGrid, Solution};
use tracing::info;

use crate::{
    error::{PlaybackError, SessionError},
    playback::{AdvanceOutcome, PlaybackController, PlaybackView},
    registry::FaceRegistry,
    services::{ColorClassifier, CubeSolver, HttpCubeServices, MoveApplier},
};

/// One user's scan-solve-play session: the face registry, the live playback
/// and the collaborators both of them talk to.
pub struct SolveSession {
    registry: FaceRegistry,
    controller: PlaybackController,
    classifier: Arc<dyn ColorClassifier>,
    solver: Arc<dyn CubeSolver>,
    applier: Arc<dyn MoveApplier>,
}

impl SolveSession {
    pub fn new(
        classifier: Arc<dyn ColorClassifier>,
        solver: Arc<dyn CubeSolver>,
        applier: Arc<dyn MoveApplier>,
    ) -> Self {
        Self {
            registry: FaceRegistry::new(),
            controller: PlaybackController::new(),
            classifier,
            solver,
            applier,
        }
    }

    pub fn with_http(services: Arc<HttpCubeServices>) -> Self {
        Self::new(services.clone(), services.clone(), services)
    }

    /// Swaps the apply-move collaborator, e.g. for the in-process facelet model.
    pub fn with_applier(mut self, applier: Arc<dyn MoveApplier>) -> Self {
        self.applier = applier;
        self
    }

    pub fn registry(&self) -> &FaceRegistry {
        &self.registry
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub async fn scan_face(
        &mut self,
        face: Face,
        image: &[u8],
    ) -> Result<FaceColorGrid, SessionError> {
        let grid = self.classifier.classify_colors(image).await?;
        info!(%face, colors = %grid, "face scanned");
        self.registry.record_face(face, grid);
        Ok(grid)
    }

    pub fn record_face(&mut self, face: Face, grid: FaceColorGrid) {
        self.registry.record_face(face, grid);
    }

    pub fn clear_face(&mut self, face: Face) {
        self.registry.clear_face(face);
    }

    pub fn clear_all(&mut self) {
        self.registry.clear_all();
    }

    /// Requests a solution for the scanned cube and starts playing it. On any
    /// failure the previous playback, if any, stays untouched.
    pub async fn solve(&mut self) -> Result<&Solution, SessionError> {
        let missing = self.registry.missing_faces();
        if !missing.is_empty() {
            return Err(SessionError::IncompleteCube { missing });
        }

        let seed = self.registry.snapshot();
        let solution = self.solver.solve(&seed).await?;
        info!(solution = %solution.display, "solution received");
        self.controller.load(solution, &seed)?;
        self.controller
            .solution()
            .ok_or(SessionError::Playback(PlaybackError::NotLoaded))
    }

    /// Advances playback; when a logical move lands the registry picks up the
    /// mirrored state so face displays follow the cube.
    pub async fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        let outcome = self.controller.advance(self.applier.as_ref()).await?;
        if let AdvanceOutcome::Advanced {
            completed_move: Some(_),
            ..
        } = &outcome
        {
            if let Some(state) = self.controller.mirrored_state() {
                self.registry.record_state(state);
            }
        }
        Ok(outcome)
    }

    pub fn view(&self) -> PlaybackView {
        self.controller.view()
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
