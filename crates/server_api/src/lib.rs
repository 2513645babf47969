use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::{
    cube,
    domain::{Color, CubeState, Face, FaceColorGrid, MoveToken},
    error::{ApiError, ErrorCode},
    presses::{self, expand_moves},
    protocol::{
        ApplyMoveRequest, ApplyMoveResponse, ClassifyColorsRequest, ClassifyColorsResponse,
        SolveRequest, SolveResponse,
    },
};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("no cube solver is configured")]
    Unavailable,
    #[error("solver rejected the cube: {0}")]
    Rejected(String),
    #[error("solver request failed: {0}")]
    Transport(#[source] anyhow::Error),
}

/// The search itself lives behind this seam; it maps a 54-letter facelet
/// string to a whitespace separated move string.
#[async_trait]
pub trait Solver: Send + Sync {
    async fn solve(&self, cube_string: &str) -> Result<String, SolverError>;
}

pub struct MissingSolver;

#[async_trait]
impl Solver for MissingSolver {
    async fn solve(&self, _cube_string: &str) -> Result<String, SolverError> {
        Err(SolverError::Unavailable)
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("no color classifier is configured")]
    Unavailable,
    #[error("classifier rejected the image: {0}")]
    Rejected(String),
    #[error("classifier request failed: {0}")]
    Transport(#[source] anyhow::Error),
}

/// Turns one photographed face into its nine sticker colors.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        request: &ClassifyColorsRequest,
    ) -> Result<FaceColorGrid, ClassifierError>;
}

pub struct MissingClassifier;

#[async_trait]
impl Classifier for MissingClassifier {
    async fn classify(
        &self,
        _request: &ClassifyColorsRequest,
    ) -> Result<FaceColorGrid, ClassifierError> {
        Err(ClassifierError::Unavailable)
    }
}

#[derive(Clone)]
pub struct ApiContext {
    pub solver: Arc<dyn Solver>,
    pub classifier: Arc<dyn Classifier>,
}

impl ApiContext {
    pub fn new(solver: Arc<dyn Solver>) -> Self {
        Self {
            solver,
            classifier: Arc::new(MissingClassifier),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = classifier;
        self
    }
}

/// Encodes the cube as the solver's facelet string: every sticker becomes the
/// letter of the face whose center shares its color.
pub fn cube_string(faces: &CubeState) -> Result<String, ApiError> {
    if !faces.is_complete() {
        return Err(ApiError::validation("All 6 faces must be scanned"));
    }

    let mut color_to_face: HashMap<Color, Face> = HashMap::with_capacity(6);
    for face in Face::ALL {
        let center = faces.get(face).map(|grid| grid.center()).ok_or_else(|| {
            ApiError::validation(format!("face {face} is missing"))
        })?;
        if let Some(previous) = color_to_face.insert(center, face) {
            return Err(ApiError::validation(format!(
                "faces {previous} and {face} share center color {}",
                center.name()
            )));
        }
    }

    let mut encoded = String::with_capacity(54);
    for face in Face::ALL {
        let Some(grid) = faces.get(face) else {
            return Err(ApiError::validation(format!("face {face} is missing")));
        };
        for sticker in grid.stickers() {
            let owner = color_to_face.get(sticker).ok_or_else(|| {
                ApiError::validation(format!(
                    "sticker color {} on face {face} matches no center",
                    sticker.name()
                ))
            })?;
            encoded.push(owner.letter());
        }
    }
    Ok(encoded)
}

pub async fn solve(ctx: &ApiContext, request: SolveRequest) -> Result<SolveResponse, ApiError> {
    let cube_string = cube_string(&request.cube_faces)?;
    let solution = ctx.solver.solve(&cube_string).await.map_err(|err| {
        warn!(%err, "solver call failed");
        solver_error(err)
    })?;
    let solution = solution.trim().to_string();
    let moves = MoveToken::parse_sequence(&solution).map_err(|err| {
        ApiError::new(
            ErrorCode::Upstream,
            format!("solver returned an unreadable move: {err}"),
        )
    })?;
    let expanded_moves = expand_moves(&moves);
    presses::check_correspondence(&moves, &expanded_moves)
        .map_err(|err| ApiError::new(ErrorCode::Internal, err.to_string()))?;

    info!(
        moves = moves.len(),
        actions = expanded_moves.len(),
        "cube solved"
    );
    Ok(SolveResponse {
        solution,
        moves,
        expanded_moves,
        cube_string: Some(cube_string),
    })
}

/// Checks that the image decodes before handing it to the classifier. A
/// `data:` URL prefix is accepted.
pub async fn classify_colors(
    ctx: &ApiContext,
    request: ClassifyColorsRequest,
) -> Result<ClassifyColorsResponse, ApiError> {
    let payload = request
        .image
        .split_once(',')
        .map_or(request.image.as_str(), |(_, data)| data)
        .trim();
    if payload.is_empty() {
        return Err(ApiError::validation("No image provided"));
    }
    STANDARD
        .decode(payload)
        .map_err(|_| ApiError::validation("Failed to decode image"))?;

    let colors = ctx.classifier.classify(&request).await.map_err(|err| {
        warn!(%err, "classifier call failed");
        classifier_error(err)
    })?;
    info!(%colors, "face classified");
    Ok(ClassifyColorsResponse { colors })
}

pub fn apply_move(request: ApplyMoveRequest) -> Result<ApplyMoveResponse, ApiError> {
    let state = cube::apply_move(&request.state, request.mv)
        .map_err(|err| ApiError::validation(err.to_string()))?;
    Ok(ApplyMoveResponse { state })
}

fn solver_error(err: SolverError) -> ApiError {
    match err {
        SolverError::Unavailable => ApiError::new(ErrorCode::Unavailable, err.to_string()),
        SolverError::Rejected(_) => ApiError::validation(err.to_string()),
        SolverError::Transport(_) => ApiError::new(ErrorCode::Upstream, err.to_string()),
    }
}

fn classifier_error(err: ClassifierError) -> ApiError {
    match err {
        ClassifierError::Unavailable => ApiError::new(ErrorCode::Unavailable, err.to_string()),
        ClassifierError::Rejected(_) => ApiError::validation(err.to_string()),
        ClassifierError::Transport(_) => ApiError::new(ErrorCode::Upstream, err.to_string()),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
