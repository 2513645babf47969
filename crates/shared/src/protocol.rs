use serde::{Deserialize, Serialize};

use crate::{
    domain::{CubeState, FaceColorGrid, MoveToken, PhysicalAction, Solution},
    error::ApiError,
};

pub const CLASSIFY_COLORS_ROUTE: &str = "/api/classify-colors";
pub const SOLVE_ROUTE: &str = "/api/solve";
pub const APPLY_MOVE_ROUTE: &str = "/api/apply-move";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyColorsRequest {
    /// Image as a `data:` URL or bare base64.
    pub image: String,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyColorsResponse {
    pub colors: FaceColorGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    pub cube_faces: CubeState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResponse {
    pub solution: String,
    pub moves: Vec<MoveToken>,
    pub expanded_moves: Vec<PhysicalAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cube_string: Option<String>,
}

impl From<SolveResponse> for Solution {
    fn from(value: SolveResponse) -> Self {
        Solution::new(value.solution, value.moves, value.expanded_moves)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyMoveRequest {
    pub state: CubeState,
    #[serde(rename = "move")]
    pub mv: MoveToken,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyMoveResponse {
    pub state: CubeState,
}

/// Error bodies seen on the wire: our structured `ApiError`, or the bare
/// `{ "error": "..." }` shape some collaborators answer with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    Api(ApiError),
    Plain { error: String },
}

impl ErrorPayload {
    pub fn message(&self) -> &str {
        match self {
            Self::Api(err) => &err.message,
            Self::Plain { error } => error,
        }
    }
}

/// A collaborator reply that is either an error payload or the expected body.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Reply<T> {
    Err(ErrorPayload),
    Ok(T),
}
