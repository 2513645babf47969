use shared::{
    cube::CubeError,
    domain::{Face, MoveToken},
    presses::CorrespondenceError,
};
use thiserror::Error;

/// Which side of the fence an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or incomplete cube data handed in by the caller.
    Input,
    /// A collaborator answered with an error or could not be reached.
    Collaborator,
    /// The controller was driven out of protocol or fed inconsistent data.
    ProtocolViolation,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid service url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {route} failed: {source}")]
    Transport {
        route: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{route} answered {status}: {message}")]
    Rejected {
        route: String,
        status: u16,
        message: String,
    },
    #[error("{route} returned an unusable response: {reason}")]
    InvalidResponse { route: String, reason: String },
    #[error(transparent)]
    Cube(#[from] CubeError),
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no solution is loaded")]
    NotLoaded,
    #[error("malformed solution: {0}")]
    MalformedSolution(#[from] CorrespondenceError),
    #[error("seed state is missing faces: {}", format_faces(.missing))]
    IncompleteSeed { missing: Vec<Face> },
    #[error("press at position {position} has no logical move left to serve")]
    PressOverrun { position: usize },
    #[error("move {mv} could not be applied: {source}")]
    Collaborator {
        mv: MoveToken,
        #[source]
        source: ServiceError,
    },
}

impl PlaybackError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IncompleteSeed { .. } => ErrorKind::Input,
            Self::Collaborator { .. } => ErrorKind::Collaborator,
            Self::NotLoaded | Self::MalformedSolution(_) | Self::PressOverrun { .. } => {
                ErrorKind::ProtocolViolation
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cube is incomplete, still missing faces: {}", format_faces(.missing))]
    IncompleteCube { missing: Vec<Face> },
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IncompleteCube { .. } => ErrorKind::Input,
            Self::Service(_) => ErrorKind::Collaborator,
            Self::Playback(err) => err.kind(),
        }
    }
}

fn format_faces(faces: &[Face]) -> String {
    faces
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
