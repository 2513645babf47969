pub mod error;
pub mod playback;
pub mod registry;
pub mod services;
pub mod session;

pub use error::{ErrorKind, PlaybackError, ServiceError, SessionError};
pub use playback::{
    AdvanceOutcome, Lifecycle, NextAction, PlaybackController, PlaybackView, Progress,
};
pub use registry::{FaceRegistry, FaceSlot};
pub use services::{
    ColorClassifier, CubeSolver, HttpCubeServices, LocalMoveApplier, MoveApplier, ServiceConfig,
};
pub use session::SolveSession;
pub use shared::presses;
