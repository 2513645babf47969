use super::*;
use shared::{
    cube::apply_sequence,
    domain::{FaceColorGrid, PhysicalAction},
    protocol::ClassifyColorsRequest,
};
use std::sync::Mutex;

struct FixedSolver {
    answer: Result<String, String>,
    seen: Mutex<Vec<String>>,
}

impl FixedSolver {
    fn answering(solution: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(solution.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn rejecting(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Err(reason.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Solver for FixedSolver {
    async fn solve(&self, cube_string: &str) -> Result<String, SolverError> {
        self.seen
            .lock()
            .expect("lock")
            .push(cube_string.to_string());
        self.answer.clone().map_err(SolverError::Rejected)
    }
}

fn actions(raw: &[&str]) -> Vec<PhysicalAction> {
    raw.iter().map(|a| a.parse().expect("action")).collect()
}

#[test]
fn solved_cube_encodes_face_letters_in_order() {
    let encoded = cube_string(&CubeState::solved()).expect("encode");
    assert_eq!(
        encoded,
        "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB"
    );
}

#[test]
fn scrambled_cube_encodes_by_center_color() {
    let scrambled = apply_sequence(&CubeState::solved(), &[MoveToken::clockwise(Face::U)])
        .expect("scramble");
    let encoded = cube_string(&scrambled).expect("encode");
    // After U the front top row shows the right face's color.
    assert_eq!(&encoded[18..21], "RRR");
    assert_eq!(encoded.len(), 54);
}

#[test]
fn duplicate_centers_are_rejected() {
    let mut faces = CubeState::solved();
    faces.insert(Face::B, FaceColorGrid::uniform(Color::G));
    let err = cube_string(&faces).expect_err("duplicate centers");
    assert_eq!(err.code, ErrorCode::Validation);
    assert!(err.message.contains("share center color Green"));
}

#[test]
fn incomplete_cube_is_rejected() {
    let mut faces = CubeState::solved();
    faces.remove(Face::L);
    let err = cube_string(&faces).expect_err("incomplete");
    assert_eq!(err.code, ErrorCode::Validation);
    assert_eq!(err.message, "All 6 faces must be scanned");
}

#[tokio::test]
async fn solve_returns_expanded_solution() {
    let solver = FixedSolver::answering("R B' U2 ");
    let ctx = ApiContext::new(solver.clone());
    let response = solve(
        &ctx,
        SolveRequest {
            cube_faces: CubeState::solved(),
        },
    )
    .await
    .expect("solve");

    assert_eq!(response.solution, "R B' U2");
    assert_eq!(response.moves.len(), 3);
    assert_eq!(
        response.expanded_moves,
        actions(&["R", "TURN_BACK", "F'", "F'", "F'", "U", "U"])
    );
    assert_eq!(
        response.cube_string.as_deref(),
        Some("UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB")
    );
    assert_eq!(solver.seen.lock().expect("lock").len(), 1);
}

#[tokio::test]
async fn empty_solution_means_already_solved() {
    let ctx = ApiContext::new(FixedSolver::answering(""));
    let response = solve(
        &ctx,
        SolveRequest {
            cube_faces: CubeState::solved(),
        },
    )
    .await
    .expect("solve");
    assert!(response.moves.is_empty());
    assert!(response.expanded_moves.is_empty());
}

#[tokio::test]
async fn solver_failures_map_to_error_codes() {
    let request = || SolveRequest {
        cube_faces: CubeState::solved(),
    };

    let err = solve(&ApiContext::new(Arc::new(MissingSolver)), request())
        .await
        .expect_err("unavailable");
    assert_eq!(err.code, ErrorCode::Unavailable);

    let err = solve(&ApiContext::new(FixedSolver::rejecting("bad cube")), request())
        .await
        .expect_err("rejected");
    assert_eq!(err.code, ErrorCode::Validation);

    let err = solve(&ApiContext::new(FixedSolver::answering("R Q")), request())
        .await
        .expect_err("unreadable");
    assert_eq!(err.code, ErrorCode::Upstream);
}

#[test]
fn apply_move_reports_incomplete_state() {
    let mut state = CubeState::solved();
    state.remove(Face::D);
    let err = apply_move(ApplyMoveRequest {
        state,
        mv: MoveToken::clockwise(Face::R),
    })
    .expect_err("incomplete");
    assert_eq!(err.code, ErrorCode::Validation);
}

struct FixedClassifier(FaceColorGrid);

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(
        &self,
        _request: &ClassifyColorsRequest,
    ) -> Result<FaceColorGrid, ClassifierError> {
        Ok(self.0)
    }
}

fn image(raw: &str) -> ClassifyColorsRequest {
    ClassifyColorsRequest {
        image: raw.to_string(),
        debug: false,
    }
}

#[tokio::test]
async fn classify_forwards_a_decodable_data_url() {
    let grid: FaceColorGrid = "WWRWGWWWW".parse().expect("grid");
    let ctx = ApiContext::new(Arc::new(MissingSolver))
        .with_classifier(Arc::new(FixedClassifier(grid)));
    let response = classify_colors(&ctx, image("data:image/jpeg;base64,aW1hZ2U="))
        .await
        .expect("classify");
    assert_eq!(response.colors, grid);
}

#[tokio::test]
async fn classify_rejects_undecodable_images_before_forwarding() {
    let ctx = ApiContext::new(Arc::new(MissingSolver));

    let err = classify_colors(&ctx, image("data:image/jpeg;base64,"))
        .await
        .expect_err("empty");
    assert_eq!(err.code, ErrorCode::Validation);
    assert_eq!(err.message, "No image provided");

    let err = classify_colors(&ctx, image("not base64 at all!"))
        .await
        .expect_err("garbage");
    assert_eq!(err.message, "Failed to decode image");
}

#[tokio::test]
async fn classify_without_classifier_is_unavailable() {
    let ctx = ApiContext::new(Arc::new(MissingSolver));
    let err = classify_colors(&ctx, image("aW1hZ2U="))
        .await
        .expect_err("unavailable");
    assert_eq!(err.code, ErrorCode::Unavailable);
}
