use super::*;
use crate::domain::Modifier;
use proptest::prelude::*;

fn scrambled() -> CubeState {
    let moves = MoveToken::parse_sequence("R U F' L2 D B' U2 R'").expect("moves");
    apply_sequence(&CubeState::solved(), &moves).expect("scramble")
}

#[test]
fn u_turn_brings_right_top_row_to_front() {
    let next = apply_move(&CubeState::solved(), "U".parse().expect("move")).expect("apply");
    let front = next.get(Face::F).expect("front");
    assert_eq!(&front.stickers()[0..3], &[Color::R; 3]);
    assert_eq!(&front.stickers()[3..9], &[Color::G; 6]);
    assert!(!next.is_solved());
}

#[test]
fn f_turn_brings_up_bottom_row_to_right_left_column() {
    let next = apply_move(&CubeState::solved(), "F".parse().expect("move")).expect("apply");
    let right = next.get(Face::R).expect("right");
    for index in [0, 3, 6] {
        assert_eq!(right.stickers()[index], Color::W);
    }
    for index in [1, 2, 4, 5, 7, 8] {
        assert_eq!(right.stickers()[index], Color::R);
    }
}

#[test]
fn four_quarter_turns_are_identity() {
    let start = scrambled();
    for face in Face::ALL {
        let mv = MoveToken::clockwise(face);
        let after = apply_sequence(&start, &[mv, mv, mv, mv]).expect("apply");
        assert_eq!(after, start, "face {face}");
    }
}

#[test]
fn half_turn_equals_two_quarter_turns() {
    let start = scrambled();
    for face in Face::ALL {
        let half = apply_move(&start, MoveToken::new(face, Modifier::Half)).expect("half");
        let quarter = MoveToken::clockwise(face);
        let twice = apply_sequence(&start, &[quarter, quarter]).expect("twice");
        assert_eq!(half, twice, "face {face}");
    }
}

#[test]
fn centers_never_move() {
    let start = scrambled();
    for face in Face::ALL {
        assert_eq!(
            start.get(face).expect("face").center(),
            CubeState::solved().get(face).expect("face").center()
        );
    }
}

#[test]
fn incomplete_state_is_rejected() {
    let mut state = CubeState::solved();
    state.remove(Face::B);
    let err = apply_move(&state, "R".parse().expect("move")).expect_err("incomplete");
    assert_eq!(
        err,
        CubeError::Incomplete {
            missing: vec![Face::B]
        }
    );
    assert_eq!(err.to_string(), "cube state is missing faces: B");
}

fn arbitrary_move() -> impl Strategy<Value = MoveToken> {
    (0..6usize, 0..3u8).prop_map(|(face, modifier)| {
        let modifier = match modifier {
            0 => Modifier::Clockwise,
            1 => Modifier::CounterClockwise,
            _ => Modifier::Half,
        };
        MoveToken::new(Face::ALL[face], modifier)
    })
}

proptest! {
    #[test]
    fn sequence_then_reversed_inverses_restores_state(
        moves in prop::collection::vec(arbitrary_move(), 0..24)
    ) {
        let start = CubeState::solved();
        let scrambled = apply_sequence(&start, &moves).expect("scramble");
        let undo: Vec<MoveToken> = moves.iter().rev().map(|mv| mv.inverse()).collect();
        let restored = apply_sequence(&scrambled, &undo).expect("undo");
        prop_assert_eq!(restored, start);
    }

    #[test]
    fn moves_preserve_sticker_counts(moves in prop::collection::vec(arbitrary_move(), 1..16)) {
        let state = apply_sequence(&CubeState::solved(), &moves).expect("apply");
        for color in Color::ALL {
            let count = state
                .iter()
                .flat_map(|(_, grid)| grid.stickers().iter())
                .filter(|sticker| **sticker == color)
                .count();
            prop_assert_eq!(count, 9);
        }
    }
}
