//! Facelet-level move application for a 3x3 cube.

use thiserror::Error;

use crate::domain::{Color, CubeState, Face, FaceColorGrid, MoveToken};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CubeError {
    #[error("cube state is missing faces: {}", format_faces(.missing))]
    Incomplete { missing: Vec<Face> },
}

fn format_faces(faces: &[Face]) -> String {
    faces
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Neighbouring faces touched by a turn of the keyed face, with the sticker
/// indices of each neighbour that move along.
struct Ring {
    faces: [Face; 4],
    indices: [[usize; 3]; 4],
}

const TOP_ROW: [usize; 3] = [0, 1, 2];
const BOTTOM_ROW: [usize; 3] = [6, 7, 8];
const LEFT_COL: [usize; 3] = [0, 3, 6];
const RIGHT_COL_UP: [usize; 3] = [8, 5, 2];
const TOP_ROW_REV: [usize; 3] = [2, 1, 0];

fn ring(face: Face) -> Ring {
    match face {
        Face::U => Ring {
            faces: [Face::B, Face::R, Face::F, Face::L],
            indices: [TOP_ROW; 4],
        },
        Face::D => Ring {
            faces: [Face::F, Face::R, Face::B, Face::L],
            indices: [BOTTOM_ROW; 4],
        },
        Face::F => Ring {
            faces: [Face::U, Face::R, Face::D, Face::L],
            indices: [BOTTOM_ROW, LEFT_COL, TOP_ROW_REV, RIGHT_COL_UP],
        },
        Face::B => Ring {
            faces: [Face::U, Face::L, Face::D, Face::R],
            indices: [TOP_ROW_REV, LEFT_COL, BOTTOM_ROW, RIGHT_COL_UP],
        },
        Face::L => Ring {
            faces: [Face::U, Face::F, Face::D, Face::B],
            indices: [LEFT_COL, LEFT_COL, LEFT_COL, RIGHT_COL_UP],
        },
        Face::R => Ring {
            faces: [Face::U, Face::B, Face::D, Face::F],
            indices: [RIGHT_COL_UP, LEFT_COL, RIGHT_COL_UP, RIGHT_COL_UP],
        },
    }
}

fn rotate_clockwise(stickers: &mut [Color; 9]) {
    let s = *stickers;
    *stickers = [s[6], s[3], s[0], s[7], s[4], s[1], s[8], s[5], s[2]];
}

/// Returns the state reached by applying `mv` to `state`. The input is left untouched.
pub fn apply_move(state: &CubeState, mv: MoveToken) -> Result<CubeState, CubeError> {
    let missing = state.missing_faces();
    if !missing.is_empty() {
        return Err(CubeError::Incomplete { missing });
    }

    let mut grids: [[Color; 9]; 6] = [[Color::W; 9]; 6];
    for (face, grid) in state.iter() {
        grids[face.index()] = *grid.stickers();
    }

    let turns = mv.modifier.quarter_turns();
    let ring = ring(mv.face);
    for _ in 0..turns {
        rotate_clockwise(&mut grids[mv.face.index()]);

        let last = ring.faces[3].index();
        let saved = ring.indices[3].map(|i| grids[last][i]);
        for i in (1..4).rev() {
            let (to, from) = (ring.faces[i].index(), ring.faces[i - 1].index());
            for j in 0..3 {
                grids[to][ring.indices[i][j]] = grids[from][ring.indices[i - 1][j]];
            }
        }
        let first = ring.faces[0].index();
        for (j, color) in saved.into_iter().enumerate() {
            grids[first][ring.indices[0][j]] = color;
        }
    }

    let mut next = CubeState::new();
    for face in Face::ALL {
        next.insert(face, FaceColorGrid::new(grids[face.index()]));
    }
    Ok(next)
}

/// Applies every move in order.
pub fn apply_sequence(state: &CubeState, moves: &[MoveToken]) -> Result<CubeState, CubeError> {
    moves
        .iter()
        .try_fold(state.clone(), |current, mv| apply_move(&current, *mv))
}

#[cfg(test)]
#[path = "tests/cube_tests.rs"]
mod tests;
