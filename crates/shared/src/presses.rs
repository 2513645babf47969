//! How many physical presses a logical move costs on a device that can only
//! address the back face through the rotate-and-repress emulation.

use thiserror::Error;

use crate::domain::{Face, Modifier, MoveToken, PhysicalAction, Solution};

pub const BACK_FACE_PRESSES: u32 = 3;
pub const HALF_TURN_PRESSES: u32 = 2;
pub const QUARTER_TURN_PRESSES: u32 = 1;

/// Back-face moves always cost three presses, half turns included; `B2` is 3, not 2.
pub fn required_presses(token: &MoveToken) -> u32 {
    if token.face == Face::B {
        BACK_FACE_PRESSES
    } else if token.is_half_turn() {
        HALF_TURN_PRESSES
    } else {
        QUARTER_TURN_PRESSES
    }
}

/// Zero for an absent token, used before any solution exists.
pub fn required_presses_or_zero(token: Option<&MoveToken>) -> u32 {
    token.map(required_presses).unwrap_or(0)
}

pub fn total_required_presses(moves: &[MoveToken]) -> u64 {
    moves.iter().map(|mv| u64::from(required_presses(mv))).sum()
}

pub fn count_presses(actions: &[PhysicalAction]) -> u64 {
    actions.iter().filter(|action| !action.is_turn_back()).count() as u64
}

/// Physical action list for a logical solution. Back moves are performed by
/// turning the cube around and pressing the front control three times; other
/// half turns are two clockwise presses.
pub fn expand_moves(moves: &[MoveToken]) -> Vec<PhysicalAction> {
    let mut expanded = Vec::with_capacity(moves.len() * 2);
    for mv in moves {
        match (mv.face, mv.modifier) {
            (Face::B, modifier) => {
                expanded.push(PhysicalAction::TurnBack);
                let front = MoveToken::new(Face::F, modifier);
                expanded.extend((0..BACK_FACE_PRESSES).map(|_| PhysicalAction::Press(front)));
            }
            (face, Modifier::Half) => {
                let quarter = PhysicalAction::Press(MoveToken::clockwise(face));
                expanded.extend([quarter, quarter]);
            }
            _ => expanded.push(PhysicalAction::Press(*mv)),
        }
    }
    expanded
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CorrespondenceError {
    #[error(
        "expanded moves run out at logical move {move_index} ({mv}): \
         {expected} presses required, {found} present"
    )]
    MissingPresses {
        move_index: usize,
        mv: MoveToken,
        expected: u64,
        found: u64,
    },
    #[error("press {found} at position {position} cannot belong to logical move {expected}")]
    ForeignPress {
        position: usize,
        expected: MoveToken,
        found: MoveToken,
    },
    #[error("expanded moves carry {found} presses but the logical moves require {expected}")]
    SurplusPresses { expected: u64, found: u64 },
}

/// A press may serve a logical move if it addresses the same face, or the
/// front face when standing in for a back move.
fn press_serves(logical: &MoveToken, press: &MoveToken) -> bool {
    press.face == logical.face || (logical.face == Face::B && press.face == Face::F)
}

/// Checks that walking the presses of `expanded_moves` in order yields exactly
/// `required_presses(m)` presses for each logical move `m`, and nothing more.
pub fn check_correspondence(
    moves: &[MoveToken],
    expanded_moves: &[PhysicalAction],
) -> Result<(), CorrespondenceError> {
    let expected = total_required_presses(moves);
    let found = count_presses(expanded_moves);
    let mut presses = expanded_moves
        .iter()
        .enumerate()
        .filter_map(|(position, action)| action.press().map(|press| (position, press)));

    for (move_index, mv) in moves.iter().enumerate() {
        for _ in 0..required_presses(mv) {
            let Some((position, press)) = presses.next() else {
                return Err(CorrespondenceError::MissingPresses {
                    move_index,
                    mv: *mv,
                    expected,
                    found,
                });
            };
            if !press_serves(mv, &press) {
                return Err(CorrespondenceError::ForeignPress {
                    position,
                    expected: *mv,
                    found: press,
                });
            }
        }
    }

    if presses.next().is_some() {
        return Err(CorrespondenceError::SurplusPresses { expected, found });
    }
    Ok(())
}

impl Solution {
    pub fn check_correspondence(&self) -> Result<(), CorrespondenceError> {
        check_correspondence(&self.moves, &self.expanded_moves)
    }
}
