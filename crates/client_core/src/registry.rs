use std::collections::BTreeMap;

use shared::domain::{CubeState, Face, FaceColorGrid};

/// Rendered in place of every sticker of a cleared face.
pub const PLACEHOLDER_STICKER: char = '?';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceSlot {
    Scanned(FaceColorGrid),
    /// Cleared by the user; does not count towards completeness.
    Placeholder,
}

impl FaceSlot {
    pub fn grid(&self) -> Option<&FaceColorGrid> {
        match self {
            Self::Scanned(grid) => Some(grid),
            Self::Placeholder => None,
        }
    }

    /// Nine sticker letters, or nine placeholders.
    pub fn render(&self) -> String {
        match self {
            Self::Scanned(grid) => grid.to_string(),
            Self::Placeholder => std::iter::repeat(PLACEHOLDER_STICKER).take(9).collect(),
        }
    }
}

/// Accumulates the per-face color grids captured before a solve.
#[derive(Debug, Clone, Default)]
pub struct FaceRegistry {
    faces: BTreeMap<Face, FaceSlot>,
}

impl FaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_face(&mut self, face: Face, grid: FaceColorGrid) {
        self.faces.insert(face, FaceSlot::Scanned(grid));
    }

    pub fn clear_face(&mut self, face: Face) {
        self.faces.insert(face, FaceSlot::Placeholder);
    }

    pub fn clear_all(&mut self) {
        self.faces.clear();
    }

    pub fn slot(&self, face: Face) -> Option<&FaceSlot> {
        self.faces.get(&face)
    }

    pub fn scanned_faces(&self) -> Vec<Face> {
        self.faces
            .iter()
            .filter(|(_, slot)| slot.grid().is_some())
            .map(|(face, _)| *face)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        Face::ALL
            .iter()
            .all(|face| matches!(self.faces.get(face), Some(FaceSlot::Scanned(_))))
    }

    pub fn missing_faces(&self) -> Vec<Face> {
        Face::ALL
            .into_iter()
            .filter(|face| !matches!(self.faces.get(face), Some(FaceSlot::Scanned(_))))
            .collect()
    }

    /// Owned copy of every scanned face; later edits to either side stay local.
    pub fn snapshot(&self) -> CubeState {
        let mut state = CubeState::new();
        for (face, slot) in &self.faces {
            if let FaceSlot::Scanned(grid) = slot {
                state.insert(*face, *grid);
            }
        }
        state
    }

    /// Overwrites every face present in `state`.
    pub fn record_state(&mut self, state: &CubeState) {
        for (face, grid) in state.iter() {
            self.record_face(face, *grid);
        }
    }
}
