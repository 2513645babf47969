use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sticker color as reported by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    W,
    Y,
    R,
    O,
    G,
    B,
}

impl Color {
    pub const ALL: [Color; 6] = [Color::W, Color::Y, Color::R, Color::O, Color::G, Color::B];

    pub fn letter(self) -> char {
        match self {
            Self::W => 'W',
            Self::Y => 'Y',
            Self::R => 'R',
            Self::O => 'O',
            Self::G => 'G',
            Self::B => 'B',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'W' => Some(Self::W),
            'Y' => Some(Self::Y),
            'R' => Some(Self::R),
            'O' => Some(Self::O),
            'G' => Some(Self::G),
            'B' => Some(Self::B),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::W => "White",
            Self::Y => "Yellow",
            Self::R => "Red",
            Self::O => "Orange",
            Self::G => "Green",
            Self::B => "Blue",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    U,
    R,
    F,
    D,
    L,
    B,
}

impl Face {
    /// Canonical scan and solver order.
    pub const ALL: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

    pub fn letter(self) -> char {
        match self {
            Self::U => 'U',
            Self::R => 'R',
            Self::F => 'F',
            Self::D => 'D',
            Self::L => 'L',
            Self::B => 'B',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'U' => Some(Self::U),
            'R' => Some(Self::R),
            'F' => Some(Self::F),
            'D' => Some(Self::D),
            'L' => Some(Self::L),
            'B' => Some(Self::B),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::U => 0,
            Self::R => 1,
            Self::F => 2,
            Self::D => 3,
            Self::L => 4,
            Self::B => 5,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseGridError {
    #[error("a face needs exactly 9 stickers, got {0}")]
    WrongLength(usize),
    #[error("unknown sticker color '{0}' (expected one of W Y R O G B)")]
    UnknownColor(char),
}

/// Nine stickers of one face in row-major scan order; index 4 is the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceColorGrid([Color; 9]);

impl FaceColorGrid {
    pub const CENTER: usize = 4;

    pub fn new(stickers: [Color; 9]) -> Self {
        Self(stickers)
    }

    pub fn uniform(color: Color) -> Self {
        Self([color; 9])
    }

    pub fn center(&self) -> Color {
        self.0[Self::CENTER]
    }

    pub fn stickers(&self) -> &[Color; 9] {
        &self.0
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.0.chunks(3)
    }
}

impl TryFrom<Vec<Color>> for FaceColorGrid {
    type Error = ParseGridError;

    fn try_from(value: Vec<Color>) -> Result<Self, Self::Error> {
        let len = value.len();
        let stickers: [Color; 9] = value
            .try_into()
            .map_err(|_| ParseGridError::WrongLength(len))?;
        Ok(Self(stickers))
    }
}

impl FromStr for FaceColorGrid {
    type Err = ParseGridError;

    /// Accepts nine upper-case color letters; whitespace is ignored so
    /// `"WWW WWW WWW"` works.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let colors = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| Color::from_letter(c).ok_or(ParseGridError::UnknownColor(c)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from(colors)
    }
}

impl fmt::Display for FaceColorGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in &self.0 {
            write!(f, "{color}")?;
        }
        Ok(())
    }
}

/// Per-face sticker grids. A face is present only with all nine stickers populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubeState(BTreeMap<Face, FaceColorGrid>);

impl CubeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard color scheme: white up, green front, red right.
    pub fn solved() -> Self {
        let mut state = Self::new();
        for (face, color) in [
            (Face::U, Color::W),
            (Face::R, Color::R),
            (Face::F, Color::G),
            (Face::D, Color::Y),
            (Face::L, Color::O),
            (Face::B, Color::B),
        ] {
            state.insert(face, FaceColorGrid::uniform(color));
        }
        state
    }

    pub fn insert(&mut self, face: Face, grid: FaceColorGrid) -> Option<FaceColorGrid> {
        self.0.insert(face, grid)
    }

    pub fn remove(&mut self, face: Face) -> Option<FaceColorGrid> {
        self.0.remove(&face)
    }

    pub fn get(&self, face: Face) -> Option<&FaceColorGrid> {
        self.0.get(&face)
    }

    pub fn contains(&self, face: Face) -> bool {
        self.0.contains_key(&face)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        Face::ALL.iter().all(|face| self.0.contains_key(face))
    }

    pub fn missing_faces(&self) -> Vec<Face> {
        Face::ALL
            .into_iter()
            .filter(|face| !self.0.contains_key(face))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Face, &FaceColorGrid)> {
        self.0.iter().map(|(face, grid)| (*face, grid))
    }

    /// True when every present face shows a single color.
    pub fn is_solved(&self) -> bool {
        self.is_complete()
            && self.0.values().all(|grid| {
                let center = grid.center();
                grid.stickers().iter().all(|color| *color == center)
            })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("empty move token")]
    Empty,
    #[error("unknown face '{0}' in move token")]
    UnknownFace(char),
    #[error("unknown modifier '{0}' in move token")]
    UnknownModifier(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Clockwise,
    CounterClockwise,
    Half,
}

impl Modifier {
    /// Clockwise quarter turns equivalent to this modifier.
    pub fn quarter_turns(self) -> usize {
        match self {
            Self::Clockwise => 1,
            Self::Half => 2,
            Self::CounterClockwise => 3,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Clockwise => "",
            Self::CounterClockwise => "'",
            Self::Half => "2",
        }
    }
}

/// One logical face turn, `<face>[''|'2']`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MoveToken {
    pub face: Face,
    pub modifier: Modifier,
}

impl MoveToken {
    pub fn new(face: Face, modifier: Modifier) -> Self {
        Self { face, modifier }
    }

    pub fn clockwise(face: Face) -> Self {
        Self::new(face, Modifier::Clockwise)
    }

    pub fn is_half_turn(&self) -> bool {
        self.modifier == Modifier::Half
    }

    pub fn inverse(self) -> Self {
        let modifier = match self.modifier {
            Modifier::Clockwise => Modifier::CounterClockwise,
            Modifier::CounterClockwise => Modifier::Clockwise,
            Modifier::Half => Modifier::Half,
        };
        Self::new(self.face, modifier)
    }

    /// Parses a whitespace separated move string such as `"R U2 B'"`.
    pub fn parse_sequence(raw: &str) -> Result<Vec<Self>, ParseMoveError> {
        raw.split_whitespace().map(str::parse).collect()
    }
}

impl FromStr for MoveToken {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let first = chars.next().ok_or(ParseMoveError::Empty)?;
        let face = Face::from_letter(first).ok_or(ParseMoveError::UnknownFace(first))?;
        let modifier = match chars.as_str() {
            "" => Modifier::Clockwise,
            "'" => Modifier::CounterClockwise,
            "2" => Modifier::Half,
            other => return Err(ParseMoveError::UnknownModifier(other.to_string())),
        };
        Ok(Self { face, modifier })
    }
}

impl TryFrom<String> for MoveToken {
    type Error = ParseMoveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MoveToken> for String {
    fn from(value: MoveToken) -> Self {
        value.to_string()
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face, self.modifier.suffix())
    }
}

pub const TURN_BACK: &str = "TURN_BACK";

/// One discrete thing the user does with the physical cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PhysicalAction {
    Press(MoveToken),
    /// Rotate the whole cube to expose the back face; no color effect.
    TurnBack,
}

impl PhysicalAction {
    pub fn press(&self) -> Option<MoveToken> {
        match self {
            Self::Press(token) => Some(*token),
            Self::TurnBack => None,
        }
    }

    pub fn is_turn_back(&self) -> bool {
        matches!(self, Self::TurnBack)
    }
}

impl FromStr for PhysicalAction {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == TURN_BACK {
            return Ok(Self::TurnBack);
        }
        s.parse().map(Self::Press)
    }
}

impl TryFrom<String> for PhysicalAction {
    type Error = ParseMoveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PhysicalAction> for String {
    fn from(value: PhysicalAction) -> Self {
        value.to_string()
    }
}

impl fmt::Display for PhysicalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Press(token) => write!(f, "{token}"),
            Self::TurnBack => f.write_str(TURN_BACK),
        }
    }
}

/// A solver answer: the logical moves and the physical actions that realize them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Solution {
    pub display: String,
    pub moves: Vec<MoveToken>,
    pub expanded_moves: Vec<PhysicalAction>,
}

impl Solution {
    pub fn new(
        display: impl Into<String>,
        moves: Vec<MoveToken>,
        expanded_moves: Vec<PhysicalAction>,
    ) -> Self {
        Self {
            display: display.into(),
            moves,
            expanded_moves,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.expanded_moves.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
