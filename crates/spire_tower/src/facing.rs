//! Facing quadrants and the corner turn table

use serde::{Deserialize, Serialize};

/// Which side of the tower faces the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    North,
    East,
    South,
    West,
}

impl Facing {
    const ORDER: [Facing; 4] = [Facing::North, Facing::East, Facing::South, Facing::West];

    /// Quadrant index, North = 0 going clockwise
    pub fn index(self) -> u8 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    pub fn from_index(index: u8) -> Self {
        Self::ORDER[(index % 4) as usize]
    }

    /// Move one quadrant in the direction of `sign`
    pub fn advance(self, sign: i8) -> Self {
        let step = if sign >= 0 { 1 } else { 3 };
        Self::from_index(self.index() + step)
    }
}

impl Default for Facing {
    fn default() -> Self {
        Self::North
    }
}

/// Tower corner trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

impl Corner {
    /// Corner for a zone index, NE = 0 going clockwise
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::NorthEast),
            1 => Some(Self::SouthEast),
            2 => Some(Self::SouthWest),
            3 => Some(Self::NorthWest),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Self::NorthEast => 0,
            Self::SouthEast => 1,
            Self::SouthWest => 2,
            Self::NorthWest => 3,
        }
    }
}

/// Turn direction for touching `corner` while `facing` is in front.
///
/// Each face has two corners. The one it shares with the next face
/// clockwise turns +1, the one shared with the previous face turns -1.
/// Corners of the far side do not turn.
pub fn turn_sign(corner: Corner, facing: Facing) -> Option<i8> {
    let c = corner.index();
    let f = facing.index();
    if c == f {
        Some(1)
    } else if c == (f + 3) % 4 {
        Some(-1)
    } else {
        None
    }
}
