//! Square codec
//!
//! Converts between grid coordinates (file-index, rank-index with `(0, 0)` at
//! the top-left corner of the rendered board) and algebraic square names.
//! Rank-index 0 is the far rank, so it maps to `'8'` and rank-index 7 to `'1'`.
//!
//! This is the only place that knows about the naming scheme. Everything else
//! stores a [`Coordinate`] and derives a [`SquareName`] when talking to the
//! authority.

use crate::game::error::GameError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Board edge length
pub const BOARD_SIZE: u8 = 8;

/// A square on the board, always within `[0, 7] x [0, 7]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    file: u8,
    rank: u8,
}

impl Coordinate {
    /// Returns `None` when either index is off the board
    pub const fn new(file: u8, rank: u8) -> Option<Self> {
        if file < BOARD_SIZE && rank < BOARD_SIZE {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    pub const fn file(self) -> u8 {
        self.file
    }

    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// All 64 squares in render order (row by row from the top-left)
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..BOARD_SIZE).flat_map(|rank| (0..BOARD_SIZE).map(move |file| Coordinate { file, rank }))
    }

    pub fn to_name(self) -> SquareName {
        to_name(self)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.file, self.rank)
    }
}

// Wire form is `[x, y]`.
impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.file, self.rank].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [file, rank] = <[u8; 2]>::deserialize(deserializer)?;
        Coordinate::new(file, rank)
            .ok_or_else(|| D::Error::custom(format!("coordinate [{file}, {rank}] is off the board")))
    }
}

/// Algebraic square name such as `e4`
///
/// Only constructible from a [`Coordinate`] or by parsing a valid name, so
/// converting back to a coordinate never fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SquareName([u8; 2]);

impl SquareName {
    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII by construction.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }

    pub fn to_coordinate(self) -> Coordinate {
        to_coordinate(self)
    }
}

impl fmt::Display for SquareName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SquareName {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GameError::InvalidSquare {
            name: s.to_string(),
        };
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }
        Ok(SquareName([file, rank]))
    }
}

/// Coordinate to square name: file 0..7 → `a..h`, rank 0..7 → `8..1`
pub fn to_name(coordinate: Coordinate) -> SquareName {
    SquareName([b'a' + coordinate.file, b'8' - coordinate.rank])
}

/// Square name to coordinate, the exact inverse of [`to_name`]
pub fn to_coordinate(name: SquareName) -> Coordinate {
    let [file, rank] = name.0;
    Coordinate {
        file: file - b'a',
        rank: b'8' - rank,
    }
}
