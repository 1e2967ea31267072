//! Core type definitions for the simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Short identifier of a resource, e.g. `ATP`. Always stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Ticker {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&str> for Ticker {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Amounts or rates keyed on ticker.
pub type ResourceMap = BTreeMap<Ticker, f64>;

/// Index of an organelle in its catalog
pub type OrganelleId = usize;

/// Identifier handed out by a dish when an organism is inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrganismId(pub u64);

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Grid position, row-major. Rows grow downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(&self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    /// Manhattan distance to another position
    pub fn manhattan_distance(&self, other: &Position) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

/// Movement request, decoded from numeric keypad digits:
///
/// ```text
/// 7 8 9
/// 4 5 6
/// 1 2 3
/// ```
///
/// Only the cardinal digits and `5` (stay) are movements; diagonals are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Stay,
}

impl Direction {
    /// Directions picked from when wandering
    pub const CARDINAL: [Direction; 4] = [
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Up,
    ];

    pub fn from_keypad(digit: u8) -> Result<Self> {
        match digit {
            8 => Ok(Direction::Up),
            2 => Ok(Direction::Down),
            4 => Ok(Direction::Left),
            6 => Ok(Direction::Right),
            5 => Ok(Direction::Stay),
            _ => Err(Error::InvalidDirection(digit)),
        }
    }

    pub fn keypad_digit(&self) -> u8 {
        match self {
            Direction::Up => 8,
            Direction::Down => 2,
            Direction::Left => 4,
            Direction::Right => 6,
            Direction::Stay => 5,
        }
    }

    /// `(drow, dcol)` for a single step
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Stay => (0, 0),
        }
    }
}
