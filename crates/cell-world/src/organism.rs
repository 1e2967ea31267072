//! Organism state and movement.

use cell_core::{Direction, OrganismId, Position, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An organism in the dish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organism {
    /// Assigned when the organism is added to a dish
    pub id: Option<OrganismId>,
    pub position: Position,
    /// Bounding box as `(height, width)`
    pub size: (i32, i32),
    /// Whether the organism moves by itself on think steps
    pub wander: bool,
}

impl Organism {
    pub fn new(position: Position, size: (i32, i32)) -> Self {
        Self {
            id: None,
            position,
            size,
            wander: false,
        }
    }

    pub fn wandering(mut self) -> Self {
        self.wander = true;
        self
    }

    /// Step one cell in the direction of a keypad digit.
    ///
    /// `5` is accepted without moving. Diagonals and digits outside 1-9 are
    /// rejected and leave the position alone. Dish bounds are not checked here.
    pub fn try_move(&mut self, digit: u8) -> Result<()> {
        let direction = Direction::from_keypad(digit)?;
        self.step(direction);
        Ok(())
    }

    pub fn move_keypad(&mut self, digit: u8) -> bool {
        self.try_move(digit).is_ok()
    }

    pub fn step(&mut self, direction: Direction) {
        let (drow, dcol) = direction.delta();
        self.position = self.position.offset(drow, dcol);
    }

    /// One autonomous think step. With chance `probability` a random cardinal
    /// direction is taken. Returns whether the organism moved. A non-finite
    /// probability never moves.
    pub fn free_wander_think<R: Rng + ?Sized>(&mut self, rng: &mut R, probability: f64) -> bool {
        if !probability.is_finite() || !rng.gen_bool(probability.clamp(0.0, 1.0)) {
            return false;
        }
        match Direction::CARDINAL.choose(rng) {
            Some(direction) => {
                self.step(*direction);
                true
            }
            None => false,
        }
    }
}

/// Serializable organism data for presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganismView {
    pub id: OrganismId,
    pub position: Position,
    pub size: (i32, i32),
    pub wander: bool,
}
