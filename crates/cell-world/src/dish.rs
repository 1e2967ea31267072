//! The petri dish: a bounded area holding organisms and food.

use crate::organism::{Organism, OrganismView};
use cell_core::{DishConfig, Error, OrganismId, Position, Result};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// A piece of food lying in the dish
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub row: i32,
    pub col: i32,
    pub calories: f64,
}

/// Source of candidate organism ids
pub trait IdSource: Send {
    fn next_id(&mut self) -> u64;
}

/// Uniform ids in the non-negative signed 64-bit range
pub struct RandomIds {
    rng: ChaCha8Rng,
}

impl RandomIds {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self { rng }
    }

    pub fn seed_from_u64(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(1);
        Self::new(rng)
    }

    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl IdSource for RandomIds {
    fn next_id(&mut self) -> u64 {
        self.rng.gen_range(0..=i64::MAX as u64)
    }
}

/// Read-only copy of the dish for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishSnapshot {
    pub height: i32,
    pub width: i32,
    pub food: Vec<Food>,
    pub organisms: Vec<OrganismView>,
}

pub struct Dish {
    height: i32,
    width: i32,
    organisms: BTreeMap<OrganismId, Organism>,
    food: Vec<Food>,
    ids: Box<dyn IdSource>,
    rng: ChaCha8Rng,
    wander_probability: f64,
    confine_organisms: bool,
}

impl Dish {
    /// Create a dish seeded with the configured food layout
    pub fn new(config: &DishConfig) -> Result<Self> {
        let ids = match config.seed {
            Some(seed) => RandomIds::seed_from_u64(seed),
            None => RandomIds::from_entropy(),
        };
        Self::with_id_source(config, Box::new(ids))
    }

    pub fn with_id_source(config: &DishConfig, ids: Box<dyn IdSource>) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut dish = Self {
            height: config.height,
            width: config.width,
            organisms: BTreeMap::new(),
            food: Vec::new(),
            ids,
            rng,
            wander_probability: config.wander_probability,
            confine_organisms: config.confine_organisms,
        };

        let layout = &config.initial_food;
        let row_step = layout.row_step as usize;
        let col_step = layout.col_step as usize;
        for col in (0..layout.cols).step_by(col_step) {
            for row in (0..layout.rows).step_by(row_step) {
                dish.add_food(row, col, layout.calories);
            }
        }

        debug!(
            height = dish.height,
            width = dish.width,
            food = dish.food.len(),
            "Dish created"
        );
        Ok(dish)
    }

    /// `(height, width)`
    pub fn bounds(&self) -> (i32, i32) {
        (self.height, self.width)
    }

    pub fn contains(&self, position: Position) -> bool {
        (0..self.height).contains(&position.row) && (0..self.width).contains(&position.col)
    }

    /// Register an organism under a fresh id, retrying on collision.
    pub fn add_organism(&mut self, mut organism: Organism) -> OrganismId {
        let id = loop {
            let candidate = OrganismId(self.ids.next_id());
            if !self.organisms.contains_key(&candidate) {
                break candidate;
            }
            trace!(id = %candidate, "Organism id collision, retrying");
        };

        organism.id = Some(id);
        debug!(
            organism_id = %id,
            row = organism.position.row,
            col = organism.position.col,
            "Organism added"
        );
        self.organisms.insert(id, organism);
        id
    }

    pub fn remove_organism(&mut self, id: OrganismId) -> Option<Organism> {
        let removed = self.organisms.remove(&id);
        if removed.is_some() {
            debug!(organism_id = %id, "Organism removed");
        }
        removed
    }

    pub fn add_food(&mut self, row: i32, col: i32, calories: f64) {
        self.food.push(Food { row, col, calories });
    }

    pub fn organism(&self, id: OrganismId) -> Option<&Organism> {
        self.organisms.get(&id)
    }

    pub fn organism_mut(&mut self, id: OrganismId) -> Option<&mut Organism> {
        self.organisms.get_mut(&id)
    }

    pub fn organisms(&self) -> impl Iterator<Item = &Organism> + '_ {
        self.organisms.values()
    }

    pub fn food(&self) -> &[Food] {
        &self.food
    }

    /// Move an organism by keypad digit. When the dish confines organisms a
    /// move that would leave the bounds is undone and reported.
    pub fn move_organism(&mut self, id: OrganismId, digit: u8) -> Result<()> {
        let confine = self.confine_organisms;
        let (height, width) = (self.height, self.width);
        let organism = self
            .organisms
            .get_mut(&id)
            .ok_or(Error::UnknownOrganism(id))?;

        let previous = organism.position;
        organism.try_move(digit)?;

        let Position { row, col } = organism.position;
        if confine && !((0..height).contains(&row) && (0..width).contains(&col)) {
            organism.position = previous;
            return Err(Error::OutOfBounds { row, col });
        }
        Ok(())
    }

    /// Run one think step for every wandering organism. Returns how many moved.
    pub fn think(&mut self) -> usize {
        let (height, width) = (self.height, self.width);
        let confine = self.confine_organisms;
        let probability = self.wander_probability;
        let rng = &mut self.rng;
        let mut moved = 0;

        for organism in self.organisms.values_mut().filter(|o| o.wander) {
            let previous = organism.position;
            if !organism.free_wander_think(rng, probability) {
                continue;
            }
            let Position { row, col } = organism.position;
            if confine && !((0..height).contains(&row) && (0..width).contains(&col)) {
                organism.position = previous;
                continue;
            }
            moved += 1;
        }

        trace!(moved, "Dish think step");
        moved
    }

    pub fn snapshot(&self) -> DishSnapshot {
        DishSnapshot {
            height: self.height,
            width: self.width,
            food: self.food.clone(),
            organisms: self
                .organisms
                .iter()
                .map(|(id, o)| OrganismView {
                    id: *id,
                    position: o.position,
                    size: o.size,
                    wander: o.wander,
                })
                .collect(),
        }
    }
}
