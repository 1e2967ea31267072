//! Petri dish simulation.
//!
//! This module implements the bounded 2D dish where organisms wander and food is placed.

pub mod dish;
pub mod organism;
pub mod viewport;

pub use dish::{Dish, DishSnapshot, Food, IdSource, RandomIds};
pub use organism::{Organism, OrganismView};
pub use viewport::Viewport;
