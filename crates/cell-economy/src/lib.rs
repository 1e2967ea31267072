//! Resource economy: the ledger of balances, the organelle catalog and the
//! tick engine that turns owned organelles into production.

pub mod catalog;
pub mod engine;
pub mod ledger;
pub mod organelle;

pub use catalog::{Catalog, OrganelleSpec, ResourceSpec};
pub use engine::{Economy, EconomySnapshot, OrganelleView, ResourceView, TickReport};
pub use ledger::{Ledger, Resource};
pub use organelle::{ConditionalRate, Organelle};
