//! Error types for the simulation.

use crate::types::{OrganelleId, OrganismId, Ticker};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Insufficient {ticker}: requested {requested:.2}, available {available:.2}")]
    InsufficientResource {
        ticker: Ticker,
        requested: f64,
        available: f64,
    },

    #[error("Invalid direction: {0}")]
    InvalidDirection(u8),

    #[error("Nothing to sell: organelle {0} is not owned")]
    NothingToSell(OrganelleId),

    #[error("Unknown ticker: {0}")]
    UnknownTicker(String),

    #[error("Unknown organelle: {0}")]
    UnknownOrganelle(OrganelleId),

    #[error("Unknown organism: {0}")]
    UnknownOrganism(OrganismId),

    #[error("Out of bounds: ({row}, {col})")]
    OutOfBounds { row: i32, col: i32 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
