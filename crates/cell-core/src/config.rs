//! Configuration types for the simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// How the tick engine decides whether a conditional rate may fire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePolicy {
    /// Require one unit's worth of each consumed resource, even though the
    /// withdrawal is scaled by the owned count.
    #[default]
    SingleUnit,
    /// Require the full count-scaled amount before firing.
    ScaledByCount,
}

/// Economy tick configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Seconds between economy ticks
    pub update_period_secs: f64,
    /// Consumption gate applied to every conditional rate
    pub gate_policy: GatePolicy,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            update_period_secs: 0.1,
            gate_policy: GatePolicy::SingleUnit,
        }
    }
}

/// Regular grid of food placed in a fresh dish
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodLayout {
    /// Rows are seeded in `0..rows` stepping by `row_step`
    pub rows: i32,
    pub row_step: i32,
    /// Columns are seeded in `0..cols` stepping by `col_step`
    pub cols: i32,
    pub col_step: i32,
    /// Calories per food item
    pub calories: f64,
}

impl Default for FoodLayout {
    fn default() -> Self {
        Self {
            rows: 10,
            row_step: 2,
            cols: 50,
            col_step: 3,
            calories: 0.1,
        }
    }
}

/// Petri dish configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DishConfig {
    /// Height of the dish in rows
    pub height: i32,
    /// Width of the dish in columns
    pub width: i32,
    /// Seconds between organism think steps
    pub think_period_secs: f64,
    /// Chance (0.0 to 1.0) that a wandering organism moves on a think step
    pub wander_probability: f64,
    /// Reject moves that would leave the dish bounds
    pub confine_organisms: bool,
    /// Random seed for id generation and wandering. Seeded from OS entropy
    /// when unset.
    pub seed: Option<u64>,
    /// Food placed when the dish is created
    pub initial_food: FoodLayout,
}

impl Default for DishConfig {
    fn default() -> Self {
        Self {
            height: 100,
            width: 600,
            think_period_secs: 0.05,
            wander_probability: 0.10,
            confine_organisms: false,
            seed: None,
            initial_food: FoodLayout::default(),
        }
    }
}

/// Cadence of the read-only status reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub status_period_secs: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            status_period_secs: 1.0,
        }
    }
}

/// Top-level game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub economy: EconomyConfig,
    pub dish: DishConfig,
    pub report: ReportConfig,
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        debug!(path = %path.display(), "Loaded game config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_period("economy.update_period_secs", self.economy.update_period_secs)?;
        check_period("report.status_period_secs", self.report.status_period_secs)?;
        self.dish.validate()
    }
}

impl DishConfig {
    pub fn validate(&self) -> Result<()> {
        check_period("dish.think_period_secs", self.think_period_secs)?;

        if self.height <= 0 || self.width <= 0 {
            return Err(Error::Validation(format!(
                "dish bounds must be positive, got {}x{}",
                self.height, self.width
            )));
        }
        // Range check is false for NaN.
        if !(0.0..=1.0).contains(&self.wander_probability) {
            return Err(Error::Validation(format!(
                "dish.wander_probability must be within [0, 1], got {}",
                self.wander_probability
            )));
        }
        let food = &self.initial_food;
        if food.row_step <= 0 || food.col_step <= 0 {
            return Err(Error::Validation(
                "initial_food steps must be positive".to_string(),
            ));
        }
        if !food.calories.is_finite() || food.calories < 0.0 {
            return Err(Error::Validation(format!(
                "initial_food.calories must be a non-negative number, got {}",
                food.calories
            )));
        }
        Ok(())
    }
}

fn check_period(name: &str, secs: f64) -> Result<()> {
    if secs.is_finite() && secs > 0.0 {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{} must be a positive number of seconds, got {}",
            name, secs
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = GameConfig::default();
        assert_eq!(config.economy.update_period_secs, 0.1);
        assert_eq!(config.economy.gate_policy, GatePolicy::SingleUnit);
        assert_eq!(config.dish.height, 100);
        assert_eq!(config.dish.width, 600);
        assert_eq!(config.dish.wander_probability, 0.10);
        assert!(!config.dish.confine_organisms);
        assert_eq!(config.dish.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dish_config_rejects_nan_probability() {
        let config = DishConfig {
            wander_probability: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        let config = DishConfig {
            think_period_secs: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        let config: DishConfig = serde_json::from_str(r#"{ "seed": 42 }"#).unwrap();
        assert_eq!(config.seed, Some(42));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json_str(
            r#"{ "economy": { "gate_policy": "scaled_by_count" }, "dish": { "width": 80 } }"#,
        )
        .unwrap();
        assert_eq!(config.economy.gate_policy, GatePolicy::ScaledByCount);
        assert_eq!(config.economy.update_period_secs, 0.1);
        assert_eq!(config.dish.width, 80);
        assert_eq!(config.dish.height, 100);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = GameConfig::default();
        config.economy.update_period_secs = 0.0;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        let mut config = GameConfig::default();
        config.dish.wander_probability = 1.5;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        let mut config = GameConfig::default();
        config.dish.initial_food.col_step = 0;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        let mut config = GameConfig::default();
        config.dish.height = 0;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        assert!(matches!(
            GameConfig::from_json_str("{ not json"),
            Err(Error::Serialization(_))
        ));
    }
}
