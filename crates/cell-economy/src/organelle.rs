//! Purchasable organelles and their cost curves.

use cell_core::{OrganelleId, ResourceMap};
use serde::{Deserialize, Serialize};

/// A production rule: `production` is only paid out when every entry of
/// `consumption` could be drawn in the same tick. Rates are per second, per unit owned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionalRate {
    pub consumption: ResourceMap,
    pub production: ResourceMap,
}

impl ConditionalRate {
    pub fn produces(production: ResourceMap) -> Self {
        Self {
            consumption: ResourceMap::new(),
            production,
        }
    }

    pub fn converts(consumption: ResourceMap, production: ResourceMap) -> Self {
        Self {
            consumption,
            production,
        }
    }

    pub fn is_unconditional(&self) -> bool {
        self.consumption.is_empty()
    }
}

/// An owned organelle type inside one running economy
#[derive(Debug, Clone, PartialEq)]
pub struct Organelle {
    pub id: OrganelleId,
    pub name: String,
    pub description: String,
    /// Price of the first unit
    pub base_cost: ResourceMap,
    /// Iterated exponent applied as more units are bought
    pub cost_exponent: ResourceMap,
    pub count: u32,
    pub rates: Vec<ConditionalRate>,
}

impl Organelle {
    /// Price of the next unit: `base ^ (exponent ^ count)` for every ticker.
    ///
    /// A base cost without a matching exponent never grows.
    pub fn costs(&self) -> ResourceMap {
        self.base_cost
            .iter()
            .map(|(ticker, base)| {
                let exponent = self.cost_exponent.get(ticker).copied().unwrap_or(1.0);
                let cost = base.powf(exponent.powi(self.count as i32));
                (ticker.clone(), cost)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cell_core::Ticker;

    fn chloroplast() -> Organelle {
        Organelle {
            id: 0,
            name: "Chloroplast".to_string(),
            description: String::new(),
            base_cost: ResourceMap::from([(Ticker::new("ATP"), 10.0)]),
            cost_exponent: ResourceMap::from([(Ticker::new("ATP"), 1.11)]),
            count: 0,
            rates: vec![ConditionalRate::produces(ResourceMap::from([(
                Ticker::new("ATP"),
                0.1,
            )]))],
        }
    }

    #[test]
    fn test_cost_curve_grows_with_count() {
        let mut organelle = chloroplast();
        let atp = Ticker::new("ATP");

        assert!((organelle.costs()[&atp] - 10.0).abs() < 1e-9);

        organelle.count = 1;
        assert!((organelle.costs()[&atp] - 10f64.powf(1.11)).abs() < 1e-9);

        organelle.count = 2;
        assert!((organelle.costs()[&atp] - 10f64.powf(1.11 * 1.11)).abs() < 1e-9);
    }

    #[test]
    fn test_missing_exponent_keeps_base_cost() {
        let mut organelle = chloroplast();
        organelle.base_cost.insert(Ticker::new("CYTO"), 4.0);
        organelle.count = 5;

        assert_eq!(organelle.costs()[&Ticker::new("CYTO")], 4.0);
    }

    #[test]
    fn test_conditional_rate_helpers() {
        let rule = ConditionalRate::converts(
            ResourceMap::from([(Ticker::new("GLUC"), 0.5)]),
            ResourceMap::from([(Ticker::new("ATP"), 1.0)]),
        );
        assert!(!rule.is_unconditional());
        assert!(chloroplast().rates[0].is_unconditional());
    }
}
