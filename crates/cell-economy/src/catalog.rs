//! Static resource and organelle tables, plus the owned catalog built from them.

use crate::organelle::ConditionalRate;
use cell_core::{Error, OrganelleId, ResourceMap, Result, Ticker};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub struct ResourceTemplate {
    pub ticker: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub amount: f64,
}

pub struct RateTemplate {
    pub consumption: &'static [(&'static str, f64)],
    pub production: &'static [(&'static str, f64)],
}

pub struct OrganelleTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub base_cost: &'static [(&'static str, f64)],
    pub cost_exponent: &'static [(&'static str, f64)],
    pub rates: &'static [RateTemplate],
}

pub const RESOURCE_TEMPLATES: &[ResourceTemplate] = &[
    ResourceTemplate {
        ticker: "ATP",
        name: "Adenosine Triphosphate",
        description: "The basic unit of energy to be created and used inside a cellular organism.",
        amount: 15.0,
    },
    ResourceTemplate {
        ticker: "CYTO",
        name: "Cytosol",
        description: "The liquid stored within a cell. Consumed by some actions and upgrades.",
        amount: 0.0,
    },
    ResourceTemplate {
        ticker: "GLUC",
        name: "Glucose",
        description: "Consumed by some organelles to make ATP. Produced by finding food in your organism's environment.",
        amount: 10.0,
    },
];

pub const ORGANELLE_TEMPLATES: &[OrganelleTemplate] = &[
    OrganelleTemplate {
        name: "Chloroplast",
        description: "Generates 0.1 ATP/s passively.",
        base_cost: &[("ATP", 10.0)],
        cost_exponent: &[("ATP", 1.11)],
        rates: &[RateTemplate {
            consumption: &[],
            production: &[("ATP", 0.1)],
        }],
    },
    OrganelleTemplate {
        name: "Mitochondria",
        description: "Generates 0.1 ATP/s passively. If glucose is present, consume 0.5 glucose/s to produce an additional 1 ATP/s.",
        base_cost: &[("ATP", 30.0)],
        cost_exponent: &[("ATP", 1.12)],
        rates: &[
            RateTemplate {
                consumption: &[],
                production: &[("ATP", 0.1)],
            },
            RateTemplate {
                consumption: &[("GLUC", 0.5)],
                production: &[("ATP", 1.0)],
            },
        ],
    },
    OrganelleTemplate {
        name: "Nanoconsumer",
        description: "Eats away at the very matter of your organism to produce energy. Consumes 0.1 cytosol/s to produce 2 ATP/s.",
        base_cost: &[("ATP", 100.0)],
        cost_exponent: &[("ATP", 1.01)],
        rates: &[
            RateTemplate {
                consumption: &[],
                production: &[("ATP", 0.5)],
            },
            RateTemplate {
                consumption: &[("CYTO", 0.1)],
                production: &[("ATP", 2.0)],
            },
        ],
    },
];

fn to_map(entries: &[(&str, f64)]) -> ResourceMap {
    entries
        .iter()
        .map(|(ticker, value)| (Ticker::new(ticker), *value))
        .collect()
}

/// Starting state of one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub ticker: Ticker,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: f64,
}

/// Definition of a purchasable organelle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganelleSpec {
    pub id: OrganelleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub base_cost: ResourceMap,
    #[serde(default)]
    pub cost_exponent: ResourceMap,
    #[serde(default)]
    pub rates: Vec<ConditionalRate>,
}

/// Everything an economy is initialized from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub resources: Vec<ResourceSpec>,
    pub organelles: Vec<OrganelleSpec>,
}

impl Catalog {
    /// Deep copy of the built-in tables
    pub fn builtin() -> Self {
        let resources = RESOURCE_TEMPLATES
            .iter()
            .map(|t| ResourceSpec {
                ticker: Ticker::new(t.ticker),
                name: t.name.to_string(),
                description: t.description.to_string(),
                amount: t.amount,
            })
            .collect();

        let organelles = ORGANELLE_TEMPLATES
            .iter()
            .enumerate()
            .map(|(id, t)| OrganelleSpec {
                id,
                name: t.name.to_string(),
                description: t.description.to_string(),
                base_cost: to_map(t.base_cost),
                cost_exponent: to_map(t.cost_exponent),
                rates: t
                    .rates
                    .iter()
                    .map(|r| ConditionalRate::converts(to_map(r.consumption), to_map(r.production)))
                    .collect(),
            })
            .collect();

        Self {
            resources,
            organelles,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check that ids are dense, every referenced ticker is a known resource
    /// and every base cost has a matching exponent.
    pub fn validate(&self) -> Result<()> {
        let mut tickers = HashSet::new();
        for resource in &self.resources {
            if !tickers.insert(resource.ticker.clone()) {
                return Err(Error::Validation(format!(
                    "duplicate resource ticker {}",
                    resource.ticker
                )));
            }
            if !resource.amount.is_finite() || resource.amount < 0.0 {
                return Err(Error::Validation(format!(
                    "resource {} starts with invalid amount {}",
                    resource.ticker, resource.amount
                )));
            }
        }

        for (index, organelle) in self.organelles.iter().enumerate() {
            if organelle.id != index {
                return Err(Error::Validation(format!(
                    "organelle {} has id {}, expected {}",
                    organelle.name, organelle.id, index
                )));
            }

            if let Some(ticker) = organelle
                .base_cost
                .keys()
                .find(|t| !organelle.cost_exponent.contains_key(*t))
            {
                return Err(Error::Validation(format!(
                    "organelle {} has a base cost in {} but no exponent for it",
                    organelle.name, ticker
                )));
            }

            let maps = std::iter::once(&organelle.base_cost)
                .chain(std::iter::once(&organelle.cost_exponent))
                .chain(
                    organelle
                        .rates
                        .iter()
                        .flat_map(|rate| [&rate.consumption, &rate.production]),
                );
            for map in maps {
                if let Some(ticker) = map.keys().find(|t| !tickers.contains(*t)) {
                    return Err(Error::UnknownTicker(format!(
                        "{} (referenced by organelle {})",
                        ticker, organelle.name
                    )));
                }
                if let Some((ticker, value)) = map.iter().find(|(_, v)| !v.is_finite() || **v < 0.0) {
                    return Err(Error::Validation(format!(
                        "organelle {} has invalid value {} for {}",
                        organelle.name, value, ticker
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert!(catalog.validate().is_ok());

        let tickers: Vec<&str> = catalog.resources.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["ATP", "CYTO", "GLUC"]);
        assert_eq!(catalog.resources[0].amount, 15.0);
        assert_eq!(catalog.resources[2].amount, 10.0);

        let names: Vec<&str> = catalog.organelles.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Chloroplast", "Mitochondria", "Nanoconsumer"]);

        let mitochondria = &catalog.organelles[1];
        assert_eq!(mitochondria.rates.len(), 2);
        assert_eq!(
            mitochondria.rates[1].consumption[&Ticker::new("GLUC")],
            0.5
        );
    }

    #[test]
    fn test_builtin_is_an_independent_copy() {
        let mut first = Catalog::builtin();
        first.resources[0].amount = 999.0;
        first.organelles[0].base_cost.clear();

        let second = Catalog::builtin();
        assert_eq!(second.resources[0].amount, 15.0);
        assert!(!second.organelles[0].base_cost.is_empty());
    }

    #[test]
    fn test_rejects_unknown_ticker() {
        let mut catalog = Catalog::builtin();
        catalog.organelles[0]
            .rates
            .push(ConditionalRate::produces(ResourceMap::from([(
                Ticker::new("NADH"),
                1.0,
            )])));

        assert!(matches!(catalog.validate(), Err(Error::UnknownTicker(_))));
    }

    #[test]
    fn test_rejects_bad_ids_and_duplicates() {
        let mut catalog = Catalog::builtin();
        catalog.organelles[2].id = 7;
        assert!(matches!(catalog.validate(), Err(Error::Validation(_))));

        let mut catalog = Catalog::builtin();
        let mut duplicate = catalog.resources[0].clone();
        duplicate.ticker = Ticker::new("atp");
        catalog.resources.push(duplicate);
        assert!(matches!(catalog.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_rejects_missing_exponent() {
        let mut catalog = Catalog::builtin();
        catalog.organelles[0].cost_exponent.clear();
        assert!(matches!(catalog.validate(), Err(Error::Validation(_))));

        let json = r#"{
            "resources": [{ "ticker": "ATP", "name": "ATP", "amount": 5 }],
            "organelles": [{ "id": 0, "name": "Ribosome", "base_cost": { "ATP": 2 } }]
        }"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "resources": [{ "ticker": "atp", "name": "ATP", "amount": 5 }],
            "organelles": [{
                "id": 0,
                "name": "Ribosome",
                "base_cost": { "ATP": 2 },
                "cost_exponent": { "ATP": 1.5 },
                "rates": [{ "production": { "atp": 0.2 } }]
            }]
        }"#;

        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.resources[0].ticker, Ticker::new("ATP"));
        assert_eq!(catalog.organelles[0].rates[0].production[&Ticker::new("ATP")], 0.2);
    }
}
