//! Resource balances and per-tick flow rates.

use crate::catalog::ResourceSpec;
use cell_core::{Error, Result, Ticker};
use serde::{Deserialize, Serialize};

/// A resource the player collects, identified by its ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub ticker: Ticker,
    pub name: String,
    pub description: String,
    pub amount: f64,
    /// Net flow observed during the current tick, in units per second
    pub rate: f64,
}

impl From<&ResourceSpec> for Resource {
    fn from(spec: &ResourceSpec) -> Self {
        Self {
            ticker: spec.ticker.clone(),
            name: spec.name.clone(),
            description: spec.description.clone(),
            amount: spec.amount,
            rate: 0.0,
        }
    }
}

/// Balances of every resource, in catalog order
#[derive(Debug, Clone)]
pub struct Ledger {
    resources: Vec<Resource>,
    tick_period: f64,
}

impl Ledger {
    pub fn new(resources: Vec<Resource>, tick_period: f64) -> Self {
        Self {
            resources,
            tick_period,
        }
    }

    pub fn tick_period(&self) -> f64 {
        self.tick_period
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> + '_ {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    fn index(&self, ticker: &str) -> Result<usize> {
        let ticker = Ticker::new(ticker);
        self.resources
            .iter()
            .position(|r| r.ticker == ticker)
            .ok_or_else(|| Error::UnknownTicker(ticker.to_string()))
    }

    /// Look up a resource by ticker, case-insensitively
    pub fn get(&self, ticker: impl AsRef<str>) -> Result<&Resource> {
        let index = self.index(ticker.as_ref())?;
        Ok(&self.resources[index])
    }

    pub fn amount(&self, ticker: impl AsRef<str>) -> Result<f64> {
        self.get(ticker).map(|r| r.amount)
    }

    pub fn rate(&self, ticker: impl AsRef<str>) -> Result<f64> {
        self.get(ticker).map(|r| r.rate)
    }

    /// Remove `amount` if the balance covers it. On failure nothing changes.
    pub fn withdraw(&mut self, ticker: impl AsRef<str>, amount: f64) -> Result<()> {
        let index = self.index(ticker.as_ref())?;
        check_amount(amount)?;
        let period = self.tick_period;
        let resource = &mut self.resources[index];
        if amount > resource.amount {
            return Err(Error::InsufficientResource {
                ticker: resource.ticker.clone(),
                requested: amount,
                available: resource.amount,
            });
        }
        resource.amount -= amount;
        resource.rate -= amount / period;
        Ok(())
    }

    pub fn try_withdraw(&mut self, ticker: impl AsRef<str>, amount: f64) -> bool {
        self.withdraw(ticker, amount).is_ok()
    }

    pub fn deposit(&mut self, ticker: impl AsRef<str>, amount: f64) -> Result<()> {
        let index = self.index(ticker.as_ref())?;
        check_amount(amount)?;
        let period = self.tick_period;
        let resource = &mut self.resources[index];
        resource.amount += amount;
        resource.rate += amount / period;
        Ok(())
    }

    /// Zero every rate at the start of a tick
    pub fn reset_rates(&mut self) {
        for resource in &mut self.resources {
            resource.rate = 0.0;
        }
    }

    /// Unguarded balance change that leaves rates untouched. Used for purchases
    /// and refunds, which are checked by the caller and are not part of a tick.
    pub(crate) fn adjust_amount(&mut self, ticker: impl AsRef<str>, delta: f64) -> Result<()> {
        let index = self.index(ticker.as_ref())?;
        self.resources[index].amount += delta;
        Ok(())
    }
}

fn check_amount(amount: f64) -> Result<()> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "amount must be a non-negative number, got {}",
            amount
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use proptest::prelude::*;

    const PERIOD: f64 = 0.1;

    fn ledger() -> Ledger {
        let resources = Catalog::builtin().resources.iter().map(Resource::from).collect();
        Ledger::new(resources, PERIOD)
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let ledger = ledger();
        assert_eq!(ledger.amount("atp").unwrap(), 15.0);
        assert_eq!(ledger.get("Gluc").unwrap().name, "Glucose");
        assert!(matches!(ledger.get("NADH"), Err(Error::UnknownTicker(_))));
    }

    #[test]
    fn test_withdraw_and_deposit_track_rate() {
        let mut ledger = ledger();

        ledger.withdraw("ATP", 5.0).unwrap();
        assert_eq!(ledger.amount("ATP").unwrap(), 10.0);
        assert!((ledger.rate("ATP").unwrap() + 5.0 / PERIOD).abs() < 1e-9);

        ledger.deposit("ATP", 2.0).unwrap();
        assert_eq!(ledger.amount("ATP").unwrap(), 12.0);
        assert!((ledger.rate("ATP").unwrap() + 3.0 / PERIOD).abs() < 1e-9);

        ledger.reset_rates();
        assert!(ledger.iter().all(|r| r.rate == 0.0));
    }

    #[test]
    fn test_withdraw_exact_balance_succeeds() {
        let mut ledger = ledger();
        assert!(ledger.try_withdraw("GLUC", 10.0));
        assert_eq!(ledger.amount("GLUC").unwrap(), 0.0);
        assert!(!ledger.try_withdraw("GLUC", 0.01));
    }

    #[test]
    fn test_rejects_negative_and_nan_amounts() {
        let mut ledger = ledger();
        let before = ledger.get("ATP").unwrap().clone();

        for amount in [-100.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(ledger.deposit("ATP", amount), Err(Error::Validation(_))));
            assert!(matches!(ledger.withdraw("ATP", amount), Err(Error::Validation(_))));
        }
        assert_eq!(ledger.get("ATP").unwrap(), &before);
    }

    #[test]
    fn test_adjust_amount_leaves_rate() {
        let mut ledger = ledger();
        ledger.adjust_amount("atp", -10.0).unwrap();
        assert_eq!(ledger.amount("ATP").unwrap(), 5.0);
        assert_eq!(ledger.rate("ATP").unwrap(), 0.0);
    }

    proptest! {
        #[test]
        fn proptest_overdraw_leaves_resource_unchanged(
            index in 0usize..3,
            excess in 0.001f64..1_000.0,
        ) {
            let mut ledger = ledger();
            let ticker = ledger.iter().nth(index).unwrap().ticker.clone();
            ledger.deposit(&ticker, 1.0).unwrap();
            let before = ledger.get(&ticker).unwrap().clone();

            let result = ledger.withdraw(&ticker, before.amount + excess);
            let is_insufficient = matches!(result, Err(Error::InsufficientResource { .. }));
            prop_assert!(is_insufficient);
            prop_assert_eq!(ledger.get(&ticker).unwrap(), &before);
        }

        #[test]
        fn proptest_deposit_is_additive(
            index in 0usize..3,
            a1 in 0.0f64..1_000.0,
            a2 in 0.0f64..1_000.0,
        ) {
            let mut split = ledger();
            let ticker = split.iter().nth(index).unwrap().ticker.clone();
            let start = split.amount(&ticker).unwrap();
            split.deposit(&ticker, a1).unwrap();
            split.deposit(&ticker, a2).unwrap();

            let mut joined = ledger();
            joined.deposit(&ticker, a1 + a2).unwrap();

            let diff = (split.amount(&ticker).unwrap() - joined.amount(&ticker).unwrap()).abs();
            prop_assert!(diff <= 1e-9 * (1.0 + start + a1 + a2));
        }
    }
}
