//! Economy tick engine: applies organelle production each tick and handles
//! purchases and sales.
//!
//! Every mutation takes `&mut self`, so a buy/sell check and its application,
//! or a rule's consumption and production, can never interleave with another
//! mutator of the same economy.

use crate::catalog::Catalog;
use crate::ledger::{Ledger, Resource};
use crate::organelle::Organelle;
use cell_core::{EconomyConfig, Error, GatePolicy, OrganelleId, ResourceMap, Result, Ticker};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

/// Outcome counters for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Rules whose consumption gate passed
    pub rules_applied: usize,
    /// Rules skipped because a consumed resource was short
    pub rules_blocked: usize,
    /// Count-scaled withdrawals that failed after the gate had passed
    pub withdrawals_failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceView {
    pub ticker: Ticker,
    pub name: String,
    pub amount: f64,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganelleView {
    pub id: OrganelleId,
    pub name: String,
    pub description: String,
    pub costs: ResourceMap,
    pub count: u32,
}

/// Read-only copy of the economy for presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomySnapshot {
    pub resources: Vec<ResourceView>,
    pub organelles: Vec<OrganelleView>,
}

/// One player's resources and organelles
#[derive(Debug, Clone)]
pub struct Economy {
    ledger: Ledger,
    organelles: Vec<Organelle>,
    config: EconomyConfig,
}

impl Economy {
    /// Build an economy from its own copy of `catalog`; all counts start at zero.
    pub fn new(catalog: &Catalog, config: EconomyConfig) -> Result<Self> {
        catalog.validate()?;
        if !(config.update_period_secs.is_finite() && config.update_period_secs > 0.0) {
            return Err(Error::Validation(format!(
                "update period must be positive, got {}",
                config.update_period_secs
            )));
        }

        let resources = catalog.resources.iter().map(Resource::from).collect();
        let organelles = catalog
            .organelles
            .iter()
            .map(|spec| Organelle {
                id: spec.id,
                name: spec.name.clone(),
                description: spec.description.clone(),
                base_cost: spec.base_cost.clone(),
                cost_exponent: spec.cost_exponent.clone(),
                count: 0,
                rates: spec.rates.clone(),
            })
            .collect();

        Ok(Self {
            ledger: Ledger::new(resources, config.update_period_secs),
            organelles,
            config,
        })
    }

    pub fn builtin(config: EconomyConfig) -> Result<Self> {
        Self::new(&Catalog::builtin(), config)
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn organelles(&self) -> &[Organelle] {
        &self.organelles
    }

    pub fn organelle(&self, id: OrganelleId) -> Result<&Organelle> {
        self.organelles.get(id).ok_or(Error::UnknownOrganelle(id))
    }

    /// Run one economy step: rates are recomputed from scratch, then every
    /// organelle's rules fire in catalog and declaration order.
    pub fn tick(&mut self) -> TickReport {
        let period = self.config.update_period_secs;
        let mut report = TickReport::default();

        self.ledger.reset_rates();

        for organelle in &self.organelles {
            let count = f64::from(organelle.count);
            let gate_scale = match self.config.gate_policy {
                GatePolicy::SingleUnit => 1.0,
                GatePolicy::ScaledByCount => count,
            };

            for (rule_index, rule) in organelle.rates.iter().enumerate() {
                let shortfall = rule.consumption.iter().find(|(ticker, rate)| {
                    self.ledger
                        .amount(ticker)
                        .map_or(true, |have| have < *rate * period * gate_scale)
                });
                if let Some((ticker, _)) = shortfall {
                    trace!(
                        organelle = %organelle.name,
                        rule = rule_index,
                        %ticker,
                        "Conditional rate blocked"
                    );
                    report.rules_blocked += 1;
                    continue;
                }

                for (ticker, rate) in &rule.consumption {
                    if let Err(err) = self.ledger.withdraw(ticker, rate * period * count) {
                        // The single-unit gate can pass while the scaled draw cannot.
                        debug!(
                            organelle = %organelle.name,
                            rule = rule_index,
                            error = %err,
                            "Scaled withdrawal failed"
                        );
                        report.withdrawals_failed += 1;
                    }
                }
                for (ticker, rate) in &rule.production {
                    if let Err(err) = self.ledger.deposit(ticker, rate * period * count) {
                        warn!(organelle = %organelle.name, error = %err, "Deposit failed");
                    }
                }
                report.rules_applied += 1;
            }
        }

        trace!(
            rules_applied = report.rules_applied,
            rules_blocked = report.rules_blocked,
            withdrawals_failed = report.withdrawals_failed,
            "Economy tick"
        );
        report
    }

    /// Buy one unit of an organelle at its current price.
    ///
    /// The balance must strictly exceed the cost of every ticker; an exact
    /// balance is not enough.
    pub fn buy(&mut self, id: OrganelleId) -> Result<()> {
        let costs = self.organelle(id)?.costs();

        for (ticker, cost) in &costs {
            let available = self.ledger.amount(ticker)?;
            if available <= *cost {
                debug!(organelle = id, %ticker, cost, available, "Purchase rejected");
                return Err(Error::InsufficientResource {
                    ticker: ticker.clone(),
                    requested: *cost,
                    available,
                });
            }
        }
        for (ticker, cost) in &costs {
            self.ledger.adjust_amount(ticker, -cost)?;
        }

        let organelle = &mut self.organelles[id];
        organelle.count += 1;
        info!(organelle = %organelle.name, count = organelle.count, "Organelle bought");
        Ok(())
    }

    /// Sell one unit, refunding the price the next unit would currently cost.
    pub fn sell(&mut self, id: OrganelleId) -> Result<()> {
        let organelle = self.organelle(id)?;
        if organelle.count == 0 {
            return Err(Error::NothingToSell(id));
        }
        let refund = organelle.costs();

        for (ticker, amount) in &refund {
            self.ledger.adjust_amount(ticker, *amount)?;
        }

        let organelle = &mut self.organelles[id];
        organelle.count -= 1;
        info!(organelle = %organelle.name, count = organelle.count, "Organelle sold");
        Ok(())
    }

    pub fn try_buy(&mut self, id: OrganelleId) -> bool {
        self.buy(id).is_ok()
    }

    pub fn try_sell(&mut self, id: OrganelleId) -> bool {
        self.sell(id).is_ok()
    }

    pub fn snapshot(&self) -> EconomySnapshot {
        EconomySnapshot {
            resources: self
                .ledger
                .iter()
                .map(|r| ResourceView {
                    ticker: r.ticker.clone(),
                    name: r.name.clone(),
                    amount: r.amount,
                    rate: r.rate,
                })
                .collect(),
            organelles: self
                .organelles
                .iter()
                .map(|o| OrganelleView {
                    id: o.id,
                    name: o.name.clone(),
                    description: o.description.clone(),
                    costs: o.costs(),
                    count: o.count,
                })
                .collect(),
        }
    }
}
