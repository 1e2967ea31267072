//! Periodic simulation tasks.
//!
//! The economy and the dish are locked independently and no task holds both
//! locks at once.

use cell_economy::{Economy, ResourceView};
use cell_world::{Dish, Viewport};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

pub type Shared<T> = Arc<Mutex<T>>;

fn fixed_interval(period: Duration) -> tokio::time::Interval {
    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Tick the economy every `period` until cancelled. Returns the tick count.
#[instrument(skip_all, fields(period_ms = period.as_millis() as u64))]
pub async fn run_economy(economy: Shared<Economy>, period: Duration, cancel: CancellationToken) -> u64 {
    let mut interval = fixed_interval(period);
    let mut ticks = 0u64;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let report = economy.lock().tick();
                ticks += 1;
                if report.withdrawals_failed > 0 {
                    debug!(
                        tick = ticks,
                        withdrawals_failed = report.withdrawals_failed,
                        "Economy tick ran short"
                    );
                }
            }
        }
    }

    info!(ticks, "Economy loop stopped");
    ticks
}

/// Run organism think steps every `period` until cancelled. Returns the step count.
#[instrument(skip_all, fields(period_ms = period.as_millis() as u64))]
pub async fn run_dish(dish: Shared<Dish>, period: Duration, cancel: CancellationToken) -> u64 {
    let mut interval = fixed_interval(period);
    let mut steps = 0u64;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                dish.lock().think();
                steps += 1;
            }
        }
    }

    info!(steps, "Dish loop stopped");
    steps
}

pub fn format_resource_line(resource: &ResourceView) -> String {
    format!(
        "{} ({}): {:.2} @ {:.2}/s",
        resource.name, resource.ticker, resource.amount, resource.rate
    )
}

/// Read-only reporting loop standing in for a renderer
#[instrument(skip_all, fields(period_ms = period.as_millis() as u64))]
pub async fn run_status(
    economy: Shared<Economy>,
    dish: Shared<Dish>,
    mut viewport: Viewport,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = fixed_interval(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let snapshot = economy.lock().snapshot();
                for resource in &snapshot.resources {
                    info!("{}", format_resource_line(resource));
                }
                for organelle in snapshot.organelles.iter().filter(|o| o.count > 0) {
                    debug!(organelle = %organelle.name, count = organelle.count, "Owned");
                }

                let (organisms, food, followed) = {
                    let dish = dish.lock();
                    viewport.sync(&dish);
                    let followed = viewport
                        .following()
                        .and_then(|id| dish.organism(id))
                        .map(|o| o.position);
                    (dish.organisms().count(), dish.food().len(), followed)
                };
                match followed {
                    Some(position) => debug!(
                        organisms,
                        food,
                        row = position.row,
                        col = position.col,
                        screen = ?viewport.to_screen(position),
                        "Dish status"
                    ),
                    None => debug!(organisms, food, "Dish status"),
                }
            }
        }
    }
}
