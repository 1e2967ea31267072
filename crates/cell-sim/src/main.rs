//! Headless runner for the cell idle simulation.

mod tasks;
mod telemetry;

use anyhow::Result;
use cell_core::{GameConfig, Position};
use cell_economy::Economy;
use cell_world::{Dish, Organism, Viewport};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::signal;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const CONFIG_ENV: &str = "CELL_SIM_CONFIG";

fn load_config() -> Result<GameConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            info!("Loading configuration from {}", path);
            Ok(GameConfig::from_json_file(&path)?)
        }
        Err(_) => {
            let config = GameConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    let config = load_config()?;
    info!(
        update_period_secs = config.economy.update_period_secs,
        think_period_secs = config.dish.think_period_secs,
        gate_policy = ?config.economy.gate_policy,
        "Starting cell simulation"
    );

    let economy = Arc::new(Mutex::new(Economy::builtin(config.economy.clone())?));

    let mut dish = Dish::new(&config.dish)?;
    let (height, width) = dish.bounds();
    let demo = dish.add_organism(
        Organism::new(Position::new(height / 2, width / 2), (1, 1)).wandering(),
    );
    let dish = Arc::new(Mutex::new(dish));

    let mut viewport = Viewport::new(24, 80);
    viewport.follow(demo);

    let cancel = CancellationToken::new();
    let economy_task = tokio::spawn(tasks::run_economy(
        economy.clone(),
        Duration::from_secs_f64(config.economy.update_period_secs),
        cancel.clone(),
    ));
    let dish_task = tokio::spawn(tasks::run_dish(
        dish.clone(),
        Duration::from_secs_f64(config.dish.think_period_secs),
        cancel.clone(),
    ));
    let status_task = tokio::spawn(tasks::run_status(
        economy.clone(),
        dish.clone(),
        viewport,
        Duration::from_secs_f64(config.report.status_period_secs),
        cancel.clone(),
    ));

    shutdown_signal().await;
    cancel.cancel();

    let timeout = tokio::time::sleep(Duration::from_secs(5));
    tokio::pin!(timeout);

    tokio::select! {
        (economy_ticks, dish_steps, status) = async {
            futures::join!(economy_task, dish_task, status_task)
        } => {
            if let Err(e) = status {
                warn!("Status task failed: {}", e);
            }
            info!(
                economy_ticks = economy_ticks.unwrap_or_default(),
                dish_steps = dish_steps.unwrap_or_default(),
                "All tasks stopped"
            );
        }
        _ = &mut timeout => {
            warn!("Shutdown timeout reached");
        }
    }

    let economy_snapshot = economy.lock().snapshot();
    let dish_snapshot = dish.lock().snapshot();
    info!(
        economy = %serde_json::to_string(&economy_snapshot)?,
        organisms = dish_snapshot.organisms.len(),
        food = dish_snapshot.food.len(),
        "Final state"
    );

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
