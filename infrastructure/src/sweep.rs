//! Periodic phase sweeper
//!
//! Runs the engine's sweep on a fixed interval until cancelled. Each pass is
//! awaited before the next tick, so passes never overlap.

use agora_application::DeliberationEngine;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct PhaseSweeper {
    engine: DeliberationEngine,
    interval: Duration,
}

impl PhaseSweeper {
    pub fn new(engine: DeliberationEngine, interval: Duration) -> Self {
        Self { engine, interval }
    }

    /// Spawn the sweep loop; it stops when `cancel` fires
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<u64> {
        tokio::spawn(self.run(cancel))
    }

    /// Sweep every interval until `cancel` fires; returns the number of passes
    pub async fn run(self, cancel: CancellationToken) -> u64 {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut passes = 0;

        info!(interval_secs = self.interval.as_secs(), "Phase sweeper started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    passes += 1;
                    match self.engine.sweep().await {
                        Ok(report) => debug!(
                            pass = passes,
                            checked = report.checked,
                            transitions = report.transitions.len(),
                            "Sweep pass"
                        ),
                        Err(e) => warn!(pass = passes, error = %e, "Sweep pass failed"),
                    }
                }
            }
        }
        info!(passes, "Phase sweeper stopped");
        passes
    }
}
