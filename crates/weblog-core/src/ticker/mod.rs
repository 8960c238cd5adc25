use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::state::Dashboard;

/// Drive `dashboard` with one tick per `period` until `token` is cancelled.
///
/// Ticks run on the spawned task one after another, so a slow tick delays the
/// next one instead of overlapping it.
pub fn spawn_ticker(
    dashboard: Dashboard,
    period: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(period_ms = period.as_millis() as u64, "ticker started");

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = timer.tick() => {
                    let report = dashboard.tick();
                    if report.events > 0 {
                        debug!(seq = report.seq, events = report.events, "ticker applied batch");
                    }
                }
            }
        }

        // Apply whatever arrived before shutdown.
        let report = dashboard.tick();
        info!(seq = report.seq, "ticker stopped");
    })
}
