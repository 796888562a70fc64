//! Periodic clock for the application.
//!
//! Sends `Tick` with the real time elapsed since the previous one, so a
//! late wakeup still advances the world by the right amount.

use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{info, trace};

use crate::types::{AppRequest, AppTx};

pub async fn run_ticker(period: Duration, app_tx: AppTx) {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // The first tick completes immediately.
    interval.tick().await;
    let mut last = Instant::now();

    loop {
        interval.tick().await;
        let now = Instant::now();
        let elapsed = now.duration_since(last);
        last = now;

        if elapsed.is_zero() {
            continue;
        }
        trace!(?elapsed, "tick");
        if app_tx.send(AppRequest::Tick { elapsed }).is_err() {
            break;
        }
    }

    info!("ticker stopped (application task gone)");
}
