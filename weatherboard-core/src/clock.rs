//! Live clock for the board header.

use std::{fmt, time::Duration};

use chrono::{DateTime, TimeZone, Utc};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

pub const TICK: Duration = Duration::from_secs(1);

/// Publish the current time in `zone` every `period`.
///
/// The task ends once every receiver has been dropped.
pub fn spawn_clock<Z>(zone: Z, period: Duration) -> (watch::Receiver<DateTime<Z>>, JoinHandle<()>)
where
    Z: TimeZone + Send + Sync + 'static,
    Z::Offset: Send + Sync,
{
    let (tx, rx) = watch::channel(Utc::now().with_timezone(&zone));

    let handle = tokio::spawn(async move {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if tx.send(Utc::now().with_timezone(&zone)).is_err() {
                break;
            }
        }
    });

    (rx, handle)
}

/// 24-hour `HH:MM`.
pub fn format_time<Z>(now: &DateTime<Z>) -> String
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    now.format("%H:%M").to_string()
}

/// e.g. `Fri, Oct 16, 2026`.
pub fn format_date<Z>(now: &DateTime<Z>) -> String
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    now.format("%a, %b %d, %Y").to_string()
}
