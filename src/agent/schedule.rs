//! Periodic news posting driven by a cron expression.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use cron::Schedule;
use tokio::task::JoinHandle;

use crate::agent::bot::Bot;

/// The slot to wait for after `last_fire`.
///
/// Slots are counted from the previous fire, not from the wall clock, so a
/// clock running behind the timer never yields the slot that just fired.
/// Slots already in the past relative to `now` are skipped.
pub fn next_fire<Tz: TimeZone>(
    schedule: &Schedule,
    last_fire: &DateTime<Tz>,
    now: &DateTime<Tz>,
) -> Option<DateTime<Tz>> {
    let next = schedule.after(last_fire).next()?;
    if next < *now {
        return schedule.after(now).next();
    }
    Some(next)
}

/// Time from `now` until `target`, zero if it has already passed.
pub fn delay_until<Tz: TimeZone>(target: &DateTime<Tz>, now: &DateTime<Tz>) -> Duration {
    (target.clone() - now.clone()).to_std().unwrap_or(Duration::ZERO)
}

/// Fire `post_news` on every schedule tick, in local time.
///
/// Each tick runs on its own task so a slow cycle never delays the next
/// tick. The ticker stops when the schedule has no further fire times or
/// the handle is aborted.
pub fn spawn_news_ticker(bot: Arc<Bot>, schedule: Schedule) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_fire = Local::now();
        loop {
            let now = Local::now();
            let Some(fire_at) = next_fire(&schedule, &last_fire, &now) else {
                tracing::warn!("News schedule has no upcoming fire time, stopping ticker");
                return;
            };
            tokio::time::sleep(delay_until(&fire_at, &now)).await;
            last_fire = fire_at;

            tracing::info!(slot = %last_fire, "Scheduled news cycle");
            let bot = Arc::clone(&bot);
            tokio::spawn(async move { bot.post_news().await });
        }
    })
}
