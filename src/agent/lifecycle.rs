//! Bot lifecycle controller.
//!
//! Disconnected → Connecting → Subscribed → Terminating. Connect and
//! subscribe failures are fatal. Once subscribed, the controller spawns one
//! task per inbound event and runs until a shutdown signal arrives, then
//! posts a farewell and returns the signal that ended it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use cron::Schedule;
use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::agent::bot::Bot;
use crate::agent::messages::{STARTUP, farewell};
use crate::agent::schedule::spawn_news_ticker;
use crate::agent::signals::ShutdownSignal;
use crate::config::DEFAULT_FAREWELL_WAIT;
use crate::error::{Error, RelayError};
use crate::relay::Relay;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Disconnected,
    Connecting,
    Subscribed,
    Terminating,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Disconnected => write!(f, "disconnected"),
            LifecycleState::Connecting => write!(f, "connecting"),
            LifecycleState::Subscribed => write!(f, "subscribed"),
            LifecycleState::Terminating => write!(f, "terminating"),
        }
    }
}

/// Aborts the wrapped task when dropped.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

pub struct Lifecycle {
    relay: Arc<dyn Relay>,
    bot: Arc<Bot>,
    schedule: Option<Schedule>,
    farewell_wait: Duration,
    state_tx: watch::Sender<LifecycleState>,
}

impl Lifecycle {
    pub fn new(relay: Arc<dyn Relay>, bot: Arc<Bot>) -> Self {
        let (state_tx, _) = watch::channel(LifecycleState::Disconnected);
        Self {
            relay,
            bot,
            schedule: None,
            farewell_wait: DEFAULT_FAREWELL_WAIT,
            state_tx,
        }
    }

    /// Post news on this schedule while subscribed.
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Longest time the farewell publish may take before shutdown proceeds.
    pub fn with_farewell_wait(mut self, wait: Duration) -> Self {
        self.farewell_wait = wait;
        self
    }

    /// Observe state transitions.
    pub fn watch_state(&self) -> watch::Receiver<LifecycleState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> LifecycleState {
        *self.state_tx.borrow()
    }

    fn transition(&self, next: LifecycleState) {
        let prev = self.state_tx.send_replace(next);
        tracing::info!(from = %prev, to = %next, "Lifecycle transition");
    }

    /// Run until shutdown.
    ///
    /// `install_shutdown` registers signal handlers and returns the future
    /// that resolves on the first signal. It is called after the startup
    /// post and before the subscription starts.
    pub async fn run<F, Fut>(self, install_shutdown: F) -> Result<ShutdownSignal, Error>
    where
        F: FnOnce() -> std::io::Result<Fut>,
        Fut: Future<Output = ShutdownSignal> + Send,
    {
        self.transition(LifecycleState::Connecting);
        tracing::info!(relay = %self.relay.address(), "Connecting to relay");
        self.relay.connect().await?;

        self.bot.emitter().post(STARTUP).await;

        let _ticker = self
            .schedule
            .clone()
            .map(|schedule| AbortOnDrop(spawn_news_ticker(Arc::clone(&self.bot), schedule)));

        let shutdown = install_shutdown()?;
        tokio::pin!(shutdown);

        let mut events = self.relay.subscribe().await?;
        self.transition(LifecycleState::Subscribed);

        let bot = Arc::clone(&self.bot);
        tokio::spawn(async move { bot.post_news().await });

        loop {
            tokio::select! {
                signal = &mut shutdown => {
                    self.transition(LifecycleState::Terminating);
                    tracing::info!(%signal, "Shutdown signal received");
                    let post = self.bot.emitter().post(farewell(signal));
                    if tokio::time::timeout(self.farewell_wait, post).await.is_err() {
                        tracing::warn!("Farewell post timed out");
                    }
                    return Ok(signal);
                }
                next = events.next() => {
                    let Some(event) = next else {
                        tracing::error!("Relay event stream ended");
                        return Err(RelayError::Closed.into());
                    };
                    let bot = Arc::clone(&self.bot);
                    tokio::spawn(async move {
                        bot.handle_event(&event).await;
                    });
                }
            }
        }
    }
}
