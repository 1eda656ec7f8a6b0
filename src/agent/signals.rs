//! Process shutdown signals.

use std::fmt;
use std::future::Future;

/// Signals that end the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Hangup,
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownSignal::Interrupt => write!(f, "SIGINT"),
            ShutdownSignal::Hangup => write!(f, "SIGHUP"),
            ShutdownSignal::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// Register handlers for SIGINT, SIGHUP and SIGTERM.
///
/// Registration happens before this returns, so a signal delivered after
/// the call is never lost. The returned future resolves with the first one.
#[cfg(unix)]
pub fn install() -> std::io::Result<impl Future<Output = ShutdownSignal> + Send + 'static> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut hangup = signal(SignalKind::hangup())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => ShutdownSignal::Interrupt,
            _ = hangup.recv() => ShutdownSignal::Hangup,
            _ = terminate.recv() => ShutdownSignal::Terminate,
        }
    })
}

#[cfg(not(unix))]
pub fn install() -> std::io::Result<impl Future<Output = ShutdownSignal> + Send + 'static> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
        ShutdownSignal::Interrupt
    })
}
