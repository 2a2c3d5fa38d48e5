//! Messages between the signal listener and the main loop.

use anyhow::{Context, Result};
use cradle_channel::Channel;
use tokio::signal;
use tracing::{debug, warn};

/// What the main loop is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Read the document again into a fresh cycle.
    Reload,
    /// Stop, naming the signal that asked for it.
    Shutdown { signal: &'static str },
}

impl Control {
    #[must_use]
    pub const fn is_shutdown(self) -> bool {
        matches!(self, Self::Shutdown { .. })
    }
}

/// Forwards process signals into `channel` until a shutdown has been sent or the
/// main loop has gone away.
///
/// # Errors
/// Fails if a signal handler cannot be installed.
pub async fn listen(channel: Channel<Control>) -> Result<()> {
    let mut signals = Signals::install()?;
    loop {
        let control = signals.next().await;
        debug!(?control, "Signal received");
        if channel.push(control).await.is_err() {
            warn!(?control, "Main loop is gone; dropping signal");
            return Ok(());
        }
        if control.is_shutdown() {
            return Ok(());
        }
    }
}

#[cfg(unix)]
#[derive(Debug)]
struct Signals {
    terminate: signal::unix::Signal,
    hangup: signal::unix::Signal,
}

#[cfg(unix)]
impl Signals {
    fn install() -> Result<Self> {
        use signal::unix::{SignalKind, signal};

        let terminate =
            signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
        let hangup = signal(SignalKind::hangup()).context("Failed to install SIGHUP handler")?;
        Ok(Self { terminate, hangup })
    }

    async fn next(&mut self) -> Control {
        tokio::select! {
            res = signal::ctrl_c() => {
                if let Err(err) = res {
                    warn!(error = %err, "Ctrl+C handler failed");
                }
                Control::Shutdown { signal: "SIGINT" }
            },
            _ = self.terminate.recv() => Control::Shutdown { signal: "SIGTERM" },
            _ = self.hangup.recv() => Control::Reload,
        }
    }
}

#[cfg(not(unix))]
#[derive(Debug)]
struct Signals;

#[cfg(not(unix))]
impl Signals {
    #[allow(clippy::unnecessary_wraps)]
    const fn install() -> Result<Self> {
        Ok(Self)
    }

    async fn next(&mut self) -> Control {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Ctrl+C handler failed");
        }
        Control::Shutdown { signal: "SIGINT" }
    }
}
