//! Auto-close timer
//!
//! A single-shot Tokio task that calls `on_fire` after a fixed delay unless
//! its [`CancellationToken`] is cancelled first. Cancelling is best-effort:
//! if the delay already elapsed the callback still runs, and the
//! coordinator's finalize guard turns it into a no-op.

use plenary_domain::AutoCloseHandle;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct AutoCloseTimer {
    token: CancellationToken,
}

impl AutoCloseTimer {
    /// Spawn the timer task on the current Tokio runtime
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn start<F>(duration: Duration, on_fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    debug!("Auto-close timer cancelled");
                }
                _ = tokio::time::sleep(duration) => {
                    debug!("Auto-close timer fired after {:?}", duration);
                    on_fire();
                }
            }
        });

        Self { token }
    }
}

impl AutoCloseHandle for AutoCloseTimer {
    fn cancel(&self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_duration() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let _timer = AutoCloseTimer::start(Duration::from_secs(30), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let timer = AutoCloseTimer::start(Duration::from_secs(30), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(10)).await;
        timer.cancel();
        assert!(timer.token.is_cancelled());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
