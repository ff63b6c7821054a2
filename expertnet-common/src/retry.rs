use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// A fixed number of attempts separated by a fixed delay. No jitter and no backoff.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(5, Duration::from_secs(1))
    }
}

/// Cloneable handle that stops a `poll_until_some` loop. Cancelling any clone cancels
/// them all.
#[derive(Clone, Debug)]
pub struct Cancellation {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl Cancellation {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);

        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once `cancel` has been called.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `operation` until it yields `Some`, at most `policy.max_attempts` times,
/// sleeping `policy.delay` between attempts. The operation receives the 1-based attempt
/// number. Gives `None` when attempts run out or `cancellation` fires.
pub async fn poll_until_some<T, F, Fut>(
    policy: RetryPolicy,
    cancellation: &Cancellation,
    mut operation: F,
) -> Option<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for attempt in 1..=policy.max_attempts {
        if cancellation.is_cancelled() {
            return None;
        }

        let result = tokio::select! {
            biased;
            _ = cancellation.cancelled() => return None,
            result = operation(attempt) => result,
        };

        if result.is_some() {
            return result;
        }

        if attempt == policy.max_attempts {
            break;
        }

        log::debug!(
            "Attempt {}/{} found nothing, retrying in {:?}",
            attempt,
            policy.max_attempts,
            policy.delay
        );

        tokio::select! {
            biased;
            _ = cancellation.cancelled() => return None,
            _ = tokio::time::sleep(policy.delay) => {}
        }
    }

    None
}
