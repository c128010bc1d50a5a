//! Cancellation token minted for every dashboard load

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use uuid::Uuid;

struct Inner {
    id: Uuid,
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cheap to clone; every sub-fetch of a load holds one
#[derive(Clone)]
pub struct LoadToken {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for LoadToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadToken")
            .field("id", &self.inner.id)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl LoadToken {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                id: Uuid::new_v4(),
                cancelled: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Resolves once `cancel` has been called
    pub async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel can't be missed
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Drive `fut` unless the token is cancelled first; `None` means abandoned
    pub async fn run_until_cancelled<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.cancelled() => None,
            output = fut => Some(output),
        }
    }
}

impl Default for LoadToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(LoadToken::new().id(), LoadToken::new().id());
    }

    #[tokio::test]
    async fn test_cancel_abandons_pending_future() {
        let token = LoadToken::new();
        let canceller = token.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let result = token.run_until_cancelled(std::future::pending::<()>()).await;
        assert!(result.is_none());
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_completed_future_wins_before_cancel() {
        let token = LoadToken::new();
        assert_eq!(token.run_until_cancelled(async { 7 }).await, Some(7));

        token.cancel();
        assert_eq!(token.run_until_cancelled(async { 7 }).await, None);
    }
}
