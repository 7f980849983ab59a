//! Settle port: the pause between commanding a change and reading it back.

use std::future::Future;
use std::time::Duration;

/// Waits for a physical device to reflect a commanded change.
///
/// This is a single bounded pause, not a poll or a retry loop.
pub trait Settle: Send + Sync {
    fn settle(&self, delay: Duration) -> impl Future<Output = ()> + Send;
}

/// [`Settle`] backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSettle;

impl Settle for TokioSettle {
    async fn settle(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
