//! External session sync.
//!
//! A companion surface outside the extension pushes a fresh session in
//! through the page. Delivery timing is not guaranteed, so the sender
//! retries on a fixed interval inside a bounded wall-clock window and
//! stops at the first acknowledgment; after the window it gives up
//! silently.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::types::message::{Request, Response};
use crate::types::session::Session;

/// How often the sender re-pushes an unacknowledged session.
pub const SYNC_RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// How long the sender keeps trying before giving up.
pub const SYNC_RETRY_WINDOW: Duration = Duration::from_secs(5);

/// How a page-side component reaches the background coordinator.
#[async_trait]
pub trait CoordinatorPort: Send + Sync {
    async fn send(&self, request: Request) -> Response;
}

/// The sender half of the sync handshake.
pub struct SessionSyncSender {
    port: Arc<dyn CoordinatorPort>,
    interval: Duration,
    window: Duration,
}

impl SessionSyncSender {
    pub fn new(port: Arc<dyn CoordinatorPort>) -> Self {
        Self {
            port,
            interval: SYNC_RETRY_INTERVAL,
            window: SYNC_RETRY_WINDOW,
        }
    }

    /// Overrides the retry timing. Tests use this to avoid real waits.
    pub fn with_timing(mut self, interval: Duration, window: Duration) -> Self {
        self.interval = interval;
        self.window = window;
        self
    }

    /// Pushes the session until the coordinator acknowledges it.
    ///
    /// Returns `true` on acknowledgment. Once the window closes the loop
    /// gives up silently and returns `false`.
    pub async fn push_until_acked(&self, session: Session) -> bool {
        let deadline = Instant::now() + self.window;
        loop {
            let response = self
                .port
                .send(Request::SyncSession {
                    session: session.clone(),
                })
                .await;
            if response.success {
                return true;
            }
            if Instant::now() + self.interval > deadline {
                return false;
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}
