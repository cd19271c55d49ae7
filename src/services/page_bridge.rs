//! Message delivery into pages, with injection-and-retry.
//!
//! Direct delivery fails with "receiving end does not exist" when the
//! content script never loaded into the tab. The bridge recovers once:
//! it reads the script file list from the extension's own manifest,
//! injects those files, waits a fixed settle delay for top-level listener
//! registration, and retries the delivery exactly once.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::types::errors::DeliveryError;
use crate::types::manifest::ExtensionManifest;
use crate::types::message::{PageMessage, PageReply};

/// Fixed settle delay after injection. The injected scripts expose no
/// readiness acknowledgment, so this is a wait, not a poll.
pub const INJECTION_SETTLE: Duration = Duration::from_millis(500);

/// The browser-side delivery primitives, injectable so tests substitute
/// fakes without touching process-wide state.
#[async_trait]
pub trait PageTransport: Send + Sync {
    /// Attempts direct delivery to the tab's content script.
    async fn deliver(&self, tab_id: &str, message: &PageMessage)
        -> Result<PageReply, DeliveryError>;
    /// Injects the given script files into the tab.
    async fn inject_scripts(&self, tab_id: &str, files: &[String]) -> Result<(), DeliveryError>;
}

/// Delivery into pages with the one-shot injection recovery.
pub struct PageBridge {
    transport: Arc<dyn PageTransport>,
    manifest: ExtensionManifest,
    settle: Duration,
}

impl PageBridge {
    pub fn new(transport: Arc<dyn PageTransport>, manifest: ExtensionManifest) -> Self {
        Self {
            transport,
            manifest,
            settle: INJECTION_SETTLE,
        }
    }

    /// Overrides the settle delay. Tests use this to avoid real waits.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Sends a message into a tab.
    ///
    /// On a missing receiver, injects the manifest's content scripts,
    /// waits the settle delay, and retries exactly once. Injection
    /// failure and a second delivery failure both propagate.
    pub async fn send(
        &self,
        tab_id: &str,
        message: &PageMessage,
    ) -> Result<PageReply, DeliveryError> {
        match self.transport.deliver(tab_id, message).await {
            Err(DeliveryError::NoReceiver(_)) => {
                tracing::warn!(tab_id, "content script missing, injecting and retrying");
                let files = self.manifest.content_script_files();
                self.transport.inject_scripts(tab_id, &files).await?;
                tokio::time::sleep(self.settle).await;
                self.transport.deliver(tab_id, message).await
            }
            other => other,
        }
    }
}
