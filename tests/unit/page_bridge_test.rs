//! Unit tests for page delivery: the injection-and-retry recovery, its
//! one-retry bound, and error propagation.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use clipnote::services::page_bridge::{PageBridge, PageTransport};
use clipnote::types::errors::DeliveryError;
use clipnote::types::manifest::ExtensionManifest;
use clipnote::types::message::{PageMessage, PageReply};

const MANIFEST_JSON: &str = r#"{
  "name": "ClipNote",
  "version": "0.2.0",
  "content_scripts": [
    { "matches": ["<all_urls>"], "js": ["content/clipper.js", "content/overlay_host.js"] }
  ]
}"#;

fn manifest() -> ExtensionManifest {
    ExtensionManifest::parse(MANIFEST_JSON).unwrap()
}

fn ack() -> PageReply {
    PageReply::Ack {
        status: "ok".to_string(),
    }
}

/// Scripted transport: pops a pre-seeded result per delivery attempt and
/// records every injection.
struct ScriptedTransport {
    deliveries: Mutex<VecDeque<Result<PageReply, DeliveryError>>>,
    delivery_attempts: Mutex<usize>,
    injections: Mutex<Vec<Vec<String>>>,
    inject_result: Mutex<Option<DeliveryError>>,
}

impl ScriptedTransport {
    fn new(deliveries: Vec<Result<PageReply, DeliveryError>>) -> Self {
        Self {
            deliveries: Mutex::new(deliveries.into()),
            delivery_attempts: Mutex::new(0),
            injections: Mutex::new(Vec::new()),
            inject_result: Mutex::new(None),
        }
    }

    fn failing_injection(self, error: DeliveryError) -> Self {
        *self.inject_result.lock().unwrap() = Some(error);
        self
    }

    fn attempts(&self) -> usize {
        *self.delivery_attempts.lock().unwrap()
    }

    fn injections(&self) -> Vec<Vec<String>> {
        self.injections.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageTransport for ScriptedTransport {
    async fn deliver(
        &self,
        _tab_id: &str,
        _message: &PageMessage,
    ) -> Result<PageReply, DeliveryError> {
        *self.delivery_attempts.lock().unwrap() += 1;
        self.deliveries
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ack()))
    }

    async fn inject_scripts(&self, _tab_id: &str, files: &[String]) -> Result<(), DeliveryError> {
        self.injections.lock().unwrap().push(files.to_vec());
        match self.inject_result.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn bridge(transport: Arc<ScriptedTransport>) -> PageBridge {
    PageBridge::new(transport, manifest()).with_settle(Duration::from_millis(1))
}

#[tokio::test]
async fn direct_delivery_skips_injection() {
    let transport = Arc::new(ScriptedTransport::new(vec![Ok(ack())]));
    let bridge = bridge(transport.clone());

    let reply = bridge.send("tab-1", &PageMessage::StartCapture).await.unwrap();
    assert_eq!(reply, ack());
    assert_eq!(transport.attempts(), 1);
    assert!(transport.injections().is_empty());
}

#[tokio::test]
async fn missing_receiver_injects_and_retries_once() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Err(DeliveryError::NoReceiver("tab-1".to_string())),
        Ok(ack()),
    ]));
    let bridge = bridge(transport.clone());

    let reply = bridge.send("tab-1", &PageMessage::StartCapture).await.unwrap();
    assert_eq!(reply, ack());
    assert_eq!(transport.attempts(), 2);

    // The injected files are the manifest's content scripts, in order.
    assert_eq!(
        transport.injections(),
        vec![vec![
            "content/clipper.js".to_string(),
            "content/overlay_host.js".to_string()
        ]]
    );
}

#[tokio::test]
async fn second_delivery_failure_propagates_as_final() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Err(DeliveryError::NoReceiver("tab-1".to_string())),
        Err(DeliveryError::NoReceiver("tab-1".to_string())),
    ]));
    let bridge = bridge(transport.clone());

    let err = bridge
        .send("tab-1", &PageMessage::StartCapture)
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::NoReceiver(_)));
    // Retries at most once: exactly two attempts, one injection.
    assert_eq!(transport.attempts(), 2);
    assert_eq!(transport.injections().len(), 1);
}

#[tokio::test]
async fn injection_failure_propagates_without_retry() {
    let transport = Arc::new(
        ScriptedTransport::new(vec![Err(DeliveryError::NoReceiver("tab-1".to_string()))])
            .failing_injection(DeliveryError::Injection("blocked page".to_string())),
    );
    let bridge = bridge(transport.clone());

    let err = bridge
        .send("tab-1", &PageMessage::StartCapture)
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::Injection(_)));
    assert_eq!(transport.attempts(), 1, "no retry after failed injection");
}

#[tokio::test]
async fn transport_errors_do_not_trigger_injection() {
    let transport = Arc::new(ScriptedTransport::new(vec![Err(
        DeliveryError::Transport("channel closed".to_string()),
    )]));
    let bridge = bridge(transport.clone());

    let err = bridge
        .send("tab-1", &PageMessage::StartCapture)
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::Transport(_)));
    assert!(transport.injections().is_empty());
}
