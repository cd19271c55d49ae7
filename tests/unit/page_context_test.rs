//! Unit tests for the content-script context: pushed-message handling,
//! the drag-to-capture-area path, Escape routing, and the sync handshake.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clipnote::capture::{RegionSelector, SelectionSurface};
use clipnote::managers::overlay_manager::{OverlayHost, OverlayManager};
use clipnote::services::page_context::{FrameScheduler, PageContext, PageDocument};
use clipnote::services::session_sync::CoordinatorPort;
use clipnote::types::capture::CaptureRect;
use clipnote::types::message::{PageMessage, PageReply, Request, Response, SyncMessage};
use clipnote::types::note::{NoteMode, PageMetadata};
use clipnote::types::session::Session;

struct FakeDocument;

impl PageDocument for FakeDocument {
    fn metadata(&self) -> PageMetadata {
        PageMetadata {
            title: "Example Article".to_string(),
            description: Some("An example".to_string()),
            preview_image: None,
            favicon: Some("https://example.com/favicon.ico".to_string()),
        }
    }
    fn selected_text(&self) -> String {
        "highlighted words".to_string()
    }
    fn page_url(&self) -> String {
        "https://example.com/article".to_string()
    }
    fn device_pixel_ratio(&self) -> f64 {
        2.0
    }
}

#[derive(Clone, Default)]
struct SharedHost(Arc<Mutex<(usize, usize)>>);

impl OverlayHost for SharedHost {
    fn mount_frame(&mut self, _tab_id: &str, _mode: NoteMode) {
        self.0.lock().unwrap().0 += 1;
    }
    fn unmount_frame(&mut self) {
        self.0.lock().unwrap().1 += 1;
    }
}

#[derive(Clone, Default)]
struct SharedSurface(Arc<Mutex<usize>>);

impl SelectionSurface for SharedSurface {
    fn begin(&mut self) {}
    fn update_box(&mut self, _rect: &CaptureRect) {}
    fn end(&mut self) {
        *self.0.lock().unwrap() += 1;
    }
}

#[derive(Default)]
struct CountingFrames(Mutex<usize>);

#[async_trait]
impl FrameScheduler for CountingFrames {
    async fn next_frame(&self) {
        *self.0.lock().unwrap() += 1;
    }
}

#[derive(Default)]
struct RecordingPort(Mutex<Vec<Request>>);

impl RecordingPort {
    fn requests(&self) -> Vec<Request> {
        self.0.lock().unwrap().clone()
    }
}

#[async_trait]
impl CoordinatorPort for RecordingPort {
    async fn send(&self, request: Request) -> Response {
        self.0.lock().unwrap().push(request);
        Response::ok_empty()
    }
}

struct Harness {
    context: PageContext<FakeDocument, SharedHost, SharedSurface>,
    host: SharedHost,
    surface: SharedSurface,
    frames: Arc<CountingFrames>,
    port: Arc<RecordingPort>,
}

fn harness() -> Harness {
    let host = SharedHost::default();
    let surface = SharedSurface::default();
    let frames = Arc::new(CountingFrames::default());
    let port = Arc::new(RecordingPort::default());
    let context = PageContext::new(
        "tab-9",
        FakeDocument,
        OverlayManager::new(host.clone()),
        RegionSelector::new(surface.clone()),
        frames.clone(),
        port.clone(),
    );
    Harness {
        context,
        host,
        surface,
        frames,
        port,
    }
}

#[test]
fn metadata_and_selection_come_from_the_document() {
    let mut h = harness();
    match h.context.handle_message(PageMessage::GetMetadata) {
        PageReply::Metadata { page } => assert_eq!(page.title, "Example Article"),
        other => panic!("expected metadata, got {:?}", other),
    }
    match h.context.handle_message(PageMessage::GetSelection) {
        PageReply::Selection { text } => assert_eq!(text, "highlighted words"),
        other => panic!("expected selection, got {:?}", other),
    }
}

#[test]
fn open_overlay_mounts_exactly_once() {
    let mut h = harness();
    h.context.handle_message(PageMessage::OpenOverlay {
        tab_id: "tab-9".to_string(),
        mode: NoteMode::Text,
    });
    h.context.handle_message(PageMessage::OpenOverlay {
        tab_id: "tab-9".to_string(),
        mode: NoteMode::Text,
    });
    assert!(h.context.overlay_mounted());
    assert_eq!(h.host.0.lock().unwrap().0, 1);
}

#[tokio::test]
async fn full_drag_posts_the_device_pixel_capture_area() {
    let mut h = harness();
    h.context.handle_message(PageMessage::StartCapture);
    h.context.pointer_down(100.0, 100.0);
    h.context.pointer_move(300.0, 250.0);
    let response = h.context.pointer_up().await;
    assert!(response.unwrap().success);

    // Two animation frames pass between surface removal and the message,
    // so the capture UI is out of the frame the screenshot will see.
    assert_eq!(*h.frames.0.lock().unwrap(), 2);

    let requests = h.port.requests();
    assert_eq!(requests.len(), 1);
    match &requests[0] {
        Request::CaptureArea {
            tab_id,
            area,
            page_url,
        } => {
            assert_eq!(tab_id, "tab-9");
            assert_eq!(page_url, "https://example.com/article");
            // Page rect (100,100)-(300,250) at devicePixelRatio 2.
            assert_eq!(
                area,
                &CaptureRect {
                    x: 200.0,
                    y: 200.0,
                    width: 400.0,
                    height: 300.0
                }
            );
        }
        other => panic!("expected a capture-area request, got {:?}", other),
    }
}

#[tokio::test]
async fn sub_minimum_drag_sends_nothing() {
    let mut h = harness();
    h.context.handle_message(PageMessage::StartCapture);
    h.context.pointer_down(100.0, 100.0);
    h.context.pointer_move(104.0, 109.0);
    assert!(h.context.pointer_up().await.is_none());
    assert!(h.port.requests().is_empty());
    assert_eq!(*h.frames.0.lock().unwrap(), 0, "no frame waits for a discard");
}

#[tokio::test]
async fn escape_prefers_the_active_selection() {
    let mut h = harness();
    h.context.handle_message(PageMessage::OpenOverlay {
        tab_id: "tab-9".to_string(),
        mode: NoteMode::Menu,
    });
    h.context.handle_message(PageMessage::StartCapture);
    h.context.pointer_down(0.0, 0.0);

    h.context.escape();
    assert!(h.context.overlay_mounted(), "overlay survives a capture cancel");
    assert_eq!(*h.surface.0.lock().unwrap(), 1, "selection surface torn down");
    assert!(h.context.pointer_up().await.is_none());

    h.context.escape();
    assert!(!h.context.overlay_mounted(), "second Escape closes the overlay");
}

#[test]
fn overlay_close_signal_tears_down_the_frame() {
    let mut h = harness();
    h.context.handle_message(PageMessage::OpenOverlay {
        tab_id: "tab-9".to_string(),
        mode: NoteMode::Menu,
    });
    h.context.handle_overlay_close();
    assert!(!h.context.overlay_mounted());
    assert_eq!(h.host.0.lock().unwrap().1, 1);
}

#[tokio::test]
async fn session_push_is_forwarded_and_acked() {
    let h = harness();
    let session = Session {
        access_token: "at".to_string(),
        refresh_token: "rt".to_string(),
        expires_at: 9_999_999_999,
    };
    let reply = h
        .context
        .handle_sync(SyncMessage::SyncSession {
            session: session.clone(),
        })
        .await;
    assert_eq!(reply, Some(SyncMessage::SyncAck));
    assert_eq!(
        h.port.requests(),
        vec![Request::SyncSession { session }]
    );
}

#[tokio::test]
async fn inbound_ack_is_not_answered() {
    let h = harness();
    assert!(h.context.handle_sync(SyncMessage::SyncAck).await.is_none());
    assert!(h.port.requests().is_empty());
}
