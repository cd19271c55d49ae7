//! The content-script context.
//!
//! One of these lives in every page the extension touches. It answers the
//! coordinator's pushed messages, drives the capture pipeline from
//! pointer events to the capture-area message, hosts the overlay frame,
//! and relays external session pushes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::capture::{DragOutcome, RegionSelector, SelectionPhase, SelectionSurface};
use crate::managers::overlay_manager::{OverlayHost, OverlayManager};
use crate::services::session_sync::CoordinatorPort;
use crate::types::message::{PageMessage, PageReply, Request, Response, SyncMessage};
use crate::types::note::PageMetadata;

/// The page the content script is embedded in.
pub trait PageDocument {
    fn metadata(&self) -> PageMetadata;
    fn selected_text(&self) -> String;
    fn page_url(&self) -> String;
    fn device_pixel_ratio(&self) -> f64;
}

/// Animation-frame waits.
///
/// The screenshot is not scoped to the selection overlay, so the pipeline
/// waits two rendered frames after removing its UI to guarantee the
/// overlay is out of the frame the screenshot will see.
#[async_trait]
pub trait FrameScheduler: Send + Sync {
    async fn next_frame(&self);
}

/// The per-page context: capture pipeline, overlay host, sync listener.
pub struct PageContext<D, H, S>
where
    D: PageDocument,
    H: OverlayHost,
    S: SelectionSurface,
{
    tab_id: String,
    document: D,
    overlay: OverlayManager<H>,
    selector: RegionSelector<S>,
    frames: Arc<dyn FrameScheduler>,
    port: Arc<dyn CoordinatorPort>,
}

impl<D, H, S> PageContext<D, H, S>
where
    D: PageDocument,
    H: OverlayHost,
    S: SelectionSurface,
{
    pub fn new(
        tab_id: impl Into<String>,
        document: D,
        overlay: OverlayManager<H>,
        selector: RegionSelector<S>,
        frames: Arc<dyn FrameScheduler>,
        port: Arc<dyn CoordinatorPort>,
    ) -> Self {
        Self {
            tab_id: tab_id.into(),
            document,
            overlay,
            selector,
            frames,
            port,
        }
    }

    /// Handles a message pushed in by the coordinator.
    pub fn handle_message(&mut self, message: PageMessage) -> PageReply {
        match message {
            PageMessage::StartCapture => {
                self.selector.arm();
                PageReply::Ack {
                    status: "capturing".to_string(),
                }
            }
            PageMessage::OpenOverlay { tab_id, mode } => {
                self.overlay.mount(&tab_id, mode);
                PageReply::Ack {
                    status: "open".to_string(),
                }
            }
            PageMessage::GetMetadata => PageReply::Metadata {
                page: self.document.metadata(),
            },
            PageMessage::GetSelection => PageReply::Selection {
                text: self.document.selected_text(),
            },
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.selector.pointer_down(x, y);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.selector.pointer_move(x, y);
    }

    /// Finalizes the drag.
    ///
    /// A usable region is converted to device pixels, the pipeline waits
    /// two animation frames so its UI is out of the rendered frame, and
    /// the capture-area message goes to the coordinator. Discarded drags
    /// send nothing and return `None`.
    pub async fn pointer_up(&mut self) -> Option<Response> {
        match self.selector.pointer_up() {
            DragOutcome::Selected(rect) => {
                let area = rect.to_device_pixels(self.document.device_pixel_ratio());
                self.frames.next_frame().await;
                self.frames.next_frame().await;
                Some(
                    self.port
                        .send(Request::CaptureArea {
                            tab_id: self.tab_id.clone(),
                            area,
                            page_url: self.document.page_url(),
                        })
                        .await,
                )
            }
            DragOutcome::Discarded => None,
        }
    }

    /// Escape routing: an in-progress selection wins; otherwise the
    /// overlay is torn down.
    pub fn escape(&mut self) {
        if self.selector.phase() != SelectionPhase::Idle {
            self.selector.cancel();
        } else {
            self.overlay.handle_escape();
        }
    }

    /// Handles the close signal posted by the embedded editor document.
    pub fn handle_overlay_close(&mut self) {
        self.overlay.handle_close_signal();
    }

    pub fn overlay_mounted(&self) -> bool {
        self.overlay.is_mounted()
    }

    /// Handles one message of the external sync handshake.
    ///
    /// A pushed session is forwarded to the coordinator; the ack that
    /// stops the sender's retry loop goes back only when the coordinator
    /// accepted it. Inbound acks are not ours to answer.
    pub async fn handle_sync(&self, message: SyncMessage) -> Option<SyncMessage> {
        match message {
            SyncMessage::SyncSession { session } => {
                let response = self.port.send(Request::SyncSession { session }).await;
                if response.success {
                    Some(SyncMessage::SyncAck)
                } else {
                    None
                }
            }
            SyncMessage::SyncAck => None,
        }
    }
}
