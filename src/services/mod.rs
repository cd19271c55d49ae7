// ClipNote services
// Services provide cross-context plumbing: page delivery, screenshots,
// the session relay and its external sync, the backend thin client, and
// the content-script context itself.

pub mod backend_client;
pub mod identity;
pub mod page_bridge;
pub mod page_context;
pub mod screenshot;
pub mod session_relay;
pub mod session_sync;
