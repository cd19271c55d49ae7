//! ClipNote coordinator host — newline-delimited JSON over stdin/stdout
//! for shell integration.
//!
//! Protocol: one JSON object per line.
//! Request:  {"id":1, "sender":{"context":"popup"}, "action":"GET_SESSION", ...}
//! Frame:    {"id":2, "frame":{"tab_id":"t1", "png":"<base64>"}}
//! Response: {"id":1, "success":true, "data":{...}} or {"id":1, "success":false, "error":"..."}
//!
//! The shell pushes the latest visible frame per tab; those frames back
//! the screenshot source for capture flows. Page-bound messages and
//! injection requests are emitted as `event` lines for the shell to act
//! on. Unknown actions are ignored, never answered with an error.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};

use clipnote::app::{App, AppDeps};
use clipnote::services::backend_client::HttpNoteBackend;
use clipnote::services::identity::{AuthFlow, HttpIdentityProvider, IdentityConfig};
use clipnote::services::page_bridge::PageTransport;
use clipnote::services::screenshot::FrameCache;
use clipnote::types::errors::{DeliveryError, SessionError};
use clipnote::types::manifest::ExtensionManifest;
use clipnote::types::message::{
    ContextKind, MessageSender, PageMessage, PageReply, Request, Response,
};

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self {
            window_start: Instant::now(),
            request_count: 0,
            max_per_second,
        }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

/// Host configuration, read from `host.json` in the config directory.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct HostConfig {
    db_path: Option<String>,
    backend_base_url: String,
    auth_endpoint: String,
    token_endpoint: String,
    client_id: String,
    redirect_uri: String,
    manifest_path: Option<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            backend_base_url: "https://api.clipnote.app".to_string(),
            auth_endpoint: "https://auth.clipnote.app/authorize".to_string(),
            token_endpoint: "https://auth.clipnote.app/token".to_string(),
            client_id: "clipnote-extension".to_string(),
            redirect_uri: "https://app.clipnote.app/auth/callback".to_string(),
            manifest_path: None,
        }
    }
}

impl HostConfig {
    fn load() -> Self {
        let path = clipnote::platform::get_config_dir().join("host.json");
        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "malformed host config, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}

/// Packaged manifest fallback when no manifest file is configured.
const DEFAULT_MANIFEST: &str = r#"{
  "name": "ClipNote",
  "version": "0.2.0",
  "content_scripts": [
    { "matches": ["<all_urls>"], "js": ["content/clipper.js", "content/overlay_host.js"] }
  ]
}"#;

fn load_manifest(config: &HostConfig) -> ExtensionManifest {
    let raw = config
        .manifest_path
        .as_ref()
        .and_then(|p| std::fs::read_to_string(p).ok());
    let raw = raw.as_deref().unwrap_or(DEFAULT_MANIFEST);
    ExtensionManifest::parse(raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "malformed manifest, using packaged default");
        ExtensionManifest::parse(DEFAULT_MANIFEST).expect("packaged manifest is valid")
    })
}

/// Page transport that hands page-bound messages to the embedding shell
/// as `event` lines. Delivery is fire-and-forget from the host's side;
/// the shell owns the tab and performs the actual injection.
struct StdioPageTransport;

#[async_trait]
impl PageTransport for StdioPageTransport {
    async fn deliver(
        &self,
        tab_id: &str,
        message: &PageMessage,
    ) -> Result<PageReply, DeliveryError> {
        println!(
            "{}",
            json!({"event": "page", "tab_id": tab_id, "message": message})
        );
        Ok(PageReply::Ack {
            status: "sent".to_string(),
        })
    }

    async fn inject_scripts(&self, tab_id: &str, files: &[String]) -> Result<(), DeliveryError> {
        println!(
            "{}",
            json!({"event": "inject", "tab_id": tab_id, "files": files})
        );
        Ok(())
    }
}

/// Interactive login needs the browser shell; the host cannot open the
/// system auth flow itself.
struct ShellAuthFlow;

#[async_trait]
impl AuthFlow for ShellAuthFlow {
    async fn launch(&self, _auth_url: &str) -> Result<String, SessionError> {
        Err(SessionError::AuthFailed(
            "interactive login requires the browser shell".to_string(),
        ))
    }
}

#[derive(Deserialize)]
struct FramePush {
    tab_id: String,
    png: String,
}

fn parse_sender(value: &Value) -> MessageSender {
    value
        .get("sender")
        .cloned()
        .and_then(|s| serde_json::from_value(s).ok())
        .unwrap_or(MessageSender {
            context: ContextKind::External,
            tab_id: None,
        })
}

fn respond(id: Value, response: &Response) {
    let mut line = serde_json::to_value(response).unwrap_or_else(|_| json!({"success": false}));
    if let Some(obj) = line.as_object_mut() {
        obj.insert("id".to_string(), id);
    }
    println!("{}", line);
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("clipnote=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = HostConfig::load();
    let db_path = match (&config.db_path, std::env::var("CLIPNOTE_DATA_DIR")) {
        (Some(path), _) => std::path::PathBuf::from(path),
        (None, Ok(dir)) => std::path::PathBuf::from(dir).join("clipnote.db"),
        (None, Err(_)) => clipnote::platform::get_data_dir().join("clipnote.db"),
    };
    if let Some(parent) = db_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let frames = Arc::new(FrameCache::new());
    let manifest = load_manifest(&config);
    let deps = AppDeps {
        transport: Arc::new(StdioPageTransport),
        screen: frames.clone(),
        backend: Arc::new(HttpNoteBackend::new(config.backend_base_url.clone())),
        provider: Arc::new(HttpIdentityProvider::new(IdentityConfig {
            auth_endpoint: config.auth_endpoint.clone(),
            token_endpoint: config.token_endpoint.clone(),
            client_id: config.client_id.clone(),
            redirect_uri: config.redirect_uri.clone(),
        })),
        flow: Arc::new(ShellAuthFlow),
        manifest,
    };

    let app = App::new(db_path.to_str().unwrap_or("clipnote.db"), deps)
        .expect("Failed to initialize ClipNote coordinator");
    app.startup();

    // Signal ready
    println!(
        "{}",
        json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})
    );

    // Max 200 requests per second to keep a misbehaving shell from
    // flooding the coordinator.
    let mut rate_limiter = RateLimiter::new(200);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }

        let value: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                println!("{}", json!({"id": null, "success": false, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            println!("{}", json!({"id": id, "success": false, "error": "rate limit exceeded"}));
            continue;
        }

        // Shell frame pushes back the screenshot source.
        if let Some(frame) = value.get("frame") {
            let response = match serde_json::from_value::<FramePush>(frame.clone()) {
                Ok(push) => match BASE64.decode(&push.png) {
                    Ok(bytes) => match frames.push_frame(&push.tab_id, &bytes) {
                        Ok(()) => Response::ok_empty(),
                        Err(e) => Response::err(e),
                    },
                    Err(e) => Response::err(e),
                },
                Err(e) => Response::err(e),
            };
            respond(id, &response);
            continue;
        }

        let sender = parse_sender(&value);
        let Some(request) = Request::decode(value) else {
            // Unknown action: ignored, never raised.
            tracing::debug!(%line, "ignoring unknown or malformed request");
            continue;
        };

        let response = app.router.handle(request, &sender).await;
        respond(id, &response);
    }
}
