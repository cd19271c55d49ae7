//! Coordinator wiring for ClipNote.
//!
//! Central struct assembling the store, managers and services behind the
//! router. Every browser-facing collaborator comes in through
//! [`AppDeps`], so the whole coordinator runs against fakes in tests.

use std::sync::{Arc, Mutex};

use crate::managers::note_store::NoteStore;
use crate::managers::shortcut_manager::{ShortcutManager, ShortcutManagerTrait};
use crate::router::Router;
use crate::services::backend_client::NoteBackend;
use crate::services::identity::{AuthFlow, IdentityProvider};
use crate::services::page_bridge::{PageBridge, PageTransport};
use crate::services::screenshot::ScreenCapturer;
use crate::services::session_relay::SessionRelay;
use crate::storage::{Database, SlotKey, SlotStore};
use crate::types::manifest::ExtensionManifest;
use crate::types::shortcuts::ShortcutSettings;

/// The injectable collaborators the coordinator cannot provide itself.
pub struct AppDeps {
    pub transport: Arc<dyn PageTransport>,
    pub screen: Arc<dyn ScreenCapturer>,
    pub backend: Arc<dyn NoteBackend>,
    pub provider: Arc<dyn IdentityProvider>,
    pub flow: Arc<dyn AuthFlow>,
    pub manifest: ExtensionManifest,
}

/// Central coordinator struct.
pub struct App {
    pub slots: SlotStore,
    pub notes: NoteStore,
    pub relay: SessionRelay,
    pub shortcuts: Arc<Mutex<ShortcutManager>>,
    pub router: Router,
}

impl App {
    /// Creates the coordinator over a database file.
    pub fn new(db_path: &str, deps: AppDeps) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);
        Ok(Self::build(db, deps))
    }

    /// Creates the coordinator over an in-memory database, for tests.
    pub fn new_in_memory(deps: AppDeps) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open_in_memory()?);
        Ok(Self::build(db, deps))
    }

    fn build(db: Arc<Database>, deps: AppDeps) -> Self {
        let slots = SlotStore::new(db);
        let notes = NoteStore::new(slots.clone());
        let relay = SessionRelay::new(slots.clone(), deps.provider, deps.flow);
        let shortcuts = Arc::new(Mutex::new(ShortcutManager::new(slots.clone())));
        let bridge = PageBridge::new(deps.transport, deps.manifest);
        let router = Router::new(
            notes.clone(),
            relay.clone(),
            bridge,
            deps.screen,
            deps.backend,
            shortcuts.clone(),
        );
        Self {
            slots,
            notes,
            relay,
            shortcuts,
            router,
        }
    }

    /// Startup sequence: seed the shortcut slot with the effective
    /// bindings when it has never been written, so the other contexts can
    /// read it directly.
    pub fn startup(&self) {
        let seeded = self
            .slots
            .read::<ShortcutSettings>(&SlotKey::Shortcuts)
            .ok()
            .flatten()
            .is_some();
        if !seeded {
            let mut shortcuts = self
                .shortcuts
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Err(e) = shortcuts.reset_to_defaults() {
                tracing::warn!(error = %e, "could not seed shortcut defaults");
            }
        }
    }
}
