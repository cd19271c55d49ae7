use std::fmt;

// === StoreError ===

/// Errors related to the persisted slot store.
#[derive(Debug)]
pub enum StoreError {
    /// Database operation failed.
    Database(String),
    /// Failed to serialize or deserialize a slot value.
    Serialization(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Database(msg) => write!(f, "Slot store database error: {}", msg),
            StoreError::Serialization(msg) => {
                write!(f, "Slot store serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StoreError {}

// === ShortcutError ===

/// Errors related to clipper shortcut management.
#[derive(Debug)]
pub enum ShortcutError {
    /// No binding is registered for the given action.
    NotFound(String),
    /// The key combination conflicts with an existing binding.
    Conflict(String),
    /// The provided key combination is invalid.
    InvalidKeys(String),
    /// Persisting the bindings failed.
    Storage(String),
}

impl fmt::Display for ShortcutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortcutError::NotFound(action) => {
                write!(f, "Shortcut not found for action: {}", action)
            }
            ShortcutError::Conflict(msg) => write!(f, "Shortcut conflict: {}", msg),
            ShortcutError::InvalidKeys(keys) => write!(f, "Invalid shortcut keys: {}", keys),
            ShortcutError::Storage(msg) => write!(f, "Shortcut storage error: {}", msg),
        }
    }
}

impl std::error::Error for ShortcutError {}

// === CaptureError ===

/// Errors related to the screen-region capture pipeline.
#[derive(Debug)]
pub enum CaptureError {
    /// The capture rectangle lies outside the screenshot bounds.
    RegionOutOfBounds(String),
    /// No screenshot source is available for the tab.
    SourceUnavailable(String),
    /// Decoding a screenshot frame failed.
    Decode(String),
    /// Encoding the cropped image failed.
    Encode(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::RegionOutOfBounds(msg) => {
                write!(f, "Capture region out of bounds: {}", msg)
            }
            CaptureError::SourceUnavailable(msg) => {
                write!(f, "Screenshot source unavailable: {}", msg)
            }
            CaptureError::Decode(msg) => write!(f, "Screenshot decode error: {}", msg),
            CaptureError::Encode(msg) => write!(f, "Capture encode error: {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {}

// === DeliveryError ===

/// Errors related to delivering messages into a page.
#[derive(Debug)]
pub enum DeliveryError {
    /// No content script is listening in the target tab.
    NoReceiver(String),
    /// Injecting the content scripts into the tab failed.
    Injection(String),
    /// The underlying message transport failed.
    Transport(String),
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::NoReceiver(tab_id) => {
                write!(f, "Receiving end does not exist in tab: {}", tab_id)
            }
            DeliveryError::Injection(msg) => write!(f, "Script injection failed: {}", msg),
            DeliveryError::Transport(msg) => write!(f, "Page transport error: {}", msg),
        }
    }
}

impl std::error::Error for DeliveryError {}

// === SessionError ===

/// Errors related to the authenticated-session relay.
#[derive(Debug)]
pub enum SessionError {
    /// Interactive authentication failed or was dismissed.
    AuthFailed(String),
    /// The callback URL carried neither a code nor implicit-flow tokens.
    CallbackParse(String),
    /// The identity provider rejected or failed a request.
    ProviderError(String),
    /// Refreshing the session failed.
    RefreshFailed(String),
    /// Persisting the session failed.
    Storage(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::AuthFailed(msg) => write!(f, "Authentication failed: {}", msg),
            SessionError::CallbackParse(msg) => {
                write!(f, "Auth callback parse error: {}", msg)
            }
            SessionError::ProviderError(msg) => {
                write!(f, "Identity provider error: {}", msg)
            }
            SessionError::RefreshFailed(msg) => write!(f, "Session refresh failed: {}", msg),
            SessionError::Storage(msg) => write!(f, "Session storage error: {}", msg),
        }
    }
}

impl std::error::Error for SessionError {}

// === BackendError ===

/// Errors related to the note backend thin client.
#[derive(Debug)]
pub enum BackendError {
    /// The backend rejected the credentials.
    Unauthorized(String),
    /// A network error occurred while reaching the backend.
    Network(String),
    /// The backend returned an error response.
    Api(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            BackendError::Network(msg) => write!(f, "Backend network error: {}", msg),
            BackendError::Api(msg) => write!(f, "Backend API error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

// === RouterError ===

/// Errors surfaced by router handlers before conversion to a response.
///
/// Every variant renders to the error string carried in the
/// `{success:false, error}` response; none of these crosses the message
/// boundary as a panic.
#[derive(Debug)]
pub enum RouterError {
    /// The request requires an authenticated session and none is live.
    Unauthorized(String),
    Store(StoreError),
    Session(SessionError),
    Delivery(DeliveryError),
    Capture(CaptureError),
    Backend(BackendError),
    Shortcut(ShortcutError),
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            RouterError::Store(e) => write!(f, "{}", e),
            RouterError::Session(e) => write!(f, "{}", e),
            RouterError::Delivery(e) => write!(f, "{}", e),
            RouterError::Capture(e) => write!(f, "{}", e),
            RouterError::Backend(e) => write!(f, "{}", e),
            RouterError::Shortcut(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RouterError {}

impl From<StoreError> for RouterError {
    fn from(e: StoreError) -> Self {
        RouterError::Store(e)
    }
}

impl From<SessionError> for RouterError {
    fn from(e: SessionError) -> Self {
        RouterError::Session(e)
    }
}

impl From<DeliveryError> for RouterError {
    fn from(e: DeliveryError) -> Self {
        RouterError::Delivery(e)
    }
}

impl From<CaptureError> for RouterError {
    fn from(e: CaptureError) -> Self {
        RouterError::Capture(e)
    }
}

impl From<BackendError> for RouterError {
    fn from(e: BackendError) -> Self {
        RouterError::Backend(e)
    }
}

impl From<ShortcutError> for RouterError {
    fn from(e: ShortcutError) -> Self {
        RouterError::Shortcut(e)
    }
}
