//! Typed change notifications for the slot store.
//!
//! Every slot write fans a [`SlotChange`] out to all contexts, including
//! other tabs'. Subscriptions are parameterized by the slot's value type
//! and filter by key at the subscription boundary, so individual handlers
//! never have to.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;

/// How many un-consumed changes a slow subscriber can fall behind by
/// before it starts skipping.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// One change to one slot. `value` is `None` when the slot was removed.
#[derive(Debug, Clone)]
pub struct SlotChange {
    pub key: String,
    pub value: Option<Value>,
}

/// The store-wide change fan-out.
#[derive(Clone)]
pub struct ChangeBus {
    tx: broadcast::Sender<SlotChange>,
}

impl ChangeBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publishes a change. A send with no live subscribers is not an error.
    pub fn publish(&self, change: SlotChange) {
        let _ = self.tx.send(change);
    }

    /// Subscribes to changes of one slot, typed to that slot's value.
    pub fn subscribe<T: DeserializeOwned>(&self, key: String) -> SlotSubscription<T> {
        SlotSubscription {
            rx: self.tx.subscribe(),
            key,
            _value: PhantomData,
        }
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A typed subscription to one slot's changes.
pub struct SlotSubscription<T> {
    rx: broadcast::Receiver<SlotChange>,
    key: String,
    _value: PhantomData<T>,
}

impl<T: DeserializeOwned> SlotSubscription<T> {
    /// Waits for the next change to this slot.
    ///
    /// Returns `Some(Some(value))` on a write, `Some(None)` on removal,
    /// and `None` once the bus is gone. Changes to other slots are
    /// filtered out here; a lagged receiver skips missed changes rather
    /// than erroring.
    pub async fn changed(&mut self) -> Option<Option<T>> {
        loop {
            match self.rx.recv().await {
                Ok(change) if change.key == self.key => match change.value {
                    None => return Some(None),
                    Some(raw) => match serde_json::from_value(raw) {
                        Ok(value) => return Some(Some(value)),
                        Err(e) => {
                            tracing::warn!(key = %self.key, error = %e, "dropping undecodable slot change");
                            continue;
                        }
                    },
                },
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
