//! Click handler registry with owned subscriptions.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::trace;

use super::handle::OverlayId;

/// Callback fired when an overlay is clicked.
pub type SelectionHandler = Arc<dyn Fn() + Send + Sync>;

type HandlerMap = Mutex<HashMap<OverlayId, SelectionHandler>>;

/// Maps overlay ids to their click handlers.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: Arc<HandlerMap>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `id`. The handler stays registered until the
    /// returned subscription is dropped.
    pub fn register(&self, id: OverlayId, handler: SelectionHandler) -> Subscription {
        self.handlers.lock().insert(id, handler);
        Subscription {
            id,
            handlers: Arc::downgrade(&self.handlers),
        }
    }

    /// Invokes the handler for `id`. Returns false if none is registered.
    pub fn dispatch(&self, id: OverlayId) -> bool {
        let handler = self.handlers.lock().get(&id).cloned();
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => {
                trace!(overlay = %id, "Click on overlay without handler");
                false
            }
        }
    }

    pub fn is_registered(&self, id: OverlayId) -> bool {
        self.handlers.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.handlers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registration token. Dropping it unregisters the handler.
pub struct Subscription {
    id: OverlayId,
    handlers: Weak<HandlerMap>,
}

impl Subscription {
    pub fn id(&self) -> OverlayId {
        self.id
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(handlers) = self.handlers.upgrade() {
            handlers.lock().remove(&self.id);
        }
    }
}
