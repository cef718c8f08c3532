//! Event Router for named server events.
//!
//! Push-based: subscribers register a handler for one event name and get a
//! [`Subscription`] back. The subscription is the handler's lifetime; revoking
//! it (explicitly or by dropping it) removes the handler. Revocation is
//! idempotent.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde_json::Value;

type Handler = Rc<RefCell<dyn FnMut(&Value)>>;

#[derive(Default)]
struct RouterInner {
    next_id: u64,
    handlers: HashMap<String, Vec<(u64, Handler)>>,
}

impl RouterInner {
    fn remove(&mut self, event_type: &str, id: u64) -> bool {
        let Some(list) = self.handlers.get_mut(event_type) else {
            return false;
        };
        let before = list.len();
        list.retain(|(handler_id, _)| *handler_id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.handlers.remove(event_type);
        }
        removed
    }

    fn is_live(&self, event_type: &str, id: u64) -> bool {
        self.handlers
            .get(event_type)
            .is_some_and(|list| list.iter().any(|(handler_id, _)| *handler_id == id))
    }
}

/// Routes inbound named events to their subscribers.
///
/// Cheap to clone; clones share the same subscriber table.
#[derive(Clone, Default)]
pub struct EventRouter {
    inner: Rc<RefCell<RouterInner>>,
}

impl EventRouter {
    /// Create a new EventRouter with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to one event name.
    ///
    /// Handlers for the same name run in subscription order.
    pub fn subscribe(
        &self,
        event_type: impl Into<String>,
        handler: impl FnMut(&Value) + 'static,
    ) -> Subscription {
        let event_type = event_type.into();
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let handler: Handler = Rc::new(RefCell::new(handler));
        inner
            .handlers
            .entry(event_type.clone())
            .or_default()
            .push((id, handler));

        Subscription {
            router: Rc::downgrade(&self.inner),
            event_type,
            id,
            revoked: Cell::new(false),
        }
    }

    /// Dispatch an event to all subscribers of its name.
    ///
    /// Handlers may subscribe or revoke while being dispatched; a handler
    /// revoked by an earlier handler in the same dispatch is skipped.
    /// Returns the number of handlers invoked.
    pub fn dispatch(&self, event_type: &str, payload: &Value) -> usize {
        let snapshot: Vec<(u64, Handler)> = match self.inner.borrow().handlers.get(event_type) {
            Some(list) => list.clone(),
            None => return 0,
        };

        let mut invoked = 0;
        for (id, handler) in snapshot {
            if !self.inner.borrow().is_live(event_type, id) {
                continue;
            }
            match handler.try_borrow_mut() {
                Ok(mut handler) => {
                    (&mut *handler)(payload);
                    invoked += 1;
                }
                Err(_) => {
                    tracing::warn!(event_type, "Skipping re-entrant dispatch to busy handler");
                }
            }
        }
        invoked
    }

    /// Get the number of subscribers for one event name.
    pub fn subscriber_count(&self, event_type: &str) -> usize {
        self.inner
            .borrow()
            .handlers
            .get(event_type)
            .map_or(0, Vec::len)
    }

    /// Clear all subscribers.
    pub fn clear(&self) {
        self.inner.borrow_mut().handlers.clear();
    }
}

/// Handle to one registered handler.
///
/// Dropping the handle revokes the handler, so a component that owns its
/// subscriptions unsubscribes when it goes away.
pub struct Subscription {
    router: Weak<RefCell<RouterInner>>,
    event_type: String,
    id: u64,
    revoked: Cell<bool>,
}

impl Subscription {
    /// Remove the handler. Revoking twice is a no-op.
    pub fn revoke(&self) {
        if self.revoked.replace(true) {
            return;
        }
        if let Some(router) = self.router.upgrade() {
            router.borrow_mut().remove(&self.event_type, self.id);
        }
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked.get()
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.revoke();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("event_type", &self.event_type)
            .field("id", &self.id)
            .field("revoked", &self.revoked.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subscribe_and_dispatch() {
        let router = EventRouter::new();
        let count = Rc::new(Cell::new(0));

        let count_clone = Rc::clone(&count);
        let _sub = router.subscribe("CHAT", move |_payload| {
            count_clone.set(count_clone.get() + 1);
        });

        assert_eq!(router.subscriber_count("CHAT"), 1);
        assert_eq!(router.dispatch("CHAT", &json!({})), 1);
        assert_eq!(router.dispatch("CHAT", &json!({})), 1);
        assert_eq!(router.dispatch("PLAYERS", &json!([])), 0);

        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_handlers_receive_payload_in_order() {
        let router = EventRouter::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        let _a = router.subscribe("CHAT", move |payload| {
            first.borrow_mut().push(format!("a:{}", payload["text"]));
        });
        let second = Rc::clone(&seen);
        let _b = router.subscribe("CHAT", move |payload| {
            second.borrow_mut().push(format!("b:{}", payload["text"]));
        });

        router.dispatch("CHAT", &json!({ "text": "hi" }));
        assert_eq!(*seen.borrow(), vec!["a:\"hi\"", "b:\"hi\""]);
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let router = EventRouter::new();
        let sub = router.subscribe("ITEMS", |_| {});
        let _other = router.subscribe("ITEMS", |_| {});

        sub.revoke();
        sub.revoke();

        assert!(sub.is_revoked());
        assert_eq!(router.subscriber_count("ITEMS"), 1);
    }

    #[test]
    fn test_drop_revokes() {
        let router = EventRouter::new();
        {
            let _sub = router.subscribe("BOARD", |_| {});
            assert_eq!(router.subscriber_count("BOARD"), 1);
        }
        assert_eq!(router.subscriber_count("BOARD"), 0);
    }

    #[test]
    fn test_revoke_after_router_dropped_is_noop() {
        let router = EventRouter::new();
        let sub = router.subscribe("INIT", |_| {});
        drop(router);
        sub.revoke();
        assert!(sub.is_revoked());
    }

    #[test]
    fn test_handler_revoked_mid_dispatch_is_skipped() {
        let router = EventRouter::new();
        let late_calls = Rc::new(Cell::new(0));
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let victim_for_killer = Rc::clone(&victim);
        let _killer = router.subscribe("CHANGE_TURN", move |_| {
            if let Some(sub) = victim_for_killer.borrow().as_ref() {
                sub.revoke();
            }
        });
        let late_calls_clone = Rc::clone(&late_calls);
        *victim.borrow_mut() = Some(router.subscribe("CHANGE_TURN", move |_| {
            late_calls_clone.set(late_calls_clone.get() + 1);
        }));

        assert_eq!(router.dispatch("CHANGE_TURN", &json!({ "active": "a" })), 1);
        assert_eq!(late_calls.get(), 0);
    }
}
