//! Event sources with scoped subscriptions.
//!
//! A rendering surface publishes what it measures (scroll geometry) through
//! an [`EventSource`]; interested parties subscribe and receive a
//! [`Subscription`] guard. Dropping the guard removes the listener, so a
//! view that holds its guards deregisters on every exit path.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`).

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Registry<E> {
    next_id: u64,
    listeners: Vec<(u64, Listener<E>)>,
}

/// A source of events of type `E`.
///
/// Clones share the same set of listeners.
pub struct EventSource<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E> Clone for EventSource<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<E: 'static> Default for EventSource<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> EventSource<E> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Registers a listener until the returned guard is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&E) + 'static,
    {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            let listener: Listener<E> = Rc::new(RefCell::new(listener));
            registry.listeners.push((id, listener));
            id
        };

        let registry: Weak<RefCell<Registry<E>>> = Rc::downgrade(&self.registry);
        Subscription {
            unregister: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry
                        .borrow_mut()
                        .listeners
                        .retain(|(listener_id, _)| *listener_id != id);
                }
            })),
        }
    }

    /// Delivers `event` to every listener registered at the time of the call.
    ///
    /// Listeners may subscribe or drop subscriptions while being notified.
    /// A listener that is already running (re-entrant emit) is skipped.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            if let Ok(mut listener) = listener.try_borrow_mut() {
                (&mut *listener)(event);
            }
        }
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Guard for a registered listener. Dropping it deregisters the listener.
#[must_use = "dropping a Subscription immediately deregisters its listener"]
pub struct Subscription {
    unregister: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Deregisters the listener now.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unregister) = self.unregister.take() {
            unregister();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unregister.is_some())
            .finish()
    }
}
