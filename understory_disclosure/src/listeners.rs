// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registry: many independent handlers over one global event stream.
//!
//! A [`ListenerRegistry`] stands in for a process-wide event source such as
//! `keydown` on the window or the window's `resize` notifications. Instead of a
//! hidden singleton, the host creates one registry per event type and hands
//! clones of it to whoever needs to subscribe. Clones share the same
//! registrations.
//!
//! ## Semantics
//!
//! - Every live registration receives every dispatched event, in registration order.
//!   No handler can stop delivery to the others.
//! - [`ListenerRegistry::update`] swaps the handler behind an id without
//!   changing its position; the old handler is dropped.
//! - [`ListenerRegistry::remove`] takes effect immediately, including for the
//!   remainder of an in-progress dispatch.
//! - Registrations added during a dispatch first see the next event.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_disclosure::listeners::ListenerRegistry;
//!
//! let registry: ListenerRegistry<u32> = ListenerRegistry::new();
//! let sum = Rc::new(Cell::new(0));
//!
//! let id = registry.add({
//!     let sum = sum.clone();
//!     move |value: &u32| sum.set(sum.get() + *value)
//! });
//! assert_eq!(registry.dispatch(&2), 1);
//! assert_eq!(sum.get(), 2);
//!
//! assert!(registry.remove(id));
//! assert_eq!(registry.dispatch(&5), 0);
//! assert_eq!(sum.get(), 2);
//! ```

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::error::DisclosureError;
use crate::registry::Slots;

/// Identifier of a registration in a [`ListenerRegistry`].
///
/// Ids are never reused within a registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler<E> = Rc<RefCell<dyn FnMut(&E)>>;

/// Shared registry of handlers for events of type `E`.
pub struct ListenerRegistry<E> {
    slots: Rc<RefCell<Slots<Handler<E>>>>,
}

impl<E> ListenerRegistry<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots::default())),
        }
    }

    /// Remove a registration. Returns `false` if it was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let removed = self.slots.borrow_mut().remove(id.0).is_some();
        if removed {
            trace!(id = id.0, "listener removed");
        }
        removed
    }

    /// Returns `true` if `id` is currently registered.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.slots.borrow().contains(id.0)
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: 'static> ListenerRegistry<E> {
    /// Register a handler and return its id.
    pub fn add(&self, handler: impl FnMut(&E) + 'static) -> ListenerId {
        let handler: Handler<E> = Rc::new(RefCell::new(handler));
        let id = ListenerId(self.slots.borrow_mut().insert(handler));
        trace!(id = id.0, "listener added");
        id
    }

    /// Replace the handler of an existing registration.
    ///
    /// The registration keeps its id and its place in dispatch order.
    pub fn update(
        &self,
        id: ListenerId,
        handler: impl FnMut(&E) + 'static,
    ) -> Result<(), DisclosureError> {
        let mut slots = self.slots.borrow_mut();
        let slot = slots
            .get_mut(id.0)
            .ok_or(DisclosureError::UnknownListener(id))?;
        *slot = Rc::new(RefCell::new(handler));
        Ok(())
    }

    /// Deliver `event` to every registration and return how many handlers ran.
    ///
    /// The registry is not borrowed while handlers run, so handlers may add,
    /// update, or remove registrations (including their own).
    pub fn dispatch(&self, event: &E) -> usize {
        let keys: SmallVec<[u64; 8]> = self.slots.borrow().keys().iter().copied().collect();
        let mut delivered = 0;
        for key in keys {
            // Look the handler up again: it may have been removed or replaced
            // by an earlier handler in this dispatch.
            let handler = self.slots.borrow().get(key).cloned();
            let Some(handler) = handler else {
                continue;
            };
            let Ok(mut handler) = handler.try_borrow_mut() else {
                warn!(id = key, "listener re-entered its own dispatch; skipped");
                continue;
            };
            (&mut *handler)(event);
            delivered += 1;
        }
        trace!(delivered, "listener dispatch");
        delivered
    }
}

impl<E> Clone for ListenerRegistry<E> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}

impl<E> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for ListenerRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
