// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Disclosure state machine: one authoritative open value, controlled or not.
//!
//! A [`Disclosure`] is either *uncontrolled* (it owns its open value) or
//! *controlled* (an external owner supplies the value and the disclosure only
//! requests changes). Which one is fixed at construction.
//!
//! ## Rules
//!
//! - Before every toggle, a controlled disclosure is reconciled to the external
//!   value. The external value always wins.
//! - [`Disclosure::toggle`] reports a notification only when the requested value
//!   differs from the current one. Toggling to the current value is silent.
//! - Uncontrolled: toggling also applies the new value.
//! - Controlled: toggling never changes the value. A request that was already
//!   reported is not reported again until the owner answers through
//!   [`Disclosure::set_external`].
//!
//! ## Minimal example
//!
//! ```
//! use understory_disclosure::disclosure::{Disclosure, Transition};
//!
//! let mut d = Disclosure::uncontrolled();
//! let t = d.toggle(true);
//! assert_eq!(t.notify, Some(true));
//! assert_eq!(t.transition, Some(Transition::Opened));
//!
//! // Same value again: nothing to report.
//! assert_eq!(d.toggle(true).notify, None);
//!
//! let mut c = Disclosure::controlled(false);
//! assert_eq!(c.toggle(true).notify, Some(true));
//! assert!(!c.is_open(), "controlled disclosures wait for their owner");
//! c.set_external(true).unwrap();
//! assert!(c.is_open());
//! ```

use tracing::trace;

use crate::error::DisclosureError;

/// A change of the open value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Closed → open.
    Opened,
    /// Open → closed.
    Closed,
}

impl Transition {
    /// The transition from `from` to `to`, if they differ.
    pub fn between(from: bool, to: bool) -> Option<Self> {
        match (from, to) {
            (false, true) => Some(Self::Opened),
            (true, false) => Some(Self::Closed),
            _ => None,
        }
    }
}

/// Result of [`Disclosure::toggle`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Toggle {
    /// Value to report to the change callback, if any.
    pub notify: Option<bool>,
    /// How the open value changed during this call, including reconciliation.
    pub transition: Option<Transition>,
}

/// Open/closed state with controlled/uncontrolled reconciliation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Disclosure {
    open: bool,
    external: Option<bool>,
    requested: Option<bool>,
}

impl Disclosure {
    /// Create a disclosure, controlled iff `external` is `Some`.
    ///
    /// The initial value is the external value, or closed.
    pub fn new(external: Option<bool>) -> Self {
        Self {
            open: external.unwrap_or(false),
            external,
            requested: None,
        }
    }

    /// An uncontrolled disclosure, initially closed.
    pub fn uncontrolled() -> Self {
        Self::new(None)
    }

    /// A controlled disclosure with the given external value.
    pub fn controlled(open: bool) -> Self {
        Self::new(Some(open))
    }

    /// Current open value.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns `true` if an external owner supplies the open value.
    pub fn is_controlled(&self) -> bool {
        self.external.is_some()
    }

    /// The external value, when controlled.
    pub fn external(&self) -> Option<bool> {
        self.external
    }

    /// Supply a new external value and reconcile to it.
    ///
    /// This also answers any pending request, so the next toggle towards a
    /// different value is reported again.
    pub fn set_external(&mut self, open: bool) -> Result<Option<Transition>, DisclosureError> {
        if self.external.is_none() {
            return Err(DisclosureError::Uncontrolled);
        }
        self.external = Some(open);
        self.requested = None;
        Ok(self.reconcile())
    }

    /// Force the open value to the external value, when controlled.
    pub fn reconcile(&mut self) -> Option<Transition> {
        let external = self.external?;
        let before = self.open;
        self.open = external;
        Transition::between(before, external)
    }

    /// Request the open value `next`.
    pub fn toggle(&mut self, next: bool) -> Toggle {
        let before = self.open;
        self.reconcile();
        let current = self.open;

        let notify = if next == current {
            // A newer request superseded anything still pending.
            self.requested = None;
            None
        } else if self.is_controlled() {
            if self.requested == Some(next) {
                None
            } else {
                self.requested = Some(next);
                Some(next)
            }
        } else {
            self.open = next;
            Some(next)
        };

        let toggle = Toggle {
            notify,
            transition: Transition::between(before, self.open),
        };
        trace!(next, open = self.open, notify = ?toggle.notify, "disclosure toggle");
        toggle
    }
}

/// Edge detector for the focus-on-open effect.
///
/// Feed it every committed open value; it reports `true` exactly on the
/// closed→open edge, regardless of how many times the same value is committed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusOnOpen {
    committed: bool,
}

impl FocusOnOpen {
    /// Commit `open` and return whether focus should move into the panel.
    pub fn commit(&mut self, open: bool) -> bool {
        let opened = open && !self.committed;
        self.committed = open;
        opened
    }
}
