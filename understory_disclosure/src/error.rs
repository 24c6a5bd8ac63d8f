// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by the registries and the disclosure state machine.

use crate::listeners::ListenerId;
use crate::outside::WatchId;

/// Errors reported by this crate.
///
/// Nothing here is fatal: every variant describes a call that had no effect.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DisclosureError {
    /// The listener was never registered or has already been removed.
    #[error("listener {0:?} is not registered")]
    UnknownListener(ListenerId),
    /// The outside-interaction watch was never registered or has already been removed.
    #[error("outside-interaction watch {0:?} is not registered")]
    UnknownWatch(WatchId),
    /// An external open value was supplied to an uncontrolled disclosure.
    ///
    /// Whether a disclosure is controlled is fixed when it is constructed.
    #[error("an uncontrolled disclosure cannot take an external open value")]
    Uncontrolled,
}
