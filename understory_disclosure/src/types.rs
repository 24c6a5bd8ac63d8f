// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small shared types: tree lookups and panel placement.

/// Parent lookup over the host's node tree.
///
/// Used to rebuild root→target paths for pointer interactions and to walk up
/// from a panel's anchor during layout measurement.
pub trait ParentLookup<K> {
    /// Return the parent of `node`, or `None` at the root (or for unknown nodes).
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// Which side of the trigger the panel opens on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// Above the trigger.
    Top,
    /// Below the trigger.
    #[default]
    Bottom,
}
