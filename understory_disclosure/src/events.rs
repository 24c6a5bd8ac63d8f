// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events consumed by disclosures, and the bundle of global streams they arrive on.
//!
//! Hosts translate their platform events into these small types and feed them
//! to the registries in [`GlobalEvents`]:
//!
//! - keyboard presses → [`GlobalEvents::keyboard`]
//! - viewport size changes → [`GlobalEvents::resize`]
//! - pointer presses with their root→target path → [`GlobalEvents::pointer`]

use core::fmt;

use kurbo::{Point, Size};
use smallvec::SmallVec;

use crate::listeners::ListenerRegistry;
use crate::outside::OutsideInteractions;
use crate::types::ParentLookup;

/// Logical key of a keyboard event.
///
/// Only the keys disclosures react to are named; everything else is folded
/// into [`Key::Character`] or [`Key::Other`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// The Escape key.
    Escape,
    /// The Enter/Return key.
    Enter,
    /// The Tab key.
    Tab,
    /// A key producing a single character.
    Character(char),
    /// Any other key.
    Other,
}

/// A key press delivered on the global keyboard stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// The logical key.
    pub key: Key,
    /// Whether this press is an auto-repeat.
    pub repeat: bool,
}

impl KeyEvent {
    /// A non-repeating press of `key`.
    pub const fn new(key: Key) -> Self {
        Self { key, repeat: false }
    }

    /// Returns `true` for the Escape key.
    pub fn is_escape(&self) -> bool {
        self.key == Key::Escape
    }
}

/// The viewport changed size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResizeEvent {
    /// New viewport size.
    pub size: Size,
}

impl ResizeEvent {
    /// A resize to `width` × `height`.
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
        }
    }
}

/// Kind of pointer interaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// A button or touch went down.
    Down,
    /// A button or touch was released.
    Up,
    /// The pointer moved.
    Move,
}

impl InteractionKind {
    /// Whether this kind of interaction can dismiss a disclosure.
    ///
    /// Only presses dismiss. A drag that starts inside a panel and is released
    /// outside of it must not close the panel.
    pub fn dismisses(self) -> bool {
        matches!(self, Self::Down)
    }
}

/// A pointer interaction and the root→target path it was dispatched along.
///
/// The path is captured when the interaction happens. Handlers that detach
/// nodes while it is being dispatched do not change which regions it was
/// inside of.
#[derive(Clone, PartialEq)]
pub struct PointerInteraction<K> {
    /// What happened.
    pub kind: InteractionKind,
    /// Pointer position in viewport coordinates.
    pub position: Point,
    /// Root→target path; the last element is the target.
    pub path: SmallVec<[K; 8]>,
}

impl<K: PartialEq> PointerInteraction<K> {
    /// An interaction along an explicit root→target path.
    pub fn new(kind: InteractionKind, position: Point, path: impl IntoIterator<Item = K>) -> Self {
        Self {
            kind,
            position,
            path: path.into_iter().collect(),
        }
    }

    /// A press along an explicit root→target path.
    pub fn down(position: Point, path: impl IntoIterator<Item = K>) -> Self {
        Self::new(InteractionKind::Down, position, path)
    }

    /// An interaction on `target`, with the path rebuilt through `lookup`.
    pub fn from_target<L>(kind: InteractionKind, position: Point, target: K, lookup: &L) -> Self
    where
        L: ParentLookup<K> + ?Sized,
    {
        let mut path: SmallVec<[K; 8]> = SmallVec::new();
        let mut current = Some(target);
        while let Some(node) = current {
            current = lookup.parent_of(&node);
            path.push(node);
        }
        path.reverse();
        Self {
            kind,
            position,
            path,
        }
    }

    /// The node the interaction targeted, if the path is not empty.
    pub fn target(&self) -> Option<&K> {
        self.path.last()
    }

    /// Returns `true` if the path passes through any of `nodes`.
    pub fn touches(&self, nodes: &[K]) -> bool {
        self.path.iter().any(|node| nodes.contains(node))
    }
}

impl<K: fmt::Debug> fmt::Debug for PointerInteraction<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerInteraction")
            .field("kind", &self.kind)
            .field("position", &self.position)
            .field("path", &self.path.as_slice())
            .finish()
    }
}

/// The global event streams a host exposes to disclosures.
///
/// Create one per window and pass it to
/// [`Popover::mount`](crate::popover::Popover::mount). Clones share the same
/// registrations.
pub struct GlobalEvents<K> {
    /// Keyboard presses, typically routed from the window regardless of focus.
    pub keyboard: ListenerRegistry<KeyEvent>,
    /// Viewport size changes.
    pub resize: ListenerRegistry<ResizeEvent>,
    /// Pointer interactions, checked against each watcher's owned regions.
    pub pointer: OutsideInteractions<K>,
}

impl<K> GlobalEvents<K> {
    /// Create empty streams.
    pub fn new() -> Self {
        Self {
            keyboard: ListenerRegistry::new(),
            resize: ListenerRegistry::new(),
            pointer: OutsideInteractions::new(),
        }
    }
}

impl<K> Default for GlobalEvents<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for GlobalEvents<K> {
    fn clone(&self) -> Self {
        Self {
            keyboard: self.keyboard.clone(),
            resize: self.resize.clone(),
            pointer: self.pointer.clone(),
        }
    }
}

impl<K> fmt::Debug for GlobalEvents<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalEvents")
            .field("keyboard", &self.keyboard)
            .field("resize", &self.resize)
            .field("pointer", &self.pointer)
            .finish()
    }
}
