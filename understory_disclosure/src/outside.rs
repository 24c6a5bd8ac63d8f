// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outside-interaction detection: fire a handler when a press lands outside owned regions.
//!
//! Each watch owns a small set of nodes (for a popover, its root node) and a
//! handler. When a qualifying [`PointerInteraction`] is dispatched, the handler
//! runs exactly once if the interaction's root→target path passes through none
//! of the watch's excluded nodes.
//!
//! ## Excluded nodes
//!
//! A watch's excluded nodes are its own owned nodes, plus the owned nodes of
//! every other watch in the same [`ExclusionGroup`]. Grouping lets related
//! surfaces (for example a panel and a menu it spawned) treat presses inside
//! either one as "inside" for both.
//!
//! ## Edge cases
//!
//! - A watch with no owned nodes is inert. A host that has not attached its
//!   root node yet must not see every press as outside.
//! - Only [`InteractionKind::Down`](crate::events::InteractionKind::Down) dismisses.
//! - The set of watches that fire is decided before any handler runs. Watches
//!   removed by an earlier handler in the same dispatch are skipped.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use kurbo::Point;
//! use understory_disclosure::events::PointerInteraction;
//! use understory_disclosure::outside::OutsideInteractions;
//!
//! let outside: OutsideInteractions<u32> = OutsideInteractions::new();
//! let fired = Rc::new(Cell::new(0));
//! outside.watch([10], {
//!     let fired = fired.clone();
//!     move |_| fired.set(fired.get() + 1)
//! });
//!
//! // Press on a descendant of node 10: inside.
//! outside.dispatch(&PointerInteraction::down(Point::ZERO, [1, 10, 11]));
//! assert_eq!(fired.get(), 0);
//!
//! // Press elsewhere: outside.
//! outside.dispatch(&PointerInteraction::down(Point::ZERO, [1, 20]));
//! assert_eq!(fired.get(), 1);
//! ```

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::error::DisclosureError;
use crate::events::{InteractionKind, PointerInteraction};
use crate::registry::Slots;
use crate::types::ParentLookup;

/// Identifier of a watch registered with [`OutsideInteractions`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

/// Watches in the same group never dismiss each other.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExclusionGroup(u32);

impl ExclusionGroup {
    /// Create a group from an application-chosen id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

type Handler<K> = Rc<RefCell<dyn FnMut(&PointerInteraction<K>)>>;

struct Watch<K> {
    owned: SmallVec<[K; 2]>,
    group: Option<ExclusionGroup>,
    handler: Handler<K>,
}

/// Shared registry of outside-interaction watches.
pub struct OutsideInteractions<K> {
    watches: Rc<RefCell<Slots<Watch<K>>>>,
}

impl<K> OutsideInteractions<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            watches: Rc::new(RefCell::new(Slots::default())),
        }
    }

    /// Remove a watch. Returns `false` if it was not registered.
    pub fn unwatch(&self, id: WatchId) -> bool {
        let removed = self.watches.borrow_mut().remove(id.0).is_some();
        if removed {
            trace!(id = id.0, "outside watch removed");
        }
        removed
    }

    /// Returns `true` if `id` is currently registered.
    pub fn is_watching(&self, id: WatchId) -> bool {
        self.watches.borrow().contains(id.0)
    }

    /// Number of live watches.
    pub fn len(&self) -> usize {
        self.watches.borrow().len()
    }

    /// Returns `true` if nothing is watched.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Clone + PartialEq + 'static> OutsideInteractions<K> {
    /// Watch for interactions outside `owned`.
    pub fn watch(
        &self,
        owned: impl IntoIterator<Item = K>,
        handler: impl FnMut(&PointerInteraction<K>) + 'static,
    ) -> WatchId {
        self.insert(owned, None, handler)
    }

    /// Watch for interactions outside `owned` and outside every other watch in `group`.
    pub fn watch_in_group(
        &self,
        owned: impl IntoIterator<Item = K>,
        group: ExclusionGroup,
        handler: impl FnMut(&PointerInteraction<K>) + 'static,
    ) -> WatchId {
        self.insert(owned, Some(group), handler)
    }

    fn insert(
        &self,
        owned: impl IntoIterator<Item = K>,
        group: Option<ExclusionGroup>,
        handler: impl FnMut(&PointerInteraction<K>) + 'static,
    ) -> WatchId {
        let handler: Handler<K> = Rc::new(RefCell::new(handler));
        let watch = Watch {
            owned: owned.into_iter().collect(),
            group,
            handler,
        };
        let id = WatchId(self.watches.borrow_mut().insert(watch));
        trace!(id = id.0, "outside watch added");
        id
    }

    /// Replace the owned nodes of a watch.
    ///
    /// Call this whenever the owned node may have changed (for example on
    /// every render), since node handles are not stable across remounts.
    pub fn set_owned(
        &self,
        id: WatchId,
        owned: impl IntoIterator<Item = K>,
    ) -> Result<(), DisclosureError> {
        let mut watches = self.watches.borrow_mut();
        let watch = watches
            .get_mut(id.0)
            .ok_or(DisclosureError::UnknownWatch(id))?;
        watch.owned.clear();
        watch.owned.extend(owned);
        Ok(())
    }

    /// Returns `true` if `interaction` would fire the watch `id`.
    ///
    /// Unknown watches are never outside.
    pub fn is_outside(&self, id: WatchId, interaction: &PointerInteraction<K>) -> bool {
        if !interaction.kind.dismisses() {
            return false;
        }
        let watches = self.watches.borrow();
        let outside = watches
            .get(id.0)
            .is_some_and(|watch| lands_outside(&watches, watch, interaction));
        outside
    }

    /// Deliver `interaction` and return how many watch handlers ran.
    pub fn dispatch(&self, interaction: &PointerInteraction<K>) -> usize {
        if !interaction.kind.dismisses() {
            return 0;
        }
        let firing: SmallVec<[u64; 8]> = {
            let watches = self.watches.borrow();
            let firing = watches
                .iter()
                .filter(|(_, watch)| lands_outside(&watches, watch, interaction))
                .map(|(key, _)| key)
                .collect();
            firing
        };
        let mut fired = 0;
        for key in firing {
            let handler = self.watches.borrow().get(key).map(|w| w.handler.clone());
            let Some(handler) = handler else {
                continue;
            };
            let Ok(mut handler) = handler.try_borrow_mut() else {
                warn!(id = key, "outside watch re-entered its own dispatch; skipped");
                continue;
            };
            (&mut *handler)(interaction);
            fired += 1;
        }
        trace!(fired, "outside interaction dispatch");
        fired
    }

    /// Deliver an interaction on `target`, rebuilding its path through `lookup`.
    pub fn dispatch_target<L>(
        &self,
        kind: InteractionKind,
        position: Point,
        target: K,
        lookup: &L,
    ) -> usize
    where
        L: ParentLookup<K> + ?Sized,
    {
        self.dispatch(&PointerInteraction::from_target(
            kind, position, target, lookup,
        ))
    }
}

fn lands_outside<K: PartialEq>(
    watches: &Slots<Watch<K>>,
    watch: &Watch<K>,
    interaction: &PointerInteraction<K>,
) -> bool {
    if watch.owned.is_empty() || interaction.touches(&watch.owned) {
        return false;
    }
    match watch.group {
        None => true,
        Some(group) => !watches
            .iter()
            .any(|(_, other)| other.group == Some(group) && interaction.touches(&other.owned)),
    }
}

impl<K> Clone for OutsideInteractions<K> {
    fn clone(&self) -> Self {
        Self {
            watches: self.watches.clone(),
        }
    }
}

impl<K> Default for OutsideInteractions<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for OutsideInteractions<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutsideInteractions")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    fn counter(outside: &OutsideInteractions<u32>, owned: &[u32]) -> (WatchId, Rc<Cell<u32>>) {
        let hits = Rc::new(Cell::new(0));
        let id = outside.watch(owned.iter().copied(), {
            let hits = hits.clone();
            move |_| hits.set(hits.get() + 1)
        });
        (id, hits)
    }

    fn press(path: &[u32]) -> PointerInteraction<u32> {
        PointerInteraction::down(Point::ZERO, path.iter().copied())
    }

    #[test]
    fn inside_presses_never_fire() {
        let outside = OutsideInteractions::new();
        let (_, hits) = counter(&outside, &[5]);

        assert_eq!(outside.dispatch(&press(&[1, 5])), 0);
        assert_eq!(outside.dispatch(&press(&[1, 5, 6, 7])), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn outside_press_fires_exactly_once() {
        let outside = OutsideInteractions::new();
        let (_, hits) = counter(&outside, &[5]);

        assert_eq!(outside.dispatch(&press(&[1, 2])), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn moves_and_releases_are_ignored() {
        let outside = OutsideInteractions::new();
        let (id, hits) = counter(&outside, &[5]);
        let release = PointerInteraction::new(InteractionKind::Up, Point::ZERO, [1, 2]);
        let hover = PointerInteraction::new(InteractionKind::Move, Point::ZERO, [1, 2]);

        assert_eq!(outside.dispatch(&release), 0);
        assert_eq!(outside.dispatch(&hover), 0);
        assert!(!outside.is_outside(id, &release));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn empty_owned_set_is_inert() {
        let outside = OutsideInteractions::new();
        let (id, hits) = counter(&outside, &[]);

        assert_eq!(outside.dispatch(&press(&[1, 2])), 0);
        assert_eq!(hits.get(), 0);

        outside.set_owned(id, [5]).unwrap();
        assert_eq!(outside.dispatch(&press(&[1, 2])), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn set_owned_replaces_region() {
        let outside = OutsideInteractions::new();
        let (id, hits) = counter(&outside, &[5]);

        outside.set_owned(id, [9]).unwrap();
        assert_eq!(outside.dispatch(&press(&[1, 9])), 0);
        assert_eq!(outside.dispatch(&press(&[1, 5])), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn set_owned_on_unknown_watch_is_an_error() {
        let outside: OutsideInteractions<u32> = OutsideInteractions::new();
        let (id, _) = counter(&outside, &[5]);
        assert!(outside.unwatch(id));
        assert_eq!(
            outside.set_owned(id, [1]),
            Err(DisclosureError::UnknownWatch(id))
        );
    }

    #[test]
    fn grouped_watches_do_not_dismiss_each_other() {
        let outside = OutsideInteractions::new();
        let group = ExclusionGroup::new(1);
        let panel_hits = Rc::new(Cell::new(0));
        let menu_hits = Rc::new(Cell::new(0));
        outside.watch_in_group([5], group, {
            let hits = panel_hits.clone();
            move |_| hits.set(hits.get() + 1)
        });
        outside.watch_in_group([8], group, {
            let hits = menu_hits.clone();
            move |_| hits.set(hits.get() + 1)
        });
        let (_, loner_hits) = counter(&outside, &[12]);

        // Inside the menu: neither grouped watch fires, the ungrouped one does.
        assert_eq!(outside.dispatch(&press(&[1, 8])), 1);
        assert_eq!(panel_hits.get(), 0);
        assert_eq!(menu_hits.get(), 0);
        assert_eq!(loner_hits.get(), 1);

        // Outside everything: all fire.
        assert_eq!(outside.dispatch(&press(&[1, 2])), 3);
    }

    #[test]
    fn detached_descendants_still_count_as_inside() {
        // The host detaches node 6 while the press is being dispatched; the
        // captured path still runs through the owned node.
        let outside = OutsideInteractions::new();
        let (_, hits) = counter(&outside, &[5]);
        let interaction = press(&[1, 5, 6]);
        assert_eq!(outside.dispatch(&interaction), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn watches_removed_mid_dispatch_are_skipped() {
        let outside: OutsideInteractions<u32> = OutsideInteractions::new();
        let victim = Rc::new(Cell::new(None));
        outside.watch([5], {
            let outside = outside.clone();
            let victim = victim.clone();
            move |_| {
                if let Some(id) = victim.get() {
                    outside.unwatch(id);
                }
            }
        });
        let (id, hits) = counter(&outside, &[6]);
        victim.set(Some(id));

        assert_eq!(outside.dispatch(&press(&[1, 2])), 1);
        assert_eq!(hits.get(), 0);
    }

    struct Parents;

    impl ParentLookup<u32> for Parents {
        fn parent_of(&self, node: &u32) -> Option<u32> {
            (*node >= 10).then(|| node / 10)
        }
    }

    #[test]
    fn dispatch_target_rebuilds_path() {
        let outside = OutsideInteractions::new();
        let (_, hits) = counter(&outside, &[1]);
        // 12 → 1: inside.
        assert_eq!(
            outside.dispatch_target(InteractionKind::Down, Point::ZERO, 12, &Parents),
            0
        );
        assert_eq!(hits.get(), 0);
    }
}
