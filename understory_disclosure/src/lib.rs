// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_disclosure --heading-base-level=0

//! Understory Disclosure: popover state, dismissal, and anchored layout for UI toolkits.
//!
//! ## Overview
//!
//! A *disclosure* is a trigger that shows and hides a panel. This crate holds
//! the toolkit-independent parts of one:
//!
//! - [`disclosure`]: the open value, controlled by an owner or not, and the
//!   rules for when a change is reported.
//! - [`listeners`]: ordered, typed registries for window-wide event streams.
//! - [`outside`]: "press landed outside my region" detection with exclusion groups.
//! - [`layout`]: measuring how far a panel may extend before its nearest
//!   clipping ancestor, rendered as CSS-style offset expressions.
//! - [`popover`]: all of the above wired into one component with Escape,
//!   outside-press, resize, and focus-on-open behavior.
//!
//! It does not render anything or own a node tree. Hosts describe their tree
//! through small traits ([`ParentLookup`](types::ParentLookup),
//! [`LayoutProvider`](layout::LayoutProvider),
//! [`FocusProvider`](popover::FocusProvider)) keyed by whatever node handle
//! they already use.
//!
//! ## Workflow
//!
//! 1) Create one [`GlobalEvents`](events::GlobalEvents) per window and forward
//!    keyboard, resize, and pointer-down events into it.
//! 2) Create a [`Popover`](popover::Popover) per trigger and mount it with its
//!    root node.
//! 3) Render from [`Popover::trigger_attributes`](popover::Popover::trigger_attributes)
//!    and [`Popover::panel_style`](popover::Popover::panel_style).
//!
//! ```
//! use std::rc::Rc;
//! use kurbo::{Point, Rect};
//! use understory_disclosure::events::{GlobalEvents, PointerInteraction};
//! use understory_disclosure::layout::{LayoutProvider, Overflow};
//! use understory_disclosure::popover::{FocusProvider, Popover, PopoverProps};
//! use understory_disclosure::types::ParentLookup;
//!
//! struct Host;
//! impl ParentLookup<u32> for Host {
//!     fn parent_of(&self, node: &u32) -> Option<u32> { (*node > 0).then_some(0) }
//! }
//! impl LayoutProvider<u32> for Host {
//!     fn overflow(&self, _: &u32) -> Overflow { Overflow::Auto }
//!     fn client_width(&self, _: &u32) -> f64 { 320.0 }
//!     fn bounding_rect(&self, _: &u32) -> Option<Rect> { Some(Rect::ZERO) }
//! }
//! impl FocusProvider<u32> for Host {
//!     fn autofocus_target(&self, _: &u32) -> Option<u32> { None }
//!     fn focus(&self, _: &u32) {}
//! }
//!
//! let events = GlobalEvents::new();
//! let mut popover = Popover::new(PopoverProps::new().aria_label("Options"), Rc::new(Host));
//! popover.mount(Some(7), &events);
//!
//! popover.press_trigger();
//! assert!(popover.trigger_attributes().expanded);
//!
//! // A press on some other node closes it.
//! events.pointer.dispatch(&PointerInteraction::down(Point::ZERO, [0, 3]));
//! assert!(!popover.is_open());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod disclosure;
mod error;
pub mod events;
pub mod layout;
pub mod listeners;
pub mod outside;
pub mod popover;
mod registry;
pub mod types;

pub use disclosure::{Disclosure, FocusOnOpen, Toggle, Transition};
pub use error::DisclosureError;
pub use events::{GlobalEvents, InteractionKind, Key, KeyEvent, PointerInteraction, ResizeEvent};
pub use layout::{
    Gutter, LayoutOffsets, LayoutProvider, Overflow, PanelLayout, ResolvedOffsets,
};
pub use listeners::{ListenerId, ListenerRegistry};
pub use outside::{ExclusionGroup, OutsideInteractions, WatchId};
pub use popover::{Closer, FocusProvider, PanelStyle, Popover, PopoverProps, TriggerAttributes};
pub use types::{ParentLookup, Side};
