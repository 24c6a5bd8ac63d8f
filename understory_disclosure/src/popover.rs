// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popover: a disclosure wired to global events, layout, and focus.
//!
//! [`Popover`] composes the pieces of this crate the way a toolkit widget
//! would:
//!
//! - a [`Disclosure`] holding the open value,
//! - an Escape listener on [`GlobalEvents::keyboard`],
//! - an outside-press watch on [`GlobalEvents::pointer`] owning the root node,
//! - a resize listener on [`GlobalEvents::resize`] that re-measures the panel,
//! - a focus-on-open effect driven by [`FocusOnOpen`].
//!
//! ## Lifecycle
//!
//! 1) Construct with [`PopoverProps`] and a host implementing [`LayoutProvider`]
//!    and [`FocusProvider`].
//! 2) [`Popover::mount`] with the root node once it exists. This subscribes to
//!    the global streams exactly once and measures the panel.
//! 3) On every render, pass the current root node to [`Popover::set_root`] and
//!    (when controlled) the owner's value to [`Popover::set_open`]. Read
//!    [`Popover::trigger_attributes`] and [`Popover::panel_style`] to render.
//! 4) [`Popover::unmount`] (or dropping the popover) removes every subscription.
//!
//! ## Notifications
//!
//! The `on_toggle` callback is the single place other code learns about
//! requested changes. It runs after the state has been updated and before the
//! focus effect. A toggle issued from inside the callback is queued and
//! delivered once the callback returns, so the final state is always the last
//! value written.
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use kurbo::Rect;
//! use understory_disclosure::events::{GlobalEvents, Key, KeyEvent};
//! use understory_disclosure::layout::{LayoutProvider, Overflow};
//! use understory_disclosure::popover::{FocusProvider, Popover, PopoverProps};
//! use understory_disclosure::types::ParentLookup;
//!
//! // Node 1 is a 400px wide clipping container; node 2 is the popover root at x = 100.
//! struct Host;
//! impl ParentLookup<u32> for Host {
//!     fn parent_of(&self, node: &u32) -> Option<u32> {
//!         (*node == 2).then_some(1)
//!     }
//! }
//! impl LayoutProvider<u32> for Host {
//!     fn overflow(&self, _: &u32) -> Overflow { Overflow::Hidden }
//!     fn client_width(&self, _: &u32) -> f64 { 400.0 }
//!     fn bounding_rect(&self, node: &u32) -> Option<Rect> {
//!         let x0 = if *node == 2 { 100.0 } else { 0.0 };
//!         Some(Rect::new(x0, 0.0, x0 + 50.0, 20.0))
//!     }
//! }
//! impl FocusProvider<u32> for Host {
//!     fn autofocus_target(&self, _: &u32) -> Option<u32> { None }
//!     fn focus(&self, _: &u32) {}
//! }
//!
//! let events = GlobalEvents::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let props = PopoverProps::new().on_toggle({
//!     let seen = seen.clone();
//!     move |open| seen.borrow_mut().push(open)
//! });
//!
//! let mut popover = Popover::new(props, Rc::new(Host));
//! popover.mount(Some(2), &events);
//!
//! assert!(popover.press_trigger());
//! assert!(popover.is_open());
//! assert_eq!(
//!     popover.panel_style().translate,
//!     "min(300px - 100% - var(--spacer-4), 0px)"
//! );
//!
//! events.keyboard.dispatch(&KeyEvent::new(Key::Escape));
//! assert!(!popover.is_open());
//! assert_eq!(*seen.borrow(), [true, false]);
//! ```

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::disclosure::{Disclosure, FocusOnOpen};
use crate::error::DisclosureError;
use crate::events::{GlobalEvents, KeyEvent, PointerInteraction, ResizeEvent};
use crate::layout::{Gutter, LayoutOffsets, LayoutProvider, PanelLayout};
use crate::listeners::ListenerId;
use crate::outside::WatchId;
use crate::types::Side;

/// Focus queries and commands over the host's node tree.
pub trait FocusProvider<K> {
    /// The element inside `root` marked for autofocus, if any.
    fn autofocus_target(&self, root: &K) -> Option<K>;

    /// Move input focus to `node`.
    fn focus(&self, node: &K);
}

type ToggleCallback = Box<dyn FnMut(bool)>;

/// Construction inputs for a [`Popover`].
#[derive(Default)]
pub struct PopoverProps {
    open: Option<bool>,
    on_toggle: Option<ToggleCallback>,
    position: Side,
    disabled: bool,
    gutter: Gutter,
    aria_label: Option<Cow<'static, str>>,
}

impl PopoverProps {
    /// Uncontrolled, enabled, opening below the trigger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the popover controlled, starting at `open`.
    #[must_use]
    pub fn open(mut self, open: bool) -> Self {
        self.open = Some(open);
        self
    }

    /// Callback receiving every requested change of the open value.
    #[must_use]
    pub fn on_toggle(mut self, on_toggle: impl FnMut(bool) + 'static) -> Self {
        self.on_toggle = Some(Box::new(on_toggle));
        self
    }

    /// Side of the trigger the panel opens on.
    #[must_use]
    pub fn position(mut self, position: Side) -> Self {
        self.position = position;
        self
    }

    /// Make the trigger inert.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Margin kept between the panel and the scroll container's edges.
    #[must_use]
    pub fn gutter(mut self, gutter: Gutter) -> Self {
        self.gutter = gutter;
        self
    }

    /// Accessible name of the trigger.
    #[must_use]
    pub fn aria_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.aria_label = Some(label.into());
        self
    }
}

impl fmt::Debug for PopoverProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopoverProps")
            .field("open", &self.open)
            .field("on_toggle", &self.on_toggle.is_some())
            .field("position", &self.position)
            .field("disabled", &self.disabled)
            .field("gutter", &self.gutter)
            .field("aria_label", &self.aria_label)
            .finish()
    }
}

/// Accessibility attributes for the trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerAttributes {
    /// Whether the panel is open (`aria-expanded`).
    pub expanded: bool,
    /// Whether the trigger is inert (disabled).
    pub inert: bool,
    /// Accessible name (`aria-label`).
    pub label: Option<Cow<'static, str>>,
}

impl TriggerAttributes {
    /// The trigger always announces a popup (`aria-haspopup`).
    pub fn has_popup(&self) -> bool {
        true
    }

    /// Attribute name/value pairs, ready to apply to a DOM-like node.
    pub fn attributes(&self) -> SmallVec<[(&'static str, Cow<'static, str>); 4]> {
        let mut out: SmallVec<[(&'static str, Cow<'static, str>); 4]> = SmallVec::new();
        out.push(("aria-haspopup", Cow::Borrowed("true")));
        out.push((
            "aria-expanded",
            Cow::Borrowed(if self.expanded { "true" } else { "false" }),
        ));
        if self.inert {
            out.push(("inert", Cow::Borrowed("")));
        }
        if let Some(label) = &self.label {
            out.push(("aria-label", label.clone()));
        }
        out
    }
}

/// Positioning for the panel.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelStyle {
    /// Horizontal translation expression.
    pub translate: String,
    /// Maximum width expression.
    pub max_width: String,
    /// Side of the trigger the panel opens on.
    pub side: Side,
    /// Where the arrow joining trigger and panel goes; `None` while closed.
    pub arrow: Option<Side>,
}

/// Cloneable handle that closes its popover; hand it to panel content.
///
/// Closing through a handle whose popover has been dropped does nothing.
#[derive(Clone)]
pub struct Closer {
    target: Weak<dyn Dismiss>,
}

impl Closer {
    /// Request the popover to close.
    pub fn close(&self) {
        if let Some(target) = self.target.upgrade() {
            target.dismiss();
        }
    }
}

impl fmt::Debug for Closer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closer")
            .field("live", &(self.target.strong_count() > 0))
            .finish_non_exhaustive()
    }
}

trait Dismiss {
    fn dismiss(&self);
}

/// State shared with the global event handlers.
struct Shared<K, H> {
    host: Rc<H>,
    state: RefCell<Disclosure>,
    focus: RefCell<FocusOnOpen>,
    layout: RefCell<PanelLayout>,
    root: RefCell<Option<K>>,
    on_toggle: RefCell<Option<ToggleCallback>>,
    queued: RefCell<VecDeque<bool>>,
    notifying: Cell<bool>,
}

impl<K, H> Shared<K, H>
where
    K: Clone + PartialEq + 'static,
    H: LayoutProvider<K> + FocusProvider<K> + 'static,
{
    fn toggle(&self, next: bool) {
        let toggle = self.state.borrow_mut().toggle(next);
        if let Some(open) = toggle.notify {
            self.notify(open);
        }
        self.commit();
    }

    fn set_external(&self, open: bool) -> Result<(), DisclosureError> {
        self.state.borrow_mut().set_external(open)?;
        self.commit();
        Ok(())
    }

    fn notify(&self, open: bool) {
        let callback = self.on_toggle.borrow_mut().take();
        let Some(mut callback) = callback else {
            if self.notifying.get() {
                // Called from inside the callback; deliver after it returns.
                self.queued.borrow_mut().push_back(open);
            }
            return;
        };
        self.notifying.set(true);
        callback(open);
        loop {
            let next = self.queued.borrow_mut().pop_front();
            let Some(next) = next else {
                break;
            };
            callback(next);
        }
        self.notifying.set(false);
        let mut slot = self.on_toggle.borrow_mut();
        // The callback may have installed a replacement for itself.
        if slot.is_none() {
            *slot = Some(callback);
        }
    }

    /// Run the effects of the committed open value.
    fn commit(&self) {
        let open = self.state.borrow().is_open();
        if !self.focus.borrow_mut().commit(open) {
            return;
        }
        let root = self.root.borrow().clone();
        let Some(root) = root else {
            return;
        };
        match self.host.autofocus_target(&root) {
            Some(target) => {
                trace!("focusing autofocus target on open");
                self.host.focus(&target);
            }
            None => trace!("no autofocus target in opened panel"),
        }
    }

    fn remeasure(&self) -> bool {
        let root = self.root.borrow().clone();
        let updated = self.layout.borrow_mut().update(&*self.host, root.as_ref());
        if !updated {
            debug!("panel measurement skipped; keeping previous offsets");
        }
        updated
    }
}

impl<K, H> Dismiss for Shared<K, H>
where
    K: Clone + PartialEq + 'static,
    H: LayoutProvider<K> + FocusProvider<K> + 'static,
{
    fn dismiss(&self) {
        self.toggle(false);
    }
}

/// Live subscriptions of a mounted popover; dropping this removes them.
struct Mounted<K> {
    events: GlobalEvents<K>,
    keyboard: ListenerId,
    resize: ListenerId,
    pointer: WatchId,
}

impl<K> Drop for Mounted<K> {
    fn drop(&mut self) {
        self.events.keyboard.remove(self.keyboard);
        self.events.resize.remove(self.resize);
        self.events.pointer.unwatch(self.pointer);
    }
}

/// A trigger/panel pair with dismissal, layout, and focus management.
pub struct Popover<K, H>
where
    K: Clone + PartialEq + 'static,
    H: LayoutProvider<K> + FocusProvider<K> + 'static,
{
    shared: Rc<Shared<K, H>>,
    position: Side,
    disabled: bool,
    gutter: Gutter,
    aria_label: Option<Cow<'static, str>>,
    mounted: Option<Mounted<K>>,
}

impl<K, H> Popover<K, H>
where
    K: Clone + PartialEq + 'static,
    H: LayoutProvider<K> + FocusProvider<K> + 'static,
{
    /// Create an unmounted popover.
    pub fn new(props: PopoverProps, host: Rc<H>) -> Self {
        let PopoverProps {
            open,
            on_toggle,
            position,
            disabled,
            gutter,
            aria_label,
        } = props;
        let shared = Rc::new(Shared {
            host,
            state: RefCell::new(Disclosure::new(open)),
            focus: RefCell::new(FocusOnOpen::default()),
            layout: RefCell::new(PanelLayout::default()),
            root: RefCell::new(None),
            on_toggle: RefCell::new(on_toggle),
            queued: RefCell::new(VecDeque::new()),
            notifying: Cell::new(false),
        });
        Self {
            shared,
            position,
            disabled,
            gutter,
            aria_label,
            mounted: None,
        }
    }

    /// Subscribe to `events` and measure the panel.
    ///
    /// Mounting an already mounted popover only updates its root node.
    pub fn mount(&mut self, root: Option<K>, events: &GlobalEvents<K>) {
        if self.mounted.is_some() {
            self.set_root(root);
            return;
        }
        *self.shared.root.borrow_mut() = root.clone();

        let weak = Rc::downgrade(&self.shared);
        let keyboard = events.keyboard.add({
            let weak = weak.clone();
            move |event: &KeyEvent| {
                if event.is_escape() {
                    if let Some(shared) = weak.upgrade() {
                        shared.toggle(false);
                    }
                }
            }
        });
        let resize = events.resize.add({
            let weak = weak.clone();
            move |_: &ResizeEvent| {
                if let Some(shared) = weak.upgrade() {
                    shared.remeasure();
                }
            }
        });
        let pointer = events.pointer.watch(root, move |_: &PointerInteraction<K>| {
            if let Some(shared) = weak.upgrade() {
                shared.toggle(false);
            }
        });
        self.mounted = Some(Mounted {
            events: events.clone(),
            keyboard,
            resize,
            pointer,
        });
        debug!("popover mounted");

        // A fresh mount runs the open effects again.
        *self.shared.focus.borrow_mut() = FocusOnOpen::default();
        self.shared.remeasure();
        self.shared.commit();
    }

    /// Remove every subscription. The open value is kept.
    pub fn unmount(&mut self) {
        if self.mounted.take().is_some() {
            *self.shared.root.borrow_mut() = None;
            debug!("popover unmounted");
        }
    }

    /// Returns `true` between [`Popover::mount`] and [`Popover::unmount`].
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Update the root node: the owned region for dismissal and the layout anchor.
    pub fn set_root(&self, root: Option<K>) {
        *self.shared.root.borrow_mut() = root.clone();
        if let Some(mounted) = &self.mounted {
            if let Err(err) = mounted.events.pointer.set_owned(mounted.pointer, root) {
                debug!(%err, "outside watch vanished while mounted");
            }
        }
    }

    /// Supply the owner's value of a controlled popover.
    pub fn set_open(&self, open: bool) -> Result<(), DisclosureError> {
        self.shared.set_external(open)
    }

    /// Request the open value `next`.
    pub fn toggle(&self, next: bool) {
        self.shared.toggle(next);
    }

    /// Handle activation of the trigger. Returns `false` if the trigger is inert.
    pub fn press_trigger(&self) -> bool {
        if self.disabled {
            trace!("trigger press ignored while disabled");
            return false;
        }
        self.shared.toggle(!self.is_open());
        true
    }

    /// A handle panel content can use to close the popover.
    pub fn closer(&self) -> Closer {
        let shared: Weak<Shared<K, H>> = Rc::downgrade(&self.shared);
        let target: Weak<dyn Dismiss> = shared;
        Closer { target }
    }

    /// Replace the change callback.
    pub fn set_on_toggle(&self, on_toggle: impl FnMut(bool) + 'static) {
        *self.shared.on_toggle.borrow_mut() = Some(Box::new(on_toggle));
    }

    /// Re-measure the panel now. Returns `true` if the offsets were updated.
    pub fn remeasure(&self) -> bool {
        self.shared.remeasure()
    }

    /// Current open value.
    pub fn is_open(&self) -> bool {
        self.shared.state.borrow().is_open()
    }

    /// Returns `true` if the open value is supplied by an owner.
    pub fn is_controlled(&self) -> bool {
        self.shared.state.borrow().is_controlled()
    }

    /// Returns `true` if the trigger is inert.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Make the trigger inert or interactive. An open panel stays open.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Side of the trigger the panel opens on.
    pub fn side(&self) -> Side {
        self.position
    }

    /// Last measured offsets.
    pub fn layout(&self) -> LayoutOffsets {
        self.shared.layout.borrow().offsets()
    }

    /// Positioning for the panel.
    pub fn panel_style(&self) -> PanelStyle {
        let offsets = self.layout();
        PanelStyle {
            translate: offsets.translate_expr(&self.gutter),
            max_width: offsets.max_width_expr(&self.gutter),
            side: self.position,
            arrow: self.is_open().then_some(self.position),
        }
    }

    /// Accessibility attributes for the trigger.
    pub fn trigger_attributes(&self) -> TriggerAttributes {
        TriggerAttributes {
            expanded: self.is_open(),
            inert: self.disabled,
            label: self.aria_label.clone(),
        }
    }
}

impl<K, H> fmt::Debug for Popover<K, H>
where
    K: Clone + PartialEq + fmt::Debug + 'static,
    H: LayoutProvider<K> + FocusProvider<K> + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Popover")
            .field("state", &*self.shared.state.borrow())
            .field("root", &*self.shared.root.borrow())
            .field("layout", &self.layout())
            .field("position", &self.position)
            .field("disabled", &self.disabled)
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Key;
    use crate::layout::Overflow;
    use crate::types::ParentLookup;
    use alloc::vec::Vec;
    use kurbo::{Point, Rect};

    /// 1: clipping container 500 wide at x = 0, 2: popover root at x = 50, 3: autofocus child.
    #[derive(Default)]
    struct Host {
        container_width: Cell<f64>,
        focused: RefCell<Vec<u32>>,
    }

    impl ParentLookup<u32> for Host {
        fn parent_of(&self, node: &u32) -> Option<u32> {
            match node {
                2 => Some(1),
                3 => Some(2),
                _ => None,
            }
        }
    }

    impl LayoutProvider<u32> for Host {
        fn overflow(&self, node: &u32) -> Overflow {
            if *node == 1 {
                Overflow::Hidden
            } else {
                Overflow::Visible
            }
        }

        fn client_width(&self, _: &u32) -> f64 {
            self.container_width.get()
        }

        fn bounding_rect(&self, node: &u32) -> Option<Rect> {
            let x0 = match node {
                1 => 0.0,
                2 | 3 => 50.0,
                _ => return None,
            };
            Some(Rect::new(x0, 0.0, x0 + 40.0, 20.0))
        }
    }

    impl FocusProvider<u32> for Host {
        fn autofocus_target(&self, root: &u32) -> Option<u32> {
            (*root == 2).then_some(3)
        }

        fn focus(&self, node: &u32) {
            self.focused.borrow_mut().push(*node);
        }
    }

    fn host() -> Rc<Host> {
        let host = Host::default();
        host.container_width.set(500.0);
        Rc::new(host)
    }

    fn recording(props: PopoverProps) -> (PopoverProps, Rc<RefCell<Vec<bool>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let props = props.on_toggle({
            let log = log.clone();
            move |open| log.borrow_mut().push(open)
        });
        (props, log)
    }

    #[test]
    fn mount_measures_and_subscribes_once() {
        let events = GlobalEvents::new();
        let mut popover = Popover::new(PopoverProps::new(), host());
        popover.mount(Some(2), &events);
        popover.mount(Some(2), &events);

        assert_eq!(events.keyboard.len(), 1);
        assert_eq!(events.resize.len(), 1);
        assert_eq!(events.pointer.len(), 1);
        assert_eq!(
            popover.layout(),
            LayoutOffsets {
                space: 450.0,
                max_width: 500.0
            }
        );
    }

    #[test]
    fn resize_remeasures_until_unmount() {
        let events = GlobalEvents::new();
        let host = host();
        let mut popover = Popover::new(PopoverProps::new(), host.clone());
        popover.mount(Some(2), &events);

        host.container_width.set(300.0);
        events.resize.dispatch(&ResizeEvent::new(300.0, 600.0));
        assert_eq!(popover.layout().space, 250.0);
        assert_eq!(popover.layout().max_width, 300.0);

        popover.unmount();
        host.container_width.set(800.0);
        assert_eq!(events.resize.dispatch(&ResizeEvent::new(800.0, 600.0)), 0);
        assert_eq!(popover.layout().max_width, 300.0);
    }

    #[test]
    fn missing_root_keeps_default_layout() {
        let events = GlobalEvents::new();
        let mut popover = Popover::new(PopoverProps::new(), host());
        popover.mount(None, &events);
        assert_eq!(popover.layout(), LayoutOffsets::default());
        assert!(!popover.remeasure());
    }

    #[test]
    fn escape_closes_and_is_silent_when_closed() {
        let events = GlobalEvents::new();
        let (props, log) = recording(PopoverProps::new());
        let mut popover = Popover::new(props, host());
        popover.mount(Some(2), &events);

        events.keyboard.dispatch(&KeyEvent::new(Key::Escape));
        assert!(log.borrow().is_empty());

        popover.toggle(true);
        events.keyboard.dispatch(&KeyEvent::new(Key::Character('x')));
        assert!(popover.is_open());
        events.keyboard.dispatch(&KeyEvent::new(Key::Escape));
        assert!(!popover.is_open());
        assert_eq!(*log.borrow(), [true, false]);
    }

    #[test]
    fn outside_press_closes_once_and_inside_press_does_not() {
        let events = GlobalEvents::new();
        let (props, log) = recording(PopoverProps::new());
        let mut popover = Popover::new(props, host());
        popover.mount(Some(2), &events);
        popover.toggle(true);

        events
            .pointer
            .dispatch(&PointerInteraction::down(Point::ZERO, [1, 2, 3]));
        assert!(popover.is_open());

        events
            .pointer
            .dispatch(&PointerInteraction::down(Point::ZERO, [1, 9]));
        events
            .pointer
            .dispatch(&PointerInteraction::down(Point::ZERO, [1, 9]));
        assert!(!popover.is_open());
        assert_eq!(*log.borrow(), [true, false]);
    }

    #[test]
    fn focus_moves_into_panel_once_per_opening() {
        let events = GlobalEvents::new();
        let host = host();
        let mut popover = Popover::new(PopoverProps::new(), host.clone());
        popover.mount(Some(2), &events);

        popover.toggle(true);
        popover.toggle(true);
        popover.set_root(Some(2));
        assert_eq!(*host.focused.borrow(), [3]);

        popover.toggle(false);
        popover.toggle(true);
        assert_eq!(*host.focused.borrow(), [3, 3]);
    }

    #[test]
    fn controlled_popover_waits_for_owner() {
        let events = GlobalEvents::new();
        let host = host();
        let (props, log) = recording(PopoverProps::new().open(false));
        let mut popover = Popover::new(props, host.clone());
        popover.mount(Some(2), &events);

        assert!(popover.press_trigger());
        assert!(!popover.is_open());
        assert_eq!(*log.borrow(), [true]);
        assert!(host.focused.borrow().is_empty());

        popover.set_open(true).unwrap();
        assert!(popover.is_open());
        assert_eq!(*host.focused.borrow(), [3]);
    }

    #[test]
    fn disabled_trigger_is_inert_but_state_still_works() {
        let events = GlobalEvents::new();
        let mut popover = Popover::new(PopoverProps::new(), host());
        popover.mount(Some(2), &events);
        popover.toggle(true);

        popover.set_disabled(true);
        assert!(popover.is_open(), "disabling does not close");
        assert!(!popover.press_trigger());
        assert!(popover.is_open());
        assert!(popover.trigger_attributes().inert);

        popover.closer().close();
        assert!(!popover.is_open());
    }

    #[test]
    fn toggle_from_inside_callback_converges() {
        let events = GlobalEvents::new();
        let mut popover = Popover::new(PopoverProps::new(), host());
        popover.mount(Some(2), &events);

        let closer = popover.closer();
        let log = Rc::new(RefCell::new(Vec::new()));
        popover.set_on_toggle({
            let log = log.clone();
            move |open| {
                log.borrow_mut().push(open);
                if open {
                    closer.close();
                }
            }
        });

        popover.toggle(true);
        assert!(!popover.is_open());
        assert_eq!(*log.borrow(), [true, false]);
    }

    #[test]
    fn dropping_unsubscribes() {
        let events = GlobalEvents::new();
        let mut popover = Popover::new(PopoverProps::new(), host());
        popover.mount(Some(2), &events);
        let closer = popover.closer();
        drop(popover);

        assert!(events.keyboard.is_empty());
        assert!(events.resize.is_empty());
        assert!(events.pointer.is_empty());
        closer.close();
    }

    #[test]
    fn trigger_attributes_reflect_state() {
        let events = GlobalEvents::new();
        let mut popover = Popover::new(PopoverProps::new().aria_label("Account"), host());
        popover.mount(Some(2), &events);

        let closed = popover.trigger_attributes().attributes();
        assert_eq!(
            closed.as_slice(),
            &[
                ("aria-haspopup", Cow::Borrowed("true")),
                ("aria-expanded", Cow::Borrowed("false")),
                ("aria-label", Cow::Borrowed("Account")),
            ]
        );

        popover.toggle(true);
        let attrs = popover.trigger_attributes();
        assert!(attrs.has_popup());
        assert!(attrs.expanded);
    }

    #[test]
    fn panel_style_places_arrow_only_while_open() {
        let events = GlobalEvents::new();
        let mut popover = Popover::new(
            PopoverProps::new()
                .position(Side::Top)
                .gutter(Gutter::Px(16.0)),
            host(),
        );
        popover.mount(Some(2), &events);

        let style = popover.panel_style();
        assert_eq!(style.translate, "min(450px - 100% - 16px, 0px)");
        assert_eq!(style.max_width, "calc(500px - 2 * 16px)");
        assert_eq!(style.side, Side::Top);
        assert_eq!(style.arrow, None);

        popover.toggle(true);
        assert_eq!(popover.panel_style().arrow, Some(Side::Top));
    }
}
