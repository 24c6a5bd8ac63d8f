// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchored panel layout: keep a panel inside its nearest clipping ancestor.
//!
//! A panel is positioned at its anchor's left edge. When the panel would run
//! past the right edge of the *scroll container* (the nearest ancestor whose
//! overflow is not `visible`), it is translated left just enough to fit, but
//! never further left than its natural position. Its width is capped to the
//! container's width.
//!
//! ## Algorithm
//!
//! 1) Start at the anchor's parent and walk up while the ancestor's overflow is
//!    exactly [`Overflow::Visible`], stopping at the first clipping ancestor or
//!    at the root. That node is the scroll container.
//! 2) `space = client_width(container) - (anchor.x0 - container.x0)`.
//! 3) `max_width = client_width(container)`.
//!
//! The offsets are rendered as CSS expressions so that `100%` can refer to the
//! panel's own width:
//!
//! - translate: `min({space}px - 100% - {gutter}, 0px)`
//! - max width: `calc({max_width}px - 2 * {gutter})`
//!
//! Hosts without a CSS engine can use [`LayoutOffsets::resolve`] instead.
//!
//! ```
//! use understory_disclosure::layout::{Gutter, LayoutOffsets};
//!
//! let offsets = LayoutOffsets { space: 450.0, max_width: 500.0 };
//! let gutter = Gutter::default();
//! assert_eq!(offsets.translate_expr(&gutter), "min(450px - 100% - var(--spacer-4), 0px)");
//! assert_eq!(offsets.max_width_expr(&gutter), "calc(500px - 2 * var(--spacer-4))");
//!
//! let resolved = offsets.resolve(480.0, 16.0);
//! assert_eq!(resolved.translate_x, -46.0);
//! assert_eq!(resolved.max_width, 468.0);
//! ```

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use core::fmt;

use kurbo::Rect;
use tracing::trace;

use crate::types::ParentLookup;

/// Computed overflow of a node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Overflow {
    /// Content may paint outside the node.
    #[default]
    Visible,
    /// Content is clipped without scrollbars.
    Hidden,
    /// Content is clipped and cannot be scrolled programmatically.
    Clip,
    /// Content is clipped and always scrollable.
    Scroll,
    /// Content is clipped and scrollable when it overflows.
    Auto,
}

/// Geometry and style queries over the host's node tree.
///
/// Coordinates are in viewport space.
pub trait LayoutProvider<K>: ParentLookup<K> {
    /// Computed overflow of `node`.
    fn overflow(&self, node: &K) -> Overflow;

    /// Inner width of `node`, excluding borders and scrollbars.
    fn client_width(&self, node: &K) -> f64;

    /// Border box of `node`, or `None` if it is not laid out.
    fn bounding_rect(&self, node: &K) -> Option<Rect>;
}

/// Find the nearest ancestor of `anchor` that clips its content.
///
/// Falls back to the root when every ancestor has visible overflow. Returns
/// `None` when `anchor` has no parent.
pub fn scroll_container<K, P>(provider: &P, anchor: &K) -> Option<K>
where
    P: LayoutProvider<K> + ?Sized,
{
    let mut container = provider.parent_of(anchor)?;
    while provider.overflow(&container) == Overflow::Visible {
        match provider.parent_of(&container) {
            Some(parent) => container = parent,
            None => break,
        }
    }
    Some(container)
}

/// Measure the offsets for a panel anchored at `anchor`.
///
/// Returns `None` if the anchor has no parent or either box is not laid out.
pub fn measure<K, P>(provider: &P, anchor: &K) -> Option<LayoutOffsets>
where
    P: LayoutProvider<K> + ?Sized,
{
    let container = scroll_container(provider, anchor)?;
    let anchor_rect = provider.bounding_rect(anchor)?;
    let container_rect = provider.bounding_rect(&container)?;
    let width = provider.client_width(&container);
    Some(LayoutOffsets {
        space: width - (anchor_rect.x0 - container_rect.x0),
        max_width: width,
    })
}

/// Margin kept between the panel and the scroll container's edges.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gutter {
    /// A CSS custom property, rendered as `var(name)`.
    Var(Cow<'static, str>),
    /// A fixed length in pixels.
    Px(f64),
}

impl Default for Gutter {
    fn default() -> Self {
        Self::Var(Cow::Borrowed("--spacer-4"))
    }
}

impl fmt::Display for Gutter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(name) => write!(f, "var({name})"),
            Self::Px(px) => write!(f, "{px}px"),
        }
    }
}

/// Measured space for a panel; see the [module docs](self).
///
/// Both fields are `0` until the first successful measurement.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutOffsets {
    /// Width available between the anchor's left edge and the container's right edge.
    pub space: f64,
    /// Client width of the scroll container.
    pub max_width: f64,
}

impl LayoutOffsets {
    /// Horizontal translation as a CSS expression.
    pub fn translate_expr(&self, gutter: &Gutter) -> String {
        format!("min({}px - 100% - {gutter}, 0px)", self.space)
    }

    /// Maximum panel width as a CSS expression.
    pub fn max_width_expr(&self, gutter: &Gutter) -> String {
        format!("calc({}px - 2 * {gutter})", self.max_width)
    }

    /// Evaluate the expressions for a panel of `panel_width` with a gutter of `gutter_px`.
    pub fn resolve(&self, panel_width: f64, gutter_px: f64) -> ResolvedOffsets {
        ResolvedOffsets {
            translate_x: (self.space - panel_width - gutter_px).min(0.0),
            max_width: self.max_width - 2.0 * gutter_px,
        }
    }
}

/// [`LayoutOffsets`] evaluated to pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ResolvedOffsets {
    /// Horizontal translation; never positive.
    pub translate_x: f64,
    /// Maximum panel width.
    pub max_width: f64,
}

/// Last known offsets of one panel.
///
/// Failed measurements keep the previous values, so a panel whose anchor is
/// briefly detached stays where it was.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PanelLayout {
    offsets: LayoutOffsets,
    measured: bool,
}

impl PanelLayout {
    /// Current offsets.
    pub fn offsets(&self) -> LayoutOffsets {
        self.offsets
    }

    /// Returns `true` once a measurement has succeeded.
    pub fn is_measured(&self) -> bool {
        self.measured
    }

    /// Re-measure against `anchor`. Returns `true` if the offsets were updated.
    pub fn update<K, P>(&mut self, provider: &P, anchor: Option<&K>) -> bool
    where
        P: LayoutProvider<K> + ?Sized,
    {
        let Some(offsets) = anchor.and_then(|anchor| measure(provider, anchor)) else {
            return false;
        };
        trace!(space = offsets.space, max_width = offsets.max_width, "panel measured");
        self.offsets = offsets;
        self.measured = true;
        true
    }
}
