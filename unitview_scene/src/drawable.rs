// Copyright 2025 the Unitview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawable lifecycle protocol shared by all visual entities.

use core::any::Any;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use kurbo::{Point, Size, Vec2};
use unitview_space::CoordinateSpace;

use crate::node::DisplayNode;

/// Identifier of a drawable registered with a [`Viewport`](crate::Viewport).
///
/// Identifiers are never reused by a viewport, so an identifier of a
/// destroyed drawable stays stale forever.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableId(pub(crate) u64);

/// Typed handle to a registered drawable.
///
/// A handle is the drawable's link to its viewport. It never owns the
/// viewport; it only names an entry in the viewport's registry and goes
/// stale once the drawable is destroyed.
pub struct Handle<T> {
    id: DrawableId,
    kind: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) const fn new(id: DrawableId) -> Self {
        Self {
            id,
            kind: PhantomData,
        }
    }

    /// Returns the untyped identifier.
    #[must_use]
    pub const fn id(self) -> DrawableId {
        self.id
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.id.0).finish()
    }
}

impl<T> From<Handle<T>> for DrawableId {
    fn from(handle: Handle<T>) -> Self {
        handle.id
    }
}

/// Unit-space placement shared by every drawable.
///
/// - `position` is the anchor point in units.
/// - `width_units` / `height_units` force the rendered size. When only one
///   is set the other axis uses the same scale factor; non-uniform scaling
///   needs both.
/// - `rotation` is counter-clockwise in unit space.
/// - `anchor` and `alpha` are clamped into `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// Anchor position in units.
    pub position: Point,
    /// Forced width in units.
    pub width_units: Option<f64>,
    /// Forced height in units.
    pub height_units: Option<f64>,
    /// Rotation in radians, counter-clockwise in unit space.
    pub rotation: f64,
    anchor: Point,
    alpha: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(Point::ZERO)
    }
}

impl Placement {
    /// Creates a centered, opaque, unrotated placement at `position`.
    #[must_use]
    pub fn new(position: Point) -> Self {
        Self {
            position,
            width_units: None,
            height_units: None,
            rotation: 0.0,
            anchor: Point::new(0.5, 0.5),
            alpha: 1.0,
        }
    }

    /// Returns the anchor as a fraction of the content size.
    #[must_use]
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Sets the anchor, clamping both coordinates into `[0, 1]`.
    pub fn set_anchor(&mut self, anchor: Point) {
        self.anchor = Point::new(anchor.x.clamp(0.0, 1.0), anchor.y.clamp(0.0, 1.0));
    }

    /// Returns the opacity.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Sets the opacity, clamped into `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Writes the pixel position, rotation, anchor and opacity into `node`.
    ///
    /// Rotation is negated because the pixel Y axis points down.
    pub fn apply(&self, space: &CoordinateSpace, node: &mut DisplayNode) {
        node.position = space.unit_to_pixel(self.position);
        node.rotation = -self.rotation;
        node.anchor = self.anchor;
        node.alpha = self.alpha;
    }

    /// Scale factors that render content of `native` pixel size at the forced size.
    ///
    /// Without a forced size (or without a usable native size on the forced
    /// axes) the content is drawn unscaled.
    #[must_use]
    pub fn scale_for(&self, native: Size, pixels_per_unit: f64) -> Vec2 {
        let sx = self
            .width_units
            .filter(|_| native.width > 0.0)
            .map(|w| w * pixels_per_unit / native.width);
        let sy = self
            .height_units
            .filter(|_| native.height > 0.0)
            .map(|h| h * pixels_per_unit / native.height);
        match (sx, sy) {
            (Some(sx), Some(sy)) => Vec2::new(sx, sy),
            (Some(s), None) | (None, Some(s)) => Vec2::new(s, s),
            (None, None) => Vec2::new(1.0, 1.0),
        }
    }
}

/// A visual entity owned by a [`Viewport`](crate::Viewport).
///
/// The viewport owns one [`DisplayNode`] per drawable and calls back into
/// the drawable to keep that node in sync with unit-space state:
/// - [`Drawable::on_resize`] whenever pixels-per-unit may have changed.
/// - [`Drawable::draw`] once per frame.
///
/// Both receive the viewport's current [`CoordinateSpace`], so a drawable
/// never caches pixel geometry across calls.
pub trait Drawable: Any + fmt::Debug {
    /// Returns the shared unit-space placement.
    fn placement(&self) -> &Placement;

    /// Returns the shared unit-space placement for mutation.
    fn placement_mut(&mut self) -> &mut Placement;

    /// Builds the display node attached when the drawable is registered.
    fn create_node(&self) -> DisplayNode;

    /// Recomputes pixel-space state that depends on pixels-per-unit.
    ///
    /// Must be idempotent and only touch `node`.
    fn on_resize(&self, space: &CoordinateSpace, node: &mut DisplayNode);

    /// Re-derives the node from the current unit-space state.
    ///
    /// The default places the node from [`Drawable::placement`].
    fn draw(&self, space: &CoordinateSpace, node: &mut DisplayNode) {
        self.placement().apply(space, node);
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size, Vec2};

    use super::Placement;

    #[test]
    fn anchor_and_alpha_are_clamped() {
        let mut placement = Placement::new(Point::ZERO);
        placement.set_anchor(Point::new(-1.0, 2.0));
        placement.set_alpha(1.5);
        assert_eq!(placement.anchor(), Point::new(0.0, 1.0));
        assert_eq!(placement.alpha(), 1.0);
    }

    #[test]
    fn single_forced_axis_scales_uniformly() {
        let native = Size::new(50.0, 100.0);
        let mut placement = Placement::new(Point::ZERO);
        assert_eq!(placement.scale_for(native, 10.0), Vec2::new(1.0, 1.0));

        placement.width_units = Some(10.0);
        assert_eq!(placement.scale_for(native, 10.0), Vec2::new(2.0, 2.0));

        placement.width_units = None;
        placement.height_units = Some(5.0);
        assert_eq!(placement.scale_for(native, 10.0), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn both_forced_axes_scale_independently() {
        let mut placement = Placement::new(Point::ZERO);
        placement.width_units = Some(10.0);
        placement.height_units = Some(5.0);
        let scale = placement.scale_for(Size::new(50.0, 100.0), 10.0);
        assert_eq!(scale, Vec2::new(2.0, 0.5));
    }
}
