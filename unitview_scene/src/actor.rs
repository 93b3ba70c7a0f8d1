// Copyright 2025 the Unitview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Size, Vec2};
use unitview_space::CoordinateSpace;

use crate::drawable::{Drawable, Handle, Placement};
use crate::error::ViewportError;
use crate::node::{DisplayNode, NodeContent};
use crate::render::Renderer;
use crate::viewport::Viewport;

/// An image entity driven by simulation state.
///
/// An actor does not integrate motion. Physics code mutates its position
/// and [`velocity`](Self::velocity) between frames, and every
/// [`draw`](Drawable::draw) re-derives the on-screen pose from the current
/// values. With [`autorotate`](Self::autorotate) set, the image faces along
/// the velocity vector.
#[derive(Clone, Debug)]
pub struct Actor {
    placement: Placement,
    /// Velocity in units per second.
    pub velocity: Vec2,
    /// Orient the image along [`velocity`](Self::velocity) instead of the
    /// placement rotation.
    pub autorotate: bool,
    image: String,
    native_size: Option<Size>,
}

impl Actor {
    /// Creates a stationary actor showing `image` at `position` (units).
    #[must_use]
    pub fn new(image: impl Into<String>, position: Point) -> Self {
        Self {
            placement: Placement::new(position),
            velocity: Vec2::ZERO,
            autorotate: false,
            image: image.into(),
            native_size: None,
        }
    }

    /// Sets the initial velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Enables or disables orientation along the velocity.
    #[must_use]
    pub fn with_autorotate(mut self, autorotate: bool) -> Self {
        self.autorotate = autorotate;
        self
    }

    /// Forces the rendered size in units; see [`Placement`] for the rules.
    #[must_use]
    pub fn with_size(mut self, width_units: Option<f64>, height_units: Option<f64>) -> Self {
        self.placement.width_units = width_units;
        self.placement.height_units = height_units;
        self
    }

    /// Records the decoded image size, when it is already known.
    #[must_use]
    pub fn with_native_size(mut self, native_size: Size) -> Self {
        self.native_size = Some(native_size);
        self
    }

    /// Registers the actor with `viewport`.
    pub fn spawn<R: Renderer>(
        self,
        viewport: &mut Viewport<R>,
    ) -> Result<Handle<Self>, ViewportError> {
        viewport.register(self)
    }

    /// Returns the image URL.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Returns the position in units.
    #[must_use]
    pub fn position(&self) -> Point {
        self.placement.position
    }

    /// Moves the actor to `position` (units).
    pub fn set_position(&mut self, position: Point) {
        self.placement.position = position;
    }

    /// Returns the decoded image size, if known.
    #[must_use]
    pub fn native_size(&self) -> Option<Size> {
        self.native_size
    }

    /// Records the decoded image size.
    ///
    /// Apply this through [`Viewport::edit`] so the scale is recomputed
    /// right away.
    pub fn set_native_size(&mut self, native_size: Size) {
        self.native_size = Some(native_size);
    }

    /// Rendered rotation in pixel space.
    ///
    /// With autorotate this is `atan2(-vy, vx)`: the heading follows the
    /// velocity, with `vy` negated for the downward pixel Y axis. Otherwise
    /// it is the negated placement rotation.
    #[must_use]
    pub fn heading(&self) -> f64 {
        if self.autorotate {
            (-self.velocity.y).atan2(self.velocity.x)
        } else {
            -self.placement.rotation
        }
    }
}

impl Drawable for Actor {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn create_node(&self) -> DisplayNode {
        DisplayNode::new(NodeContent::Sprite {
            image: self.image.clone(),
            native_size: self.native_size,
        })
    }

    fn on_resize(&self, space: &CoordinateSpace, node: &mut DisplayNode) {
        node.scale = match self.native_size {
            Some(native) => self.placement.scale_for(native, space.pixels_per_unit()),
            None => Vec2::new(1.0, 1.0),
        };
        if let NodeContent::Sprite { native_size, .. } = &mut node.content {
            *native_size = self.native_size;
        }
    }

    fn draw(&self, space: &CoordinateSpace, node: &mut DisplayNode) {
        self.placement.apply(space, node);
        node.rotation = self.heading();
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::FRAC_PI_2;

    use kurbo::{Point, Size, Vec2};
    use unitview_space::CoordinateSpace;

    use super::Actor;
    use crate::drawable::Drawable;

    #[test]
    fn autorotate_follows_velocity() {
        let mut actor = Actor::new("ball.png", Point::ZERO)
            .with_velocity(Vec2::new(35.0, 0.0))
            .with_autorotate(true);
        assert_eq!(actor.heading(), 0.0);

        actor.velocity = Vec2::new(0.0, 35.0);
        assert!((actor.heading() + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn manual_rotation_is_negated() {
        let mut actor = Actor::new("ball.png", Point::ZERO);
        actor.placement_mut().rotation = 0.25;
        assert_eq!(actor.heading(), -0.25);
    }

    #[test]
    fn draw_reflects_velocity_changed_since_last_frame() {
        let space = CoordinateSpace::new(Size::new(100.0, 100.0));
        let mut actor = Actor::new("ball.png", Point::new(10.0, 10.0)).with_autorotate(true);
        actor.velocity = Vec2::new(1.0, 0.0);
        let mut node = actor.create_node();
        actor.draw(&space, &mut node);
        assert_eq!(node.rotation, 0.0);
        assert_eq!(node.position, Point::new(10.0, 90.0));

        actor.velocity = Vec2::new(0.0, -1.0);
        actor.draw(&space, &mut node);
        assert!((node.rotation - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn resize_scales_from_forced_width() {
        let mut space = CoordinateSpace::new(Size::new(800.0, 400.0));
        space.set_width_units(Some(100.0));
        let actor = Actor::new("ship.png", Point::ZERO)
            .with_size(Some(4.0), None)
            .with_native_size(Size::new(64.0, 32.0));
        let mut node = actor.create_node();
        actor.on_resize(&space, &mut node);
        // 4 units * 8 px/unit / 64 px
        assert_eq!(node.scale, Vec2::new(0.5, 0.5));
    }
}
