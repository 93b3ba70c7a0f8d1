// Copyright 2025 the Unitview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vector primitives: line segments and filled circles.
//!
//! Both regenerate their pixel geometry from scratch on every resize, color
//! change, geometry change and frame. There is no incremental patching.

use kurbo::{Circle as Disk, Line, Point, Vec2};
use peniko::Color;
use unitview_space::CoordinateSpace;

use crate::drawable::{Drawable, Handle, Placement};
use crate::error::ViewportError;
use crate::node::{DisplayNode, NodeContent};
use crate::render::Renderer;
use crate::viewport::Viewport;

/// A straight line between two unit-space endpoints.
///
/// The start point is the placement position. Thickness is expressed in
/// units so strokes keep their size relative to the coordinate grid.
#[derive(Clone, Debug)]
pub struct LineSegment {
    placement: Placement,
    end: Point,
    thickness: f64,
    color: Color,
}

impl LineSegment {
    /// Creates a segment from `start` to `end` (units).
    #[must_use]
    pub fn new(start: Point, end: Point, thickness: f64, color: Color) -> Self {
        Self {
            placement: Placement::new(start),
            end,
            thickness: thickness.max(0.0),
            color,
        }
    }

    /// Registers the segment with `viewport`.
    pub fn spawn<R: Renderer>(
        self,
        viewport: &mut Viewport<R>,
    ) -> Result<Handle<Self>, ViewportError> {
        viewport.register(self)
    }

    /// Returns the start point in units.
    #[must_use]
    pub fn start(&self) -> Point {
        self.placement.position
    }

    /// Returns the end point in units.
    #[must_use]
    pub fn end(&self) -> Point {
        self.end
    }

    /// Moves both endpoints.
    pub fn set_endpoints(&mut self, start: Point, end: Point) {
        self.placement.position = start;
        self.end = end;
    }

    /// Returns the stroke thickness in units.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Sets the stroke thickness in units.
    pub fn set_thickness(&mut self, thickness: f64) {
        self.thickness = thickness.max(0.0);
    }

    /// Returns the stroke color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Sets the stroke color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Discards and rebuilds the node geometry.
    pub fn reset_graphic(&self, space: &CoordinateSpace, node: &mut DisplayNode) {
        self.placement.apply(space, node);
        let ppu = space.pixels_per_unit();
        let delta = self.end - self.placement.position;
        node.scale = Vec2::new(1.0, 1.0);
        node.content = NodeContent::Line {
            line: Line::new(Point::ZERO, Point::new(delta.x * ppu, -delta.y * ppu)),
            width: self.thickness * ppu,
            color: self.color,
        };
    }
}

impl Drawable for LineSegment {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn create_node(&self) -> DisplayNode {
        DisplayNode::new(NodeContent::Empty)
    }

    fn on_resize(&self, space: &CoordinateSpace, node: &mut DisplayNode) {
        self.reset_graphic(space, node);
    }

    fn draw(&self, space: &CoordinateSpace, node: &mut DisplayNode) {
        self.reset_graphic(space, node);
    }
}

/// A filled disk centered on the placement position.
///
/// The radius is kept as the forced size of the placement (`2 * r` on both
/// axes), so the generic sizing rules and [`Circle::set_radius`] agree.
#[derive(Clone, Debug)]
pub struct Circle {
    placement: Placement,
    color: Color,
}

impl Circle {
    /// Creates a disk of `radius` units at `center`.
    #[must_use]
    pub fn new(center: Point, radius: f64, color: Color) -> Self {
        let mut circle = Self {
            placement: Placement::new(center),
            color,
        };
        circle.set_radius(radius);
        circle
    }

    /// Registers the circle with `viewport`.
    pub fn spawn<R: Renderer>(
        self,
        viewport: &mut Viewport<R>,
    ) -> Result<Handle<Self>, ViewportError> {
        viewport.register(self)
    }

    /// Returns the radius in units.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.placement.width_units.unwrap_or(0.0) * 0.5
    }

    /// Sets the radius in units by forcing width and height to `2 * radius`.
    pub fn set_radius(&mut self, radius: f64) {
        let diameter = 2.0 * radius.max(0.0);
        self.placement.width_units = Some(diameter);
        self.placement.height_units = Some(diameter);
    }

    /// Returns the fill color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Sets the fill color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Discards and rebuilds the node geometry.
    pub fn reset_graphic(&self, space: &CoordinateSpace, node: &mut DisplayNode) {
        self.placement.apply(space, node);
        let radius = self.radius();
        // A caller may force a different height; stretch vertically to match.
        let stretch = match self.placement.height_units {
            Some(h) if radius > 0.0 => h / (2.0 * radius),
            _ => 1.0,
        };
        node.scale = Vec2::new(1.0, stretch);
        node.content = NodeContent::Disk {
            circle: Disk::new(Point::ZERO, space.scale_length(radius)),
            color: self.color,
        };
    }
}

impl Drawable for Circle {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn create_node(&self) -> DisplayNode {
        DisplayNode::new(NodeContent::Empty)
    }

    fn on_resize(&self, space: &CoordinateSpace, node: &mut DisplayNode) {
        self.reset_graphic(space, node);
    }

    fn draw(&self, space: &CoordinateSpace, node: &mut DisplayNode) {
        self.reset_graphic(space, node);
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};
    use peniko::Color;
    use unitview_space::CoordinateSpace;

    use super::{Circle, LineSegment};
    use crate::drawable::Drawable;
    use crate::node::NodeContent;

    fn space() -> CoordinateSpace {
        let mut space = CoordinateSpace::new(Size::new(400.0, 200.0));
        space.set_width_units(Some(40.0));
        space
    }

    #[test]
    fn line_thickness_scales_with_grid() {
        let space = space();
        let line = LineSegment::new(
            Point::new(1.0, 1.0),
            Point::new(3.0, 2.0),
            0.5,
            Color::WHITE,
        );
        let mut node = line.create_node();
        line.on_resize(&space, &mut node);

        assert_eq!(node.position, Point::new(10.0, 190.0));
        let NodeContent::Line { line: geom, width, .. } = node.content else {
            panic!("expected line content");
        };
        assert_eq!(width, 5.0);
        assert_eq!(geom.p1, Point::new(20.0, -10.0));
    }

    #[test]
    fn color_change_regenerates_geometry() {
        let space = space();
        let mut line = LineSegment::new(Point::ZERO, Point::new(1.0, 0.0), 1.0, Color::WHITE);
        let mut node = line.create_node();
        line.draw(&space, &mut node);

        let red = Color::from_rgba8(255, 0, 0, 255);
        line.set_color(red);
        line.draw(&space, &mut node);
        let NodeContent::Line { color, .. } = node.content else {
            panic!("expected line content");
        };
        assert_eq!(color.to_rgba8(), red.to_rgba8());
    }

    #[test]
    fn set_radius_updates_forced_size() {
        let space = space();
        let mut circle = Circle::new(Point::new(20.0, 10.0), 1.0, Color::WHITE);
        circle.set_radius(2.5);
        assert_eq!(circle.placement().width_units, Some(5.0));
        assert_eq!(circle.placement().height_units, Some(5.0));

        let mut node = circle.create_node();
        circle.on_resize(&space, &mut node);
        let NodeContent::Disk { circle: disk, .. } = node.content else {
            panic!("expected disk content");
        };
        assert_eq!(disk.radius, 25.0);
        assert_eq!(node.position, Point::new(200.0, 100.0));
    }
}
