// Copyright 2025 the Unitview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size};

use crate::modes::{BindingAxis, RatioSource};

/// Unit-based coordinate space fitted into a container pixel box.
///
/// `CoordinateSpace` maps a simulation's logical coordinate system (units,
/// Y increasing upward) onto a pixel surface (Y increasing downward, origin
/// top-left). It tracks the inputs that drive the mapping:
/// - The container pixel box.
/// - Optional configured logical width and height in units.
/// - The unit-space origin offset (`min_units`).
/// - An optional remembered aspect ratio for the current background.
///
/// From these it resolves the aspect ratio, the logical unit box and a
/// single uniform pixels-per-unit factor. The resolved values are rebuilt
/// from scratch whenever an input changes; they are never patched in place.
#[derive(Clone, Debug)]
pub struct CoordinateSpace {
    container: Size,
    baseline: Size,
    width_units: Option<f64>,
    height_units: Option<f64>,
    min_units: Point,
    remembered_ratio: Option<f64>,
    layout: Layout,
    unit_to_pixel: Affine,
    pixel_to_unit: Affine,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Layout {
    aspect_ratio: f64,
    ratio_source: RatioSource,
    unit_box: Size,
    pixels_per_unit: f64,
    binding: BindingAxis,
}

impl CoordinateSpace {
    /// Creates a coordinate space over a container of the given pixel size.
    ///
    /// - The container size is also recorded as the baseline, so with no
    ///   logical size configured one unit equals one pixel initially.
    /// - The unit-space origin is `(0, 0)`.
    /// - No remembered ratio is set.
    #[must_use]
    pub fn new(container: Size) -> Self {
        let mut space = Self {
            container,
            baseline: container,
            width_units: None,
            height_units: None,
            min_units: Point::ZERO,
            remembered_ratio: None,
            layout: Layout {
                aspect_ratio: 1.0,
                ratio_source: RatioSource::Container,
                unit_box: container,
                pixels_per_unit: 1.0,
                binding: BindingAxis::Width,
            },
            unit_to_pixel: Affine::IDENTITY,
            pixel_to_unit: Affine::IDENTITY,
        };
        space.rebuild();
        space
    }

    /// Returns the current container pixel box.
    #[must_use]
    pub fn container(&self) -> Size {
        self.container
    }

    /// Sets the container pixel box, typically after a resize.
    pub fn set_container(&mut self, container: Size) {
        if self.container == container {
            return;
        }
        self.container = container;
        self.rebuild();
    }

    /// Returns the baseline pixel box used when no logical size is configured.
    #[must_use]
    pub fn baseline(&self) -> Size {
        self.baseline
    }

    /// Sets the baseline pixel box.
    ///
    /// When neither logical dimension is configured, the logical width is
    /// taken from the baseline width and the height follows from the
    /// resolved aspect ratio.
    pub fn set_baseline(&mut self, baseline: Size) {
        if self.baseline == baseline {
            return;
        }
        self.baseline = baseline;
        self.rebuild();
    }

    /// Returns the configured logical width, if any.
    #[must_use]
    pub fn configured_width_units(&self) -> Option<f64> {
        self.width_units
    }

    /// Returns the configured logical height, if any.
    #[must_use]
    pub fn configured_height_units(&self) -> Option<f64> {
        self.height_units
    }

    /// Configures the logical width in units.
    ///
    /// Non-finite or non-positive values are treated as "not configured".
    pub fn set_width_units(&mut self, width: Option<f64>) {
        let width = width.filter(|w| is_extent(*w));
        if self.width_units == width {
            return;
        }
        self.width_units = width;
        self.rebuild();
    }

    /// Configures the logical height in units.
    ///
    /// Non-finite or non-positive values are treated as "not configured".
    pub fn set_height_units(&mut self, height: Option<f64>) {
        let height = height.filter(|h| is_extent(*h));
        if self.height_units == height {
            return;
        }
        self.height_units = height;
        self.rebuild();
    }

    /// Returns `true` when both logical dimensions are configured.
    #[must_use]
    pub fn has_explicit_size(&self) -> bool {
        self.width_units.is_some() && self.height_units.is_some()
    }

    /// Returns the unit-space point mapped to the bottom-left container corner.
    #[must_use]
    pub fn min_units(&self) -> Point {
        self.min_units
    }

    /// Sets the unit-space origin offset.
    pub fn set_min_units(&mut self, min_units: Point) {
        if self.min_units == min_units {
            return;
        }
        self.min_units = min_units;
        self.rebuild();
    }

    /// Returns the remembered background aspect ratio, if any.
    #[must_use]
    pub fn remembered_ratio(&self) -> Option<f64> {
        self.remembered_ratio
    }

    /// Sets or clears the remembered background aspect ratio.
    ///
    /// Non-finite or non-positive ratios are ignored and clear the value.
    pub fn set_remembered_ratio(&mut self, ratio: Option<f64>) {
        let ratio = ratio.filter(|r| is_extent(*r));
        if self.remembered_ratio == ratio {
            return;
        }
        self.remembered_ratio = ratio;
        self.rebuild();
    }

    /// Returns the resolved aspect ratio (`width / height`) of the logical unit box.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        self.layout.aspect_ratio
    }

    /// Returns which input the aspect ratio was resolved from.
    #[must_use]
    pub fn ratio_source(&self) -> RatioSource {
        self.layout.ratio_source
    }

    /// Returns the resolved logical unit box.
    #[must_use]
    pub fn unit_box(&self) -> Size {
        self.layout.unit_box
    }

    /// Returns the resolved logical width in units.
    #[must_use]
    pub fn width_units(&self) -> f64 {
        self.layout.unit_box.width
    }

    /// Returns the resolved logical height in units.
    #[must_use]
    pub fn height_units(&self) -> f64 {
        self.layout.unit_box.height
    }

    /// Returns the unit-space point at the top-right of the logical unit box.
    #[must_use]
    pub fn max_units(&self) -> Point {
        self.min_units + self.layout.unit_box.to_vec2()
    }

    /// Returns the uniform pixels-per-unit scale.
    #[must_use]
    pub fn pixels_per_unit(&self) -> f64 {
        self.layout.pixels_per_unit
    }

    /// Returns the container axis that determines pixels-per-unit.
    #[must_use]
    pub fn binding_axis(&self) -> BindingAxis {
        self.layout.binding
    }

    /// Converts a length in units into a length in pixels.
    #[must_use]
    pub fn scale_length(&self, units: f64) -> f64 {
        units * self.layout.pixels_per_unit
    }

    /// Converts a unit-space point into pixel coordinates.
    ///
    /// `x = (p.x - min.x) * ppu` and `y = container.h - (p.y - min.y) * ppu`.
    #[must_use]
    pub fn unit_to_pixel(&self, pt: Point) -> Point {
        self.unit_to_pixel * pt
    }

    /// Converts a pixel-space point into unit coordinates.
    #[must_use]
    pub fn pixel_to_unit(&self, pt: Point) -> Point {
        self.pixel_to_unit * pt
    }

    /// Returns the unit → pixel transform.
    #[must_use]
    pub fn unit_to_pixel_transform(&self) -> Affine {
        self.unit_to_pixel
    }

    /// Returns the pixel → unit transform.
    #[must_use]
    pub fn pixel_to_unit_transform(&self) -> Affine {
        self.pixel_to_unit
    }

    /// Returns the logical unit box as a unit-space rectangle.
    #[must_use]
    pub fn unit_rect(&self) -> Rect {
        Rect::from_origin_size(self.min_units, self.layout.unit_box)
    }

    /// Returns the logical unit box in pixel coordinates.
    ///
    /// The rectangle is anchored at the bottom-left container corner; along
    /// the non-binding axis it may be smaller than the container.
    #[must_use]
    pub fn unit_box_pixel_rect(&self) -> Rect {
        let ppu = self.layout.pixels_per_unit;
        let w = self.layout.unit_box.width * ppu;
        let h = self.layout.unit_box.height * ppu;
        Rect::new(0.0, self.container.height - h, w, self.container.height)
    }

    /// Returns the unit-space rectangle covered by the whole container.
    ///
    /// This includes any margin on the non-binding axis.
    #[must_use]
    pub fn visible_unit_rect(&self) -> Rect {
        let a = self.pixel_to_unit(Point::new(0.0, self.container.height));
        let b = self.pixel_to_unit(Point::new(self.container.width, 0.0));
        Rect::from_points(a, b)
    }

    /// Snapshot of the current inputs and resolved values for debugging.
    #[must_use]
    pub fn debug_info(&self) -> CoordinateSpaceDebugInfo {
        CoordinateSpaceDebugInfo {
            container: self.container,
            baseline: self.baseline,
            configured_width_units: self.width_units,
            configured_height_units: self.height_units,
            min_units: self.min_units,
            remembered_ratio: self.remembered_ratio,
            aspect_ratio: self.layout.aspect_ratio,
            ratio_source: self.layout.ratio_source,
            unit_box: self.layout.unit_box,
            pixels_per_unit: self.layout.pixels_per_unit,
            binding: self.layout.binding,
        }
    }

    fn resolve_aspect_ratio(&self) -> (f64, RatioSource) {
        if let (Some(w), Some(h)) = (self.width_units, self.height_units) {
            return (w / h, RatioSource::Explicit);
        }
        if let Some(ratio) = self.remembered_ratio {
            return (ratio, RatioSource::Remembered);
        }
        (ratio_of(self.container), RatioSource::Container)
    }

    fn resolve_unit_box(&self, ratio: f64) -> Size {
        match (self.width_units, self.height_units) {
            (Some(w), Some(h)) => Size::new(w, h),
            (Some(w), None) => Size::new(w, w / ratio),
            (None, Some(h)) => Size::new(h * ratio, h),
            (None, None) => {
                let w = if is_extent(self.baseline.width) {
                    self.baseline.width
                } else {
                    1.0
                };
                Size::new(w, w / ratio)
            }
        }
    }

    fn resolve_pixels_per_unit(&self, ratio: f64, unit_box: Size) -> (f64, BindingAxis) {
        let Size { width: cw, height: ch } = self.container;
        if !is_extent(cw) || !is_extent(ch) {
            return (1.0, BindingAxis::Width);
        }
        // A container wider than the logical ratio leaves horizontal margin,
        // so the height is the tighter fit.
        let (ppu, binding) = if cw > ratio * ch {
            (ch / unit_box.height, BindingAxis::Height)
        } else {
            (cw / unit_box.width, BindingAxis::Width)
        };
        if is_extent(ppu) {
            (ppu, binding)
        } else {
            (1.0, binding)
        }
    }

    fn rebuild(&mut self) {
        let (aspect_ratio, ratio_source) = self.resolve_aspect_ratio();
        let unit_box = self.resolve_unit_box(aspect_ratio);
        let (pixels_per_unit, binding) = self.resolve_pixels_per_unit(aspect_ratio, unit_box);
        self.layout = Layout {
            aspect_ratio,
            ratio_source,
            unit_box,
            pixels_per_unit,
            binding,
        };

        // Unit → pixel: shift by the origin, scale uniformly, then flip Y
        // against the container bottom edge.
        let ppu = pixels_per_unit;
        self.unit_to_pixel = Affine::new([
            ppu,
            0.0,
            0.0,
            -ppu,
            -self.min_units.x * ppu,
            self.container.height + self.min_units.y * ppu,
        ]);
        self.pixel_to_unit = self.unit_to_pixel.inverse();
    }
}

fn is_extent(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn ratio_of(size: Size) -> f64 {
    if is_extent(size.width) && is_extent(size.height) {
        size.width / size.height
    } else {
        1.0
    }
}

/// Debug snapshot of a [`CoordinateSpace`] state.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateSpaceDebugInfo {
    /// Current container pixel box.
    pub container: Size,
    /// Baseline pixel box used when no logical size is configured.
    pub baseline: Size,
    /// Configured logical width, if any.
    pub configured_width_units: Option<f64>,
    /// Configured logical height, if any.
    pub configured_height_units: Option<f64>,
    /// Unit-space origin offset.
    pub min_units: Point,
    /// Remembered background aspect ratio, if any.
    pub remembered_ratio: Option<f64>,
    /// Resolved aspect ratio.
    pub aspect_ratio: f64,
    /// Input the aspect ratio was resolved from.
    pub ratio_source: RatioSource,
    /// Resolved logical unit box.
    pub unit_box: Size,
    /// Resolved pixels-per-unit scale.
    pub pixels_per_unit: f64,
    /// Container axis that determines the scale.
    pub binding: BindingAxis,
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};

    use super::{BindingAxis, CoordinateSpace, RatioSource};

    const EPS: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < EPS, "expected {b}, got {a}");
    }

    #[test]
    fn unit_pixel_roundtrip() {
        let mut space = CoordinateSpace::new(Size::new(800.0, 600.0));
        space.set_width_units(Some(40.0));
        space.set_min_units(Point::new(-5.0, 3.0));

        for pt in [
            Point::new(0.0, 0.0),
            Point::new(12.5, -7.25),
            Point::new(-1e4, 3e3),
        ] {
            let back = space.pixel_to_unit(space.unit_to_pixel(pt));
            assert!((back.x - pt.x).abs() < 1e-6, "x roundtrip for {pt:?}");
            assert!((back.y - pt.y).abs() < 1e-6, "y roundtrip for {pt:?}");
        }
    }

    #[test]
    fn unit_to_pixel_matches_formula() {
        let mut space = CoordinateSpace::new(Size::new(800.0, 400.0));
        space.set_width_units(Some(100.0));
        space.set_min_units(Point::new(10.0, 20.0));
        let ppu = space.pixels_per_unit();
        assert_close(ppu, 8.0);

        let px = space.unit_to_pixel(Point::new(15.0, 30.0));
        assert_close(px.x, (15.0 - 10.0) * ppu);
        assert_close(px.y, 400.0 - (30.0 - 20.0) * ppu);
    }

    #[test]
    fn y_axis_is_inverted() {
        let space = CoordinateSpace::new(Size::new(300.0, 200.0));
        let h_units = space.height_units();

        let bottom = space.unit_to_pixel(Point::new(0.0, 0.0));
        assert_close(bottom.y, 200.0);
        let top = space.unit_to_pixel(Point::new(0.0, h_units));
        assert_close(top.y, 0.0);
    }

    #[test]
    fn aspect_ratio_priority_order() {
        let mut space = CoordinateSpace::new(Size::new(900.0, 300.0));
        space.set_remembered_ratio(Some(1.5));
        space.set_width_units(Some(50.0));
        space.set_height_units(Some(100.0));

        assert_close(space.aspect_ratio(), 0.5);
        assert_eq!(space.ratio_source(), RatioSource::Explicit);

        space.set_height_units(None);
        assert_close(space.aspect_ratio(), 1.5);
        assert_eq!(space.ratio_source(), RatioSource::Remembered);

        space.set_remembered_ratio(None);
        assert_close(space.aspect_ratio(), 3.0);
        assert_eq!(space.ratio_source(), RatioSource::Container);
    }

    #[test]
    fn unit_box_preserves_aspect_ratio() {
        let cases: [(Option<f64>, Option<f64>, Option<f64>); 5] = [
            (Some(40.0), Some(10.0), None),
            (Some(40.0), None, None),
            (None, Some(25.0), None),
            (None, None, Some(1.25)),
            (Some(7.0), None, Some(0.4)),
        ];
        for (w, h, remembered) in cases {
            let mut space = CoordinateSpace::new(Size::new(640.0, 480.0));
            space.set_width_units(w);
            space.set_height_units(h);
            space.set_remembered_ratio(remembered);
            let unit_box = space.unit_box();
            assert!(
                (unit_box.width / unit_box.height - space.aspect_ratio()).abs() < 1e-9,
                "ratio mismatch for {w:?} {h:?} {remembered:?}"
            );
        }
    }

    #[test]
    fn unconfigured_space_is_one_unit_per_pixel() {
        let space = CoordinateSpace::new(Size::new(800.0, 400.0));
        assert_eq!(space.unit_box(), Size::new(800.0, 400.0));
        assert_close(space.pixels_per_unit(), 1.0);
    }

    #[test]
    fn fit_never_overflows_and_binds_one_axis() {
        let containers = [
            Size::new(800.0, 400.0),
            Size::new(400.0, 800.0),
            Size::new(333.0, 333.0),
            Size::new(1920.0, 1080.0),
        ];
        let configs = [
            (Some(100.0), Some(100.0)),
            (Some(10.0), Some(40.0)),
            (Some(64.0), None),
            (None, Some(9.0)),
        ];
        for container in containers {
            for (w, h) in configs {
                let mut space = CoordinateSpace::new(container);
                space.set_width_units(w);
                space.set_height_units(h);
                let ppu = space.pixels_per_unit();
                let unit_box = space.unit_box();
                let rendered_w = unit_box.width * ppu;
                let rendered_h = unit_box.height * ppu;
                assert!(rendered_w <= container.width + 1e-6, "width overflow");
                assert!(rendered_h <= container.height + 1e-6, "height overflow");
                let binds = match space.binding_axis() {
                    BindingAxis::Width => (rendered_w - container.width).abs(),
                    BindingAxis::Height => (rendered_h - container.height).abs(),
                };
                assert!(binds < 1e-6, "binding axis must be filled exactly");
            }
        }
    }

    #[test]
    fn remembered_ratio_survives_container_resize() {
        let mut space = CoordinateSpace::new(Size::new(800.0, 400.0));
        space.set_remembered_ratio(Some(1600.0 / 800.0));
        assert_eq!(space.unit_box(), Size::new(800.0, 400.0));

        space.set_container(Size::new(400.0, 400.0));
        assert_close(space.aspect_ratio(), 2.0);
        assert_eq!(space.unit_box(), Size::new(800.0, 400.0));
        assert_close(space.pixels_per_unit(), 0.5);
        assert_eq!(space.binding_axis(), BindingAxis::Width);
        let rect = space.unit_box_pixel_rect();
        assert_close(rect.width(), 400.0);
        assert_close(rect.height(), 200.0);
    }

    #[test]
    fn degenerate_container_keeps_finite_transforms() {
        let space = CoordinateSpace::new(Size::ZERO);
        assert_close(space.pixels_per_unit(), 1.0);
        let back = space.pixel_to_unit(space.unit_to_pixel(Point::new(3.0, 4.0)));
        assert!(back.x.is_finite() && back.y.is_finite());
    }

    #[test]
    fn visible_rect_includes_margin() {
        let mut space = CoordinateSpace::new(Size::new(800.0, 400.0));
        space.set_width_units(Some(10.0));
        space.set_height_units(Some(10.0));
        // Height binds at 40 px/unit, leaving 400 px of horizontal margin.
        assert_close(space.pixels_per_unit(), 40.0);
        let visible = space.visible_unit_rect();
        assert_close(visible.width(), 20.0);
        assert_close(visible.height(), 10.0);
        assert_eq!(space.unit_rect().size(), Size::new(10.0, 10.0));

        let info = space.debug_info();
        assert_eq!(info.binding, BindingAxis::Height);
        assert_eq!(info.ratio_source, RatioSource::Explicit);
    }
}
