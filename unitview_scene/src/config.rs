// Copyright 2025 the Unitview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Size};
use peniko::Color;

use crate::axis::AxisConfig;

/// What is painted behind the drawables.
#[derive(Clone, Debug, Default)]
pub struct Background {
    /// Image URL. Its aspect ratio drives the logical unit box unless both
    /// logical dimensions are configured.
    pub image: Option<String>,
    /// Solid color filling the whole container.
    pub color: Option<Color>,
}

impl Background {
    /// A background showing the image at `url`.
    #[must_use]
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            image: Some(url.into()),
            color: None,
        }
    }

    /// A solid color background.
    #[must_use]
    pub fn color(color: Color) -> Self {
        Self {
            image: None,
            color: Some(color),
        }
    }
}

/// Options recognized when constructing a [`Viewport`](crate::Viewport).
///
/// Every option may be omitted; omitted values are derived:
/// - Logical width/height from each other and the resolved aspect ratio,
///   or from the measured container when both are missing.
/// - The container pixel box from the [`Surface`](crate::Surface).
#[derive(Clone, Debug, Default)]
pub struct ViewportConfig {
    /// Logical width in units.
    pub width_units: Option<f64>,
    /// Logical height in units.
    pub height_units: Option<f64>,
    /// Unit-space point at the bottom-left corner.
    pub min_units: Point,
    /// Background image and/or color.
    pub background: Background,
    /// Fixed container pixel box; the surface is not measured when set.
    pub pixel_box: Option<Size>,
    /// Upper bound applied to the measured container pixel box.
    pub max_pixel_box: Option<Size>,
    /// Axis labels to draw, if any.
    pub axes: Option<AxisConfig>,
    /// Name of the unit (for example `"m"`), appended to axis labels.
    pub unit: Option<String>,
}

impl ViewportConfig {
    /// Creates a configuration with every option derived.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the logical width in units.
    #[must_use]
    pub fn with_width_units(mut self, width: f64) -> Self {
        self.width_units = Some(width);
        self
    }

    /// Sets the logical height in units.
    #[must_use]
    pub fn with_height_units(mut self, height: f64) -> Self {
        self.height_units = Some(height);
        self
    }

    /// Sets the unit-space point at the bottom-left corner.
    #[must_use]
    pub fn with_min_units(mut self, min_units: Point) -> Self {
        self.min_units = min_units;
        self
    }

    /// Sets the background image URL.
    #[must_use]
    pub fn with_background_image(mut self, url: impl Into<String>) -> Self {
        self.background.image = Some(url.into());
        self
    }

    /// Sets the background color.
    #[must_use]
    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background.color = Some(color);
        self
    }

    /// Fixes the container pixel box instead of measuring the surface.
    #[must_use]
    pub fn with_pixel_box(mut self, size: Size) -> Self {
        self.pixel_box = Some(size);
        self
    }

    /// Caps the measured container pixel box.
    #[must_use]
    pub fn with_max_pixel_box(mut self, size: Size) -> Self {
        self.max_pixel_box = Some(size);
        self
    }

    /// Names the unit shown after axis label values.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Enables axis labels.
    #[must_use]
    pub fn with_axes(mut self, axes: AxisConfig) -> Self {
        self.axes = Some(axes);
        self
    }
}
