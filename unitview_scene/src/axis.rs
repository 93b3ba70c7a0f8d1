// Copyright 2025 the Unitview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate labels along the X and Y axes.

use kurbo::Point;
use peniko::Color;
use unitview_space::CoordinateSpace;
use unitview_space::ticks::{auto_step, step_decimals, ticks};

use crate::node::{DisplayNode, NodeContent};

/// Which axes to label, and how far apart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisConfig {
    /// Label the horizontal axis along the bottom edge.
    pub x: bool,
    /// Label the vertical axis along the left edge.
    pub y: bool,
    /// Distance between labels in units; derived from the logical width when unset.
    pub step: Option<f64>,
    /// Label text color; the renderer's default when unset.
    pub color: Option<Color>,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            x: true,
            y: true,
            step: None,
            color: None,
        }
    }
}

impl AxisConfig {
    /// Labels both axes every `step` units.
    #[must_use]
    pub fn with_step(step: f64) -> Self {
        Self {
            step: Some(step),
            ..Self::default()
        }
    }

    /// Sets the label text color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// One of the two unit-space axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

/// A coordinate label produced by [`AxisLabeler`].
#[derive(Clone, Debug, PartialEq)]
pub struct AxisLabel {
    /// Axis the label belongs to.
    pub axis: Axis,
    /// Coordinate value in units.
    pub value: f64,
    /// Formatted value, followed by the unit name when one is set.
    pub text: String,
    /// Text color.
    pub color: Option<Color>,
    /// Pixel position of the label anchor.
    pub position: Point,
}

impl AxisLabel {
    /// Builds the display node for this label.
    ///
    /// X labels hang above the bottom edge, Y labels sit right of the left edge.
    #[must_use]
    pub fn to_node(&self) -> DisplayNode {
        let mut node = DisplayNode::new(NodeContent::Label {
            text: self.text.clone(),
            color: self.color,
        });
        node.position = self.position;
        node.anchor = match self.axis {
            Axis::X => Point::new(0.5, 1.0),
            Axis::Y => Point::new(0.0, 0.5),
        };
        node
    }
}

/// Places periodic coordinate labels using a [`CoordinateSpace`].
///
/// Labels are always regenerated from scratch; the labeler keeps no state
/// besides its configuration and unit name.
#[derive(Clone, Debug, Default)]
pub struct AxisLabeler {
    config: AxisConfig,
    unit: Option<String>,
}

impl AxisLabeler {
    /// Creates a labeler with the given configuration.
    #[must_use]
    pub fn new(config: AxisConfig) -> Self {
        Self { config, unit: None }
    }

    /// Appends `unit` (for example `"m"`) to every label, separated by a space.
    #[must_use]
    pub fn with_unit(mut self, unit: Option<String>) -> Self {
        self.unit = unit.filter(|unit| !unit.is_empty());
        self
    }

    /// Returns the unit name appended to labels.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> AxisConfig {
        self.config
    }

    /// Returns the step in units used for `space`.
    #[must_use]
    pub fn step(&self, space: &CoordinateSpace) -> f64 {
        self.config
            .step
            .filter(|step| step.is_finite() && *step > 0.0)
            .unwrap_or_else(|| auto_step(space.width_units()))
    }

    /// Computes the labels for the current state of `space`.
    ///
    /// Ticks keep a margin of a tenth of the step from both ends of the
    /// logical unit box.
    #[must_use]
    pub fn labels(&self, space: &CoordinateSpace) -> Vec<AxisLabel> {
        let step = self.step(space);
        let decimals = step_decimals(step);
        let min = space.min_units();
        let max = space.max_units();
        let text = |value: f64| match &self.unit {
            Some(unit) => format!("{value:.decimals$} {unit}"),
            None => format!("{value:.decimals$}"),
        };
        let color = self.config.color;
        let mut labels = Vec::new();
        if self.config.x {
            labels.extend(ticks(min.x, max.x, step).map(|value| AxisLabel {
                axis: Axis::X,
                value,
                text: text(value),
                color,
                position: space.unit_to_pixel(Point::new(value, min.y)),
            }));
        }
        if self.config.y {
            labels.extend(ticks(min.y, max.y, step).map(|value| AxisLabel {
                axis: Axis::Y,
                value,
                text: text(value),
                color,
                position: space.unit_to_pixel(Point::new(min.x, value)),
            }));
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};
    use peniko::Color;
    use unitview_space::CoordinateSpace;

    use super::{Axis, AxisConfig, AxisLabeler};
    use crate::node::NodeContent;

    #[test]
    fn x_ticks_skip_clipped_edges() {
        let mut space = CoordinateSpace::new(Size::new(440.0, 200.0));
        space.set_width_units(Some(220.0));
        let labeler = AxisLabeler::new(AxisConfig {
            x: true,
            y: false,
            step: Some(50.0),
            color: None,
        });
        let values: Vec<f64> = labeler.labels(&space).iter().map(|l| l.value).collect();
        assert_eq!(values, [50.0, 100.0, 150.0, 200.0]);
    }

    #[test]
    fn labels_sit_on_the_edges() {
        let mut space = CoordinateSpace::new(Size::new(400.0, 400.0));
        space.set_width_units(Some(10.0));
        space.set_height_units(Some(10.0));
        let labels = AxisLabeler::new(AxisConfig::with_step(5.0)).labels(&space);

        let x: Vec<_> = labels.iter().filter(|l| l.axis == Axis::X).collect();
        let y: Vec<_> = labels.iter().filter(|l| l.axis == Axis::Y).collect();
        assert_eq!(x.len(), 1);
        assert_eq!(y.len(), 1);
        assert_eq!(x[0].position, Point::new(200.0, 400.0));
        assert_eq!(y[0].position, Point::new(0.0, 200.0));
        assert_eq!(x[0].text, "5");
    }

    #[test]
    fn auto_step_and_fractional_text() {
        let mut space = CoordinateSpace::new(Size::new(100.0, 100.0));
        space.set_width_units(Some(0.5));
        let labeler = AxisLabeler::new(AxisConfig {
            x: true,
            y: false,
            step: None,
            color: None,
        });
        assert!((labeler.step(&space) - 0.1).abs() < 1e-12);
        let texts: Vec<String> = labeler.labels(&space).into_iter().map(|l| l.text).collect();
        assert_eq!(texts, ["0.1", "0.2", "0.3", "0.4"]);
    }

    #[test]
    fn unit_and_color_reach_the_label_nodes() {
        let mut space = CoordinateSpace::new(Size::new(440.0, 200.0));
        space.set_width_units(Some(220.0));
        let white = Color::from_rgba8(255, 255, 255, 255);
        let labeler = AxisLabeler::new(AxisConfig {
            x: true,
            y: false,
            step: Some(50.0),
            color: Some(white),
        })
        .with_unit(Some("m".into()));
        let labels = labeler.labels(&space);
        assert_eq!(labels[0].text, "50 m");

        let NodeContent::Label { text, color } = labels[0].to_node().content else {
            panic!("expected label content");
        };
        assert_eq!(text, "50 m");
        assert_eq!(color.map(|c| c.to_rgba8()), Some(white.to_rgba8()));
    }

    #[test]
    fn empty_unit_is_ignored() {
        let labeler = AxisLabeler::new(AxisConfig::default()).with_unit(Some(String::new()));
        assert_eq!(labeler.unit(), None);
    }
}
