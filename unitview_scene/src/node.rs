// Copyright 2025 the Unitview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display nodes handed to a [`Renderer`](crate::Renderer).

use kurbo::{Circle, Line, Point, Rect, Size, Vec2};
use peniko::Color;

/// Identifier for a display node attached to the renderer.
///
/// Node identifiers are allocated by a [`Viewport`](crate::Viewport) and are
/// never reused during its lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the raw index of this node.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// A positioned visual in pixel space.
///
/// The renderer composes `position`, `rotation` and `scale` around the
/// `anchor` point of the content and paints it with `alpha` opacity. Vector
/// content ([`NodeContent::Line`], [`NodeContent::Disk`]) is already expressed
/// in pixels relative to `position`.
#[derive(Clone, Debug)]
pub struct DisplayNode {
    /// Pixel position of the anchor point.
    pub position: Point,
    /// Rotation in radians, clockwise in pixel space.
    pub rotation: f64,
    /// Scale factors applied to the content.
    pub scale: Vec2,
    /// Anchor as a fraction of the content size.
    pub anchor: Point,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// What to paint.
    pub content: NodeContent,
}

impl DisplayNode {
    /// Creates an unscaled, unrotated, opaque node at the pixel origin.
    #[must_use]
    pub fn new(content: NodeContent) -> Self {
        Self {
            position: Point::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            anchor: Point::ZERO,
            alpha: 1.0,
            content,
        }
    }
}

/// Payload of a [`DisplayNode`].
#[derive(Clone, Debug)]
pub enum NodeContent {
    /// Nothing to paint yet.
    Empty,
    /// An image, identified by its URL.
    Sprite {
        /// Image URL or key understood by the renderer.
        image: String,
        /// Decoded pixel size, once known.
        native_size: Option<Size>,
    },
    /// A stroked line segment.
    Line {
        /// Segment in pixels relative to the node position.
        line: Line,
        /// Stroke width in pixels.
        width: f64,
        /// Stroke color.
        color: Color,
    },
    /// A filled disk.
    Disk {
        /// Disk in pixels relative to the node position.
        circle: Circle,
        /// Fill color.
        color: Color,
    },
    /// A solid rectangle, used for background colors.
    Fill {
        /// Rectangle in pixels relative to the node position.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// A text label.
    Label {
        /// Label text.
        text: String,
        /// Text color; the renderer's default when unset.
        color: Option<Color>,
    },
}
