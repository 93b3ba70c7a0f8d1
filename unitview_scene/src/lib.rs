// Copyright 2025 the Unitview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unitview Scene: a responsive, unit-based 2D viewport.
//!
//! Simulations position things in their own units with Y pointing up. A
//! [`Viewport`] maps that world into a resizable pixel container and keeps
//! every visual consistent with it:
//! - The logical unit box takes its aspect ratio from an explicit size, a
//!   ratio remembered for the background image, or the container.
//! - Drawables ([`Actor`], [`LineSegment`], [`Circle`], or your own
//!   [`Drawable`]) re-derive their display node every frame.
//! - Container resizes, background loads and live logical size changes all
//!   funnel into one re-layout pass.
//! - Optional [`AxisLabeler`] coordinate labels along the edges.
//!
//! The viewport is headless. It talks to its host through small traits: a
//! [`Surface`] to measure, a [`Renderer`] to paint display nodes, an
//! [`ImageLoader`] to decode the background and a [`RatioStore`] to
//! remember background aspect ratios. Asynchronous completions come back as
//! [`ViewportEvent`]s.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size, Vec2};
//! use unitview_scene::{
//!     Actor, Collaborators, MemoryRatioStore, QueuedLoader, RecordingRenderer,
//!     SharedSurface, Viewport, ViewportConfig, ViewportEvent,
//! };
//!
//! let surface = SharedSurface::new(Size::new(800.0, 400.0));
//! let loader = QueuedLoader::new();
//! let mut viewport = Viewport::new(
//!     ViewportConfig::new()
//!         .with_width_units(100.0)
//!         .with_background_image("field.png"),
//!     Collaborators {
//!         surface: Box::new(surface.clone()),
//!         renderer: RecordingRenderer::new(),
//!         loader: Box::new(loader.clone()),
//!         ratio_store: Box::new(MemoryRatioStore::new()),
//!     },
//! );
//!
//! // The host decodes the image and reports its size.
//! let request = loader.pop().unwrap();
//! viewport.handle(ViewportEvent::BackgroundLoaded {
//!     ticket: request.ticket,
//!     width: 1600.0,
//!     height: 800.0,
//! });
//! assert_eq!(viewport.height_units(), 50.0);
//! assert_eq!(viewport.space().pixels_per_unit(), 8.0);
//!
//! // Physics mutates the actor between frames.
//! let ball = Actor::new("ball.png", Point::new(10.0, 10.0))
//!     .with_velocity(Vec2::new(35.0, 0.0))
//!     .with_autorotate(true)
//!     .spawn(&mut viewport)
//!     .unwrap();
//! viewport.get_mut(ball).unwrap().set_position(Point::new(20.0, 10.0));
//! viewport.update();
//! assert_eq!(viewport.node(ball).unwrap().position, Point::new(160.0, 320.0));
//! ```
//!
//! ## Painter's order
//!
//! Every rasterized [`Frame`] lists the background color fill and image
//! first, then drawables in registration order, then axis labels.

mod actor;
mod axis;
mod config;
mod drawable;
mod error;
mod host;
mod node;
mod render;
mod shapes;
mod viewport;

pub use actor::Actor;
pub use axis::{Axis, AxisConfig, AxisLabel, AxisLabeler};
pub use config::{Background, ViewportConfig};
pub use drawable::{Drawable, DrawableId, Handle, Placement};
pub use error::ViewportError;
pub use host::{
    ImageLoader, ImageRequest, LoadTicket, MemoryRatioStore, QueuedLoader, RatioKey, RatioStore,
    SharedSurface, Surface,
};
pub use node::{DisplayNode, NodeContent, NodeId};
pub use render::{Frame, RecordingRenderer, RenderCall, Renderer};
pub use shapes::{Circle, LineSegment};
pub use viewport::{Collaborators, Viewport, ViewportEvent};

pub use unitview_space::{BindingAxis, CoordinateSpace, RatioSource};
