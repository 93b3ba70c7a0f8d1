// Copyright 2025 the Unitview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unitview Space: a unit-based 2D coordinate space fitted into pixels.
//!
//! This crate provides the headless math behind a responsive simulation
//! viewport. A simulation works in its own units (meters, say) with Y
//! increasing upward; the screen works in pixels with Y increasing
//! downward. [`CoordinateSpace`] keeps the two consistent:
//! - Unit ↔ pixel conversion with the Y axis inverted.
//! - Aspect-ratio negotiation between an explicit logical size, a
//!   remembered background ratio and the live container ratio.
//! - A single uniform pixels-per-unit factor fitting the logical unit box
//!   inside the container without distortion.
//! - Tick placement for coordinate labels ([`ticks`]).
//!
//! It does **not** own any scene, renderer or event loop. The
//! `unitview_scene` crate builds a viewport with drawables on top of it.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use unitview_space::CoordinateSpace;
//!
//! // An 800x400 pixel container showing a 100 unit wide world.
//! let mut space = CoordinateSpace::new(Size::new(800.0, 400.0));
//! space.set_width_units(Some(100.0));
//! assert_eq!(space.pixels_per_unit(), 8.0);
//!
//! // The unit-space origin sits at the bottom-left pixel corner.
//! let px = space.unit_to_pixel(Point::new(0.0, 0.0));
//! assert_eq!(px, Point::new(0.0, 400.0));
//!
//! // And back again, for hit testing.
//! let units = space.pixel_to_unit(Point::new(400.0, 200.0));
//! assert_eq!(units, Point::new(50.0, 25.0));
//! ```
//!
//! ## Design notes
//!
//! - Scaling is always uniform; one container axis may keep a margin.
//! - All resolved values are pure functions of the current inputs and are
//!   rebuilt whenever an input changes.
//!
//! This crate is `no_std`.

#![no_std]

mod modes;
mod space;
pub mod ticks;

pub use modes::{BindingAxis, RatioSource};
pub use space::{CoordinateSpace, CoordinateSpaceDebugInfo};
