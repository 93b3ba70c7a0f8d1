// Copyright 2025 the Unitview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Where the resolved aspect ratio of a [`crate::CoordinateSpace`] came from.
///
/// Sources are listed in priority order: an explicit logical width *and*
/// height always win, a remembered background ratio is next, and the live
/// container ratio is the last resort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RatioSource {
    /// Both logical dimensions were configured; the ratio is `width / height`.
    Explicit,
    /// A ratio previously observed for the current background image.
    Remembered,
    /// The current container pixel box.
    #[default]
    Container,
}

/// Which container dimension determines pixels-per-unit.
///
/// The logical unit box is always fitted inside the container without
/// distortion, so exactly one axis is filled edge to edge while the other
/// may keep an unused margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BindingAxis {
    /// The logical width spans the full container width.
    #[default]
    Width,
    /// The logical height spans the full container height.
    Height,
}
