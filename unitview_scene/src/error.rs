// Copyright 2025 the Unitview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

use crate::drawable::DrawableId;

/// Programming errors reported by a [`Viewport`](crate::Viewport).
///
/// None of these are expected at runtime in a correct program; they signal
/// a handle used after its drawable was destroyed, a handle of the wrong
/// type, or a call into a viewport that was already torn down.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ViewportError {
    /// The drawable is not (or no longer) registered.
    #[error("drawable {0:?} is not registered with this viewport")]
    StaleHandle(DrawableId),
    /// The drawable exists but is not of the requested type.
    #[error("drawable {id:?} is not a {expected}")]
    KindMismatch {
        /// Identifier that was looked up.
        id: DrawableId,
        /// Name of the requested type.
        expected: &'static str,
    },
    /// The viewport was torn down.
    #[error("viewport has been torn down")]
    TornDown,
}
