// Copyright 2025 the Unitview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick placement along a unit-space axis.
//!
//! Ticks are exact multiples of a step. A margin of one tenth of the step is
//! kept free at both ends of the axis so that a label never sits on the very
//! edge of the viewport where it would be clipped.

/// Upper bound on the number of ticks yielded for a single axis.
pub const MAX_TICKS: usize = 1024;

/// Largest tick index that still maps to an exact `f64` multiple.
const MAX_INDEX: f64 = 9_007_199_254_740_992.0;

/// Picks a round power-of-ten step for an axis spanning `extent` units.
///
/// The step is `10^(ceil(log10(extent)) - 1)`, which yields between one and
/// ten ticks across the extent (for example `100` for an extent of `220`).
/// Non-finite or non-positive extents fall back to a step of `1`.
#[must_use]
pub fn auto_step(extent: f64) -> f64 {
    if !(extent.is_finite() && extent > 0.0) {
        return 1.0;
    }
    libm::pow(10.0, libm::ceil(libm::log10(extent)) - 1.0)
}

/// Returns the tick values in `[min + 0.1 * step, max - 0.1 * step]`.
///
/// Values are computed as `k * step` for integer `k`, so they do not drift
/// with the number of ticks. An invalid step or an empty range yields no
/// ticks, and at most [`MAX_TICKS`] values are produced. Ranges so far from
/// the origin that the tick index exceeds `2^53` yield no ticks.
#[must_use]
pub fn ticks(min: f64, max: f64, step: f64) -> Ticks {
    if !(step.is_finite() && step > 0.0 && min.is_finite() && max.is_finite()) {
        return Ticks::EMPTY;
    }
    let margin = 0.1 * step;
    let first = libm::ceil((min + margin) / step);
    let last = libm::floor((max - margin) / step);
    if first > last || libm::fabs(first) > MAX_INDEX || libm::fabs(last) > MAX_INDEX {
        return Ticks::EMPTY;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "indices are bounded by MAX_INDEX and the count by MAX_TICKS"
    )]
    let (next, remaining) = (
        first as i64,
        (last - first + 1.0).min(MAX_TICKS as f64) as usize,
    );
    Ticks {
        step,
        next,
        remaining,
    }
}

/// Number of decimal places needed to print multiples of `step` exactly.
///
/// Integral steps need none; `0.25` needs two. The result is capped at 12.
#[must_use]
pub fn step_decimals(step: f64) -> usize {
    if !(step.is_finite() && step > 0.0) {
        return 0;
    }
    let mut scaled = step;
    let mut decimals = 0;
    while decimals < 12 && libm::fabs(scaled - libm::round(scaled)) > 1e-9 * scaled.max(1.0) {
        scaled *= 10.0;
        decimals += 1;
    }
    decimals
}

/// Iterator over tick values produced by [`ticks`].
#[derive(Clone, Debug)]
pub struct Ticks {
    step: f64,
    next: i64,
    remaining: usize,
}

impl Ticks {
    const EMPTY: Self = Self {
        step: 1.0,
        next: 0,
        remaining: 0,
    };

    /// Returns the step between consecutive ticks.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }
}

impl Iterator for Ticks {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.next as f64 * self.step;
        self.next += 1;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Ticks {}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::vec::Vec;

    use super::{MAX_TICKS, auto_step, step_decimals, ticks};

    #[test]
    fn margin_excludes_edges() {
        let values: Vec<f64> = ticks(0.0, 220.0, 50.0).collect();
        assert_eq!(values, [50.0, 100.0, 150.0, 200.0]);
    }

    #[test]
    fn tick_just_inside_upper_margin_is_kept() {
        // 200 is 6 units from the edge, outside the 5 unit margin.
        let values: Vec<f64> = ticks(0.0, 206.0, 50.0).collect();
        assert_eq!(values.last(), Some(&200.0));
        // 200 is 4 units from the edge, inside the margin.
        let values: Vec<f64> = ticks(0.0, 204.0, 50.0).collect();
        assert_eq!(values.last(), Some(&150.0));
    }

    #[test]
    fn negative_ranges_use_exact_multiples() {
        let values: Vec<f64> = ticks(-1.0, 1.0, 0.5).collect();
        assert_eq!(values, [-0.5, 0.0, 0.5]);
        assert_eq!(ticks(-1.0, 1.0, 0.5).len(), 3);
    }

    #[test]
    fn invalid_inputs_yield_nothing() {
        assert_eq!(ticks(0.0, 100.0, 0.0).count(), 0);
        assert_eq!(ticks(0.0, 100.0, f64::NAN).count(), 0);
        assert_eq!(ticks(100.0, 0.0, 10.0).count(), 0);
    }

    #[test]
    fn tick_count_is_bounded() {
        assert_eq!(ticks(0.0, 1e9, 1.0).count(), MAX_TICKS);
    }

    #[test]
    fn far_from_origin_yields_nothing() {
        assert_eq!(ticks(1e21, 1e21 + 220.0, 50.0).count(), 0);
        assert_eq!(ticks(-1e21 - 220.0, -1e21, 50.0).count(), 0);
        // Still exact below 2^53 steps.
        let values: Vec<f64> = ticks(1e15, 1e15 + 120.0, 50.0).collect();
        assert_eq!(values, [1e15 + 50.0, 1e15 + 100.0]);
    }

    #[test]
    fn auto_step_matches_scene_scale() {
        assert_eq!(auto_step(220.0), 100.0);
        assert_eq!(auto_step(35.0), 10.0);
        assert!((auto_step(0.5) - 0.1).abs() < 1e-12);
        assert_eq!(auto_step(-3.0), 1.0);
    }

    #[test]
    fn decimals_follow_step() {
        assert_eq!(step_decimals(50.0), 0);
        assert_eq!(step_decimals(0.1), 1);
        assert_eq!(step_decimals(0.25), 2);
    }
}
