// Geometry helpers for the vector diagrams of all three domains.
// Each phase value is laid along its own winding axis (0, 120 and 240 degrees),
// the rotating frame is described by its d and q unit axes in the alpha/beta plane.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use super::transforms::{ClarkePair, PhaseTriple, PHASE_SHIFT};

/// Planar vector as `[x, y]`, the layout plotting backends consume.
pub type Point = [f64; 2];

/// Unit directions of the A, B and C winding axes.
pub fn phase_axes() -> [Point; 3] {
    [0.0, PHASE_SHIFT, 2.0 * PHASE_SHIFT].map(polar_unit)
}

/// Unit directions of the d and q axes for frame angle `theta`.
pub fn dq_axes(theta: f64) -> [Point; 2] {
    let (sin, cos) = theta.sin_cos();
    [[cos, sin], [-sin, cos]]
}

impl PhaseTriple {
    /// Places every phase value on its winding axis.
    pub fn space_vectors(&self) -> [Point; 3] {
        let axes = phase_axes();
        let values = [self.a, self.b, self.c];
        core::array::from_fn(|i| [axes[i][0] * values[i], axes[i][1] * values[i]])
    }

    /// Sum of the space vectors scaled by 2/3, equal to the Clarke pair.
    pub fn resultant(&self) -> Point {
        let [x, y] = self
            .space_vectors()
            .iter()
            .fold([0.0, 0.0], |acc, v| [acc[0] + v[0], acc[1] + v[1]]);
        [x * 2.0 / 3.0, y * 2.0 / 3.0]
    }
}

impl ClarkePair {
    /// Resultant vector tip in the stationary plane
    pub fn point(&self) -> Point {
        [self.alpha, self.beta]
    }
}

#[inline]
fn polar_unit(angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    [cos, sin]
}
