// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use core::f64::consts::{FRAC_PI_3, TAU};

use serde::{Deserialize, Serialize};

/// Precalculated sqrt(3)/2
const SQRT3DIV2: f64 = 0.866_025_403_784_438_6;
/// Electrical displacement between neighbouring phases (120 degrees)
pub const PHASE_SHIFT: f64 = 2.0 * FRAC_PI_3;

/// Instantaneous values of three balanced phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseTriple {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Stationary two-axis (alpha/beta) frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClarkePair {
    pub alpha: f64,
    pub beta: f64,
}

/// Rotating two-axis (direct/quadrature) frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParkPair {
    pub d: f64,
    pub q: f64,
}

impl ClarkePair {
    /// Length of the resultant vector
    pub fn magnitude(&self) -> f64 {
        self.alpha.hypot(self.beta)
    }

    /// Electrical angle of the resultant vector in `[0, 2π)`
    pub fn angle(&self) -> f64 {
        let angle = self.beta.atan2(self.alpha);
        if angle < 0.0 {
            angle + TAU
        } else {
            angle
        }
    }
}

impl ParkPair {
    /// Length of the resultant vector, identical to the stationary frame one
    pub fn magnitude(&self) -> f64 {
        self.d.hypot(self.q)
    }
}

/// Generates three balanced sinusoids 120 degrees apart.
///
/// # Parameters
/// - `angle`: Electrical angle of phase A in radians, any real value.
/// - `amplitude`: Peak value, zero and negative values are accepted.
///
/// # Returns
/// The instantaneous `a`, `b` and `c` values.
#[inline]
pub fn three_phase(angle: f64, amplitude: f64) -> PhaseTriple {
    PhaseTriple {
        a: amplitude * angle.cos(),
        b: amplitude * (angle - PHASE_SHIFT).cos(),
        c: amplitude * (angle + PHASE_SHIFT).cos(),
    }
}

/// Performs the direct amplitude-invariant Clarke transform.
///
/// ```text
/// [alpha] = 2/3 * [ 1   -1/2        -1/2      ] * [a b c]'
/// [beta ]         [ 0    sqrt(3)/2  -sqrt(3)/2]
/// ```
#[inline]
pub fn clarke(phase: PhaseTriple) -> ClarkePair {
    let alpha = (2.0 / 3.0) * (phase.a - 0.5 * phase.b - 0.5 * phase.c);
    let beta = (2.0 / 3.0) * (SQRT3DIV2 * phase.b - SQRT3DIV2 * phase.c);

    ClarkePair { alpha, beta }
}

/// Performs the inverse Clarke transform, assuming no zero-sequence component.
#[inline]
pub fn inverse_clarke(clarke: ClarkePair) -> PhaseTriple {
    // Beta projection shared by phases B and C
    let beta_sqrt3_div2 = SQRT3DIV2 * clarke.beta;
    let half_alpha = 0.5 * clarke.alpha;

    PhaseTriple {
        a: clarke.alpha,
        b: -half_alpha + beta_sqrt3_div2,
        c: -half_alpha - beta_sqrt3_div2,
    }
}

/// Performs the Park transform, rotating the stationary frame by `-theta`.
///
/// `theta` has to be the angle that produced the phase sample, otherwise the
/// resultant vector no longer sits on the d axis.
#[inline]
pub fn park(clarke: ClarkePair, theta: f64) -> ParkPair {
    let (sin, cos) = theta.sin_cos();

    ParkPair {
        d: clarke.alpha * cos + clarke.beta * sin,
        q: -clarke.alpha * sin + clarke.beta * cos,
    }
}

/// Performs the inverse Park transform, rotating the dq frame back by `theta`.
#[inline]
pub fn inverse_park(park: ParkPair, theta: f64) -> ClarkePair {
    let (sin, cos) = theta.sin_cos();

    ClarkePair {
        alpha: park.d * cos - park.q * sin,
        beta: park.d * sin + park.q * cos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn sweep() -> impl Iterator<Item = (f64, f64)> {
        let angles = (-40..=40).map(|i| i as f64 * 0.37);
        angles.flat_map(|angle| [-1.2, 0.0, 0.2, 1.0, 1.5, 7.25].map(move |amp| (angle, amp)))
    }

    #[test]
    fn phases_are_balanced() {
        for (angle, amp) in sweep() {
            let p = three_phase(angle, amp);
            assert!(approx_eq(p.a + p.b + p.c, 0.0), "angle {angle} amp {amp}");
        }
    }

    #[test]
    fn clarke_matches_rotating_vector() {
        for (angle, amp) in sweep() {
            let c = clarke(three_phase(angle, amp));
            assert!(approx_eq(c.alpha, amp * angle.cos()));
            assert!(approx_eq(c.beta, amp * angle.sin()));
        }
    }

    #[test]
    fn park_locks_vector_on_d_axis() {
        for (angle, amp) in sweep() {
            let dq = park(clarke(three_phase(angle, amp)), angle);
            assert!(approx_eq(dq.d, amp), "d = {} for angle {angle}", dq.d);
            assert!(approx_eq(dq.q, 0.0), "q = {} for angle {angle}", dq.q);
        }
    }

    #[test]
    fn park_with_lagging_angle_leaks_into_q() {
        let dq = park(clarke(three_phase(1.0, 1.0)), 1.0 - FRAC_PI_2);
        assert!(approx_eq(dq.d, 0.0));
        assert!(approx_eq(dq.q, 1.0));
    }

    #[test]
    fn zero_angle_scenario() {
        let p = three_phase(0.0, 1.0);
        assert!(approx_eq(p.a, 1.0));
        assert!(approx_eq(p.b, -0.5));
        assert!(approx_eq(p.c, -0.5));

        let c = clarke(p);
        assert!(approx_eq(c.alpha, 1.0));
        assert!(approx_eq(c.beta, 0.0));

        let dq = park(c, 0.0);
        assert!(approx_eq(dq.d, 1.0));
        assert!(approx_eq(dq.q, 0.0));
    }

    #[test]
    fn quarter_turn_scenario() {
        let p = three_phase(FRAC_PI_2, 1.0);
        assert!(approx_eq(p.a, 0.0));
        // b = cos(-π/6) leads, c = cos(7π/6) lags
        assert!(approx_eq(p.b, SQRT3DIV2));
        assert!(approx_eq(p.c, -SQRT3DIV2));

        let c = clarke(p);
        assert!(approx_eq(c.alpha, 0.0));
        assert!(approx_eq(c.beta, 1.0));

        let dq = park(c, FRAC_PI_2);
        assert!(approx_eq(dq.d, 1.0));
        assert!(approx_eq(dq.q, 0.0));
    }

    #[test]
    fn inverse_transforms_restore_balanced_phases() {
        let source = three_phase(2.1, 0.8);
        let dq = park(clarke(source), 2.1);
        let restored = inverse_clarke(inverse_park(dq, 2.1));

        assert!(approx_eq(restored.a, source.a));
        assert!(approx_eq(restored.b, source.b));
        assert!(approx_eq(restored.c, source.c));
    }

    #[test]
    fn resultant_magnitude_and_angle() {
        let c = clarke(three_phase(PI + 0.5, 1.3));
        assert!(approx_eq(c.magnitude(), 1.3));
        assert!(approx_eq(c.angle(), PI + 0.5));
        assert!(approx_eq(park(c, PI + 0.5).magnitude(), 1.3));
    }

    #[test]
    fn zero_amplitude_is_degenerate_but_defined() {
        let c = clarke(three_phase(0.7, 0.0));
        assert_eq!(c.magnitude(), 0.0);
        assert_eq!(park(c, 0.7).magnitude(), 0.0);
    }
}
