//! # Equivalent Static Seismic Formulas
//!
//! Pure formulas of the equivalent lateral force procedure. Every function
//! here is a plain numeric rule with no table lookups; the callers in
//! [`crate::reflection`] and [`crate::building`] supply the table values.
//!
//! ## Notation
//!
//! - `A` = Design acceleration ratio (fraction of g)
//! - `I` = Importance factor
//! - `Ru` = Behavior factor of the lateral system
//! - `T` = Period (s)
//! - `T0`, `Ts` = Characteristic periods of the soil class (s)
//! - `S`, `S0` = Spectral shape amplitudes of the soil class
//! - `B1` = Spectral shape factor, `N` = long-period correction, `B = B1·N`
//! - `H` = Building height (m)
//!
//! ## References
//!
//! - Standard 2800, 4th Edition, Chapter 2 (design spectrum) and
//!   Chapter 3 (equivalent static procedure)

use serde::{Deserialize, Serialize};

/// Minimum base shear coefficient ratio: C_min = 0.12·A·I
pub const C_MIN_RATIO: f64 = 0.12;

/// Upper bound of the design period relative to the empirical period
pub const PERIOD_UPPER_BOUND_RATIO: f64 = 1.25;

/// Empirical period multiplier for moment frames with masonry infill
pub const INFILL_PERIOD_FACTOR: f64 = 0.8;

/// Acceleration ratio above which the high-seismicity N curve applies
pub const N_ACCELERATION_THRESHOLD: f64 = 0.27;

/// Period at which N reaches its asymptote (s)
pub const N_ASYMPTOTE_PERIOD: f64 = 4.0;

// =============================================================================
// PERIOD
// =============================================================================

/// Empirical fundamental period
///
/// # Formula
/// T = α·H^p, multiplied by 0.8 when `infill_scaled`
#[inline]
pub fn empirical_period(alpha: f64, pow: f64, height: f64, infill_scaled: bool) -> f64 {
    let t = alpha * height.powf(pow);
    if infill_scaled {
        t * INFILL_PERIOD_FACTOR
    } else {
        t
    }
}

/// Bound an analytical period to `[T_emp, 1.25·T_emp]`
///
/// Analytical periods below the empirical estimate are raised to it;
/// periods above 1.25 times the estimate are capped.
#[inline]
pub fn bounded_period(analytical: f64, empirical: f64) -> f64 {
    analytical.max(empirical).min(PERIOD_UPPER_BOUND_RATIO * empirical)
}

// =============================================================================
// SPECTRAL SHAPE B1
// =============================================================================

/// Branch of the B1 spectral shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum B1Branch {
    /// 0 ≤ T < T0: linear rise from S0
    Ascending,
    /// T0 ≤ T < Ts: constant S + 1
    Plateau,
    /// T ≥ Ts: decay proportional to Ts/T
    Descending,
}

impl B1Branch {
    pub fn description(&self) -> &'static str {
        match self {
            B1Branch::Ascending => "T < T0",
            B1Branch::Plateau => "T0 <= T < Ts",
            B1Branch::Descending => "T >= Ts",
        }
    }
}

/// Which B1 branch applies at period `t`
#[inline]
pub fn b1_branch(t: f64, t0: f64, ts: f64) -> B1Branch {
    if t < t0 {
        B1Branch::Ascending
    } else if t < ts {
        B1Branch::Plateau
    } else {
        B1Branch::Descending
    }
}

/// Evaluate one B1 branch at period `t`
///
/// # Formulas
/// - Ascending: B1 = S0 + (S − S0 + 1)·(T/T0)
/// - Plateau: B1 = S + 1
/// - Descending: B1 = (S + 1)·(Ts/T)
#[inline]
pub fn b1_on_branch(branch: B1Branch, t: f64, t0: f64, ts: f64, s: f64, s0: f64) -> f64 {
    match branch {
        B1Branch::Ascending => s0 + (s - s0 + 1.0) * (t / t0),
        B1Branch::Plateau => s + 1.0,
        B1Branch::Descending => (s + 1.0) * (ts / t),
    }
}

/// Spectral shape factor B1
///
/// # Example
/// ```rust
/// use seismic_core::equations::seismic::spectral_shape_b1;
///
/// // Plateau of soil III: S + 1
/// let b1 = spectral_shape_b1(0.3, 0.15, 0.7, 1.75, 1.1);
/// assert!((b1 - 2.75).abs() < 1e-12);
/// ```
#[inline]
pub fn spectral_shape_b1(t: f64, t0: f64, ts: f64, s: f64, s0: f64) -> f64 {
    b1_on_branch(b1_branch(t, t0, ts), t, t0, ts, s, s0)
}

// =============================================================================
// LONG-PERIOD CORRECTION N
// =============================================================================

/// Branch of the N correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NBranch {
    /// T < Ts: N = 1
    Unity,
    /// Ts ≤ T < 4: linear transition
    Transition,
    /// T ≥ 4: asymptote
    Asymptote,
}

impl NBranch {
    pub fn description(&self) -> &'static str {
        match self {
            NBranch::Unity => "T < Ts",
            NBranch::Transition => "Ts <= T < 4",
            NBranch::Asymptote => "T >= 4",
        }
    }
}

/// Slope and asymptote of N for a design acceleration
///
/// Returns `(0.7, 1.7)` for A > 0.27, otherwise `(0.4, 1.4)`.
#[inline]
pub fn n_curve_parameters(acceleration: f64) -> (f64, f64) {
    if acceleration > N_ACCELERATION_THRESHOLD {
        (0.7, 1.7)
    } else {
        (0.4, 1.4)
    }
}

/// Which N branch applies at period `t`
#[inline]
pub fn n_branch(t: f64, ts: f64) -> NBranch {
    if t < ts {
        NBranch::Unity
    } else if t < N_ASYMPTOTE_PERIOD {
        NBranch::Transition
    } else {
        NBranch::Asymptote
    }
}

/// Long-period correction factor N
///
/// # Formulas
/// - T < Ts: N = 1
/// - Ts ≤ T < 4: N = slope·(T − Ts)/(4 − Ts) + 1
/// - T ≥ 4: N = asymptote
#[inline]
pub fn long_period_factor_n(t: f64, ts: f64, acceleration: f64) -> f64 {
    let (slope, asymptote) = n_curve_parameters(acceleration);
    match n_branch(t, ts) {
        NBranch::Unity => 1.0,
        NBranch::Transition => slope * (t - ts) / (N_ASYMPTOTE_PERIOD - ts) + 1.0,
        NBranch::Asymptote => asymptote,
    }
}

// =============================================================================
// VERTICAL DISTRIBUTION EXPONENT k
// =============================================================================

/// Distribution exponent k
///
/// # Formulas
/// - T < 0.5: k = 1.0
/// - T > 2.5: k = 2.0
/// - otherwise: k = 0.5·T + 0.75
#[inline]
pub fn distribution_exponent_k(t: f64) -> f64 {
    if t < 0.5 {
        1.0
    } else if t > 2.5 {
        2.0
    } else {
        0.5 * t + 0.75
    }
}

// =============================================================================
// BASE SHEAR COEFFICIENT
// =============================================================================

/// Minimum base shear coefficient
///
/// # Formula
/// C_min = 0.12·A·I
#[inline]
pub fn minimum_coefficient(acceleration: f64, importance: f64) -> f64 {
    C_MIN_RATIO * acceleration * importance
}

/// Unfloored base shear coefficient
///
/// # Formula
/// C = A·B·I / Ru
#[inline]
pub fn base_shear_coefficient(acceleration: f64, b: f64, importance: f64, ru: f64) -> f64 {
    acceleration * b * importance / ru
}
