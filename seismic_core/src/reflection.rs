//! # Reflection Factor
//!
//! Building reflection factor B = B1·N for a soil class, design
//! acceleration and period, plus the sampled B1/N/B curves over
//! 0–4.5 s used for plotting and export.
//!
//! ## Example
//!
//! ```rust
//! use seismic_core::code_tables::CodeTables;
//! use seismic_core::reflection::ReflectionFactor;
//!
//! let rf = ReflectionFactor::resolve("III", 0.30, 0.35, CodeTables::standard()).unwrap();
//! assert!((rf.b1 - 2.75).abs() < 1e-12);
//! assert_eq!(rf.n, 1.0);
//! assert!((rf.b - 2.75).abs() < 1e-12);
//! ```

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::code_tables::CodeTables;
use crate::equations::seismic::{
    b1_branch, b1_on_branch, long_period_factor_n, n_branch, B1Branch, NBranch,
};
use crate::errors::SeismicResult;
use crate::soil::SoilProperties;

/// Samples per second of the diagnostic curves (step 0.01 s)
pub const CURVE_SAMPLES_PER_SECOND: usize = 100;

/// Last period of the diagnostic curves (s)
pub const CURVE_END_PERIOD: f64 = 4.5;

/// Number of samples on the 0.00..=4.50 s grid
pub const CURVE_LEN: usize = 451;

/// Reflection factor of one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionFactor {
    pub soil: SoilProperties,
    /// Period the factor was evaluated at (s)
    pub period: f64,
    pub b1: f64,
    pub b1_branch: B1Branch,
    pub n: f64,
    pub n_branch: NBranch,
    /// B = B1·N
    pub b: f64,
    #[serde(skip)]
    curve: OnceCell<ReflectionCurve>,
}

impl ReflectionFactor {
    /// Evaluate B at `period` for resolved soil parameters.
    pub fn new(soil: &SoilProperties, period: f64) -> Self {
        let branch = b1_branch(period, soil.t0, soil.ts);
        let b1 = b1_on_branch(branch, period, soil.t0, soil.ts, soil.s, soil.s0);
        let n = long_period_factor_n(period, soil.ts, soil.acceleration);
        ReflectionFactor {
            soil: soil.clone(),
            period,
            b1,
            b1_branch: branch,
            n,
            n_branch: n_branch(period, soil.ts),
            b: b1 * n,
            curve: OnceCell::new(),
        }
    }

    /// Resolve the soil class and evaluate B in one step.
    pub fn resolve(
        soil_type: &str,
        acceleration: f64,
        period: f64,
        tables: &CodeTables,
    ) -> SeismicResult<Self> {
        let soil = SoilProperties::resolve(soil_type, acceleration, tables)?;
        Ok(Self::new(&soil, period))
    }

    /// B1, N and B sampled over 0.00..=4.50 s. Computed on first use.
    pub fn curve(&self) -> &ReflectionCurve {
        self.curve.get_or_init(|| ReflectionCurve::sample(&self.soil))
    }
}

impl PartialEq for ReflectionFactor {
    fn eq(&self, other: &Self) -> bool {
        self.soil == other.soil
            && self.period == other.period
            && self.b1 == other.b1
            && self.b1_branch == other.b1_branch
            && self.n == other.n
            && self.n_branch == other.n_branch
            && self.b == other.b
    }
}

/// One sample of the reflection curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub period: f64,
    pub b1: f64,
    pub n: f64,
    pub b: f64,
}

/// B1, N and B sampled on a fixed period grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectionCurve {
    pub periods: Vec<f64>,
    pub b1: Vec<f64>,
    pub n: Vec<f64>,
    pub b: Vec<f64>,
}

impl ReflectionCurve {
    /// Sample the curves for a soil on the 0.01 s grid.
    ///
    /// Periods are generated from integer indices so every grid point is
    /// the exact double nearest to `i / 100`.
    pub fn sample(soil: &SoilProperties) -> Self {
        let mut curve = ReflectionCurve {
            periods: Vec::with_capacity(CURVE_LEN),
            b1: Vec::with_capacity(CURVE_LEN),
            n: Vec::with_capacity(CURVE_LEN),
            b: Vec::with_capacity(CURVE_LEN),
        };

        for i in 0..CURVE_LEN {
            let t = i as f64 / CURVE_SAMPLES_PER_SECOND as f64;
            let branch = curve_b1_branch(t, soil);
            let b1 = b1_on_branch(branch, t, soil.t0, soil.ts, soil.s, soil.s0);
            let n = long_period_factor_n(t, soil.ts, soil.acceleration);
            curve.periods.push(t);
            curve.b1.push(b1);
            curve.n.push(n);
            curve.b.push(b1 * n);
        }

        curve
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Iterate the samples as points
    pub fn points(&self) -> impl Iterator<Item = CurvePoint> + '_ {
        (0..self.len()).map(move |i| CurvePoint {
            period: self.periods[i],
            b1: self.b1[i],
            n: self.n[i],
            b: self.b[i],
        })
    }

    /// Largest B on the grid
    pub fn peak_b(&self) -> f64 {
        self.b.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// B1 branch used on the sampling grid.
///
/// For the stiffest soil class the descending branch starts strictly after
/// Ts, so the grid point at Ts is taken from the plateau.
fn curve_b1_branch(t: f64, soil: &SoilProperties) -> B1Branch {
    match b1_branch(t, soil.t0, soil.ts) {
        B1Branch::Descending if soil.is_stiffest && t <= soil.ts => B1Branch::Plateau,
        branch => branch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn soil(soil_type: &str, acceleration: f64) -> SoilProperties {
        SoilProperties::resolve(soil_type, acceleration, CodeTables::standard()).unwrap()
    }

    #[test]
    fn test_plateau_value() {
        let rf = ReflectionFactor::new(&soil("III", 0.30), 0.2812);
        assert_eq!(rf.b1_branch, B1Branch::Plateau);
        assert_abs_diff_eq!(rf.b1, 2.75);
        assert_eq!(rf.n_branch, NBranch::Unity);
        assert_abs_diff_eq!(rf.b, 2.75);
    }

    #[test]
    fn test_descending_with_transition() {
        // Soil I at A = 0.35, T = 1.3: B1 = 2.5·0.4/1.3, N = 0.7·0.9/3.6 + 1
        let rf = ReflectionFactor::new(&soil("I", 0.35), 1.3);
        assert_abs_diff_eq!(rf.b1, 2.5 * 0.4 / 1.3, epsilon = 1e-12);
        assert_abs_diff_eq!(rf.n, 1.175, epsilon = 1e-12);
        assert_abs_diff_eq!(rf.b, rf.b1 * rf.n, epsilon = 1e-12);
    }

    #[test]
    fn test_b1_positive_and_n_at_least_one() {
        for soil_type in ["I", "II", "III", "IV"] {
            for a in [0.20, 0.25, 0.30, 0.35] {
                let s = soil(soil_type, a);
                for i in 1..=600 {
                    let rf = ReflectionFactor::new(&s, i as f64 * 0.01);
                    assert!(rf.b1 > 0.0);
                    assert!(rf.n >= 1.0);
                }
            }
        }
    }

    #[test]
    fn test_curve_grid() {
        let rf = ReflectionFactor::new(&soil("II", 0.25), 0.5);
        let curve = rf.curve();
        assert_eq!(curve.len(), CURVE_LEN);
        assert_eq!(curve.periods[0], 0.0);
        assert_eq!(curve.periods[CURVE_LEN - 1], CURVE_END_PERIOD);
        assert_eq!(curve.periods[50], 0.5);
        // T = 0 takes S0
        assert_eq!(curve.b1[0], 1.0);
        assert!(curve.b.iter().all(|b| b.is_finite()));
    }

    #[test]
    fn test_curve_matches_point_evaluation() {
        let s = soil("IV", 0.20);
        let curve = ReflectionCurve::sample(&s);
        for point in curve.points().filter(|p| p.period > 0.0) {
            let rf = ReflectionFactor::new(&s, point.period);
            assert_abs_diff_eq!(point.b, rf.b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_stiffest_soil_sample_at_ts_uses_plateau() {
        let s = soil("I", 0.35);
        let curve = ReflectionCurve::sample(&s);
        let idx = 40;
        assert_eq!(curve.periods[idx], s.ts);
        assert_eq!(curve_b1_branch(s.ts, &s), B1Branch::Plateau);
        assert_abs_diff_eq!(curve.b1[idx], s.s + 1.0);
        assert!(curve.b1[idx + 1] < s.s + 1.0);

        let other = soil("II", 0.35);
        assert_eq!(curve_b1_branch(other.ts, &other), B1Branch::Descending);
    }

    #[test]
    fn test_peak_is_plateau_times_unity() {
        let s = soil("III", 0.30);
        let curve = ReflectionCurve::sample(&s);
        assert_abs_diff_eq!(curve.peak_b(), 2.75, epsilon = 1e-12);
    }

    #[test]
    fn test_curve_not_serialized() {
        let rf = ReflectionFactor::new(&soil("I", 0.30), 0.7);
        let _ = rf.curve();
        let json = serde_json::to_string(&rf).unwrap();
        assert!(!json.contains("curve"));
        let back: ReflectionFactor = serde_json::from_str(&json).unwrap();
        assert_abs_diff_eq!(back.b, rf.b, epsilon = 1e-12);
        assert_eq!(back.b1_branch, rf.b1_branch);
        assert_eq!(back.curve().len(), CURVE_LEN);
    }
}
