//! # Building
//!
//! The seismic design record of a building: periods, reflection factors,
//! distribution exponents and base shear coefficients for the X and Y
//! lateral systems, at the strength level and the drift level.
//!
//! Everything is computed once in [`Building::new`]; a `Building` is never
//! updated in place. Rebuild it whenever an input changes.
//!
//! ## Computation
//!
//! 1. A from the risk level, C_min = 0.12·A·I
//! 2. Soil parameters at A
//! 3. Per axis: empirical period, bounded design period
//! 4. Governing height cap of the two systems
//! 5. Per axis: B at the design period (strength) and at the analytical
//!    period (drift, capped by the strength value)
//! 6. Per axis: k at both periods
//! 7. Eligibility of both systems
//! 8. C = max(A·B·I/Ru, C_min) per axis and level, unless ineligible
//!
//! ## Example
//!
//! ```rust
//! use seismic_core::building::{Building, BuildingInput};
//! use seismic_core::code_factors::{Axis, DesignLevel, PeriodMode, RiskLevel};
//! use seismic_core::code_tables::CodeTables;
//! use seismic_core::structure_system::SystemSelection;
//!
//! let braced = SystemSelection::new("Building frame", "Ordinary steel concentrically braced frame");
//! let input = BuildingInput {
//!     risk_level: RiskLevel::High,
//!     importance_factor: 1.0,
//!     soil_type: "III".to_string(),
//!     stories: 3,
//!     height: 10.0,
//!     infill: false,
//!     x_system: braced.clone(),
//!     y_system: braced,
//!     city: "Qom".to_string(),
//!     tx: 0.6,
//!     ty: 0.6,
//!     period_mode: PeriodMode::Empirical,
//! };
//!
//! let building = Building::new(input, CodeTables::standard()).unwrap();
//! let cx = building.coefficient(DesignLevel::Strength, Axis::X).unwrap();
//! assert!((cx - 0.2357).abs() < 1e-4);
//! ```

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::code_factors::{Axis, DesignLevel, ImportanceCategory, PeriodMode, RiskLevel};
use crate::code_tables::CodeTables;
use crate::eligibility::{self, Eligibility, EligibilityContext, EligibilityFailure};
use crate::equations::registry::{DerivationTrace, Equation};
use crate::equations::seismic::{
    base_shear_coefficient, bounded_period, distribution_exponent_k, empirical_period,
    minimum_coefficient, n_curve_parameters,
};
use crate::errors::{SeismicError, SeismicResult};
use crate::reflection::ReflectionFactor;
use crate::soil::SoilProperties;
use crate::structure_system::{StructureSystem, SystemSelection};

/// Height ceiling when neither system has a code height cap (m)
pub const DEFAULT_MAX_HEIGHT: f64 = 200.0;

/// User and site inputs of a building.
///
/// ## JSON Example
///
/// ```json
/// {
///   "risk_level": "VeryHigh",
///   "importance_factor": 1.4,
///   "soil_type": "I",
///   "stories": 3,
///   "height": 12.0,
///   "infill": false,
///   "x_system": { "system_type": "Dual", "lateral_type": "Special steel moment frame with steel eccentrically braced frame" },
///   "y_system": { "system_type": "Dual", "lateral_type": "Special steel moment frame with steel eccentrically braced frame" },
///   "city": "Tehran",
///   "tx": 0.6,
///   "ty": 0.6,
///   "period_mode": "Analytical"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingInput {
    /// Seismic risk level of the site
    pub risk_level: RiskLevel,

    /// Importance factor I (0.8, 1.0, 1.2 or 1.4)
    pub importance_factor: f64,

    /// Soil class key of the soil table (e.g., "II")
    pub soil_type: String,

    /// Number of stories above the base
    pub stories: u32,

    /// Height above the base in meters
    pub height: f64,

    /// Masonry infill walls present
    #[serde(default)]
    pub infill: bool,

    /// Lateral system along X
    pub x_system: SystemSelection,

    /// Lateral system along Y
    pub y_system: SystemSelection,

    /// Site label, carried for reports only
    #[serde(default)]
    pub city: String,

    /// Analytical period along X (s)
    pub tx: f64,

    /// Analytical period along Y (s)
    pub ty: f64,

    /// Which period feeds the strength level
    #[serde(default)]
    pub period_mode: PeriodMode,
}

impl BuildingInput {
    /// Validate input parameters.
    pub fn validate(&self) -> SeismicResult<()> {
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(SeismicError::invalid_input(
                "height",
                self.height.to_string(),
                "Height must be positive",
            ));
        }
        if self.stories == 0 {
            return Err(SeismicError::invalid_input(
                "stories",
                self.stories.to_string(),
                "Building must have at least one story",
            ));
        }
        if !self.importance_factor.is_finite() || self.importance_factor <= 0.0 {
            return Err(SeismicError::invalid_input(
                "importance_factor",
                self.importance_factor.to_string(),
                "Importance factor must be positive",
            ));
        }
        for (field, value) in [("tx", self.tx), ("ty", self.ty)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SeismicError::invalid_input(
                    field,
                    value.to_string(),
                    "Analytical period cannot be negative",
                ));
            }
        }
        Ok(())
    }

    /// Analytical period input of an axis
    pub fn analytical_period(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.tx,
            Axis::Y => self.ty,
        }
    }

    fn set_analytical_period(&mut self, axis: Axis, period: f64) {
        match axis {
            Axis::X => self.tx = period,
            Axis::Y => self.ty = period,
        }
    }

    /// System selection of an axis
    pub fn system(&self, axis: Axis) -> &SystemSelection {
        match axis {
            Axis::X => &self.x_system,
            Axis::Y => &self.y_system,
        }
    }
}

/// Seismic coefficient of one axis at one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisCoefficient {
    /// Design coefficient C = max(C_raw, C_min)
    pub c: f64,
    /// A·B·I/Ru before the floor
    pub c_raw: f64,
    /// C_min governed
    pub floor_applied: bool,
}

/// Result of one coefficient computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum CoefficientOutcome {
    Computed { x: AxisCoefficient, y: AxisCoefficient },
    Ineligible(EligibilityFailure),
}

impl CoefficientOutcome {
    /// Coefficient of an axis, `None` when ineligible
    pub fn axis(&self, axis: Axis) -> Option<&AxisCoefficient> {
        match self {
            CoefficientOutcome::Computed { x, y } => Some(match axis {
                Axis::X => x,
                Axis::Y => y,
            }),
            CoefficientOutcome::Ineligible(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&EligibilityFailure> {
        match self {
            CoefficientOutcome::Computed { .. } => None,
            CoefficientOutcome::Ineligible(failure) => Some(failure),
        }
    }
}

/// Periods, reflection factors and exponents of one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisResult {
    pub axis: Axis,
    pub system: StructureSystem,
    /// Code estimate α·H^p (s)
    pub empirical_period: f64,
    /// Period used at the strength level, within [T_emp, 1.25·T_emp] (s)
    pub design_period: f64,
    /// Period used at the drift level (s)
    pub analytical_period: f64,
    /// Reflection factor at the design period
    pub strength_reflection: ReflectionFactor,
    /// Reflection factor at the analytical period, before the cap
    pub drift_reflection: ReflectionFactor,
    /// Drift-level B, never above the strength-level B
    pub drift_b: f64,
    /// k at the design period
    pub k: f64,
    /// k at the analytical period
    pub k_drift: f64,
}

impl AxisResult {
    /// Reflection factor B used at a level
    pub fn b(&self, level: DesignLevel) -> f64 {
        match level {
            DesignLevel::Strength => self.strength_reflection.b,
            DesignLevel::Drift => self.drift_b,
        }
    }

    /// Distribution exponent k used at a level
    pub fn k(&self, level: DesignLevel) -> f64 {
        match level {
            DesignLevel::Strength => self.k,
            DesignLevel::Drift => self.k_drift,
        }
    }

    /// Displacement amplification factor Cd of the axis system
    pub fn drift_amplification(&self) -> f64 {
        self.system.cd
    }
}

/// Computed seismic design record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Inputs as used; for very important buildings the analytical periods
    /// hold the bounded design periods
    pub input: BuildingInput,
    pub importance: ImportanceCategory,
    /// Design acceleration ratio A
    pub acceleration: f64,
    /// Minimum coefficient 0.12·A·I
    pub c_min: f64,
    pub soil: SoilProperties,
    /// Governing height cap (m)
    pub max_height: f64,
    pub x: AxisResult,
    pub y: AxisResult,
    pub eligibility: Eligibility,
    pub strength: CoefficientOutcome,
    pub drift: CoefficientOutcome,
    trace: DerivationTrace,
}

impl Building {
    /// Compute a building against the given code tables.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for out-of-range inputs, and a lookup error for an
    /// unknown importance factor, soil class or system pair. Eligibility
    /// failures are not errors; see [`Building::eligibility`].
    pub fn new(input: BuildingInput, tables: &CodeTables) -> SeismicResult<Self> {
        input.validate()?;
        let mut input = input;

        let importance = ImportanceCategory::from_factor(input.importance_factor)?;
        let acceleration = input.risk_level.acceleration_ratio();
        let c_min = minimum_coefficient(acceleration, importance.factor());
        let soil = SoilProperties::resolve(&input.soil_type, acceleration, tables)?;
        debug!(
            "A = {}, I = {}, C_min = {:.4}, soil {} (T0 = {}, Ts = {})",
            acceleration,
            importance.factor(),
            c_min,
            soil.soil_type,
            soil.t0,
            soil.ts
        );

        let x_system = StructureSystem::resolve(&input.x_system, Axis::X, tables)?;
        let y_system = StructureSystem::resolve(&input.y_system, Axis::Y, tables)?;

        let x = Self::compute_axis(&mut input, importance, &soil, x_system);
        let y = Self::compute_axis(&mut input, importance, &soil, y_system);

        let max_height = maximum_allowed_height(&x.system, &y.system);

        let ctx = EligibilityContext {
            height: input.height,
            stories: input.stories,
            max_height,
            importance,
            risk_level: input.risk_level,
        };
        let eligibility = eligibility::check(&ctx, &x.system, &y.system);
        if let Some(failure) = eligibility.failure() {
            warn!("{} on axis {}: {}", failure.title, failure.axis, failure.message);
        }

        let strength = compute_coefficients(
            DesignLevel::Strength,
            &ctx,
            &x,
            &y,
            acceleration,
            importance,
            c_min,
        );
        let drift = compute_coefficients(
            DesignLevel::Drift,
            &ctx,
            &x,
            &y,
            acceleration,
            importance,
            c_min,
        );

        let mut building = Building {
            input,
            importance,
            acceleration,
            c_min,
            soil,
            max_height,
            x,
            y,
            eligibility,
            strength,
            drift,
            trace: DerivationTrace::new(),
        };
        building.trace = building.build_trace();

        info!(
            "Computed building: {} stories, {} m, soil {}, risk {}, eligible = {}",
            building.input.stories,
            building.input.height,
            building.soil.soil_type,
            building.input.risk_level,
            building.is_eligible()
        );
        Ok(building)
    }

    fn compute_axis(
        input: &mut BuildingInput,
        importance: ImportanceCategory,
        soil: &SoilProperties,
        system: StructureSystem,
    ) -> AxisResult {
        let axis = system.axis;

        // The building-level infill flag scales every axis, even when the
        // axis system is not infill-compatible (`system.is_infill` is not
        // consulted). Kept as-is pending a decision on the per-axis flag.
        let empirical = empirical_period(system.alpha, system.pow, input.height, input.infill);

        let period_source = match input.period_mode {
            PeriodMode::Analytical => input.analytical_period(axis),
            PeriodMode::Empirical => 0.0,
        };
        let design_period = bounded_period(period_source, empirical);

        if importance == ImportanceCategory::VeryHigh {
            warn!(
                "Very important building: analytical period of axis {} replaced by bounded period {:.4} s",
                axis, design_period
            );
            input.set_analytical_period(axis, design_period);
        }
        let analytical_period = input.analytical_period(axis);

        let strength_reflection = ReflectionFactor::new(soil, design_period);
        let drift_reflection = ReflectionFactor::new(soil, analytical_period);
        let drift_b = drift_reflection.b.min(strength_reflection.b);

        let k = distribution_exponent_k(design_period);
        let k_drift = distribution_exponent_k(analytical_period);

        debug!(
            "Axis {}: T_emp = {:.4}, T_design = {:.4}, T_an = {:.4}, B = {:.4}, B_drift = {:.4}, k = {:.3}, k_drift = {:.3}",
            axis,
            empirical,
            design_period,
            analytical_period,
            strength_reflection.b,
            drift_b,
            k,
            k_drift
        );

        AxisResult {
            axis,
            system,
            empirical_period: empirical,
            design_period,
            analytical_period,
            strength_reflection,
            drift_reflection,
            drift_b,
            k,
            k_drift,
        }
    }

    /// Re-run the eligibility rules against this building.
    pub fn check_eligibility(&self) -> Eligibility {
        eligibility::check(&self.eligibility_context(), &self.x.system, &self.y.system)
    }

    fn eligibility_context(&self) -> EligibilityContext {
        EligibilityContext {
            height: self.input.height,
            stories: self.input.stories,
            max_height: self.max_height,
            importance: self.importance,
            risk_level: self.input.risk_level,
        }
    }

    /// Axis result
    pub fn axis(&self, axis: Axis) -> &AxisResult {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    /// Coefficient outcome of a level
    pub fn outcome(&self, level: DesignLevel) -> &CoefficientOutcome {
        match level {
            DesignLevel::Strength => &self.strength,
            DesignLevel::Drift => &self.drift,
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.eligibility.is_eligible()
    }

    /// Design coefficient C, `None` when ineligible
    pub fn coefficient(&self, level: DesignLevel, axis: Axis) -> Option<f64> {
        self.outcome(level).axis(axis).map(|c| c.c)
    }

    /// Period feeding the strength level
    pub fn governing_period(&self, axis: Axis) -> f64 {
        self.axis(axis).design_period
    }

    /// Base shear V = C·W for a seismic weight W, `None` when ineligible
    pub fn base_shear(&self, level: DesignLevel, axis: Axis, weight: f64) -> Option<f64> {
        self.coefficient(level, axis).map(|c| c * weight)
    }

    /// Ordered record of the equations applied
    pub fn trace(&self) -> &DerivationTrace {
        &self.trace
    }

    fn build_trace(&self) -> DerivationTrace {
        let mut trace = DerivationTrace::new();
        let importance = self.importance.factor();

        trace
            .record(Equation::AccelerationRatio, "Building", self.acceleration)
            .branch(self.input.risk_level.display_name());
        trace
            .record(Equation::MinimumCoefficient, "Building", self.c_min)
            .input("A", self.acceleration)
            .input("I", importance);

        for axis_result in [&self.x, &self.y] {
            let ctx = format!("{} axis", axis_result.axis);
            let system = &axis_result.system;
            let entry = trace
                .record(Equation::EmpiricalPeriod, ctx.as_str(), axis_result.empirical_period)
                .input("alpha", system.alpha)
                .input("p", system.pow)
                .input("H", self.input.height);
            if self.input.infill {
                entry.branch("infill x 0.8");
            }
            let source = match self.input.period_mode {
                PeriodMode::Analytical => "analytical",
                PeriodMode::Empirical => "empirical",
            };
            trace
                .record(Equation::BoundedDesignPeriod, ctx.as_str(), axis_result.design_period)
                .input("T_emp", axis_result.empirical_period)
                .branch(source);
        }

        trace
            .record(Equation::MaximumHeight, "Building", self.max_height)
            .input("H", self.input.height);

        for axis_result in [&self.x, &self.y] {
            for level in [DesignLevel::Strength, DesignLevel::Drift] {
                let ctx = format!(
                    "{} axis, {}",
                    axis_result.axis,
                    level.display_name().to_lowercase()
                );
                let rf = match level {
                    DesignLevel::Strength => &axis_result.strength_reflection,
                    DesignLevel::Drift => &axis_result.drift_reflection,
                };
                let (slope, asymptote) = n_curve_parameters(self.acceleration);

                trace
                    .record(Equation::SpectralShapeB1, ctx.as_str(), rf.b1)
                    .input("T", rf.period)
                    .input("T0", rf.soil.t0)
                    .input("Ts", rf.soil.ts)
                    .input("S", rf.soil.s)
                    .input("S0", rf.soil.s0)
                    .branch(rf.b1_branch.description());
                trace
                    .record(Equation::LongPeriodFactorN, ctx.as_str(), rf.n)
                    .input("T", rf.period)
                    .input("slope", slope)
                    .input("N_max", asymptote)
                    .branch(rf.n_branch.description());
                trace
                    .record(Equation::ReflectionFactorB, ctx.as_str(), rf.b)
                    .input("B1", rf.b1)
                    .input("N", rf.n);
                if level == DesignLevel::Drift {
                    trace
                        .record(Equation::DriftReflectionCap, ctx.as_str(), axis_result.drift_b)
                        .input("B(T_an)", axis_result.drift_reflection.b)
                        .input("B(T_design)", axis_result.strength_reflection.b);
                }
                trace
                    .record(Equation::DistributionExponentK, ctx.as_str(), axis_result.k(level))
                    .input("T", rf.period);

                if let Some(coefficient) = self.outcome(level).axis(axis_result.axis) {
                    trace
                        .record(Equation::BaseShearCoefficient, ctx.as_str(), coefficient.c_raw)
                        .input("A", self.acceleration)
                        .input("B", axis_result.b(level))
                        .input("I", importance)
                        .input("Ru", axis_result.system.ru);
                    let entry = trace
                        .record(Equation::CoefficientFloor, ctx.as_str(), coefficient.c)
                        .input("C_min", self.c_min);
                    if coefficient.floor_applied {
                        entry.branch("C_min governs");
                    }
                }
            }
        }

        trace
    }
}

/// Smaller of the two height caps; the capped one when only one exists;
/// [`DEFAULT_MAX_HEIGHT`] when neither is capped.
pub fn maximum_allowed_height(x_system: &StructureSystem, y_system: &StructureSystem) -> f64 {
    match (x_system.max_height, y_system.max_height) {
        (Some(hx), Some(hy)) => hx.min(hy),
        (Some(h), None) | (None, Some(h)) => h,
        (None, None) => DEFAULT_MAX_HEIGHT,
    }
}

fn compute_coefficients(
    level: DesignLevel,
    ctx: &EligibilityContext,
    x: &AxisResult,
    y: &AxisResult,
    acceleration: f64,
    importance: ImportanceCategory,
    c_min: f64,
) -> CoefficientOutcome {
    if let Eligibility::Ineligible(failure) = eligibility::check(ctx, &x.system, &y.system) {
        return CoefficientOutcome::Ineligible(failure);
    }

    let axis_coefficient = |axis: &AxisResult| {
        let c_raw = base_shear_coefficient(
            acceleration,
            axis.b(level),
            importance.factor(),
            axis.system.ru,
        );
        let floor_applied = c_raw < c_min;
        let c = c_raw.max(c_min);
        debug!(
            "{} level, axis {}: C_raw = {:.4}, C = {:.4}{}",
            level,
            axis.axis,
            c_raw,
            c,
            if floor_applied { " (C_min governs)" } else { "" }
        );
        AxisCoefficient { c, c_raw, floor_applied }
    };

    CoefficientOutcome::Computed {
        x: axis_coefficient(x),
        y: axis_coefficient(y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::EligibilityRule;
    use approx::assert_abs_diff_eq;

    const DUAL_RC: &str =
        "Special reinforced concrete moment frame with special reinforced concrete shear walls";

    fn dual_rc() -> SystemSelection {
        SystemSelection::new("Dual", DUAL_RC)
    }

    fn ordinary_braced() -> SystemSelection {
        SystemSelection::new("Building frame", "Ordinary steel concentrically braced frame")
    }

    /// Very high risk, I = 1.4, soil I, 3 stories, 12 m, dual RC system
    fn reference_one() -> BuildingInput {
        BuildingInput {
            risk_level: RiskLevel::VeryHigh,
            importance_factor: 1.4,
            soil_type: "I".to_string(),
            stories: 3,
            height: 12.0,
            infill: false,
            x_system: dual_rc(),
            y_system: dual_rc(),
            city: "Tehran".to_string(),
            tx: 0.6,
            ty: 0.6,
            period_mode: PeriodMode::Analytical,
        }
    }

    /// High risk, I = 1.0, soil III, 3 stories, 10 m, ordinary braced frame
    fn reference_two() -> BuildingInput {
        BuildingInput {
            risk_level: RiskLevel::High,
            importance_factor: 1.0,
            soil_type: "III".to_string(),
            stories: 3,
            height: 10.0,
            infill: false,
            x_system: ordinary_braced(),
            y_system: ordinary_braced(),
            city: "Qom".to_string(),
            tx: 0.6,
            ty: 0.6,
            period_mode: PeriodMode::Empirical,
        }
    }

    fn build(input: BuildingInput) -> Building {
        Building::new(input, CodeTables::standard()).unwrap()
    }

    #[test]
    fn test_reference_scenario_very_important_dual() {
        let building = build(reference_one());

        assert!(building.is_eligible());
        assert_abs_diff_eq!(building.x.empirical_period, 0.3223, epsilon = 1e-4);
        assert_abs_diff_eq!(building.x.design_period, 0.40296, epsilon = 1e-5);
        // Very important: analytical input replaced by the bounded period
        assert_abs_diff_eq!(building.input.tx, 0.40296, epsilon = 1e-5);
        assert_abs_diff_eq!(building.x.analytical_period, 0.40296, epsilon = 1e-5);
        assert_abs_diff_eq!(building.x.k_drift, 1.0);

        let c_drift = building.coefficient(DesignLevel::Drift, Axis::X).unwrap();
        assert_abs_diff_eq!(c_drift, 0.1622, epsilon = 5e-4);
        let c_drift_y = building.coefficient(DesignLevel::Drift, Axis::Y).unwrap();
        assert_abs_diff_eq!(c_drift, c_drift_y);
    }

    #[test]
    fn test_reference_scenario_braced_frame() {
        let building = build(reference_two());

        assert!(building.is_eligible());
        let rf = &building.x.strength_reflection;
        assert_abs_diff_eq!(rf.b1, 2.75);
        assert_eq!(rf.n, 1.0);
        assert_abs_diff_eq!(rf.b, 2.75);

        let c = building.strength.axis(Axis::X).unwrap();
        assert_abs_diff_eq!(c.c, 0.2357, epsilon = 1e-4);
        assert!(!c.floor_applied);
        // Empirical mode: design period is the empirical estimate
        assert_eq!(building.x.design_period, building.x.empirical_period);
        // Analytical input untouched for ordinary importance
        assert_eq!(building.input.tx, 0.6);
    }

    #[test]
    fn test_empirical_mode_drift_uses_analytical_period() {
        let building = build(reference_two());
        let r = &building.x;

        assert_eq!(r.strength_reflection.period, r.empirical_period);
        assert_eq!(r.analytical_period, 0.6);
        assert_eq!(r.drift_reflection.period, 0.6);
        assert_abs_diff_eq!(r.k_drift, 0.5 * 0.6 + 0.75, epsilon = 1e-12);
        assert_eq!(r.k, 1.0);
    }

    #[test]
    fn test_empirical_mode_very_important_overwrites_analytical_period() {
        let mut input = reference_one();
        input.period_mode = PeriodMode::Empirical;
        let building = build(input);

        for axis in Axis::ALL {
            let r = building.axis(axis);
            assert_eq!(r.design_period, r.empirical_period);
            assert_eq!(building.input.analytical_period(axis), r.empirical_period);
            assert_eq!(r.analytical_period, r.empirical_period);
            assert_eq!(r.drift_reflection.period, r.empirical_period);
            assert_eq!(r.k_drift, r.k);
        }
        assert_abs_diff_eq!(building.input.tx, 0.3224, epsilon = 1e-4);
    }

    #[test]
    fn test_acceleration_and_c_min() {
        let building = build(reference_one());
        assert_eq!(building.acceleration, 0.35);
        assert_abs_diff_eq!(building.c_min, 0.12 * 0.35 * 1.4, epsilon = 1e-12);
    }

    #[test]
    fn test_analytical_mode_bounds_period() {
        let mut input = reference_two();
        input.period_mode = PeriodMode::Analytical;
        let building = build(input);
        let e = building.x.empirical_period;
        // 0.6 s is above 1.25·T_emp for a 10 m braced frame
        assert_abs_diff_eq!(building.x.design_period, 1.25 * e, epsilon = 1e-12);
        assert_eq!(building.x.analytical_period, 0.6);
    }

    #[test]
    fn test_short_analytical_period_raised_to_empirical() {
        let mut input = reference_two();
        input.period_mode = PeriodMode::Analytical;
        input.tx = 0.1;
        let building = build(input);
        assert_eq!(building.x.design_period, building.x.empirical_period);
    }

    #[test]
    fn test_drift_b_never_exceeds_strength_b() {
        for soil in ["I", "II", "III", "IV"] {
            for tenth in 0..=40 {
                let mut input = reference_two();
                input.soil_type = soil.to_string();
                input.period_mode = PeriodMode::Analytical;
                input.tx = tenth as f64 * 0.1;
                input.ty = (40 - tenth) as f64 * 0.1;
                let building = build(input);
                for axis in Axis::ALL {
                    let r = building.axis(axis);
                    assert!(r.b(DesignLevel::Drift) <= r.b(DesignLevel::Strength));
                }
            }
        }
    }

    #[test]
    fn test_drift_b_capped_when_analytical_period_falls_on_peak() {
        // Soil IV plateau reaches Ts = 1.0 s; a very short analytical period
        // sits on the ascending branch, a long one past the plateau.
        let mut input = reference_two();
        input.soil_type = "IV".to_string();
        input.period_mode = PeriodMode::Analytical;
        input.tx = 0.05;
        let building = build(input);
        let r = &building.x;
        assert!(r.drift_reflection.b < r.strength_reflection.b);
        assert_eq!(r.drift_b, r.drift_reflection.b);
    }

    #[test]
    fn test_c_min_floor() {
        let input = BuildingInput {
            risk_level: RiskLevel::Low,
            importance_factor: 0.8,
            soil_type: "I".to_string(),
            stories: 30,
            height: 100.0,
            infill: false,
            x_system: SystemSelection::new("Moment frame", "Special steel moment frame"),
            y_system: SystemSelection::new("Moment frame", "Special steel moment frame"),
            city: String::new(),
            tx: 3.0,
            ty: 3.0,
            period_mode: PeriodMode::Analytical,
        };
        let building = build(input);
        assert!(building.is_eligible());
        let c = building.strength.axis(Axis::X).unwrap();
        assert!(c.floor_applied);
        assert!(c.c_raw < building.c_min);
        assert_eq!(c.c, building.c_min);
    }

    #[test]
    fn test_c_at_least_c_min_everywhere() {
        let frames = [
            SystemSelection::new("Moment frame", "Special steel moment frame"),
            SystemSelection::new("Moment frame", "Special reinforced concrete moment frame"),
            dual_rc(),
        ];
        for risk in RiskLevel::ALL {
            for soil in ["I", "II", "III", "IV"] {
                for system in &frames {
                    for height in [6.0, 18.0, 45.0] {
                        let input = BuildingInput {
                            risk_level: risk,
                            importance_factor: 1.2,
                            soil_type: soil.to_string(),
                            stories: (height / 3.0) as u32,
                            height,
                            infill: false,
                            x_system: system.clone(),
                            y_system: system.clone(),
                            city: String::new(),
                            tx: 1.0,
                            ty: 2.0,
                            period_mode: PeriodMode::Analytical,
                        };
                        let building = build(input);
                        for level in [DesignLevel::Strength, DesignLevel::Drift] {
                            for axis in Axis::ALL {
                                let c = building.outcome(level).axis(axis).unwrap();
                                assert!(c.c >= building.c_min);
                                assert_eq!(c.floor_applied, c.c_raw < building.c_min);
                                if !c.floor_applied {
                                    assert_eq!(c.c, c.c_raw);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_max_height_rules() {
        let tables = CodeTables::standard();
        let capped_20 = StructureSystem::resolve(&ordinary_braced(), Axis::X, tables).unwrap();
        let capped_50 = StructureSystem::resolve(
            &SystemSelection::new("Building frame", "Special steel concentrically braced frame"),
            Axis::Y,
            tables,
        )
        .unwrap();
        let uncapped = StructureSystem::resolve(&dual_rc(), Axis::Y, tables).unwrap();

        assert_eq!(maximum_allowed_height(&capped_20, &capped_50), 20.0);
        assert_eq!(maximum_allowed_height(&capped_20, &uncapped), 20.0);
        assert_eq!(maximum_allowed_height(&uncapped, &capped_50), 50.0);
        assert_eq!(maximum_allowed_height(&uncapped, &uncapped), DEFAULT_MAX_HEIGHT);
    }

    #[test]
    fn test_height_limit_failure_blocks_both_levels() {
        let mut input = reference_two();
        input.height = 24.0;
        input.stories = 8;
        let building = build(input);

        assert!(!building.is_eligible());
        let failure = building.eligibility.failure().unwrap();
        assert_eq!(failure.rule, EligibilityRule::HeightLimit);
        assert_eq!(failure.axis, Axis::X);
        assert_eq!(building.strength.failure(), Some(failure));
        assert_eq!(building.drift.failure(), Some(failure));
        assert!(building.coefficient(DesignLevel::Strength, Axis::X).is_none());
        assert!(building.base_shear(DesignLevel::Drift, Axis::Y, 1000.0).is_none());
        // Periods and reflection factors are still reported
        assert!(building.x.strength_reflection.b > 0.0);
    }

    #[test]
    fn test_short_circuit_reports_first_rule_on_x() {
        // Ordinary RC frame on both axes, very important, very high risk:
        // X breaks RestrictedImportance and SpecialSystemRequired; Y too.
        let frame =
            SystemSelection::new("Moment frame", "Ordinary reinforced concrete moment frame");
        let mut input = reference_one();
        input.x_system = frame.clone();
        input.y_system = frame;
        let building = build(input);

        let failure = building.strength.failure().unwrap();
        assert_eq!(failure.rule, EligibilityRule::RestrictedImportance);
        assert_eq!(failure.axis, Axis::X);
        assert_eq!(building.check_eligibility(), building.eligibility);
    }

    #[test]
    fn test_building_infill_flag_scales_every_axis() {
        // The braced frame is not infill-compatible, yet the building flag
        // still scales its empirical period by 0.8.
        let plain = build(reference_two());
        let mut input = reference_two();
        input.infill = true;
        let infilled = build(input);

        assert!(!infilled.x.system.is_infill);
        assert_abs_diff_eq!(
            infilled.x.empirical_period,
            0.8 * plain.x.empirical_period,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_k_factors_from_periods() {
        let mut input = reference_two();
        input.period_mode = PeriodMode::Analytical;
        input.tx = 1.7;
        let building = build(input);
        assert_eq!(building.x.k, distribution_exponent_k(building.x.design_period));
        assert_abs_diff_eq!(building.x.k_drift, 0.5 * 1.7 + 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_identical_inputs_give_identical_records() {
        let a = build(reference_one());
        let b = build(reference_one());
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_lookup_errors() {
        let mut input = reference_two();
        input.soil_type = "V".to_string();
        let err = Building::new(input, CodeTables::standard()).unwrap_err();
        assert!(err.is_configuration_error());

        let mut input = reference_two();
        input.importance_factor = 1.1;
        let err = Building::new(input, CodeTables::standard()).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_IMPORTANCE_FACTOR");

        let mut input = reference_two();
        input.y_system = SystemSelection::new("Dual", "Timber frame");
        let err = Building::new(input, CodeTables::standard()).unwrap_err();
        assert_eq!(err.error_code(), "SYSTEM_NOT_FOUND");
    }

    #[test]
    fn test_invalid_inputs() {
        let mut input = reference_two();
        input.height = 0.0;
        assert_eq!(
            Building::new(input, CodeTables::standard()).unwrap_err().error_code(),
            "INVALID_INPUT"
        );

        let mut input = reference_two();
        input.stories = 0;
        let err = Building::new(input, CodeTables::standard()).unwrap_err();
        assert!(err.is_configuration_error());

        let mut input = reference_two();
        input.ty = -0.2;
        assert!(Building::new(input, CodeTables::standard()).is_err());

        let mut input = reference_two();
        input.height = f64::NAN;
        assert!(Building::new(input, CodeTables::standard()).is_err());
    }

    #[test]
    fn test_zero_analytical_period_does_not_panic() {
        let mut input = reference_two();
        input.period_mode = PeriodMode::Analytical;
        input.tx = 0.0;
        let building = build(input);
        assert_eq!(building.x.analytical_period, 0.0);
        assert_eq!(building.x.k_drift, 1.0);
        assert!(building.x.drift_b.is_finite());
    }

    #[test]
    fn test_base_shear() {
        let building = build(reference_two());
        let c = building.coefficient(DesignLevel::Strength, Axis::Y).unwrap();
        assert_abs_diff_eq!(
            building.base_shear(DesignLevel::Strength, Axis::Y, 5000.0).unwrap(),
            c * 5000.0
        );
        assert_eq!(building.x.drift_amplification(), 3.5);
    }

    #[test]
    fn test_trace_covers_both_levels() {
        let building = build(reference_one());
        let trace = building.trace();
        assert!(trace
            .for_context("X axis, strength")
            .any(|e| e.equation == Equation::BaseShearCoefficient));
        assert!(trace
            .for_context("Y axis, drift")
            .any(|e| e.equation == Equation::DriftReflectionCap));
        let unique = trace.unique_equations();
        assert!(unique.contains(&Equation::SpectralShapeB1));
        assert!(unique.contains(&Equation::CoefficientFloor));

        let c_entry = trace
            .for_context("X axis, drift")
            .find(|e| e.equation == Equation::CoefficientFloor)
            .unwrap();
        assert_eq!(Some(c_entry.value), building.coefficient(DesignLevel::Drift, Axis::X));
    }

    #[test]
    fn test_trace_omits_coefficients_when_ineligible() {
        let mut input = reference_two();
        input.height = 24.0;
        input.stories = 8;
        let building = build(input);
        assert!(!building
            .trace()
            .entries()
            .iter()
            .any(|e| e.equation == Equation::BaseShearCoefficient));
    }

    #[test]
    fn test_input_json() {
        let json = r#"{
            "risk_level": "High",
            "importance_factor": 1.0,
            "soil_type": "III",
            "stories": 3,
            "height": 10.0,
            "x_system": { "system_type": "Building frame", "lateral_type": "Ordinary steel concentrically braced frame" },
            "y_system": { "system_type": "Building frame", "lateral_type": "Ordinary steel concentrically braced frame" },
            "tx": 0.6,
            "ty": 0.6,
            "period_mode": "Empirical"
        }"#;
        let input: BuildingInput = serde_json::from_str(json).unwrap();
        assert!(!input.infill);
        assert_eq!(input.city, "");
        assert_eq!(input, BuildingInput { city: String::new(), ..reference_two() });
    }

    #[test]
    fn test_unknown_risk_level_in_json() {
        let json = r#"{ "risk_level": "Extreme", "importance_factor": 1.0, "soil_type": "III",
            "stories": 3, "height": 10.0,
            "x_system": { "system_type": "a", "lateral_type": "b" },
            "y_system": { "system_type": "a", "lateral_type": "b" },
            "tx": 0.6, "ty": 0.6 }"#;
        assert!(serde_json::from_str::<BuildingInput>(json).is_err());
    }
}
