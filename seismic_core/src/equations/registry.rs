//! # Equation Registry
//!
//! Central registry of every formula the seismic engine applies. Each
//! equation has metadata including its code reference, plain-text formula
//! and variable definitions.
//!
//! ## Architecture
//!
//! The registry provides:
//! - Type-safe equation identification via the `Equation` enum
//! - Metadata for report generation and audit trails
//! - A [`DerivationTrace`] recording which equation produced which number,
//!   with its inputs and the branch taken
//!
//! The trace is assembled from values the engine has already computed. It
//! never feeds back into a calculation.
//!
//! ## Usage
//!
//! ```rust
//! use seismic_core::equations::registry::{DerivationTrace, Equation};
//!
//! let mut trace = DerivationTrace::new();
//! trace.record(Equation::MinimumCoefficient, "Building", 0.0588)
//!     .input("A", 0.35)
//!     .input("I", 1.4);
//!
//! let meta = Equation::MinimumCoefficient.metadata();
//! println!("Formula: {}", meta.formula_plain);
//! assert_eq!(trace.entries().len(), 1);
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

// ============================================================================
// Code References
// ============================================================================

/// Reference to the design standard clause an equation comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeReference {
    /// Seismic design standard (Standard 2800)
    Standard2800 {
        edition: u8,
        section: &'static str,
    },
    /// Tabulated code data (system or soil table)
    CodeTable { table: &'static str },
}

impl CodeReference {
    /// Format the reference for display in reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::Standard2800 { edition, section } => {
                format!("Standard 2800 ({}th ed.) Section {}", edition, section)
            }
            CodeReference::CodeTable { table } => format!("Code table: {}", table),
        }
    }
}

// ============================================================================
// Equation Categories
// ============================================================================

/// Categories for organizing equations in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Design acceleration from the hazard map
    SiteHazard,
    /// Fundamental period estimates and bounds
    Period,
    /// Reflection factor B and its parts
    DesignSpectrum,
    /// Vertical distribution of the base shear
    VerticalDistribution,
    /// Base shear coefficient C
    BaseShear,
    /// Code limits (height caps)
    Limits,
}

impl EquationCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::SiteHazard => "Site Hazard",
            EquationCategory::Period => "Period",
            EquationCategory::DesignSpectrum => "Design Spectrum",
            EquationCategory::VerticalDistribution => "Vertical Distribution",
            EquationCategory::BaseShear => "Base Shear",
            EquationCategory::Limits => "Limits",
        }
    }

    /// Sort order for reports (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::SiteHazard => 1,
            EquationCategory::Period => 2,
            EquationCategory::Limits => 3,
            EquationCategory::DesignSpectrum => 4,
            EquationCategory::VerticalDistribution => 5,
            EquationCategory::BaseShear => 6,
        }
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Symbol (e.g., "A", "T", "Ru")
    pub symbol: &'static str,
    /// Description
    pub description: &'static str,
    /// Units (e.g., "s", "m", "-")
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

// ============================================================================
// Equation Metadata
// ============================================================================

/// Complete metadata for a seismic design equation.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name
    pub name: &'static str,
    /// Brief description of what this equation calculates
    pub description: &'static str,
    /// The formula in plain text
    pub formula_plain: &'static str,
    /// Code/standard reference
    pub reference: CodeReference,
    /// Variable definitions
    pub variables: Vec<Variable>,
    /// Category for grouping
    pub category: EquationCategory,
    /// Source module where the equation implementation lives
    pub source_module: &'static str,
    /// Function name implementing the equation
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// All equations used by the seismic engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Equation {
    /// A from the risk level
    AccelerationRatio,
    /// C_min = 0.12·A·I
    MinimumCoefficient,
    /// T = α·H^p (·0.8 with infill)
    EmpiricalPeriod,
    /// T_design = clamp(T_an, T_emp, 1.25·T_emp)
    BoundedDesignPeriod,
    /// H_max = min of the two axes' caps
    MaximumHeight,
    /// Three-branch spectral shape B1
    SpectralShapeB1,
    /// Long-period correction N
    LongPeriodFactorN,
    /// B = B1·N
    ReflectionFactorB,
    /// B_drift = min(B_drift, B_strength)
    DriftReflectionCap,
    /// k exponent from the period
    DistributionExponentK,
    /// C = A·B·I/Ru
    BaseShearCoefficient,
    /// C = max(C, C_min)
    CoefficientFloor,
}

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::AccelerationRatio => EquationMetadata {
                name: "Design Acceleration Ratio",
                description: "Design base acceleration as a fraction of g, fixed per seismic risk level",
                formula_plain: "A = 0.20 | 0.25 | 0.30 | 0.35 (low | medium | high | very high)",
                reference: CodeReference::Standard2800 { edition: 4, section: "2-2" },
                variables: vec![Variable::new("A", "Design acceleration ratio", "g")],
                category: EquationCategory::SiteHazard,
                source_module: "code_factors.rs",
                source_function: "RiskLevel::acceleration_ratio",
            },

            Equation::MinimumCoefficient => EquationMetadata {
                name: "Minimum Base Shear Coefficient",
                description: "Lower bound of the seismic coefficient",
                formula_plain: "C_min = 0.12 * A * I",
                reference: CodeReference::Standard2800 { edition: 4, section: "3-3-1" },
                variables: vec![
                    Variable::new("A", "Design acceleration ratio", "g"),
                    Variable::new("I", "Importance factor", "-"),
                ],
                category: EquationCategory::BaseShear,
                source_module: "equations/seismic.rs",
                source_function: "minimum_coefficient",
            },

            Equation::EmpiricalPeriod => EquationMetadata {
                name: "Empirical Fundamental Period",
                description: "Code estimate of the fundamental period from height and system constants",
                formula_plain: "T = alpha * H^p (x 0.8 when infill walls are present)",
                reference: CodeReference::Standard2800 { edition: 4, section: "3-3-3" },
                variables: vec![
                    Variable::new("alpha", "Period coefficient of the system", "-"),
                    Variable::new("p", "Period exponent of the system", "-"),
                    Variable::new("H", "Building height above base", "m"),
                ],
                category: EquationCategory::Period,
                source_module: "equations/seismic.rs",
                source_function: "empirical_period",
            },

            Equation::BoundedDesignPeriod => EquationMetadata {
                name: "Bounded Design Period",
                description: "Analytical period limited to the range allowed around the empirical period",
                formula_plain: "T_design = min(max(T_an, T_emp), 1.25 * T_emp)",
                reference: CodeReference::Standard2800 { edition: 4, section: "3-3-3-2" },
                variables: vec![
                    Variable::new("T_an", "Analytical period", "s"),
                    Variable::new("T_emp", "Empirical period", "s"),
                ],
                category: EquationCategory::Period,
                source_module: "equations/seismic.rs",
                source_function: "bounded_period",
            },

            Equation::MaximumHeight => EquationMetadata {
                name: "Maximum Allowed Height",
                description: "Governing height cap of the two lateral systems",
                formula_plain: "H_max = min(H_max,x, H_max,y), 200 m when neither system is capped",
                reference: CodeReference::CodeTable { table: "Structure systems" },
                variables: vec![
                    Variable::new("H_max,x", "Height cap of the X system", "m"),
                    Variable::new("H_max,y", "Height cap of the Y system", "m"),
                ],
                category: EquationCategory::Limits,
                source_module: "building.rs",
                source_function: "maximum_allowed_height",
            },

            Equation::SpectralShapeB1 => EquationMetadata {
                name: "Spectral Shape Factor B1",
                description: "Site-dependent spectral shape of the design response spectrum",
                formula_plain: "B1 = S0 + (S - S0 + 1)(T/T0) for T < T0; S + 1 for T0 <= T < Ts; (S + 1)(Ts/T) for T >= Ts",
                reference: CodeReference::Standard2800 { edition: 4, section: "2-4" },
                variables: vec![
                    Variable::new("T", "Period", "s"),
                    Variable::new("T0", "Lower characteristic period of the soil", "s"),
                    Variable::new("Ts", "Upper characteristic period of the soil", "s"),
                    Variable::new("S", "Spectral amplitude parameter", "-"),
                    Variable::new("S0", "Spectral amplitude at T = 0", "-"),
                ],
                category: EquationCategory::DesignSpectrum,
                source_module: "equations/seismic.rs",
                source_function: "spectral_shape_b1",
            },

            Equation::LongPeriodFactorN => EquationMetadata {
                name: "Long-Period Correction N",
                description: "Increase of the spectrum for long periods; steeper in high-seismicity zones",
                formula_plain: "N = 1 for T < Ts; slope(T - Ts)/(4 - Ts) + 1 for Ts <= T < 4; N_max for T >= 4",
                reference: CodeReference::Standard2800 { edition: 4, section: "2-4" },
                variables: vec![
                    Variable::new("slope", "0.7 when A > 0.27, else 0.4", "-"),
                    Variable::new("N_max", "1.7 when A > 0.27, else 1.4", "-"),
                ],
                category: EquationCategory::DesignSpectrum,
                source_module: "equations/seismic.rs",
                source_function: "long_period_factor_n",
            },

            Equation::ReflectionFactorB => EquationMetadata {
                name: "Reflection Factor B",
                description: "Building reflection factor from the design spectrum",
                formula_plain: "B = B1 * N",
                reference: CodeReference::Standard2800 { edition: 4, section: "2-4" },
                variables: vec![
                    Variable::new("B1", "Spectral shape factor", "-"),
                    Variable::new("N", "Long-period correction", "-"),
                ],
                category: EquationCategory::DesignSpectrum,
                source_module: "reflection.rs",
                source_function: "ReflectionFactor::new",
            },

            Equation::DriftReflectionCap => EquationMetadata {
                name: "Drift Reflection Factor Cap",
                description: "Drift-level reflection factor may not exceed the strength-level value",
                formula_plain: "B_drift = min(B(T_an), B(T_design))",
                reference: CodeReference::Standard2800 { edition: 4, section: "3-5-3" },
                variables: vec![
                    Variable::new("B(T_an)", "Reflection factor at the analytical period", "-"),
                    Variable::new("B(T_design)", "Reflection factor at the bounded period", "-"),
                ],
                category: EquationCategory::DesignSpectrum,
                source_module: "building.rs",
                source_function: "AxisResult::drift_b",
            },

            Equation::DistributionExponentK => EquationMetadata {
                name: "Distribution Exponent k",
                description: "Exponent of the vertical distribution of lateral forces",
                formula_plain: "k = 1.0 for T < 0.5; 0.5T + 0.75 for 0.5 <= T <= 2.5; 2.0 for T > 2.5",
                reference: CodeReference::Standard2800 { edition: 4, section: "3-3-7-1" },
                variables: vec![Variable::new("T", "Period", "s")],
                category: EquationCategory::VerticalDistribution,
                source_module: "equations/seismic.rs",
                source_function: "distribution_exponent_k",
            },

            Equation::BaseShearCoefficient => EquationMetadata {
                name: "Base Shear Coefficient",
                description: "Seismic coefficient before the minimum floor",
                formula_plain: "C = A * B * I / Ru",
                reference: CodeReference::Standard2800 { edition: 4, section: "3-3-1" },
                variables: vec![
                    Variable::new("A", "Design acceleration ratio", "g"),
                    Variable::new("B", "Reflection factor", "-"),
                    Variable::new("I", "Importance factor", "-"),
                    Variable::new("Ru", "Behavior factor", "-"),
                ],
                category: EquationCategory::BaseShear,
                source_module: "equations/seismic.rs",
                source_function: "base_shear_coefficient",
            },

            Equation::CoefficientFloor => EquationMetadata {
                name: "Coefficient Floor",
                description: "Seismic coefficient raised to the minimum when below it",
                formula_plain: "C = max(A * B * I / Ru, C_min)",
                reference: CodeReference::Standard2800 { edition: 4, section: "3-3-1" },
                variables: vec![Variable::new("C_min", "Minimum base shear coefficient", "-")],
                category: EquationCategory::BaseShear,
                source_module: "building.rs",
                source_function: "Building::compute_coefficients",
            },
        }
    }

    /// Get all equations in a given category
    pub fn in_category(category: EquationCategory) -> Vec<Equation> {
        ALL_EQUATIONS
            .iter()
            .filter(|eq| eq.metadata().category == category)
            .copied()
            .collect()
    }

    /// Get all categories in report order
    pub fn all_categories() -> Vec<EquationCategory> {
        use EquationCategory::*;
        let mut cats = vec![
            SiteHazard,
            Period,
            DesignSpectrum,
            VerticalDistribution,
            BaseShear,
            Limits,
        ];
        cats.sort_by_key(|c| c.sort_order());
        cats
    }
}

/// All equations in the registry (for iteration)
pub static ALL_EQUATIONS: &[Equation] = &[
    Equation::AccelerationRatio,
    Equation::MinimumCoefficient,
    Equation::EmpiricalPeriod,
    Equation::BoundedDesignPeriod,
    Equation::MaximumHeight,
    Equation::SpectralShapeB1,
    Equation::LongPeriodFactorN,
    Equation::ReflectionFactorB,
    Equation::DriftReflectionCap,
    Equation::DistributionExponentK,
    Equation::BaseShearCoefficient,
    Equation::CoefficientFloor,
];

// ============================================================================
// Derivation Trace
// ============================================================================

/// A named input value of a trace entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceValue {
    pub symbol: String,
    pub value: f64,
}

/// One step of a derivation: which equation produced which value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// The equation that was applied
    pub equation: Equation,
    /// Where it was applied (e.g., "X axis, strength")
    pub context: String,
    /// Inputs in the order they appear in the formula
    pub inputs: Vec<TraceValue>,
    /// Piecewise branch taken, if the equation has branches
    pub branch: Option<String>,
    /// Resulting value
    pub value: f64,
}

impl TraceEntry {
    pub fn new(equation: Equation, context: impl Into<String>, value: f64) -> Self {
        Self {
            equation,
            context: context.into(),
            inputs: Vec::new(),
            branch: None,
            value,
        }
    }

    /// Add an input value
    pub fn input(&mut self, symbol: impl Into<String>, value: f64) -> &mut Self {
        self.inputs.push(TraceValue {
            symbol: symbol.into(),
            value,
        });
        self
    }

    /// Record the branch taken
    pub fn branch(&mut self, branch: impl Into<String>) -> &mut Self {
        self.branch = Some(branch.into());
        self
    }

    /// Render as a single line, e.g. `C_min = 0.0588  [A=0.35, I=1.4]`
    pub fn render(&self) -> String {
        let meta = self.equation.metadata();
        let inputs: Vec<String> = self
            .inputs
            .iter()
            .map(|v| format!("{}={:.4}", v.symbol, v.value))
            .collect();
        let mut line = format!("{} ({}): {:.4}", meta.name, self.context, self.value);
        if !inputs.is_empty() {
            line.push_str(&format!("  [{}]", inputs.join(", ")));
        }
        if let Some(branch) = &self.branch {
            line.push_str(&format!("  branch: {}", branch));
        }
        line
    }
}

/// Ordered record of every equation applied while computing a building.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivationTrace {
    entries: Vec<TraceEntry>,
}

impl DerivationTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an equation result; chain `.input()` / `.branch()` on the return
    pub fn record(
        &mut self,
        equation: Equation,
        context: impl Into<String>,
        value: f64,
    ) -> &mut TraceEntry {
        self.entries.push(TraceEntry::new(equation, context, value));
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    /// Get all recorded entries
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Get unique equations used (deduplicated, first-use order)
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|e| seen.insert(e.equation))
            .map(|e| e.equation)
            .collect()
    }

    /// Group entries by equation
    pub fn by_equation(&self) -> HashMap<Equation, Vec<&TraceEntry>> {
        let mut map: HashMap<Equation, Vec<&TraceEntry>> = HashMap::new();
        for entry in &self.entries {
            map.entry(entry.equation).or_default().push(entry);
        }
        map
    }

    /// Entries recorded for one context
    pub fn for_context<'a>(
        &'a self,
        context: &'a str,
    ) -> impl Iterator<Item = &'a TraceEntry> + 'a {
        self.entries.iter().filter(move |e| e.context == context)
    }

    /// Render one line per entry
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(TraceEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ============================================================================
// Markdown Generation for EQUATIONS.md
// ============================================================================

/// Generate a complete EQUATIONS.md listing every registered equation,
/// organized by category, with formulas, references and source locations.
///
/// # Example
///
/// ```rust
/// use seismic_core::equations::registry::generate_equations_markdown;
///
/// let markdown = generate_equations_markdown();
/// assert!(markdown.contains("Seismic Equations Reference"));
/// assert!(markdown.contains("Design Spectrum"));
/// ```
pub fn generate_equations_markdown() -> String {
    let mut output = String::with_capacity(12_000);

    output.push_str(
        r#"# Seismic Equations Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-equations`

This document lists every formula used to derive the seismic coefficient C,
the distribution exponent k, the reflection factor B and the design period.

## Units

| Quantity | Unit |
|----------|------|
| Height | m |
| Period | s |
| Acceleration | fraction of g |

---

"#,
    );

    for category in Equation::all_categories() {
        let equations = Equation::in_category(category);
        if equations.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for equation in equations {
            let meta = equation.metadata();

            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            if !meta.variables.is_empty() {
                output.push_str("**Variables:**\n\n");
                output.push_str("| Symbol | Description | Units |\n");
                output.push_str("|--------|-------------|-------|\n");
                for var in &meta.variables {
                    output.push_str(&format!(
                        "| {} | {} | {} |\n",
                        var.symbol, var.description, var.units
                    ));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Reference:** {}\n\n", meta.reference.citation()));
            output.push_str(&format!(
                "**Source:** `{}` → `{}`\n\n",
                meta.source_module, meta.source_function
            ));
        }

        output.push_str("---\n\n");
    }

    output.push_str("## Statistics\n\n");
    output.push_str(&format!("- **Total Equations:** {}\n", ALL_EQUATIONS.len()));
    output.push_str(&format!("- **Categories:** {}\n", Equation::all_categories().len()));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_equation_has_metadata() {
        for eq in ALL_EQUATIONS {
            let meta = eq.metadata();
            assert!(!meta.name.is_empty(), "Equation {:?} missing name", eq);
            assert!(!meta.formula_plain.is_empty(), "Equation {:?} missing formula", eq);
            assert!(!meta.source_module.is_empty(), "Equation {:?} missing source_module", eq);
            assert!(!meta.source_function.is_empty(), "Equation {:?} missing source_function", eq);
        }
    }

    #[test]
    fn test_categories_cover_registry() {
        let total: usize = Equation::all_categories()
            .into_iter()
            .map(|c| Equation::in_category(c).len())
            .sum();
        assert_eq!(total, ALL_EQUATIONS.len());
    }

    #[test]
    fn test_trace_recording() {
        let mut trace = DerivationTrace::new();
        trace
            .record(Equation::SpectralShapeB1, "X axis, strength", 2.75)
            .input("T", 0.3)
            .branch("T0 <= T < Ts");
        trace.record(Equation::LongPeriodFactorN, "X axis, strength", 1.0);
        trace.record(Equation::SpectralShapeB1, "Y axis, strength", 2.75);

        assert_eq!(trace.entries().len(), 3);
        assert_eq!(
            trace.unique_equations(),
            vec![Equation::SpectralShapeB1, Equation::LongPeriodFactorN]
        );
        assert_eq!(trace.by_equation()[&Equation::SpectralShapeB1].len(), 2);
        assert_eq!(trace.for_context("X axis, strength").count(), 2);
        assert_eq!(trace.entries()[0].branch.as_deref(), Some("T0 <= T < Ts"));
    }

    #[test]
    fn test_trace_render() {
        let mut trace = DerivationTrace::new();
        trace
            .record(Equation::MinimumCoefficient, "Building", 0.0588)
            .input("A", 0.35)
            .input("I", 1.4);
        let text = trace.render();
        assert!(text.contains("Minimum Base Shear Coefficient (Building): 0.0588"));
        assert!(text.contains("A=0.3500"));
    }

    #[test]
    fn test_generate_equations_markdown() {
        let markdown = generate_equations_markdown();
        assert!(markdown.contains("# Seismic Equations Reference"));
        assert!(markdown.contains("Auto-generated from source code"));
        assert!(markdown.contains("## Design Spectrum"));
        assert!(markdown.contains("### Reflection Factor B"));
        assert!(markdown.contains("`C = A * B * I / Ru`"));
        assert!(markdown.contains("Standard 2800 (4th ed.)"));
        assert!(markdown.contains("**Total Equations:** 12"));
        assert!(markdown.contains("**Categories:** 6"));
    }
}
