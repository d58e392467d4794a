//! # seismic_core - Equivalent Static Seismic Design Engine
//!
//! `seismic_core` computes the equivalent-static design parameters of a
//! building: empirical and design periods, the building reflection factor,
//! the vertical distribution exponent and the base shear coefficient, for
//! the strength level and the drift level of two orthogonal axes.
//!
//! ## Design Philosophy
//!
//! - **Immutable**: A [`Building`] is computed once from its inputs and never updated
//! - **Table-Driven**: Code tables are data, compiled in from `data/*.toml` or loaded from JSON
//! - **JSON-First**: Inputs and results implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Traceable**: Every computed building carries the ordered list of equations applied
//!
//! ## Quick Start
//!
//! ```rust
//! use seismic_core::{Building, BuildingInput, CodeTables, SystemSelection};
//! use seismic_core::code_factors::{Axis, DesignLevel, PeriodMode, RiskLevel};
//!
//! let system = SystemSelection::new("Moment frame", "Special steel moment frame");
//! let input = BuildingInput {
//!     risk_level: RiskLevel::VeryHigh,
//!     importance_factor: 1.0,
//!     soil_type: "II".to_string(),
//!     stories: 5,
//!     height: 16.0,
//!     infill: false,
//!     x_system: system.clone(),
//!     y_system: system,
//!     city: "Tehran".to_string(),
//!     tx: 0.9,
//!     ty: 0.9,
//!     period_mode: PeriodMode::Analytical,
//! };
//!
//! let building = Building::new(input, CodeTables::standard()).unwrap();
//! assert!(building.is_eligible());
//! let c = building.coefficient(DesignLevel::Strength, Axis::X).unwrap();
//! assert!(c >= building.c_min);
//! ```
//!
//! ## Modules
//!
//! - [`building`] - Building aggregate and coefficient outcomes
//! - [`code_factors`] - Risk level, importance category, axis and level enums
//! - [`code_tables`] - Structure-system and soil tables
//! - [`eligibility`] - Ordered system eligibility rules
//! - [`equations`] - Code formulas and the equation registry
//! - [`errors`] - Structured error types
//! - [`reflection`] - Reflection factor and sampled curves
//! - [`soil`] - Resolved soil parameters
//! - [`structure_system`] - Resolved lateral systems

pub mod building;
pub mod code_factors;
pub mod code_tables;
pub mod eligibility;
pub mod equations;
pub mod errors;
pub mod reflection;
pub mod soil;
pub mod structure_system;

// Re-export commonly used types at crate root for convenience
pub use building::{AxisCoefficient, AxisResult, Building, BuildingInput, CoefficientOutcome};
pub use code_tables::CodeTables;
pub use eligibility::{Eligibility, EligibilityFailure, EligibilityRule};
pub use errors::{SeismicError, SeismicResult};
pub use reflection::{ReflectionCurve, ReflectionFactor};
pub use soil::SoilProperties;
pub use structure_system::{StructureSystem, SystemSelection};
