//! # Seismic Design Equations
//!
//! This module contains every formula the engine applies. Having equations
//! in one place enables:
//! - Easy verification against the design standard
//! - Consistent implementation across the strength and drift tracks
//! - A registry that reports and audits can cite
//!
//! ## Modules
//!
//! - [`seismic`] - Pure formulas (period, B1, N, k, C)
//! - [`registry`] - Equation metadata and the derivation trace
//!
//! ## References
//!
//! - Standard 2800, 4th Edition: Iranian Code of Practice for Seismic
//!   Resistant Design of Buildings

pub mod registry;
pub mod seismic;

pub use seismic::{
    b1_branch,
    b1_on_branch,
    base_shear_coefficient,
    bounded_period,
    distribution_exponent_k,
    empirical_period,
    long_period_factor_n,
    minimum_coefficient,
    n_branch,
    n_curve_parameters,
    spectral_shape_b1,
    B1Branch,
    NBranch,
};

pub use registry::{
    CodeReference,
    DerivationTrace,
    Equation,
    EquationCategory,
    EquationMetadata,
    TraceEntry,
    TraceValue,
    Variable,
    ALL_EQUATIONS,
    generate_equations_markdown,
};
