//! # Soil Properties
//!
//! Spectral shape parameters of a site soil class at a design acceleration.

use serde::{Deserialize, Serialize};

use crate::code_tables::CodeTables;
use crate::errors::SeismicResult;

/// Resolved soil parameters: characteristic periods and spectral amplitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilProperties {
    pub soil_type: String,
    /// Design acceleration ratio the amplitudes were taken for
    pub acceleration: f64,
    /// Lower characteristic period (s)
    pub t0: f64,
    /// Upper characteristic period (s)
    pub ts: f64,
    /// Spectral amplitude parameter S
    pub s: f64,
    /// Spectral amplitude at T = 0
    pub s0: f64,
    /// Stiffest class of the table
    pub is_stiffest: bool,
}

impl SoilProperties {
    /// Resolve a soil class at a design acceleration.
    ///
    /// Fails when the soil class, or the (soil class, acceleration) pair,
    /// is absent from the table.
    ///
    /// ```rust
    /// use seismic_core::code_tables::CodeTables;
    /// use seismic_core::soil::SoilProperties;
    ///
    /// let soil = SoilProperties::resolve("III", 0.30, CodeTables::standard()).unwrap();
    /// assert_eq!((soil.t0, soil.ts, soil.s, soil.s0), (0.15, 0.7, 1.75, 1.1));
    /// ```
    pub fn resolve(soil_type: &str, acceleration: f64, tables: &CodeTables) -> SeismicResult<Self> {
        let entry = tables.soil(soil_type)?;
        let shape = entry.spectral_shape(acceleration)?;
        Ok(SoilProperties {
            soil_type: entry.soil_type.clone(),
            acceleration,
            t0: entry.t0,
            ts: entry.ts,
            s: shape.s,
            s0: shape.s0,
            is_stiffest: tables.is_stiffest_soil(soil_type),
        })
    }
}
