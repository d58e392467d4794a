//! # Code Tables
//!
//! Read-only lookup data of the design standard:
//!
//! - **Structure systems**: keyed by (system type, lateral type); behavior,
//!   overstrength and amplification factors, height cap, empirical period
//!   constants, infill compatibility and the code category id.
//! - **Soil types**: keyed by soil class; characteristic periods T0/Ts and
//!   the spectral amplitudes S/S0 per design acceleration.
//!
//! The standard tables are compiled from `data/*.toml` at build time and
//! exposed through [`CodeTables::standard`]. The engine never reaches for
//! them implicitly: every computation takes a `&CodeTables`, so callers can
//! swap in their own tables (see [`CodeTables::from_json_str`]).
//!
//! ## Example
//!
//! ```rust
//! use seismic_core::code_tables::CodeTables;
//!
//! let tables = CodeTables::standard();
//! let entry = tables.system("Moment frame", "Special steel moment frame").unwrap();
//! assert_eq!(entry.ru, 7.5);
//! assert!(entry.max_height.is_none());
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{SeismicError, SeismicResult};

#[allow(dead_code)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/code_tables.rs"));
}

use generated::{soil_data, structure_system_data};

/// Tolerance for matching acceleration ratios against table keys
const ACCELERATION_TOLERANCE: f64 = 1e-9;

static STANDARD_TABLES: Lazy<CodeTables> = Lazy::new(CodeTables::from_generated);

/// One row of the structure-system table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemEntry {
    /// System family (e.g., "Moment frame", "Dual")
    pub system_type: String,
    /// Lateral force resisting system within the family
    pub lateral_type: String,
    /// Behavior factor Ru
    pub ru: f64,
    /// Overstrength factor Ω0
    pub phi0: f64,
    /// Displacement amplification factor Cd
    pub cd: f64,
    /// Height cap in meters; `None` when the code sets no cap
    #[serde(default)]
    pub max_height: Option<f64>,
    /// Empirical period coefficient α
    pub alpha: f64,
    /// Empirical period exponent
    pub pow: f64,
    /// Moment-frame type system that may carry masonry infill
    #[serde(default)]
    pub is_infill: bool,
    /// Code category id consumed by the eligibility rules
    pub category_id: u32,
}

/// Spectral amplitudes of a soil class at one design acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralShape {
    /// Design acceleration ratio this row applies to
    pub acceleration: f64,
    /// Spectral amplitude parameter S
    pub s: f64,
    /// Spectral amplitude at T = 0, S0
    pub s0: f64,
}

/// One row of the soil table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilEntry {
    /// Soil class label (e.g., "I", "III")
    pub soil_type: String,
    /// Lower characteristic period (s)
    pub t0: f64,
    /// Upper characteristic period (s)
    pub ts: f64,
    /// Spectral amplitudes per design acceleration
    pub spectral: Vec<SpectralShape>,
}

impl SoilEntry {
    /// Spectral amplitudes for a design acceleration
    pub fn spectral_shape(&self, acceleration: f64) -> SeismicResult<&SpectralShape> {
        self.spectral
            .iter()
            .find(|sp| (sp.acceleration - acceleration).abs() < ACCELERATION_TOLERANCE)
            .ok_or_else(|| SeismicError::SoilAccelerationNotFound {
                soil_type: self.soil_type.clone(),
                acceleration,
            })
    }
}

/// Structure-system and soil tables.
///
/// Deserializing runs [`CodeTables::validate`], so a `CodeTables` value is
/// always valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCodeTables")]
pub struct CodeTables {
    systems: Vec<SystemEntry>,
    soils: Vec<SoilEntry>,
    /// Index of the stiffest soil class in `soils`
    #[serde(default)]
    stiffest_soil: usize,
}

/// Unvalidated wire form of [`CodeTables`].
#[derive(Deserialize)]
struct RawCodeTables {
    systems: Vec<SystemEntry>,
    soils: Vec<SoilEntry>,
    #[serde(default)]
    stiffest_soil: usize,
}

impl TryFrom<RawCodeTables> for CodeTables {
    type Error = SeismicError;

    fn try_from(raw: RawCodeTables) -> SeismicResult<Self> {
        let tables = CodeTables {
            systems: raw.systems,
            soils: raw.soils,
            stiffest_soil: raw.stiffest_soil,
        };
        tables.validate()?;
        Ok(tables)
    }
}

impl CodeTables {
    /// Build tables from rows, validating them.
    ///
    /// The first soil row is taken as the stiffest class.
    pub fn new(systems: Vec<SystemEntry>, soils: Vec<SoilEntry>) -> SeismicResult<Self> {
        let tables = CodeTables {
            systems,
            soils,
            stiffest_soil: 0,
        };
        tables.validate()?;
        Ok(tables)
    }

    /// The standard tables shipped with the crate.
    pub fn standard() -> &'static CodeTables {
        &STANDARD_TABLES
    }

    /// Load tables from JSON, validating them.
    ///
    /// ```rust
    /// use seismic_core::code_tables::CodeTables;
    ///
    /// let json = serde_json::to_string(CodeTables::standard()).unwrap();
    /// let tables = CodeTables::from_json_str(&json).unwrap();
    /// assert_eq!(&tables, CodeTables::standard());
    /// ```
    pub fn from_json_str(json: &str) -> SeismicResult<Self> {
        let raw: RawCodeTables = serde_json::from_str(json)?;
        CodeTables::try_from(raw)
    }

    fn from_generated() -> Self {
        let systems = structure_system_data::SYSTEMS
            .iter()
            .map(|row| SystemEntry {
                system_type: row.system_type.to_string(),
                lateral_type: row.lateral_type.to_string(),
                ru: row.ru,
                phi0: row.phi0,
                cd: row.cd,
                max_height: row.max_height,
                alpha: row.alpha,
                pow: row.pow,
                is_infill: row.infill,
                category_id: row.category,
            })
            .collect();

        let soils = soil_data::SOILS
            .iter()
            .map(|row| SoilEntry {
                soil_type: row.name.to_string(),
                t0: row.t0,
                ts: row.ts,
                spectral: row
                    .spectral
                    .iter()
                    .map(|sp| SpectralShape {
                        acceleration: sp.acceleration,
                        s: sp.s,
                        s0: sp.s0,
                    })
                    .collect(),
            })
            .collect();

        CodeTables {
            systems,
            soils,
            stiffest_soil: 0,
        }
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> SeismicResult<()> {
        if self.systems.is_empty() {
            return Err(SeismicError::table_error("structure system table is empty"));
        }
        if self.soils.is_empty() {
            return Err(SeismicError::table_error("soil table is empty"));
        }
        if self.stiffest_soil >= self.soils.len() {
            return Err(SeismicError::table_error("stiffest soil index out of range"));
        }

        for (i, entry) in self.systems.iter().enumerate() {
            let key = format!("{} / {}", entry.system_type, entry.lateral_type);
            if self.systems[..i]
                .iter()
                .any(|e| e.system_type == entry.system_type && e.lateral_type == entry.lateral_type)
            {
                return Err(SeismicError::table_error(format!("duplicate system entry '{}'", key)));
            }
            if entry.ru <= 0.0 || entry.phi0 <= 0.0 || entry.cd <= 0.0 {
                return Err(SeismicError::table_error(format!(
                    "'{}': Ru, phi0 and Cd must be positive",
                    key
                )));
            }
            if entry.alpha <= 0.0 || entry.pow <= 0.0 {
                return Err(SeismicError::table_error(format!(
                    "'{}': period constants must be positive",
                    key
                )));
            }
            if matches!(entry.max_height, Some(h) if h <= 0.0) {
                return Err(SeismicError::table_error(format!(
                    "'{}': height cap must be positive",
                    key
                )));
            }
        }

        for (i, soil) in self.soils.iter().enumerate() {
            if self.soils[..i].iter().any(|s| s.soil_type == soil.soil_type) {
                return Err(SeismicError::table_error(format!(
                    "duplicate soil type '{}'",
                    soil.soil_type
                )));
            }
            if !(soil.t0 > 0.0 && soil.t0 < soil.ts) {
                return Err(SeismicError::table_error(format!(
                    "soil '{}': expected 0 < T0 < Ts, got T0 = {}, Ts = {}",
                    soil.soil_type, soil.t0, soil.ts
                )));
            }
            if soil.ts >= crate::equations::seismic::N_ASYMPTOTE_PERIOD {
                return Err(SeismicError::table_error(format!(
                    "soil '{}': Ts must be below {} s",
                    soil.soil_type,
                    crate::equations::seismic::N_ASYMPTOTE_PERIOD
                )));
            }
            if soil.spectral.iter().any(|sp| sp.s <= 0.0 || sp.s0 <= 0.0) {
                return Err(SeismicError::table_error(format!(
                    "soil '{}': S and S0 must be positive",
                    soil.soil_type
                )));
            }
        }

        Ok(())
    }

    /// Look up a structure system by its (system type, lateral type) key.
    pub fn system(&self, system_type: &str, lateral_type: &str) -> SeismicResult<&SystemEntry> {
        self.systems
            .iter()
            .find(|e| e.system_type == system_type && e.lateral_type == lateral_type)
            .ok_or_else(|| SeismicError::system_not_found(system_type, lateral_type))
    }

    /// Look up a soil class.
    pub fn soil(&self, soil_type: &str) -> SeismicResult<&SoilEntry> {
        self.soils
            .iter()
            .find(|s| s.soil_type == soil_type)
            .ok_or_else(|| SeismicError::unknown_soil_type(soil_type))
    }

    /// True when `soil_type` is the stiffest class of the table
    pub fn is_stiffest_soil(&self, soil_type: &str) -> bool {
        self.soils
            .get(self.stiffest_soil)
            .is_some_and(|s| s.soil_type == soil_type)
    }

    /// All system rows
    pub fn systems(&self) -> &[SystemEntry] {
        &self.systems
    }

    /// Distinct system types in table order
    pub fn system_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for entry in &self.systems {
            if !types.contains(&entry.system_type.as_str()) {
                types.push(&entry.system_type);
            }
        }
        types
    }

    /// Lateral types available for a system type, in table order
    pub fn lateral_types(&self, system_type: &str) -> Vec<&str> {
        self.systems
            .iter()
            .filter(|e| e.system_type == system_type)
            .map(|e| e.lateral_type.as_str())
            .collect()
    }

    /// Soil classes in table order
    pub fn soil_types(&self) -> Vec<&str> {
        self.soils.iter().map(|s| s.soil_type.as_str()).collect()
    }
}
