//! # Structure System
//!
//! One axis's lateral force resisting system, resolved against the
//! structure-system table.
//!
//! ## Example
//!
//! ```rust
//! use seismic_core::code_factors::Axis;
//! use seismic_core::code_tables::CodeTables;
//! use seismic_core::structure_system::{StructureSystem, SystemSelection};
//!
//! let selection = SystemSelection::new("Moment frame", "Special steel moment frame");
//! let system = StructureSystem::resolve(&selection, Axis::X, CodeTables::standard()).unwrap();
//! assert_eq!(system.ru, 7.5);
//! ```

use serde::{Deserialize, Serialize};

use crate::code_factors::Axis;
use crate::code_tables::CodeTables;
use crate::errors::SeismicResult;

/// A (system type, lateral type) key as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SystemSelection {
    pub system_type: String,
    pub lateral_type: String,
}

impl SystemSelection {
    pub fn new(system_type: impl Into<String>, lateral_type: impl Into<String>) -> Self {
        Self {
            system_type: system_type.into(),
            lateral_type: lateral_type.into(),
        }
    }
}

/// Resolved lateral system of one axis.
///
/// Equality is structural: two systems are equal when they share system
/// and lateral type, whichever axis they belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureSystem {
    pub system_type: String,
    pub lateral_type: String,
    pub axis: Axis,
    /// Behavior factor Ru
    pub ru: f64,
    /// Overstrength factor Ω0
    pub phi0: f64,
    /// Displacement amplification factor Cd
    pub cd: f64,
    /// Height cap (m), `None` when uncapped
    pub max_height: Option<f64>,
    /// Empirical period coefficient α
    pub alpha: f64,
    /// Empirical period exponent
    pub pow: f64,
    pub is_infill: bool,
    pub category_id: u32,
}

impl StructureSystem {
    /// Resolve a selection against the system table.
    ///
    /// Fails with `SystemNotFound` when the pair is absent.
    pub fn resolve(
        selection: &SystemSelection,
        axis: Axis,
        tables: &CodeTables,
    ) -> SeismicResult<Self> {
        let entry = tables.system(&selection.system_type, &selection.lateral_type)?;
        Ok(StructureSystem {
            system_type: entry.system_type.clone(),
            lateral_type: entry.lateral_type.clone(),
            axis,
            ru: entry.ru,
            phi0: entry.phi0,
            cd: entry.cd,
            max_height: entry.max_height,
            alpha: entry.alpha,
            pow: entry.pow,
            is_infill: entry.is_infill,
            category_id: entry.category_id,
        })
    }

    /// Label used in eligibility messages, e.g. "Special steel moment frame (Moment frame)"
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.lateral_type, self.system_type)
    }
}

impl PartialEq for StructureSystem {
    fn eq(&self, other: &Self) -> bool {
        self.system_type == other.system_type && self.lateral_type == other.lateral_type
    }
}

impl std::fmt::Display for StructureSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dual() -> SystemSelection {
        SystemSelection::new(
            "Dual",
            "Special reinforced concrete moment frame with special reinforced concrete shear walls",
        )
    }

    #[test]
    fn test_resolve_copies_table_fields() {
        let system = StructureSystem::resolve(&dual(), Axis::Y, CodeTables::standard()).unwrap();
        assert_eq!(system.axis, Axis::Y);
        assert_eq!(system.ru, 7.5);
        assert_eq!(system.alpha, 0.05);
        assert_eq!(system.pow, 0.75);
        assert_eq!(system.max_height, None);
        assert_eq!(system.category_id, 19);
    }

    #[test]
    fn test_equality_ignores_axis() {
        let tables = CodeTables::standard();
        let x = StructureSystem::resolve(&dual(), Axis::X, tables).unwrap();
        let y = StructureSystem::resolve(&dual(), Axis::Y, tables).unwrap();
        assert_eq!(x, y);

        let other = SystemSelection::new("Moment frame", "Special steel moment frame");
        let z = StructureSystem::resolve(&other, Axis::X, tables).unwrap();
        assert_ne!(x, z);
    }

    #[test]
    fn test_unknown_pair_fails() {
        let selection = SystemSelection::new("Dual", "Timber shear walls");
        let err =
            StructureSystem::resolve(&selection, Axis::X, CodeTables::standard()).unwrap_err();
        assert_eq!(err.error_code(), "SYSTEM_NOT_FOUND");
    }

    #[test]
    fn test_display_name() {
        let selection = SystemSelection::new("Moment frame", "Special steel moment frame");
        let system = StructureSystem::resolve(&selection, Axis::X, CodeTables::standard()).unwrap();
        assert_eq!(system.to_string(), "Special steel moment frame (Moment frame)");
    }
}
