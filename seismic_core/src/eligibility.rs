//! # Code Eligibility
//!
//! Whether the selected lateral systems are permitted for the building's
//! height, story count, importance and seismic risk.
//!
//! The rules are a declarative list evaluated in a fixed order: for each
//! axis (X, then Y) every rule is checked in [`EligibilityRule::ORDERED`]
//! order and the first violation is reported. A failure is a design
//! outcome, not an error: it carries the rule, a title, a message naming
//! the lateral system and the offending axis.

use serde::{Deserialize, Serialize};

use crate::code_factors::{Axis, ImportanceCategory, RiskLevel};
use crate::structure_system::StructureSystem;

/// Ordinary systems that are restricted by importance, seismicity and height
pub const RESTRICTED_CATEGORIES: &[u32] = &[2, 3, 10, 13, 16];

/// Systems permitted for very important buildings in very-high-risk zones
pub const SPECIAL_CATEGORIES: &[u32] = &[1, 5, 6, 7, 9, 11, 14, 17, 18, 19];

/// Systems permitted for tall or many-story buildings
pub const TALL_APPROVED_CATEGORIES: &[u32] = &[1, 5, 6, 7, 9, 11, 14, 17, 18, 19, 20, 21];

/// Height above which restricted systems are barred in low-seismicity zones (m)
pub const RESTRICTED_HEIGHT_LIMIT: f64 = 15.0;

/// Height above which a building counts as tall (m)
pub const TALL_HEIGHT_LIMIT: f64 = 50.0;

/// Story count above which a building counts as tall
pub const TALL_STORY_LIMIT: u32 = 15;

/// Building-level facts the rules are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EligibilityContext {
    pub height: f64,
    pub stories: u32,
    pub max_height: f64,
    pub importance: ImportanceCategory,
    pub risk_level: RiskLevel,
}

/// A single eligibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EligibilityRule {
    /// Height exceeds the governing height cap
    HeightLimit,
    /// Restricted system in an important or very important building
    RestrictedImportance,
    /// Restricted system, ordinary importance, high or very high risk
    RestrictedHighSeismicity,
    /// Restricted system, ordinary importance, low or medium risk, above 15 m
    RestrictedHeight,
    /// Very high risk and very high importance need a special system
    SpecialSystemRequired,
    /// Tall or many-story building without an approved system
    TallBuilding,
}

impl EligibilityRule {
    /// Evaluation order
    pub const ORDERED: [EligibilityRule; 6] = [
        EligibilityRule::HeightLimit,
        EligibilityRule::RestrictedImportance,
        EligibilityRule::RestrictedHighSeismicity,
        EligibilityRule::RestrictedHeight,
        EligibilityRule::SpecialSystemRequired,
        EligibilityRule::TallBuilding,
    ];

    /// True when `system` breaks this rule
    pub fn is_violated(&self, ctx: &EligibilityContext, system: &StructureSystem) -> bool {
        let id = system.category_id;
        let restricted = RESTRICTED_CATEGORIES.contains(&id);
        let baseline = ctx.importance == ImportanceCategory::Medium;
        match self {
            EligibilityRule::HeightLimit => ctx.height > ctx.max_height,
            EligibilityRule::RestrictedImportance => {
                restricted && ctx.importance.factor() > ImportanceCategory::BASELINE
            }
            EligibilityRule::RestrictedHighSeismicity => {
                restricted && baseline && ctx.risk_level.is_upper_band()
            }
            EligibilityRule::RestrictedHeight => {
                restricted
                    && baseline
                    && ctx.risk_level.is_lower_band()
                    && ctx.height > RESTRICTED_HEIGHT_LIMIT
            }
            EligibilityRule::SpecialSystemRequired => {
                ctx.risk_level == RiskLevel::VeryHigh
                    && ctx.importance == ImportanceCategory::VeryHigh
                    && !SPECIAL_CATEGORIES.contains(&id)
            }
            EligibilityRule::TallBuilding => {
                (ctx.height > TALL_HEIGHT_LIMIT || ctx.stories > TALL_STORY_LIMIT)
                    && !TALL_APPROVED_CATEGORIES.contains(&id)
            }
        }
    }

    /// Short title for dialogs and reports
    pub fn title(&self) -> &'static str {
        match self {
            EligibilityRule::HeightLimit => "Height limit exceeded",
            EligibilityRule::RestrictedImportance
            | EligibilityRule::RestrictedHighSeismicity
            | EligibilityRule::RestrictedHeight => "System not permitted",
            EligibilityRule::SpecialSystemRequired => "Special system required",
            EligibilityRule::TallBuilding => "Tall building system required",
        }
    }

    /// User-facing explanation naming the lateral system
    pub fn message(&self, ctx: &EligibilityContext, system: &StructureSystem) -> String {
        match self {
            EligibilityRule::HeightLimit => format!(
                "Building height of {} m exceeds the maximum of {} m allowed for the selected systems; {} governs on this axis.",
                ctx.height, ctx.max_height, system
            ),
            EligibilityRule::RestrictedImportance => format!(
                "{} may not be used in buildings of {} importance in any seismic zone.",
                system,
                ctx.importance.display_name()
            ),
            EligibilityRule::RestrictedHighSeismicity => format!(
                "{} may not be used in {} risk zones.",
                system,
                ctx.risk_level.display_name().to_lowercase()
            ),
            EligibilityRule::RestrictedHeight => format!(
                "{} is limited to {} m in low and medium risk zones; building height is {} m.",
                system, RESTRICTED_HEIGHT_LIMIT, ctx.height
            ),
            EligibilityRule::SpecialSystemRequired => format!(
                "Only special systems are permitted for very important buildings in very high risk zones; {} is not one of them.",
                system
            ),
            EligibilityRule::TallBuilding => format!(
                "Buildings taller than {} m or with more than {} stories require an approved ductile system; {} is not approved.",
                TALL_HEIGHT_LIMIT, TALL_STORY_LIMIT, system
            ),
        }
    }
}

/// A failed eligibility check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityFailure {
    pub rule: EligibilityRule,
    pub title: String,
    pub message: String,
    pub axis: Axis,
}

/// Outcome of the eligibility check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Eligibility {
    Eligible,
    Ineligible(EligibilityFailure),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    pub fn failure(&self) -> Option<&EligibilityFailure> {
        match self {
            Eligibility::Eligible => None,
            Eligibility::Ineligible(failure) => Some(failure),
        }
    }
}

/// First rule `system` violates, if any
pub fn first_violation(
    ctx: &EligibilityContext,
    system: &StructureSystem,
) -> Option<EligibilityRule> {
    EligibilityRule::ORDERED
        .iter()
        .copied()
        .find(|rule| rule.is_violated(ctx, system))
}

/// Check both axes, X first, stopping at the first violation.
pub fn check(
    ctx: &EligibilityContext,
    x_system: &StructureSystem,
    y_system: &StructureSystem,
) -> Eligibility {
    for system in [x_system, y_system] {
        if let Some(rule) = first_violation(ctx, system) {
            return Eligibility::Ineligible(EligibilityFailure {
                rule,
                title: rule.title().to_string(),
                message: rule.message(ctx, system),
                axis: system.axis,
            });
        }
    }
    Eligibility::Eligible
}
