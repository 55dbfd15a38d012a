use serde::{Deserialize, Serialize};

/// Severity of a declarative constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintLevel {
    Rule,
    Warning,
}

impl ConstraintLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintLevel::Rule => "Rule",
            ConstraintLevel::Warning => "Warning",
        }
    }
}

/// Declarative invariant attached to a type or one of its fields.
///
/// The expression is opaque here: it is exposed to profile validation
/// tooling and never evaluated by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Constraint {
    pub id: &'static str,
    pub level: ConstraintLevel,
    /// `(base)` for the type itself, otherwise a path below it
    pub location: &'static str,
    pub description: &'static str,
    pub expression: &'static str,
    pub source: &'static str,
}

impl Constraint {
    /// Location value used for constraints on the type as a whole
    pub const BASE_LOCATION: &'static str = "(base)";

    pub const fn rule(
        id: &'static str,
        location: &'static str,
        description: &'static str,
        expression: &'static str,
        source: &'static str,
    ) -> Self {
        Self {
            id,
            level: ConstraintLevel::Rule,
            location,
            description,
            expression,
            source,
        }
    }

    pub const fn warning(
        id: &'static str,
        location: &'static str,
        description: &'static str,
        expression: &'static str,
        source: &'static str,
    ) -> Self {
        Self {
            id,
            level: ConstraintLevel::Warning,
            location,
            description,
            expression,
            source,
        }
    }

    pub fn is_base(&self) -> bool {
        self.location == Self::BASE_LOCATION
    }
}
