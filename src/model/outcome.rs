use serde::Serialize;
use std::fmt;

use super::Quantity;

/// What happened to one beverage order. Every worker emits exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrderOutcome {
    /// All ingredients were reserved and consumed.
    Prepared { beverage: String },

    /// The recipe names an ingredient the inventory does not stock at all.
    Unavailable { beverage: String, ingredient: String },

    /// The ingredient is stocked, but below the required amount.
    Insufficient {
        beverage: String,
        ingredient: String,
        available: Quantity,
    },
}

impl OrderOutcome {
    /// The beverage this outcome belongs to.
    pub fn beverage(&self) -> &str {
        match self {
            OrderOutcome::Prepared { beverage }
            | OrderOutcome::Unavailable { beverage, .. }
            | OrderOutcome::Insufficient { beverage, .. } => beverage,
        }
    }

    pub fn is_prepared(&self) -> bool {
        matches!(self, OrderOutcome::Prepared { .. })
    }
}

impl fmt::Display for OrderOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderOutcome::Prepared { beverage } => write!(f, "{beverage} is prepared"),
            OrderOutcome::Unavailable {
                beverage,
                ingredient,
            } => write!(
                f,
                "{beverage} cannot be prepared because {ingredient} is not available"
            ),
            OrderOutcome::Insufficient {
                beverage,
                ingredient,
                available,
            } => write!(
                f,
                "{beverage} cannot be prepared because {ingredient} is not sufficient ({available} left)"
            ),
        }
    }
}
