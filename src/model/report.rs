use serde::Serialize;
use std::collections::BTreeMap;

use super::{OrderOutcome, Quantity};

/// Everything a finished run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Outcomes in the order workers emitted them.
    pub outcomes: Vec<OrderOutcome>,

    /// Final quantity of every stocked ingredient.
    pub inventory: BTreeMap<String, Quantity>,

    /// Low-stock indicator at the end of the run.
    pub low_stock: BTreeMap<String, Quantity>,
}

impl RunReport {
    /// Names of the beverages that were prepared, in emission order.
    pub fn prepared(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_prepared())
            .map(OrderOutcome::beverage)
            .collect()
    }

    /// The outcome emitted for `beverage`, if it was ordered.
    pub fn outcome_for(&self, beverage: &str) -> Option<&OrderOutcome> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.beverage() == beverage)
    }
}
