//! Order data: the initial stock and the recipe table for one run.
//!
//! Input arrives as a loosely-typed JSON document. [`OrderData::from_value`] is the
//! only place where its shape is checked, so everything downstream works with
//! typed maps.
//!
//! Two shapes are accepted:
//!
//! ```json
//! { "total_items_quantity": { "hot_water": 500 }, "beverages": { "tea": { "hot_water": 200 } } }
//! ```
//!
//! and the coffee-machine envelope, which also names the number of outlets:
//!
//! ```json
//! { "machine": { "outlets": { "count_n": 3 }, "total_items_quantity": { ... }, "beverages": { ... } } }
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Semaphore;

use crate::lifecycle::DispatchError;

/// Units of an ingredient. Unsigned, so a negative stock level is unrepresentable.
pub type Quantity = u32;

/// Required quantity per ingredient for one beverage, in declaration order.
pub type Recipe = IndexMap<String, Quantity>;

/// Dispensing outlets available on the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Outlets {
    pub count_n: usize,
}

/// Validated input for one order-processing run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderData {
    /// Initial stock per ingredient.
    #[serde(alias = "totalItemsQuantity")]
    pub total_items_quantity: IndexMap<String, Quantity>,

    /// Recipe per beverage. One worker is started for each entry.
    pub beverages: IndexMap<String, Recipe>,

    /// Optional cap on how many beverages are prepared at the same time.
    #[serde(default)]
    pub outlets: Option<Outlets>,
}

impl OrderData {
    /// Creates order data from typed maps, without outlet information.
    pub fn new(
        total_items_quantity: IndexMap<String, Quantity>,
        beverages: IndexMap<String, Recipe>,
    ) -> Self {
        Self {
            total_items_quantity,
            beverages,
            outlets: None,
        }
    }

    /// Decodes and validates order data from a JSON value.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::InvalidInput`] when the input is absent, `null`, `{}` or `""`.
    /// - [`DispatchError::MalformedInput`] when the input is not an object, does not
    ///   have the expected fields, or carries invalid quantities.
    pub fn from_value(input: Option<&Value>) -> Result<Self, DispatchError> {
        let value = match input {
            None | Some(Value::Null) => return Err(blank()),
            Some(value) => value,
        };

        let data = match value {
            Value::Object(map) if map.is_empty() => return Err(blank()),
            Value::String(text) if text.is_empty() => return Err(blank()),
            Value::Object(map) => match map.get("machine") {
                Some(machine) => OrderData::deserialize(machine)?,
                None => OrderData::deserialize(value)?,
            },
            other => {
                return Err(DispatchError::MalformedInput(format!(
                    "expected an object, found {}",
                    json_kind(other)
                )))
            }
        };

        data.validate()?;
        Ok(data)
    }

    /// Parses JSON text and decodes it with [`OrderData::from_value`].
    ///
    /// Blank text is treated like absent input.
    ///
    /// # Errors
    ///
    /// Same as [`OrderData::from_value`]; unparseable text is `MalformedInput`.
    pub fn from_json(text: &str) -> Result<Self, DispatchError> {
        if text.trim().is_empty() {
            return Err(blank());
        }
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(Some(&value))
    }

    /// Checks the invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// [`DispatchError::MalformedInput`] for a zero required quantity, or an
    /// outlet count that is zero or above [`Semaphore::MAX_PERMITS`].
    pub fn validate(&self) -> Result<(), DispatchError> {
        for (beverage, recipe) in &self.beverages {
            if let Some((ingredient, _)) = recipe.iter().find(|(_, required)| **required == 0) {
                return Err(DispatchError::MalformedInput(format!(
                    "{beverage} requires zero units of {ingredient}"
                )));
            }
        }
        match self.outlets {
            Some(Outlets { count_n: 0 }) => Err(DispatchError::MalformedInput(
                "outlet count must be positive".to_string(),
            )),
            Some(Outlets { count_n }) if count_n > Semaphore::MAX_PERMITS => {
                Err(DispatchError::MalformedInput(format!(
                    "outlet count {count_n} exceeds {}",
                    Semaphore::MAX_PERMITS
                )))
            }
            _ => Ok(()),
        }
    }
}

fn blank() -> DispatchError {
    DispatchError::InvalidInput("input data is blank".to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
