//! DTOs for decoding line-item listings.
//!
//! `quantity` is coerced here: integral numbers and numeric strings become an
//! integer, anything else becomes `None` so the domain can skip the item.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::LineItem;

#[derive(Debug, Deserialize)]
pub(super) struct LineItemListDto {
    #[serde(default)]
    pub(super) data: Vec<LineItemDto>,
    #[serde(default)]
    pub(super) has_more: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct LineItemDto {
    pub(super) description: Option<String>,
    #[serde(default)]
    pub(super) quantity: Value,
    #[serde(default)]
    pub(super) price: Value,
}

impl LineItemDto {
    pub(super) fn into_line_item(self) -> LineItem {
        LineItem {
            description: self.description,
            quantity: coerce_quantity(&self.quantity),
            price_id: price_id(&self.price),
        }
    }
}

fn coerce_quantity(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|value| value.is_finite() && value.fract() == 0.0)
                .map(|value| value as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// The price is either expanded (`{"id": "price_1", ...}`) or a bare id.
fn price_id(raw: &Value) -> Option<String> {
    match raw {
        Value::String(id) => Some(id.clone()),
        Value::Object(price) => price.get("id").and_then(Value::as_str).map(str::to_owned),
        _ => None,
    }
}
