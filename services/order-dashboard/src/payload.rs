//! Wire payload decoding and normalisation
//!
//! The order API is loosely typed: nested objects may be missing, numbers may
//! arrive as strings, and ids may be numeric. Everything is resolved here,
//! once, into strictly typed [`Order`] values. Only a body that is not a
//! `{ "data": [...] }` envelope is an error; bad fields fall back to defaults.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::order::{CustomerDetails, Order, Pricing, PurchaseMethod, PurchasedItem};

/// Response envelope of `GET /orders`
#[derive(Debug, Deserialize)]
pub struct OrdersEnvelope {
    pub data: Vec<Value>,
}

/// Decode a response body into normalised orders.
///
/// An order without `_id` is keyed by its order code, or failing that by
/// its position in the response (`order-1`, `order-2`, ...), so that every
/// order in the collection can be looked up and selected on its own.
pub fn decode_orders(body: &str, placeholder_image_url: &str) -> crate::Result<Vec<Order>> {
    let envelope: OrdersEnvelope = serde_json::from_str(body)?;
    Ok(envelope
        .data
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let mut order = normalize_order(raw, placeholder_image_url);
            if order.id.is_empty() {
                order.id = match order.order_code.as_deref() {
                    Some(code) if !code.is_empty() => code.to_string(),
                    _ => format!("order-{}", index + 1),
                };
                tracing::debug!("Order without _id keyed as '{}'", order.id);
            }
            order
        })
        .collect())
}

/// Map one loosely-typed order object to an [`Order`]
pub fn normalize_order(raw: &Value, placeholder_image_url: &str) -> Order {
    let pricing = raw.get("pricing");
    let items = raw
        .get("selectedShoes")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| normalize_item(item, placeholder_image_url))
                .collect()
        })
        .unwrap_or_default();

    Order {
        id: text(raw.get("_id")).unwrap_or_default(),
        order_code: text(raw.get("orderId")).filter(|code| !code.is_empty()),
        customer: normalize_customer(raw.get("customerDetails")),
        phone: text(raw.get("phone")).unwrap_or_default(),
        purchase_method: PurchaseMethod::parse(
            &text(raw.get("purchaseMethod")).unwrap_or_default(),
        ),
        status: text(raw.get("status")),
        created_at: timestamp(raw.get("createdAt")),
        pricing: Pricing {
            subtotal: amount(pricing.and_then(|p| p.get("subtotal"))),
            delivery_fee: amount(pricing.and_then(|p| p.get("deliveryFee"))),
            total: amount(pricing.and_then(|p| p.get("total"))),
        },
        items,
    }
}

fn normalize_customer(raw: Option<&Value>) -> CustomerDetails {
    let defaults = CustomerDetails::default();
    CustomerDetails {
        name: text(raw.and_then(|c| c.get("name")))
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(defaults.name),
        address: text(raw.and_then(|c| c.get("address"))).filter(|a| !a.trim().is_empty()),
    }
}

fn normalize_item(raw: &Value, placeholder_image_url: &str) -> PurchasedItem {
    let image = text(raw.get("imageUrl")).filter(|url| !url.trim().is_empty());
    PurchasedItem {
        name: text(raw.get("name")).unwrap_or_default(),
        code: text(raw.get("code")).unwrap_or_default(),
        price: amount(raw.get("price")),
        size: text(raw.get("size")).unwrap_or_default(),
        image_is_placeholder: image.is_none(),
        image_url: image.unwrap_or_else(|| placeholder_image_url.to_string()),
    }
}

/// Strings pass through, numbers and booleans are rendered, anything else is absent
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Non-negative decimal amount; missing, unparsable and negative values are 0
fn amount(value: Option<&Value>) -> Decimal {
    let parsed = match value {
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(s.trim()),
        _ => None,
    };
    match parsed {
        Some(d) if d.is_sign_negative() => {
            tracing::debug!("Negative amount {} replaced with 0", d);
            Decimal::ZERO
        }
        Some(d) => d,
        None => Decimal::ZERO,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .ok(),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}
