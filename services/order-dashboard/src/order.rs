//! Order domain types
//!
//! Orders are produced once by [`crate::payload`] with every default already
//! resolved, so nothing downstream has to guard individual fields.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Status value that marks an order as fulfilled
pub const COMPLETED_STATUS: &str = "completed";

/// Name shown for orders whose customer details carry no name
pub const DEFAULT_CUSTOMER_NAME: &str = "Customer";

/// Number of item thumbnails shown on an order card
pub const PREVIEW_ITEMS: usize = 3;

/// Characters of the order code shown on cards and list rows
const DISPLAY_CODE_LEN: usize = 8;

/// Fulfilment channel of an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseMethod {
    HomeDelivery,
    StorePickup,
    /// Any other value sent by the server, kept verbatim (empty when absent)
    Other(String),
}

impl PurchaseMethod {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "HOME_DELIVERY" => PurchaseMethod::HomeDelivery,
            "STORE_PICKUP" => PurchaseMethod::StorePickup,
            other => PurchaseMethod::Other(other.to_string()),
        }
    }

    /// Wire value of the method
    pub fn as_str(&self) -> &str {
        match self {
            PurchaseMethod::HomeDelivery => "HOME_DELIVERY",
            PurchaseMethod::StorePickup => "STORE_PICKUP",
            PurchaseMethod::Other(raw) => raw,
        }
    }

    /// Human-facing label
    pub fn label(&self) -> &'static str {
        match self {
            PurchaseMethod::HomeDelivery => "Home Delivery",
            PurchaseMethod::StorePickup => "Store Pickup",
            PurchaseMethod::Other(_) => "Other",
        }
    }
}

impl fmt::Display for PurchaseMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PurchaseMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Customer details attached to an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerDetails {
    pub name: String,
    pub address: Option<String>,
}

impl Default for CustomerDetails {
    fn default() -> Self {
        Self {
            name: DEFAULT_CUSTOMER_NAME.to_string(),
            address: None,
        }
    }
}

/// Pricing breakdown; every amount is non-negative and 0 when the server sent none
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pricing {
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

/// One purchased product line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchasedItem {
    pub name: String,
    pub code: String,
    pub price: Decimal,
    pub size: String,
    /// Image to show; the placeholder when the server sent none
    pub image_url: String,
    pub image_is_placeholder: bool,
}

/// One customer purchase record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Server-assigned identifier; selection and lookups key on it
    pub id: String,
    /// Optional human-facing order code
    pub order_code: Option<String>,
    pub customer: CustomerDetails,
    pub phone: String,
    pub purchase_method: PurchaseMethod,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub pricing: Pricing,
    pub items: Vec<PurchasedItem>,
}

impl Order {
    /// Completed under the dual criterion: an explicit "completed" status or
    /// a store pickup.
    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some(COMPLETED_STATUS)
            || self.purchase_method == PurchaseMethod::StorePickup
    }

    /// Short code for cards and list rows: the order code when present,
    /// otherwise the server id, cut to eight characters.
    pub fn display_code(&self) -> String {
        let source = match self.order_code.as_deref() {
            Some(code) if !code.is_empty() => code,
            _ => &self.id,
        };
        source.chars().take(DISPLAY_CODE_LEN).collect()
    }

    /// Full reference for the detail view
    pub fn reference(&self) -> &str {
        match self.order_code.as_deref() {
            Some(code) if !code.is_empty() => code,
            _ => &self.id,
        }
    }

    /// Items shown as thumbnails on a card
    pub fn preview_items(&self) -> &[PurchasedItem] {
        &self.items[..self.items.len().min(PREVIEW_ITEMS)]
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Items beyond the preview, shown as "+N"
    pub fn hidden_item_count(&self) -> usize {
        self.items.len().saturating_sub(PREVIEW_ITEMS)
    }

    pub fn created_at_display(&self) -> Option<String> {
        self.created_at
            .map(|t| t.format("%a, %b %-d, %Y, %I:%M %p").to_string())
    }

    /// Condensed form used by the grid and list views
    pub fn card(&self, contact_link_base: &str) -> OrderCard {
        OrderCard {
            id: self.id.clone(),
            display_code: self.display_code(),
            customer_name: self.customer.name.clone(),
            phone: self.phone.clone(),
            purchase_method: self.purchase_method.clone(),
            method_label: self.purchase_method.label(),
            created_at: self.created_at_display(),
            total: format_money(self.pricing.total),
            preview_images: self
                .preview_items()
                .iter()
                .map(|item| item.image_url.clone())
                .collect(),
            item_count: self.item_count(),
            hidden_items: self.hidden_item_count(),
            contact_link: crate::contact::contact_link(contact_link_base, &self.phone),
        }
    }

    /// Everything the detail view shows for this order
    pub fn detail(&self, contact_link_base: &str) -> OrderDetail {
        OrderDetail {
            order: self.clone(),
            reference: self.reference().to_string(),
            method_label: self.purchase_method.label(),
            created_at_display: self.created_at_display(),
            subtotal_display: format_money(self.pricing.subtotal),
            delivery_fee_display: format_money(self.pricing.delivery_fee),
            total_display: format_money(self.pricing.total),
            contact_link: crate::contact::contact_link(contact_link_base, &self.phone),
        }
    }
}

/// Detail-view projection: the full order plus its rendered fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub reference: String,
    pub method_label: &'static str,
    pub created_at_display: Option<String>,
    pub subtotal_display: String,
    pub delivery_fee_display: String,
    pub total_display: String,
    pub contact_link: String,
}

/// Card/row projection of an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderCard {
    pub id: String,
    pub display_code: String,
    pub customer_name: String,
    pub phone: String,
    pub purchase_method: PurchaseMethod,
    pub method_label: &'static str,
    pub created_at: Option<String>,
    pub total: String,
    pub preview_images: Vec<String>,
    pub item_count: usize,
    pub hidden_items: usize,
    pub contact_link: String,
}

/// Format an amount with a dollar sign and two decimals
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}
