//! Line items and their manufacturing projection.

use serde::{Deserialize, Serialize};

/// Special-handling tiers for a line item. Each tier adds build time on top
/// of the base per-unit contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlingClass {
    /// Requires extra care during fabrication (glass inlays, veneers).
    Standard,
    /// Requires dedicated fixtures or curing time.
    Delicate,
}

/// Physical dimensions of a line item, in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in centimeters.
    pub width_cm: f64,
    /// Height in centimeters.
    pub height_cm: f64,
    /// Depth in centimeters.
    pub depth_cm: f64,
}

/// A priced sales line item as it appears on a quote or order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteItem {
    /// Product name.
    pub name: String,
    /// Free-form product description.
    #[serde(default)]
    pub description: Option<String>,
    /// Product category (cabinet, counter, fixture).
    #[serde(default)]
    pub category: Option<String>,
    /// Primary material.
    #[serde(default)]
    pub material: Option<String>,
    /// Finish color.
    #[serde(default)]
    pub color: Option<String>,
    /// Physical dimensions, when known.
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    /// Quantity ordered.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Price per unit.
    pub unit_price: f64,
    /// Line subtotal (quantity x unit price, after any line discount).
    pub subtotal: f64,
    /// Special-handling tier, if any.
    #[serde(default)]
    pub handling: Option<HandlingClass>,
    /// Whether the item exceeds standard bench dimensions.
    #[serde(default)]
    pub oversize: bool,
}

fn default_quantity() -> u32 {
    1
}

/// The manufacturing projection of a line item. Pricing detail is stripped:
/// the shop floor needs the physical description, not the money.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildItem {
    /// Product name.
    pub name: String,
    /// Free-form product description.
    #[serde(default)]
    pub description: Option<String>,
    /// Product category.
    #[serde(default)]
    pub category: Option<String>,
    /// Primary material.
    #[serde(default)]
    pub material: Option<String>,
    /// Finish color.
    #[serde(default)]
    pub color: Option<String>,
    /// Physical dimensions, when known.
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    /// Quantity to build.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Special-handling tier, if any.
    #[serde(default)]
    pub handling: Option<HandlingClass>,
    /// Whether the item exceeds standard bench dimensions.
    #[serde(default)]
    pub oversize: bool,
}

impl From<&QuoteItem> for BuildItem {
    fn from(item: &QuoteItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            material: item.material.clone(),
            color: item.color.clone(),
            dimensions: item.dimensions,
            quantity: item.quantity,
            handling: item.handling,
            oversize: item.oversize,
        }
    }
}
