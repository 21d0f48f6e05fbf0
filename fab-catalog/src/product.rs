use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fab_shared::money::Cents;

use crate::options::ProductOptions;

/// Filament material tiers; drives material and per-color upcharges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MaterialCategory {
    Standard,
    Premium,
    Ultra,
}

impl MaterialCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialCategory::Standard => "standard",
            MaterialCategory::Premium => "premium",
            MaterialCategory::Ultra => "ultra",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Some(MaterialCategory::Standard),
            "premium" => Some(MaterialCategory::Premium),
            "ultra" => Some(MaterialCategory::Ultra),
            _ => None,
        }
    }
}

/// Physical print sizes offered per product.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PrintSize {
    Small,
    Medium,
    Large,
}

impl PrintSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrintSize::Small => "small",
            PrintSize::Medium => "medium",
            PrintSize::Large => "large",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "small" => Some(PrintSize::Small),
            "medium" => Some(PrintSize::Medium),
            "large" => Some(PrintSize::Large),
            _ => None,
        }
    }

    /// Fallback print duration when the product has none configured.
    pub fn default_minutes(&self) -> i64 {
        match self {
            PrintSize::Small => 60,
            PrintSize::Medium => 120,
            PrintSize::Large => 180,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub category: MaterialCategory,
    pub cost_per_gram: f64,
    pub upcharge: Cents,
    pub active: bool,
}

/// A selectable filament color. `category` comes from the linked material
/// and defaults to standard when the link is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Color {
    pub name: String,
    pub hex: String,
    /// Name of the material record this color is spooled in, when known.
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default = "default_color_category")]
    pub category: MaterialCategory,
    pub stock_quantity: Option<i32>,
}

fn default_color_category() -> MaterialCategory {
    MaterialCategory::Standard
}

impl Color {
    /// Derive the category from the linked material record. Colors without
    /// a resolvable link keep their stored category (standard by default).
    pub fn resolve_category(&self, materials: &[Material]) -> MaterialCategory {
        self.material
            .as_deref()
            .and_then(|name| {
                materials
                    .iter()
                    .find(|m| m.active && m.name.eq_ignore_ascii_case(name.trim()))
            })
            .map(|m| m.category)
            .unwrap_or(self.category)
    }

    pub fn stock(&self) -> i32 {
        self.stock_quantity.unwrap_or(1000)
    }

    /// Below 100 units the color is shown disabled, never hidden.
    pub fn is_out_of_stock(&self) -> bool {
        self.stock() < 100
    }
}

/// Coarse print-difficulty bucket driving a flat fee.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Some(Complexity::Simple),
            "medium" => Some(Complexity::Medium),
            "complex" => Some(Complexity::Complex),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityTier {
    pub tier: Complexity,
    pub fee: Cents,
    pub min_time_minutes: i64,
    pub max_time_minutes: i64,
    pub help_text: Option<String>,
}

/// Per-product personalization offering. Only `min_fee` feeds the back-office
/// calculator today; checkout charges the flat customization constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomizationOption {
    pub name: String,
    pub min_fee: Cents,
    pub max_fee: Cents,
}

/// A catalog product after boundary validation: loose metadata has already
/// been folded into typed `options`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Cents,
    pub is_active: bool,
    pub colors: Vec<Color>,
    pub options: ProductOptions,
    pub created_at: DateTime<Utc>,
}
