use serde::{Deserialize, Serialize};
use serde_json::Value;

use fab_shared::money;

use crate::product::{CustomizationOption, PrintSize};

/// One selectable color position on a multi-color product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorSlot {
    pub id: String,
    pub label: String,
}

/// Per-size print durations in minutes. Absent sizes fall back to the
/// size-specific defaults (60/120/180).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrintTimes {
    pub small: Option<i64>,
    pub medium: Option<i64>,
    pub large: Option<i64>,
}

impl PrintTimes {
    pub fn minutes_for(&self, size: PrintSize) -> i64 {
        let configured = match size {
            PrintSize::Small => self.small,
            PrintSize::Medium => self.medium,
            PrintSize::Large => self.large,
        };
        configured.unwrap_or_else(|| size.default_minutes())
    }
}

/// Fully-typed product options, validated once at the catalog boundary.
///
/// Legacy catalog records keep these as loose, sometimes-missing metadata
/// fields; `from_metadata` applies the documented defaults so no call site
/// downstream has to sniff untyped values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductOptions {
    pub allowed_materials: Vec<String>,
    pub allowed_sizes: Vec<PrintSize>,
    pub color_slots: Vec<ColorSlot>,
    pub print_times: PrintTimes,
    pub is_customizable: bool,
    pub personalization_options: Vec<CustomizationOption>,
}

impl Default for ProductOptions {
    fn default() -> Self {
        Self {
            allowed_materials: Vec::new(),
            allowed_sizes: vec![PrintSize::Small, PrintSize::Medium, PrintSize::Large],
            color_slots: vec![ColorSlot {
                id: "color_1".to_string(),
                label: "Color 1".to_string(),
            }],
            print_times: PrintTimes::default(),
            is_customizable: false,
            personalization_options: Vec::new(),
        }
    }
}

impl ProductOptions {
    /// Fold a raw catalog record's metadata into typed options.
    ///
    /// Unknown size names are skipped; `color_slots` wins over the older
    /// `num_colors` count; every absent field takes its default. Never fails:
    /// a malformed record sells as a plain single-color product rather than
    /// disappearing from the storefront.
    pub fn from_metadata(metadata: &Value) -> Self {
        let defaults = ProductOptions::default();

        let allowed_materials = metadata["allowed_materials"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or(defaults.allowed_materials);

        let allowed_sizes = metadata["allowed_sizes"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().and_then(PrintSize::parse))
                    .collect::<Vec<_>>()
            })
            .filter(|sizes| !sizes.is_empty())
            .unwrap_or(defaults.allowed_sizes);

        let color_slots = parse_color_slots(metadata).unwrap_or(defaults.color_slots);

        let print_times = PrintTimes {
            small: metadata["print_time_small"].as_i64(),
            medium: metadata["print_time_medium"].as_i64(),
            large: metadata["print_time_large"].as_i64(),
        };

        let is_customizable = metadata["is_customizable"].as_bool().unwrap_or(false);

        let personalization_options = metadata["personalization_options"]
            .as_array()
            .map(|items| items.iter().filter_map(parse_personalization).collect())
            .unwrap_or(defaults.personalization_options);

        Self {
            allowed_materials,
            allowed_sizes,
            color_slots,
            print_times,
            is_customizable,
            personalization_options,
        }
    }
}

fn parse_color_slots(metadata: &Value) -> Option<Vec<ColorSlot>> {
    if let Some(slots) = metadata["color_slots"].as_array() {
        let parsed: Vec<ColorSlot> = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| ColorSlot {
                id: slot["id"]
                    .as_str()
                    .map(String::from)
                    .unwrap_or_else(|| format!("color_{}", i + 1)),
                label: slot["label"]
                    .as_str()
                    .map(String::from)
                    .unwrap_or_else(|| format!("Color {}", i + 1)),
            })
            .collect();
        if !parsed.is_empty() {
            return Some(parsed);
        }
    }

    // Older records carry only a slot count.
    let count = metadata["num_colors"].as_i64()?;
    if count < 1 {
        return None;
    }
    Some(
        (1..=count)
            .map(|i| ColorSlot {
                id: format!("color_{}", i),
                label: format!("Color {}", i),
            })
            .collect(),
    )
}

fn parse_personalization(item: &Value) -> Option<CustomizationOption> {
    Some(CustomizationOption {
        name: item["name"].as_str()?.to_string(),
        min_fee: money::from_decimal(item["min_fee"].as_f64().unwrap_or(0.0)),
        max_fee: money::from_decimal(item["max_fee"].as_f64().unwrap_or(0.0)),
    })
}
