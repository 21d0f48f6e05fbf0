use serde::{Deserialize, Serialize};

use fab_core::settings::Settings;
use fab_shared::money::{self, Cents};

use crate::product::{Complexity, ComplexityTier, MaterialCategory, PrintSize};

/// Flat checkout charge when customization text is supplied on a
/// customizable product.
pub const CUSTOMIZATION_FEE: Cents = 200;

/// Default cost-plus margin for the back-office calculator.
pub const DEFAULT_PROFIT_MARGIN_PERCENT: f64 = 40.0;

/// Everything the engine needs to price one unit.
///
/// `selected_colors` carries the material category of each NON-empty color
/// slot; empty slots contribute nothing and must already be dropped by the
/// caller. Stock filtering is likewise a caller precondition: out-of-stock
/// colors are presented disabled and never reach this request.
#[derive(Debug, Clone)]
pub struct PriceRequest {
    pub base_price: Cents,
    pub material_category: MaterialCategory,
    pub size: PrintSize,
    pub selected_colors: Vec<MaterialCategory>,
    pub complexity: Option<Complexity>,
    pub is_customizable: bool,
    pub customization_text: Option<String>,
}

/// Itemized cost breakdown. Derived, never persisted.
///
/// Invariants: `subtotal` is the sum of every non-shipping field and
/// `total == subtotal + shipping`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub base_price: Cents,
    pub material_upcharge: Cents,
    pub size_upcharge: Cents,
    pub color_upcharge: Cents,
    pub ams_fee: Cents,
    pub complexity_fee: Cents,
    pub customization_fee: Cents,
    pub subtotal: Cents,
    pub shipping: Cents,
    pub total: Cents,
}

impl PriceBreakdown {
    /// Attach the once-per-checkout shipping cost.
    pub fn with_shipping(mut self, shipping: Cents) -> Self {
        self.shipping = shipping;
        self.total = self.subtotal + shipping;
        self
    }

    /// Labeled two-decimal lines for the back-office calculator; zero fee
    /// lines are omitted, base/subtotal/total always shown.
    pub fn display_lines(&self, symbol: &str) -> Vec<(&'static str, String)> {
        let fee_lines = [
            ("Material upcharge", self.material_upcharge),
            ("Size upcharge", self.size_upcharge),
            ("Color upcharge", self.color_upcharge),
            ("Multi-color (AMS) fee", self.ams_fee),
            ("Complexity fee", self.complexity_fee),
            ("Customization fee", self.customization_fee),
            ("Shipping", self.shipping),
        ];

        let mut lines = vec![("Base price", money::format(symbol, self.base_price))];
        lines.extend(
            fee_lines
                .into_iter()
                .filter(|(_, amount)| *amount != 0)
                .map(|(label, amount)| (label, money::format(symbol, amount))),
        );
        lines.push(("Subtotal", money::format(symbol, self.subtotal)));
        lines.push(("Total", money::format(symbol, self.total)));
        lines
    }
}

/// Pure, infallible per-item price computation.
///
/// Any missing setting or unknown tier contributes 0 rather than failing the
/// transaction; the miss is counted by `Settings::fallback_count`.
pub struct PricingEngine {
    profit_margin_percent: f64,
}

impl PricingEngine {
    pub fn new(profit_margin_percent: f64) -> Self {
        Self {
            profit_margin_percent,
        }
    }

    /// Margin comes from the `profit_margin` setting, falling back to the
    /// stock 40% when unset.
    pub fn from_settings(settings: &Settings) -> Self {
        let margin = settings.number("profit_margin");
        Self::new(if margin > 0.0 {
            margin
        } else {
            DEFAULT_PROFIT_MARGIN_PERCENT
        })
    }

    /// Compute the additive breakdown for one unit. Shipping starts at 0;
    /// the checkout layer attaches it via `PriceBreakdown::with_shipping`.
    pub fn quote(
        &self,
        request: &PriceRequest,
        settings: &Settings,
        complexity_tiers: &[ComplexityTier],
    ) -> PriceBreakdown {
        let material_upcharge = match request.material_category {
            MaterialCategory::Standard => 0,
            category => settings.money(&format!("material_{}_upcharge", category.as_str())),
        };

        let size_upcharge = settings.money(&format!("size_{}_upcharge", request.size.as_str()));

        let color_upcharge: Cents = request
            .selected_colors
            .iter()
            .map(|category| match category {
                MaterialCategory::Standard => 0,
                MaterialCategory::Premium => settings.money("color_premium_upcharge"),
                MaterialCategory::Ultra => settings.money("color_ultra_upcharge"),
            })
            .sum();

        let color_count = request.selected_colors.len() as i64;
        let ams_fee = if color_count <= 1 {
            0
        } else {
            settings.money("ams_base_fee") + (color_count - 1) * settings.money("ams_per_color_fee")
        };

        let complexity_fee = request
            .complexity
            .and_then(|tier| complexity_tiers.iter().find(|t| t.tier == tier))
            .map(|t| t.fee)
            .unwrap_or(0);

        let has_text = request
            .customization_text
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false);
        let customization_fee = if request.is_customizable && has_text {
            CUSTOMIZATION_FEE
        } else {
            0
        };

        let subtotal = request.base_price
            + material_upcharge
            + size_upcharge
            + color_upcharge
            + ams_fee
            + complexity_fee
            + customization_fee;

        PriceBreakdown {
            base_price: request.base_price,
            material_upcharge,
            size_upcharge,
            color_upcharge,
            ams_fee,
            complexity_fee,
            customization_fee,
            subtotal,
            shipping: 0,
            total: subtotal,
        }
    }

    /// Cost-plus suggested retail: ceiling to the nearest whole currency
    /// unit so rounding never under-prices. Back-office only.
    pub fn suggested_price(&self, subtotal: Cents) -> Cents {
        let marked_up = subtotal as f64 * (1.0 + self.profit_margin_percent / 100.0);
        (marked_up / 100.0).ceil() as Cents * 100
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PROFIT_MARGIN_PERCENT)
    }
}
