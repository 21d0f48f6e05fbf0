use fab_core::settings::Settings;
use fab_shared::money::Cents;

use crate::models::FulfillmentKind;

/// Match a free-text address against the configured `"City, State"` zone
/// list. City parts must match exactly; state parts match when equal or when
/// one is a prefix of the other, which absorbs "GA" vs "Georgia" variance.
/// Comparison is on trimmed lowercase; first structural match wins.
pub fn resolve_zone<'a>(city: &str, state: &str, zones: &'a [String]) -> Option<&'a str> {
    let city = city.trim().to_lowercase();
    let state = state.trim().to_lowercase();

    zones.iter().map(String::as_str).find(|zone| {
        let mut parts = zone.splitn(2, ',');
        let zone_city = parts.next().unwrap_or("").trim().to_lowercase();
        let zone_state = parts.next().unwrap_or("").trim().to_lowercase();

        zone_city == city && states_match(&state, &zone_state)
    })
}

fn states_match(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return a == b;
    }
    a == b || a.starts_with(b) || b.starts_with(a)
}

/// Fulfillment options derived from the address fields entered so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FulfillmentChoice {
    /// City field too short to decide anything yet.
    Incomplete,
    /// Inside a configured zone: pickup is the default, delivery also offered.
    Local { zone: String },
    /// Outside every zone: only shipping is offered.
    ShippingOnly,
}

impl FulfillmentChoice {
    pub fn offered(&self) -> &'static [FulfillmentKind] {
        match self {
            FulfillmentChoice::Incomplete => &[],
            FulfillmentChoice::Local { .. } => {
                &[FulfillmentKind::Pickup, FulfillmentKind::Delivery]
            }
            FulfillmentChoice::ShippingOnly => &[FulfillmentKind::Shipping],
        }
    }

    pub fn default_kind(&self) -> Option<FulfillmentKind> {
        self.offered().first().copied()
    }
}

pub fn fulfillment_options(city: &str, state: &str, zones: &[String]) -> FulfillmentChoice {
    if let Some(zone) = resolve_zone(city, state, zones) {
        return FulfillmentChoice::Local {
            zone: zone.to_string(),
        };
    }
    if city.trim().len() > 2 {
        FulfillmentChoice::ShippingOnly
    } else {
        FulfillmentChoice::Incomplete
    }
}

/// The customer's claim to free local delivery.
///
/// `social_follow_ack` is a self-declared "I followed/subscribed" checkbox
/// with no server-side verification; that is the current business rule, kept
/// as an explicit field rather than hidden in a bool parameter.
#[derive(Debug, Clone, Default)]
pub struct PromoClaim {
    pub code: Option<String>,
    pub social_follow_ack: bool,
}

impl PromoClaim {
    /// Case-insensitive exact match against the single configured code; no
    /// expiry, no usage cap. The social acknowledgment qualifies on its own.
    pub fn grants_free_delivery(&self, settings: &Settings) -> bool {
        if self.social_follow_ack {
            return true;
        }
        let configured = settings.text("free_delivery_promo_code");
        if configured.is_empty() {
            return false;
        }
        self.code
            .as_deref()
            .map(|code| code.trim().eq_ignore_ascii_case(configured.trim()))
            .unwrap_or(false)
    }
}

/// Shipping cost charged once per checkout.
pub fn shipping_cost(
    kind: FulfillmentKind,
    subtotal: Cents,
    promo: &PromoClaim,
    settings: &Settings,
) -> Cents {
    match kind {
        FulfillmentKind::Pickup => 0,
        FulfillmentKind::Delivery => {
            if promo.grants_free_delivery(settings) {
                0
            } else {
                settings.money("delivery_fee")
            }
        }
        FulfillmentKind::Shipping => {
            if subtotal >= settings.money("free_shipping_threshold") {
                0
            } else {
                settings.money("shipping_fee")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fab_core::settings::SettingValue;

    fn zones() -> Vec<String> {
        vec![
            "Alpharetta, Georgia".to_string(),
            "Roswell, GA".to_string(),
        ]
    }

    fn settings() -> Settings {
        let mut s = Settings::default();
        s.set("delivery_fee", SettingValue::Number(5.0));
        s.set("shipping_fee", SettingValue::Number(7.5));
        s.set("free_shipping_threshold", SettingValue::Number(15.0));
        s.set(
            "free_delivery_promo_code",
            SettingValue::Text("FREEDEL".to_string()),
        );
        s
    }

    #[test]
    fn test_state_abbreviation_matches_both_ways() {
        let zones = zones();
        assert_eq!(
            resolve_zone("Alpharetta", "GA", &zones),
            Some("Alpharetta, Georgia")
        );
        assert_eq!(
            resolve_zone("roswell", "Georgia", &zones),
            Some("Roswell, GA")
        );
    }

    #[test]
    fn test_city_must_match_exactly() {
        assert_eq!(resolve_zone("Alpharet", "GA", &zones()), None);
        assert!(resolve_zone(" ALPHARETTA ", "georgia", &zones()).is_some());
    }

    #[test]
    fn test_fulfillment_selection() {
        let zones = zones();
        assert_eq!(
            fulfillment_options("Alpharetta", "GA", &zones),
            FulfillmentChoice::Local {
                zone: "Alpharetta, Georgia".to_string()
            }
        );
        assert_eq!(
            fulfillment_options("Seattle", "WA", &zones),
            FulfillmentChoice::ShippingOnly
        );
        assert_eq!(
            fulfillment_options("Se", "WA", &zones),
            FulfillmentChoice::Incomplete
        );

        let local = fulfillment_options("Alpharetta", "GA", &zones);
        assert_eq!(local.default_kind(), Some(FulfillmentKind::Pickup));
    }

    #[test]
    fn test_pickup_is_always_free() {
        let s = settings();
        assert_eq!(
            shipping_cost(FulfillmentKind::Pickup, 0, &PromoClaim::default(), &s),
            0
        );
    }

    #[test]
    fn test_delivery_fee_and_promo() {
        let s = settings();
        let no_promo = PromoClaim::default();
        assert_eq!(
            shipping_cost(FulfillmentKind::Delivery, 1000, &no_promo, &s),
            500
        );

        let coded = PromoClaim {
            code: Some(" freedel ".to_string()),
            social_follow_ack: false,
        };
        assert_eq!(shipping_cost(FulfillmentKind::Delivery, 1000, &coded, &s), 0);

        let followed = PromoClaim {
            code: None,
            social_follow_ack: true,
        };
        assert_eq!(
            shipping_cost(FulfillmentKind::Delivery, 1000, &followed, &s),
            0
        );
    }

    #[test]
    fn test_wrong_code_still_charges() {
        let s = settings();
        let wrong = PromoClaim {
            code: Some("FREESHIP".to_string()),
            social_follow_ack: false,
        };
        assert_eq!(
            shipping_cost(FulfillmentKind::Delivery, 1000, &wrong, &s),
            500
        );
    }

    #[test]
    fn test_free_shipping_threshold_is_strict() {
        let s = settings();
        let promo = PromoClaim::default();
        // 14.99 is strictly below the 15.00 threshold.
        assert_eq!(
            shipping_cost(FulfillmentKind::Shipping, 1499, &promo, &s),
            750
        );
        assert_eq!(shipping_cost(FulfillmentKind::Shipping, 1500, &promo, &s), 0);
    }
}
