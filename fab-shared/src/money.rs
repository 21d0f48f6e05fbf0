/// Monetary amount in integer cents (minor currency units).
pub type Cents = i64;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Convert a decimal currency amount (e.g. a settings value like 1.5) to cents.
pub fn from_decimal(units: f64) -> Cents {
    (units * 100.0).round() as Cents
}

/// Two-decimal display with a currency symbol. Presentation only.
pub fn format(symbol: &str, amount: Cents) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.abs();
    format!("{}{}{}.{:02}", sign, symbol, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal() {
        assert_eq!(from_decimal(1.5), 150);
        assert_eq!(from_decimal(14.99), 1499);
        assert_eq!(from_decimal(0.0), 0);
    }

    #[test]
    fn test_format() {
        assert_eq!(format("$", 1750), "$17.50");
        assert_eq!(format("$", 5), "$0.05");
        assert_eq!(format("$", -250), "-$2.50");
    }
}
