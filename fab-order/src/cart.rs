use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fab_catalog::product::PrintSize;
use fab_shared::money::Cents;

/// One configured product in the cart. Unit price is captured when the line
/// is added; quantity stays >= 1 (a decrement to 0 removes the line).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: u32,
    pub selected_material: Option<String>,
    pub selected_size: Option<PrintSize>,
    pub selected_colors: Vec<String>,
    pub customization_text: Option<String>,
    pub unit_price: Cents,
}

impl CartLine {
    fn same_configuration(&self, other: &CartLine) -> bool {
        self.product_id == other.product_id
            && self.selected_material == other.selected_material
            && self.selected_size == other.selected_size
            && self.selected_colors == other.selected_colors
            && self.customization_text == other.customization_text
    }
}

/// Client-session cart; lives and dies entirely before checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line; an identical configuration merges into the existing line
    /// instead of duplicating it.
    pub fn add(&mut self, line: CartLine) -> Uuid {
        if let Some(existing) = self.lines.iter_mut().find(|l| l.same_configuration(&line)) {
            existing.quantity += line.quantity.max(1);
            return existing.id;
        }
        let mut line = line;
        line.quantity = line.quantity.max(1);
        let id = line.id;
        self.lines.push(line);
        id
    }

    pub fn increment(&mut self, line_id: Uuid) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == line_id) {
            line.quantity += 1;
        }
    }

    /// Decrementing the last unit removes the line entirely.
    pub fn decrement(&mut self, line_id: Uuid) {
        if let Some(index) = self.lines.iter().position(|l| l.id == line_id) {
            if self.lines[index].quantity > 1 {
                self.lines[index].quantity -= 1;
            } else {
                self.lines.remove(index);
            }
        }
    }

    pub fn remove(&mut self, line_id: Uuid) {
        self.lines.retain(|l| l.id != line_id);
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn unit_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn subtotal(&self) -> Cents {
        self.lines
            .iter()
            .map(|l| l.unit_price * l.quantity as i64)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: Cents) -> CartLine {
        CartLine {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            product_name: "Desk Planter".to_string(),
            quantity: 1,
            selected_material: Some("PLA".to_string()),
            selected_size: None,
            selected_colors: vec!["Matte Black".to_string()],
            customization_text: None,
            unit_price: price,
        }
    }

    #[test]
    fn test_identical_configuration_merges() {
        let mut cart = Cart::new();
        let a = line(1000);
        let mut b = line(1000);
        b.id = Uuid::new_v4();
        b.product_id = a.product_id;

        let first = cart.add(a);
        let second = cart.add(b);
        assert_eq!(first, second);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_decrement_to_zero_removes_line() {
        let mut cart = Cart::new();
        let id = cart.add(line(1000));
        cart.increment(id);
        cart.decrement(id);
        assert_eq!(cart.lines()[0].quantity, 1);
        cart.decrement(id);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_and_unit_count() {
        let mut cart = Cart::new();
        let id = cart.add(line(1750));
        cart.increment(id);
        cart.increment(id);
        cart.add(line(500));
        assert_eq!(cart.unit_count(), 4);
        assert_eq!(cart.subtotal(), 3 * 1750 + 500);
    }
}
