use thiserror::Error;

use crate::{
    dto::orders::{CreateOrderRequest, OrderItemRequest},
    models::{Product, Special, round_cents},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("El carrito está vacío")]
    Empty,
    #[error("Indica tu nombre para completar el pedido")]
    MissingName,
    #[error("Indica un email válido para completar el pedido")]
    MissingEmail,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    /// Price shown to the customer; the server re-prices on checkout.
    pub unit_price: f64,
    pub quantity: i32,
    pub notes: Option<String>,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Shopping cart with one line per product.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Adds one unit, merging with an existing line for the same product.
    pub fn add(&mut self, product: &Product) {
        self.add_at_price(product, product.price);
    }

    /// Adds one unit of a special at its discounted price.
    pub fn add_special(&mut self, special: &Special) {
        self.add_at_price(&special.product, special.discounted_price());
    }

    /// Merging keeps the lower unit price, so a special is never lost.
    fn add_at_price(&mut self, product: &Product, unit_price: f64) {
        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => {
                line.quantity += 1;
                line.unit_price = line.unit_price.min(unit_price);
            }
            None => self.lines.push(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                unit_price,
                quantity: 1,
                notes: None,
            }),
        }
    }

    /// A quantity of zero or less removes the line.
    pub fn set_quantity(&mut self, product_id: i64, quantity: i32) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
        }
    }

    pub fn set_notes(&mut self, product_id: i64, notes: Option<String>) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.notes = notes.filter(|n| !n.trim().is_empty());
        }
    }

    pub fn remove(&mut self, product_id: i64) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn total(&self) -> f64 {
        round_cents(self.lines.iter().map(CartLine::subtotal).sum())
    }

    pub fn item_count(&self) -> i32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Builds the order body. Fails before any request is made when the
    /// cart is empty or the customer is incomplete.
    pub fn checkout(&self, customer: &CustomerDetails) -> Result<CreateOrderRequest, CartError> {
        if self.is_empty() {
            return Err(CartError::Empty);
        }
        if customer.name.trim().is_empty() {
            return Err(CartError::MissingName);
        }
        let email = customer.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(CartError::MissingEmail);
        }

        Ok(CreateOrderRequest {
            customer_name: customer.name.trim().to_string(),
            customer_email: email.to_string(),
            customer_phone: customer
                .phone
                .clone()
                .filter(|p| !p.trim().is_empty()),
            items: self
                .lines
                .iter()
                .map(|l| OrderItemRequest {
                    product_id: l.product_id,
                    quantity: l.quantity,
                    notes: l.notes.clone(),
                })
                .collect(),
            notes: customer.notes.clone().filter(|n| !n.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, price: f64) -> Product {
        Product {
            id,
            name: format!("Producto {id}"),
            description: String::new(),
            price,
            category: "bebidas".into(),
            image: String::new(),
            available: true,
        }
    }

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            ..Default::default()
        }
    }

    #[test]
    fn adding_same_product_twice_increments_quantity() {
        let mut cart = Cart::new();
        let coffee = product(1, 2.5);
        cart.add(&coffee);
        cart.add(&coffee);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn non_positive_quantity_removes_line() {
        let mut cart = Cart::new();
        cart.add(&product(1, 2.5));
        cart.add(&product(2, 1.8));

        cart.set_quantity(1, 0);
        cart.set_quantity(2, -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn total_tracks_every_mutation() {
        let mut cart = Cart::new();
        cart.add(&product(1, 2.5));
        cart.add(&product(2, 1.8));
        assert_eq!(cart.total(), 4.3);

        cart.set_quantity(1, 3);
        assert_eq!(cart.total(), 9.3);

        cart.remove(2);
        assert_eq!(cart.total(), 7.5);

        cart.clear();
        assert_eq!(cart.total(), 0.0);
    }

    #[test]
    fn specials_use_discounted_price() {
        let special = Special {
            id: 1,
            product: product(1, 3.0),
            discount: 20.0,
            date: "2025-01-01".into(),
        };
        let mut cart = Cart::new();
        cart.add_special(&special);
        assert_eq!(cart.total(), 2.4);
    }

    #[test]
    fn special_price_wins_when_lines_merge() {
        let coffee = product(1, 3.0);
        let special = Special {
            id: 1,
            product: coffee.clone(),
            discount: 20.0,
            date: "2025-01-01".into(),
        };

        let mut cart = Cart::new();
        cart.add(&coffee);
        cart.add_special(&special);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].unit_price, 2.4);
        assert_eq!(cart.total(), 4.8);

        cart.add(&coffee);
        assert_eq!(cart.lines()[0].unit_price, 2.4);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn empty_cart_cannot_check_out() {
        let cart = Cart::new();
        assert_eq!(cart.checkout(&customer()).unwrap_err(), CartError::Empty);
    }

    #[test]
    fn checkout_requires_name_and_email() {
        let mut cart = Cart::new();
        cart.add(&product(1, 2.5));

        let mut who = customer();
        who.name = "  ".into();
        assert_eq!(cart.checkout(&who).unwrap_err(), CartError::MissingName);

        let mut who = customer();
        who.email = "not-an-email".into();
        assert_eq!(cart.checkout(&who).unwrap_err(), CartError::MissingEmail);
    }

    #[test]
    fn checkout_builds_order_lines() {
        let mut cart = Cart::new();
        cart.add(&product(1, 2.5));
        cart.set_quantity(1, 2);
        cart.set_notes(1, Some("sin azúcar".into()));

        let order = cart.checkout(&customer()).unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[0].notes.as_deref(), Some("sin azúcar"));
        assert!(order.customer_phone.is_none());
    }
}
