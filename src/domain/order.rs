use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tradable symbol identifier (e.g. "BANANAS")
pub type Product = String;

/// Limit order for a single product.
///
/// Positive quantity buys, negative quantity sells. A zero quantity is a
/// placeholder the transport layer is expected to drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub symbol: Product,
    pub price: i64,
    pub quantity: i64,
}

impl Order {
    pub fn new(symbol: impl Into<Product>, price: i64, quantity: i64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            quantity,
        }
    }

    pub fn is_buy(&self) -> bool {
        self.quantity > 0
    }

    pub fn is_sell(&self) -> bool {
        self.quantity < 0
    }

    pub fn is_placeholder(&self) -> bool {
        self.quantity == 0
    }

    /// Position after this order is completely filled
    pub fn position_after_fill(&self, position: i64) -> i64 {
        position + self.quantity
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:+} @ {}", self.symbol, self.quantity, self.price)
    }
}

/// All orders produced in one tick, grouped by product.
///
/// Products iterate in lexical order so the output of a tick is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickOrders(BTreeMap<Product, Vec<Order>>);

impl TickOrders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an order under its own symbol. Orders are never merged.
    pub fn push(&mut self, order: Order) {
        self.0.entry(order.symbol.clone()).or_default().push(order);
    }

    pub fn extend(&mut self, orders: impl IntoIterator<Item = Order>) {
        for order in orders {
            self.push(order);
        }
    }

    /// Make sure a product is present in the output even with no orders
    pub fn touch(&mut self, product: &str) {
        self.0.entry(product.to_string()).or_default();
    }

    pub fn get(&self, product: &str) -> &[Order] {
        self.0.get(product).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Product, &Vec<Order>)> {
        self.0.iter()
    }

    /// Total number of orders across all products
    pub fn order_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.order_count() == 0
    }

    /// Copy with zero-quantity placeholders removed
    pub fn without_placeholders(&self) -> Self {
        let filtered = self
            .0
            .iter()
            .map(|(product, orders)| {
                let kept = orders
                    .iter()
                    .filter(|o| !o.is_placeholder())
                    .cloned()
                    .collect();
                (product.clone(), kept)
            })
            .collect();
        Self(filtered)
    }

    pub fn into_inner(self) -> BTreeMap<Product, Vec<Order>> {
        self.0
    }
}
