use serde::{Deserialize, Serialize};

use super::order::Product;

/// A fill reported by the exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: Product,
    pub price: i64,
    pub quantity: i64,
    #[serde(default)]
    pub buyer: Option<String>,
    #[serde(default)]
    pub seller: Option<String>,
    pub timestamp: u64,
}

impl Trade {
    pub fn bought_by(&self, trader: &str) -> bool {
        self.buyer.as_deref() == Some(trader)
    }

    pub fn sold_by(&self, trader: &str) -> bool {
        self.seller.as_deref() == Some(trader)
    }

    /// Cash value of the fill, always non-negative
    pub fn notional(&self) -> i64 {
        self.price * self.quantity.abs()
    }
}
