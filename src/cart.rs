//! Cart line items, the client-owned cart state and the total calculator.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rates::RatePair;

/// One cart entry: a named product, its quantity, currency and unit price.
///
/// `id` is a client-generated list key with no business meaning; the server
/// accepts it and ignores it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LineItem {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub quantity: f64,
    pub currency: String,
    pub price: f64,
}

/// The total value of a cart expressed simultaneously in three currencies.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CartSummary {
    #[serde(rename = "RUB")]
    pub rub: f64,
    #[serde(rename = "USD")]
    pub usd: f64,
    #[serde(rename = "EUR")]
    pub eur: f64,
}

/// An explicitly owned, ordered cart.
///
/// Items are keyed by their client-generated id for removal; duplicate names
/// are allowed.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: LineItem) {
        self.items.push(item);
    }

    /// Removes the first item with the given id. Returns whether anything
    /// was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.items.iter().position(|i| i.id.as_deref() == Some(id)) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Computes the cart total in RUB, USD and EUR.
///
/// Pure function of its inputs: a linear scan accumulates the RUB value of
/// every line, then the USD/EUR figures are derived by dividing through the
/// respective rate. A line with an unrecognized currency code contributes
/// zero; zero rates are not guarded against, the derived fields become
/// non-finite.
pub fn calculate(items: &[LineItem], rates: &RatePair) -> CartSummary {
    let mut sum_rub = 0.0;

    for item in items {
        let line_value = item.quantity * item.price;
        match item.currency.as_str() {
            "RUB" => sum_rub += line_value,
            "USD" => sum_rub += line_value * rates.usd_to_rub,
            "EUR" => sum_rub += line_value * rates.eur_to_rub,
            other => debug!(currency = other, name = %item.name, "Skipping line with unknown currency"),
        }
    }

    CartSummary {
        rub: sum_rub,
        usd: sum_rub / rates.usd_to_rub,
        eur: sum_rub / rates.eur_to_rub,
    }
}
