//! Exchange-rate abstractions.

use anyhow::Result;
use async_trait::async_trait;

/// The two conversion multipliers fetched from the upstream feed at
/// calculation time. Valid for a single calculation, modulo the short-lived
/// provider cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePair {
    /// RUB per one USD.
    pub usd_to_rub: f64,
    /// RUB per one EUR.
    pub eur_to_rub: f64,
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self) -> Result<RatePair>;
}
