use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::cache::Cache;
use crate::providers::util::with_retry;
use crate::rates::{RatePair, RateProvider};

const CACHE_KEY: &str = "cbr-daily";

/// Rate provider backed by the Central Bank of Russia daily JSON feed.
///
/// The feed quotes the RUB value of one unit of each foreign currency, so
/// the `Value` fields map directly onto [`RatePair`].
pub struct CbrProvider {
    base_url: String,
    cache: Arc<Cache<String, RatePair>>,
    cache_ttl: Duration,
    retries: usize,
    retry_delay_ms: u64,
}

impl CbrProvider {
    pub fn new(
        base_url: &str,
        cache: Arc<Cache<String, RatePair>>,
        cache_ttl: Duration,
        retries: usize,
        retry_delay_ms: u64,
    ) -> Self {
        CbrProvider {
            base_url: base_url.to_string(),
            cache,
            cache_ttl,
            retries,
            retry_delay_ms,
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<RatePair> {
        let client = reqwest::Client::builder()
            .user_agent("multicart/1.0")
            .build()?;
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} from rate provider at {}",
                response.status(),
                url
            ));
        }

        let text = response.text().await?;

        let data: CbrDailyResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse rate feed response: {}", e))?;

        Ok(RatePair {
            usd_to_rub: data.valute.usd.value,
            eur_to_rub: data.valute.eur.value,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CbrDailyResponse {
    #[serde(rename = "Valute")]
    valute: ValuteMap,
}

#[derive(Debug, Deserialize)]
struct ValuteMap {
    #[serde(rename = "USD")]
    usd: ValuteEntry,
    #[serde(rename = "EUR")]
    eur: ValuteEntry,
}

#[derive(Debug, Deserialize)]
struct ValuteEntry {
    #[serde(rename = "Value")]
    value: f64,
}

#[async_trait]
impl RateProvider for CbrProvider {
    #[instrument(name = "CbrRateFetch", skip(self))]
    async fn fetch_rates(&self) -> Result<RatePair> {
        if let Some(cached) = self.cache.get(&CACHE_KEY.to_string()).await {
            return Ok(cached);
        }

        let url = format!("{}/daily_json.js", self.base_url);
        debug!("Requesting exchange rates from {}", url);

        let rates = with_retry(
            || self.fetch_once(&url),
            self.retries,
            self.retry_delay_ms,
        )
        .await?;

        self.cache
            .put(CACHE_KEY.to_string(), rates, Some(self.cache_ttl))
            .await;

        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DAILY_JSON: &str = r#"{
        "Date": "2026-08-27T11:30:00+03:00",
        "Valute": {
            "USD": {
                "CharCode": "USD",
                "Nominal": 1,
                "Name": "Доллар США",
                "Value": 90.5,
                "Previous": 89.9
            },
            "EUR": {
                "CharCode": "EUR",
                "Nominal": 1,
                "Name": "Евро",
                "Value": 100.25,
                "Previous": 99.8
            }
        }
    }"#;

    fn provider(base_url: &str, retries: usize) -> CbrProvider {
        CbrProvider::new(
            base_url,
            Arc::new(Cache::new()),
            Duration::from_secs(60),
            retries,
            1,
        )
    }

    async fn mount_daily(mock_server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/daily_json.js"))
            .respond_with(response)
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_server = MockServer::start().await;
        mount_daily(
            &mock_server,
            ResponseTemplate::new(200).set_body_string(DAILY_JSON),
        )
        .await;

        let provider = provider(&mock_server.uri(), 0);
        let rates = provider.fetch_rates().await.expect("Failed to get rates");
        assert_eq!(rates.usd_to_rub, 90.5);
        assert_eq!(rates.eur_to_rub, 100.25);
    }

    #[tokio::test]
    async fn test_missing_currency_field_is_named_error() {
        let mock_server = MockServer::start().await;
        // EUR entry absent
        let body = r#"{"Valute": {"USD": {"Value": 90.5}}}"#;
        mount_daily(&mock_server, ResponseTemplate::new(200).set_body_string(body)).await;

        let provider = provider(&mock_server.uri(), 0);
        let result = provider.fetch_rates().await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse rate feed response")
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_named_error() {
        let mock_server = MockServer::start().await;
        mount_daily(
            &mock_server,
            ResponseTemplate::new(200).set_body_string("not json"),
        )
        .await;

        let provider = provider(&mock_server.uri(), 0);
        let result = provider.fetch_rates().await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse rate feed response")
        );
    }

    #[tokio::test]
    async fn test_upstream_error_status() {
        let mock_server = MockServer::start().await;
        mount_daily(&mock_server, ResponseTemplate::new(500)).await;

        let provider = provider(&mock_server.uri(), 0);
        let result = provider.fetch_rates().await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("HTTP error: 500 Internal Server Error")
        );
    }

    #[tokio::test]
    async fn test_second_fetch_served_from_cache() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/daily_json.js"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DAILY_JSON))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = provider(&mock_server.uri(), 0);
        let first = provider.fetch_rates().await.unwrap();
        let second = provider.fetch_rates().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/daily_json.js"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/daily_json.js"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DAILY_JSON))
            .mount(&mock_server)
            .await;

        let provider = provider(&mock_server.uri(), 2);
        let rates = provider.fetch_rates().await.expect("Failed to get rates");
        assert_eq!(rates.usd_to_rub, 90.5);
    }
}
