use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::{
    error::{AppError, Result},
    models::{PricePoint, TimeRange},
};

/// Source of historical close prices for a coin.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn price_history(&self, coin: &str, range: TimeRange) -> Result<Vec<PricePoint>>;
}

#[derive(Clone, Debug)]
pub struct HttpPriceFeed {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct PriceHistoryPayload {
    #[serde(rename = "Data", default)]
    data: Vec<PricePoint>,
}

impl HttpPriceFeed {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: Client::new(),
        }
    }

    /// `{base}/prices/{coin}?range={range}`
    fn history_url(&self, coin: &str, range: TimeRange) -> Result<Url> {
        let mut url = Url::parse(self.base_url.trim())
            .map_err(|e| AppError::Internal(format!("Invalid PRICE_API_URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("PRICE_API_URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push("prices")
            .push(coin);
        url.query_pairs_mut().append_pair("range", range.as_str());
        Ok(url)
    }
}

#[async_trait]
impl PriceFeed for HttpPriceFeed {
    async fn price_history(&self, coin: &str, range: TimeRange) -> Result<Vec<PricePoint>> {
        let url = self.history_url(coin, range)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalAPI(format!(
                "Price API error: {} - {}",
                status, body
            )));
        }

        let payload: PriceHistoryPayload = response
            .json()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("Malformed price history: {}", e)))?;
        Ok(payload.data)
    }
}
