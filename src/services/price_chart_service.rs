use chrono::Utc;
use std::sync::Arc;

use crate::{
    error::{AppError, Result},
    integrations::price_feed::PriceFeed,
    models::{PriceChange, PricePoint, PriceSeries, TimeRange},
};

/// Change between the first and last sample. Needs at least two samples.
pub fn compute_price_change(points: &[PricePoint]) -> PriceChange {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 => (first.close, last.close),
        _ => return PriceChange::default(),
    };

    let value = last - first;
    let percent = if first != 0.0 && first.is_finite() {
        (value / first) * 100.0
    } else {
        0.0
    };

    PriceChange { value, percent }
}

pub fn normalize_coin(coin: &str) -> Result<String> {
    let coin = coin.trim().to_ascii_lowercase();
    if coin.is_empty() {
        return Err(AppError::BadRequest("Coin is required".to_string()));
    }
    Ok(coin)
}

pub struct PriceChartService {
    feed: Arc<dyn PriceFeed>,
}

impl PriceChartService {
    pub fn new(feed: Arc<dyn PriceFeed>) -> Self {
        Self { feed }
    }

    pub async fn series(&self, coin: &str, range: TimeRange) -> Result<PriceSeries> {
        let coin = normalize_coin(coin)?;
        let data = self.feed.price_history(&coin, range).await?;
        tracing::debug!("Fetched {} price points for {} ({})", data.len(), coin, range);

        let current_price = data.last().map(|point| point.close).unwrap_or(0.0);
        let change = compute_price_change(&data);

        Ok(PriceSeries {
            coin,
            range,
            data,
            current_price,
            change,
            updated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Feed double returning fixed closes and recording each request.
    pub(crate) struct StubFeed {
        closes: Vec<f64>,
        fail: bool,
        pub requests: Mutex<Vec<(String, TimeRange)>>,
    }

    impl StubFeed {
        pub(crate) fn with_closes(closes: &[f64]) -> Arc<Self> {
            Arc::new(Self {
                closes: closes.to_vec(),
                fail: false,
                requests: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn failing() -> Arc<Self> {
            Arc::new(Self {
                closes: Vec::new(),
                fail: true,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl PriceFeed for StubFeed {
        async fn price_history(&self, coin: &str, range: TimeRange) -> Result<Vec<PricePoint>> {
            self.requests
                .lock()
                .unwrap()
                .push((coin.to_string(), range));
            if self.fail {
                return Err(AppError::ExternalAPI("price api down".to_string()));
            }
            Ok(self
                .closes
                .iter()
                .enumerate()
                .map(|(i, close)| PricePoint {
                    time: 1_700_000_000 + i as i64 * 3600,
                    close: *close,
                })
                .collect())
        }
    }

    fn points(closes: &[f64]) -> Vec<PricePoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, close)| PricePoint {
                time: i as i64,
                close: *close,
            })
            .collect()
    }

    #[test]
    fn compute_price_change_uses_first_and_last() {
        let change = compute_price_change(&points(&[100.0, 90.0, 110.0]));
        assert!((change.value - 10.0).abs() < 1e-9);
        assert!((change.percent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn compute_price_change_handles_decline() {
        let change = compute_price_change(&points(&[200.0, 150.0]));
        assert!((change.value + 50.0).abs() < 1e-9);
        assert!((change.percent + 25.0).abs() < 1e-9);
    }

    #[test]
    fn compute_price_change_needs_two_samples() {
        assert_eq!(compute_price_change(&points(&[42.0])), PriceChange::default());
        assert_eq!(compute_price_change(&[]), PriceChange::default());
    }

    #[test]
    fn compute_price_change_guards_zero_start() {
        let change = compute_price_change(&points(&[0.0, 5.0]));
        assert!((change.value - 5.0).abs() < 1e-9);
        assert_eq!(change.percent, 0.0);
    }

    #[test]
    fn normalize_coin_rejects_blank() {
        assert!(matches!(normalize_coin("  "), Err(AppError::BadRequest(_))));
        assert_eq!(normalize_coin(" ETH ").unwrap(), "eth");
    }

    #[tokio::test]
    async fn series_summarizes_feed_data() {
        let feed = StubFeed::with_closes(&[100.0, 105.0, 120.0]);
        let service = PriceChartService::new(feed.clone());
        let series = service.series("BTC", TimeRange::Day).await.unwrap();

        assert_eq!(series.coin, "btc");
        assert_eq!(series.range, TimeRange::Day);
        assert_eq!(series.data.len(), 3);
        assert!((series.current_price - 120.0).abs() < 1e-9);
        assert!((series.change.percent - 20.0).abs() < 1e-9);
        assert_eq!(
            feed.requests.lock().unwrap().as_slice(),
            &[("btc".to_string(), TimeRange::Day)]
        );
    }

    #[tokio::test]
    async fn series_of_empty_feed_is_zeroed() {
        let service = PriceChartService::new(StubFeed::with_closes(&[]));
        let series = service.series("eth", TimeRange::Week).await.unwrap();
        assert!(series.data.is_empty());
        assert_eq!(series.current_price, 0.0);
        assert_eq!(series.change, PriceChange::default());
    }

    #[tokio::test]
    async fn series_propagates_feed_failure() {
        let service = PriceChartService::new(StubFeed::failing());
        let err = service.series("eth", TimeRange::Week).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalAPI(_)));
    }
}
