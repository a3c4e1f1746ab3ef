// src/api/mod.rs
pub mod ai;
pub mod balance;
pub mod charts;
pub mod extract;
pub mod health;

use std::sync::Arc;

use crate::{
    config::Config,
    error::Result,
    integrations::{
        gemini::{GeminiClient, GenerativeModel},
        price_feed::{HttpPriceFeed, PriceFeed},
    },
    services::{BalanceLookup, EvmBalanceLookup, UnconfiguredBalanceLookup},
};

// AppState definition
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub model: Arc<dyn GenerativeModel>,
    pub price_feed: Arc<dyn PriceFeed>,
    pub balances: Arc<dyn BalanceLookup>,
}

impl AppState {
    /// Wires the production collaborators described by `config`.
    pub fn from_config(config: Config) -> Result<Self> {
        let balances: Arc<dyn BalanceLookup> = match config.ethereum_rpc_url.as_deref() {
            Some(url) => Arc::new(EvmBalanceLookup::new(url)?),
            None => Arc::new(UnconfiguredBalanceLookup),
        };

        Ok(Self {
            model: Arc::new(GeminiClient::new(&config)),
            price_feed: Arc::new(HttpPriceFeed::new(config.price_api_url.clone())),
            balances,
            config,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::test_config;
    use crate::services::price_chart_service::tests::StubFeed;
    use crate::services::tool_detector::tests::StubModel;

    pub(crate) fn state_with(model: Arc<StubModel>, feed: Arc<StubFeed>) -> AppState {
        AppState {
            config: test_config(),
            model,
            price_feed: feed,
            balances: Arc::new(UnconfiguredBalanceLookup),
        }
    }

    pub(crate) fn state_with_model(model: Arc<StubModel>) -> AppState {
        state_with(model, StubFeed::with_closes(&[]))
    }

    #[test]
    fn from_config_without_rpc_builds_state() {
        let state = AppState::from_config(test_config()).unwrap();
        assert_eq!(state.config.gemini_model, "gemini-2.0-flash");
    }
}
