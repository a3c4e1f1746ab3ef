// src/models/mod.rs
pub mod balance;
pub mod price;
pub mod tool;

pub use balance::{Balance, BalanceCheckRequest};
pub use price::{PriceChange, PricePoint, PriceSeries, TimeRange};
pub use tool::{DetectToolRequest, IntentLabel, ToolDecision};

use serde::Serialize;

// ==================== API RESPONSE ====================
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
