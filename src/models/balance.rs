use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceCheckRequest {
    #[serde(rename = "accountNumber")]
    pub account_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balance {
    pub account: String,
    pub balance: Decimal,
    pub symbol: String,
    /// Raw base-unit amount, kept as a string to avoid precision loss.
    pub wei: String,
}
