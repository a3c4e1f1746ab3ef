/// Application constants

pub const API_VERSION: &str = "v1";

// Intent classification
pub const GENERAL_QUERY_INTENT: &str = "General Query";

// Generative model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 30;

// Price stream
pub const PRICE_REFRESH_INTERVAL_SECS: u64 = 60;

// Balance lookup
pub const NATIVE_BALANCE_SYMBOL: &str = "ETH";
pub const NATIVE_BALANCE_DECIMALS: u32 = 18;
