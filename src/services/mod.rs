// All service modules
pub mod balance_service;
pub mod price_chart_service;
pub mod tool_detector;

// Re-export for convenience
pub use balance_service::{BalanceLookup, EvmBalanceLookup, UnconfiguredBalanceLookup};
pub use price_chart_service::PriceChartService;
pub use tool_detector::ToolDetector;
