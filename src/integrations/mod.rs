pub mod gemini;
pub mod price_feed;
