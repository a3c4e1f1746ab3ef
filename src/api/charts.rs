use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::Result,
    models::{ApiResponse, PriceSeries, TimeRange},
    services::PriceChartService,
};

use super::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PriceSeriesQuery {
    pub range: Option<String>,
}

/// GET /api/v1/chart/{coin}?range=7d
pub async fn get_price_series(
    State(state): State<AppState>,
    Path(coin): Path<String>,
    Query(query): Query<PriceSeriesQuery>,
) -> Result<Json<ApiResponse<PriceSeries>>> {
    let range = TimeRange::parse_or_default(query.range.as_deref())?;
    let service = PriceChartService::new(state.price_feed.clone());
    let series = service.series(&coin, range).await?;
    Ok(Json(ApiResponse::success(series)))
}
