use axum::{extract::State, Json};

use super::{extract::AppJson, AppState};
use crate::{
    error::{AppError, Result},
    models::{ApiResponse, Balance, BalanceCheckRequest},
};

/// POST /api/v1/balance/check
pub async fn check_balance(
    State(state): State<AppState>,
    AppJson(req): AppJson<BalanceCheckRequest>,
) -> Result<Json<ApiResponse<Balance>>> {
    let account = req.account_number.trim();
    if account.is_empty() {
        return Err(AppError::BadRequest("Account number is required".into()));
    }

    let balance = state.balances.lookup_balance(account).await?;
    tracing::info!("Balance check: account={}, balance={}", balance.account, balance.balance);
    Ok(Json(ApiResponse::success(balance)))
}
