use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider},
    types::{Address, U256},
    utils::to_checksum,
};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::{
    constants::{NATIVE_BALANCE_DECIMALS, NATIVE_BALANCE_SYMBOL},
    error::{AppError, Result},
    models::Balance,
};

/// Resolves the balance held by an account identifier.
#[async_trait]
pub trait BalanceLookup: Send + Sync {
    async fn lookup_balance(&self, account_id: &str) -> Result<Balance>;
}

/// Native-coin balance over EVM JSON-RPC (`eth_getBalance`).
pub struct EvmBalanceLookup {
    provider: Provider<Http>,
}

impl EvmBalanceLookup {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| AppError::Internal(format!("Invalid EVM RPC URL: {}", e)))?;
        Ok(Self { provider })
    }
}

pub fn parse_account(account_id: &str) -> Result<Address> {
    let account_id = account_id.trim();
    if account_id.is_empty() {
        return Err(AppError::BadRequest("Account number is required".to_string()));
    }
    Address::from_str(account_id)
        .map_err(|_| AppError::BadRequest("Invalid EVM address".to_string()))
}

/// Scales a wei amount to whole coins without going through floating point.
pub fn format_wei(wei: U256) -> Result<Decimal> {
    let unit = U256::exp10(NATIVE_BALANCE_DECIMALS as usize);
    let whole = wei / unit;
    let fraction = wei % unit;

    if whole > U256::from(u128::MAX) {
        return Err(AppError::Internal("Balance exceeds supported range".into()));
    }
    let whole = Decimal::from_u128(whole.as_u128())
        .ok_or_else(|| AppError::Internal("Balance exceeds supported range".into()))?;
    let fraction = Decimal::from_i128_with_scale(fraction.as_u128() as i128, NATIVE_BALANCE_DECIMALS);

    whole
        .checked_add(fraction)
        .map(|value| value.normalize())
        .ok_or_else(|| AppError::Internal("Balance exceeds supported range".into()))
}

#[async_trait]
impl BalanceLookup for EvmBalanceLookup {
    async fn lookup_balance(&self, account_id: &str) -> Result<Balance> {
        let address = parse_account(account_id)?;
        let wei = self
            .provider
            .get_balance(address, None)
            .await
            .map_err(|e| AppError::BlockchainRPC(e.to_string()))?;

        Ok(Balance {
            account: to_checksum(&address, None),
            balance: format_wei(wei)?,
            symbol: NATIVE_BALANCE_SYMBOL.to_string(),
            wei: wei.to_string(),
        })
    }
}

/// Stand-in used when no RPC endpoint is configured.
pub struct UnconfiguredBalanceLookup;

#[async_trait]
impl BalanceLookup for UnconfiguredBalanceLookup {
    async fn lookup_balance(&self, _account_id: &str) -> Result<Balance> {
        Err(AppError::NotConfigured(
            "Balance lookup requires ETHEREUM_RPC_URL".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_wei_scales_to_ether() {
        let wei = U256::from_dec_str("1500000000000000000").unwrap();
        assert_eq!(format_wei(wei).unwrap(), Decimal::from_str("1.5").unwrap());
    }

    #[test]
    fn format_wei_keeps_sub_gwei_precision() {
        let wei = U256::from(1u64);
        assert_eq!(
            format_wei(wei).unwrap(),
            Decimal::from_str("0.000000000000000001").unwrap()
        );
        assert_eq!(format_wei(U256::zero()).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_account_rejects_blank_and_garbage() {
        assert!(matches!(parse_account("   "), Err(AppError::BadRequest(_))));
        assert!(matches!(
            parse_account("not-an-address"),
            Err(AppError::BadRequest(_))
        ));
        assert!(parse_account(" 0x0000000000000000000000000000000000000001 ").is_ok());
    }

    #[tokio::test]
    async fn evm_lookup_validates_before_rpc() {
        let lookup = EvmBalanceLookup::new("http://127.0.0.1:8545").unwrap();
        let err = lookup.lookup_balance("").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn unconfigured_lookup_reports_unavailable() {
        let err = UnconfiguredBalanceLookup
            .lookup_balance("0x0000000000000000000000000000000000000001")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotConfigured(_)));
    }
}
