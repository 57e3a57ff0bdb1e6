use std::env;

use fgw_common::{TokenAmount, FEE_TOKEN_CODE};
use log::*;

use crate::db_types::{Address, AssetId};

const DEFAULT_GATEWAY_ADDRESS: &str = "fgw-gateway";
const DEFAULT_OWNER_ADDRESS: &str = "fgw-owner";

/// Identity and fee parameters for one gateway deployment.
///
/// The gateway address is the identity the ledger debits fees from and escrows funds under; the owner address is
/// the only caller allowed to run privileged operations.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub gateway_address: Address,
    pub owner_address: Address,
    /// The ledger asset oracle fees are paid in.
    pub fee_token: AssetId,
    /// The fee attached to every oracle request.
    pub oracle_fee: TokenAmount,
    pub database_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            gateway_address: Address::from(DEFAULT_GATEWAY_ADDRESS),
            owner_address: Address::from(DEFAULT_OWNER_ADDRESS),
            fee_token: AssetId::from(FEE_TOKEN_CODE),
            oracle_fee: TokenAmount::one_token(),
            database_url: String::default(),
        }
    }
}

impl GatewayConfig {
    pub fn new(gateway_address: Address, owner_address: Address) -> Self {
        Self { gateway_address, owner_address, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let gateway_address = env::var("FGW_GATEWAY_ADDRESS")
            .map(Address::from)
            .unwrap_or_else(|_| Address::from(DEFAULT_GATEWAY_ADDRESS));
        let owner_address =
            env::var("FGW_OWNER_ADDRESS").map(Address::from).unwrap_or_else(|_| Address::from(DEFAULT_OWNER_ADDRESS));
        let fee_token =
            env::var("FGW_FEE_TOKEN").map(AssetId::from).unwrap_or_else(|_| AssetId::from(FEE_TOKEN_CODE));
        let oracle_fee = env::var("FGW_ORACLE_FEE")
            .ok()
            .map(|s| {
                s.parse::<i64>().map(TokenAmount::from).unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid base-unit amount for FGW_ORACLE_FEE. {e} Using the default of one \
                         token instead."
                    );
                    TokenAmount::one_token()
                })
            })
            .unwrap_or_else(TokenAmount::one_token);
        let database_url = env::var("FGW_DATABASE_URL").unwrap_or_else(|_| {
            info!("FGW_DATABASE_URL is not set. Using the default.");
            String::default()
        });
        Self { gateway_address, owner_address, fee_token, oracle_fee, database_url }
    }
}
