//! The external fungible-token ledger contract.
//!
//! The gateway never holds balances itself; fee debits, escrow locks and settlement releases are all delegated to
//! a ledger that implements [`FungibleLedger`]. Production deployments bind this to the chain's token ledger.
//! [`MemoryLedger`] is the in-process reference implementation, used by the test suite and by integrators who
//! want to drive the gateway without a chain.
mod memory;

use fgw_common::TokenAmount;
pub use memory::MemoryLedger;
use thiserror::Error;

use crate::db_types::{Address, AssetId};

#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("{holder} holds {available} of {asset}, but {required} is needed")]
    InsufficientFunds { asset: AssetId, holder: Address, required: TokenAmount, available: TokenAmount },
    #[error("Transfer amounts must be positive, got {0}")]
    NonPositiveAmount(TokenAmount),
}

/// Minimal fund-transfer and balance-tracking contract, covering both the oracle fee token and traded crypto
/// assets (the native asset included, under its sentinel id).
#[allow(async_fn_in_trait)]
pub trait FungibleLedger: Clone {
    type Error: std::error::Error;

    async fn balance_of(&self, asset: &AssetId, holder: &Address) -> Result<TokenAmount, Self::Error>;

    /// Moves `amount` of `asset` from `from` to `to`. Fails without any balance change when `from` holds less
    /// than `amount`.
    async fn transfer(
        &self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), Self::Error>;
}
