use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use fgw_common::TokenAmount;
use log::trace;

use crate::{
    db_types::{Address, AssetId},
    ledger::{FungibleLedger, LedgerError},
};

/// In-process [`FungibleLedger`] backed by a balance map. Transfers are serialized behind one lock, mirroring the
/// sequentially-consistent execution the real token ledger provides.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    balances: Arc<Mutex<HashMap<(AssetId, Address), TokenAmount>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` of `asset` to `holder` out of thin air. Test and bootstrap helper; the trait itself only
    /// ever moves existing balances.
    pub fn deposit(&self, asset: &AssetId, holder: &Address, amount: TokenAmount) {
        let mut balances = self.balances.lock().unwrap_or_else(|p| p.into_inner());
        let entry = balances.entry((asset.clone(), holder.clone())).or_default();
        *entry = *entry + amount;
        trace!("💎️ Deposited {amount} of {asset} to [{holder}]");
    }
}

impl FungibleLedger for MemoryLedger {
    type Error = LedgerError;

    async fn balance_of(&self, asset: &AssetId, holder: &Address) -> Result<TokenAmount, Self::Error> {
        let balances = self.balances.lock().unwrap_or_else(|p| p.into_inner());
        Ok(balances.get(&(asset.clone(), holder.clone())).copied().unwrap_or_default())
    }

    async fn transfer(
        &self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), Self::Error> {
        if !amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount(amount));
        }
        let mut balances = self.balances.lock().unwrap_or_else(|p| p.into_inner());
        let available = balances.get(&(asset.clone(), from.clone())).copied().unwrap_or_default();
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                asset: asset.clone(),
                holder: from.clone(),
                required: amount,
                available,
            });
        }
        balances.insert((asset.clone(), from.clone()), available - amount);
        let to_balance = balances.entry((asset.clone(), to.clone())).or_default();
        *to_balance = *to_balance + amount;
        trace!("💎️ Transferred {amount} of {asset} from [{from}] to [{to}]");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn transfer_moves_funds() {
        let ledger = MemoryLedger::new();
        let asset = AssetId::native();
        let alice = Address::from("alice");
        let bob = Address::from("bob");
        ledger.deposit(&asset, &alice, TokenAmount::from(1000));

        ledger.transfer(&asset, &alice, &bob, TokenAmount::from(400)).await.unwrap();
        assert_eq!(ledger.balance_of(&asset, &alice).await.unwrap(), TokenAmount::from(600));
        assert_eq!(ledger.balance_of(&asset, &bob).await.unwrap(), TokenAmount::from(400));
    }

    #[tokio::test]
    async fn transfer_fails_without_funds() {
        let ledger = MemoryLedger::new();
        let asset = AssetId::from("0xtoken");
        let alice = Address::from("alice");
        let bob = Address::from("bob");
        ledger.deposit(&asset, &alice, TokenAmount::from(10));

        let err = ledger.transfer(&asset, &alice, &bob, TokenAmount::from(11)).await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        // No partial debit.
        assert_eq!(ledger.balance_of(&asset, &alice).await.unwrap(), TokenAmount::from(10));
        assert_eq!(ledger.balance_of(&asset, &bob).await.unwrap(), TokenAmount::default());
    }

    #[tokio::test]
    async fn balances_are_per_asset() {
        let ledger = MemoryLedger::new();
        let alice = Address::from("alice");
        ledger.deposit(&AssetId::native(), &alice, TokenAmount::from(5));
        assert_eq!(ledger.balance_of(&AssetId::from("0xtoken"), &alice).await.unwrap(), TokenAmount::default());
    }
}
