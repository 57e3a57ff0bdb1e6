use crate::db_types::{AssetId, FiatPaymentMethod, Maker};

/// Read access to the payment-method and maker registries.
#[allow(async_fn_in_trait)]
pub trait RegistryManagement: Clone {
    type Error: std::error::Error;

    /// Fetches the payment method at the given index. `None` when the index was never assigned.
    async fn fetch_payment_method(&self, id: i64) -> Result<Option<FiatPaymentMethod>, Self::Error>;

    /// All registered payment methods, in registration order.
    async fn fetch_payment_methods(&self) -> Result<Vec<FiatPaymentMethod>, Self::Error>;

    async fn fetch_maker(&self, id: i64) -> Result<Option<Maker>, Self::Error>;

    /// All registered makers, in registration order.
    async fn fetch_makers(&self) -> Result<Vec<Maker>, Self::Error>;

    /// Resolves the active maker offering the (crypto, fiat) pair under the given payment method.
    ///
    /// When the registry holds more than one match, the first by registration order wins. That tie-break is a
    /// documented policy, not an accident of the query.
    async fn active_maker_for_pair(
        &self,
        method_id: i64,
        crypto: &AssetId,
        fiat: &str,
    ) -> Result<Option<Maker>, Self::Error>;
}
