use crate::{db::traits::OrderQueryFilter, db_types::BuyOrder};

/// Read access to buy orders.
#[allow(async_fn_in_trait)]
pub trait OrderManagement: Clone {
    type Error: std::error::Error;

    async fn fetch_order(&self, id: i64) -> Result<Option<BuyOrder>, Self::Error>;

    /// Fetches orders matching the given filter, ordered by creation time ascending.
    async fn fetch_orders(&self, filter: OrderQueryFilter) -> Result<Vec<BuyOrder>, Self::Error>;
}
