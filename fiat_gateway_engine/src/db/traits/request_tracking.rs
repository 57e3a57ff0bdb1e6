use crate::db_types::{OracleRequest, RequestId};

/// Read access to the outstanding oracle-request records.
///
/// These reads exist for integrators and diagnostics; fulfillment never goes through them. Consumption is part of
/// [`super::GatewayDatabase::consume_request`], where it is atomic with the transition it triggers.
#[allow(async_fn_in_trait)]
pub trait RequestTracking: Clone {
    type Error: std::error::Error;

    async fn fetch_pending_request(&self, request_id: &RequestId) -> Result<Option<OracleRequest>, Self::Error>;

    /// The unconsumed request bound to the given maker, if any.
    async fn pending_request_for_maker(&self, maker_id: i64) -> Result<Option<OracleRequest>, Self::Error>;

    /// The unconsumed request bound to the given order, if any.
    async fn pending_request_for_order(&self, order_id: i64) -> Result<Option<OracleRequest>, Self::Error>;
}
