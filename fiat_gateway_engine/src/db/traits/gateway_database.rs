use crate::{
    db::traits::{AdvanceResult, CancelResult, ConsumeResult, ReissueResult},
    db_types::{Address, NewBuyOrder, NewFiatPaymentMethod, NewMaker, NewOracleRequest, RequestId},
};

/// This trait defines the highest level of behaviour for backends supporting the gateway engine.
///
/// Each method is a single atomic unit of work: the guard checks, the row mutations and the creation or
/// consumption of the oracle-request tracking record all commit together, or not at all. Callers (the API layer)
/// perform authorization and fee handling *before* invoking these methods, and emit events *after* they commit.
#[allow(async_fn_in_trait)]
pub trait GatewayDatabase: Clone {
    type Error: std::error::Error;

    /// The URL of the database
    fn url(&self) -> &str;

    /// Appends a new immutable fiat payment method and returns its assigned index.
    async fn insert_payment_method(&self, method: NewFiatPaymentMethod) -> Result<i64, Self::Error>;

    /// In a single transaction, creates an inactive maker record and the pending "new maker" oracle request bound
    /// to it. Returns the assigned maker id.
    async fn create_maker_with_request(&self, maker: NewMaker, request: NewOracleRequest) -> Result<i64, Self::Error>;

    /// In a single transaction, creates a buy order against the resolved maker and the pending order-registration
    /// request bound to it. The order is inserted as `Created` and advanced to `AwaitingPayment` in the same
    /// transaction, once the request row exists. Returns the assigned order id.
    async fn create_order_with_request(
        &self,
        order: NewBuyOrder,
        maker_id: i64,
        request: NewOracleRequest,
    ) -> Result<i64, Self::Error>;

    /// Advances an order from `AwaitingPayment` to `Paid` and records the pending payment-confirmation request, in
    /// one transaction. Refuses when the order is in any other status, or when a prior request for this order is
    /// still unconsumed.
    async fn advance_order_with_request(
        &self,
        order_id: i64,
        request: NewOracleRequest,
    ) -> Result<AdvanceResult, Self::Error>;

    /// Consumes the pending request with the given id and applies the bound transition, atomically.
    ///
    /// The row is checked against `caller` first; on a mismatch nothing is touched and
    /// [`ConsumeResult::WrongOracle`] is returned. On a match the row is deleted *in the same transaction* as the
    /// transition it triggers, so a second consumption of the same id can never succeed, regardless of how the
    /// callback itself went. A `positive == false` response still consumes the request but leaves the subject
    /// unchanged.
    async fn consume_request(
        &self,
        request_id: &RequestId,
        caller: &Address,
        positive: bool,
    ) -> Result<ConsumeResult, Self::Error>;

    /// Cancels an order that has not reached `Paid` yet, voiding any pending request bound to it in the same
    /// transaction. A fulfillment racing with the cancellation therefore finds no request row and fails upstream
    /// with an unknown-request error instead of resurrecting the order.
    async fn cancel_order(&self, order_id: i64) -> Result<CancelResult, Self::Error>;

    /// Records a fresh activation request for a maker whose previous request was consumed without activating it.
    /// Refuses when the maker is already active or still has a request outstanding.
    async fn reissue_maker_request(
        &self,
        maker_id: i64,
        request: NewOracleRequest,
    ) -> Result<ReissueResult, Self::Error>;

    /// Records a fresh lifecycle request for an order whose previous request was consumed without effect. The
    /// order's status must match the callback being reissued (`AwaitingPayment` for registration, `Paid` for
    /// settlement), and no request may be outstanding.
    async fn reissue_order_request(
        &self,
        order_id: i64,
        request: NewOracleRequest,
    ) -> Result<ReissueResult, Self::Error>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
