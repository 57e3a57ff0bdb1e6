use crate::db_types::{Address, AssetId, BuyOrder, Maker, OrderStatusType, RequestId};

/// What a consumed oracle request did to its subject.
#[derive(Debug, Clone, PartialEq)]
pub enum FulfillmentOutcome {
    /// The registration request verified positively; the maker is now active.
    MakerActivated(Maker),
    /// The oracle reported a negative verification. The request is consumed, the maker stays inactive.
    MakerActivationDeclined(i64),
    /// Audit checkpoint for order creation. The order fields were fixed at creation; nothing changes.
    OrderRegistered(BuyOrder),
    /// Fiat receipt confirmed. The order is settled and escrow must be released to the taker.
    OrderSettled(BuyOrder),
    /// The oracle reported a negative payment verification. The request is consumed, the order stays put.
    SettlementDeclined(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConsumeResult {
    Consumed(FulfillmentOutcome),
    /// No pending request with that id: never issued, already consumed, or voided by a cancellation.
    NotFound,
    /// A pending request exists, but the caller is not the oracle it is bound to. The row is left untouched.
    WrongOracle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceResult {
    Advanced(BuyOrder),
    NotFound,
    WrongStatus(OrderStatusType),
    /// A prior request for this order is still unconsumed, so no new lifecycle request may be issued.
    RequestPending(RequestId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CancelResult {
    Cancelled(BuyOrder),
    NotFound,
    NotCancellable(OrderStatusType),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReissueResult {
    Issued,
    NotFound,
    /// Maker reissue only makes sense while the maker is still inactive.
    AlreadyActive,
    /// Order reissue only makes sense in the status matching the requested callback.
    WrongStatus(OrderStatusType),
    RequestPending(RequestId),
}

//--------------------------------------  OrderQueryFilter   ---------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct OrderQueryFilter {
    pub taker: Option<Address>,
    pub method_id: Option<i64>,
    pub maker_id: Option<i64>,
    pub crypto: Option<AssetId>,
    pub fiat: Option<String>,
    pub statuses: Vec<OrderStatusType>,
}

impl OrderQueryFilter {
    pub fn with_taker(mut self, taker: Address) -> Self {
        self.taker = Some(taker);
        self
    }

    pub fn with_method_id(mut self, method_id: i64) -> Self {
        self.method_id = Some(method_id);
        self
    }

    pub fn with_maker_id(mut self, maker_id: i64) -> Self {
        self.maker_id = Some(maker_id);
        self
    }

    pub fn with_crypto(mut self, crypto: AssetId) -> Self {
        self.crypto = Some(crypto);
        self
    }

    pub fn with_fiat<S: Into<String>>(mut self, fiat: S) -> Self {
        self.fiat = Some(fiat.into());
        self
    }

    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.statuses.push(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.taker.is_none() &&
            self.method_id.is_none() &&
            self.maker_id.is_none() &&
            self.crypto.is_none() &&
            self.fiat.is_none() &&
            self.statuses.is_empty()
    }
}
