use fgw_common::TokenAmount;
use serde::{Deserialize, Serialize};

use crate::db_types::{Address, BuyOrder, FiatPaymentMethod, JobId, Maker, RequestId};

//-------------------------------------- OracleRequestEnvelope -------------------------------------------------------
/// The structured request handed to the oracle network. Integrators relay this to the oracle node; the node calls
/// back into the gateway with the `request_id` and its verification result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleRequestEnvelope {
    pub request_id: RequestId,
    /// Where the fulfillment must be delivered: the gateway itself.
    pub callback_addr: Address,
    /// The oracle trusted to fulfill this request. Fulfillments from anyone else are rejected.
    pub oracle_addr: Address,
    /// Selects the off-chain verification script the oracle runs.
    pub job_id: JobId,
    /// The fee paid to the oracle for running the job, already debited from the gateway.
    pub fee: TokenAmount,
    /// Job-specific parameters (payment destination, credentials reference, order details).
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleRequestEvent {
    pub request: OracleRequestEnvelope,
}

impl OracleRequestEvent {
    pub fn new(request: OracleRequestEnvelope) -> Self {
        Self { request }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodAddedEvent {
    pub method: FiatPaymentMethod,
}

impl MethodAddedEvent {
    pub fn new(method: FiatPaymentMethod) -> Self {
        Self { method }
    }
}

/// Emitted when a maker registers. Carries the embedded oracle request so observers see the registration and its
/// verification request as one acknowledgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MakerRegisteredEvent {
    pub maker: Maker,
    pub request: OracleRequestEnvelope,
}

impl MakerRegisteredEvent {
    pub fn new(maker: Maker, request: OracleRequestEnvelope) -> Self {
        Self { maker, request }
    }
}

/// Emitted when a buy order is created, with the embedded registration request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreatedEvent {
    pub order: BuyOrder,
    pub request: OracleRequestEnvelope,
}

impl OrderCreatedEvent {
    pub fn new(order: BuyOrder, request: OracleRequestEnvelope) -> Self {
        Self { order, request }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSettledEvent {
    pub order: BuyOrder,
}

impl OrderSettledEvent {
    pub fn new(order: BuyOrder) -> Self {
        Self { order }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCancelledEvent {
    pub order: BuyOrder,
}

impl OrderCancelledEvent {
    pub fn new(order: BuyOrder) -> Self {
        Self { order }
    }
}
