use fgw_common::TokenAmount;
use thiserror::Error;

use crate::db_types::{AssetId, OrderStatusType, RequestId};

#[derive(Debug, Clone, Error)]
pub enum GatewayApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Ledger error: {0}")]
    LedgerError(String),
    #[error("Caller is not authorized to perform this operation")]
    Unauthorized,
    #[error("No fiat payment method with index {0}")]
    MethodNotFound(i64),
    #[error("No maker with id {0}")]
    MakerNotFound(i64),
    #[error("No buy order with id {0}")]
    OrderNotFound(i64),
    #[error("No active maker offers {crypto}/{fiat} under method {method_id}")]
    NoActiveMaker { method_id: i64, crypto: AssetId, fiat: String },
    #[error("Unknown oracle request: {0}")]
    UnknownRequest(RequestId),
    #[error("Request {0} for this subject is still outstanding")]
    RequestPending(RequestId),
    #[error("Order amounts must be positive, got {0}")]
    InvalidAmount(TokenAmount),
    #[error("The gateway fee balance of {available} is below the request fee of {required}")]
    InsufficientFee { required: TokenAmount, available: TokenAmount },
    #[error("Order {id} cannot be cancelled from status {status}")]
    OrderNotCancellable { id: i64, status: OrderStatusType },
    #[error("Order {id} does not accept this action in status {status}")]
    InvalidOrderStatus { id: i64, status: OrderStatusType },
    #[error("Maker {0} is already active")]
    MakerAlreadyActive(i64),
    #[error("The gateway holds no fee tokens to withdraw")]
    NothingToWithdraw,
}
