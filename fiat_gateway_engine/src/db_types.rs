use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use fgw_common::TokenAmount;
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

/// Sentinel asset identifier denoting the chain's native asset, used in place of a token contract address.
pub const NATIVE_ASSET_ID: &str = "native";

//--------------------------------------      Address        ---------------------------------------------------------
/// A lightweight wrapper around a string representing an on-chain identity (wallet, contract or oracle).
#[derive(Clone, Debug, Type, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Address(pub String);

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S: Into<String>> From<S> for Address {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------      AssetId        ---------------------------------------------------------
/// Identifies a fungible asset. Either a token contract address, or the [`NATIVE_ASSET_ID`] sentinel for the
/// chain's native asset.
#[derive(Clone, Debug, Type, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct AssetId(pub String);

impl Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S: Into<String>> From<S> for AssetId {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

impl AssetId {
    pub fn native() -> Self {
        Self(NATIVE_ASSET_ID.to_string())
    }

    pub fn is_native(&self) -> bool {
        self.0 == NATIVE_ASSET_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------       JobId         ---------------------------------------------------------
/// Identifies an off-chain verification script on the oracle network.
#[derive(Clone, Debug, Type, PartialEq, Eq, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct JobId(pub String);

impl Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S: Into<String>> From<S> for JobId {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

//--------------------------------------     RequestId       ---------------------------------------------------------
/// Correlation id for an outstanding oracle request. Derived from the gateway identity, a nonce and fresh entropy,
/// so ids are collision-resistant and unguessable by third parties.
#[derive(Clone, Debug, Type, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct RequestId(pub String);

impl FromStr for RequestId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------  OrderStatusType    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order row exists, but the creation oracle request has not been dispatched yet.
    Created,
    /// The creation request is out; the taker still has to send the fiat payment off-chain.
    AwaitingPayment,
    /// The taker asserts the fiat payment was sent. The payment-confirmation oracle job is out.
    Paid,
    /// Fiat receipt confirmed by the oracle. Escrowed crypto has been released to the taker.
    Settled,
    /// The order was cancelled before payment. Escrow has been refunded.
    Cancelled,
}

impl OrderStatusType {
    /// Terminal orders can never change status again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatusType::Settled | OrderStatusType::Cancelled)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Created => write!(f, "Created"),
            OrderStatusType::AwaitingPayment => write!(f, "AwaitingPayment"),
            OrderStatusType::Paid => write!(f, "Paid"),
            OrderStatusType::Settled => write!(f, "Settled"),
            OrderStatusType::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Created");
            OrderStatusType::Created
        })
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid conversion: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(Self::Created),
            "AwaitingPayment" => Ok(Self::AwaitingPayment),
            "Paid" => Ok(Self::Paid),
            "Settled" => Ok(Self::Settled),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------  RequestCallback    ---------------------------------------------------------
/// Which lifecycle transition an oracle fulfillment applies. Stored with the pending request, so a fulfillment
/// carries no authority of its own beyond the request it consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum RequestCallback {
    /// Flip the bound maker to active.
    ActivateMaker,
    /// Audit checkpoint confirming the order was registered off-chain. No state change.
    RegisterOrder,
    /// Confirm fiat receipt and release escrow for the bound order.
    SettleOrder,
}

impl RequestCallback {
    /// The callbacks whose subject id refers to a buy order (as opposed to a maker).
    pub fn order_callbacks() -> [RequestCallback; 2] {
        [RequestCallback::RegisterOrder, RequestCallback::SettleOrder]
    }
}

impl Display for RequestCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestCallback::ActivateMaker => write!(f, "ActivateMaker"),
            RequestCallback::RegisterOrder => write!(f, "RegisterOrder"),
            RequestCallback::SettleOrder => write!(f, "SettleOrder"),
        }
    }
}

impl FromStr for RequestCallback {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ActivateMaker" => Ok(Self::ActivateMaker),
            "RegisterOrder" => Ok(Self::RegisterOrder),
            "SettleOrder" => Ok(Self::SettleOrder),
            s => Err(ConversionError(format!("Invalid request callback: {s}"))),
        }
    }
}

impl From<String> for RequestCallback {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid request callback: {value}. But this conversion cannot fail. Defaulting to RegisterOrder");
            RequestCallback::RegisterOrder
        })
    }
}

//-------------------------------------- FiatPaymentMethod   ---------------------------------------------------------
/// A named fiat payment rail (e.g. "WeChat") together with the oracle and job scripts trusted to verify actions
/// against it. Immutable once created.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct FiatPaymentMethod {
    pub id: i64,
    pub display_name: String,
    pub oracle_addr: Address,
    pub new_maker_job_id: JobId,
    pub buy_order_job_id: JobId,
    pub order_paid_job_id: JobId,
    pub created_at: DateTime<Utc>,
}

//-------------------------------------- NewFiatPaymentMethod ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewFiatPaymentMethod {
    pub display_name: String,
    pub oracle_addr: Address,
    pub new_maker_job_id: JobId,
    pub buy_order_job_id: JobId,
    pub order_paid_job_id: JobId,
}

impl NewFiatPaymentMethod {
    pub fn new<S: Into<String>>(
        display_name: S,
        oracle_addr: Address,
        new_maker_job_id: JobId,
        buy_order_job_id: JobId,
        order_paid_job_id: JobId,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            oracle_addr,
            new_maker_job_id,
            buy_order_job_id,
            order_paid_job_id,
        }
    }
}

//--------------------------------------       Maker         ---------------------------------------------------------
/// A market maker offering one (crypto, fiat) pair over one payment method. Makers start out inactive and are
/// activated exactly once, by the oracle fulfillment bound to their registration request.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Maker {
    pub id: i64,
    pub maker_addr: Address,
    pub method_id: i64,
    pub crypto: AssetId,
    pub fiat: String,
    pub payment_destination: String,
    pub api_creds_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewMaker       ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewMaker {
    pub maker_addr: Address,
    pub method_id: i64,
    pub crypto: AssetId,
    /// Fiat currency code, e.g. "AUD". Free-form short string.
    pub fiat: String,
    /// Off-chain payment address or handle, e.g. an email address.
    pub payment_destination: String,
    /// Content-addressed reference to the maker's encrypted API credentials, used by the oracle job to act on the
    /// maker's behalf.
    pub api_creds_hash: String,
}

impl NewMaker {
    pub fn new<S: Into<String>>(maker_addr: Address, method_id: i64, crypto: AssetId, fiat: S) -> Self {
        Self {
            maker_addr,
            method_id,
            crypto,
            fiat: fiat.into(),
            payment_destination: String::default(),
            api_creds_hash: String::default(),
        }
    }

    pub fn with_payment_destination<S: Into<String>>(mut self, destination: S) -> Self {
        self.payment_destination = destination.into();
        self
    }

    pub fn with_api_creds_hash<S: Into<String>>(mut self, hash: S) -> Self {
        self.api_creds_hash = hash.into();
        self
    }
}

//--------------------------------------      BuyOrder       ---------------------------------------------------------
/// A taker's request to buy `amount` of `crypto` for `fiat`, settled against the resolved maker. The escrowed
/// crypto stays locked until the order reaches a terminal status.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct BuyOrder {
    pub id: i64,
    pub taker: Address,
    pub crypto: AssetId,
    pub fiat: String,
    pub amount: TokenAmount,
    pub method_id: i64,
    pub maker_id: i64,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------     NewBuyOrder     ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewBuyOrder {
    pub taker: Address,
    pub crypto: AssetId,
    pub fiat: String,
    pub amount: TokenAmount,
    pub method_id: i64,
}

impl NewBuyOrder {
    pub fn new<S: Into<String>>(taker: Address, crypto: AssetId, fiat: S, amount: TokenAmount, method_id: i64) -> Self {
        Self { taker, crypto, fiat: fiat.into(), amount, method_id }
    }
}

//--------------------------------------    OracleRequest    ---------------------------------------------------------
/// Tracking record for an outstanding oracle request. The row is deleted atomically with the state transition its
/// fulfillment triggers, which is what makes replay impossible.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OracleRequest {
    pub request_id: RequestId,
    pub oracle_addr: Address,
    pub job_id: JobId,
    pub callback: RequestCallback,
    /// Id of the maker or buy order this request concerns, depending on `callback`.
    pub subject_id: i64,
    pub fee: TokenAmount,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------  NewOracleRequest   ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOracleRequest {
    pub request_id: RequestId,
    pub oracle_addr: Address,
    pub job_id: JobId,
    pub callback: RequestCallback,
    pub fee: TokenAmount,
}

impl NewOracleRequest {
    pub fn new(request_id: RequestId, oracle_addr: Address, job_id: JobId, callback: RequestCallback, fee: TokenAmount) -> Self {
        Self { request_id, oracle_addr, job_id, callback, fee }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn order_status_round_trips() {
        for status in [
            OrderStatusType::Created,
            OrderStatusType::AwaitingPayment,
            OrderStatusType::Paid,
            OrderStatusType::Settled,
            OrderStatusType::Cancelled,
        ] {
            let s = status.to_string();
            assert_eq!(s.parse::<OrderStatusType>().unwrap(), status);
        }
        assert!("Pending".parse::<OrderStatusType>().is_err());
    }

    #[test]
    fn terminal_statuses() {
        assert!(OrderStatusType::Settled.is_terminal());
        assert!(OrderStatusType::Cancelled.is_terminal());
        assert!(!OrderStatusType::AwaitingPayment.is_terminal());
        assert!(!OrderStatusType::Paid.is_terminal());
    }

    #[test]
    fn callback_round_trips() {
        for cb in [RequestCallback::ActivateMaker, RequestCallback::RegisterOrder, RequestCallback::SettleOrder] {
            assert_eq!(cb.to_string().parse::<RequestCallback>().unwrap(), cb);
        }
        assert!("Fulfil".parse::<RequestCallback>().is_err());
    }

    #[test]
    fn native_asset_sentinel() {
        let native = AssetId::native();
        assert!(native.is_native());
        assert_eq!(native.as_str(), NATIVE_ASSET_ID);
        assert!(!AssetId::from("0xdeadbeef").is_native());
    }
}
