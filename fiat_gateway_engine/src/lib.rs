//! # Fiat Gateway Engine
//!
//! The Fiat Gateway Engine is the core of a peer-to-peer fiat↔crypto exchange gateway. Market makers register to
//! sell a crypto asset for a fiat currency over a named payment rail (WeChat, bank transfer, ...), buyers open
//! escrowed buy orders against them, and an external oracle network bridges the off-chain payment confirmations
//! back into the order state machine. This library is provider-agnostic: the oracle network and the fungible
//! token ledger are consumed strictly through their request/response and transfer contracts.
//!
//! The library is divided into three main sections:
//! 1. Database management and control ([`mod@db_types`] plus the backend traits). Sqlite is the supported
//!    backend. You should never need to access the database directly; use the public API instead. The exception
//!    is the data types used in the database, which are public.
//! 2. The gateway public API ([`GatewayApi`]). This provides the public-facing functionality: the payment-method
//!    registry, maker onboarding, the buy-order state machine, oracle request fulfillment and the administrative
//!    operations.
//! 3. Events ([`mod@events`]). The gateway's only outbound channel. Integrators subscribe hooks to relay oracle
//!    request envelopes to the oracle network and to observe registrations, orders and settlements.
mod db;

pub mod db_types;
pub mod events;
mod gwe_api;
pub mod helpers;
pub mod ledger;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use db::traits::{
    AdvanceResult,
    CancelResult,
    ConsumeResult,
    FulfillmentOutcome,
    GatewayDatabase,
    OrderManagement,
    OrderQueryFilter,
    RegistryManagement,
    ReissueResult,
    RequestTracking,
};
pub use gwe_api::{
    config::GatewayConfig,
    errors::GatewayApiError,
    gateway_api::{GatewayApi, RequestSubject},
};
