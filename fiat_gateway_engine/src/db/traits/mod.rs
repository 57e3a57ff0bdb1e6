//! # Database management and control.
//!
//! This module provides the interface contracts that gateway database *backends* must implement.
//!
//! ## Registries
//! The gateway owns three append-only registries: fiat payment methods, makers and buy orders, plus the tracking
//! table of outstanding oracle requests. Indices are assigned monotonically and never reused. Nothing is ever
//! physically deleted except a consumed oracle-request row, so every id handed out (and every callback bound to
//! one) stays valid for the lifetime of the deployment.
//!
//! ## Traits
//! * [`GatewayDatabase`] defines the lifecycle mutations. Every method commits its guard checks and row changes in
//!   a single transaction, which is what gives the gateway its "no torn intermediate state" execution model.
//! * [`RegistryManagement`] defines read access to payment methods and makers.
//! * [`OrderManagement`] defines read access to buy orders.
//! * [`RequestTracking`] defines read access to outstanding oracle requests.
mod data_objects;
mod gateway_database;
mod order_management;
mod registry_management;
mod request_tracking;

pub use data_objects::{AdvanceResult, CancelResult, ConsumeResult, FulfillmentOutcome, OrderQueryFilter, ReissueResult};
pub use gateway_database::GatewayDatabase;
pub use order_management::OrderManagement;
pub use registry_management::RegistryManagement;
pub use request_tracking::RequestTracking;
