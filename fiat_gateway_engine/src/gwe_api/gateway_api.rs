use std::{
    fmt::{Debug, Display},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use fgw_common::TokenAmount;
use log::*;
use serde_json::json;

use crate::{
    db::traits::{
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
    },
    db_types::{
        Address,
        AssetId,
        BuyOrder,
        FiatPaymentMethod,
        JobId,
        Maker,
        NewBuyOrder,
        NewFiatPaymentMethod,
        NewMaker,
        NewOracleRequest,
        OracleRequest,
        OrderStatusType,
        RequestCallback,
        RequestId,
    },
    events::{
        EventProducers,
        MakerRegisteredEvent,
        MethodAddedEvent,
        OracleRequestEnvelope,
        OracleRequestEvent,
        OrderCancelledEvent,
        OrderCreatedEvent,
        OrderSettledEvent,
    },
    gwe_api::{config::GatewayConfig, errors::GatewayApiError},
    helpers::derive_request_id,
    ledger::FungibleLedger,
};

/// Which pending-request subject an administrative re-request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSubject {
    Maker(i64),
    Order(i64),
}

/// `GatewayApi` is the primary API for the gateway: payment-method registration, maker onboarding, the buy-order
/// state machine, and the oracle request/fulfillment bridge that drives both.
///
/// Authorization is explicit capability checking: privileged operations compare the caller against the configured
/// owner, and fulfillments compare the caller against the oracle bound to the pending request. There are no
/// ambient roles.
pub struct GatewayApi<B, L> {
    db: B,
    ledger: L,
    config: GatewayConfig,
    producers: EventProducers,
    nonce: Arc<AtomicU64>,
}

impl<B, L> Debug for GatewayApi<B, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GatewayApi ({})", self.config.gateway_address)
    }
}

impl<B, L> GatewayApi<B, L> {
    pub fn new(db: B, ledger: L, config: GatewayConfig, producers: EventProducers) -> Self {
        // Seeding the nonce randomly keeps request-id sequences from different deployments disjoint even for the
        // same gateway address.
        let nonce = Arc::new(AtomicU64::new(rand::random()));
        Self { db, ledger, config, producers, nonce }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    fn assert_owner(&self, caller: &Address) -> Result<(), GatewayApiError> {
        if caller != &self.config.owner_address {
            warn!("🔐️ [{caller}] attempted an owner-only operation");
            return Err(GatewayApiError::Unauthorized);
        }
        Ok(())
    }

    fn next_request(
        &self,
        oracle_addr: &Address,
        job_id: &JobId,
        callback: RequestCallback,
        payload: serde_json::Value,
    ) -> (NewOracleRequest, OracleRequestEnvelope) {
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        let request_id = derive_request_id(&self.config.gateway_address, nonce);
        let fee = self.config.oracle_fee;
        let request = NewOracleRequest::new(request_id.clone(), oracle_addr.clone(), job_id.clone(), callback, fee);
        let envelope = OracleRequestEnvelope {
            request_id,
            callback_addr: self.config.gateway_address.clone(),
            oracle_addr: oracle_addr.clone(),
            job_id: job_id.clone(),
            fee,
            payload,
        };
        (request, envelope)
    }
}

fn db_err<E: Display>(e: E) -> GatewayApiError {
    GatewayApiError::DatabaseError(e.to_string())
}

fn ledger_err<E: Display>(e: E) -> GatewayApiError {
    GatewayApiError::LedgerError(e.to_string())
}

/// An oracle response counts as a positive verification when it carries any non-zero byte. Empty responses and
/// all-zero words are negative results.
fn response_is_positive(response: &[u8]) -> bool {
    response.iter().any(|b| *b != 0)
}

fn maker_payload(crypto: &AssetId, fiat: &str, payment_destination: &str, api_creds_hash: &str) -> serde_json::Value {
    json!({
        "crypto": crypto,
        "fiat": fiat,
        "payment_destination": payment_destination,
        "api_creds_hash": api_creds_hash,
    })
}

fn order_payload(order: &BuyOrder, maker: &Maker) -> serde_json::Value {
    json!({
        "order_id": order.id,
        "taker": order.taker,
        "crypto": order.crypto,
        "fiat": order.fiat,
        "amount": order.amount,
        "payment_destination": maker.payment_destination,
        "api_creds_hash": maker.api_creds_hash,
    })
}

fn order_creation_payload(order: &NewBuyOrder, maker: &Maker) -> serde_json::Value {
    json!({
        "taker": order.taker,
        "crypto": order.crypto,
        "fiat": order.fiat,
        "amount": order.amount,
        "payment_destination": maker.payment_destination,
        "api_creds_hash": maker.api_creds_hash,
    })
}

impl<B, L> GatewayApi<B, L>
where
    B: GatewayDatabase + RegistryManagement + OrderManagement + RequestTracking,
    L: FungibleLedger,
{
    //--------------------------------- Payment method registry ------------------------------------------------------

    /// Appends a new fiat payment method to the registry. Owner-only.
    ///
    /// Methods are immutable once added; there is no update or removal operation. Returns the assigned index.
    pub async fn add_fiat_payment_method(
        &self,
        caller: &Address,
        method: NewFiatPaymentMethod,
    ) -> Result<i64, GatewayApiError> {
        self.assert_owner(caller)?;
        let method_id = self.db.insert_payment_method(method).await.map_err(db_err)?;
        let method = self
            .db
            .fetch_payment_method(method_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| GatewayApiError::DatabaseError(format!("method #{method_id} missing after insert")))?;
        info!("💳️ Payment method \"{}\" added with index {method_id}", method.display_name);
        for producer in &self.producers.method_added_producer {
            producer.publish_event(MethodAddedEvent::new(method.clone())).await;
        }
        Ok(method_id)
    }

    pub async fn fetch_payment_method(&self, method_id: i64) -> Result<FiatPaymentMethod, GatewayApiError> {
        self.db
            .fetch_payment_method(method_id)
            .await
            .map_err(db_err)?
            .ok_or(GatewayApiError::MethodNotFound(method_id))
    }

    pub async fn fetch_payment_methods(&self) -> Result<Vec<FiatPaymentMethod>, GatewayApiError> {
        self.db.fetch_payment_methods().await.map_err(db_err)
    }

    //--------------------------------------- Maker registry ---------------------------------------------------------

    /// Registers the caller as a maker for one (crypto, fiat) pair under an existing payment method.
    ///
    /// The maker is created inactive and a "new maker" oracle request is dispatched, funded from the gateway's
    /// fee balance (pre-funded by the caller). The maker becomes active if and only if the bound oracle fulfills
    /// that request positively. Returns the assigned maker id.
    pub async fn register_maker(&self, caller: &Address, maker: NewMaker) -> Result<i64, GatewayApiError> {
        let method = self.fetch_payment_method(maker.method_id).await?;
        // The caller becomes the maker, whatever address the submitted record carried.
        let maker = NewMaker { maker_addr: caller.clone(), ..maker };
        let payload = maker_payload(&maker.crypto, &maker.fiat, &maker.payment_destination, &maker.api_creds_hash);
        let (request, envelope) =
            self.next_request(&method.oracle_addr, &method.new_maker_job_id, RequestCallback::ActivateMaker, payload);
        self.debit_fee(&method.oracle_addr).await?;
        let maker_id = match self.db.create_maker_with_request(maker, request).await {
            Ok(id) => id,
            Err(e) => {
                // The oracle never saw this request, so the fee comes back.
                self.claw_back_fee(&method.oracle_addr).await;
                return Err(db_err(e));
            },
        };
        let maker = self
            .db
            .fetch_maker(maker_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| GatewayApiError::DatabaseError(format!("maker #{maker_id} missing after insert")))?;
        debug!(
            "🤝️ Maker #{maker_id} [{}] registered for {}/{} pending oracle verification",
            maker.maker_addr, maker.crypto, maker.fiat
        );
        for producer in &self.producers.maker_registered_producer {
            producer.publish_event(MakerRegisteredEvent::new(maker.clone(), envelope.clone())).await;
        }
        self.publish_request(envelope).await;
        Ok(maker_id)
    }

    pub async fn fetch_maker(&self, maker_id: i64) -> Result<Maker, GatewayApiError> {
        self.db.fetch_maker(maker_id).await.map_err(db_err)?.ok_or(GatewayApiError::MakerNotFound(maker_id))
    }

    pub async fn fetch_makers(&self) -> Result<Vec<Maker>, GatewayApiError> {
        self.db.fetch_makers().await.map_err(db_err)
    }

    //----------------------------------------- Order engine ---------------------------------------------------------

    /// Creates a buy order for `amount` of `crypto` against the active maker covering the pair under the given
    /// payment method.
    ///
    /// The amount is locked into escrow from the caller atomically with order creation, and the order-registration
    /// oracle job is dispatched before the call returns, advancing the order to `AwaitingPayment`. Returns the
    /// assigned order id.
    pub async fn create_buy_order(&self, caller: &Address, order: NewBuyOrder) -> Result<i64, GatewayApiError> {
        if !order.amount.is_positive() {
            return Err(GatewayApiError::InvalidAmount(order.amount));
        }
        let method = self.fetch_payment_method(order.method_id).await?;
        let maker = self
            .db
            .active_maker_for_pair(order.method_id, &order.crypto, &order.fiat)
            .await
            .map_err(db_err)?
            .ok_or_else(|| GatewayApiError::NoActiveMaker {
                method_id: order.method_id,
                crypto: order.crypto.clone(),
                fiat: order.fiat.clone(),
            })?;
        let order = NewBuyOrder { taker: caller.clone(), ..order };
        let payload = order_creation_payload(&order, &maker);
        let (request, envelope) =
            self.next_request(&method.oracle_addr, &method.buy_order_job_id, RequestCallback::RegisterOrder, payload);

        // Checking the fee balance before locking escrow keeps the common failure cheap to unwind.
        self.check_fee_balance().await?;
        self.ledger
            .transfer(&order.crypto, &order.taker, &self.config.gateway_address, order.amount)
            .await
            .map_err(ledger_err)?;
        if let Err(e) = self.debit_fee(&method.oracle_addr).await {
            self.return_funds(&order.crypto, &order.taker, order.amount, "escrow").await;
            return Err(e);
        }
        let order_id = match self.db.create_order_with_request(order.clone(), maker.id, request).await {
            Ok(id) => id,
            Err(e) => {
                self.return_funds(&order.crypto, &order.taker, order.amount, "escrow").await;
                self.claw_back_fee(&method.oracle_addr).await;
                return Err(db_err(e));
            },
        };
        let order = self
            .db
            .fetch_order(order_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| GatewayApiError::DatabaseError(format!("order #{order_id} missing after insert")))?;
        debug!(
            "📦️ Order #{order_id}: [{}] buys {} of {} for {} via maker #{}",
            order.taker, order.amount, order.crypto, order.fiat, order.maker_id
        );
        for producer in &self.producers.order_created_producer {
            producer.publish_event(OrderCreatedEvent::new(order.clone(), envelope.clone())).await;
        }
        self.publish_request(envelope).await;
        Ok(order_id)
    }

    /// The taker asserts the off-chain fiat payment has been sent. Dispatches the payment-confirmation oracle job
    /// and advances the order from `AwaitingPayment` to `Paid`.
    ///
    /// Refused while the order-registration request is still outstanding: one order never has more than one
    /// oracle request in flight.
    pub async fn confirm_fiat_sent(&self, caller: &Address, order_id: i64) -> Result<BuyOrder, GatewayApiError> {
        let order = self.fetch_order(order_id).await?;
        if caller != &order.taker {
            warn!("🔐️ [{caller}] tried to confirm payment on order #{order_id}, which belongs to [{}]", order.taker);
            return Err(GatewayApiError::Unauthorized);
        }
        let method = self.fetch_payment_method(order.method_id).await?;
        let maker = self.fetch_maker(order.maker_id).await?;
        let payload = order_payload(&order, &maker);
        let (request, envelope) =
            self.next_request(&method.oracle_addr, &method.order_paid_job_id, RequestCallback::SettleOrder, payload);
        self.debit_fee(&method.oracle_addr).await?;
        let result = match self.db.advance_order_with_request(order_id, request).await {
            Ok(result) => result,
            Err(e) => {
                self.claw_back_fee(&method.oracle_addr).await;
                return Err(db_err(e));
            },
        };
        let order = match result {
            AdvanceResult::Advanced(order) => order,
            refused => {
                self.claw_back_fee(&method.oracle_addr).await;
                return Err(match refused {
                    AdvanceResult::NotFound => GatewayApiError::OrderNotFound(order_id),
                    AdvanceResult::WrongStatus(status) => GatewayApiError::InvalidOrderStatus { id: order_id, status },
                    AdvanceResult::RequestPending(request_id) => GatewayApiError::RequestPending(request_id),
                    AdvanceResult::Advanced(_) => unreachable!("handled above"),
                });
            },
        };
        debug!("📦️ Order #{order_id} marked Paid, payment-confirmation job dispatched");
        self.publish_request(envelope).await;
        Ok(order)
    }

    /// Cancels an order that has not reached `Paid`. Callable by the order's maker or the gateway owner.
    ///
    /// The escrowed crypto is refunded to the taker and any outstanding oracle request for the order is voided,
    /// so a late fulfillment fails with an unknown-request error instead of resurrecting the order.
    pub async fn cancel_order(&self, caller: &Address, order_id: i64) -> Result<BuyOrder, GatewayApiError> {
        let order = self.fetch_order(order_id).await?;
        let maker = self.fetch_maker(order.maker_id).await?;
        if caller != &maker.maker_addr && caller != &self.config.owner_address {
            warn!("🔐️ [{caller}] is neither the maker nor the owner of order #{order_id}");
            return Err(GatewayApiError::Unauthorized);
        }
        let order = match self.db.cancel_order(order_id).await.map_err(db_err)? {
            CancelResult::Cancelled(order) => order,
            CancelResult::NotFound => return Err(GatewayApiError::OrderNotFound(order_id)),
            CancelResult::NotCancellable(status) => {
                return Err(GatewayApiError::OrderNotCancellable { id: order_id, status })
            },
        };
        self.ledger
            .transfer(&order.crypto, &self.config.gateway_address, &order.taker, order.amount)
            .await
            .map_err(|e| {
                error!("📦️ Order #{order_id} cancelled but the escrow refund failed: {e}. Manual intervention needed.");
                ledger_err(e)
            })?;
        info!("📦️ Order #{order_id} cancelled by [{caller}], escrow refunded to [{}]", order.taker);
        for producer in &self.producers.order_cancelled_producer {
            producer.publish_event(OrderCancelledEvent::new(order.clone())).await;
        }
        Ok(order)
    }

    pub async fn fetch_order(&self, order_id: i64) -> Result<BuyOrder, GatewayApiError> {
        self.db.fetch_order(order_id).await.map_err(db_err)?.ok_or(GatewayApiError::OrderNotFound(order_id))
    }

    pub async fn fetch_orders(&self, filter: OrderQueryFilter) -> Result<Vec<BuyOrder>, GatewayApiError> {
        self.db.fetch_orders(filter).await.map_err(db_err)
    }

    //------------------------------------ Oracle request bridge -----------------------------------------------------

    /// Entry point for the oracle network. Consumes the pending request and applies the transition it was bound
    /// to, exactly once.
    ///
    /// Only the oracle address recorded with the request may call this; anyone else gets `Unauthorized` and the
    /// request stays pending. A request id that is not pending — never issued, already consumed, or voided by a
    /// cancellation — fails with `UnknownRequest`, which is also what makes replay attempts harmless.
    pub async fn fulfill_request(
        &self,
        caller: &Address,
        request_id: &RequestId,
        response: &[u8],
    ) -> Result<FulfillmentOutcome, GatewayApiError> {
        let positive = response_is_positive(response);
        let outcome = match self.db.consume_request(request_id, caller, positive).await.map_err(db_err)? {
            ConsumeResult::Consumed(outcome) => outcome,
            ConsumeResult::NotFound => return Err(GatewayApiError::UnknownRequest(request_id.clone())),
            ConsumeResult::WrongOracle => {
                warn!("🔐️ [{caller}] tried to fulfill request {request_id}, which is bound to a different oracle");
                return Err(GatewayApiError::Unauthorized);
            },
        };
        match &outcome {
            FulfillmentOutcome::MakerActivated(maker) => {
                info!("🔮️ Maker #{} [{}] verified and activated", maker.id, maker.maker_addr);
            },
            FulfillmentOutcome::MakerActivationDeclined(maker_id) => {
                warn!("🔮️ Oracle declined maker #{maker_id}. The maker stays inactive; the owner may re-request.");
            },
            FulfillmentOutcome::OrderRegistered(order) => {
                debug!("🔮️ Order #{} registration confirmed off-chain", order.id);
            },
            FulfillmentOutcome::OrderSettled(order) => {
                self.ledger
                    .transfer(&order.crypto, &self.config.gateway_address, &order.taker, order.amount)
                    .await
                    .map_err(|e| {
                        error!(
                            "🔮️ Order #{} settled but the escrow release failed: {e}. Manual intervention needed.",
                            order.id
                        );
                        ledger_err(e)
                    })?;
                info!("🔮️ Order #{} settled. {} of {} released to [{}]", order.id, order.amount, order.crypto, order.taker);
                for producer in &self.producers.order_settled_producer {
                    producer.publish_event(OrderSettledEvent::new(order.clone())).await;
                }
            },
            FulfillmentOutcome::SettlementDeclined(order_id) => {
                warn!("🔮️ Oracle declined payment confirmation for order #{order_id}. The owner may re-request.");
            },
        }
        Ok(outcome)
    }

    /// Re-issues the oracle request for a subject whose previous request was consumed without effect — a maker
    /// left inactive by a negative verification, or an order stuck in `AwaitingPayment` or `Paid`. Owner-only.
    ///
    /// The core never retries on its own; this is the explicit recovery path. Refused while a request for the
    /// subject is still outstanding. Returns the new request id.
    pub async fn reissue_request(
        &self,
        caller: &Address,
        subject: RequestSubject,
    ) -> Result<RequestId, GatewayApiError> {
        self.assert_owner(caller)?;
        match subject {
            RequestSubject::Maker(maker_id) => {
                let maker = self.fetch_maker(maker_id).await?;
                if maker.active {
                    return Err(GatewayApiError::MakerAlreadyActive(maker_id));
                }
                let method = self.fetch_payment_method(maker.method_id).await?;
                let payload =
                    maker_payload(&maker.crypto, &maker.fiat, &maker.payment_destination, &maker.api_creds_hash);
                let (request, envelope) = self.next_request(
                    &method.oracle_addr,
                    &method.new_maker_job_id,
                    RequestCallback::ActivateMaker,
                    payload,
                );
                self.debit_fee(&method.oracle_addr).await?;
                let result = match self.db.reissue_maker_request(maker_id, request).await {
                    Ok(result) => result,
                    Err(e) => {
                        self.claw_back_fee(&method.oracle_addr).await;
                        return Err(db_err(e));
                    },
                };
                self.finish_reissue(result, envelope, &method.oracle_addr, maker_id, || {
                    GatewayApiError::MakerNotFound(maker_id)
                })
                .await
            },
            RequestSubject::Order(order_id) => {
                let order = self.fetch_order(order_id).await?;
                let method = self.fetch_payment_method(order.method_id).await?;
                let maker = self.fetch_maker(order.maker_id).await?;
                let (job_id, callback) = match order.status {
                    OrderStatusType::AwaitingPayment => (&method.buy_order_job_id, RequestCallback::RegisterOrder),
                    OrderStatusType::Paid => (&method.order_paid_job_id, RequestCallback::SettleOrder),
                    status => return Err(GatewayApiError::InvalidOrderStatus { id: order_id, status }),
                };
                let payload = order_payload(&order, &maker);
                let (request, envelope) = self.next_request(&method.oracle_addr, job_id, callback, payload);
                self.debit_fee(&method.oracle_addr).await?;
                let result = match self.db.reissue_order_request(order_id, request).await {
                    Ok(result) => result,
                    Err(e) => {
                        self.claw_back_fee(&method.oracle_addr).await;
                        return Err(db_err(e));
                    },
                };
                self.finish_reissue(result, envelope, &method.oracle_addr, order_id, || {
                    GatewayApiError::OrderNotFound(order_id)
                })
                .await
            },
        }
    }

    pub async fn fetch_pending_request(&self, request_id: &RequestId) -> Result<Option<OracleRequest>, GatewayApiError> {
        self.db.fetch_pending_request(request_id).await.map_err(db_err)
    }

    pub async fn pending_request_for_maker(&self, maker_id: i64) -> Result<Option<OracleRequest>, GatewayApiError> {
        self.db.pending_request_for_maker(maker_id).await.map_err(db_err)
    }

    pub async fn pending_request_for_order(&self, order_id: i64) -> Result<Option<OracleRequest>, GatewayApiError> {
        self.db.pending_request_for_order(order_id).await.map_err(db_err)
    }

    //------------------------------------------ Withdrawal ----------------------------------------------------------

    /// Transfers the gateway's entire fee-token balance to the owner. Owner-only.
    pub async fn withdraw_fee_tokens(&self, caller: &Address) -> Result<TokenAmount, GatewayApiError> {
        self.assert_owner(caller)?;
        let balance = self
            .ledger
            .balance_of(&self.config.fee_token, &self.config.gateway_address)
            .await
            .map_err(ledger_err)?;
        if !balance.is_positive() {
            return Err(GatewayApiError::NothingToWithdraw);
        }
        self.ledger
            .transfer(&self.config.fee_token, &self.config.gateway_address, &self.config.owner_address, balance)
            .await
            .map_err(ledger_err)?;
        info!("💰️ Withdrew the gateway fee balance of {balance} to the owner");
        Ok(balance)
    }

    //-------------------------------------- Internal fee plumbing ---------------------------------------------------

    async fn check_fee_balance(&self) -> Result<(), GatewayApiError> {
        let required = self.config.oracle_fee;
        let available = self
            .ledger
            .balance_of(&self.config.fee_token, &self.config.gateway_address)
            .await
            .map_err(ledger_err)?;
        if available < required {
            return Err(GatewayApiError::InsufficientFee { required, available });
        }
        Ok(())
    }

    /// Pays the oracle fee for one request out of the gateway's own balance. Callers pre-fund this balance by
    /// transferring fee tokens to the gateway before invoking a request-dispatching operation.
    async fn debit_fee(&self, oracle_addr: &Address) -> Result<(), GatewayApiError> {
        self.check_fee_balance().await?;
        self.ledger
            .transfer(&self.config.fee_token, &self.config.gateway_address, oracle_addr, self.config.oracle_fee)
            .await
            .map_err(ledger_err)?;
        Ok(())
    }

    /// Best-effort compensation transfer out of the gateway after a partial failure (e.g. unwinding an escrow
    /// lock). A failure here is logged, not propagated: the primary error is what the caller needs to see.
    async fn return_funds(&self, asset: &AssetId, to: &Address, amount: TokenAmount, what: &str) {
        if let Err(e) = self.ledger.transfer(asset, &self.config.gateway_address, to, amount).await {
            error!("💰️ Could not return the {what} of {amount} ({asset}) to [{to}]: {e}");
        }
    }

    /// Pulls an already-paid oracle fee back into the gateway when the request it funded never made it onto the
    /// books. The oracle has not seen the request (no event is emitted on these paths), so the fee is not owed.
    async fn claw_back_fee(&self, oracle_addr: &Address) {
        let fee = self.config.oracle_fee;
        if let Err(e) =
            self.ledger.transfer(&self.config.fee_token, oracle_addr, &self.config.gateway_address, fee).await
        {
            error!("💰️ Could not recover the oracle fee of {fee} from [{oracle_addr}]: {e}");
        }
    }

    async fn publish_request(&self, envelope: OracleRequestEnvelope) {
        for producer in &self.producers.oracle_request_producer {
            producer.publish_event(OracleRequestEvent::new(envelope.clone())).await;
        }
    }

    async fn finish_reissue(
        &self,
        result: ReissueResult,
        envelope: OracleRequestEnvelope,
        oracle_addr: &Address,
        subject_id: i64,
        not_found: impl FnOnce() -> GatewayApiError,
    ) -> Result<RequestId, GatewayApiError> {
        match result {
            ReissueResult::Issued => {
                info!("🔮️ Re-issued oracle request {} for a stuck subject", envelope.request_id);
                let request_id = envelope.request_id.clone();
                self.publish_request(envelope).await;
                Ok(request_id)
            },
            refused => {
                self.claw_back_fee(oracle_addr).await;
                Err(match refused {
                    ReissueResult::NotFound => not_found(),
                    ReissueResult::AlreadyActive => GatewayApiError::MakerAlreadyActive(subject_id),
                    ReissueResult::WrongStatus(status) => {
                        GatewayApiError::InvalidOrderStatus { id: subject_id, status }
                    },
                    ReissueResult::RequestPending(request_id) => GatewayApiError::RequestPending(request_id),
                    ReissueResult::Issued => unreachable!("handled above"),
                })
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn response_positivity() {
        assert!(!response_is_positive(&[]));
        assert!(!response_is_positive(&[0u8; 32]));
        assert!(response_is_positive(&[0, 0, 1, 0]));
        assert!(response_is_positive(b"true"));
    }
}
