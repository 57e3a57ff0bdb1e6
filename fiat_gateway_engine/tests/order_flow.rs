use fgw_common::TokenAmount;
use fiat_gateway_engine::{
    db_types::{AssetId, JobId, NewBuyOrder, NewMaker, OrderStatusType, RequestCallback},
    FulfillmentOutcome,
    GatewayApiError,
    OrderQueryFilter,
    RequestSubject,
};

use crate::support::{
    new_gateway,
    TestGateway,
    BUY_ORDER_JOB_ID,
    NEGATIVE_RESPONSE,
    ORDER_PAID_JOB_ID,
    POSITIVE_RESPONSE,
};

mod support;

/// One whole native-asset unit, the order size exercised throughout (10^18 base units).
fn order_amount() -> TokenAmount {
    TokenAmount::one_token()
}

async fn gateway_with_active_maker() -> (TestGateway, i64, i64) {
    let gate = new_gateway().await;
    gate.fund_gateway_fees(10);
    let method_id = gate.add_wechat_method().await;
    let maker_id = gate.register_aud_maker(method_id).await;
    gate.activate_maker(maker_id).await;
    (gate, method_id, maker_id)
}

#[tokio::test]
async fn creation_requires_an_active_maker() {
    let gate = new_gateway().await;
    gate.fund_gateway_fees(10);
    let method_id = gate.add_wechat_method().await;

    // No maker at all.
    let order = NewBuyOrder::new(gate.buyer(), AssetId::native(), "AUD", order_amount(), method_id);
    let err = gate.api.create_buy_order(&gate.buyer(), order.clone()).await.unwrap_err();
    assert!(matches!(err, GatewayApiError::NoActiveMaker { .. }));

    // A registered but unverified maker does not count.
    let maker_id = gate.register_aud_maker(method_id).await;
    let err = gate.api.create_buy_order(&gate.buyer(), order.clone()).await.unwrap_err();
    assert!(matches!(err, GatewayApiError::NoActiveMaker { .. }));

    // A maker for a different pair does not count either.
    gate.activate_maker(maker_id).await;
    let usd_order = NewBuyOrder::new(gate.buyer(), AssetId::native(), "USD", order_amount(), method_id);
    let err = gate.api.create_buy_order(&gate.buyer(), usd_order).await.unwrap_err();
    assert!(matches!(err, GatewayApiError::NoActiveMaker { .. }));
}

#[tokio::test]
async fn creation_validates_amount_and_method() {
    let (gate, method_id, _) = gateway_with_active_maker().await;

    let zero = NewBuyOrder::new(gate.buyer(), AssetId::native(), "AUD", TokenAmount::default(), method_id);
    let err = gate.api.create_buy_order(&gate.buyer(), zero).await.unwrap_err();
    assert!(matches!(err, GatewayApiError::InvalidAmount(_)));

    let negative = NewBuyOrder::new(gate.buyer(), AssetId::native(), "AUD", TokenAmount::from(-5), method_id);
    let err = gate.api.create_buy_order(&gate.buyer(), negative).await.unwrap_err();
    assert!(matches!(err, GatewayApiError::InvalidAmount(_)));

    let bad_method = NewBuyOrder::new(gate.buyer(), AssetId::native(), "AUD", order_amount(), 99);
    let err = gate.api.create_buy_order(&gate.buyer(), bad_method).await.unwrap_err();
    assert!(matches!(err, GatewayApiError::MethodNotFound(99)));
}

#[tokio::test]
async fn creates_order_and_locks_escrow() {
    let (gate, method_id, maker_id) = gateway_with_active_maker().await;
    gate.ledger.deposit(&AssetId::native(), &gate.buyer(), order_amount());

    let new_order = NewBuyOrder::new(gate.buyer(), AssetId::native(), "AUD", order_amount(), method_id);
    let order_id = gate.api.create_buy_order(&gate.buyer(), new_order).await.unwrap();

    let order = gate.api.fetch_order(order_id).await.unwrap();
    assert_eq!(order.taker, gate.buyer(), "taker should be the buyer");
    assert!(order.crypto.is_native(), "crypto should be the native asset");
    assert_eq!(order.fiat, "AUD", "fiat should be AUD");
    assert_eq!(order.amount, order_amount(), "amount should be the requested amount");
    assert_eq!(order.method_id, method_id, "method index should match");
    assert_eq!(order.maker_id, maker_id, "order resolved to the active maker");
    assert_eq!(order.status, OrderStatusType::AwaitingPayment);

    // Exactly one oracle request was emitted for the order, against the buy-order job.
    let request = gate.api.pending_request_for_order(order_id).await.unwrap().expect("no pending request");
    assert_eq!(request.oracle_addr, gate.oracle());
    assert_eq!(request.job_id, JobId::from(BUY_ORDER_JOB_ID));
    assert_eq!(request.callback, RequestCallback::RegisterOrder);

    // The escrow moved from the buyer to the gateway.
    assert_eq!(gate.balance_of(&AssetId::native(), &gate.buyer()).await, TokenAmount::default());
    assert_eq!(gate.balance_of(&AssetId::native(), &gate.config.gateway_address).await, order_amount());
}

#[tokio::test]
async fn registration_fulfillment_is_an_audit_checkpoint() {
    let (gate, method_id, _) = gateway_with_active_maker().await;
    gate.ledger.deposit(&AssetId::native(), &gate.buyer(), order_amount());
    let new_order = NewBuyOrder::new(gate.buyer(), AssetId::native(), "AUD", order_amount(), method_id);
    let order_id = gate.api.create_buy_order(&gate.buyer(), new_order).await.unwrap();
    let request = gate.api.pending_request_for_order(order_id).await.unwrap().unwrap();

    let outcome = gate.api.fulfill_request(&gate.oracle(), &request.request_id, POSITIVE_RESPONSE).await.unwrap();
    assert!(matches!(outcome, FulfillmentOutcome::OrderRegistered(_)));

    // Status and escrow are untouched; only the request was consumed.
    let order = gate.api.fetch_order(order_id).await.unwrap();
    assert_eq!(order.status, OrderStatusType::AwaitingPayment);
    assert!(gate.api.pending_request_for_order(order_id).await.unwrap().is_none());
    assert_eq!(gate.balance_of(&AssetId::native(), &gate.config.gateway_address).await, order_amount());
}

#[tokio::test]
async fn full_settlement_flow_releases_escrow() {
    let (gate, method_id, _) = gateway_with_active_maker().await;
    gate.ledger.deposit(&AssetId::native(), &gate.buyer(), order_amount());
    let new_order = NewBuyOrder::new(gate.buyer(), AssetId::native(), "AUD", order_amount(), method_id);
    let order_id = gate.api.create_buy_order(&gate.buyer(), new_order).await.unwrap();

    // The taker cannot assert payment while the registration request is still in flight.
    let err = gate.api.confirm_fiat_sent(&gate.buyer(), order_id).await.unwrap_err();
    assert!(matches!(err, GatewayApiError::RequestPending(_)));

    let request = gate.api.pending_request_for_order(order_id).await.unwrap().unwrap();
    gate.api.fulfill_request(&gate.oracle(), &request.request_id, POSITIVE_RESPONSE).await.unwrap();

    // Only the taker may assert payment.
    let err = gate.api.confirm_fiat_sent(&gate.maker_addr(), order_id).await.unwrap_err();
    assert!(matches!(err, GatewayApiError::Unauthorized));

    let order = gate.api.confirm_fiat_sent(&gate.buyer(), order_id).await.unwrap();
    assert_eq!(order.status, OrderStatusType::Paid);
    let request = gate.api.pending_request_for_order(order_id).await.unwrap().expect("no settlement request");
    assert_eq!(request.job_id, JobId::from(ORDER_PAID_JOB_ID));
    assert_eq!(request.callback, RequestCallback::SettleOrder);

    // A second assertion is refused while the settlement request is pending.
    let err = gate.api.confirm_fiat_sent(&gate.buyer(), order_id).await.unwrap_err();
    assert!(matches!(err, GatewayApiError::RequestPending(_)));

    let outcome = gate.api.fulfill_request(&gate.oracle(), &request.request_id, POSITIVE_RESPONSE).await.unwrap();
    let FulfillmentOutcome::OrderSettled(order) = outcome else {
        panic!("expected settlement, got {outcome:?}");
    };
    assert_eq!(order.status, OrderStatusType::Settled);
    assert_eq!(gate.api.fetch_order(order_id).await.unwrap().status, OrderStatusType::Settled);

    // The escrowed crypto reached the taker, and the consumed request cannot be replayed.
    assert_eq!(gate.balance_of(&AssetId::native(), &gate.buyer()).await, order_amount());
    assert_eq!(gate.balance_of(&AssetId::native(), &gate.config.gateway_address).await, TokenAmount::default());
    let err = gate.api.fulfill_request(&gate.oracle(), &request.request_id, POSITIVE_RESPONSE).await.unwrap_err();
    assert!(matches!(err, GatewayApiError::UnknownRequest(_)));

    // Settled is terminal: the taker cannot re-assert payment.
    let err = gate.api.confirm_fiat_sent(&gate.buyer(), order_id).await.unwrap_err();
    assert!(matches!(err, GatewayApiError::InvalidOrderStatus { status: OrderStatusType::Settled, .. }));
}

#[tokio::test]
async fn declined_settlement_can_be_reissued_by_the_owner() {
    let (gate, method_id, _) = gateway_with_active_maker().await;
    gate.ledger.deposit(&AssetId::native(), &gate.buyer(), order_amount());
    let new_order = NewBuyOrder::new(gate.buyer(), AssetId::native(), "AUD", order_amount(), method_id);
    let order_id = gate.api.create_buy_order(&gate.buyer(), new_order).await.unwrap();
    let request = gate.api.pending_request_for_order(order_id).await.unwrap().unwrap();
    gate.api.fulfill_request(&gate.oracle(), &request.request_id, POSITIVE_RESPONSE).await.unwrap();
    gate.api.confirm_fiat_sent(&gate.buyer(), order_id).await.unwrap();

    let request = gate.api.pending_request_for_order(order_id).await.unwrap().unwrap();
    let outcome = gate.api.fulfill_request(&gate.oracle(), &request.request_id, NEGATIVE_RESPONSE).await.unwrap();
    assert!(matches!(outcome, FulfillmentOutcome::SettlementDeclined(id) if id == order_id));

    // Stuck in Paid, escrow still locked, no pending request.
    assert_eq!(gate.api.fetch_order(order_id).await.unwrap().status, OrderStatusType::Paid);
    assert!(gate.api.pending_request_for_order(order_id).await.unwrap().is_none());

    let request_id = gate.api.reissue_request(&gate.owner(), RequestSubject::Order(order_id)).await.unwrap();
    let outcome = gate.api.fulfill_request(&gate.oracle(), &request_id, POSITIVE_RESPONSE).await.unwrap();
    assert!(matches!(outcome, FulfillmentOutcome::OrderSettled(_)));
    assert_eq!(gate.balance_of(&AssetId::native(), &gate.buyer()).await, order_amount());
}

#[tokio::test]
async fn creation_requires_a_funded_fee() {
    let gate = new_gateway().await;
    gate.fund_gateway_fees(1);
    let method_id = gate.add_wechat_method().await;
    let maker_id = gate.register_aud_maker(method_id).await;
    gate.activate_maker(maker_id).await;
    // The single funded fee went to the maker registration; the order has nothing left to pay with.
    gate.ledger.deposit(&AssetId::native(), &gate.buyer(), order_amount());

    let new_order = NewBuyOrder::new(gate.buyer(), AssetId::native(), "AUD", order_amount(), method_id);
    let err = gate.api.create_buy_order(&gate.buyer(), new_order).await.unwrap_err();
    assert!(matches!(err, GatewayApiError::InsufficientFee { .. }));

    // No order row, and the buyer's funds never moved.
    assert!(gate.api.fetch_orders(OrderQueryFilter::default()).await.unwrap().is_empty());
    assert_eq!(gate.balance_of(&AssetId::native(), &gate.buyer()).await, order_amount());
}

#[tokio::test]
async fn first_registered_maker_wins_ties() {
    let (gate, method_id, first_maker_id) = gateway_with_active_maker().await;

    // A second active maker for the same (method, crypto, fiat) tuple.
    let rival = NewMaker::new(gate.maker_addr(), method_id, AssetId::native(), "AUD")
        .with_payment_destination("rival@pay.me")
        .with_api_creds_hash("QmRivalCredsHash");
    let rival_addr = fiat_gateway_engine::db_types::Address::from("rival-maker-wallet");
    let second_maker_id = gate.api.register_maker(&rival_addr, rival).await.unwrap();
    gate.activate_maker(second_maker_id).await;

    gate.ledger.deposit(&AssetId::native(), &gate.buyer(), order_amount());
    let new_order = NewBuyOrder::new(gate.buyer(), AssetId::native(), "AUD", order_amount(), method_id);
    let order_id = gate.api.create_buy_order(&gate.buyer(), new_order).await.unwrap();

    let order = gate.api.fetch_order(order_id).await.unwrap();
    assert_eq!(order.maker_id, first_maker_id, "ties resolve to the first maker by registration order");
}

#[tokio::test]
async fn orders_can_be_filtered() {
    let (gate, method_id, _) = gateway_with_active_maker().await;
    gate.ledger.deposit(&AssetId::native(), &gate.buyer(), order_amount() * 2);
    for _ in 0..2 {
        let new_order = NewBuyOrder::new(gate.buyer(), AssetId::native(), "AUD", order_amount(), method_id);
        gate.api.create_buy_order(&gate.buyer(), new_order).await.unwrap();
    }

    let by_taker = OrderQueryFilter::default().with_taker(gate.buyer());
    assert_eq!(gate.api.fetch_orders(by_taker).await.unwrap().len(), 2);

    let awaiting = OrderQueryFilter::default().with_status(OrderStatusType::AwaitingPayment);
    assert_eq!(gate.api.fetch_orders(awaiting).await.unwrap().len(), 2);

    let settled = OrderQueryFilter::default().with_status(OrderStatusType::Settled);
    assert!(gate.api.fetch_orders(settled).await.unwrap().is_empty());

    let other_taker = OrderQueryFilter::default().with_taker(gate.maker_addr());
    assert!(gate.api.fetch_orders(other_taker).await.unwrap().is_empty());
}
