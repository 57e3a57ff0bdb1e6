use std::{future::Future, pin::Pin, time::Duration};

use fgw_common::TokenAmount;
use fiat_gateway_engine::{
    db_types::{AssetId, JobId, NewBuyOrder},
    events::{EventHandlers, EventHooks, MakerRegisteredEvent, OracleRequestEvent, OrderCreatedEvent},
};
use tokio::{sync::mpsc, time::timeout};

use crate::support::{new_gateway_with_producers, BUY_ORDER_JOB_ID, NEW_MAKER_JOB_ID};

mod support;

const EVENT_WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn maker_registration_emits_the_request_envelope() {
    let (request_tx, mut request_rx) = mpsc::channel::<OracleRequestEvent>(8);
    let (maker_tx, mut maker_rx) = mpsc::channel::<MakerRegisteredEvent>(8);
    let mut hooks = EventHooks::default();
    hooks.on_oracle_request(move |ev| {
        let tx = request_tx.clone();
        Box::pin(async move {
            let _ = tx.send(ev).await;
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    hooks.on_maker_registered(move |ev| {
        let tx = maker_tx.clone();
        Box::pin(async move {
            let _ = tx.send(ev).await;
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    let handlers = EventHandlers::new(8, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;

    let gate = new_gateway_with_producers(producers).await;
    gate.fund_gateway_fees(1);
    let method_id = gate.add_wechat_method().await;
    let maker_id = gate.register_aud_maker(method_id).await;

    let registered = timeout(EVENT_WAIT, maker_rx.recv()).await.expect("timed out").expect("channel closed");
    assert_eq!(registered.maker.id, maker_id);
    assert!(!registered.maker.active);

    let request = timeout(EVENT_WAIT, request_rx.recv()).await.expect("timed out").expect("channel closed");
    let envelope = request.request;
    // The embedded envelope and the standalone request event describe the same request.
    assert_eq!(envelope, registered.request);
    assert_eq!(envelope.oracle_addr, gate.oracle());
    assert_eq!(envelope.callback_addr, gate.config.gateway_address);
    assert_eq!(envelope.job_id, JobId::from(NEW_MAKER_JOB_ID));
    assert_eq!(envelope.fee, TokenAmount::one_token());

    // The envelope correlates with the tracked pending request.
    let pending = gate.api.pending_request_for_maker(maker_id).await.unwrap().unwrap();
    assert_eq!(pending.request_id, envelope.request_id);
}

#[tokio::test]
async fn order_creation_emits_order_and_request_events() {
    let (order_tx, mut order_rx) = mpsc::channel::<OrderCreatedEvent>(8);
    let mut hooks = EventHooks::default();
    hooks.on_order_created(move |ev| {
        let tx = order_tx.clone();
        Box::pin(async move {
            let _ = tx.send(ev).await;
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    let handlers = EventHandlers::new(8, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;

    let gate = new_gateway_with_producers(producers).await;
    gate.fund_gateway_fees(2);
    let method_id = gate.add_wechat_method().await;
    let maker_id = gate.register_aud_maker(method_id).await;
    gate.activate_maker(maker_id).await;

    gate.ledger.deposit(&AssetId::native(), &gate.buyer(), TokenAmount::one_token());
    let new_order = NewBuyOrder::new(gate.buyer(), AssetId::native(), "AUD", TokenAmount::one_token(), method_id);
    let order_id = gate.api.create_buy_order(&gate.buyer(), new_order).await.unwrap();

    let created = timeout(EVENT_WAIT, order_rx.recv()).await.expect("timed out").expect("channel closed");
    assert_eq!(created.order.id, order_id);
    assert_eq!(created.order.taker, gate.buyer());
    assert_eq!(created.request.job_id, JobId::from(BUY_ORDER_JOB_ID));

    let pending = gate.api.pending_request_for_order(order_id).await.unwrap().unwrap();
    assert_eq!(pending.request_id, created.request.request_id);
}
