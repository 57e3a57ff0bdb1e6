use std::{pin::Pin, sync::Arc};

use crate::events::{
    EventHandler,
    EventProducer,
    Handler,
    MakerRegisteredEvent,
    MethodAddedEvent,
    OracleRequestEvent,
    OrderCancelledEvent,
    OrderCreatedEvent,
    OrderSettledEvent,
};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub oracle_request_producer: Vec<EventProducer<OracleRequestEvent>>,
    pub method_added_producer: Vec<EventProducer<MethodAddedEvent>>,
    pub maker_registered_producer: Vec<EventProducer<MakerRegisteredEvent>>,
    pub order_created_producer: Vec<EventProducer<OrderCreatedEvent>>,
    pub order_settled_producer: Vec<EventProducer<OrderSettledEvent>>,
    pub order_cancelled_producer: Vec<EventProducer<OrderCancelledEvent>>,
}

pub struct EventHandlers {
    pub on_oracle_request: Option<EventHandler<OracleRequestEvent>>,
    pub on_method_added: Option<EventHandler<MethodAddedEvent>>,
    pub on_maker_registered: Option<EventHandler<MakerRegisteredEvent>>,
    pub on_order_created: Option<EventHandler<OrderCreatedEvent>>,
    pub on_order_settled: Option<EventHandler<OrderSettledEvent>>,
    pub on_order_cancelled: Option<EventHandler<OrderCancelledEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        Self {
            on_oracle_request: hooks.on_oracle_request.map(|f| EventHandler::new(buffer_size, f)),
            on_method_added: hooks.on_method_added.map(|f| EventHandler::new(buffer_size, f)),
            on_maker_registered: hooks.on_maker_registered.map(|f| EventHandler::new(buffer_size, f)),
            on_order_created: hooks.on_order_created.map(|f| EventHandler::new(buffer_size, f)),
            on_order_settled: hooks.on_order_settled.map(|f| EventHandler::new(buffer_size, f)),
            on_order_cancelled: hooks.on_order_cancelled.map(|f| EventHandler::new(buffer_size, f)),
        }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_oracle_request {
            result.oracle_request_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_method_added {
            result.method_added_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_maker_registered {
            result.maker_registered_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_order_created {
            result.order_created_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_order_settled {
            result.order_settled_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_order_cancelled {
            result.order_cancelled_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_oracle_request {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_method_added {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_maker_registered {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_order_created {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_order_settled {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_order_cancelled {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_oracle_request: Option<Handler<OracleRequestEvent>>,
    pub on_method_added: Option<Handler<MethodAddedEvent>>,
    pub on_maker_registered: Option<Handler<MakerRegisteredEvent>>,
    pub on_order_created: Option<Handler<OrderCreatedEvent>>,
    pub on_order_settled: Option<Handler<OrderSettledEvent>>,
    pub on_order_cancelled: Option<Handler<OrderCancelledEvent>>,
}

macro_rules! hook_setter {
    ($fn_name:ident, $event:ty) => {
        pub fn $fn_name<F>(&mut self, f: F) -> &mut Self
        where F: (Fn($event) -> Pin<Box<dyn std::future::Future<Output = ()> + Send>>) + Send + Sync + 'static {
            self.$fn_name = Some(Arc::new(f));
            self
        }
    };
}

impl EventHooks {
    hook_setter!(on_oracle_request, OracleRequestEvent);

    hook_setter!(on_method_added, MethodAddedEvent);

    hook_setter!(on_maker_registered, MakerRegisteredEvent);

    hook_setter!(on_order_created, OrderCreatedEvent);

    hook_setter!(on_order_settled, OrderSettledEvent);

    hook_setter!(on_order_cancelled, OrderCancelledEvent);
}
