use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use crate::{
    db::{
        sqlite::{db_url, makers, new_pool, orders, payment_methods, requests, SqliteDatabaseError},
        traits::{
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
    },
    db_types::{
        Address,
        AssetId,
        BuyOrder,
        FiatPaymentMethod,
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
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL from the environment, or the default.
    pub async fn new() -> Result<Self, SqliteDatabaseError> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), 25).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl GatewayDatabase for SqliteDatabase {
    type Error = SqliteDatabaseError;

    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_payment_method(&self, method: NewFiatPaymentMethod) -> Result<i64, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        payment_methods::insert_method(method, &mut conn).await
    }

    async fn create_maker_with_request(&self, maker: NewMaker, request: NewOracleRequest) -> Result<i64, Self::Error> {
        let mut tx = self.pool.begin().await?;
        let maker_id = makers::insert_maker(maker, &mut tx).await?;
        requests::insert_request(request, maker_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Maker #{maker_id} created (inactive), registration request pending");
        Ok(maker_id)
    }

    async fn create_order_with_request(
        &self,
        order: NewBuyOrder,
        maker_id: i64,
        request: NewOracleRequest,
    ) -> Result<i64, Self::Error> {
        let mut tx = self.pool.begin().await?;
        let order_id = orders::insert_order(order, maker_id, &mut tx).await?;
        requests::insert_request(request, order_id, &mut tx).await?;
        // The order only leaves `Created` once its registration request is on the books.
        orders::update_order_status(order_id, OrderStatusType::AwaitingPayment, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order #{order_id} created and awaiting payment, registration request pending");
        Ok(order_id)
    }

    async fn advance_order_with_request(
        &self,
        order_id: i64,
        request: NewOracleRequest,
    ) -> Result<AdvanceResult, Self::Error> {
        let mut tx = self.pool.begin().await?;
        let Some(order) = orders::fetch_order(order_id, &mut tx).await? else {
            return Ok(AdvanceResult::NotFound);
        };
        if order.status != OrderStatusType::AwaitingPayment {
            return Ok(AdvanceResult::WrongStatus(order.status));
        }
        if let Some(pending) =
            requests::pending_for_subject(&RequestCallback::order_callbacks(), order_id, &mut tx).await?
        {
            return Ok(AdvanceResult::RequestPending(pending.request_id));
        }
        requests::insert_request(request, order_id, &mut tx).await?;
        orders::update_order_status(order_id, OrderStatusType::Paid, &mut tx).await?;
        let order = orders::fetch_order(order_id, &mut tx)
            .await?
            .ok_or(SqliteDatabaseError::RowVanished("buy order", order_id))?;
        tx.commit().await?;
        debug!("🗃️ Order #{order_id} advanced to Paid, payment-confirmation request pending");
        Ok(AdvanceResult::Advanced(order))
    }

    async fn consume_request(
        &self,
        request_id: &RequestId,
        caller: &Address,
        positive: bool,
    ) -> Result<ConsumeResult, Self::Error> {
        let mut tx = self.pool.begin().await?;
        let Some(request) = requests::fetch_request(request_id, &mut tx).await? else {
            return Ok(ConsumeResult::NotFound);
        };
        if &request.oracle_addr != caller {
            // Rolls back on drop. The request stays pending for the real oracle.
            return Ok(ConsumeResult::WrongOracle);
        }
        requests::delete_request(request_id, &mut tx).await?;
        let subject_id = request.subject_id;
        let outcome = match request.callback {
            RequestCallback::ActivateMaker => {
                let maker = makers::fetch_maker(subject_id, &mut tx).await?.ok_or_else(|| {
                    SqliteDatabaseError::SubjectMissing(request_id.clone(), request.callback, subject_id)
                })?;
                if positive && !maker.active {
                    makers::activate_maker(subject_id, &mut tx).await?;
                    let maker = makers::fetch_maker(subject_id, &mut tx)
                        .await?
                        .ok_or(SqliteDatabaseError::RowVanished("maker", subject_id))?;
                    FulfillmentOutcome::MakerActivated(maker)
                } else {
                    FulfillmentOutcome::MakerActivationDeclined(subject_id)
                }
            },
            RequestCallback::RegisterOrder => {
                // Audit checkpoint. The order's fields were fixed at creation; consuming the request is the
                // entire effect.
                let order = orders::fetch_order(subject_id, &mut tx).await?.ok_or_else(|| {
                    SqliteDatabaseError::SubjectMissing(request_id.clone(), request.callback, subject_id)
                })?;
                FulfillmentOutcome::OrderRegistered(order)
            },
            RequestCallback::SettleOrder => {
                let order = orders::fetch_order(subject_id, &mut tx).await?.ok_or_else(|| {
                    SqliteDatabaseError::SubjectMissing(request_id.clone(), request.callback, subject_id)
                })?;
                if positive && order.status == OrderStatusType::Paid {
                    orders::update_order_status(subject_id, OrderStatusType::Settled, &mut tx).await?;
                    let order = orders::fetch_order(subject_id, &mut tx)
                        .await?
                        .ok_or(SqliteDatabaseError::RowVanished("buy order", subject_id))?;
                    FulfillmentOutcome::OrderSettled(order)
                } else {
                    FulfillmentOutcome::SettlementDeclined(subject_id)
                }
            },
        };
        tx.commit().await?;
        debug!("🗃️ Oracle request {request_id} consumed: {outcome:?}");
        Ok(ConsumeResult::Consumed(outcome))
    }

    async fn cancel_order(&self, order_id: i64) -> Result<CancelResult, Self::Error> {
        let mut tx = self.pool.begin().await?;
        let Some(order) = orders::fetch_order(order_id, &mut tx).await? else {
            return Ok(CancelResult::NotFound);
        };
        if !matches!(order.status, OrderStatusType::Created | OrderStatusType::AwaitingPayment) {
            return Ok(CancelResult::NotCancellable(order.status));
        }
        let voided = requests::delete_for_order(order_id, &mut tx).await?;
        orders::update_order_status(order_id, OrderStatusType::Cancelled, &mut tx).await?;
        let order = orders::fetch_order(order_id, &mut tx)
            .await?
            .ok_or(SqliteDatabaseError::RowVanished("buy order", order_id))?;
        tx.commit().await?;
        debug!("🗃️ Order #{order_id} cancelled, {voided} outstanding request(s) voided");
        Ok(CancelResult::Cancelled(order))
    }

    async fn reissue_maker_request(
        &self,
        maker_id: i64,
        request: NewOracleRequest,
    ) -> Result<ReissueResult, Self::Error> {
        let mut tx = self.pool.begin().await?;
        let Some(maker) = makers::fetch_maker(maker_id, &mut tx).await? else {
            return Ok(ReissueResult::NotFound);
        };
        if maker.active {
            return Ok(ReissueResult::AlreadyActive);
        }
        if let Some(pending) =
            requests::pending_for_subject(&[RequestCallback::ActivateMaker], maker_id, &mut tx).await?
        {
            return Ok(ReissueResult::RequestPending(pending.request_id));
        }
        requests::insert_request(request, maker_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Fresh activation request recorded for maker #{maker_id}");
        Ok(ReissueResult::Issued)
    }

    async fn reissue_order_request(
        &self,
        order_id: i64,
        request: NewOracleRequest,
    ) -> Result<ReissueResult, Self::Error> {
        let mut tx = self.pool.begin().await?;
        let Some(order) = orders::fetch_order(order_id, &mut tx).await? else {
            return Ok(ReissueResult::NotFound);
        };
        let expected = match request.callback {
            RequestCallback::RegisterOrder => OrderStatusType::AwaitingPayment,
            RequestCallback::SettleOrder => OrderStatusType::Paid,
            RequestCallback::ActivateMaker => return Ok(ReissueResult::WrongStatus(order.status)),
        };
        if order.status != expected {
            return Ok(ReissueResult::WrongStatus(order.status));
        }
        if let Some(pending) =
            requests::pending_for_subject(&RequestCallback::order_callbacks(), order_id, &mut tx).await?
        {
            return Ok(ReissueResult::RequestPending(pending.request_id));
        }
        requests::insert_request(request, order_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Fresh {} request recorded for order #{order_id}", expected);
        Ok(ReissueResult::Issued)
    }

    async fn close(&mut self) -> Result<(), Self::Error> {
        self.pool.close().await;
        Ok(())
    }
}

impl RegistryManagement for SqliteDatabase {
    type Error = SqliteDatabaseError;

    async fn fetch_payment_method(&self, id: i64) -> Result<Option<FiatPaymentMethod>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        payment_methods::fetch_method(id, &mut conn).await
    }

    async fn fetch_payment_methods(&self) -> Result<Vec<FiatPaymentMethod>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        payment_methods::fetch_methods(&mut conn).await
    }

    async fn fetch_maker(&self, id: i64) -> Result<Option<Maker>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        makers::fetch_maker(id, &mut conn).await
    }

    async fn fetch_makers(&self) -> Result<Vec<Maker>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        makers::fetch_makers(&mut conn).await
    }

    async fn active_maker_for_pair(
        &self,
        method_id: i64,
        crypto: &AssetId,
        fiat: &str,
    ) -> Result<Option<Maker>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        makers::active_maker_for_pair(method_id, crypto, fiat, &mut conn).await
    }
}

impl OrderManagement for SqliteDatabase {
    type Error = SqliteDatabaseError;

    async fn fetch_order(&self, id: i64) -> Result<Option<BuyOrder>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order(id, &mut conn).await
    }

    async fn fetch_orders(&self, filter: OrderQueryFilter) -> Result<Vec<BuyOrder>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders(filter, &mut conn).await
    }
}

impl RequestTracking for SqliteDatabase {
    type Error = SqliteDatabaseError;

    async fn fetch_pending_request(&self, request_id: &RequestId) -> Result<Option<OracleRequest>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        requests::fetch_request(request_id, &mut conn).await
    }

    async fn pending_request_for_maker(&self, maker_id: i64) -> Result<Option<OracleRequest>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        requests::pending_for_subject(&[RequestCallback::ActivateMaker], maker_id, &mut conn).await
    }

    async fn pending_request_for_order(&self, order_id: i64) -> Result<Option<OracleRequest>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        requests::pending_for_subject(&RequestCallback::order_callbacks(), order_id, &mut conn).await
    }
}
