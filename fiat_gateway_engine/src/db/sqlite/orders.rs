use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db::{sqlite::SqliteDatabaseError, traits::OrderQueryFilter},
    db_types::{BuyOrder, NewBuyOrder, OrderStatusType},
};

const COLUMNS: &str = "id, taker, crypto, fiat, amount, method_id, maker_id, status, created_at, updated_at";

/// Inserts a new buy order in the `Created` status. This is not atomic on its own. Embed the call inside a
/// transaction together with the request insert and the advance to `AwaitingPayment`, passing `&mut *tx` as the
/// connection argument.
pub async fn insert_order(
    order: NewBuyOrder,
    maker_id: i64,
    conn: &mut SqliteConnection,
) -> Result<i64, SqliteDatabaseError> {
    let result = sqlx::query(
        r#"
            INSERT INTO buy_orders (
                taker,
                crypto,
                fiat,
                amount,
                method_id,
                maker_id,
                status
            ) VALUES ($1, $2, $3, $4, $5, $6, 'Created');
        "#,
    )
    .bind(order.taker.clone())
    .bind(order.crypto)
    .bind(order.fiat)
    .bind(order.amount)
    .bind(order.method_id)
    .bind(maker_id)
    .execute(&mut *conn)
    .await?;
    let id = result.last_insert_rowid();
    debug!("🗃️ Buy order from [{}] saved with id {id} against maker #{maker_id}", order.taker);
    Ok(id)
}

pub async fn fetch_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<BuyOrder>, SqliteDatabaseError> {
    let order = sqlx::query_as::<_, BuyOrder>(&format!("SELECT {COLUMNS} FROM buy_orders WHERE id = $1;"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(order)
}

/// Fetches orders according to criteria specified in the `OrderQueryFilter`
///
/// Resulting orders are ordered by `created_at` in ascending order
pub async fn fetch_orders(
    query: OrderQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<BuyOrder>, SqliteDatabaseError> {
    let mut builder = QueryBuilder::new(format!("SELECT {COLUMNS} FROM buy_orders "));
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(taker) = query.taker {
        where_clause.push("taker = ");
        where_clause.push_bind_unseparated(taker);
    }
    if let Some(method_id) = query.method_id {
        where_clause.push("method_id = ");
        where_clause.push_bind_unseparated(method_id);
    }
    if let Some(maker_id) = query.maker_id {
        where_clause.push("maker_id = ");
        where_clause.push_bind_unseparated(maker_id);
    }
    if let Some(crypto) = query.crypto {
        where_clause.push("crypto = ");
        where_clause.push_bind_unseparated(crypto);
    }
    if let Some(fiat) = query.fiat {
        where_clause.push("fiat = ");
        where_clause.push_bind_unseparated(fiat);
    }
    if !query.statuses.is_empty() {
        let statuses = query.statuses.iter().map(|s| format!("'{s}'")).collect::<Vec<_>>();
        let status_clause = statuses.join(",");
        where_clause.push(format!("status IN ({status_clause})"));
    }
    builder.push(" ORDER BY created_at ASC");

    trace!("🗃️ Executing query: {}", builder.sql());
    let query = builder.build_query_as::<BuyOrder>();
    let orders = query.fetch_all(&mut *conn).await?;
    trace!("🗃️ Result of fetch_orders: {:?}", orders.len());
    Ok(orders)
}

pub(crate) async fn update_order_status(
    order_id: i64,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    let status = status.to_string();
    let _ = sqlx::query("UPDATE buy_orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2;")
        .bind(status.clone())
        .bind(order_id)
        .execute(&mut *conn)
        .await?;
    trace!("🗃️ Order #{order_id} status set to {status}");
    Ok(())
}
