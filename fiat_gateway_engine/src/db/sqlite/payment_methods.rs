use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{FiatPaymentMethod, NewFiatPaymentMethod},
};

const COLUMNS: &str = "id, display_name, oracle_addr, new_maker_job_id, buy_order_job_id, order_paid_job_id, \
                       created_at";

/// Appends a new payment method and returns its assigned index. Methods are immutable; there is no update or
/// delete counterpart.
pub async fn insert_method(
    method: NewFiatPaymentMethod,
    conn: &mut SqliteConnection,
) -> Result<i64, SqliteDatabaseError> {
    let result = sqlx::query(
        r#"
            INSERT INTO fiat_payment_methods (
                display_name,
                oracle_addr,
                new_maker_job_id,
                buy_order_job_id,
                order_paid_job_id
            ) VALUES ($1, $2, $3, $4, $5);
        "#,
    )
    .bind(method.display_name.clone())
    .bind(method.oracle_addr)
    .bind(method.new_maker_job_id)
    .bind(method.buy_order_job_id)
    .bind(method.order_paid_job_id)
    .execute(&mut *conn)
    .await?;
    let id = result.last_insert_rowid();
    debug!("🗃️ Payment method \"{}\" saved with index {id}", method.display_name);
    Ok(id)
}

pub async fn fetch_method(
    id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<FiatPaymentMethod>, SqliteDatabaseError> {
    let method = sqlx::query_as::<_, FiatPaymentMethod>(&format!(
        "SELECT {COLUMNS} FROM fiat_payment_methods WHERE id = $1;"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(method)
}

pub async fn fetch_methods(conn: &mut SqliteConnection) -> Result<Vec<FiatPaymentMethod>, SqliteDatabaseError> {
    let methods =
        sqlx::query_as::<_, FiatPaymentMethod>(&format!("SELECT {COLUMNS} FROM fiat_payment_methods ORDER BY id ASC;"))
            .fetch_all(&mut *conn)
            .await?;
    Ok(methods)
}
