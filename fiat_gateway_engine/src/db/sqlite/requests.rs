use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{NewOracleRequest, OracleRequest, RequestCallback, RequestId},
};

const COLUMNS: &str = "request_id, oracle_addr, job_id, callback, subject_id, fee, created_at";

/// Records a pending oracle request bound to its subject. Embed in the same transaction as the subject mutation.
pub async fn insert_request(
    request: NewOracleRequest,
    subject_id: i64,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    let _ = sqlx::query(
        r#"
            INSERT INTO oracle_requests (
                request_id,
                oracle_addr,
                job_id,
                callback,
                subject_id,
                fee
            ) VALUES ($1, $2, $3, $4, $5, $6);
        "#,
    )
    .bind(request.request_id.clone())
    .bind(request.oracle_addr)
    .bind(request.job_id)
    .bind(request.callback.to_string())
    .bind(subject_id)
    .bind(request.fee)
    .execute(&mut *conn)
    .await?;
    debug!("🗃️ Oracle request {} recorded for {} #{subject_id}", request.request_id, request.callback);
    Ok(())
}

pub async fn fetch_request(
    request_id: &RequestId,
    conn: &mut SqliteConnection,
) -> Result<Option<OracleRequest>, SqliteDatabaseError> {
    let request =
        sqlx::query_as::<_, OracleRequest>(&format!("SELECT {COLUMNS} FROM oracle_requests WHERE request_id = $1;"))
            .bind(request_id.clone())
            .fetch_optional(&mut *conn)
            .await?;
    Ok(request)
}

/// Deletes the tracking record for a request. Returns `false` when no row matched, i.e. the request was already
/// consumed or never existed.
pub(crate) async fn delete_request(
    request_id: &RequestId,
    conn: &mut SqliteConnection,
) -> Result<bool, SqliteDatabaseError> {
    let result = sqlx::query("DELETE FROM oracle_requests WHERE request_id = $1;")
        .bind(request_id.clone())
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// The unconsumed request bound to `subject_id` through any of the given callbacks, if one exists.
pub async fn pending_for_subject(
    callbacks: &[RequestCallback],
    subject_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<OracleRequest>, SqliteDatabaseError> {
    let callback_list = callbacks.iter().map(|c| format!("'{c}'")).collect::<Vec<_>>().join(",");
    let request = sqlx::query_as::<_, OracleRequest>(&format!(
        "SELECT {COLUMNS} FROM oracle_requests WHERE callback IN ({callback_list}) AND subject_id = $1;"
    ))
    .bind(subject_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(request)
}

/// Voids every outstanding request bound to the given order. Called when an order is cancelled, so that a
/// late-arriving fulfillment finds nothing to consume.
pub(crate) async fn delete_for_order(order_id: i64, conn: &mut SqliteConnection) -> Result<u64, SqliteDatabaseError> {
    let callback_list =
        RequestCallback::order_callbacks().iter().map(|c| format!("'{c}'")).collect::<Vec<_>>().join(",");
    let result =
        sqlx::query(&format!("DELETE FROM oracle_requests WHERE callback IN ({callback_list}) AND subject_id = $1;"))
            .bind(order_id)
            .execute(&mut *conn)
            .await?;
    let voided = result.rows_affected();
    if voided > 0 {
        trace!("🗃️ Voided {voided} outstanding request(s) for order #{order_id}");
    }
    Ok(voided)
}
