use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{AssetId, Maker, NewMaker},
};

const COLUMNS: &str = "id, maker_addr, method_id, crypto, fiat, payment_destination, api_creds_hash, active, \
                       created_at, updated_at";

/// Inserts a new maker in the inactive state. This is not atomic on its own. Embed the call inside a transaction
/// together with the registration request insert, passing `&mut *tx` as the connection argument.
pub async fn insert_maker(maker: NewMaker, conn: &mut SqliteConnection) -> Result<i64, SqliteDatabaseError> {
    let result = sqlx::query(
        r#"
            INSERT INTO makers (
                maker_addr,
                method_id,
                crypto,
                fiat,
                payment_destination,
                api_creds_hash,
                active
            ) VALUES ($1, $2, $3, $4, $5, $6, 0);
        "#,
    )
    .bind(maker.maker_addr.clone())
    .bind(maker.method_id)
    .bind(maker.crypto)
    .bind(maker.fiat)
    .bind(maker.payment_destination)
    .bind(maker.api_creds_hash)
    .execute(&mut *conn)
    .await?;
    let id = result.last_insert_rowid();
    debug!("🗃️ Maker [{}] saved with id {id}", maker.maker_addr);
    Ok(id)
}

pub async fn fetch_maker(id: i64, conn: &mut SqliteConnection) -> Result<Option<Maker>, SqliteDatabaseError> {
    let maker = sqlx::query_as::<_, Maker>(&format!("SELECT {COLUMNS} FROM makers WHERE id = $1;"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(maker)
}

pub async fn fetch_makers(conn: &mut SqliteConnection) -> Result<Vec<Maker>, SqliteDatabaseError> {
    let makers = sqlx::query_as::<_, Maker>(&format!("SELECT {COLUMNS} FROM makers ORDER BY id ASC;"))
        .fetch_all(&mut *conn)
        .await?;
    Ok(makers)
}

/// Resolves the active maker for a (method, crypto, fiat) tuple. When several makers match, the lowest id (the
/// first registered) wins. Selection policy, not an accident.
pub async fn active_maker_for_pair(
    method_id: i64,
    crypto: &AssetId,
    fiat: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Maker>, SqliteDatabaseError> {
    let maker = sqlx::query_as::<_, Maker>(&format!(
        r#"
            SELECT {COLUMNS} FROM makers
            WHERE method_id = $1 AND crypto = $2 AND fiat = $3 AND active = 1
            ORDER BY id ASC
            LIMIT 1;
        "#
    ))
    .bind(method_id)
    .bind(crypto.clone())
    .bind(fiat)
    .fetch_optional(&mut *conn)
    .await?;
    trace!("🗃️ Active maker lookup for method #{method_id} {crypto}/{fiat}: {:?}", maker.as_ref().map(|m| m.id));
    Ok(maker)
}

/// Flips a maker to active. There is no reverse operation; makers are never deactivated.
pub(crate) async fn activate_maker(id: i64, conn: &mut SqliteConnection) -> Result<(), SqliteDatabaseError> {
    let _ = sqlx::query("UPDATE makers SET active = 1, updated_at = CURRENT_TIMESTAMP WHERE id = $1;")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    debug!("🗃️ Maker #{id} is now active");
    Ok(())
}
