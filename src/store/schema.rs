//! Startup DDL: create the target database if needed, then the tables (no migration history).

use crate::error::StoreError;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

const TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL DEFAULT '',
            email TEXT NOT NULL DEFAULT ''
        )
        "#,
    ),
    (
        "orders",
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            order_id BIGSERIAL PRIMARY KEY,
            customer_name TEXT NOT NULL DEFAULT '',
            ordered_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "items",
        r#"
        CREATE TABLE IF NOT EXISTS items (
            item_id BIGSERIAL PRIMARY KEY,
            item_code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            quantity BIGINT NOT NULL DEFAULT 0 CHECK (quantity >= 0),
            order_id BIGINT NOT NULL REFERENCES orders (order_id)
                ON UPDATE CASCADE ON DELETE CASCADE
        )
        "#,
    ),
];

/// Create `users`, `orders` and `items` if they do not exist. Parents are created before children.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), StoreError> {
    for &(name, ddl) in TABLES {
        sqlx::query(ddl).execute(pool).await?;
        tracing::debug!(table = name, "table ensured");
    }
    sqlx::query("CREATE INDEX IF NOT EXISTS items_order_id_idx ON items (order_id)")
        .execute(pool)
        .await?;
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (opts, db_name) = target_database(database_url)?;
    let Some(db_name) = db_name.filter(|name| !name.is_empty() && name != "postgres") else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = opts.database("postgres").connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "database created");
    }
    Ok(())
}

/// Parse the URL the way the pool will, returning the options and the database name they select.
fn target_database(database_url: &str) -> Result<(PgConnectOptions, Option<String>), StoreError> {
    let opts = PgConnectOptions::from_str(database_url).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
    let db_name = opts.get_database().map(str::to_owned);
    Ok((opts, db_name))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
