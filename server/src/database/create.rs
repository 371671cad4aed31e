use sqlx::SqlitePool;
use tracing::info;

/// Create the `orders` and `products` tables if they are missing.
pub async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Orders are written by the payment webhook; this service only reads
    // them to gate minting.
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS orders (
            id                       TEXT    PRIMARY KEY,
            stripe_payment_intent_id TEXT    NOT NULL UNIQUE,
            status                   TEXT    NOT NULL,
            created_at               INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    // `discount` is a product-level percentage applied before any promo.
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS products (
            id          TEXT    PRIMARY KEY,
            name        TEXT    NOT NULL,
            price_cents INTEGER NOT NULL,
            discount    REAL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_orders_payment_intent
            ON orders(stripe_payment_intent_id)",
    )
    .execute(pool)
    .await?;

    info!("Database schema ready");
    Ok(())
}
