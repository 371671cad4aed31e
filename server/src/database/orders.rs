use sqlx::{FromRow, SqlitePool};

pub const STATUS_PAID: &str = "paid";

/// A row from `orders`. `created_at` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Order {
    pub id: String,
    pub stripe_payment_intent_id: String,
    pub status: String,
    pub created_at: i64,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.status == STATUS_PAID
    }

    /// Milliseconds elapsed since the order was created.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.created_at
    }
}

/// Look up an order by its payment-intent reference.
pub async fn find_order_by_payment_intent(
    pool: &SqlitePool,
    payment_intent_id: &str,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        "SELECT id, stripe_payment_intent_id, status, created_at
         FROM orders WHERE stripe_payment_intent_id = ?1",
    )
    .bind(payment_intent_id)
    .fetch_optional(pool)
    .await
}

pub async fn insert_order(pool: &SqlitePool, order: &Order) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO orders (id, stripe_payment_intent_id, status, created_at)
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&order.id)
    .bind(&order.stripe_payment_intent_id)
    .bind(&order.status)
    .bind(order.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{connect_in_memory, create_tables};

    fn order(status: &str) -> Order {
        Order {
            id: "ord_1".into(),
            stripe_payment_intent_id: "pi_1".into(),
            status: status.into(),
            created_at: 1_000,
        }
    }

    #[tokio::test]
    async fn inserted_order_is_found_by_payment_intent() {
        let pool = connect_in_memory().await.unwrap();
        create_tables(&pool).await.unwrap();
        insert_order(&pool, &order(STATUS_PAID)).await.unwrap();

        let found = find_order_by_payment_intent(&pool, "pi_1").await.unwrap();
        assert_eq!(found, Some(order(STATUS_PAID)));
    }

    #[tokio::test]
    async fn unknown_payment_intent_is_none() {
        let pool = connect_in_memory().await.unwrap();
        create_tables(&pool).await.unwrap();

        let found = find_order_by_payment_intent(&pool, "pi_missing").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn duplicate_payment_intent_is_rejected() {
        let pool = connect_in_memory().await.unwrap();
        create_tables(&pool).await.unwrap();
        insert_order(&pool, &order(STATUS_PAID)).await.unwrap();

        let mut dup = order("pending");
        dup.id = "ord_2".into();
        assert!(insert_order(&pool, &dup).await.is_err());
    }

    #[test]
    fn paid_status_is_exact() {
        assert!(order("paid").is_paid());
        assert!(!order("pending").is_paid());
        assert!(!order("PAID").is_paid());
    }

    #[test]
    fn age_is_relative_to_now() {
        assert_eq!(order("paid").age_ms(5_000), 4_000);
    }
}
