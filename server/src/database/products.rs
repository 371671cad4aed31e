use std::collections::HashMap;

use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

/// A row from `products`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    /// Product-level discount percentage, applied before promos.
    pub discount: Option<f64>,
}

/// Fetch every product in `ids`, keyed by id. Unknown ids are simply absent.
pub async fn find_products(
    pool: &SqlitePool,
    ids: &[String],
) -> Result<HashMap<String, Product>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut query: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id, name, price_cents, discount FROM products WHERE id IN (");
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");

    let rows: Vec<Product> = query.build_query_as().fetch_all(pool).await?;

    Ok(rows.into_iter().map(|p| (p.id.clone(), p)).collect())
}

pub async fn insert_product(pool: &SqlitePool, product: &Product) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO products (id, name, price_cents, discount)
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&product.id)
    .bind(&product.name)
    .bind(product.price_cents)
    .bind(product.discount)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{connect_in_memory, create_tables};

    fn product(id: &str, price_cents: i64, discount: Option<f64>) -> Product {
        Product {
            id: id.into(),
            name: format!("Product {}", id),
            price_cents,
            discount,
        }
    }

    #[tokio::test]
    async fn find_products_returns_only_known_ids() {
        let pool = connect_in_memory().await.unwrap();
        create_tables(&pool).await.unwrap();
        insert_product(&pool, &product("P1", 1_000, None)).await.unwrap();
        insert_product(&pool, &product("P2", 2_500, Some(20.0))).await.unwrap();

        let ids = vec!["P1".to_string(), "P2".to_string(), "P9".to_string()];
        let found = find_products(&pool, &ids).await.unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found["P2"].discount, Some(20.0));
        assert!(!found.contains_key("P9"));
    }

    #[tokio::test]
    async fn empty_id_list_skips_the_query() {
        let pool = connect_in_memory().await.unwrap();
        let found = find_products(&pool, &[]).await.unwrap();
        assert!(found.is_empty());
    }
}
