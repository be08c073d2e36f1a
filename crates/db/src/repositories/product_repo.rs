//! Repository for the `products` table.
//!
//! Every read joins `users` so the `createdBy` back-reference is populated
//! with the creator's display fields (never the password hash).

use catalog_core::types::DbId;
use sqlx::PgPool;

use crate::models::product::{CreateProduct, ProductRow, UpdateProduct};

/// Joined column list; `p` is either the table or a CTE over it.
const JOINED_COLUMNS: &str = "p.id, p.name, p.description, p.price, p.created_by, \
                              p.created_at, p.updated_at, \
                              u.name AS creator_name, u.email AS creator_email";

/// Provides CRUD operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// List all products in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProductRow>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM products p
             LEFT JOIN users u ON u.id = p.created_by
             ORDER BY p.id ASC"
        );
        sqlx::query_as::<_, ProductRow>(&query).fetch_all(pool).await
    }

    /// Find a product by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProductRow>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM products p
             LEFT JOIN users u ON u.id = p.created_by
             WHERE p.id = $1"
        );
        sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a product, returning the populated row.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<ProductRow, sqlx::Error> {
        let query = format!(
            "WITH p AS (
                INSERT INTO products (name, description, price, created_by)
                VALUES ($1, $2, $3, $4)
                RETURNING *
             )
             SELECT {JOINED_COLUMNS}
             FROM p
             LEFT JOIN users u ON u.id = p.created_by"
        );
        sqlx::query_as::<_, ProductRow>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Apply a partial update. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<ProductRow>, sqlx::Error> {
        let query = format!(
            "WITH p AS (
                UPDATE products SET
                    name = COALESCE($2, name),
                    description = COALESCE($3, description),
                    price = COALESCE($4, price),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
             )
             SELECT {JOINED_COLUMNS}
             FROM p
             LEFT JOIN users u ON u.id = p.created_by"
        );
        sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .fetch_optional(pool)
            .await
    }

    /// Delete a product. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every product. Only used by the seed binary.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
