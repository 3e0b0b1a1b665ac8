//! Product repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::{Category, Product};

/// Product repository
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

fn product_from_row(row: &PgRow) -> Result<Product> {
    let category: Category = row
        .get::<String, _>("category")
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    Ok(Product {
        id: row.get("id"),
        name: row.get("name"),
        category,
        price: row.get("price"),
        count_in_stock: row.get("count_in_stock"),
        description: row.get("description"),
        image: row.get("image"),
        brand: row.get("brand"),
        weight: row.get("weight"),
        ingredients: row.get("ingredients"),
        usage_tips: row.get("usage_tips"),
        is_best_seller: row.get("is_best_seller"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

const PRODUCT_COLUMNS: &str = "id, name, category, price, count_in_stock, description, image, \
                               brand, weight, ingredients, usage_tips, is_best_seller, \
                               created_at, updated_at";

impl ProductRepository {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the full catalog, newest first
    pub async fn find_all(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(product_from_row).collect()
    }

    /// Find a product by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    /// Create the sample-valued stub a subsequent update fills in
    pub async fn create_stub(&self) -> Result<Product> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products (name, category, price, count_in_stock, description, image, brand)
            VALUES ('Sample name', $1, 0, 0, 'Sample description', '/images/sample.jpg', 'Sample brand')
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(Category::default().to_string())
        .fetch_one(&self.pool)
        .await?;

        product_from_row(&row)
    }

    /// Persist the mutable fields of a product
    pub async fn update(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE products
            SET name = $2, category = $3, price = $4, count_in_stock = $5,
                description = $6, image = $7, brand = $8, weight = $9,
                ingredients = $10, usage_tips = $11, is_best_seller = $12,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.category.to_string())
        .bind(product.price)
        .bind(product.count_in_stock)
        .bind(&product.description)
        .bind(&product.image)
        .bind(&product.brand)
        .bind(&product.weight)
        .bind(&product.ingredients)
        .bind(&product.usage_tips)
        .bind(product.is_best_seller)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a product by ID
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all products
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
