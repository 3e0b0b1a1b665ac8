//! Order repository for database operations
//!
//! Orders are written once at checkout and only mutated through status,
//! paid and delivered updates. Product stock is NOT decremented on order
//! creation; `count_in_stock` is informational only.

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::{CreateOrderRequest, MonthlyRevenue, Order, OrderItem, OrderUser, order};

/// Order repository
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

fn order_from_row(row: &PgRow) -> Result<Order> {
    let order_items: Vec<OrderItem> = serde_json::from_value(row.get("order_items"))?;
    let shipping_address = serde_json::from_value(row.get("shipping_address"))?;

    Ok(Order {
        id: row.get("id"),
        user_id: row.get("user_id"),
        user: None,
        order_items,
        shipping_address,
        payment_method: row.get("payment_method"),
        items_price: row.get("items_price"),
        tax_price: row.get("tax_price"),
        shipping_price: row.get("shipping_price"),
        total_price: row.get("total_price"),
        is_paid: row.get("is_paid"),
        paid_at: row.get("paid_at"),
        is_delivered: row.get("is_delivered"),
        delivered_at: row.get("delivered_at"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn order_with_user_from_row(row: &PgRow) -> Result<Order> {
    let mut order = order_from_row(row)?;
    // The user projection stays empty when the owning account was deleted
    order.user = row
        .get::<Option<String>, _>("user_name")
        .map(|name| OrderUser {
            id: order.user_id,
            name,
        });
    Ok(order)
}

const ORDER_COLUMNS: &str = "o.id, o.user_id, o.order_items, o.shipping_address, \
                             o.payment_method, o.items_price, o.tax_price, o.shipping_price, \
                             o.total_price, o.is_paid, o.paid_at, o.is_delivered, \
                             o.delivered_at, o.status, o.created_at, o.updated_at";

impl OrderRepository {
    /// Create a new order repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a snapshot order owned by the given user
    pub async fn create(&self, user_id: Uuid, request: &CreateOrderRequest) -> Result<Order> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO orders AS o
                (user_id, order_items, shipping_address, payment_method,
                 items_price, tax_price, shipping_price, total_price, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(serde_json::to_value(&request.order_items)?)
        .bind(serde_json::to_value(&request.shipping_address)?)
        .bind(&request.payment_method)
        .bind(request.items_price)
        .bind(request.tax_price)
        .bind(request.shipping_price)
        .bind(request.total_price)
        .bind(order::DEFAULT_STATUS)
        .fetch_one(&self.pool)
        .await?;

        order_from_row(&row)
    }

    /// Get all orders, newest first, with the owning user's name populated
    pub async fn find_all_with_user(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ORDER_COLUMNS}, u.name AS user_name
            FROM orders o
            LEFT JOIN users u ON u.id = o.user_id
            ORDER BY o.created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(order_with_user_from_row).collect()
    }

    /// Get all orders without the user projection
    pub async fn find_all(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders o"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(order_from_row).collect()
    }

    /// Get the orders of one user, newest first
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders o
            WHERE o.user_id = $1
            ORDER BY o.created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(order_from_row).collect()
    }

    /// Find an order by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>> {
        let row = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders o WHERE o.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(order_from_row).transpose()
    }

    /// Overwrite the status of an order unconditionally; the delivered and
    /// paid flags are left untouched
    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<Order>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE orders AS o
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(order_from_row).transpose()
    }

    /// Count all orders
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count orders not yet delivered
    pub async fn count_pending(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE is_delivered = FALSE")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Get the most recently created orders with the owning user's name
    pub async fn recent_with_user(&self, limit: i64) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ORDER_COLUMNS}, u.name AS user_name
            FROM orders o
            LEFT JOIN users u ON u.id = o.user_id
            ORDER BY o.created_at DESC
            LIMIT $1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(order_with_user_from_row).collect()
    }

    /// Revenue grouped by calendar month only (1-12); the same month of
    /// different years is conflated. Kept as shipped behavior.
    pub async fn monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>> {
        let rows = sqlx::query(
            r#"
            SELECT CAST(EXTRACT(MONTH FROM created_at) AS INT4) AS month,
                   COALESCE(SUM(total_price), 0) AS revenue
            FROM orders
            GROUP BY month
            ORDER BY month
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| MonthlyRevenue {
                month: row.get("month"),
                revenue: row.get("revenue"),
            })
            .collect())
    }
}
