//! Order model and related functionality
//!
//! An order owns an embedded snapshot of the purchased items: name, price
//! and image are copied from the catalog at creation time, so later product
//! edits do not retroactively change historical orders.
//!
//! `status` is free text (the UI enumerates Pending / Confirmed / Shipped /
//! Delivered / Cancelled) and is NOT synchronized with the `is_delivered`
//! and `is_paid` flags; the fields are independently settable and may
//! diverge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default order status at creation time
pub const DEFAULT_STATUS: &str = "Pending";

/// Embedded order line: a snapshot of the product at purchase time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Referenced product id; the snapshot fields below stay frozen even
    /// when the referenced product changes
    pub product: Uuid,
    pub name: String,
    pub qty: i32,
    pub image: String,
    pub price: f64,
}

/// Embedded shipping address
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Owning user projection populated on admin listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUser {
    pub id: Uuid,
    pub name: String,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Populated with the owning user's name on admin listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<OrderUser>,
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: f64,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Checkout payload: the client's cart snapshot
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: f64,
    #[serde(default)]
    pub tax_price: f64,
    #[serde(default)]
    pub shipping_price: f64,
    pub total_price: f64,
}

/// Status update payload
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// One month's revenue bucket, keyed by calendar month only (1-12).
///
/// Revenue from the same month in different years lands in the same bucket.
/// This mirrors the shipped aggregation and is a known defect, kept until
/// stakeholders ask for month+year grouping.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRevenue {
    pub month: i32,
    pub revenue: f64,
}

/// Dashboard summary computed per request; no caching or materialized view
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_products: i64,
    pub total_orders: i64,
    pub total_users: i64,
    pub total_revenue: f64,
    pub pending_orders: i64,
    pub recent_orders: Vec<Order>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
}

/// Sum of `total_price` over all given orders
pub fn total_revenue(orders: &[Order]) -> f64 {
    orders.iter().map(|o| o.total_price).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order(total_price: f64) -> Order {
        Order {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user: None,
            order_items: vec![OrderItem {
                product: Uuid::new_v4(),
                name: "Chilli".to_string(),
                qty: 2,
                image: "/images/chilli.jpg".to_string(),
                price: total_price / 2.0,
            }],
            shipping_address: ShippingAddress {
                address: "1 Main".to_string(),
                city: "Hyderabad".to_string(),
                postal_code: "500001".to_string(),
                country: "India".to_string(),
            },
            payment_method: "Card".to_string(),
            items_price: total_price,
            tax_price: 0.0,
            shipping_price: 0.0,
            total_price,
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            status: DEFAULT_STATUS.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_total_revenue_sums_all_orders() {
        let orders = vec![sample_order(180.0), sample_order(20.0)];
        assert_eq!(total_revenue(&orders), 200.0);
    }

    #[test]
    fn test_total_revenue_empty() {
        assert_eq!(total_revenue(&[]), 0.0);
    }

    #[test]
    fn test_status_is_independent_of_delivered_flag() {
        let mut order = sample_order(100.0);
        order.status = "Shipped".to_string();

        // Setting a status does not touch the delivery flag
        assert!(!order.is_delivered);
    }

    #[test]
    fn test_order_serializes_camel_case() {
        let json = serde_json::to_value(sample_order(100.0)).unwrap();
        assert!(json.get("orderItems").is_some());
        assert!(json.get("shippingAddress").is_some());
        assert!(json.get("totalPrice").is_some());
        assert!(json.get("isDelivered").is_some());
        // user is only present when populated
        assert!(json.get("user").is_none());
    }

    #[test]
    fn test_create_order_request_defaults() {
        let payload = serde_json::json!({
            "orderItems": [],
            "shippingAddress": {
                "address": "1 Main",
                "city": "Hyderabad",
                "postalCode": "500001",
                "country": "India"
            },
            "paymentMethod": "Card",
            "itemsPrice": 180.0,
            "totalPrice": 180.0
        });

        let request: CreateOrderRequest = serde_json::from_value(payload).unwrap();
        assert_eq!(request.tax_price, 0.0);
        assert_eq!(request.shipping_price, 0.0);
        assert!(request.order_items.is_empty());
    }
}
