//! Order management.

use serde::{Deserialize, Serialize};
use threadline_core::{OrderId, OrderRecord, OrderStatus};
use tracing::{info, instrument};

use crate::error::Result;
use crate::session::AdminSession;

/// `GET /orders` answers with either a bare list or `{ "orders": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum OrdersResponse {
    List(Vec<OrderRecord>),
    Wrapped { orders: Vec<OrderRecord> },
}

impl From<OrdersResponse> for Vec<OrderRecord> {
    fn from(response: OrdersResponse) -> Self {
        match response {
            OrdersResponse::List(orders) | OrdersResponse::Wrapped { orders } => orders,
        }
    }
}

#[derive(Serialize)]
struct StatusUpdate {
    status: OrderStatus,
}

impl AdminSession {
    /// Every order, in backend order. Filter and sort with
    /// [`OrderQuery`](threadline_core::OrderQuery).
    ///
    /// # Errors
    ///
    /// Returns `AdminError` for a missing session or a failed fetch.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<OrderRecord>> {
        let response: OrdersResponse = self
            .authorized()
            .await?
            .get(&["orders"], "Failed to fetch orders")
            .await?;
        Ok(response.into())
    }

    /// Move an order to `status`.
    ///
    /// # Errors
    ///
    /// Returns `AdminError` for a missing session or a failed update.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<()> {
        let _: serde::de::IgnoredAny = self
            .authorized()
            .await?
            .put_json(
                &["orders", id.as_str(), "status"],
                &StatusUpdate { status },
                "Failed to update order status",
            )
            .await?;
        info!("order status updated");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ORDER: &str = r#"{
        "_id": "o1",
        "customerInfo": { "firstName": "Ayesha", "lastName": "Khan", "email": "a@example.pk", "phoneNumber": "03001234567" },
        "paymentMethod": "Cash on Delivery",
        "orderItems": [{ "product": "p1", "size": "M" }],
        "totalAmount": 1500,
        "status": "Shipped",
        "createdAt": "2024-06-01T10:00:00Z"
    }"#;

    #[test]
    fn test_bare_and_wrapped_lists() {
        let bare: OrdersResponse = serde_json::from_str(&format!("[{ORDER}]")).unwrap();
        let wrapped: OrdersResponse =
            serde_json::from_str(&format!(r#"{{"orders":[{ORDER}]}}"#)).unwrap();

        let bare: Vec<OrderRecord> = bare.into();
        let wrapped: Vec<OrderRecord> = wrapped.into();
        assert_eq!(bare, wrapped);
        assert_eq!(bare[0].status, OrderStatus::Shipped);
    }

    #[test]
    fn test_status_update_body() {
        let json = serde_json::to_value(StatusUpdate {
            status: OrderStatus::Delivered,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "status": "Delivered" }));
    }
}
