//! Response envelopes returned by the backend.

use serde::{Deserialize, Serialize};
use threadline_core::{Product, ProductQuestion};

/// `GET /products`
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsResponse {
    #[serde(default)]
    pub products: Vec<Product>,
}

/// `GET /products/:id`
#[derive(Debug, Clone, Deserialize)]
pub struct ProductResponse {
    pub product: Product,
}

/// `GET /qa/product/:id`
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionsResponse {
    #[serde(default)]
    pub questions: Vec<ProductQuestion>,
}

/// Body of a successful `POST /create-order`.
///
/// The backend only guarantees a JSON object; anything beyond `message` is
/// kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl OrderConfirmation {
    /// The new order's id, if the backend echoed it back.
    #[must_use]
    pub fn order_id(&self) -> Option<String> {
        let nested = self.extra.get("order").and_then(|order| order.get("_id"));
        [nested, self.extra.get("orderId"), self.extra.get("_id")]
            .into_iter()
            .flatten()
            .find_map(|value| match value {
                serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_products_envelope() {
        let response: ProductsResponse = serde_json::from_str(
            r#"{"products":[{"_id":"p1","name":"Linen Shirt","price":2499}]}"#,
        )
        .unwrap();
        assert_eq!(response.products.len(), 1);
        assert_eq!(response.products[0].name, "Linen Shirt");

        let empty: ProductsResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.products.is_empty());
    }

    #[test]
    fn test_confirmation_order_id() {
        let nested: OrderConfirmation = serde_json::from_str(
            r#"{"message":"Order created","order":{"_id":"o-77","status":"Processing"}}"#,
        )
        .unwrap();
        assert_eq!(nested.message.as_deref(), Some("Order created"));
        assert_eq!(nested.order_id().as_deref(), Some("o-77"));

        let flat: OrderConfirmation = serde_json::from_str(r#"{"orderId":42}"#).unwrap();
        assert_eq!(flat.order_id().as_deref(), Some("42"));

        let bare: OrderConfirmation = serde_json::from_str("{}").unwrap();
        assert_eq!(bare.order_id(), None);
    }
}
