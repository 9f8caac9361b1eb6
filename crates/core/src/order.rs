//! Order assembly and back-office order queries.
//!
//! The storefront turns the cart plus the checkout form into an
//! [`OrderRequest`]. The admin side reads orders back as [`OrderRecord`]s and
//! narrows them with an [`OrderQuery`].
//!
//! `total_amount` is always the sum of item prices. Shipping is a flat fee
//! shown to the customer in the [`OrderSummary`] and charged by the backend;
//! it is never folded into the submitted total.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartStore;
use crate::types::{
    Email, EmailError, OrderId, OrderStatus, PaymentMethod, PhoneNumber, PhoneNumberError, Price,
    ProductId,
};

/// Flat shipping fee per order.
pub const SHIPPING_FEE: Price = Price::new(Decimal::from_parts(150, 0, 0, false, 0));

/// Contact details of the person placing the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone_number: PhoneNumber,
}

/// Where the order is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
}

/// One ordered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: ProductId,
    pub size: String,
}

/// Payload for `POST /create-order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_info: CustomerInfo,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub order_items: Vec<OrderItem>,
    pub total_amount: Price,
}

impl OrderRequest {
    /// Project the cart and validated form data into an order request.
    #[must_use]
    pub fn build(
        cart: &CartStore,
        customer_info: CustomerInfo,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Self {
        let order_items = cart
            .items()
            .iter()
            .map(|item| OrderItem {
                product: item.id.clone(),
                size: item.size.clone(),
            })
            .collect();

        Self {
            customer_info,
            shipping_address,
            payment_method,
            order_items,
            total_amount: cart.subtotal(),
        }
    }

    /// Validate `form` and build the request from it.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutFormError`] if any form field is missing or invalid.
    pub fn from_form(cart: &CartStore, form: &CheckoutForm) -> Result<Self, CheckoutFormError> {
        let (customer, shipping) = form.validate()?;
        Ok(Self::build(cart, customer, shipping, form.payment_method))
    }
}

/// Amounts shown on the cart and checkout pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Summary for the current cart. An empty cart ships nothing and costs nothing.
    #[must_use]
    pub fn for_cart(cart: &CartStore) -> Self {
        let subtotal = cart.subtotal();
        let shipping = if cart.is_empty() {
            Price::ZERO
        } else {
            SHIPPING_FEE
        };
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}

/// A checkout form field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutFormError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),
    #[error("invalid phone number: {0}")]
    Phone(#[from] PhoneNumberError),
}

/// Raw checkout input, exactly as the customer typed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub payment_method: PaymentMethod,
}

impl CheckoutForm {
    /// Check every field and convert to typed records.
    ///
    /// Fields are checked top to bottom in form order; the first failure is
    /// reported.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutFormError`] for the first empty or invalid field.
    pub fn validate(&self) -> Result<(CustomerInfo, ShippingAddress), CheckoutFormError> {
        let customer = CustomerInfo {
            first_name: required(&self.first_name, "first name")?,
            last_name: required(&self.last_name, "last name")?,
            email: Email::parse(&required(&self.email, "email")?)?,
            phone_number: PhoneNumber::parse(&required(&self.phone_number, "phone number")?)?,
        };
        let shipping = ShippingAddress {
            address: required(&self.address, "address")?,
            city: required(&self.city, "city")?,
            province: required(&self.province, "province")?,
            postal_code: required(&self.postal_code, "postal code")?,
        };
        Ok((customer, shipping))
    }
}

fn required(value: &str, field: &'static str) -> Result<String, CheckoutFormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CheckoutFormError::MissingField(field))
    } else {
        Ok(trimmed.to_owned())
    }
}

// =============================================================================
// Back-office view
// =============================================================================

/// Customer block of a stored order.
///
/// Kept unvalidated: historical orders may carry data the checkout form would
/// reject today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
}

/// An order as listed by `GET /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,
    pub customer_info: OrderCustomer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    pub total_amount: Price,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    #[must_use]
    pub fn customer_name(&self) -> String {
        let OrderCustomer {
            first_name,
            last_name,
            ..
        } = &self.customer_info;
        if last_name.is_empty() {
            first_name.clone()
        } else {
            format!("{first_name} {last_name}")
        }
    }
}

/// Field to sort orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderSortKey {
    #[default]
    Date,
    Total,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Search, status filter and ordering for the admin order table.
///
/// The default query shows every order, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    /// Case-insensitive match against customer name or order id.
    pub search: String,
    /// `None` means all statuses.
    pub status: Option<OrderStatus>,
    pub sort_by: OrderSortKey,
    pub direction: SortDirection,
}

impl OrderQuery {
    /// Filter and sort `orders`. The sort is stable.
    #[must_use]
    pub fn apply<'a>(&self, orders: &'a [OrderRecord]) -> Vec<&'a OrderRecord> {
        let needle = self.search.trim().to_lowercase();
        let mut matched: Vec<&OrderRecord> = orders
            .iter()
            .filter(|order| {
                needle.is_empty()
                    || order.customer_name().to_lowercase().contains(&needle)
                    || order.id.as_str().to_lowercase().contains(&needle)
            })
            .filter(|order| self.status.is_none_or(|status| order.status == status))
            .collect();

        matched.sort_by(|a, b| {
            let ordering = match self.sort_by {
                OrderSortKey::Date => a.created_at.cmp(&b.created_at),
                OrderSortKey::Total => a.total_amount.cmp(&b.total_amount),
            };
            match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        matched
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::CartItem;

    fn form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Ayesha".into(),
            last_name: "Khan".into(),
            email: "ayesha@example.pk".into(),
            phone_number: "0300 1234567".into(),
            address: "12 Canal Road".into(),
            city: "Lahore".into(),
            province: "Punjab".into(),
            postal_code: "54000".into(),
            payment_method: PaymentMethod::CashOnDelivery,
        }
    }

    fn cart() -> CartStore {
        let mut cart = CartStore::new();
        cart.add(CartItem::new(ProductId::new("1"), "Tee", Price::from_units(1000), "M"))
            .unwrap();
        cart.add(CartItem::new(ProductId::new("2"), "Jeans", Price::from_units(2500), "32"))
            .unwrap();
        cart
    }

    #[test]
    fn test_build_order_request() {
        let request = OrderRequest::from_form(&cart(), &form()).unwrap();
        assert_eq!(request.total_amount, Price::from_units(3500));
        assert_eq!(
            request.order_items,
            vec![
                OrderItem {
                    product: ProductId::new("1"),
                    size: "M".into()
                },
                OrderItem {
                    product: ProductId::new("2"),
                    size: "32".into()
                },
            ]
        );
        assert_eq!(request.customer_info.first_name, "Ayesha");
        assert_eq!(request.shipping_address.city, "Lahore");
    }

    #[test]
    fn test_order_request_wire_format() {
        let request = OrderRequest::from_form(&cart(), &form()).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["customerInfo"]["firstName"], "Ayesha");
        assert_eq!(json["customerInfo"]["phoneNumber"], "0300 1234567");
        assert_eq!(json["shippingAddress"]["postalCode"], "54000");
        assert_eq!(json["paymentMethod"], "Cash on Delivery");
        assert_eq!(json["orderItems"][1]["product"], "2");
        assert_eq!(json["orderItems"][1]["size"], "32");
        assert_eq!(json["totalAmount"].as_f64(), Some(3500.0));
    }

    #[test]
    fn test_total_excludes_shipping() {
        let cart = cart();
        let request = OrderRequest::from_form(&cart, &form()).unwrap();
        let summary = OrderSummary::for_cart(&cart);

        assert_eq!(request.total_amount, summary.subtotal);
        assert_eq!(summary.shipping, SHIPPING_FEE);
        assert_eq!(summary.total, Price::from_units(3650));
    }

    #[test]
    fn test_shipping_fee_is_flat() {
        assert_eq!(SHIPPING_FEE, Price::from_units(150));
        assert_eq!(OrderSummary::for_cart(&CartStore::new()).total, Price::ZERO);
    }

    #[test]
    fn test_form_missing_field() {
        let mut form = form();
        form.city = "   ".into();
        assert_eq!(
            form.validate(),
            Err(CheckoutFormError::MissingField("city"))
        );
    }

    #[test]
    fn test_form_reports_first_failure() {
        let mut form = form();
        form.first_name.clear();
        form.postal_code.clear();
        assert_eq!(
            form.validate(),
            Err(CheckoutFormError::MissingField("first name"))
        );
    }

    #[test]
    fn test_form_invalid_email_and_phone() {
        let mut bad_email = form();
        bad_email.email = "ayesha".into();
        assert!(matches!(
            bad_email.validate(),
            Err(CheckoutFormError::Email(_))
        ));

        let mut bad_phone = form();
        bad_phone.phone_number = "call me".into();
        assert!(matches!(
            bad_phone.validate(),
            Err(CheckoutFormError::Phone(_))
        ));
    }

    #[test]
    fn test_form_trims_values() {
        let mut form = form();
        form.address = "  12 Canal Road  ".into();
        let (_, shipping) = form.validate().unwrap();
        assert_eq!(shipping.address, "12 Canal Road");
    }

    fn record(id: &str, first: &str, total: i64, status: OrderStatus, day: u32) -> OrderRecord {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "customerInfo": { "firstName": first, "lastName": "Doe" },
            "totalAmount": total,
            "status": status,
            "createdAt": format!("2024-05-{day:02}T10:00:00Z"),
        }))
        .unwrap()
    }

    fn orders() -> Vec<OrderRecord> {
        vec![
            record("ORD001", "John", 12_999, OrderStatus::Processing, 1),
            record("ORD002", "Jane", 7_999, OrderStatus::Shipped, 2),
            record("ORD003", "Bob", 19_999, OrderStatus::Delivered, 3),
            record("ORD004", "Alice", 5_999, OrderStatus::Cancelled, 4),
        ]
    }

    fn order_ids(result: &[&OrderRecord]) -> Vec<String> {
        result.iter().map(|o| o.id.to_string()).collect()
    }

    #[test]
    fn test_default_query_newest_first() {
        let orders = orders();
        let result = OrderQuery::default().apply(&orders);
        assert_eq!(order_ids(&result), ["ORD004", "ORD003", "ORD002", "ORD001"]);
    }

    #[test]
    fn test_query_search_by_customer_or_id() {
        let orders = orders();
        let by_name = OrderQuery {
            search: "JANE".into(),
            ..OrderQuery::default()
        };
        assert_eq!(order_ids(&by_name.apply(&orders)), ["ORD002"]);

        let by_id = OrderQuery {
            search: "ord003".into(),
            ..OrderQuery::default()
        };
        assert_eq!(order_ids(&by_id.apply(&orders)), ["ORD003"]);
    }

    #[test]
    fn test_query_status_filter() {
        let orders = orders();
        let query = OrderQuery {
            status: Some(OrderStatus::Shipped),
            ..OrderQuery::default()
        };
        assert_eq!(order_ids(&query.apply(&orders)), ["ORD002"]);
    }

    #[test]
    fn test_query_sort_by_total_ascending() {
        let orders = orders();
        let query = OrderQuery {
            sort_by: OrderSortKey::Total,
            direction: SortDirection::Asc,
            ..OrderQuery::default()
        };
        assert_eq!(
            order_ids(&query.apply(&orders)),
            ["ORD004", "ORD002", "ORD001", "ORD003"]
        );
    }

    #[test]
    fn test_customer_name() {
        let orders = orders();
        assert_eq!(orders[0].customer_name(), "John Doe");
    }
}
