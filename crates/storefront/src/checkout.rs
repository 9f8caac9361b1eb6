//! Placing an order from the cart.

use threadline_core::{CartStore, CheckoutForm, CheckoutFormError, OrderRequest};
use tracing::{info, instrument, warn};

use crate::api::{OrderConfirmation, StorefrontClient};
use crate::error::ApiError;

/// Why an order was not placed. The cart is untouched in every case.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Form(#[from] CheckoutFormError),
    #[error("Your cart is empty")]
    EmptyCart,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Validate `form`, submit the cart as an order and empty the cart.
///
/// The request is sent once. The cart is cleared only after the backend
/// accepts the order.
///
/// # Errors
///
/// Returns [`CheckoutError`] if the form is invalid, the cart is empty or the
/// backend rejects the order.
#[instrument(skip_all, fields(items = cart.len()))]
pub async fn place_order(
    client: &StorefrontClient,
    cart: &mut CartStore,
    form: &CheckoutForm,
) -> Result<OrderConfirmation, CheckoutError> {
    let order = OrderRequest::from_form(cart, form)?;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    match client.create_order(&order).await {
        Ok(confirmation) => {
            cart.clear();
            info!(total = %order.total_amount.display(), "order placed, cart cleared");
            Ok(confirmation)
        }
        Err(e) => {
            warn!(error = %e, "order rejected, cart kept");
            Err(e.into())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use threadline_core::{CartItem, Price, ProductId};
    use url::Url;

    use super::*;
    use crate::backend::BackendClient;

    fn unreachable_client() -> StorefrontClient {
        // Port 9 (discard) is closed on test machines.
        let backend = BackendClient::new(
            Url::parse("http://127.0.0.1:9/api/v1/").unwrap(),
            Duration::from_secs(2),
        )
        .unwrap();
        StorefrontClient::new(backend)
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Ayesha".into(),
            last_name: "Khan".into(),
            email: "ayesha@example.pk".into(),
            phone_number: "+92 300 1234567".into(),
            address: "12 Mall Road".into(),
            city: "Lahore".into(),
            province: "Punjab".into(),
            postal_code: "54000".into(),
            ..CheckoutForm::default()
        }
    }

    fn cart() -> CartStore {
        let mut cart = CartStore::new();
        cart.add(CartItem::new(ProductId::new("p1"), "Tee", Price::from_units(1500), "M"))
            .unwrap();
        cart
    }

    #[tokio::test]
    async fn test_invalid_form_keeps_cart() {
        let mut cart = cart();
        let form = CheckoutForm {
            email: "not-an-email".into(),
            ..form()
        };
        let err = place_order(&unreachable_client(), &mut cart, &form)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Form(CheckoutFormError::Email(_))));
        assert_eq!(cart.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_cart_refused() {
        let mut cart = CartStore::new();
        let err = place_order(&unreachable_client(), &mut cart, &form())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn test_backend_failure_keeps_cart() {
        let mut cart = cart();
        let err = place_order(&unreachable_client(), &mut cart, &form())
            .await
            .unwrap_err();
        let CheckoutError::Api(api) = err else {
            panic!("expected an API error");
        };
        assert_eq!(api.message(), "Failed to create order");
        assert_eq!(api.status(), None);
        assert_eq!(cart.len(), 1);
    }
}
