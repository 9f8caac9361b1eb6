//! Turning a product page selection into a cart item.

use threadline_core::{CartItem, Product};

/// The customer's choice on a product page cannot go into the cart.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Please select a size before adding to cart.")]
    MissingSize,
    #[error("size {0} is not available for this product")]
    UnavailableSize(String),
    #[error("colour {0} is not available for this product")]
    UnavailableColor(String),
}

/// Build the cart item for `product` in `size` (and optionally `color`).
///
/// The stored size and colour use the product's own spelling, so `"m"` on a
/// product sized `["S", "M"]` becomes `"M"`. Products with no size list
/// accept any non-blank size.
///
/// # Errors
///
/// Returns [`SelectionError`] if no size was chosen or the size or colour is
/// not offered.
pub fn cart_item_from_product(
    product: &Product,
    size: Option<&str>,
    color: Option<&str>,
) -> Result<CartItem, SelectionError> {
    let size = size
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(SelectionError::MissingSize)?;

    let size = if product.sizes.is_empty() {
        size.to_owned()
    } else {
        product
            .sizes
            .iter()
            .find(|offered| offered.eq_ignore_ascii_case(size))
            .cloned()
            .ok_or_else(|| SelectionError::UnavailableSize(size.to_owned()))?
    };

    let mut item = CartItem::new(product.id.clone(), product.name.clone(), product.price, size);
    if let Some(image) = product.primary_image() {
        item = item.with_image(image);
    }

    if let Some(color) = color.map(str::trim).filter(|c| !c.is_empty()) {
        let offered = product
            .available_colors()
            .into_iter()
            .find(|c| c.eq_ignore_ascii_case(color))
            .ok_or_else(|| SelectionError::UnavailableColor(color.to_owned()))?;
        item = item.with_color(offered);
    }

    Ok(item)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use threadline_core::Price;

    fn shirt() -> Product {
        serde_json::from_value(serde_json::json!({
            "_id": "p-linen",
            "name": "Linen Shirt",
            "price": 3200,
            "sizes": ["S", "M", "L"],
            "colors": ["White", "Sand"],
            "images": ["https://cdn.example.com/linen-1.jpg", "https://cdn.example.com/linen-2.jpg"]
        }))
        .unwrap()
    }

    #[test]
    fn test_size_is_required() {
        assert_eq!(
            cart_item_from_product(&shirt(), None, None),
            Err(SelectionError::MissingSize)
        );
        assert_eq!(
            cart_item_from_product(&shirt(), Some("  "), None),
            Err(SelectionError::MissingSize)
        );
        assert_eq!(
            SelectionError::MissingSize.to_string(),
            "Please select a size before adding to cart."
        );
    }

    #[test]
    fn test_item_uses_product_spelling() {
        let item = cart_item_from_product(&shirt(), Some("m"), Some("sand")).unwrap();
        assert_eq!(item.id.as_str(), "p-linen");
        assert_eq!(item.name, "Linen Shirt");
        assert_eq!(item.price, Price::from_units(3200));
        assert_eq!(item.size, "M");
        assert_eq!(item.color.as_deref(), Some("Sand"));
        assert_eq!(item.image, "https://cdn.example.com/linen-1.jpg");
    }

    #[test]
    fn test_unoffered_choices_rejected() {
        assert_eq!(
            cart_item_from_product(&shirt(), Some("XL"), None),
            Err(SelectionError::UnavailableSize("XL".to_owned()))
        );
        assert_eq!(
            cart_item_from_product(&shirt(), Some("S"), Some("Red")),
            Err(SelectionError::UnavailableColor("Red".to_owned()))
        );
    }

    #[test]
    fn test_unsized_product_accepts_any_size() {
        let mut product = shirt();
        product.sizes.clear();
        product.images.clear();
        let item = cart_item_from_product(&product, Some("32"), None).unwrap();
        assert_eq!(item.size, "32");
        assert!(item.image.is_empty());
        assert_eq!(item.color, None);
    }
}
