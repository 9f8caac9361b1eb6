//! Catalog products as returned by the backend.

use serde::{Deserialize, Serialize};

use crate::types::{Category, Price, ProductId};

/// A product listed in the shop.
///
/// Everything except the id, name and price is optional on the wire; older
/// products predate colours, featured flags and multi-image galleries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Size labels as stored, e.g. `"M"` or `"32"`.
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    /// Single colour recorded by the admin form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
}

impl Product {
    /// First gallery image, used as the cart thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether `size` is one of the product's sizes (case-insensitive).
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s.eq_ignore_ascii_case(size.trim()))
    }

    /// Colours a customer can pick from.
    ///
    /// Falls back to the single admin-entered colour when no palette is set.
    #[must_use]
    pub fn available_colors(&self) -> Vec<&str> {
        if self.colors.is_empty() {
            self.color.iter().map(String::as_str).collect()
        } else {
            self.colors.iter().map(String::as_str).collect()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tee() -> Product {
        serde_json::from_value(serde_json::json!({
            "_id": "66a1",
            "name": "Classic Tee",
            "description": "Combed cotton crew neck",
            "price": 1000,
            "category": "Men",
            "sizes": ["S", "M", "L"],
            "color": "White",
            "images": ["https://cdn.example.com/tee-front.jpg", "https://cdn.example.com/tee-back.jpg"],
            "isFeatured": true
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_backend_product() {
        let product = tee();
        assert_eq!(product.id, ProductId::new("66a1"));
        assert_eq!(product.price, Price::from_units(1000));
        assert_eq!(product.category, Some(Category::Men));
        assert!(product.is_featured);
    }

    #[test]
    fn test_decode_minimal_product() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "_id": 7,
            "name": "Jeans",
            "price": 2500
        }))
        .unwrap();
        assert_eq!(product.id.as_str(), "7");
        assert!(product.sizes.is_empty());
        assert!(product.primary_image().is_none());
        assert!(!product.is_featured);
    }

    #[test]
    fn test_primary_image() {
        assert_eq!(
            tee().primary_image(),
            Some("https://cdn.example.com/tee-front.jpg")
        );
    }

    #[test]
    fn test_offers_size() {
        let product = tee();
        assert!(product.offers_size("m"));
        assert!(!product.offers_size("XXL"));
    }

    #[test]
    fn test_available_colors_fallback() {
        let mut product = tee();
        assert_eq!(product.available_colors(), vec!["White"]);

        product.colors = vec!["Black".into(), "Navy".into()];
        assert_eq!(product.available_colors(), vec!["Black", "Navy"]);
    }
}
