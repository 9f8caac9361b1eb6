//! Product search and filtering for the shop and admin product lists.

use crate::product::Product;
use crate::types::Category;

/// Products whose name contains `search` (case-insensitive), optionally
/// restricted to one department. An empty search matches everything.
#[must_use]
pub fn filter_products<'a>(
    products: &'a [Product],
    search: &str,
    category: Option<Category>,
) -> Vec<&'a Product> {
    let needle = search.trim().to_lowercase();
    products
        .iter()
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .filter(|p| category.is_none_or(|c| p.category == Some(c)))
        .collect()
}

/// Products flagged for the landing page.
#[must_use]
pub fn featured(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.is_featured).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Product> {
        serde_json::from_value(serde_json::json!([
            { "_id": "1", "name": "Classic Tee", "price": 1000, "category": "Men", "isFeatured": true },
            { "_id": "2", "name": "Slim Jeans", "price": 2500, "category": "Women" },
            { "_id": "3", "name": "Graphic Tee", "price": 900, "category": "Kids" },
            { "_id": "4", "name": "Linen Shirt", "price": 3200 }
        ]))
        .unwrap()
    }

    fn names(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let products = catalog();
        assert_eq!(
            names(&filter_products(&products, "TEE", None)),
            ["Classic Tee", "Graphic Tee"]
        );
    }

    #[test]
    fn test_empty_search_matches_all() {
        let products = catalog();
        assert_eq!(filter_products(&products, "  ", None).len(), 4);
    }

    #[test]
    fn test_category_filter() {
        let products = catalog();
        assert_eq!(
            names(&filter_products(&products, "tee", Some(Category::Kids))),
            ["Graphic Tee"]
        );
        assert!(filter_products(&products, "shirt", Some(Category::Men)).is_empty());
    }

    #[test]
    fn test_featured() {
        let products = catalog();
        assert_eq!(names(&featured(&products)), ["Classic Tee"]);
    }
}
