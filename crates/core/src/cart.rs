//! The shopping cart.
//!
//! The cart holds at most [`MAX_CART_ITEMS`] products and at most one unit of
//! each product. There are no quantities: adding a product that is already
//! in the cart is an error, not an increment.
//!
//! # Example
//!
//! ```
//! use threadline_core::{CartError, CartItem, CartStore, Price, ProductId};
//!
//! let mut cart = CartStore::new();
//! let tee = CartItem::new(ProductId::new("1"), "Tee", Price::from_units(1000), "M");
//!
//! cart.add(tee.clone())?;
//! assert!(matches!(cart.add(tee), Err(CartError::Duplicate(_))));
//!
//! cart.remove(&ProductId::new("1"));
//! assert!(cart.is_empty());
//! # Ok::<(), CartError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Maximum number of distinct products the cart may hold.
pub const MAX_CART_ITEMS: usize = 5;

/// Reasons a product cannot be added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    /// The item has no product id.
    #[error("Product ID is required")]
    Validation,

    /// The cart already holds [`MAX_CART_ITEMS`] products.
    #[error("Cannot add more than {max} products to the cart")]
    Capacity { max: usize },

    /// The product is already in the cart.
    #[error("This product is already in the cart")]
    Duplicate(ProductId),
}

/// One product selection in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(default)]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub price: Price,
    #[serde(default)]
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CartItem {
    /// Create an item with no image or colour.
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Price,
        size: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            image: String::new(),
            price,
            size: size.into(),
            color: None,
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Serializable snapshot of the cart, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

/// The authoritative in-memory cart.
///
/// Every mutation is a single synchronous call that either fully applies or
/// leaves the items as they were.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartStore {
    items: Vec<CartItem>,
}

impl CartStore {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a cart from a persisted snapshot.
    ///
    /// Items are re-added one by one, so the invariants hold even if the
    /// snapshot was edited by hand.
    ///
    /// # Errors
    ///
    /// Returns the first [`CartError`] any snapshot item triggers.
    pub fn restore(state: CartState) -> Result<Self, CartError> {
        let mut store = Self::new();
        for item in state.items {
            store.add(item)?;
        }
        Ok(store)
    }

    /// Snapshot the cart for persistence.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        CartState {
            items: self.items.clone(),
        }
    }

    /// Append `item` to the end of the cart.
    ///
    /// Checks run in a fixed order: missing id, then capacity, then duplicate.
    ///
    /// # Errors
    ///
    /// - [`CartError::Validation`] if the item's id is empty
    /// - [`CartError::Capacity`] if the cart already holds [`MAX_CART_ITEMS`] items
    /// - [`CartError::Duplicate`] if an item with the same id is present
    pub fn add(&mut self, item: CartItem) -> Result<(), CartError> {
        if item.id.is_empty() {
            return Err(CartError::Validation);
        }
        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CartError::Capacity {
                max: MAX_CART_ITEMS,
            });
        }
        if self.contains(&item.id) {
            return Err(CartError::Duplicate(item.id));
        }

        self.items.push(item);
        Ok(())
    }

    /// Remove the item with `id`. Does nothing if it is not in the cart.
    pub fn remove(&mut self, id: &ProductId) {
        self.items.retain(|item| &item.id != id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// Sum of item prices, shipping excluded.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(|item| item.price).sum()
    }
}
