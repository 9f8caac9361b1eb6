//! Threadline Core - Shared types and cart logic.
//!
//! This crate provides the domain model used across all Threadline components:
//! - `storefront` - Customer-facing client for the shop backend
//! - `admin` - Back-office client (products, banners, Q&A, orders)
//! - `cli` - The `tl-cli` binary that owns the cart and drives both clients
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no filesystem access. Persistence of the cart and every network
//! call live in the client crates.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, phone numbers and enums
//! - [`cart`] - The cart store and its invariants
//! - [`order`] - Order request assembly, checkout form validation, admin order queries
//! - [`product`] - Catalog products
//! - [`catalog`] - Product search and filtering
//! - [`qa`] - Product questions and answers
//! - [`banner`] - Landing page banners

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod banner;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod product;
pub mod qa;
pub mod types;

pub use banner::Banner;
pub use cart::{CartError, CartItem, CartState, CartStore, MAX_CART_ITEMS};
pub use order::{
    CheckoutForm, CheckoutFormError, CustomerInfo, OrderCustomer, OrderItem, OrderQuery,
    OrderRecord, OrderRequest, OrderSortKey, OrderSummary, SHIPPING_FEE, ShippingAddress,
    SortDirection,
};
pub use product::Product;
pub use qa::{Answer, NewAnswer, NewQuestion, ProductQuestion, QaFormError, Question, STORE_ADMIN};
pub use types::*;
