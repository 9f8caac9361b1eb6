//! Threadline storefront client.
//!
//! Everything a customer does against the shop backend: browsing products,
//! building a cart, checking out and asking questions. The
//! [`backend::BackendClient`] transport is shared with the admin crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod backend;
pub mod checkout;
pub mod config;
pub mod error;
pub mod persistence;
pub mod selection;

pub use api::StorefrontClient;
pub use backend::BackendClient;
pub use config::StorefrontConfig;
pub use error::ApiError;
