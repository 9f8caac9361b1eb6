//! Threadline back office.
//!
//! [`AdminSession`] logs in against the shop backend and exposes catalog,
//! banner, question and order management. Reads that the backend serves
//! publicly (products, banners, questions) work without a login; every
//! write needs a live session.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod banners;
pub mod config;
pub mod error;
pub mod orders;
pub mod products;
pub mod qa;
pub mod session;

pub use config::AdminConfig;
pub use error::AdminError;
pub use products::{NewProduct, ProductForm, ProductFormError};
pub use qa::{CatalogQuestion, filter_questions};
pub use session::{AdminSession, AdminUser, Session};
