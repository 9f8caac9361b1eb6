//! Subcommand implementations.
//!
//! [`Shop`] covers everything a customer can do; [`BackOffice`] wraps a
//! logged-in admin session.

mod admin;
mod shop;

pub use admin::BackOffice;
pub use shop::Shop;

use thiserror::Error;
use threadline_admin::AdminError;
use threadline_core::{CartError, QaFormError};
use threadline_storefront::ApiError;
use threadline_storefront::backend::UploadError;
use threadline_storefront::checkout::CheckoutError;
use threadline_storefront::config::ConfigError;
use threadline_storefront::persistence::PersistenceError;
use threadline_storefront::selection::SelectionError;

/// Errors surfaced to the user by a subcommand.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Question(#[from] QaFormError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Admin(#[from] AdminError),
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
