//! Admin client errors.

use thiserror::Error;
use threadline_core::QaFormError;
use threadline_storefront::ApiError;
use threadline_storefront::backend::UploadError;

use crate::products::ProductFormError;

/// Errors from back-office operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// No one has logged in yet.
    #[error("Please log in to continue")]
    NotLoggedIn,

    /// The session outlived its lifetime and was discarded.
    #[error("Your session has expired. Please log in again")]
    SessionExpired,

    #[error(transparent)]
    ProductForm(#[from] ProductFormError),

    #[error(transparent)]
    QaForm(#[from] QaFormError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result alias for admin operations.
pub type Result<T> = std::result::Result<T, AdminError>;
