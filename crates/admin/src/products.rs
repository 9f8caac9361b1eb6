//! Catalog management.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use threadline_core::{Category, Price, Product, ProductId, Size};
use threadline_storefront::backend::Upload;
use tracing::{info, instrument};

use crate::error::Result;
use crate::session::AdminSession;

/// A product form field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductFormError {
    #[error("Product name must be at least 2 characters.")]
    NameTooShort,
    #[error("Description must be at least 10 characters.")]
    DescriptionTooShort,
    #[error("Price must be a number.")]
    PriceNotANumber,
    #[error("Price must not be negative.")]
    NegativePrice,
    #[error("Please select a valid category.")]
    InvalidCategory,
    #[error("Please select at least one size.")]
    NoSizes,
    #[error("Unknown size {0}.")]
    InvalidSize(String),
    #[error("Please enter a color.")]
    MissingColor,
}

/// Raw product form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub sizes: Vec<String>,
    pub color: String,
    pub is_featured: bool,
}

/// Body of `POST /add-product` and `PUT /products/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: Category,
    pub sizes: Vec<Size>,
    pub color: String,
    pub images: Vec<String>,
    pub is_featured: bool,
}

impl ProductForm {
    /// Check the form and build the payload with the given image URLs.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProductFormError`] in field order.
    pub fn validate(&self, images: Vec<String>) -> std::result::Result<NewProduct, ProductFormError> {
        let name = self.name.trim();
        if name.chars().count() < 2 {
            return Err(ProductFormError::NameTooShort);
        }

        let description = self.description.trim();
        if description.chars().count() < 10 {
            return Err(ProductFormError::DescriptionTooShort);
        }

        let price = Decimal::from_str(self.price.trim())
            .map(Price::new)
            .map_err(|_| ProductFormError::PriceNotANumber)?;
        if price.is_negative() {
            return Err(ProductFormError::NegativePrice);
        }

        let category = Category::from_str(self.category.trim())
            .map_err(|_| ProductFormError::InvalidCategory)?;

        if self.sizes.is_empty() {
            return Err(ProductFormError::NoSizes);
        }
        let mut sizes = Vec::with_capacity(self.sizes.len());
        for raw in &self.sizes {
            let size = Size::from_str(raw.trim())
                .map_err(|_| ProductFormError::InvalidSize(raw.clone()))?;
            if !sizes.contains(&size) {
                sizes.push(size);
            }
        }

        let color = self.color.trim();
        if color.is_empty() {
            return Err(ProductFormError::MissingColor);
        }

        Ok(NewProduct {
            name: name.to_owned(),
            description: description.to_owned(),
            price,
            category,
            sizes,
            color: color.to_owned(),
            images,
            is_featured: self.is_featured,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeaturedUpdate {
    is_featured: bool,
}

impl AdminSession {
    /// Validate `form`, upload `files` and create the product.
    ///
    /// Nothing is uploaded if the form is invalid.
    ///
    /// # Errors
    ///
    /// Returns `AdminError` for an invalid form, a missing session or a
    /// failed upload or create.
    #[instrument(skip_all, fields(name = %form.name, files = files.len()))]
    pub async fn add_product(&self, form: &ProductForm, files: &[Upload]) -> Result<()> {
        form.validate(Vec::new())?;
        let images = self.upload_images(files).await?;
        let product = form.validate(images)?;

        let _: serde::de::IgnoredAny = self
            .authorized()
            .await?
            .post_json(&["add-product"], &product, "Failed to add Product")
            .await?;
        info!(name = %product.name, "product added");
        Ok(())
    }

    /// Replace a product's fields.
    ///
    /// `files` are uploaded and appended after `existing_images`.
    ///
    /// # Errors
    ///
    /// Returns `AdminError` for an invalid form, a missing session or a
    /// failed upload or update.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        form: &ProductForm,
        existing_images: Vec<String>,
        files: &[Upload],
    ) -> Result<()> {
        form.validate(Vec::new())?;
        let mut images = existing_images;
        images.extend(self.upload_images(files).await?);
        let product = form.validate(images)?;

        let _: serde::de::IgnoredAny = self
            .authorized()
            .await?
            .put_json(&["products", id.as_str()], &product, "Failed to update product")
            .await?;
        info!("product updated");
        Ok(())
    }

    /// The current product, for pre-filling an edit form.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the product cannot be fetched.
    pub async fn get_product(&self, id: &ProductId) -> Result<Product> {
        let response: threadline_storefront::api::ProductResponse = self
            .backend()
            .get(&["products", id.as_str()], "Failed to fetch product details")
            .await?;
        Ok(response.product)
    }

    /// # Errors
    ///
    /// Returns `AdminError` for a missing session or a failed delete.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<()> {
        self.authorized()
            .await?
            .delete(&["products", id.as_str()], "Failed to delete product")
            .await?;
        info!("product deleted");
        Ok(())
    }

    /// Mark a product as featured on the home page, or unmark it.
    ///
    /// # Errors
    ///
    /// Returns `AdminError` for a missing session or a failed update.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn set_featured(&self, id: &ProductId, is_featured: bool) -> Result<()> {
        let _: serde::de::IgnoredAny = self
            .authorized()
            .await?
            .put_json(
                &["products", "featured", id.as_str()],
                &FeaturedUpdate { is_featured },
                "Failed to update featured status",
            )
            .await?;
        Ok(())
    }

    /// Upload product images and return their public URLs.
    ///
    /// An empty `files` makes no request.
    ///
    /// # Errors
    ///
    /// Returns `AdminError` for a missing session or a failed upload.
    #[instrument(skip_all, fields(files = files.len()))]
    pub async fn upload_images(&self, files: &[Upload]) -> Result<Vec<String>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }
        let urls: Vec<String> = self
            .authorized()
            .await?
            .post_multipart(&["upload-images"], "images", files, "Failed to upload images")
            .await?;
        Ok(urls)
    }
}
