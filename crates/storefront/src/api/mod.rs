//! Customer-facing backend calls.
//!
//! Every operation makes exactly one request (plus the token refresh
//! described in [`crate::backend`]) and reports failure as an
//! [`ApiError`](crate::error::ApiError) whose message is the backend's
//! `message` field or the operation's fallback.

mod types;

pub use types::{OrderConfirmation, ProductResponse, ProductsResponse, QuestionsResponse};

use serde::de::IgnoredAny;
use threadline_core::{NewAnswer, NewQuestion, OrderRequest, Product, ProductId, ProductQuestion, QuestionId};
use tracing::{info, instrument};

use crate::backend::BackendClient;
use crate::error::Result;

/// Storefront operations over a shared [`BackendClient`].
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    backend: BackendClient,
}

impl StorefrontClient {
    #[must_use]
    pub const fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// The underlying transport.
    #[must_use]
    pub const fn backend(&self) -> &BackendClient {
        &self.backend
    }

    /// Every product in the catalog.
    ///
    /// # Errors
    ///
    /// Fails with "Failed to fetch products" unless the backend says otherwise.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let response: ProductsResponse = self
            .backend
            .get(&["products"], "Failed to fetch products")
            .await?;
        Ok(response.products)
    }

    /// A single product by id.
    ///
    /// # Errors
    ///
    /// Fails with "Failed to fetch product details" unless the backend says otherwise.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product> {
        let response: ProductResponse = self
            .backend
            .get(&["products", id.as_str()], "Failed to fetch product details")
            .await?;
        Ok(response.product)
    }

    /// Submit an order. Not retried.
    ///
    /// # Errors
    ///
    /// Fails with "Failed to create order" unless the backend says otherwise.
    #[instrument(skip(self, order), fields(items = order.order_items.len()))]
    pub async fn create_order(&self, order: &OrderRequest) -> Result<OrderConfirmation> {
        let confirmation: OrderConfirmation = self
            .backend
            .post_json(&["create-order"], order, "Failed to create order")
            .await?;
        info!(order_id = ?confirmation.order_id(), "order created");
        Ok(confirmation)
    }

    /// Question threads on a product page.
    ///
    /// # Errors
    ///
    /// Fails with "Failed to fetch questions" unless the backend says otherwise.
    #[instrument(skip(self), fields(product_id = %product))]
    pub async fn list_questions(&self, product: &ProductId) -> Result<Vec<ProductQuestion>> {
        let response: QuestionsResponse = self
            .backend
            .get(&["qa", "product", product.as_str()], "Failed to fetch questions")
            .await?;
        Ok(response.questions)
    }

    /// Ask a question about a product.
    ///
    /// # Errors
    ///
    /// Fails with "Failed to submit question" unless the backend says otherwise.
    #[instrument(skip(self, question), fields(product_id = %product))]
    pub async fn ask_question(&self, product: &ProductId, question: &NewQuestion) -> Result<()> {
        let _: IgnoredAny = self
            .backend
            .post_json(
                &["qa", "product", product.as_str(), "question"],
                question,
                "Failed to submit question",
            )
            .await?;
        Ok(())
    }

    /// Reply to a question thread.
    ///
    /// # Errors
    ///
    /// Fails with "Failed to submit answer" unless the backend says otherwise.
    #[instrument(skip(self, answer), fields(question_id = %question))]
    pub async fn answer_question(&self, question: &QuestionId, answer: &NewAnswer) -> Result<()> {
        let _: IgnoredAny = self
            .backend
            .post_json(
                &["qa", "question", question.as_str(), "answer"],
                answer,
                "Failed to submit answer",
            )
            .await?;
        Ok(())
    }
}
