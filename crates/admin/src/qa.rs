//! Question moderation across the whole catalog.

use threadline_core::{AnswerId, NewAnswer, ProductId, ProductQuestion, QuestionId};
use threadline_storefront::api::{ProductsResponse, QuestionsResponse};
use tracing::{instrument, warn};

use crate::error::Result;
use crate::session::AdminSession;

/// A question thread together with the product it was asked on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuestion {
    pub product_id: ProductId,
    pub product_name: String,
    pub thread: ProductQuestion,
}

impl CatalogQuestion {
    /// Case-insensitive match on question text, asker or product name.
    /// A blank query matches everything.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || [
                self.thread.question.text.as_str(),
                self.thread.question.asked_by.as_str(),
                self.product_name.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Questions matching `query`, in their original order.
#[must_use]
pub fn filter_questions<'a>(questions: &'a [CatalogQuestion], query: &str) -> Vec<&'a CatalogQuestion> {
    questions.iter().filter(|q| q.matches(query)).collect()
}

impl AdminSession {
    /// Every question on every product, in catalog order.
    ///
    /// Products whose questions cannot be fetched are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` only if the product list itself fails.
    #[instrument(skip(self))]
    pub async fn all_questions(&self) -> Result<Vec<CatalogQuestion>> {
        let backend = self.backend();
        let catalog: ProductsResponse = backend
            .get(&["products"], "Failed to fetch products")
            .await?;

        let mut all = Vec::new();
        for product in catalog.products {
            let fetched: std::result::Result<QuestionsResponse, _> = backend
                .get(&["qa", "product", product.id.as_str()], "Failed to fetch questions")
                .await;
            match fetched {
                Ok(response) => all.extend(response.questions.into_iter().map(|thread| {
                    CatalogQuestion {
                        product_id: product.id.clone(),
                        product_name: product.name.clone(),
                        thread,
                    }
                })),
                Err(e) => {
                    warn!(product_id = %product.id, error = %e, "skipping product questions");
                }
            }
        }
        Ok(all)
    }

    /// Post an official answer.
    ///
    /// # Errors
    ///
    /// Returns `AdminError` for blank text, a missing session or a failed post.
    #[instrument(skip(self, text), fields(question_id = %question))]
    pub async fn answer_as_admin(
        &self,
        question: &QuestionId,
        text: &str,
        answered_by: Option<&str>,
    ) -> Result<()> {
        let answer = NewAnswer::official(text, answered_by)?;
        let _: serde::de::IgnoredAny = self
            .authorized()
            .await?
            .post_json(
                &["qa", "question", question.as_str(), "answer"],
                &answer,
                "Failed to add answer",
            )
            .await?;
        Ok(())
    }

    /// Delete a question thread and its answers.
    ///
    /// # Errors
    ///
    /// Returns `AdminError` for a missing session or a failed delete.
    #[instrument(skip(self), fields(question_id = %question))]
    pub async fn delete_question(&self, question: &QuestionId) -> Result<()> {
        self.authorized()
            .await?
            .delete(&["qa", "question", question.as_str()], "Failed to delete question")
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AdminError` for a missing session or a failed delete.
    #[instrument(skip(self), fields(question_id = %question, answer_id = %answer))]
    pub async fn delete_answer(&self, question: &QuestionId, answer: &AnswerId) -> Result<()> {
        self.authorized()
            .await?
            .delete(
                &["qa", "question", question.as_str(), "answer", answer.as_str()],
                "Failed to delete answer",
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn question(product: &str, text: &str, asked_by: &str) -> CatalogQuestion {
        CatalogQuestion {
            product_id: ProductId::new(format!("p-{product}")),
            product_name: product.to_owned(),
            thread: serde_json::from_value(serde_json::json!({
                "_id": format!("q-{text}"),
                "question": { "text": text, "askedBy": asked_by, "createdAt": "2024-06-01T00:00:00Z" }
            }))
            .unwrap(),
        }
    }

    fn sample() -> Vec<CatalogQuestion> {
        vec![
            question("Lawn Suit", "Is the dupatta included?", "Maryam"),
            question("Denim Jacket", "Does it run small?", "Bilal"),
            question("Lawn Suit", "Colour fast?", "Omar"),
        ]
    }

    #[test]
    fn test_blank_query_matches_all() {
        let all = sample();
        assert_eq!(filter_questions(&all, "  ").len(), 3);
    }

    #[test]
    fn test_matches_each_field() {
        let all = sample();
        let by_text = filter_questions(&all, "DUPATTA");
        assert_eq!(by_text.len(), 1);
        assert_eq!(by_text[0].thread.question.asked_by, "Maryam");

        assert_eq!(filter_questions(&all, "bilal").len(), 1);

        let by_product: Vec<_> = filter_questions(&all, "lawn")
            .into_iter()
            .map(|q| q.thread.question.asked_by.as_str())
            .collect();
        assert_eq!(by_product, ["Maryam", "Omar"]);

        assert!(filter_questions(&all, "shipping").is_empty());
    }
}
