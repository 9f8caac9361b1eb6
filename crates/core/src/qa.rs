//! Product questions and answers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AnswerId, Email, EmailError, QuestionId};

/// Name shown on answers posted from the back office.
pub const STORE_ADMIN: &str = "Store Admin";

/// A question thread on a product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuestion {
    #[serde(rename = "_id", alias = "id")]
    pub id: QuestionId,
    pub question: Question,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    pub asked_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: AnswerId,
    pub text: String,
    pub answered_by: String,
    /// Answers from the shop are shown as official.
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl ProductQuestion {
    #[must_use]
    pub fn is_answered(&self) -> bool {
        !self.answers.is_empty()
    }

    /// Whether the shop has replied.
    #[must_use]
    pub fn has_official_answer(&self) -> bool {
        self.answers.iter().any(|a| a.is_admin)
    }
}

/// A question or answer form is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QaFormError {
    #[error("Please fill in all required fields ({0} is missing)")]
    MissingField(&'static str),
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),
}

/// Payload for `POST /qa/product/:id/question`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub text: String,
    pub asked_by: String,
    pub email: Email,
}

impl NewQuestion {
    /// Build a question from form input. All three fields are required.
    ///
    /// # Errors
    ///
    /// Returns [`QaFormError`] for a blank field or a malformed email.
    pub fn new(text: &str, asked_by: &str, email: &str) -> Result<Self, QaFormError> {
        Ok(Self {
            text: non_blank(text, "question")?,
            asked_by: non_blank(asked_by, "name")?,
            email: Email::parse(&non_blank(email, "email")?)?,
        })
    }
}

/// Payload for `POST /qa/question/:id/answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnswer {
    pub text: String,
    pub answered_by: String,
    pub is_admin: bool,
}

impl NewAnswer {
    /// An official answer from the shop, signed `answered_by` or [`STORE_ADMIN`].
    ///
    /// # Errors
    ///
    /// Returns [`QaFormError::MissingField`] if `text` is blank.
    pub fn official(text: &str, answered_by: Option<&str>) -> Result<Self, QaFormError> {
        let answered_by = answered_by
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(STORE_ADMIN);
        Ok(Self {
            text: non_blank(text, "answer")?,
            answered_by: answered_by.to_owned(),
            is_admin: true,
        })
    }
}

fn non_blank(value: &str, field: &'static str) -> Result<String, QaFormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(QaFormError::MissingField(field))
    } else {
        Ok(trimmed.to_owned())
    }
}
