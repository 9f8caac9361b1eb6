//! Back-office commands.

use std::io::Write;
use std::path::{Path, PathBuf};

use threadline_admin::{AdminConfig, AdminSession, ProductForm, filter_questions};
use threadline_core::{AnswerId, BannerId, OrderId, OrderQuery, OrderStatus, ProductId, QuestionId};
use threadline_storefront::backend::Upload;
use threadline_storefront::config::Env;

use super::{CliError, Shop};
use crate::output;

/// A logged-in admin session.
pub struct BackOffice {
    session: AdminSession,
}

impl BackOffice {
    /// Log in with the credentials from the environment.
    pub async fn login(shop: &Shop) -> Result<Self, CliError> {
        let config = AdminConfig::from_lookup(&Env::process())?;
        let session = AdminSession::new(shop.backend().clone());
        session.login(&config.email, &config.password).await?;
        Ok(Self { session })
    }

    pub async fn add_product(&self, form: &ProductForm, images: &[PathBuf]) -> Result<(), CliError> {
        let files = read_uploads(images).await?;
        self.session.add_product(form, &files).await?;
        writeln!(std::io::stdout().lock(), "Product added successfully!")?;
        Ok(())
    }

    pub async fn update_product(
        &self,
        id: &str,
        form: &ProductForm,
        images: &[PathBuf],
    ) -> Result<(), CliError> {
        let id = ProductId::new(id);
        let files = read_uploads(images).await?;
        let existing = self.session.get_product(&id).await?.images;
        self.session.update_product(&id, form, existing, &files).await?;
        writeln!(std::io::stdout().lock(), "Product updated")?;
        Ok(())
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), CliError> {
        self.session.delete_product(&ProductId::new(id)).await?;
        writeln!(std::io::stdout().lock(), "Product deleted")?;
        Ok(())
    }

    pub async fn feature(&self, id: &str, is_featured: bool) -> Result<(), CliError> {
        self.session
            .set_featured(&ProductId::new(id), is_featured)
            .await?;
        let state = if is_featured { "featured" } else { "no longer featured" };
        writeln!(std::io::stdout().lock(), "Product {id} is {state}")?;
        Ok(())
    }

    pub async fn list_banners(&self) -> Result<(), CliError> {
        let banners = self.session.list_banners().await?;
        output::banners(&mut std::io::stdout().lock(), &banners)?;
        Ok(())
    }

    pub async fn upload_banner(&self, path: &Path) -> Result<(), CliError> {
        let file = Upload::from_path(path).await?;
        self.session.upload_banner(&file).await?;
        writeln!(std::io::stdout().lock(), "Banner uploaded")?;
        Ok(())
    }

    pub async fn delete_banner(&self, id: &str) -> Result<(), CliError> {
        self.session.delete_banner(&BannerId::new(id)).await?;
        writeln!(std::io::stdout().lock(), "Banner deleted")?;
        Ok(())
    }

    pub async fn list_questions(&self, search: &str) -> Result<(), CliError> {
        let all = self.session.all_questions().await?;
        output::catalog_questions(&mut std::io::stdout().lock(), &filter_questions(&all, search))?;
        Ok(())
    }

    pub async fn answer(
        &self,
        question_id: &str,
        text: &str,
        answered_by: Option<&str>,
    ) -> Result<(), CliError> {
        self.session
            .answer_as_admin(&QuestionId::new(question_id), text, answered_by)
            .await?;
        writeln!(std::io::stdout().lock(), "Answer added successfully")?;
        Ok(())
    }

    pub async fn delete_question(&self, question_id: &str) -> Result<(), CliError> {
        self.session
            .delete_question(&QuestionId::new(question_id))
            .await?;
        writeln!(std::io::stdout().lock(), "Question deleted successfully")?;
        Ok(())
    }

    pub async fn delete_answer(&self, question_id: &str, answer_id: &str) -> Result<(), CliError> {
        self.session
            .delete_answer(&QuestionId::new(question_id), &AnswerId::new(answer_id))
            .await?;
        writeln!(std::io::stdout().lock(), "Answer deleted successfully")?;
        Ok(())
    }

    pub async fn list_orders(&self, query: &OrderQuery) -> Result<(), CliError> {
        let orders = self.session.list_orders().await?;
        output::orders(&mut std::io::stdout().lock(), &query.apply(&orders))?;
        Ok(())
    }

    pub async fn set_status(&self, id: &str, status: OrderStatus) -> Result<(), CliError> {
        self.session
            .update_order_status(&OrderId::new(id), status)
            .await?;
        writeln!(std::io::stdout().lock(), "Order {id} is now {status}")?;
        Ok(())
    }
}

async fn read_uploads(paths: &[PathBuf]) -> Result<Vec<Upload>, CliError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(Upload::from_path(path).await?);
    }
    Ok(files)
}
