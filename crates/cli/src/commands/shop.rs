//! Customer commands: catalog, cart, checkout and questions.

use std::io::Write;

use threadline_core::{Category, CheckoutForm, NewQuestion, OrderSummary, ProductId, catalog};
use threadline_storefront::persistence::CartFile;
use threadline_storefront::selection::cart_item_from_product;
use threadline_storefront::{BackendClient, StorefrontClient, StorefrontConfig, checkout};
use tracing::info;

use super::CliError;
use crate::output;

/// Storefront client plus the on-disk cart.
pub struct Shop {
    client: StorefrontClient,
    cart_file: CartFile,
}

impl Shop {
    pub fn new(config: &StorefrontConfig) -> Result<Self, CliError> {
        let backend = BackendClient::from_config(config)?;
        Ok(Self {
            cart_file: CartFile::new(&config.cart_path),
            client: StorefrontClient::new(backend),
        })
    }

    pub const fn backend(&self) -> &BackendClient {
        self.client.backend()
    }

    pub async fn list_products(
        &self,
        search: &str,
        category: Option<Category>,
        featured_only: bool,
    ) -> Result<(), CliError> {
        let products = self.client.list_products().await?;
        let mut shown = catalog::filter_products(&products, search, category);
        if featured_only {
            shown.retain(|p| p.is_featured);
        }
        output::products(&mut std::io::stdout().lock(), &shown)?;
        Ok(())
    }

    pub async fn show_product(&self, id: &str) -> Result<(), CliError> {
        let product = self.client.get_product(&ProductId::new(id)).await?;
        output::product_detail(&mut std::io::stdout().lock(), &product)?;
        Ok(())
    }

    pub fn show_cart(&self) -> Result<(), CliError> {
        let cart = self.cart_file.load()?;
        output::cart(&mut std::io::stdout().lock(), &cart, &OrderSummary::for_cart(&cart))?;
        Ok(())
    }

    pub async fn add_to_cart(
        &self,
        product_id: &str,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<(), CliError> {
        let mut cart = self.cart_file.load()?;
        let product = self.client.get_product(&ProductId::new(product_id)).await?;
        let item = cart_item_from_product(&product, size, color)?;
        let name = item.name.clone();
        cart.add(item)?;
        self.cart_file.save(&cart)?;

        info!(product = %name, items = cart.len(), "added to cart");
        writeln!(std::io::stdout().lock(), "Added {name} to cart ({} items)", cart.len())?;
        Ok(())
    }

    pub fn remove_from_cart(&self, product_id: &str) -> Result<(), CliError> {
        let mut cart = self.cart_file.load()?;
        cart.remove(&ProductId::new(product_id));
        self.cart_file.save(&cart)?;
        writeln!(std::io::stdout().lock(), "Cart has {} items", cart.len())?;
        Ok(())
    }

    pub fn clear_cart(&self) -> Result<(), CliError> {
        let mut cart = self.cart_file.load()?;
        cart.clear();
        self.cart_file.save(&cart)?;
        writeln!(std::io::stdout().lock(), "Cart cleared")?;
        Ok(())
    }

    pub async fn checkout(&self, form: &CheckoutForm) -> Result<(), CliError> {
        let mut cart = self.cart_file.load()?;
        let summary = OrderSummary::for_cart(&cart);
        let confirmation = checkout::place_order(&self.client, &mut cart, form).await?;
        self.cart_file.save(&cart)?;

        output::order_placed(&mut std::io::stdout().lock(), &confirmation, &summary)?;
        Ok(())
    }

    pub async fn list_questions(&self, product_id: &str) -> Result<(), CliError> {
        let threads = self.client.list_questions(&ProductId::new(product_id)).await?;
        output::questions(&mut std::io::stdout().lock(), &threads)?;
        Ok(())
    }

    pub async fn ask_question(
        &self,
        product_id: &str,
        text: &str,
        name: &str,
        email: &str,
    ) -> Result<(), CliError> {
        let question = NewQuestion::new(text, name, email)?;
        self.client
            .ask_question(&ProductId::new(product_id), &question)
            .await?;
        writeln!(std::io::stdout().lock(), "Question submitted")?;
        Ok(())
    }
}
