//! Landing page banners.

use threadline_core::{Banner, BannerId};
use threadline_storefront::backend::Upload;
use tracing::{info, instrument};

use crate::error::Result;
use crate::session::AdminSession;

impl AdminSession {
    /// Banners in carousel order.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the banners cannot be fetched.
    #[instrument(skip(self))]
    pub async fn list_banners(&self) -> Result<Vec<Banner>> {
        Ok(self
            .backend()
            .get(&["banners"], "Failed to fetch banners")
            .await?)
    }

    /// Upload one banner image.
    ///
    /// # Errors
    ///
    /// Returns `AdminError` for a missing session or a failed upload.
    #[instrument(skip_all, fields(file = %image.file_name()))]
    pub async fn upload_banner(&self, image: &Upload) -> Result<()> {
        let _: serde::de::IgnoredAny = self
            .authorized()
            .await?
            .post_multipart(
                &["banners"],
                "image",
                std::slice::from_ref(image),
                "Failed to upload banner",
            )
            .await?;
        info!("banner uploaded");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AdminError` for a missing session or a failed delete.
    #[instrument(skip(self), fields(banner_id = %id))]
    pub async fn delete_banner(&self, id: &BannerId) -> Result<()> {
        self.authorized()
            .await?
            .delete(&["banners", id.as_str()], "Failed to delete banner")
            .await?;
        info!("banner deleted");
        Ok(())
    }
}
