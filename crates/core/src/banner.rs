//! Landing page banners.

use serde::{Deserialize, Serialize};

use crate::types::BannerId;

/// A hero image shown on the landing page carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(rename = "_id", alias = "id")]
    pub id: BannerId,
    pub image_url: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        let banners: Vec<Banner> = serde_json::from_str(
            r#"[{"_id":"b1","imageUrl":"https://cdn.example.com/banner1.jpg"}]"#,
        )
        .unwrap();
        assert_eq!(banners[0].id.as_str(), "b1");
        assert_eq!(banners[0].image_url, "https://cdn.example.com/banner1.jpg");
    }
}
