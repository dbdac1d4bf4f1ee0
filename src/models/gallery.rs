use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GalleryItem {
    pub id: String,
    pub category: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub item_type: String,
    pub thumbnail_url: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub is_featured: bool,
    pub display_order: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGalleryItemRequest {
    pub category: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub thumbnail_url: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub is_featured: Option<bool>,
    pub display_order: Option<i64>,
}

impl NewGalleryItemRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.category.trim().is_empty() {
            return Err(AppError::BadRequest("category is required".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGalleryItemRequest {
    pub category: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub thumbnail_url: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub is_featured: Option<bool>,
    pub display_order: Option<i64>,
}

impl UpdateGalleryItemRequest {
    pub fn apply(self, current: &mut GalleryItem) {
        if let Some(v) = self.category {
            current.category = v;
        }
        if let Some(v) = self.title {
            current.title = v;
        }
        if let Some(v) = self.description {
            current.description = Some(v);
        }
        if let Some(v) = self.item_type {
            current.item_type = v;
        }
        if let Some(v) = self.thumbnail_url {
            current.thumbnail_url = Some(v);
        }
        if let Some(v) = self.image_url {
            current.image_url = Some(v);
        }
        if let Some(v) = self.video_url {
            current.video_url = Some(v);
        }
        if let Some(v) = self.is_featured {
            current.is_featured = v;
        }
        if let Some(v) = self.display_order {
            current.display_order = v;
        }
    }
}
