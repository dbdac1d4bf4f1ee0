use sqlx::SqlitePool;

use crate::models::{GalleryItem, ListFilter, NewGalleryItemRequest};

pub async fn fetch_items(db: &SqlitePool, filter: &ListFilter) -> Result<Vec<GalleryItem>, sqlx::Error> {
    sqlx::query_as::<_, GalleryItem>(
        r#"
        SELECT * FROM gallery_items
        WHERE (?1 IS NULL OR lower(title) LIKE ?1 ESCAPE '\' OR lower(coalesce(description, '')) LIKE ?1 ESCAPE '\')
          AND (?2 IS NULL OR category = ?2)
        ORDER BY display_order ASC, created_at DESC
        "#,
    )
    .bind(filter.search_pattern())
    .bind(filter.category())
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &SqlitePool, id: &str) -> Result<Option<GalleryItem>, sqlx::Error> {
    sqlx::query_as::<_, GalleryItem>("SELECT * FROM gallery_items WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert(db: &SqlitePool, req: NewGalleryItemRequest) -> Result<GalleryItem, sqlx::Error> {
    let item = GalleryItem {
        id: super::new_id(),
        category: req.category,
        title: req.title,
        description: req.description,
        item_type: req.item_type.unwrap_or_else(|| "image".to_string()),
        thumbnail_url: req.thumbnail_url,
        image_url: req.image_url,
        video_url: req.video_url,
        is_featured: req.is_featured.unwrap_or(false),
        display_order: req.display_order.unwrap_or(0),
        created_at: super::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO gallery_items
            (id, category, title, description, type, thumbnail_url, image_url,
            video_url, is_featured, display_order, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(&item.id)
    .bind(&item.category)
    .bind(&item.title)
    .bind(&item.description)
    .bind(&item.item_type)
    .bind(&item.thumbnail_url)
    .bind(&item.image_url)
    .bind(&item.video_url)
    .bind(item.is_featured)
    .bind(item.display_order)
    .bind(&item.created_at)
    .execute(db)
    .await?;

    Ok(item)
}

pub async fn update(db: &SqlitePool, item: &GalleryItem) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE gallery_items
        SET category = ?1,
            title = ?2,
            description = ?3,
            type = ?4,
            thumbnail_url = ?5,
            image_url = ?6,
            video_url = ?7,
            is_featured = ?8,
            display_order = ?9
        WHERE id = ?10
        "#,
    )
    .bind(&item.category)
    .bind(&item.title)
    .bind(&item.description)
    .bind(&item.item_type)
    .bind(&item.thumbnail_url)
    .bind(&item.image_url)
    .bind(&item.video_url)
    .bind(item.is_featured)
    .bind(item.display_order)
    .bind(&item.id)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn delete(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM gallery_items WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
