use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::news::News;
use crate::dto::categories::CategoryDto;

/// News item joined with its category name for listing pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsDto {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub category_id: i32,
    pub category_name: String,
    pub publication_date: NaiveDate,
    pub owner_id: i32,
    /// Path below `/media`.
    pub attachment: Option<String>,
    pub attachment_name: Option<String>,
}

impl NewsDto {
    pub fn new(news: News, category_names: &HashMap<i32, String>) -> Self {
        let category_id = news.category_id.get();
        Self {
            id: news.id.get(),
            title: news.title.into_inner(),
            body: news.body.into_inner(),
            category_id,
            category_name: category_names
                .get(&category_id)
                .cloned()
                .unwrap_or_default(),
            publication_date: news.publication_date,
            owner_id: news.owner_id.get(),
            attachment_name: news
                .attachment
                .as_ref()
                .map(|path| path.display_name().to_string()),
            attachment: news.attachment.map(|path| path.into_inner()),
        }
    }
}

/// Lookup table used by [`NewsDto::new`].
pub fn category_names(categories: &[CategoryDto]) -> HashMap<i32, String> {
    categories
        .iter()
        .map(|category| (category.id, category.name.clone()))
        .collect()
}
