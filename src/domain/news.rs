use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{AttachmentPath, CategoryId, NewsBody, NewsId, NewsTitle, UserId};

/// Canonical news item owned by an editorial user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct News {
    pub id: NewsId,
    pub title: NewsTitle,
    pub body: NewsBody,
    pub category_id: CategoryId,
    pub publication_date: NaiveDate,
    pub owner_id: UserId,
    pub attachment: Option<AttachmentPath>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert or fully replace a [`News`] item.
///
/// `owner_id` is always taken from the session, never from submitted form data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewNews {
    pub title: NewsTitle,
    pub body: NewsBody,
    pub category_id: CategoryId,
    pub publication_date: NaiveDate,
    pub owner_id: UserId,
    pub attachment: Option<AttachmentPath>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
