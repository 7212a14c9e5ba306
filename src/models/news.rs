use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::news::{NewNews as DomainNewNews, News as DomainNews};
use crate::domain::types::{AttachmentPath, NewsBody, NewsTitle, TypeConstraintError};

/// Diesel model representing the `news` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::news)]
pub struct News {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub category_id: i32,
    pub publication_date: NaiveDate,
    pub owner_id: i32,
    pub attachment: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable/patchable form of [`News`].
///
/// `treat_none_as_null` makes an update clear the attachment column.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::news)]
#[diesel(treat_none_as_null = true)]
pub struct NewNews {
    pub title: String,
    pub body: String,
    pub category_id: i32,
    pub publication_date: NaiveDate,
    pub owner_id: i32,
    pub attachment: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<News> for DomainNews {
    type Error = TypeConstraintError;

    fn try_from(news: News) -> Result<Self, Self::Error> {
        Ok(Self {
            id: news.id.try_into()?,
            title: NewsTitle::new(news.title)?,
            body: NewsBody::new(news.body)?,
            category_id: news.category_id.try_into()?,
            publication_date: news.publication_date,
            owner_id: news.owner_id.try_into()?,
            attachment: news.attachment.map(AttachmentPath::new).transpose()?,
            created_at: news.created_at,
            updated_at: news.updated_at,
        })
    }
}

impl From<DomainNewNews> for NewNews {
    fn from(news: DomainNewNews) -> Self {
        Self {
            title: news.title.into_inner(),
            body: news.body.into_inner(),
            category_id: news.category_id.get(),
            publication_date: news.publication_date,
            owner_id: news.owner_id.get(),
            attachment: news.attachment.map(AttachmentPath::into_inner),
            created_at: news.created_at,
            updated_at: news.updated_at,
        }
    }
}
