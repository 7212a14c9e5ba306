use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::domain::news::{NewNews, News};
use crate::domain::types::{AttachmentPath, NewsId};
use crate::dto::categories::CategoryDto;
use crate::dto::news::{NewsDto, category_names};
use crate::forms::FormErrors;
use crate::forms::news::{NewsFilter, NewsFilterForm, NewsFormPayload};
use crate::repository::{CategoryReader, NewsListQuery, NewsReader, NewsWriter};
use crate::services::categories::list_all_categories;
use crate::storage::{AttachmentStore, PendingUpload};

use super::{ServiceError, ServiceResult};

/// Owner-scoped news listing with the bound filter state.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsListing {
    pub news: Vec<NewsDto>,
    pub categories: Vec<CategoryDto>,
    /// Filter problems; when present no filter narrowed the list.
    pub filter_errors: FormErrors,
}

/// List the session user's news narrowed by the filled filter fields.
///
/// An invalid filter (malformed date, unknown category) is reported back
/// and only the owner scoping applies.
pub fn show_news<R>(
    filter_form: &NewsFilterForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<NewsListing>
where
    R: NewsReader + CategoryReader,
{
    let categories = list_all_categories(repo)?;

    let (filter, filter_errors) = match NewsFilter::try_from(filter_form) {
        Ok(filter) => match filter.category_id {
            Some(category_id) if !categories.iter().any(|c| c.id == category_id.get()) => (
                NewsFilter::default(),
                FormErrors::single("categoria", "Selecione uma categoria válida."),
            ),
            _ => (filter, FormErrors::new()),
        },
        Err(errors) => (NewsFilter::default(), errors),
    };

    let mut query = NewsListQuery::new().owner(user.id);
    if let Some(title) = filter.title {
        query = query.title(title);
    }
    if let Some(from) = filter.published_from {
        query = query.published_from(from);
    }
    if let Some(to) = filter.published_to {
        query = query.published_to(to);
    }
    if let Some(category_id) = filter.category_id {
        query = query.category(category_id);
    }

    let names = category_names(&categories);
    match repo.list_news(query) {
        Ok(news) => Ok(NewsListing {
            news: news
                .into_iter()
                .map(|item| NewsDto::new(item, &names))
                .collect(),
            categories,
            filter_errors,
        }),
        Err(e) => {
            log::error!("Failed to list news: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn get_news<R>(news_id: i32, repo: &R) -> ServiceResult<News>
where
    R: NewsReader,
{
    let news_id = NewsId::new(news_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_news_by_id(news_id) {
        Ok(Some(news)) => Ok(news),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get news: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn ensure_category_exists<R>(payload: &NewsFormPayload, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader,
{
    match repo.get_category_by_id(payload.category_id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ServiceError::Form(FormErrors::single(
            "category",
            "Selecione uma categoria válida.",
        ))),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn store_upload<S>(upload: PendingUpload<'_>, storage: &S) -> ServiceResult<AttachmentPath>
where
    S: AttachmentStore + ?Sized,
{
    storage.save(upload).map_err(|e| {
        log::error!("Failed to store attachment: {e}");
        ServiceError::Internal
    })
}

fn discard_attachment<S>(stored: &AttachmentPath, storage: &S)
where
    S: AttachmentStore + ?Sized,
{
    if let Err(e) = storage.remove(stored) {
        log::warn!("Failed to remove attachment {stored}: {e}");
    }
}

/// Create a news item owned by the session user.
///
/// The attachment is written only after every field validated and is
/// removed again when the insert fails.
pub fn create_news<R, S>(
    payload: NewsFormPayload,
    upload: Option<PendingUpload<'_>>,
    user: &AuthenticatedUser,
    repo: &R,
    storage: &S,
) -> ServiceResult<News>
where
    R: NewsWriter + CategoryReader,
    S: AttachmentStore + ?Sized,
{
    ensure_category_exists(&payload, repo)?;

    let attachment = upload
        .map(|upload| store_upload(upload, storage))
        .transpose()?;

    let now = Utc::now().naive_utc();
    let new_news = NewNews {
        title: payload.title,
        body: payload.body,
        category_id: payload.category_id,
        publication_date: payload.publication_date,
        owner_id: user.id,
        attachment,
        created_at: now,
        updated_at: now,
    };

    match repo.create_news(&new_news) {
        Ok(news) => {
            log::info!("User {} created news {}", user.id, news.id);
            Ok(news)
        }
        Err(e) => {
            log::error!("Failed to create news: {e}");
            if let Some(stored) = &new_news.attachment {
                discard_attachment(stored, storage);
            }
            Err(ServiceError::Internal)
        }
    }
}

/// Replace a news item's fields and re-stamp its owner to the session user.
///
/// A new upload replaces the attachment; `clear_attachment` drops it;
/// otherwise the stored file is kept. A replaced or cleared file is deleted
/// once the row is saved; a fresh upload is deleted if the save fails.
pub fn update_news<R, S>(
    news_id: i32,
    payload: NewsFormPayload,
    upload: Option<PendingUpload<'_>>,
    user: &AuthenticatedUser,
    repo: &R,
    storage: &S,
) -> ServiceResult<()>
where
    R: NewsReader + NewsWriter + CategoryReader,
    S: AttachmentStore + ?Sized,
{
    let existing = get_news(news_id, repo)?;
    ensure_category_exists(&payload, repo)?;

    let uploaded = upload
        .map(|upload| store_upload(upload, storage))
        .transpose()?;
    let attachment = match &uploaded {
        Some(stored) => Some(stored.clone()),
        None if payload.clear_attachment => None,
        None => existing.attachment.clone(),
    };

    let updated = NewNews {
        title: payload.title,
        body: payload.body,
        category_id: payload.category_id,
        publication_date: payload.publication_date,
        owner_id: user.id,
        attachment,
        created_at: existing.created_at,
        updated_at: Utc::now().naive_utc(),
    };

    let result = match repo.update_news(existing.id, &updated) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            log::info!("User {} updated news {}", user.id, existing.id);
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to update news: {e}");
            Err(ServiceError::Internal)
        }
    };

    match (&result, &existing.attachment) {
        (Ok(()), Some(previous)) if updated.attachment.as_ref() != Some(previous) => {
            discard_attachment(previous, storage);
        }
        (Err(_), _) => {
            if let Some(stored) = &uploaded {
                discard_attachment(stored, storage);
            }
        }
        _ => {}
    }

    result
}
