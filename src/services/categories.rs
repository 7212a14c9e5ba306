use crate::domain::category::Category;
use crate::domain::types::{CategoryId, CategoryName};
use crate::dto::categories::CategoryDto;
use crate::forms::FormErrors;
use crate::forms::categories::CategoryFormPayload;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated, page_in_range};
use crate::repository::{CategoryListQuery, CategoryReader, CategoryWriter, RepositoryError};

use super::{ServiceError, ServiceResult};

pub const DUPLICATE_CATEGORY_MESSAGE: &str = "A categoria com este nome já existe.";

fn duplicate_name() -> ServiceError {
    ServiceError::Form(FormErrors::single("name", DUPLICATE_CATEGORY_MESSAGE))
}

/// Resolve a raw path id; ids that cannot exist are reported as not found.
pub(crate) fn parse_category_id(category_id: i32) -> ServiceResult<CategoryId> {
    CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)
}

/// Name-ordered, optionally searched page of categories.
///
/// A page outside `1..=total_pages` yields [`ServiceError::NotFound`]; the
/// first page of an empty result is always valid.
pub fn show_categories<R>(
    search: Option<&str>,
    page: usize,
    repo: &R,
) -> ServiceResult<Paginated<CategoryDto>>
where
    R: CategoryReader,
{
    let mut query = CategoryListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
        query = query.search(search);
    }

    let (total, categories) = match repo.list_categories(query) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !page_in_range(page, total, DEFAULT_ITEMS_PER_PAGE) {
        return Err(ServiceError::NotFound);
    }

    Ok(Paginated::new(categories, page, total, DEFAULT_ITEMS_PER_PAGE).map(CategoryDto::from))
}

/// Every category, ordered by name, for selects and the public index.
pub fn list_all_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    match repo.list_categories(CategoryListQuery::new()) {
        Ok((_total, categories)) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn get_category<R>(category_id: i32, repo: &R) -> ServiceResult<Category>
where
    R: CategoryReader,
{
    let category_id = parse_category_id(category_id)?;

    match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => Ok(category),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn ensure_name_available<R>(
    name: &CategoryName,
    exclude: Option<CategoryId>,
    repo: &R,
) -> ServiceResult<()>
where
    R: CategoryReader,
{
    match repo.category_name_exists(name, exclude) {
        Ok(false) => Ok(()),
        Ok(true) => Err(duplicate_name()),
        Err(e) => {
            log::error!("Failed to check category name: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Create a category unless another one already uses the name.
///
/// The explicit check produces the field error; the unique index catches
/// concurrent submissions that pass the check at the same time.
pub fn add_category<R>(payload: CategoryFormPayload, repo: &R) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter,
{
    ensure_name_available(&payload.name, None, repo)?;

    match repo.create_category(&payload.into_new_category()) {
        Ok(category) => {
            log::info!("Created category {} ({})", category.name, category.id);
            Ok(category)
        }
        Err(RepositoryError::Conflict(_)) => Err(duplicate_name()),
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Rename a category; keeping its own current name is allowed.
pub fn update_category<R>(
    category_id: i32,
    payload: CategoryFormPayload,
    repo: &R,
) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter,
{
    let category = get_category(category_id, repo)?;

    ensure_name_available(&payload.name, Some(category.id), repo)?;

    match repo.update_category(category.id, &payload.name) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(RepositoryError::Conflict(_)) => Err(duplicate_name()),
        Err(e) => {
            log::error!("Failed to update category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Delete a category. News items filed under it are removed with it.
pub fn delete_category<R>(category_id: i32, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter,
{
    let category = get_category(category_id, repo)?;

    match repo.delete_category(category.id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            log::info!("Deleted category {} ({})", category.name, category.id);
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Err(ServiceError::Internal)
        }
    }
}
