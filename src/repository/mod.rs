use chrono::NaiveDate;

use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory};
use crate::domain::news::{NewNews, News};
use crate::domain::types::{CategoryId, CategoryName, NewsId, UserId};
use crate::domain::user::{NewUser, User};
use crate::pagination::Pagination;

pub mod category;
pub mod errors;
pub mod news;
pub mod user;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
pub(crate) fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Query parameters used when listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl CategoryListQuery {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Query parameters used when listing news items.
///
/// Every populated field narrows the result; `None` imposes no constraint.
#[derive(Debug, Clone, Default)]
pub struct NewsListQuery {
    /// Restrict to items owned by this user.
    pub owner_id: Option<UserId>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Inclusive lower bound on the publication date.
    pub published_from: Option<NaiveDate>,
    /// Inclusive upper bound on the publication date.
    pub published_to: Option<NaiveDate>,
    /// Exact category match.
    pub category_id: Option<CategoryId>,
}

impl NewsListQuery {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
    pub fn published_from(mut self, date: NaiveDate) -> Self {
        self.published_from = Some(date);
        self
    }
    pub fn published_to(mut self, date: NaiveDate) -> Self {
        self.published_to = Some(date);
        self
    }
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List categories ordered by name, returning the unpaginated total as well.
    fn list_categories(&self, query: CategoryListQuery)
    -> RepositoryResult<(usize, Vec<Category>)>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    /// Retrieve a category by its exact name.
    fn get_category_by_name(&self, name: &str) -> RepositoryResult<Option<Category>>;
    /// Whether another category already uses `name` (case-sensitive).
    fn category_name_exists(
        &self,
        name: &CategoryName,
        exclude: Option<CategoryId>,
    ) -> RepositoryResult<bool>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Rename a category.
    fn update_category(&self, id: CategoryId, name: &CategoryName) -> RepositoryResult<usize>;
    /// Delete a category together with the news items filed under it.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for news entities.
pub trait NewsReader {
    /// List news matching the query, newest publication date first.
    fn list_news(&self, query: NewsListQuery) -> RepositoryResult<Vec<News>>;
    /// Retrieve a news item by its identifier.
    fn get_news_by_id(&self, id: NewsId) -> RepositoryResult<Option<News>>;
}

/// Write operations for news entities.
pub trait NewsWriter {
    /// Persist a new news item.
    fn create_news(&self, news: &NewNews) -> RepositoryResult<News>;
    /// Replace every column of an existing news item.
    fn update_news(&self, id: NewsId, news: &NewNews) -> RepositoryResult<usize>;
}

/// Read-only operations for user accounts.
pub trait UserReader {
    fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
}

/// Write operations for user accounts.
pub trait UserWriter {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
}
