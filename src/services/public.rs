use serde::Serialize;

use crate::dto::categories::CategoryDto;
use crate::dto::news::{NewsDto, category_names};
use crate::repository::{CategoryReader, NewsListQuery, NewsReader};
use crate::services::categories::list_all_categories;

use super::{ServiceError, ServiceResult};

/// Data behind the public front page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicIndex {
    pub news: Vec<NewsDto>,
    pub categories: Vec<CategoryDto>,
    /// Name of the category actually applied, if any.
    pub selected_category: Option<String>,
    pub search: Option<String>,
}

/// News of every user, optionally narrowed by category name and title text.
///
/// A category name that matches nothing exactly is ignored.
pub fn show_public_index<R>(
    category_name: Option<&str>,
    search: Option<&str>,
    repo: &R,
) -> ServiceResult<PublicIndex>
where
    R: NewsReader + CategoryReader,
{
    let categories = list_all_categories(repo)?;
    let mut query = NewsListQuery::new();

    let selected = match category_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => match repo.get_category_by_name(name) {
            Ok(category) => category,
            Err(e) => {
                log::error!("Failed to get category by name: {e}");
                return Err(ServiceError::Internal);
            }
        },
        None => None,
    };
    if let Some(category) = &selected {
        query = query.category(category.id);
    }

    let search = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    if let Some(search) = &search {
        query = query.title(search.as_str());
    }

    let names = category_names(&categories);
    let news = match repo.list_news(query) {
        Ok(news) => news
            .into_iter()
            .map(|item| NewsDto::new(item, &names))
            .collect(),
        Err(e) => {
            log::error!("Failed to list public news: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(PublicIndex {
        news,
        selected_category: selected.map(|c| c.name.into_inner()),
        categories,
        search,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::category::Category;
    use crate::domain::news::News;
    use crate::domain::types::{CategoryId, CategoryName, NewsBody, NewsId, NewsTitle, UserId};
    use crate::repository::test::TestRepository;

    fn repo() -> TestRepository {
        let category = |id: i32, name: &str| Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(name).unwrap(),
        };
        let news = |id: i32, owner: i32, category_id: i32, title: &str| {
            let stamp = NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap();
            News {
                id: NewsId::new(id).unwrap(),
                title: NewsTitle::new(title).unwrap(),
                body: NewsBody::new("Corpo").unwrap(),
                category_id: CategoryId::new(category_id).unwrap(),
                publication_date: NaiveDate::from_ymd_opt(2024, 1, id as u32).unwrap(),
                owner_id: UserId::new(owner).unwrap(),
                attachment: None,
                created_at: stamp,
                updated_at: stamp,
            }
        };
        TestRepository::new(
            vec![category(1, "Política"), category(2, "Esportes")],
            vec![
                news(1, 1, 1, "Eleições"),
                news(2, 2, 2, "Copa do Brasil"),
                news(3, 3, 2, "Brasileirão"),
            ],
        )
    }

    fn ids(index: &PublicIndex) -> Vec<i32> {
        index.news.iter().map(|n| n.id).collect()
    }

    #[test]
    fn lists_news_of_every_owner() {
        let index = show_public_index(None, None, &repo()).unwrap();
        assert_eq!(ids(&index), [3, 2, 1]);
        assert_eq!(index.categories.len(), 2);
    }

    #[test]
    fn filters_by_exact_category_name() {
        let index = show_public_index(Some("Esportes"), None, &repo()).unwrap();
        assert_eq!(ids(&index), [3, 2]);
        assert_eq!(index.selected_category.as_deref(), Some("Esportes"));
    }

    #[test]
    fn unknown_category_name_is_ignored() {
        let index = show_public_index(Some("esportes"), None, &repo()).unwrap();
        assert_eq!(ids(&index), [3, 2, 1]);
        assert!(index.selected_category.is_none());
    }

    #[test]
    fn search_matches_title_case_insensitively() {
        let index = show_public_index(Some("Esportes"), Some("brasil"), &repo()).unwrap();
        assert_eq!(ids(&index), [3, 2]);

        let index = show_public_index(None, Some("COPA"), &repo()).unwrap();
        assert_eq!(ids(&index), [2]);
    }
}
