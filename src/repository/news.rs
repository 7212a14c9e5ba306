use diesel::prelude::*;

use crate::domain::news::{NewNews, News};
use crate::domain::types::NewsId;
use crate::models::news::{NewNews as DbNewNews, News as DbNews};
use crate::repository::{
    DieselRepository, NewsListQuery, NewsReader, NewsWriter, RepositoryResult, contains_pattern,
};

impl NewsReader for DieselRepository {
    fn list_news(&self, query: NewsListQuery) -> RepositoryResult<Vec<News>> {
        use crate::schema::news;

        let mut conn = self.conn()?;

        let mut items = news::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(owner_id) = query.owner_id {
            items = items.filter(news::owner_id.eq(owner_id.get()));
        }
        if let Some(title) = query.title.as_deref().filter(|t| !t.is_empty()) {
            items = items.filter(news::title.like(contains_pattern(title)).escape('\\'));
        }
        if let Some(from) = query.published_from {
            items = items.filter(news::publication_date.ge(from));
        }
        if let Some(to) = query.published_to {
            items = items.filter(news::publication_date.le(to));
        }
        if let Some(category_id) = query.category_id {
            items = items.filter(news::category_id.eq(category_id.get()));
        }

        let items = items
            .order((news::publication_date.desc(), news::id.desc()))
            .load::<DbNews>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<News>, _>>()?;

        Ok(items)
    }

    fn get_news_by_id(&self, id: NewsId) -> RepositoryResult<Option<News>> {
        use crate::schema::news;

        let mut conn = self.conn()?;

        let item = news::table
            .filter(news::id.eq(id.get()))
            .first::<DbNews>(&mut conn)
            .optional()?;

        let item = item.map(TryInto::try_into).transpose()?;
        Ok(item)
    }
}

impl NewsWriter for DieselRepository {
    fn create_news(&self, news_item: &NewNews) -> RepositoryResult<News> {
        use crate::schema::news;

        let mut conn = self.conn()?;
        let db_news: DbNewNews = news_item.clone().into();

        let created = diesel::insert_into(news::table)
            .values(db_news)
            .returning(DbNews::as_returning())
            .get_result(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_news(&self, id: NewsId, news_item: &NewNews) -> RepositoryResult<usize> {
        use crate::schema::news;

        let mut conn = self.conn()?;
        let db_news: DbNewNews = news_item.clone().into();

        let affected = diesel::update(news::table.filter(news::id.eq(id.get())))
            .set(db_news)
            .execute(&mut conn)?;

        Ok(affected)
    }
}
