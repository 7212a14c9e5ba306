//! Helpers for integration tests.
#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_news::db::{DbPool, establish_connection_pool};
use pushkind_news::domain::category::{Category, NewCategory};
use pushkind_news::domain::news::{NewNews, News};
use pushkind_news::domain::types::{CategoryName, NewsBody, NewsTitle, UserId};
use pushkind_news::repository::{CategoryWriter, DieselRepository, NewsWriter};
use pushkind_news::schema::users;
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }

    /// Insert a placeholder account with `id` unless one exists.
    pub fn ensure_user(&self, id: i32) {
        let mut conn = self.pool.get().expect("connection");
        diesel::insert_or_ignore_into(users::table)
            .values((
                users::id.eq(id),
                users::username.eq(format!("user{id}")),
                users::password_hash.eq("salt$digest"),
            ))
            .execute(&mut conn)
            .expect("should insert user");
    }
}

pub fn create_category(repo: &DieselRepository, name: &str) -> Category {
    repo.create_category(&NewCategory {
        name: CategoryName::new(name).expect("valid category name"),
    })
    .expect("should create category")
}

pub fn create_news(
    test_db: &TestDb,
    category: &Category,
    owner: i32,
    title: &str,
    published: (i32, u32, u32),
) -> News {
    test_db.ensure_user(owner);
    let now = Utc::now().naive_utc();
    test_db.repo().create_news(&NewNews {
        title: NewsTitle::new(title).expect("valid title"),
        body: NewsBody::new("Corpo da notícia").expect("valid body"),
        category_id: category.id,
        publication_date: NaiveDate::from_ymd_opt(published.0, published.1, published.2)
            .expect("valid date"),
        owner_id: UserId::new(owner).expect("valid user id"),
        attachment: None,
        created_at: now,
        updated_at: now,
    })
    .expect("should create news")
}
