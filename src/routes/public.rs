use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template};
use crate::services::public::show_public_index;

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    /// Exact category name.
    pub categoria: Option<String>,
    pub search: Option<String>,
}

#[get("/")]
pub async fn index(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    params: web::Query<IndexParams>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();

    match show_public_index(
        params.categoria.as_deref(),
        params.search.as_deref(),
        repo.get_ref(),
    ) {
        Ok(page) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "index");
            context.insert("news", &page.news);
            context.insert("categories", &page.categories);
            context.insert("selected_category", &page.selected_category);
            context.insert("search", &page.search.unwrap_or_default());
            render_template(&tera, "public/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render index page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
