use actix_web::middleware::from_fn;
use actix_web::{HttpResponse, http::header, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::auth::AuthenticatedUser;
use crate::middleware::require_login;

pub mod auth;
pub mod categories;
pub mod news;
pub mod public;

/// Bootstrap alert class for a flash message level.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    HttpResponse::Ok().body(tera.render(template, context).unwrap_or_else(|e| {
        log::error!("Failed to render template '{template}': {e}");
        String::new()
    }))
}

pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("current_page", current_page);
    context
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// 404 response rendered with the site layout.
pub fn not_found(tera: &Tera) -> HttpResponse {
    let body = tera
        .render("errors/404.html", &Context::new())
        .unwrap_or_else(|e| {
            log::error!("Failed to render 404 page: {e}");
            "Página não encontrada.".to_string()
        });
    HttpResponse::NotFound().body(body)
}

/// Register every page of the site.
///
/// Expects `DieselRepository`, `Tera`, `MediaStorage` and `ServerConfig` in
/// application data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(public::index)
        .service(auth::login_page)
        .service(auth::login)
        .service(auth::logout)
        .service(
            web::scope("/gerencia")
                .wrap(from_fn(require_login))
                .service(categories::show_categories)
                .service(categories::new_category)
                .service(categories::create_category)
                .service(categories::edit_category)
                .service(categories::update_category)
                .service(categories::confirm_delete_category)
                .service(categories::delete_category)
                .service(news::show_news)
                .service(news::new_news)
                .service(news::create_news)
                .service(news::edit_news)
                .service(news::update_news),
        );
}
