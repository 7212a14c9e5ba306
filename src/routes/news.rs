use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::auth::AuthenticatedUser;
use crate::domain::news::News;
use crate::forms::FormErrors;
use crate::forms::news::{NewsFilterForm, NewsForm, NewsFormPayload, NewsUploadForm, pending_upload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, not_found, redirect, render_template};
use crate::services::ServiceError;
use crate::services::categories::list_all_categories;
use crate::services::news::{
    create_news as create_news_service, get_news as get_news_service,
    show_news as show_news_service, update_news as update_news_service,
};
use crate::storage::MediaStorage;

const NEWS_LIST_URL: &str = "/gerencia/noticias/";

/// Context of the create/edit page. `existing` is the item being edited.
fn form_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    repo: &DieselRepository,
    form: &NewsForm,
    errors: &FormErrors,
    existing: Option<&News>,
) -> Result<Context, ServiceError> {
    let categories = list_all_categories(repo)?;

    let mut context = base_context(flash_messages, Some(user), "news");
    context.insert("form", form);
    context.insert("errors", errors);
    context.insert("categories", &categories);
    context.insert("news_id", &existing.map(|news| news.id.get()));
    context.insert(
        "attachment",
        &existing.and_then(|news| news.attachment.as_ref()).map(|path| {
            serde_json::json!({ "path": path.as_str(), "name": path.display_name() })
        }),
    );
    Ok(context)
}

fn render_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    repo: &DieselRepository,
    form: &NewsForm,
    errors: &FormErrors,
    existing: Option<&News>,
) -> HttpResponse {
    match form_context(flash_messages, user, repo, form, errors, existing) {
        Ok(context) => render_template(tera, "news/form.html", &context),
        Err(err) => {
            log::error!("Failed to render news form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/noticias/")]
pub async fn show_news(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    filter: web::Query<NewsFilterForm>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let filter = filter.into_inner();

    match show_news_service(&filter, &user, repo.get_ref()) {
        Ok(listing) => {
            let mut context = base_context(&flash_messages, Some(&user), "news");
            context.insert("news", &listing.news);
            context.insert("categories", &listing.categories);
            context.insert("filter", &filter);
            context.insert("filter_errors", &listing.filter_errors);
            render_template(&tera, "news/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render news page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/noticias/cadastro")]
pub async fn new_news(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(
        &tera,
        &flash_messages,
        &user,
        repo.get_ref(),
        &NewsForm::default(),
        &FormErrors::new(),
        None,
    )
}

#[post("/noticias/cadastro")]
pub async fn create_news(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    storage: web::Data<MediaStorage>,
    tera: web::Data<Tera>,
    MultipartForm(upload): MultipartForm<NewsUploadForm>,
) -> impl Responder {
    let (form, attachment) = upload.into_parts();

    let result = NewsFormPayload::try_from(form.clone())
        .map_err(ServiceError::Form)
        .and_then(|payload| {
            create_news_service(
                payload,
                attachment.as_ref().map(pending_upload),
                &user,
                repo.get_ref(),
                storage.get_ref(),
            )
        });

    match result {
        Ok(news) => {
            FlashMessage::success(format!("Notícia \"{}\" cadastrada.", news.title)).send();
            redirect(NEWS_LIST_URL)
        }
        Err(ServiceError::Form(errors)) => render_form(
            &tera,
            &flash_messages,
            &user,
            repo.get_ref(),
            &form,
            &errors,
            None,
        ),
        Err(err) => {
            log::error!("Failed to add news: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/noticias/editar/{news_id}")]
pub async fn edit_news(
    news_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match get_news_service(news_id.into_inner(), repo.get_ref()) {
        Ok(news) => render_form(
            &tera,
            &flash_messages,
            &user,
            repo.get_ref(),
            &NewsForm::from(&news),
            &FormErrors::new(),
            Some(&news),
        ),
        Err(ServiceError::NotFound) => not_found(&tera),
        Err(err) => {
            log::error!("Failed to load news: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/noticias/editar/{news_id}")]
pub async fn update_news(
    news_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    storage: web::Data<MediaStorage>,
    tera: web::Data<Tera>,
    MultipartForm(upload): MultipartForm<NewsUploadForm>,
) -> impl Responder {
    let news_id = news_id.into_inner();
    let existing = match get_news_service(news_id, repo.get_ref()) {
        Ok(news) => news,
        Err(ServiceError::NotFound) => return not_found(&tera),
        Err(err) => {
            log::error!("Failed to load news: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let (form, attachment) = upload.into_parts();

    let result = NewsFormPayload::try_from(form.clone())
        .map_err(ServiceError::Form)
        .and_then(|payload| {
            update_news_service(
                news_id,
                payload,
                attachment.as_ref().map(pending_upload),
                &user,
                repo.get_ref(),
                storage.get_ref(),
            )
        });

    match result {
        Ok(()) => {
            FlashMessage::success("Notícia atualizada.").send();
            redirect(NEWS_LIST_URL)
        }
        Err(ServiceError::NotFound) => not_found(&tera),
        Err(ServiceError::Form(errors)) => render_form(
            &tera,
            &flash_messages,
            &user,
            repo.get_ref(),
            &form,
            &errors,
            Some(&existing),
        ),
        Err(err) => {
            log::error!("Failed to update news: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
