use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::{Context, Tera};

use crate::auth::AuthenticatedUser;
use crate::dto::categories::CategoryDto;
use crate::forms::FormErrors;
use crate::forms::categories::{CategoryForm, CategoryFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, not_found, redirect, render_template};
use crate::services::ServiceError;
use crate::services::categories::{
    add_category as add_category_service, delete_category as delete_category_service,
    get_category as get_category_service, show_categories as show_categories_service,
    update_category as update_category_service,
};

const CATEGORY_LIST_URL: &str = "/gerencia/";

#[derive(Debug, Deserialize)]
pub struct CategoryListParams {
    pub search: Option<String>,
    pub page: Option<usize>,
}

fn form_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    form: &CategoryForm,
    errors: &FormErrors,
    category_id: Option<i32>,
) -> Context {
    let mut context = base_context(flash_messages, Some(user), "categories");
    context.insert("form", form);
    context.insert("errors", errors);
    context.insert("category_id", &category_id);
    context
}

#[get("/")]
pub async fn show_categories(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    params: web::Query<CategoryListParams>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let page = params.page.unwrap_or(1);

    match show_categories_service(params.search.as_deref(), page, repo.get_ref()) {
        Ok(categories) => {
            let mut context = base_context(&flash_messages, Some(&user), "categories");
            context.insert("categories", &categories);
            context.insert("search", &params.search.unwrap_or_default());
            render_template(&tera, "categories/index.html", &context)
        }
        Err(ServiceError::NotFound) => not_found(&tera),
        Err(err) => {
            log::error!("Failed to render categories page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/categoria/cadastro/")]
pub async fn new_category(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = form_context(
        &flash_messages,
        &user,
        &CategoryForm::default(),
        &FormErrors::new(),
        None,
    );
    render_template(&tera, "categories/form.html", &context)
}

#[post("/categoria/cadastro/")]
pub async fn create_category(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    let result = CategoryFormPayload::try_from(form.clone())
        .map_err(ServiceError::Form)
        .and_then(|payload| add_category_service(payload, repo.get_ref()));

    match result {
        Ok(category) => {
            FlashMessage::success(format!("Categoria \"{}\" cadastrada.", category.name)).send();
            redirect(CATEGORY_LIST_URL)
        }
        Err(ServiceError::Form(errors)) => {
            let context = form_context(&flash_messages, &user, &form, &errors, None);
            render_template(&tera, "categories/form.html", &context)
        }
        Err(err) => {
            log::error!("Failed to add category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/categoria/editar/{category_id}/")]
pub async fn edit_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match get_category_service(category_id.into_inner(), repo.get_ref()) {
        Ok(category) => {
            let form = CategoryForm {
                name: category.name.to_string(),
            };
            let context = form_context(
                &flash_messages,
                &user,
                &form,
                &FormErrors::new(),
                Some(category.id.get()),
            );
            render_template(&tera, "categories/form.html", &context)
        }
        Err(ServiceError::NotFound) => not_found(&tera),
        Err(err) => {
            log::error!("Failed to load category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/categoria/editar/{category_id}/")]
pub async fn update_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    let category_id = category_id.into_inner();

    // Unknown ids answer 404 even when the submitted form is invalid.
    if let Err(err) = get_category_service(category_id, repo.get_ref()) {
        return match err {
            ServiceError::NotFound => not_found(&tera),
            err => {
                log::error!("Failed to load category: {err}");
                HttpResponse::InternalServerError().finish()
            }
        };
    }

    let result = CategoryFormPayload::try_from(form.clone())
        .map_err(ServiceError::Form)
        .and_then(|payload| update_category_service(category_id, payload, repo.get_ref()));

    match result {
        Ok(()) => {
            FlashMessage::success("Categoria atualizada.").send();
            redirect(CATEGORY_LIST_URL)
        }
        Err(ServiceError::NotFound) => not_found(&tera),
        Err(ServiceError::Form(errors)) => {
            let context = form_context(&flash_messages, &user, &form, &errors, Some(category_id));
            render_template(&tera, "categories/form.html", &context)
        }
        Err(err) => {
            log::error!("Failed to update category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/categoria/remover/{category_id}/")]
pub async fn confirm_delete_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match get_category_service(category_id.into_inner(), repo.get_ref()) {
        Ok(category) => {
            let mut context = base_context(&flash_messages, Some(&user), "categories");
            context.insert("category", &CategoryDto::from(category));
            render_template(&tera, "categories/delete.html", &context)
        }
        Err(ServiceError::NotFound) => not_found(&tera),
        Err(err) => {
            log::error!("Failed to load category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/categoria/remover/{category_id}/")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match delete_category_service(category_id.into_inner(), repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Categoria removida.").send();
            redirect(CATEGORY_LIST_URL)
        }
        Err(ServiceError::NotFound) => not_found(&tera),
        Err(err) => {
            log::error!("Failed to delete category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
