use actix_identity::Identity;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::auth::AuthenticatedUser;
use crate::forms::FormErrors;
use crate::forms::auth::{LoginForm, LoginFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::authenticate;

const AFTER_LOGIN_URL: &str = "/gerencia/";

fn login_context(
    flash_messages: &IncomingFlashMessages,
    form: &LoginForm,
    errors: &FormErrors,
) -> Context {
    let mut context = base_context(flash_messages, None, "login");
    context.insert("form", form);
    context.insert("errors", errors);
    context
}

#[get("/login")]
pub async fn login_page(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect(AFTER_LOGIN_URL);
    }

    let context = login_context(&flash_messages, &LoginForm::default(), &FormErrors::new());
    render_template(&tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn login(
    request: HttpRequest,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let result = LoginFormPayload::try_from(form.clone())
        .map_err(ServiceError::Form)
        .and_then(|payload| authenticate(&payload, repo.get_ref()));

    match result {
        Ok(user) => {
            if let Err(err) = user.login(&request) {
                log::error!("Failed to attach identity: {err}");
                return HttpResponse::InternalServerError().finish();
            }
            log::info!("User {} logged in", user.username);
            FlashMessage::success(format!("Bem-vindo, {}.", user.username)).send();
            redirect(AFTER_LOGIN_URL)
        }
        Err(ServiceError::Form(errors)) => {
            let context = login_context(&flash_messages, &form, &errors);
            render_template(&tera, "auth/login.html", &context)
        }
        Err(err) => {
            log::error!("Failed to log in: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
        FlashMessage::info("Sessão encerrada.").send();
    }
    redirect("/")
}
