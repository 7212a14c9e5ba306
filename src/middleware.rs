//! Request pipeline stages.

use actix_identity::IdentityExt;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::middleware::Next;
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::FlashMessage;

use crate::models::config::ServerConfig;

pub const LOGIN_REQUIRED_MESSAGE: &str =
    "Você precisa estar logado para acessar a página solicitada.";

const DEFAULT_LOGIN_URL: &str = "/login";

/// Authentication gate for the management section.
///
/// Requests without a session identity never reach the handler: an info
/// flash message is queued and the client is sent to the login page.
pub async fn require_login<B: MessageBody + 'static>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, actix_web::Error> {
    if req.get_identity().is_ok() {
        return next.call(req).await.map(ServiceResponse::map_into_left_body);
    }

    let login_url = req
        .app_data::<web::Data<ServerConfig>>()
        .map(|config| config.login_url.clone())
        .unwrap_or_else(|| DEFAULT_LOGIN_URL.to_string());

    log::debug!("Redirecting anonymous request for {} to login", req.path());
    FlashMessage::info(LOGIN_REQUIRED_MESSAGE).send();

    let response = HttpResponse::SeeOther()
        .insert_header((header::LOCATION, login_url))
        .finish();
    Ok(req.into_response(response).map_into_right_body())
}
