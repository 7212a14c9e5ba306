use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use diesel::prelude::*;
use pushkind_news::domain::types::{AttachmentPath, UserId};
use pushkind_news::models::config::ServerConfig;
use pushkind_news::repository::{CategoryReader, NewsListQuery, NewsReader};
use pushkind_news::routes::configure;
use pushkind_news::schema::news;
use pushkind_news::services::auth::register_user;
use pushkind_news::storage::MediaStorage;
use tera::Tera;

mod common;

fn server_config() -> ServerConfig {
    ServerConfig {
        database_url: String::new(),
        address: "127.0.0.1".to_string(),
        port: 0,
        secret: String::new(),
        templates_dir: String::new(),
        media_root: String::new(),
        static_dir: String::new(),
        login_url: "/login".to_string(),
    }
}

/// Build the application with the production middleware stack.
macro_rules! init_app {
    ($test_db:expr, $media:expr) => {{
        let key = Key::from(&[7u8; 64][..]);
        let tera = Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*"))
            .expect("templates should parse");
        let storage = MediaStorage::new($media.path()).expect("media root");
        let message_store = CookieMessageStore::builder(key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        test::init_service(
            App::new()
                .wrap(message_framework)
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), key)
                        .cookie_secure(false)
                        .build(),
                )
                .configure(configure)
                .app_data(web::Data::new(tera))
                .app_data(web::Data::new($test_db.repo()))
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(server_config())),
        )
        .await
    }};
}

const BOUNDARY: &str = "----pushkind-news-test";

/// One part of a `multipart/form-data` body.
enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content: &'a [u8],
    },
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(content);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(uri: &str, parts: &[Part<'_>]) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(parts))
}

fn with_cookies(mut req: test::TestRequest, cookies: &[Cookie<'static>]) -> test::TestRequest {
    for cookie in cookies {
        req = req.cookie(cookie.clone());
    }
    req
}

/// Sign in through the login form and return the session cookies.
macro_rules! login {
    ($app:expr, $username:expr, $password:expr) => {{
        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([("username", $username), ("password", $password)])
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        response_cookies(&resp)
            .into_iter()
            .filter(|cookie| cookie.name() != "_flash")
            .collect::<Vec<_>>()
    }};
}

fn response_cookies<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Vec<Cookie<'static>> {
    resp.response()
        .cookies()
        .map(|cookie| cookie.into_owned())
        .collect()
}

#[actix_web::test]
async fn anonymous_management_request_redirects_to_login() {
    let test_db = common::TestDb::new();
    let media = tempfile::tempdir().unwrap();
    let app = init_app!(test_db, media);

    for uri in ["/gerencia/", "/gerencia/noticias/", "/gerencia/categoria/cadastro/"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/login",
            "{uri}"
        );
        assert!(
            response_cookies(&resp)
                .iter()
                .any(|cookie| cookie.name() == "_flash"),
            "{uri} should queue a flash message"
        );
    }
}

#[actix_web::test]
async fn anonymous_post_is_gated_before_touching_data() {
    let test_db = common::TestDb::new();
    let media = tempfile::tempdir().unwrap();
    let repo = test_db.repo();
    let category = common::create_category(&repo, "Política");
    let app = init_app!(test_db, media);

    let req = test::TestRequest::post()
        .uri(&format!("/gerencia/categoria/remover/{}/", category.id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(repo.get_category_by_id(category.id).unwrap().is_some());
}

#[actix_web::test]
async fn public_index_is_open() {
    let test_db = common::TestDb::new();
    let media = tempfile::tempdir().unwrap();
    let repo = test_db.repo();
    let category = common::create_category(&repo, "Esportes");
    common::create_news(&test_db, &category, 1, "Final do campeonato", (2024, 5, 1));
    let app = init_app!(test_db, media);

    let req = test::TestRequest::get()
        .uri("/?categoria=Esportes")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("Final do campeonato"));
}

#[actix_web::test]
async fn login_opens_the_management_section() {
    let test_db = common::TestDb::new();
    let media = tempfile::tempdir().unwrap();
    let repo = test_db.repo();
    register_user("ana", "s3nha", &repo).unwrap();
    common::create_category(&repo, "Cultura");
    let app = init_app!(test_db, media);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("username", "ana"), ("password", "s3nha")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/gerencia/");
    let cookies = response_cookies(&resp);

    let mut req = test::TestRequest::get().uri("/gerencia/");
    for cookie in &cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("Cultura"));

    let mut req = test::TestRequest::get().uri("/gerencia/?page=9");
    for cookie in &cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let mut req = test::TestRequest::get().uri("/gerencia/categoria/editar/999/");
    for cookie in &cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn wrong_password_re_renders_login_form() {
    let test_db = common::TestDb::new();
    let media = tempfile::tempdir().unwrap();
    register_user("ana", "s3nha", &test_db.repo()).unwrap();
    let app = init_app!(test_db, media);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("username", "ana"), ("password", "errada")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("Usuário ou senha inválidos."));
}

#[actix_web::test]
async fn huge_page_number_is_not_found() {
    let test_db = common::TestDb::new();
    let media = tempfile::tempdir().unwrap();
    register_user("ana", "s3nha", &test_db.repo()).unwrap();
    let app = init_app!(test_db, media);
    let cookies = login!(app, "ana", "s3nha");

    let req = with_cookies(
        test::TestRequest::get().uri(&format!("/gerencia/?page={}", usize::MAX)),
        &cookies,
    );
    let resp = test::call_service(&app, req.to_request()).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn duplicate_category_re_renders_form_with_error() {
    let test_db = common::TestDb::new();
    let media = tempfile::tempdir().unwrap();
    let repo = test_db.repo();
    register_user("ana", "s3nha", &repo).unwrap();
    common::create_category(&repo, "Política");
    let app = init_app!(test_db, media);
    let cookies = login!(app, "ana", "s3nha");

    let req = with_cookies(
        test::TestRequest::post()
            .uri("/gerencia/categoria/cadastro/")
            .set_form([("name", "Política")]),
        &cookies,
    );
    let resp = test::call_service(&app, req.to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("A categoria com este nome já existe."));
    assert!(body.contains(r#"value="Política""#));
}

#[actix_web::test]
async fn created_news_belongs_to_session_user() {
    let test_db = common::TestDb::new();
    let media = tempfile::tempdir().unwrap();
    let repo = test_db.repo();
    register_user("ana", "s3nha", &repo).unwrap();
    let bia = register_user("bia", "s3nha", &repo).unwrap();
    let category = common::create_category(&repo, "Cultura");
    let storage = MediaStorage::new(media.path()).unwrap();
    let app = init_app!(test_db, media);
    let cookies = login!(app, "bia", "s3nha");

    let category_id = category.id.to_string();
    let req = with_cookies(
        multipart_request(
            "/gerencia/noticias/cadastro",
            &[
                Part::Text("title", "Festival de inverno"),
                Part::Text("body", "Programação completa."),
                Part::Text("category", &category_id),
                Part::Text("publication_date", "2024-07-01"),
                Part::Text("owner_id", "1"),
                Part::File {
                    name: "attachment",
                    filename: "Programação.pdf",
                    content: b"%PDF-1.4",
                },
            ],
        ),
        &cookies,
    );
    let resp = test::call_service(&app, req.to_request()).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/gerencia/noticias/"
    );
    assert!(
        response_cookies(&resp)
            .iter()
            .any(|cookie| cookie.name() == "_flash")
    );

    let created = repo.list_news(NewsListQuery::new()).unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].owner_id, bia.id);
    let attachment = created[0].attachment.as_ref().expect("attachment stored");
    assert!(attachment.as_str().ends_with("-programacao.pdf"));
    let stored = storage.resolve(attachment).unwrap();
    assert_eq!(std::fs::read(stored).unwrap(), b"%PDF-1.4");
}

#[actix_web::test]
async fn editing_news_re_stamps_owner_and_ignores_empty_file() {
    let test_db = common::TestDb::new();
    let media = tempfile::tempdir().unwrap();
    let repo = test_db.repo();
    register_user("ana", "s3nha", &repo).unwrap();
    let bia = register_user("bia", "s3nha", &repo).unwrap();
    let category = common::create_category(&repo, "Cultura");
    let item = common::create_news(&test_db, &category, 1, "Rascunho", (2024, 3, 1));
    {
        let mut conn = test_db.pool().get().unwrap();
        diesel::update(news::table.find(item.id.get()))
            .set(news::attachment.eq("2024/03/01/anexo.pdf"))
            .execute(&mut conn)
            .unwrap();
    }
    let app = init_app!(test_db, media);
    let cookies = login!(app, "bia", "s3nha");

    let category_id = category.id.to_string();
    let req = with_cookies(
        multipart_request(
            &format!("/gerencia/noticias/editar/{}", item.id),
            &[
                Part::Text("title", "Versão final"),
                Part::Text("body", "Texto revisado."),
                Part::Text("category", &category_id),
                Part::Text("publication_date", "2024-03-02"),
                Part::Text("owner_id", "1"),
                Part::File {
                    name: "attachment",
                    filename: "",
                    content: b"",
                },
            ],
        ),
        &cookies,
    );
    let resp = test::call_service(&app, req.to_request()).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/gerencia/noticias/"
    );

    let edited = repo.get_news_by_id(item.id).unwrap().unwrap();
    assert_eq!(edited.owner_id, bia.id);
    assert_ne!(edited.owner_id, UserId::new(1).unwrap());
    assert_eq!(edited.title, "Versão final");
    assert_eq!(
        edited.attachment,
        Some(AttachmentPath::new("2024/03/01/anexo.pdf").unwrap())
    );
}
