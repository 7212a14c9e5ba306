//! Session identity and password hashing.

use std::future::{Ready, ready};

use actix_identity::{Identity, IdentityExt};
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use serde::{Deserialize, Serialize};

use crate::domain::types::UserId;
use crate::domain::user::User;

/// The user attached to the current session.
///
/// Stored as JSON inside the identity cookie on login and read back by the
/// extractor on every gated request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: String,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.to_string(),
        }
    }
}

impl AuthenticatedUser {
    /// Attach this user to the session of `req`.
    pub fn login(&self, req: &HttpRequest) -> Result<Identity, actix_web::Error> {
        let payload = serde_json::to_string(self)?;
        Identity::login(&req.extensions(), payload).map_err(actix_web::error::ErrorInternalServerError)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req
            .get_identity()
            .map_err(ErrorUnauthorized)
            .and_then(|identity| identity.id().map_err(ErrorUnauthorized))
            .and_then(|payload| {
                serde_json::from_str::<AuthenticatedUser>(&payload).map_err(ErrorUnauthorized)
            });
        ready(user)
    }
}

/// Hash a password into a PHC string (`$argon2id$...`) with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hashed = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hashed.to_string())
}

/// Check `password` against a stored PHC string; malformed hashes never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
