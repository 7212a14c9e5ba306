use crate::auth::{AuthenticatedUser, hash_password, verify_password};
use crate::domain::types::Username;
use crate::domain::user::{NewUser, User};
use crate::forms::auth::LoginFormPayload;
use crate::forms::{FormErrors, NON_FIELD_ERRORS};
use crate::repository::{RepositoryError, UserReader, UserWriter};

use super::{ServiceError, ServiceResult};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Usuário ou senha inválidos.";

fn invalid_credentials() -> ServiceError {
    ServiceError::Form(FormErrors::single(
        NON_FIELD_ERRORS,
        INVALID_CREDENTIALS_MESSAGE,
    ))
}

/// Check a login attempt against the stored password hash.
///
/// Unknown usernames and wrong passwords produce the same error.
pub fn authenticate<R>(payload: &LoginFormPayload, repo: &R) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader,
{
    let user = match repo.get_user_by_username(payload.username.as_str()) {
        Ok(Some(user)) => user,
        Ok(None) => {
            log::info!("Failed login for unknown user {}", payload.username);
            return Err(invalid_credentials());
        }
        Err(e) => {
            log::error!("Failed to get user: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !verify_password(&payload.password, &user.password_hash) {
        log::info!("Failed login for user {}", user.username);
        return Err(invalid_credentials());
    }

    Ok(AuthenticatedUser::from(&user))
}

/// Provision an account with a freshly salted password hash.
pub fn register_user<R>(username: &str, password: &str, repo: &R) -> ServiceResult<User>
where
    R: UserWriter,
{
    let username =
        Username::new(username).map_err(|e| FormErrors::single("username", e.to_string()))?;
    if password.is_empty() {
        return Err(FormErrors::single("password", "Este campo é obrigatório.").into());
    }

    let password_hash = hash_password(password).map_err(|e| {
        log::error!("Failed to hash password: {e}");
        ServiceError::Internal
    })?;
    let new_user = NewUser {
        username,
        password_hash,
    };

    match repo.create_user(&new_user) {
        Ok(user) => {
            log::info!("Created user {} ({})", user.username, user.id);
            Ok(user)
        }
        Err(RepositoryError::Conflict(_)) => Err(ServiceError::Form(FormErrors::single(
            "username",
            "Já existe um usuário com este nome.",
        ))),
        Err(e) => {
            log::error!("Failed to create user: {e}");
            Err(ServiceError::Internal)
        }
    }
}
