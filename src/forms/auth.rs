use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::types::Username;
use crate::forms::FormErrors;

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Este campo é obrigatório."))]
    pub username: String,
    /// Never echoed back to the page.
    #[serde(skip_serializing)]
    #[validate(length(min = 1, message = "Este campo é obrigatório."))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginFormPayload {
    pub username: Username,
    pub password: String,
}

impl TryFrom<LoginForm> for LoginFormPayload {
    type Error = FormErrors;

    fn try_from(value: LoginForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let username = Username::new(value.username)
            .map_err(|e| FormErrors::single("username", e.to_string()))?;
        Ok(Self {
            username,
            password: value.password,
        })
    }
}
