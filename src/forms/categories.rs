use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::category::NewCategory;
use crate::domain::types::CategoryName;
use crate::forms::FormErrors;

/// Create/edit category form. Both pages share the same single field.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct CategoryForm {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Informe um nome com até 100 caracteres."
    ))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFormPayload {
    pub name: CategoryName,
}

impl CategoryFormPayload {
    pub fn into_new_category(self) -> NewCategory {
        NewCategory { name: self.name }
    }
}

impl TryFrom<CategoryForm> for CategoryFormPayload {
    type Error = FormErrors;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let name = CategoryName::new(value.name)
            .map_err(|e| FormErrors::single("name", e.to_string()))?;
        Ok(Self { name })
    }
}
