use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::news::News;
use crate::domain::types::{CategoryId, NewsBody, NewsTitle};
use crate::forms::{FormErrors, REQUIRED_MESSAGE, non_blank};
use crate::storage::PendingUpload;

/// Format used by `<input type="date">`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Multipart body posted by the create/edit news pages.
///
/// Text parts are optional so a truncated submission re-renders the form
/// instead of failing extraction.
#[derive(MultipartForm)]
pub struct NewsUploadForm {
    pub title: Option<Text<String>>,
    pub body: Option<Text<String>>,
    pub category: Option<Text<String>>,
    pub publication_date: Option<Text<String>>,
    pub clear_attachment: Option<Text<String>>,
    #[multipart(limit = "10MB")]
    pub attachment: Option<TempFile>,
}

impl NewsUploadForm {
    /// Split into the re-renderable text values and the pending file, if any.
    pub fn into_parts(self) -> (NewsForm, Option<TempFile>) {
        let text = |value: Option<Text<String>>| value.map(|t| t.0).unwrap_or_default();
        let form = NewsForm {
            title: text(self.title),
            body: text(self.body),
            category: text(self.category),
            publication_date: text(self.publication_date),
            clear_attachment: self.clear_attachment.is_some(),
        };
        // Browsers post an empty part when no file was chosen.
        let attachment = self.attachment.filter(|file| file.size > 0);
        (form, attachment)
    }
}

/// Borrow an uploaded temp file as a storage request.
pub fn pending_upload(file: &TempFile) -> PendingUpload<'_> {
    PendingUpload {
        original_name: file.file_name.as_deref().unwrap_or("upload"),
        source: file.file.path(),
    }
}

/// Text values of the news form, echoed back on validation failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct NewsForm {
    #[validate(length(min = 1, message = "Este campo é obrigatório."))]
    pub title: String,
    #[validate(length(min = 1, message = "Este campo é obrigatório."))]
    pub body: String,
    pub category: String,
    pub publication_date: String,
    #[serde(default)]
    pub clear_attachment: bool,
}

impl From<&News> for NewsForm {
    fn from(news: &News) -> Self {
        Self {
            title: news.title.to_string(),
            body: news.body.to_string(),
            category: news.category_id.to_string(),
            publication_date: news.publication_date.format(DATE_FORMAT).to_string(),
            clear_attachment: false,
        }
    }
}

/// Validated news fields; the owner is added by the service from the session.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsFormPayload {
    pub title: NewsTitle,
    pub body: NewsBody,
    pub category_id: CategoryId,
    pub publication_date: NaiveDate,
    pub clear_attachment: bool,
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub(crate) fn parse_category_id(value: &str) -> Option<CategoryId> {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .and_then(|id| CategoryId::new(id).ok())
}

impl TryFrom<NewsForm> for NewsFormPayload {
    type Error = FormErrors;

    fn try_from(value: NewsForm) -> Result<Self, Self::Error> {
        let mut errors = match value.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => e.into(),
        };

        let title = NewsTitle::new(value.title.as_str())
            .map_err(|e| {
                if errors.get("title").is_empty() {
                    errors.add("title", e.to_string());
                }
            })
            .ok();
        let body = NewsBody::new(value.body.as_str())
            .map_err(|e| {
                if errors.get("body").is_empty() {
                    errors.add("body", e.to_string());
                }
            })
            .ok();

        let category_id = match non_blank(Some(value.category.as_str())) {
            None => {
                errors.add("category", REQUIRED_MESSAGE);
                None
            }
            Some(raw) => {
                let parsed = parse_category_id(raw);
                if parsed.is_none() {
                    errors.add("category", "Selecione uma categoria válida.");
                }
                parsed
            }
        };

        let publication_date = match non_blank(Some(value.publication_date.as_str())) {
            None => {
                errors.add("publication_date", REQUIRED_MESSAGE);
                None
            }
            Some(raw) => {
                let parsed = parse_date(raw);
                if parsed.is_none() {
                    errors.add("publication_date", "Informe uma data válida (AAAA-MM-DD).");
                }
                parsed
            }
        };

        match (title, body, category_id, publication_date) {
            (Some(title), Some(body), Some(category_id), Some(publication_date))
                if errors.is_empty() =>
            {
                Ok(Self {
                    title,
                    body,
                    category_id,
                    publication_date,
                    clear_attachment: value.clear_attachment,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Query-string filter of the owner-scoped news list.
///
/// Parameter names follow the public URLs (`titulo`, `data_publicacao_inicio`,
/// `data_publicacao_fim`, `categoria`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewsFilterForm {
    #[serde(rename = "titulo", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "data_publicacao_inicio", default, skip_serializing_if = "Option::is_none")]
    pub published_from: Option<String>,
    #[serde(rename = "data_publicacao_fim", default, skip_serializing_if = "Option::is_none")]
    pub published_to: Option<String>,
    #[serde(rename = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Parsed filter; `None` fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsFilter {
    pub title: Option<String>,
    pub published_from: Option<NaiveDate>,
    pub published_to: Option<NaiveDate>,
    pub category_id: Option<CategoryId>,
}

impl TryFrom<&NewsFilterForm> for NewsFilter {
    type Error = FormErrors;

    fn try_from(value: &NewsFilterForm) -> Result<Self, Self::Error> {
        let mut errors = FormErrors::new();

        let mut date = |field: &str, raw: Option<&str>| match non_blank(raw) {
            None => None,
            Some(raw) => {
                let parsed = parse_date(raw);
                if parsed.is_none() {
                    errors.add(field, "Informe uma data válida (AAAA-MM-DD).");
                }
                parsed
            }
        };
        let published_from = date("data_publicacao_inicio", value.published_from.as_deref());
        let published_to = date("data_publicacao_fim", value.published_to.as_deref());

        let category_id = match non_blank(value.category.as_deref()) {
            None => None,
            Some(raw) => {
                let parsed = parse_category_id(raw);
                if parsed.is_none() {
                    errors.add("categoria", "Selecione uma categoria válida.");
                }
                parsed
            }
        };

        errors.into_result()?;
        Ok(Self {
            title: non_blank(value.title.as_deref()).map(str::to_string),
            published_from,
            published_to,
            category_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> NewsForm {
        NewsForm {
            title: " Eleições ".to_string(),
            body: "Texto".to_string(),
            category: "3".to_string(),
            publication_date: "2024-05-17".to_string(),
            clear_attachment: false,
        }
    }

    #[test]
    fn parses_valid_news_form() {
        let payload: NewsFormPayload = valid_form().try_into().unwrap();
        assert_eq!(payload.title.as_str(), "Eleições");
        assert_eq!(payload.category_id.get(), 3);
        assert_eq!(
            payload.publication_date,
            NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
        );
    }

    #[test]
    fn reports_every_invalid_field() {
        let form = NewsForm {
            title: String::new(),
            body: "   ".to_string(),
            category: "abc".to_string(),
            publication_date: "17/05/2024".to_string(),
            clear_attachment: false,
        };

        let errors = NewsFormPayload::try_from(form).unwrap_err();
        assert_eq!(errors.get("title"), [REQUIRED_MESSAGE]);
        assert_eq!(errors.get("body").len(), 1);
        assert_eq!(errors.get("category").len(), 1);
        assert_eq!(errors.get("publication_date").len(), 1);
    }

    #[test]
    fn missing_category_is_required() {
        let form = NewsForm {
            category: String::new(),
            ..valid_form()
        };

        let errors = NewsFormPayload::try_from(form).unwrap_err();
        assert_eq!(errors.get("category"), [REQUIRED_MESSAGE]);
    }

    #[test]
    fn empty_filter_imposes_nothing() {
        let form = NewsFilterForm {
            title: Some("  ".to_string()),
            published_from: Some(String::new()),
            published_to: None,
            category: Some(String::new()),
        };

        let filter = NewsFilter::try_from(&form).unwrap();
        assert_eq!(filter, NewsFilter::default());
    }

    #[test]
    fn filter_parses_date_range_and_category() {
        let form = NewsFilterForm {
            title: Some("copa".to_string()),
            published_from: Some("2024-01-01".to_string()),
            published_to: Some("2024-12-31".to_string()),
            category: Some("2".to_string()),
        };

        let filter = NewsFilter::try_from(&form).unwrap();
        assert_eq!(filter.title.as_deref(), Some("copa"));
        assert_eq!(filter.published_from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filter.published_to, NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(filter.category_id, Some(CategoryId::new(2).unwrap()));
    }

    #[test]
    fn filter_rejects_malformed_date() {
        let form = NewsFilterForm {
            published_from: Some("ontem".to_string()),
            ..NewsFilterForm::default()
        };

        let errors = NewsFilter::try_from(&form).unwrap_err();
        assert_eq!(errors.get("data_publicacao_inicio").len(), 1);
    }

    #[test]
    fn filter_form_reads_query_parameter_names() {
        let form: NewsFilterForm = serde_json::from_value(serde_json::json!({
            "titulo": "x",
            "data_publicacao_inicio": "2024-01-01",
        }))
        .unwrap();
        assert_eq!(form.title.as_deref(), Some("x"));
        assert_eq!(form.published_from.as_deref(), Some("2024-01-01"));
        assert!(form.category.is_none());
    }
}
