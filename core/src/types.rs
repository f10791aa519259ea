//! Wire DTOs for the template endpoints.
//!
//! # Design
//! Field names are serialized in camelCase exactly (`templateID`,
//! `htmlBody`, `totalCount`, ...). Decoding also takes the PascalCase keys
//! the live API answers with (`TemplateId`, `ErrorCode`, `TotalCount`).
//! Every field decodes leniently: a missing key becomes its empty value, so
//! partial server payloads still parse.
//! The mock-server crate defines its own copies of these shapes; the
//! integration tests catch any drift between the two.

use serde::{Deserialize, Serialize};

/// An email template as stored by the provider.
///
/// `id` is `None` on creation requests and is assigned by the server.
/// Serialization uses the camelCase names; decoding also accepts the
/// provider's PascalCase spelling of every key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
    #[serde(
        rename = "templateID",
        alias = "TemplateID",
        alias = "TemplateId",
        alias = "templateId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<i64>,
    #[serde(alias = "Name", default)]
    pub name: String,
    #[serde(alias = "Subject", default)]
    pub subject: String,
    #[serde(rename = "htmlBody", alias = "HtmlBody", default)]
    pub html_body: String,
    #[serde(rename = "textBody", alias = "TextBody", default)]
    pub text_body: String,
    #[serde(alias = "Alias", default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    /// Omitted on the wire when `false`.
    #[serde(alias = "Active", default, skip_serializing_if = "is_false")]
    pub active: bool,
}

impl Template {
    /// A new, unsaved template with both body renderings.
    pub fn new(name: &str, subject: &str, html_body: &str, text_body: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
            text_body: text_body.to_string(),
            alias: String::new(),
            active: false,
        }
    }
}

/// One page of templates plus the server's total.
///
/// `templates.len()` can be smaller than `total_count` when `offset`/`count`
/// cut the result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateList {
    #[serde(alias = "Templates", default)]
    pub templates: Vec<Template>,
    #[serde(rename = "totalCount", alias = "TotalCount", default)]
    pub total_count: i64,
}

/// Envelope returned by create, update and the other mutating endpoints.
///
/// A 200 response may still carry a nonzero `error_code`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse {
    #[serde(
        rename = "templateID",
        alias = "TemplateID",
        alias = "TemplateId",
        alias = "templateId",
        default
    )]
    pub template_id: i64,
    #[serde(rename = "errorCode", alias = "ErrorCode", default)]
    pub error_code: i64,
    #[serde(alias = "Message", default)]
    pub message: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}
