//! Stateless request builder and response parser for the template API.
//!
//! # Design
//! `TemplateClient` holds the base URL and server token and nothing else.
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`, so
//! the wire mapping is testable without a network.
//!
//! Create and update inspect the embedded `errorCode` of a 200 response.
//! Delete and validate only look at the status and ignore any error code in
//! the body; callers relying on that should not assume a 200 means the
//! template existed.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ApiResponse, Template, TemplateList};

pub const DEFAULT_BASE_URL: &str = "https://api.postmarkapp.com";

/// Header carrying the server token on every request.
pub const SERVER_TOKEN_HEADER: &str = "x-postmark-server-token";

const JSON: &str = "application/json";

/// Synchronous, stateless client for the template endpoints.
#[derive(Clone)]
pub struct TemplateClient {
    base_url: String,
    server_token: String,
}

impl std::fmt::Debug for TemplateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateClient")
            .field("base_url", &self.base_url)
            .field("server_token", &"<redacted>")
            .finish()
    }
}

impl TemplateClient {
    pub fn new(base_url: &str, server_token: &str) -> Result<Self, ApiError> {
        if server_token.trim().is_empty() {
            return Err(ApiError::MissingServerToken);
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            server_token: server_token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_create_template(&self, template: &Template) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, format!("{}/templates", self.base_url), template)
    }

    pub fn build_get_template(&self, id: i64) -> HttpRequest {
        self.plain_request(HttpMethod::Get, format!("{}/templates/{id}", self.base_url))
    }

    pub fn build_update_template(&self, template: &Template) -> Result<HttpRequest, ApiError> {
        let id = template.id.ok_or(ApiError::MissingTemplateId)?;
        self.json_request(HttpMethod::Put, format!("{}/templates/{id}", self.base_url), template)
    }

    pub fn build_delete_template(&self, id: i64) -> HttpRequest {
        self.plain_request(HttpMethod::Delete, format!("{}/templates/{id}", self.base_url))
    }

    /// `offset` and `count` are passed through as-is; the server decides
    /// whether they are acceptable.
    pub fn build_list_templates(&self, offset: i64, count: i64) -> HttpRequest {
        self.plain_request(
            HttpMethod::Get,
            format!("{}/templates?offset={offset}&count={count}", self.base_url),
        )
    }

    pub fn build_validate_template(&self, template: &Template) -> Result<HttpRequest, ApiError> {
        self.json_request(
            HttpMethod::Post,
            format!("{}/templates/validate", self.base_url),
            template,
        )
    }

    /// Returns the server-assigned template id.
    pub fn parse_create_template(&self, response: HttpResponse) -> Result<i64, ApiError> {
        let ack = check_error_code(decode::<ApiResponse>(response)?)?;
        Ok(ack.template_id)
    }

    pub fn parse_get_template(&self, response: HttpResponse) -> Result<Template, ApiError> {
        decode(response)
    }

    pub fn parse_update_template(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_error_code(decode::<ApiResponse>(response)?)?;
        Ok(())
    }

    pub fn parse_delete_template(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_list_templates(&self, response: HttpResponse) -> Result<TemplateList, ApiError> {
        decode(response)
    }

    pub fn parse_validate_template(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn plain_request(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: vec![
                ("accept".to_string(), JSON.to_string()),
                (SERVER_TOKEN_HEADER.to_string(), self.server_token.clone()),
            ],
            body: None,
        }
    }

    fn json_request(
        &self,
        method: HttpMethod,
        path: String,
        template: &Template,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(template).map_err(ApiError::Serialization)?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![
                ("accept".to_string(), JSON.to_string()),
                ("content-type".to_string(), JSON.to_string()),
                (SERVER_TOKEN_HEADER.to_string(), self.server_token.clone()),
            ],
            body: Some(body),
        })
    }
}

/// Anything but 200 is a transport failure carrying the raw body.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(ApiError::Decode)
}

fn check_error_code(ack: ApiResponse) -> Result<ApiResponse, ApiError> {
    if ack.error_code != 0 {
        return Err(ApiError::Remote {
            code: ack.error_code,
            message: ack.message,
        });
    }
    Ok(ack)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TemplateClient {
        TemplateClient::new("http://localhost:3000", "server-token").unwrap()
    }

    fn sample() -> Template {
        Template::new(
            "Password Reset",
            "Reset your password",
            "<p>Click {{reset_link}}</p>",
            "Click {{reset_link}}",
        )
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = TemplateClient::new("http://localhost:3000", "  ").unwrap_err();
        assert!(matches!(err, ApiError::MissingServerToken));
    }

    #[test]
    fn debug_output_hides_token() {
        let text = format!("{:?}", client());
        assert!(!text.contains("server-token"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TemplateClient::new("http://localhost:3000/", "t").unwrap();
        let req = client.build_get_template(1);
        assert_eq!(req.path, "http://localhost:3000/templates/1");
    }

    #[test]
    fn build_create_template_produces_correct_request() {
        let req = client().build_create_template(&sample()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/templates");
        assert_eq!(
            req.headers,
            vec![
                ("accept".to_string(), "application/json".to_string()),
                ("content-type".to_string(), "application/json".to_string()),
                ("x-postmark-server-token".to_string(), "server-token".to_string()),
            ]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "Password Reset");
        assert_eq!(body["subject"], "Reset your password");
        assert!(body.get("templateID").is_none());
        assert!(body.get("active").is_none());
    }

    #[test]
    fn token_never_appears_in_url_or_body() {
        let c = client();
        let mut requests = vec![
            c.build_create_template(&sample()).unwrap(),
            c.build_get_template(5),
            c.build_delete_template(5),
            c.build_list_templates(0, 10),
            c.build_validate_template(&sample()).unwrap(),
        ];
        let mut saved = sample();
        saved.id = Some(5);
        requests.push(c.build_update_template(&saved).unwrap());

        for req in requests {
            assert!(!req.path.contains("server-token"), "{}", req.path);
            assert!(!req.body.as_deref().unwrap_or_default().contains("server-token"));
            assert_eq!(req.header("X-Postmark-Server-Token"), Some("server-token"));
            assert_eq!(req.header("Accept"), Some("application/json"));
        }
    }

    #[test]
    fn build_get_template_has_no_body_or_content_type() {
        let req = client().build_get_template(36087615);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/templates/36087615");
        assert!(req.body.is_none());
        assert!(req.header("content-type").is_none());
    }

    #[test]
    fn build_update_template_targets_template_id() {
        let mut template = sample();
        template.id = Some(12);
        template.subject = "Updated Subject".to_string();
        let req = client().build_update_template(&template).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/templates/12");
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["templateID"], 12);
        assert_eq!(body["subject"], "Updated Subject");
    }

    #[test]
    fn build_update_template_requires_id() {
        let err = client().build_update_template(&sample()).unwrap_err();
        assert!(matches!(err, ApiError::MissingTemplateId));
    }

    #[test]
    fn build_delete_template_produces_correct_request() {
        let req = client().build_delete_template(36087634);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/templates/36087634");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_list_templates_passes_paging_through() {
        let req = client().build_list_templates(0, 10);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/templates?offset=0&count=10");

        let req = client().build_list_templates(-1, 0);
        assert_eq!(req.path, "http://localhost:3000/templates?offset=-1&count=0");
    }

    #[test]
    fn build_validate_template_posts_to_validate() {
        let req = client().build_validate_template(&sample()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/templates/validate");
        assert!(req.body.is_some());
    }

    #[test]
    fn parse_create_template_returns_id() {
        let response = HttpResponse::new(200, r#"{"templateID":1234,"errorCode":0,"message":"OK"}"#);
        assert_eq!(client().parse_create_template(response).unwrap(), 1234);
    }

    #[test]
    fn parse_create_template_embedded_error() {
        let response = HttpResponse::new(
            200,
            r#"{"templateID":0,"errorCode":1001,"message":"Invalid template"}"#,
        );
        let err = client().parse_create_template(response).unwrap_err();
        assert!(matches!(err, ApiError::Remote { code: 1001, .. }));
        assert!(err.to_string().contains("Invalid template"));
    }

    #[test]
    fn parse_create_template_pascal_case_embedded_error() {
        let response = HttpResponse::new(200, r#"{"ErrorCode":1001,"Message":"Invalid template"}"#);
        let err = client().parse_create_template(response).unwrap_err();
        assert!(matches!(err, ApiError::Remote { code: 1001, .. }));
        assert!(err.to_string().contains("Invalid template"));
    }

    #[test]
    fn parse_create_template_pascal_case_id() {
        let response = HttpResponse::new(200, r#"{"TemplateId":123,"ErrorCode":0,"Message":"OK"}"#);
        assert_eq!(client().parse_create_template(response).unwrap(), 123);
    }

    #[test]
    fn parse_create_template_bad_json() {
        let response = HttpResponse::new(200, "<html>gateway</html>");
        let err = client().parse_create_template(response).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn parse_create_template_wrong_status_keeps_raw_body() {
        let response = HttpResponse::new(500, "internal error");
        let err = client().parse_create_template(response).unwrap_err();
        match err {
            ApiError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal error");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn parse_create_template_created_status_is_not_ok() {
        let response = HttpResponse::new(201, r#"{"templateID":1,"errorCode":0}"#);
        let err = client().parse_create_template(response).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 201, .. }));
    }

    #[test]
    fn parse_get_template_success() {
        let response = HttpResponse::new(
            200,
            r#"{"templateID":7,"name":"Welcome","subject":"Hi","htmlBody":"<p>Hi</p>","textBody":"Hi","alias":"welcome","active":true}"#,
        );
        let template = client().parse_get_template(response).unwrap();
        assert_eq!(template.id, Some(7));
        assert_eq!(template.alias, "welcome");
        assert!(template.active);
    }

    #[test]
    fn parse_get_template_bad_json() {
        let response = HttpResponse::new(200, "not json");
        let err = client().parse_get_template(response).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn parse_update_template_success() {
        let response = HttpResponse::new(200, r#"{"templateID":7,"errorCode":0,"message":"OK"}"#);
        assert!(client().parse_update_template(response).is_ok());
    }

    #[test]
    fn parse_update_template_embedded_error() {
        let response = HttpResponse::new(200, r#"{"errorCode":1101,"message":"Template not found"}"#);
        let err = client().parse_update_template(response).unwrap_err();
        assert!(matches!(err, ApiError::Remote { code: 1101, .. }));
    }

    #[test]
    fn parse_update_template_pascal_case_embedded_error() {
        let response = HttpResponse::new(200, r#"{"ErrorCode":1101,"Message":"Template not found"}"#);
        let err = client().parse_update_template(response).unwrap_err();
        assert!(matches!(err, ApiError::Remote { code: 1101, .. }));
    }

    #[test]
    fn parse_update_template_bad_json() {
        let response = HttpResponse::new(200, "not json");
        let err = client().parse_update_template(response).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn parse_update_template_wrong_status_keeps_raw_body() {
        let response = HttpResponse::new(503, "Service Unavailable");
        match client().parse_update_template(response).unwrap_err() {
            ApiError::Http { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "Service Unavailable");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn parse_get_template_pascal_case() {
        let response = HttpResponse::new(
            200,
            r#"{"TemplateId":7,"Name":"Welcome","Subject":"Hi","HtmlBody":"<p>Hi</p>","TextBody":"Hi"}"#,
        );
        let template = client().parse_get_template(response).unwrap();
        assert_eq!(template.id, Some(7));
        assert_eq!(template.name, "Welcome");
        assert_eq!(template.text_body, "Hi");
    }

    #[test]
    fn parse_delete_template_ignores_embedded_error() {
        let response = HttpResponse::new(200, r#"{"errorCode":1101,"message":"Template not found"}"#);
        assert!(client().parse_delete_template(response).is_ok());
    }

    #[test]
    fn parse_delete_template_ignores_body_shape() {
        let response = HttpResponse::new(200, "");
        assert!(client().parse_delete_template(response).is_ok());
    }

    #[test]
    fn parse_delete_template_wrong_status() {
        let response = HttpResponse::new(404, "no such template");
        let err = client().parse_delete_template(response).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 404, .. }));
    }

    #[test]
    fn parse_list_templates_success() {
        let response = HttpResponse::new(
            200,
            r#"{"totalCount":2,"templates":[{"templateID":1,"name":"One","subject":"S"}]}"#,
        );
        let list = client().parse_list_templates(response).unwrap();
        assert_eq!(list.total_count, 2);
        assert_eq!(list.templates.len(), 1);
        assert_eq!(list.templates[0].id, Some(1));
    }

    #[test]
    fn parse_list_templates_bad_json() {
        let response = HttpResponse::new(200, r#"{"templates":"nope"}"#);
        let err = client().parse_list_templates(response).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn parse_validate_template_ignores_embedded_error() {
        let response = HttpResponse::new(
            200,
            r#"{"allContentIsValid":false,"errorCode":1105,"message":"No content"}"#,
        );
        assert!(client().parse_validate_template(response).is_ok());
    }

    #[test]
    fn parse_validate_template_wrong_status() {
        let response = HttpResponse::new(422, "bad");
        let err = client().parse_validate_template(response).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 422, .. }));
    }
}
