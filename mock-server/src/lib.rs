use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub const SERVER_TOKEN_HEADER: &str = "x-postmark-server-token";

pub const INVALID_TEMPLATE: i64 = 1001;
pub const TEMPLATE_NOT_FOUND: i64 = 1101;
pub const NO_CONTENT: i64 = 1105;
pub const INVALID_PAGING: i64 = 300;
pub const MISSING_TOKEN: i64 = 10;

const MAX_PAGE: i64 = 500;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
    #[serde(rename = "templateID", default, skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(rename = "htmlBody", default)]
    pub html_body: String,
    #[serde(rename = "textBody", default)]
    pub text_body: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub active: bool,
}

impl Template {
    fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.subject.is_empty() && self.has_content()
    }

    fn has_content(&self) -> bool {
        !self.html_body.is_empty() || !self.text_body.is_empty()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TemplateList {
    #[serde(rename = "totalCount")]
    pub total_count: i64,
    pub templates: Vec<Template>,
}

/// Body of every mutating response, success or not.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(rename = "templateID")]
    pub template_id: i64,
    #[serde(rename = "errorCode")]
    pub error_code: i64,
    pub message: String,
}

impl Ack {
    fn ok(template_id: i64, message: &str) -> Json<Ack> {
        Json(Ack {
            template_id,
            error_code: 0,
            message: message.to_string(),
        })
    }

    fn error(template_id: i64, error_code: i64, message: &str) -> Json<Ack> {
        Json(Ack {
            template_id,
            error_code,
            message: message.to_string(),
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Validation {
    #[serde(rename = "allContentIsValid")]
    pub all_content_is_valid: bool,
    #[serde(rename = "errorCode")]
    pub error_code: i64,
    pub message: String,
}

#[derive(Deserialize)]
pub struct Paging {
    pub offset: i64,
    pub count: i64,
}

#[derive(Default)]
pub struct Store {
    next_id: i64,
    templates: BTreeMap<i64, Template>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/templates", get(list_templates).post(create_template))
        .route("/templates/validate", post(validate_template))
        .route(
            "/templates/{id}",
            get(get_template).put(update_template).delete(delete_template),
        )
        .layer(middleware::from_fn(require_token))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_token(request: Request, next: Next) -> Response {
    let has_token = request
        .headers()
        .get(SERVER_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|token| !token.trim().is_empty());
    if !has_token {
        return (
            StatusCode::UNAUTHORIZED,
            Ack::error(
                0,
                MISSING_TOKEN,
                "No Account or Server API tokens were supplied in the HTTP headers.",
            ),
        )
            .into_response();
    }
    next.run(request).await
}

async fn list_templates(
    State(db): State<Db>,
    Query(paging): Query<Paging>,
) -> Result<Json<TemplateList>, (StatusCode, Json<Ack>)> {
    if paging.offset < 0 || paging.count <= 0 || paging.count > MAX_PAGE {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Ack::error(0, INVALID_PAGING, "Offset must be >= 0 and count between 1 and 500."),
        ));
    }
    let store = db.read().await;
    let templates = store
        .templates
        .values()
        .skip(paging.offset as usize)
        .take(paging.count as usize)
        .cloned()
        .collect();
    Ok(Json(TemplateList {
        total_count: store.templates.len() as i64,
        templates,
    }))
}

async fn create_template(State(db): State<Db>, Json(input): Json<Template>) -> Json<Ack> {
    if !input.is_valid() {
        return Ack::error(0, INVALID_TEMPLATE, "Invalid template");
    }
    let mut store = db.write().await;
    store.next_id += 1;
    let id = store.next_id;
    store.templates.insert(id, Template { id, ..input });
    Ack::ok(id, "OK")
}

async fn get_template(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Template>, (StatusCode, Json<Ack>)> {
    let store = db.read().await;
    store.templates.get(&id).cloned().map(Json).ok_or((
        StatusCode::UNPROCESSABLE_ENTITY,
        Ack::error(id, TEMPLATE_NOT_FOUND, "Template not found"),
    ))
}

async fn update_template(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<Template>,
) -> Json<Ack> {
    let mut store = db.write().await;
    let Some(stored) = store.templates.get_mut(&id) else {
        return Ack::error(id, TEMPLATE_NOT_FOUND, "Template not found");
    };
    if !input.is_valid() {
        return Ack::error(id, INVALID_TEMPLATE, "Invalid template");
    }
    *stored = Template { id, ..input };
    Ack::ok(id, "OK")
}

async fn delete_template(State(db): State<Db>, Path(id): Path<i64>) -> Json<Ack> {
    let mut store = db.write().await;
    match store.templates.remove(&id) {
        Some(_) => Ack::ok(id, &format!("Template {id} removed.")),
        None => Ack::error(id, TEMPLATE_NOT_FOUND, "Template not found"),
    }
}

async fn validate_template(Json(input): Json<Template>) -> Json<Validation> {
    let valid = input.has_content();
    Json(Validation {
        all_content_is_valid: valid,
        error_code: if valid { 0 } else { NO_CONTENT },
        message: if valid { "OK" } else { "Template has no content" }.to_string(),
    })
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}
