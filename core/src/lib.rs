//! Synchronous client for Postmark's email template API.
//!
//! # Overview
//! `TemplateClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network. `TemplateApi` pairs it with a
//! blocking `Transport` (ureq by default) to offer one-shot create, get,
//! update, delete, list and validate calls.
//!
//! # Design
//! - The client holds only the base URL and the server token; no state
//!   survives between calls and nothing is retried.
//! - Each operation is split into `build_*` and `parse_*`, so the wire
//!   mapping is tested without I/O.
//! - Errors keep transport, decode and remote (embedded `errorCode`)
//!   failures apart.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{TemplateClient, DEFAULT_BASE_URL, SERVER_TOKEN_HEADER};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{TemplateApi, Transport, UreqTransport};
pub use types::{ApiResponse, Template, TemplateList};
