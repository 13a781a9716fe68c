//! Request correlation and audit logging, wrapped around the API routes.

use std::time::Instant;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue, USER_AGENT};
use actix_web::http::Method;
use actix_web::middleware::Next;
use actix_web::{Error, HttpMessage};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
const AUDITED_PATH_PREFIX: &str = "/api/products";

/// Correlation id of the current request, stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

fn is_valid_request_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 128
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Assigns a correlation id (reusing a well-formed incoming `x-request-id`),
/// logs request start and completion, and echoes the id on the response.
pub async fn request_context(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| is_valid_request_id(v))
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestId(request_id.clone()));

    let method = req.method().clone();
    let path = req.path().to_string();
    let started = Instant::now();
    match req.query_string() {
        "" => log::info!("Request {request_id} started: {method} {path}"),
        query => log::info!("Request {request_id} started: {method} {path}?{query}"),
    }

    let mut res = match next.call(req).await {
        Ok(res) => res,
        Err(e) => {
            log::error!(
                "Request {request_id} failed after {}ms - {method} {path}: {e}",
                started.elapsed().as_millis()
            );
            return Err(e);
        }
    };

    log::info!(
        "Request {request_id} completed in {}ms - Status: {}",
        started.elapsed().as_millis(),
        res.status().as_u16()
    );
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        res.headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    Ok(res)
}

#[derive(Debug, Serialize)]
struct AuditRecord {
    timestamp: DateTime<Utc>,
    method: String,
    path: String,
    query_string: String,
    user_agent: Option<String>,
    remote_ip: Option<String>,
    correlation_id: Option<String>,
}

impl AuditRecord {
    fn from_request(req: &ServiceRequest) -> Self {
        Self {
            timestamp: Utc::now(),
            method: req.method().to_string(),
            path: req.path().to_string(),
            query_string: req.query_string().to_string(),
            user_agent: req
                .headers()
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            remote_ip: req.peer_addr().map(|addr| addr.ip().to_string()),
            correlation_id: req.extensions().get::<RequestId>().map(|id| id.0.clone()),
        }
    }
}

fn should_audit(method: &Method, path: &str) -> bool {
    (*method == Method::POST || *method == Method::PUT || *method == Method::DELETE)
        && path.to_ascii_lowercase().starts_with(AUDITED_PATH_PREFIX)
}

/// Writes an audit entry for every catalog mutation under the `audit` target.
pub async fn audit_log(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if should_audit(req.method(), req.path()) {
        let record = AuditRecord::from_request(&req);
        match serde_json::to_string(&record) {
            Ok(json) => log::info!(target: "audit", "Audit Log: {json}"),
            Err(e) => log::warn!(target: "audit", "Could not serialize audit record: {e}"),
        }
    }
    next.call(req).await
}
