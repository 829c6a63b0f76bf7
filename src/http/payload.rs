//! Request body extractor that accepts JSON or form-encoded bodies.
//!
//! The browser UI posts JSON via `fetch`, while plain HTML forms post
//! `application/x-www-form-urlencoded` or `multipart/form-data`. Handlers
//! also need to know which one arrived: JSON callers get JSON back, form
//! callers get a redirect.

use axum::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::http::error::AppError;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const FORM_MULTIPART: &str = "multipart/form-data";

/// Decoded request body plus the format it arrived in
#[derive(Debug)]
pub struct Payload<T> {
    /// Decoded body
    pub body: T,
    /// Whether the request was sent as JSON
    pub is_json: bool,
}

/// Lowercased media type of the request, without parameters
fn media_type(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    let essence = content_type.split(';').next().unwrap_or_default();
    Some(essence.trim().to_ascii_lowercase())
}

/// Whether the request declares a JSON body (`application/json` or `*/*+json`)
pub fn is_json_request(headers: &HeaderMap) -> bool {
    media_type(headers).map_or(false, |mime| {
        mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
    })
}

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json_request(req.headers()) {
            let Json(body) = Json::<T>::from_request(req, state).await.map_err(|e| {
                tracing::debug!("Rejected JSON body: {}", e);
                AppError::BadRequest("Invalid request body".to_string())
            })?;
            return Ok(Self {
                body,
                is_json: true,
            });
        }

        // Form fields are optional; anything unparseable reads as empty.
        let body = match media_type(req.headers()).as_deref() {
            Some(FORM_URLENCODED) => urlencoded_body(req, state).await,
            Some(FORM_MULTIPART) => multipart_body(req, state).await,
            _ => T::default(),
        };

        Ok(Self {
            body,
            is_json: false,
        })
    }
}

async fn urlencoded_body<S, T>(req: Request, state: &S) -> T
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    // `Form` matches the header case-sensitively.
    let (mut parts, body) = req.into_parts();
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(FORM_URLENCODED),
    );

    match Form::<T>::from_request(Request::from_parts(parts, body), state).await {
        Ok(Form(body)) => body,
        Err(e) => {
            tracing::debug!("Ignoring malformed form body: {}", e);
            T::default()
        }
    }
}

async fn multipart_body<S, T>(req: Request, state: &S) -> T
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    let mut multipart = match Multipart::from_request(req, state).await {
        Ok(multipart) => multipart,
        Err(e) => {
            tracing::debug!("Ignoring malformed multipart body: {}", e);
            return T::default();
        }
    };

    let mut fields = Map::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::debug!("Ignoring malformed multipart body: {}", e);
                return T::default();
            }
        };

        // Text fields only; uploads are skipped.
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if field.file_name().is_some() {
            continue;
        }
        match field.text().await {
            Ok(text) => {
                fields.insert(name, Value::String(text));
            }
            Err(e) => {
                tracing::debug!("Ignoring unreadable multipart field {}: {}", name, e);
            }
        }
    }

    serde_json::from_value(Value::Object(fields)).unwrap_or_else(|e| {
        tracing::debug!("Ignoring multipart fields: {}", e);
        T::default()
    })
}
