//! Request bodies that may arrive as JSON or as `multipart/form-data`.
//!
//! Create endpoints accept either encoding. In multipart bodies:
//!
//! - parts carrying a file name are collected as [`Upload`]s;
//! - text parts become JSON fields; values starting with `[` or `{` are
//!   parsed as JSON, anything else is kept as a string;
//! - a name repeated, or suffixed with `[]`, becomes an array;
//! - empty text values are dropped, as if the field were absent.

use axum::extract::{FromRequest, Json, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use melodia_storage::Upload;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

/// A deserialized body plus any files sent alongside it.
#[derive(Debug)]
pub struct FormInput<T> {
    pub data: T,
    files: Vec<(String, Upload)>,
}

impl<T> FormInput<T> {
    /// Remove and return the file sent under `field`, if any.
    pub fn take_file(&mut self, field: &str) -> Option<Upload> {
        let index = self.files.iter().position(|(name, _)| name == field)?;
        Some(self.files.swap_remove(index).1)
    }
}

impl<S, T> FromRequest<S> for FormInput<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("multipart/form-data"));

        if !is_multipart {
            let Json(data) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(Self {
                data,
                files: Vec::new(),
            });
        }

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let (fields, files) = read_multipart(multipart).await?;
        let data = serde_json::from_value(Value::Object(fields))
            .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))?;
        Ok(Self { data, files })
    }
}

/// Split a multipart body into JSON fields and named file parts.
async fn read_multipart(
    mut multipart: Multipart,
) -> AppResult<(Map<String, Value>, Vec<(String, Upload)>)> {
    let mut fields = Map::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to parse multipart: {e}")))?
    {
        let raw_name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
            files.push((
                raw_name,
                Upload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                },
            ));
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read field: {e}")))?;
        insert_text_field(&mut fields, &raw_name, &text);
    }

    Ok((fields, files))
}

fn insert_text_field(fields: &mut Map<String, Value>, raw_name: &str, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }

    let (name, force_array) = match raw_name.strip_suffix("[]") {
        Some(name) => (name, true),
        None => (raw_name, false),
    };

    let value = if text.starts_with('[') || text.starts_with('{') {
        serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
    } else {
        Value::String(text.to_string())
    };

    match fields.get_mut(name) {
        Some(Value::Array(items)) => match value {
            Value::Array(more) => items.extend(more),
            single => items.push(single),
        },
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None if force_array && !value.is_array() => {
            fields.insert(name.to_string(), Value::Array(vec![value]));
        }
        None => {
            fields.insert(name.to_string(), value);
        }
    }
}

/// Read the file part named `field` from a multipart body.
pub async fn require_file(multipart: Multipart, field: &str) -> AppResult<Upload> {
    let (_, mut files) = read_multipart(multipart).await?;
    let index = files
        .iter()
        .position(|(name, _)| name == field)
        .ok_or_else(|| AppError::BadRequest(format!("File field '{field}' is required")))?;
    Ok(files.swap_remove(index).1)
}
