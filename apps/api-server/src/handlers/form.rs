//! Multipart form reading for post create/update.
//!
//! Text parts become fields, the `featuredImage` part becomes the upload.
//! An empty file part (a form submitted without choosing a file) is ignored.

use std::collections::HashMap;

use actix_multipart::{Field, Multipart, MultipartError};
use futures::TryStreamExt;

use pressroom_core::ports::UploadedFile;
use pressroom_shared::dto::{CreatePostRequest, UpdatePostRequest};

use crate::middleware::error::{AppError, AppResult};

/// Name of the file part carrying the featured image.
pub const IMAGE_FIELD: &str = "featuredImage";

/// Largest accepted text part.
const MAX_TEXT_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Default)]
pub struct PostForm {
    fields: HashMap<String, String>,
    file: Option<UploadedFile>,
}

fn malformed(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed multipart body: {err}"))
}

async fn read_field(field: &mut Field, max_bytes: usize, too_large: &str) -> AppResult<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if data.len() + chunk.len() > max_bytes {
            return Err(AppError::BadRequest(format!(
                "{too_large} exceeds {max_bytes} bytes"
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

impl PostForm {
    /// Drain the multipart stream, rejecting files over `max_file_bytes`.
    pub async fn read(mut payload: Multipart, max_file_bytes: usize) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == IMAGE_FIELD {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();
                let content_type = field.content_type().map(|m| m.essence_str().to_string());
                let data = read_field(&mut field, max_file_bytes, "File").await?;

                if filename.is_empty() && data.is_empty() {
                    continue;
                }
                form.file = Some(UploadedFile {
                    filename,
                    content_type,
                    data,
                });
            } else if !name.is_empty() {
                let data = read_field(&mut field, MAX_TEXT_BYTES, &name).await?;
                let value = String::from_utf8(data)
                    .map_err(|_| AppError::BadRequest(format!("Field '{name}' is not UTF-8")))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    fn take(&mut self, key: &str) -> Option<String> {
        self.fields.remove(key)
    }

    fn take_flag(&mut self, key: &str) -> Option<bool> {
        self.take(key).map(|v| parse_flag(&v))
    }

    pub fn into_create(mut self) -> (CreatePostRequest, Option<UploadedFile>) {
        let request = CreatePostRequest {
            title: self.take("title").unwrap_or_default(),
            content: self.take("content").unwrap_or_default(),
            excerpt: self.take("excerpt"),
            category: self.take("category"),
            tags: self.take("tags"),
            is_published: self.take_flag("isPublished"),
        };
        (request, self.file)
    }

    pub fn into_update(mut self) -> (UpdatePostRequest, Option<UploadedFile>) {
        let request = UpdatePostRequest {
            title: self.take("title"),
            content: self.take("content"),
            excerpt: self.take("excerpt"),
            category: self.take("category"),
            tags: self.take("tags"),
            is_published: self.take_flag("isPublished"),
        };
        (request, self.file)
    }
}

/// HTML forms send checkbox and select values as strings.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}
