//! Request body extractor for create and update.
//!
//! Browsers post `multipart/form-data` (text parts plus an optional `image`
//! file part); scripted clients may send the same fields as JSON or as a
//! urlencoded form. A request without a body yields an empty form.

use axum::{
    Form, Json,
    extract::{FromRequest, Multipart, Request, multipart::MultipartError},
    http::{StatusCode, header::CONTENT_TYPE},
};

use crate::error::{ItemError, ItemResult};
use crate::models::{ImageUpload, ItemFields, ItemForm};

/// Name of the multipart part carrying the photo
pub const IMAGE_FIELD: &str = "image";

/// Extracts an [`ItemForm`] from the request body
#[derive(Debug)]
pub struct ItemPayload(pub ItemForm);

impl<S> FromRequest<S> for ItemPayload
where
    S: Send + Sync,
{
    type Rejection = ItemError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase);

        let form = match content_type.as_deref() {
            None => ItemForm::default(),
            Some(ct) if ct.starts_with("multipart/form-data") => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| rejected(e.status(), e.body_text()))?;
                read_multipart(multipart).await?
            }
            Some(ct) if ct.starts_with("application/json") => {
                let Json(fields) = Json::<ItemFields>::from_request(req, state)
                    .await
                    .map_err(|e| rejected(e.status(), e.body_text()))?;
                ItemForm {
                    fields,
                    image: None,
                }
            }
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
                let Form(fields) = Form::<ItemFields>::from_request(req, state)
                    .await
                    .map_err(|e| rejected(e.status(), e.body_text()))?;
                ItemForm {
                    fields,
                    image: None,
                }
            }
            Some(other) => {
                return Err(ItemError::InvalidForm(format!(
                    "unsupported content type '{other}'"
                )));
            }
        };

        Ok(ItemPayload(form))
    }
}

/// Collect text parts into [`ItemFields`] and keep at most one image.
///
/// An `image` part without a file name (an empty file input) is ignored.
async fn read_multipart(mut multipart: Multipart) -> ItemResult<ItemForm> {
    let mut form = ItemForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;

            match file_name {
                Some(file_name) if !file_name.is_empty() => {
                    if form.image.is_some() {
                        return Err(ItemError::InvalidForm(
                            "only one image may be uploaded".to_string(),
                        ));
                    }
                    form.image = Some(ImageUpload::new(file_name, bytes));
                }
                _ => tracing::debug!("Ignoring image part without a file name"),
            }
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        form.fields.set(&name, value)?;
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> ItemError {
    rejected(err.status(), err.body_text())
}

fn rejected(status: StatusCode, message: String) -> ItemError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ItemError::PayloadTooLarge(message)
    } else {
        ItemError::InvalidForm(message)
    }
}
