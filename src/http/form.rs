use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};
use indexmap::IndexMap;

use crate::{
    color::PixelCoordinate,
    error::{AnalysisError, AppError, RequestError},
};

pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// A `multipart/form-data` body: the `image` file plus text fields.
///
/// File parts under any other name are skipped, as is a file input that
/// was submitted without a file.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: IndexMap<String, String>,
    image: Option<UploadedImage>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, RequestError> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match field.file_name().map(str::to_string) {
                Some(file_name) if file_name.is_empty() => {}
                Some(file_name) => {
                    let data = field.bytes().await?;
                    if name == IMAGE_FIELD && form.image.is_none() {
                        form.image = Some(UploadedImage {
                            file_name,
                            data: data.to_vec(),
                        });
                    }
                }
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }
        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn take_image(&mut self) -> Option<UploadedImage> {
        self.image.take()
    }

    /// Parses a `{"x": .., "y": ..}` text field.
    pub fn coordinates(&self, field: &'static str) -> Result<PixelCoordinate, AnalysisError> {
        let raw = self.text(field).ok_or(AnalysisError::MissingField(field))?;
        serde_json::from_str(raw)
            .map_err(|source| AnalysisError::InvalidCoordinates { field, source })
    }
}

#[async_trait]
impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(RequestError::from)?;
        Ok(UploadForm::read(multipart).await?)
    }
}
