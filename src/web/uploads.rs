//! Multipart form readers shared by the upload endpoints.

use crate::app_config::APP_CONFIG;
use crate::images::Upload;
use crate::plants::PlantInput;
use actix_multipart::Multipart;
use actix_web::{error, Error};
use futures_util::TryStreamExt;

/// A plant submission: the JSON `plant` part plus the optional `mainImage`
/// file part.
pub struct PlantForm {
    pub plant: PlantInput,
    pub main_image: Option<Upload>,
}

async fn read_field_bytes(field: &mut actix_multipart::Field) -> Result<Vec<u8>, Error> {
    let max_bytes = APP_CONFIG.limits.max_upload_size_mb * 1024 * 1024;
    let mut data = Vec::new();

    while let Some(chunk) = field.try_next().await.map_err(error::ErrorBadRequest)? {
        if data.len() + chunk.len() > max_bytes {
            return Err(error::ErrorPayloadTooLarge(format!(
                "Upload exceeds the {} MB limit",
                APP_CONFIG.limits.max_upload_size_mb
            )));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(data)
}

fn field_filename(field: &actix_multipart::Field) -> Option<String> {
    field
        .content_disposition()
        .get_filename()
        .map(|name| name.to_string())
}

/// Reject file parts that don't declare an image content type.
fn require_image_content_type(field: &actix_multipart::Field) -> Result<(), Error> {
    match field.content_type() {
        Some(content_type) if content_type.type_() == mime::IMAGE => Ok(()),
        Some(content_type) => Err(error::ErrorBadRequest(format!(
            "Expected an image upload, got {}",
            content_type
        ))),
        None => Ok(()),
    }
}

/// Read a multipart plant form. The `plant` part is required; an absent or
/// empty `mainImage` part means no image change.
pub async fn read_plant_form(mut payload: Multipart) -> Result<PlantForm, Error> {
    let mut plant: Option<PlantInput> = None;
    let mut main_image: Option<Upload> = None;

    while let Some(mut field) = payload.try_next().await.map_err(error::ErrorBadRequest)? {
        let name = field.name().to_string();
        match name.as_str() {
            "plant" => {
                let data = read_field_bytes(&mut field).await?;
                let input: PlantInput = serde_json::from_slice(&data)
                    .map_err(|e| error::ErrorBadRequest(format!("Malformed plant data: {}", e)))?;
                plant = Some(input);
            }
            "mainImage" => {
                require_image_content_type(&field)?;
                let filename = field_filename(&field)
                    .ok_or_else(|| error::ErrorBadRequest("Image part has no file name"))?;
                let data = read_field_bytes(&mut field).await?;
                if !data.is_empty() {
                    main_image = Some(Upload { filename, data });
                }
            }
            _ => {
                // Drain unknown parts so the stream stays consumable.
                read_field_bytes(&mut field).await?;
            }
        }
    }

    let plant = plant.ok_or_else(|| error::ErrorBadRequest("Missing plant data"))?;
    Ok(PlantForm { plant, main_image })
}

/// Read a single `file` part from a multipart payload.
pub async fn read_file_upload(mut payload: Multipart) -> Result<Upload, Error> {
    while let Some(mut field) = payload.try_next().await.map_err(error::ErrorBadRequest)? {
        if field.name() != "file" {
            read_field_bytes(&mut field).await?;
            continue;
        }

        require_image_content_type(&field)?;
        let filename = field_filename(&field)
            .ok_or_else(|| error::ErrorBadRequest("File part has no file name"))?;
        let data = read_field_bytes(&mut field).await?;
        if data.is_empty() {
            return Err(error::ErrorBadRequest("Uploaded file is empty"));
        }
        return Ok(Upload { filename, data });
    }

    Err(error::ErrorBadRequest("Missing file part"))
}
