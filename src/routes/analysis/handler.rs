use axum::{
    Extension,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::{
    AppState,
    classify::decode_upload,
    error::AppError,
    middleware::AuthenticatedUser,
    presenter::build_report,
    utils::success_to_api_response,
};

const IMAGE_FIELD: &str = "image";

async fn read_image_field(multipart: &mut Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart data: {}", e)))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read image data: {}", e)))?;
            return Ok(data.to_vec());
        }
    }
    Err(AppError::InvalidInput("No image provided".into()))
}

/// Classifies one uploaded hand image and returns the rendered report.
#[axum::debug_handler]
pub async fn analyze(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(username)): Extension<AuthenticatedUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let bytes = read_image_field(&mut multipart).await?;
    tracing::info!("User {} uploaded {} bytes for analysis", username, bytes.len());

    let image = decode_upload(&bytes)?;
    let result = state.classifier.classify(&image).await?;

    let report = build_report(&result, &state.content.precautions, Utc::now())
        .inspect_err(|_| tracing::warn!("Classification for {} returned no predictions", username))?;
    tracing::info!(
        "Top prediction for {}: {} ({}%)",
        username,
        report.top.label,
        report.top.confidence_pct
    );

    Ok((StatusCode::OK, success_to_api_response(report)))
}
