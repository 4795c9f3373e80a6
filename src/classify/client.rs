use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use image::DynamicImage;
use reqwest::{Client, header};

use super::{ClassificationResult, Classifier, encode_jpeg, parse_response};
use crate::config::Config;
use crate::error::AppError;

/// Client for the hosted classification endpoint
/// (`POST {api_url}/{model_id}?api_key=...` with a base64 JPEG body).
pub struct RoboflowClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl RoboflowClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.classify_timeout()).build()?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}/{}",
                config.classify_api_url,
                config.classify_model_id.trim_start_matches('/')
            ),
            api_key: config.classify_api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// 错误信息里的 URL 带有 api_key，记录前先去掉
fn network_error(e: reqwest::Error) -> AppError {
    let e = e.without_url();
    if e.is_timeout() {
        AppError::NetworkError(format!("request timed out: {}", e))
    } else {
        AppError::NetworkError(e.to_string())
    }
}

#[async_trait]
impl Classifier for RoboflowClient {
    async fn classify(&self, image: &DynamicImage) -> Result<ClassificationResult, AppError> {
        let jpeg = encode_jpeg(image)?;
        let payload = general_purpose::STANDARD.encode(&jpeg);
        tracing::debug!(
            "Sending {} byte JPEG to {}",
            jpeg.len(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("api_key", self.api_key.as_str())])
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                let err = network_error(e);
                tracing::error!("Classification request failed: {}", err);
                err
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(network_error)?;
        if !status.is_success() {
            tracing::error!(
                "Classification service answered {}: {}",
                status,
                String::from_utf8_lossy(&body)
            );
            return Err(AppError::NetworkError(format!(
                "classification service answered {}",
                status
            )));
        }

        let result = parse_response(&body)?;
        tracing::info!(
            "Received {} predictions from classification service",
            result.predictions.len()
        );
        Ok(result)
    }
}
