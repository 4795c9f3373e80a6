//! Hand-image classification through the hosted inference service.

mod client;
pub(crate) mod encode;

pub use client::RoboflowClient;
pub use encode::{decode_upload, encode_jpeg};

use std::collections::BTreeMap;

use async_trait::async_trait;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Predictions in the order the service returned them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClassificationResult {
    pub predictions: Vec<Prediction>,
}

#[async_trait]
pub trait Classifier: Send + Sync {
    /// One-shot classification. No retries, no caching.
    async fn classify(&self, image: &DynamicImage) -> Result<ClassificationResult, AppError>;
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    predictions: Option<RawPredictions>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPredictions {
    List(Vec<RawPrediction>),
    // 多标签模型返回 {label: {confidence}}
    Map(BTreeMap<String, RawScore>),
}

#[derive(Debug, Deserialize)]
struct RawPrediction {
    class: String,
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct RawScore {
    confidence: f64,
}

/// Parses the service payload. Any missing field or a confidence outside
/// `[0, 1]` rejects the whole response.
pub fn parse_response(body: &[u8]) -> Result<ClassificationResult, AppError> {
    let raw: RawResponse = serde_json::from_slice(body)
        .map_err(|e| AppError::MalformedResponse(format!("invalid payload: {}", e)))?;

    let predictions = match raw.predictions {
        Some(RawPredictions::List(items)) => items
            .into_iter()
            .map(|p| Prediction::new(p.class, p.confidence))
            .collect::<Vec<_>>(),
        Some(RawPredictions::Map(scores)) => scores
            .into_iter()
            .map(|(label, score)| Prediction::new(label, score.confidence))
            .collect(),
        None => {
            return Err(AppError::MalformedResponse(
                "missing predictions field".into(),
            ));
        }
    };

    if let Some(bad) = predictions
        .iter()
        .find(|p| !(0.0..=1.0).contains(&p.confidence))
    {
        return Err(AppError::MalformedResponse(format!(
            "confidence {} for {} is outside [0, 1]",
            bad.confidence, bad.label
        )));
    }

    Ok(ClassificationResult { predictions })
}
