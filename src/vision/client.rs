//! Hosted detection model client

use async_trait::async_trait;
use base64::Engine;

use crate::config::DetectionConfig;
use crate::vision::{Detection, DetectionService};
use crate::{Error, Result};

/// HTTP client for a hosted object-detection model
///
/// Posts a base64-encoded frame to `{api_url}/{model_id}` and reads back the
/// prediction list.
pub struct InferenceClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model_id: String,
}

impl InferenceClient {
    /// Create a new inference client
    ///
    /// # Errors
    ///
    /// Returns error if no API key is configured
    pub fn new(config: &DetectionConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            Error::Config("detection API key required (SOUS_DETECTION_API_KEY)".to_string())
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key,
            model_id: config.model_id.clone(),
        })
    }
}

#[async_trait]
impl DetectionService for InferenceClient {
    async fn infer(&self, image: &[u8]) -> Result<Vec<Detection>> {
        #[derive(serde::Deserialize)]
        struct InferResponse {
            #[serde(default)]
            predictions: Vec<Detection>,
        }

        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let url = format!("{}/{}", self.api_url, self.model_id);

        let response = self
            .client
            .post(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(encoded)
            .send()
            .await
            .map_err(|e| Error::Detection(format!("inference request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Detection(format!("inference error {status}: {body}")));
        }

        let parsed: InferResponse = response
            .json()
            .await
            .map_err(|e| Error::Detection(format!("malformed inference response: {e}")))?;

        tracing::debug!(
            model = %self.model_id,
            predictions = parsed.predictions.len(),
            "inference complete"
        );

        Ok(parsed.predictions)
    }
}
