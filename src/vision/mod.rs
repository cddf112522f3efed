//! Frame acquisition and food detection
//!
//! The camera and the detection model are external collaborators; the
//! session only sees the `Camera` and `DetectionService` seams.

mod camera;
mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

pub use camera::{Camera, FileCamera};
pub use client::InferenceClient;

/// One classified detection from the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Class label (e.g. "tomato")
    pub class: String,

    /// Confidence in `[0, 1]`
    pub confidence: f32,
}

/// Classifies food items in a captured frame
#[async_trait]
pub trait DetectionService: Send + Sync {
    /// Run inference on an encoded image
    ///
    /// # Errors
    ///
    /// Returns error if the inference call fails or the response is malformed
    async fn infer(&self, image: &[u8]) -> Result<Vec<Detection>>;
}
