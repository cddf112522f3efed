//! Sous - camera-to-voice food identification and recipe assistant
//!
//! This library provides the core functionality for the Sous assistant:
//! - Speech narration pipeline (queue, worker, device recovery)
//! - Guided session state machine (capture → suggest → recipe → continue)
//! - Food detection and recipe collaborator seams
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    Triggers                          │
//! │    Console  │  (any transport driving the session)  │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                   Session                            │
//! │  capture │ select recipe │ continue/end │ go home   │
//! └──────┬──────────────────────────────┬───────────────┘
//!        │                              │ narration (fire-and-forget)
//! ┌──────▼───────────────┐   ┌──────────▼───────────────┐
//! │    Collaborators      │   │     Speech Pipeline      │
//! │  Camera │ Detection   │   │  queue → worker → device │
//! │  Catalog │ Matcher    │   │       (one thread)       │
//! └──────────────────────┘   └──────────────────────────┘
//! ```

pub mod assistant;
pub mod config;
pub mod error;
pub mod recipes;
pub mod session;
pub mod speech;
pub mod vision;

pub use assistant::Assistant;
pub use config::{Config, DEFAULT_MATCH_THRESHOLD, DEFAULT_MAX_SUGGESTIONS};
pub use error::{Error, Result};
pub use recipes::{
    DishCatalog, Recipe, RecipeMatcher, RecipeStore, SuggestionCatalog, TokenSortMatcher,
};
pub use session::{CaptureOutcome, ContinueOutcome, SelectOutcome, Session, SessionStep};
pub use speech::{HttpSpeechBackend, NarrationItem, Narrator, SpeechBackend, SpeechPipeline};
pub use vision::{Camera, Detection, DetectionService, FileCamera, InferenceClient};
