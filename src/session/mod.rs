//! Guided session state machine
//!
//! Tracks the current step of the capture → suggest → recipe → continue
//! cycle and drives narration for every transition. Operations serialize on
//! one session-wide lock; narration is fire-and-forget, so no operation
//! result ever waits on speech.

pub mod script;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::recipes::{Recipe, RecipeMatcher, RecipeStore, SuggestionCatalog};
use crate::speech::Narrator;
use crate::vision::{Camera, DetectionService};
use crate::{Error, Result};

/// Stage of the guided interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStep {
    /// No session in progress
    Idle,
    /// Waiting for the user to capture a frame
    AwaitingCapture,
    /// Dish suggestions presented, waiting for a pick
    Suggesting,
    /// Recipe being shown
    ShowingRecipe,
    /// Waiting for the continue/end choice
    AwaitingContinue,
}

/// Mutable session state, guarded by the session lock
#[derive(Debug)]
struct SessionState {
    step: SessionStep,
    last_detected_class: Option<String>,
    suggestions: Vec<String>,
}

/// Result of a capture operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaptureOutcome {
    /// A food item was identified
    Detected {
        /// Best-candidate class label
        class: String,
        /// Model confidence in `[0, 1]`
        confidence: f32,
        /// Dish suggestions for the detected class
        suggestions: Vec<String>,
    },
    /// The frame contained nothing recognizable
    NoDetection,
}

/// Result of a recipe selection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SelectOutcome {
    /// A recipe matched the chosen suggestion
    Found {
        /// Matched corpus name
        dish: String,
        /// Recipe payload, verbatim from the corpus
        recipe: Recipe,
    },
    /// No recipe scored above the match threshold
    NotFound {
        /// The dish name that was looked up
        dish: String,
    },
    /// Selection number outside the suggestion range
    InvalidSelection {
        /// Upper bound of the valid range
        max: usize,
    },
}

/// Result of the continue/end choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ContinueOutcome {
    /// Try another dish
    Continue,
    /// End the session
    End,
    /// Neither yes nor no
    InvalidChoice,
}

/// The guided food-identification session
///
/// Holds the collaborator seams and the session lock. One instance serves
/// the whole process; operations may be invoked from any task.
pub struct Session {
    state: Mutex<SessionState>,
    camera: Arc<dyn Camera>,
    detector: Arc<dyn DetectionService>,
    catalog: Arc<dyn SuggestionCatalog>,
    recipes: RecipeStore,
    matcher: Arc<dyn RecipeMatcher>,
    narrator: Narrator,
    match_threshold: u8,
}

impl Session {
    /// Create a session in the `Idle` step
    #[must_use]
    pub fn new(
        camera: Arc<dyn Camera>,
        detector: Arc<dyn DetectionService>,
        catalog: Arc<dyn SuggestionCatalog>,
        recipes: RecipeStore,
        matcher: Arc<dyn RecipeMatcher>,
        narrator: Narrator,
        match_threshold: u8,
    ) -> Self {
        Self {
            state: Mutex::new(SessionState {
                step: SessionStep::Idle,
                last_detected_class: None,
                suggestions: Vec::new(),
            }),
            camera,
            detector,
            catalog,
            recipes,
            matcher,
            narrator,
            match_threshold,
        }
    }

    /// Current session step
    pub async fn step(&self) -> SessionStep {
        self.state.lock().await.step
    }

    /// Current dish suggestions
    pub async fn suggestions(&self) -> Vec<String> {
        self.state.lock().await.suggestions.clone()
    }

    /// Class label from the last successful detection
    pub async fn last_detected_class(&self) -> Option<String> {
        self.state.lock().await.last_detected_class.clone()
    }

    /// Begin a session: welcome the user and wait for a capture
    pub async fn start_session(&self) {
        let mut state = self.state.lock().await;
        state.step = SessionStep::AwaitingCapture;
        self.narrator.narrate(script::welcome());
        tracing::info!("session started");
    }

    /// Capture a frame, run detection, and present dish suggestions
    ///
    /// # Errors
    ///
    /// Returns [`Error::Camera`] / [`Error::Capture`] when the frame source
    /// fails and [`Error::Detection`] when inference fails; the session step
    /// is unchanged in every error case.
    pub async fn capture(&self) -> Result<CaptureOutcome> {
        let mut state = self.state.lock().await;

        let frame = match self.camera.capture_frame() {
            Ok(frame) => frame,
            Err(e @ Error::Camera(_)) => {
                tracing::error!(error = %e, "camera unavailable");
                self.narrator.narrate(script::camera_unavailable());
                return Err(e);
            }
            Err(e) => {
                tracing::error!(error = %e, "frame capture failed");
                self.narrator.narrate(script::capture_failed());
                return Err(e);
            }
        };

        let detections = match self.detector.infer(&frame).await {
            Ok(detections) => detections,
            Err(e) => {
                tracing::error!(error = %e, "detection failed");
                self.narrator.narrate(script::processing_error());
                return Err(e);
            }
        };

        let Some(best) = detections
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
        else {
            tracing::info!("no food detected");
            self.narrator.narrate(script::no_food_detected());
            return Ok(CaptureOutcome::NoDetection);
        };

        let suggestions = self.catalog.suggestions_for(&best.class);

        state.last_detected_class = Some(best.class.clone());
        state.suggestions.clone_from(&suggestions);
        state.step = SessionStep::Suggesting;

        tracing::info!(
            class = %best.class,
            confidence = best.confidence,
            suggestions = suggestions.len(),
            "food detected"
        );

        self.narrator
            .narrate(script::detection_result(&best.class, best.confidence, &suggestions));

        Ok(CaptureOutcome::Detected {
            class: best.class.clone(),
            confidence: best.confidence,
            suggestions,
        })
    }

    /// Pick a suggested dish by 1-based number and read out its recipe
    pub async fn select_recipe(&self, number: usize) -> SelectOutcome {
        let mut state = self.state.lock().await;
        let max = state.suggestions.len();

        if number < 1 || number > max {
            tracing::info!(number, max, "selection out of range");
            self.narrator.narrate(script::invalid_selection(max));
            return SelectOutcome::InvalidSelection { max };
        }

        let dish = state.suggestions[number - 1].trim().to_lowercase();
        let matched = self.matcher.best_match(&dish, &self.recipes.names());

        let Some((name, score)) = matched else {
            self.narrator.narrate(script::recipe_not_found(&dish));
            return SelectOutcome::NotFound { dish };
        };

        if score < self.match_threshold {
            tracing::info!(%dish, %name, score, "no recipe above match threshold");
            self.narrator.narrate(script::recipe_not_found(&dish));
            return SelectOutcome::NotFound { dish };
        }

        let Some(recipe) = self.recipes.get(&name) else {
            // matcher produced a name outside the corpus
            tracing::warn!(%name, "matched name missing from corpus");
            self.narrator.narrate(script::recipe_not_found(&dish));
            return SelectOutcome::NotFound { dish };
        };

        state.step = SessionStep::ShowingRecipe;

        tracing::info!(%dish, matched = %name, score, "recipe found");
        self.narrator.narrate(script::recipe(&name, recipe));

        SelectOutcome::Found {
            dish: name,
            recipe: recipe.clone(),
        }
    }

    /// Continue with another dish ("y") or end the session ("n")
    pub async fn continue_or_end(&self, choice: &str) -> ContinueOutcome {
        let mut state = self.state.lock().await;

        match choice.to_lowercase().as_str() {
            "y" => {
                state.step = SessionStep::AwaitingCapture;
                self.narrator.narrate(script::try_another());
                tracing::info!("continuing with another dish");
                ContinueOutcome::Continue
            }
            "n" => {
                state.step = SessionStep::Idle;
                self.narrator.narrate(script::farewell());
                tracing::info!("session ended");
                ContinueOutcome::End
            }
            other => {
                tracing::info!(choice = other, "unrecognized continue choice");
                self.narrator.narrate(script::reprompt_choice());
                ContinueOutcome::InvalidChoice
            }
        }
    }

    /// Return to the home screen from anywhere
    pub async fn go_home(&self) {
        let mut state = self.state.lock().await;
        state.step = SessionStep::Idle;
        self.narrator.narrate(script::returning_home());
        tracing::info!("returned home");
    }
}
