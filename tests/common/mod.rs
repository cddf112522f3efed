//! Shared test utilities
//!
//! In-memory collaborators for exercising the speech pipeline and the
//! session without audio hardware or network access.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sous_assistant::{
    Camera, Detection, DetectionService, DishCatalog, Error, Recipe, RecipeMatcher, RecipeStore,
    Result, SpeechBackend,
};

/// Speech backend that records rendered lines in memory
///
/// Pacing pauses are skipped so drains finish immediately.
pub struct RecordingBackend {
    rendered: Arc<Mutex<Vec<String>>>,
    init_calls: Arc<AtomicUsize>,
    fail_render_once_on: Mutex<Option<String>>,
    fail_init: bool,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            rendered: Arc::new(Mutex::new(Vec::new())),
            init_calls: Arc::new(AtomicUsize::new(0)),
            fail_render_once_on: Mutex::new(None),
            fail_init: false,
        }
    }

    /// Backend whose device can never be initialized
    pub fn failing_init() -> Self {
        Self {
            fail_init: true,
            ..Self::new()
        }
    }

    /// Fail the first render of exactly this text, then behave normally
    pub fn fail_render_once_on(self, text: &str) -> Self {
        *self.fail_render_once_on.lock().unwrap() = Some(text.to_string());
        self
    }

    /// Shared view of everything rendered so far
    pub fn rendered(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.rendered)
    }

    /// Shared count of `init` calls (startup plus reinitializations)
    pub fn init_calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.init_calls)
    }
}

impl SpeechBackend for RecordingBackend {
    type Handle = ();

    fn init(&self) -> Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            return Err(Error::Audio("no output device".to_string()));
        }
        Ok(())
    }

    fn render(&self, _handle: &mut (), text: &str) -> Result<()> {
        let mut pending = self.fail_render_once_on.lock().unwrap();
        if pending.as_deref() == Some(text) {
            pending.take();
            return Err(Error::Speech("synthesis failed".to_string()));
        }
        drop(pending);

        self.rendered.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn pause(&self, _hint: Duration) {}
}

/// Camera that always produces a frame
pub struct StubCamera;

impl Camera for StubCamera {
    fn capture_frame(&self) -> Result<Vec<u8>> {
        Ok(vec![0xff, 0xd8, 0xff])
    }
}

/// Camera with no device attached
pub struct UnavailableCamera;

impl Camera for UnavailableCamera {
    fn capture_frame(&self) -> Result<Vec<u8>> {
        Err(Error::Camera("no frame source".to_string()))
    }
}

/// Detection service returning a fixed prediction list
pub struct StubDetector {
    detections: Vec<Detection>,
    fail: bool,
}

impl StubDetector {
    pub fn detecting(detections: Vec<Detection>) -> Self {
        Self {
            detections,
            fail: false,
        }
    }

    pub fn empty() -> Self {
        Self::detecting(Vec::new())
    }

    pub fn failing() -> Self {
        Self {
            detections: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl DetectionService for StubDetector {
    async fn infer(&self, _image: &[u8]) -> Result<Vec<Detection>> {
        if self.fail {
            return Err(Error::Detection("inference unavailable".to_string()));
        }
        Ok(self.detections.clone())
    }
}

/// Matcher returning a fixed result regardless of query
pub struct StubMatcher {
    result: Option<(String, u8)>,
}

impl StubMatcher {
    pub fn scoring(name: &str, score: u8) -> Self {
        Self {
            result: Some((name.to_string(), score)),
        }
    }
}

impl RecipeMatcher for StubMatcher {
    fn best_match(&self, _query: &str, _candidates: &[String]) -> Option<(String, u8)> {
        self.result.clone()
    }
}

/// Catalog with tomato suggestions
pub fn sample_catalog() -> DishCatalog {
    let mut map = HashMap::new();
    map.insert(
        "tomato".to_string(),
        vec!["Tomato Soup".to_string(), "Bruschetta".to_string()],
    );
    DishCatalog::from_map(map, 9)
}

/// The tomato soup recipe used across tests
pub fn sample_recipe() -> Recipe {
    Recipe {
        ingredients: vec![
            "4 ripe tomatoes".to_string(),
            "1 onion".to_string(),
            "2 cups vegetable stock".to_string(),
        ],
        instructions: vec![
            "Chop the tomatoes and onion".to_string(),
            "Simmer in stock for twenty minutes".to_string(),
            "Blend until smooth".to_string(),
        ],
    }
}

/// Corpus containing the sample recipe
pub fn sample_recipes() -> RecipeStore {
    let mut map = HashMap::new();
    map.insert("tomato soup".to_string(), sample_recipe());
    RecipeStore::from_map(map)
}
