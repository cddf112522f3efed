//! Assistant - the main service
//!
//! Wires configuration, collaborators, the speech pipeline, and the session
//! together, and drives the session from console input until quit or
//! interrupt.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::io::AsyncBufReadExt;

use crate::config::Config;
use crate::recipes::{DishCatalog, RecipeStore, TokenSortMatcher};
use crate::session::{Session, script};
use crate::speech::{HttpSpeechBackend, SpeechPipeline};
use crate::vision::{FileCamera, InferenceClient};
use crate::Result;

/// The Sous assistant: session plus speech pipeline
pub struct Assistant {
    config: Config,
    session: Arc<Session>,
    pipeline: SpeechPipeline,
}

impl Assistant {
    /// Build the assistant from configuration
    ///
    /// # Errors
    ///
    /// Returns error if data files cannot be loaded or collaborators cannot
    /// be constructed
    pub fn new(config: Config) -> Result<Self> {
        let pipeline = if config.speech.enabled {
            SpeechPipeline::spawn(HttpSpeechBackend::new(config.speech.clone()))?
        } else {
            tracing::info!("running without narration");
            SpeechPipeline::disabled()
        };

        let camera = Arc::new(FileCamera::new(config.camera.image_path.clone()));
        let detector = Arc::new(InferenceClient::new(&config.detection)?);
        let catalog = Arc::new(DishCatalog::load(
            &config.data_dir.join("dishes.json"),
            config.max_suggestions,
        )?);
        let recipes = RecipeStore::load(&config.data_dir.join("recipes.json"))?;

        let session = Arc::new(Session::new(
            camera,
            detector,
            catalog,
            recipes,
            Arc::new(TokenSortMatcher),
            pipeline.narrator(),
            config.match_threshold,
        ));

        Ok(Self {
            config,
            session,
            pipeline,
        })
    }

    /// Shared handle to the session, for embedding in other frontends
    #[must_use]
    pub fn session(&self) -> Arc<Session> {
        Arc::clone(&self.session)
    }

    /// Gracefully stop narration and drain the speech queue
    ///
    /// For embedders driving the session themselves; `run` performs the same
    /// shutdown on exit.
    pub async fn shutdown(mut self) {
        self.pipeline.shutdown(Some(script::shutting_down())).await;
    }

    /// Run the assistant until quit, EOF, or interrupt
    ///
    /// Startup blocks on speech readiness up to the configured timeout and
    /// proceeds without narration if it expires.
    ///
    /// # Errors
    ///
    /// Returns error if console input fails fatally
    pub async fn run(mut self) -> Result<()> {
        let timeout = Duration::from_secs(self.config.speech.ready_timeout_secs);
        if !self.pipeline.wait_ready(timeout).await && self.config.speech.enabled {
            tracing::warn!("speech unavailable, continuing without narration");
        }

        let narrator = self.pipeline.narrator();
        narrator.narrate(script::system_ready());

        self.session.start_session().await;
        print_help();

        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupt received");
                    break;
                }
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            if self.dispatch(line.trim()).await {
                                break;
                            }
                        }
                        Ok(None) => break,
                        Err(e) => {
                            tracing::error!(error = %e, "console read failed");
                            break;
                        }
                    }
                }
            }
        }

        self.pipeline.shutdown(Some(script::shutting_down())).await;
        tracing::info!("assistant stopped");
        Ok(())
    }

    /// Map one console command to a session operation; true means quit
    async fn dispatch(&self, input: &str) -> bool {
        match input.to_lowercase().as_str() {
            "" => {}
            "q" | "quit" | "exit" => return true,
            "c" | "capture" => match self.session.capture().await {
                Ok(outcome) => print_outcome(&outcome),
                Err(e) => println!("error: {e}"),
            },
            "y" | "n" => print_outcome(&self.session.continue_or_end(input).await),
            "home" | "back" | "return" => {
                self.session.go_home().await;
            }
            other => {
                if let Ok(number) = other.parse::<usize>() {
                    print_outcome(&self.session.select_recipe(number).await);
                } else {
                    print_help();
                }
            }
        }

        false
    }
}

fn print_help() {
    println!("commands: c (capture), 1-9 (recipe), y/n (continue/end), home, q (quit)");
}

fn print_outcome<T: Serialize>(outcome: &T) {
    match serde_json::to_string_pretty(outcome) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "failed to serialize outcome"),
    }
}
