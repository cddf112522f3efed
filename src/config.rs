//! Configuration management for the Sous assistant

use std::path::PathBuf;

use serde::Deserialize;

use crate::Result;

/// Minimum fuzzy-match score (0-100) to accept a recipe
pub const DEFAULT_MATCH_THRESHOLD: u8 = 80;

/// Maximum number of dish suggestions per detection
pub const DEFAULT_MAX_SUGGESTIONS: usize = 9;

/// Sous assistant configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding dishes.json and recipes.json
    pub data_dir: PathBuf,

    /// Frame source configuration
    pub camera: CameraConfig,

    /// Detection model configuration
    pub detection: DetectionConfig,

    /// Speech narration configuration
    pub speech: SpeechConfig,

    /// Minimum fuzzy-match score to accept a recipe
    pub match_threshold: u8,

    /// Maximum dish suggestions per detection
    pub max_suggestions: usize,
}

/// Frame source configuration
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Still image standing in for a live camera
    pub image_path: PathBuf,
}

/// Hosted detection model configuration
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Inference endpoint base URL
    pub api_url: String,

    /// API key (from `SOUS_DETECTION_API_KEY`)
    pub api_key: Option<String>,

    /// Model identifier, e.g. "fruits-and-vegetables-v3/1"
    pub model_id: String,
}

/// Speech narration configuration
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Enable spoken narration
    pub enabled: bool,

    /// Synthesis endpoint URL
    pub api_url: String,

    /// API key (from `SOUS_SPEECH_API_KEY` or `OPENAI_API_KEY`)
    pub api_key: Option<String>,

    /// Synthesis model, e.g. "tts-1"
    pub model: String,

    /// Voice identifier
    pub voice: String,

    /// Speed multiplier (0.25 to 4.0)
    pub speed: f32,

    /// How long startup waits for the speech device
    pub ready_timeout_secs: u64,
}

/// Optional TOML overlay, all fields optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    camera_image: Option<PathBuf>,
    detection_url: Option<String>,
    detection_model: Option<String>,
    speech_url: Option<String>,
    speech_model: Option<String>,
    speech_voice: Option<String>,
    speech_speed: Option<f32>,
    match_threshold: Option<u8>,
    max_suggestions: Option<usize>,
}

impl Config {
    /// Load configuration: defaults, then the TOML file, then environment
    ///
    /// # Errors
    ///
    /// Returns error if an explicitly named config file cannot be parsed
    pub fn load(disable_speech: bool) -> Result<Self> {
        let file = Self::load_file()?;

        let data_dir = std::env::var("SOUS_DATA_DIR")
            .map(PathBuf::from)
            .ok()
            .or(file.data_dir)
            .unwrap_or_else(|| PathBuf::from("data"));

        let camera = CameraConfig {
            image_path: std::env::var("SOUS_CAMERA_IMAGE")
                .map(PathBuf::from)
                .ok()
                .or(file.camera_image)
                .unwrap_or_else(|| data_dir.join("frame.jpg")),
        };

        let detection = DetectionConfig {
            api_url: std::env::var("SOUS_DETECTION_URL")
                .ok()
                .or(file.detection_url)
                .unwrap_or_else(|| "https://detect.roboflow.com".to_string()),
            api_key: std::env::var("SOUS_DETECTION_API_KEY").ok(),
            model_id: std::env::var("SOUS_DETECTION_MODEL")
                .ok()
                .or(file.detection_model)
                .unwrap_or_else(|| "fruits-and-vegetables-v3/1".to_string()),
        };

        let speech = SpeechConfig {
            enabled: !disable_speech,
            api_url: std::env::var("SOUS_SPEECH_URL")
                .ok()
                .or(file.speech_url)
                .unwrap_or_else(|| "https://api.openai.com/v1/audio/speech".to_string()),
            api_key: std::env::var("SOUS_SPEECH_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok(),
            model: std::env::var("SOUS_SPEECH_MODEL")
                .ok()
                .or(file.speech_model)
                .unwrap_or_else(|| "tts-1".to_string()),
            voice: std::env::var("SOUS_SPEECH_VOICE")
                .ok()
                .or(file.speech_voice)
                .unwrap_or_else(|| "alloy".to_string()),
            speed: file.speech_speed.unwrap_or(1.0),
            ready_timeout_secs: 10,
        };

        if disable_speech {
            tracing::info!("speech explicitly disabled via --disable-speech");
        }

        Ok(Self {
            data_dir,
            camera,
            detection,
            speech,
            match_threshold: file.match_threshold.unwrap_or(DEFAULT_MATCH_THRESHOLD),
            max_suggestions: file.max_suggestions.unwrap_or(DEFAULT_MAX_SUGGESTIONS),
        })
    }

    /// Read the TOML overlay from `SOUS_CONFIG` or the default location
    fn load_file() -> Result<ConfigFile> {
        let explicit = std::env::var("SOUS_CONFIG").map(PathBuf::from).ok();

        let path = explicit.clone().or_else(|| {
            directories::ProjectDirs::from("dev", "sous", "sous")
                .map(|d| d.config_dir().join("config.toml"))
        });

        let Some(path) = path else {
            return Ok(ConfigFile::default());
        };

        if !path.exists() {
            if explicit.is_some() {
                return Err(crate::Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Ok(ConfigFile::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let file = toml::from_str(&content)?;

        tracing::info!(path = %path.display(), "loaded config file");
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        assert_eq!(DEFAULT_MATCH_THRESHOLD, 80);
        assert_eq!(DEFAULT_MAX_SUGGESTIONS, 9);
    }

    #[test]
    fn test_config_file_overlay_parses() {
        let file: ConfigFile = toml::from_str(
            r#"
            data_dir = "/srv/sous"
            speech_voice = "nova"
            match_threshold = 70
            "#,
        )
        .unwrap();

        assert_eq!(file.data_dir, Some(PathBuf::from("/srv/sous")));
        assert_eq!(file.speech_voice.as_deref(), Some("nova"));
        assert_eq!(file.match_threshold, Some(70));
        assert!(file.max_suggestions.is_none());
    }
}
