use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sous_assistant::vision::{Camera, DetectionService, FileCamera, InferenceClient};
use sous_assistant::{Assistant, Config, HttpSpeechBackend, SpeechPipeline};

/// Sous - camera-to-voice food identification and recipe assistant
#[derive(Parser)]
#[command(name = "sous", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable spoken narration (for headless machines without audio)
    #[arg(long, env = "SOUS_DISABLE_SPEECH")]
    disable_speech: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test speech output
    TestSpeech {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the speech narration system.")]
        text: String,
    },
    /// Run detection once on a frame and print the predictions
    Detect {
        /// Image to detect on (defaults to the configured frame source)
        image: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,sous_assistant=info",
        1 => "info,sous_assistant=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.disable_speech)?;

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestSpeech { text } => test_speech(&config, &text).await,
            Command::Detect { image } => detect_once(&config, image).await,
        };
    }

    tracing::info!(
        data_dir = %config.data_dir.display(),
        speech = config.speech.enabled,
        "starting sous assistant"
    );

    let assistant = Assistant::new(config)?;
    assistant.run().await?;

    Ok(())
}

/// Speak one line through the real pipeline and exit
async fn test_speech(config: &Config, text: &str) -> anyhow::Result<()> {
    let mut pipeline = SpeechPipeline::spawn(HttpSpeechBackend::new(config.speech.clone()))?;

    let timeout = Duration::from_secs(config.speech.ready_timeout_secs);
    if !pipeline.wait_ready(timeout).await {
        anyhow::bail!("speech device failed to initialize");
    }

    pipeline.narrator().say(text);
    pipeline.shutdown(None).await;

    println!("spoke: {text}");
    Ok(())
}

/// Run one detection and print the prediction list as JSON
async fn detect_once(config: &Config, image: Option<PathBuf>) -> anyhow::Result<()> {
    let path = image.unwrap_or_else(|| config.camera.image_path.clone());
    let camera = FileCamera::new(path);
    let client = InferenceClient::new(&config.detection)?;

    let frame = camera.capture_frame()?;
    let detections = client.infer(&frame).await?;

    println!("{}", serde_json::to_string_pretty(&detections)?);
    Ok(())
}
