//! Bookreel command-line client.
//!
//! Submits a document or URL to the generation service, follows the
//! job to completion, downloads the rendered video, and prints the
//! generated marketing copy.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use breel_client::{GeneratorClient, GeneratorClientConfig};
use breel_controller::{ControllerConfig, JobController, JobPhase};
use breel_models::{RenderSettings, SourceDocument, VideoDuration, VideoResult, VoiceStyle};

#[derive(Parser, Debug)]
#[command(name = "breel", about = "Turn an ebook or article into a short video", version)]
struct Args {
    /// PDF or plain-text document to upload
    #[arg(value_name = "FILE", required_unless_present = "url", conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Article or online-ebook URL to ingest instead of a file
    #[arg(long)]
    url: Option<String>,

    /// Video length in seconds (60|120|180|300|600)
    #[arg(long, default_value = "180")]
    duration: VideoDuration,

    /// Narration voice style
    #[arg(long, default_value = "professional")]
    voice: VoiceStyle,

    /// Directory for the downloaded video
    #[arg(long, default_value = "./downloads")]
    output_dir: PathBuf,

    /// Base URL of the generation service (overrides BOOKREEL_API_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Skip downloading the rendered video
    #[arg(long)]
    no_download: bool,

    /// Print the final result as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();

    let mut client_config = GeneratorClientConfig::from_env();
    if let Some(base_url) = &args.base_url {
        client_config.base_url = base_url.clone();
    }

    info!("Using generation service at {}", client_config.base_url);
    let client = GeneratorClient::new(client_config)?;

    if !client.health_check().await? {
        warn!("Generation service did not answer the health check; submitting anyway");
    }

    let controller = JobController::new(client, ControllerConfig::from_env());
    let settings = RenderSettings::new(args.duration, args.voice);

    let job_id = match (&args.file, &args.url) {
        (Some(file), None) => {
            let bytes = tokio::fs::read(file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .with_context(|| format!("bad file name: {}", file.display()))?;
            let document = SourceDocument::new(file_name, bytes)?;
            controller.submit_document(document, settings).await?
        }
        (None, Some(url)) => controller.submit_url(url, settings).await?,
        _ => unreachable!("clap enforces exactly one input"),
    };

    info!(job_id = %job_id, "Job accepted, waiting for the video");

    let result = follow_job(&controller).await?;
    render_result(&args, &result)?;

    if !args.no_download {
        let path = controller.download_to(&args.output_dir).await?;
        println!("Video saved to {}", path.display());
    }

    Ok(())
}

/// Follow phase updates until the job ends, logging progress.
async fn follow_job(controller: &JobController) -> Result<VideoResult> {
    let mut rx = controller.subscribe();

    loop {
        let phase = rx.borrow_and_update().clone();
        match phase {
            JobPhase::Completed { result } => return Ok(result),
            JobPhase::Failed { message } => bail!("generation failed: {message}"),
            JobPhase::Processing { progress, message } => {
                info!("{:>3}% {}", progress, message);
            }
            JobPhase::Idle | JobPhase::Uploading => {}
        }

        if rx.changed().await.is_err() {
            bail!("controller stopped before the job finished");
        }
    }
}

fn render_result(args: &Args, result: &VideoResult) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("Video generated ({})", result.category);
    println!();
    println!("Script:");
    println!("  {}", result.script);
    println!();
    println!("Marketing copy:");
    println!("  hook:        {}", result.marketing.hook);
    println!("  caption:     {}", result.marketing.caption);
    println!("  hashtags:    {}", result.marketing.hashtag_line());
    println!("  description: {}", result.marketing.description);
    Ok(())
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}
