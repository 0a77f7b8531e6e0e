use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "promoreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the slideshow video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render the single frame shown at a given time as a PNG.
    Frame(FrameArgs),
    /// Print the planned slide timeline as JSON.
    Plan(InputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Render job JSON. Replaces the individual input flags.
    #[arg(long, conflicts_with_all = ["images", "audio", "watermark", "font"])]
    job: Option<PathBuf>,

    /// Source image, in display order (repeatable).
    #[arg(long = "image")]
    images: Vec<PathBuf>,

    /// Narration audio file.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Watermark label, drawn as `@label`.
    #[arg(long)]
    watermark: Option<String>,

    /// Font for hook and watermark text. Defaults to a system font when one is found.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Seed for hook selection.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output path. The extension is replaced by the one of the selected format.
    #[arg(long)]
    out: PathBuf,

    /// Compose frames as fast as possible instead of pacing them by the wall clock.
    #[arg(long, default_value_t = false)]
    offline: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Time of the frame, in seconds.
    #[arg(long)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn load_job(args: &InputArgs) -> anyhow::Result<promoreel::RenderJob> {
    let mut job = match &args.job {
        Some(path) => promoreel::RenderJob::from_path(path)?,
        None => {
            let audio = args
                .audio
                .clone()
                .context("either --job or --audio is required")?;
            anyhow::ensure!(!args.images.is_empty(), "at least one --image is required");
            promoreel::RenderJob {
                images: args.images.clone(),
                audio,
                watermark: args.watermark.clone(),
                font: args.font.clone(),
                opts: promoreel::RenderOpts::default(),
            }
        }
    };
    if args.seed.is_some() {
        job.opts.seed = args.seed;
    }
    Ok(job)
}

fn load_request(job: &promoreel::RenderJob) -> anyhow::Result<promoreel::RenderRequest> {
    let req = job.load()?;
    if req.font.is_none() {
        tracing::warn!("no font found; hook and watermark text will be skipped");
    }
    Ok(req)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut job = load_job(&args.input)?;
    if args.offline {
        job.opts.clock = promoreel::ClockMode::FixedStep;
    }
    let req = load_request(&job)?;

    let result = promoreel::render_with_ffmpeg(&req, job.opts.clone())?;

    let out = args.out.with_extension(result.extension);
    write_output(&out, &result.bytes)?;
    eprintln!(
        "wrote {} ({}, {} frames, hook \"{}\")",
        out.display(),
        result.mime_type,
        result.stats.frames_composed,
        result.hook
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let job = load_job(&args.input)?;
    let req = load_request(&job)?;

    let session = promoreel::RenderSession::new(job.opts.clone())?;
    let mut decoder = promoreel::FfmpegAudioDecoder::default();
    let frame = session.preview_frame(&req, &mut decoder, args.at)?;

    promoreel::encode::ffmpeg::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plan(args: InputArgs) -> anyhow::Result<()> {
    let job = load_job(&args)?;
    let req = job.load()?;

    let session = promoreel::RenderSession::new(job.opts.clone())?;
    let mut decoder = promoreel::FfmpegAudioDecoder::default();
    let prepared = session.prepare(&req, &mut decoder)?;

    let report = serde_json::json!({
        "duration_secs": prepared.audio.duration_secs(),
        "hook": prepared.hook,
        "timeline": prepared.timeline,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    promoreel::encode::ffmpeg::ensure_parent_dir(path)?;
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}
