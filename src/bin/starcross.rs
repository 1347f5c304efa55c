use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use starcross::{
    CpuSurface, CpuSurfaceOpts, DEFAULT_RECORDING_NAME, Ease, FfmpegSink, FfmpegSinkOpts,
    FixedAdvanceMeasure, Fps, FrameQueue, PairingPolicy, ParleyMeasure, PlaybackOptions, Recorder,
    RevealPolicy, SceneRenderer, Speed, TextMeasure, TextShaper, VisualConfig, Visualization,
    clean_extracted_text, load_text, record_playback, render_scene,
};

#[derive(Parser, Debug)]
#[command(name = "starcross", version)]
struct Cli {
    /// Log at DEBUG level.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print layout, marker and connection counts.
    Info(InfoArgs),
    /// Render a single moment of playback as a PNG.
    Frame(FrameArgs),
    /// Record the whole animation to a video (requires `ffmpeg` on PATH).
    Record(RecordArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Source text file, or `-` for stdin.
    #[arg(long)]
    text: PathBuf,

    /// TTF/OTF font used to measure and draw words. Without it words are measured with a fixed
    /// advance and not drawn.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Strip page-number lines and extra blank lines left by PDF extraction.
    #[arg(long, default_value_t = false)]
    clean: bool,

    /// Playback speed.
    #[arg(long, value_enum, default_value_t = Speed::Normal)]
    speed: Speed,

    /// Reveal order.
    #[arg(long, value_enum, default_value_t = RevealPolicy::Random)]
    story: RevealPolicy,

    /// How Romeo and Juliet occurrences are paired.
    #[arg(long, value_enum, default_value_t = PairingPolicy::Cross)]
    pairing: PairingPolicy,

    /// Reveal easing.
    #[arg(long, value_enum, default_value_t = Ease::Linear)]
    ease: Ease,

    /// Shuffle seed for the random story.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct InfoArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Print the summary as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Playback time in ms; defaults to the end of the run.
    #[arg(long)]
    at_ms: Option<f64>,

    /// Device pixels per canvas pixel.
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RecordArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output video path; `.webm` selects VP9, anything else H.264 MP4.
    #[arg(long, default_value = DEFAULT_RECORDING_NAME)]
    out: PathBuf,

    /// Capture rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Device pixels per canvas pixel.
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f64,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Record(args) => cmd_record(args),
    }
}

struct Loaded {
    vis: Visualization,
    font_bytes: Option<Vec<u8>>,
}

fn load(input: &InputArgs) -> anyhow::Result<Loaded> {
    let mut text = load_text(&input.text)?;
    if input.clean {
        text = clean_extracted_text(&text);
    }

    let font_bytes = match &input.font {
        Some(path) => Some(
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?,
        ),
        None => None,
    };
    let mut measure: Box<dyn TextMeasure> = match &font_bytes {
        Some(bytes) => Box::new(ParleyMeasure::new(TextShaper::from_font_bytes(
            bytes.clone(),
        )?)),
        None => Box::new(FixedAdvanceMeasure::default()),
    };

    let options = PlaybackOptions {
        speed: input.speed,
        story: input.story,
        pairing: input.pairing,
        ease: input.ease,
        seed: input.seed,
    };
    let vis = Visualization::new(&text, VisualConfig::default(), options, measure.as_mut())?;
    if let Some(notice) = vis.notice() {
        tracing::warn!(%notice, "nothing to connect");
    }
    Ok(Loaded { vis, font_bytes })
}

fn surface_for(
    vis: &Visualization,
    font_bytes: Option<Vec<u8>>,
    pixel_ratio: f64,
) -> anyhow::Result<CpuSurface> {
    let shaper = font_bytes.map(TextShaper::from_font_bytes).transpose()?;
    let opts = CpuSurfaceOpts::new(vis.config().canvas).with_pixel_ratio(pixel_ratio);
    Ok(CpuSurface::new(opts, shaper)?)
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let Loaded { vis, .. } = load(&args.input)?;
    let summary = vis.summary();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!("{summary}");
    println!(
        "{} tokens in {} rows, scale {:.4}, seed {}",
        summary.tokens, summary.rows, summary.content_scale, summary.seed
    );
    if let Some(notice) = &summary.notice {
        println!("note: {notice}");
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let Loaded { mut vis, font_bytes } = load(&args.input)?;
    let at_ms = args.at_ms.unwrap_or(vis.playback().duration_ms).max(0.0);

    let mut frames = FrameQueue::new();
    if vis.start(0.0, &mut frames) {
        for id in frames.take_due() {
            vis.on_frame(id, at_ms, &mut frames);
        }
        vis.pause(&mut frames);
    }

    let mut surface = surface_for(&vis, font_bytes, args.pixel_ratio)?;
    render_scene(&mut surface, &vis.scene(), vis.config())?;
    let frame = surface.snapshot()?;
    frame.save_png(&args.out, vis.config().background)?;

    eprintln!("{}", vis.status(at_ms));
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_record(args: RecordArgs) -> anyhow::Result<()> {
    let Loaded { mut vis, font_bytes } = load(&args.input)?;
    let fps = Fps::new(args.fps, 1)?;
    let surface = surface_for(&vis, font_bytes, args.pixel_ratio)?;
    let mut renderer = SceneRenderer::new(surface, vis.config().clone());

    let sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: !args.no_overwrite,
        background: vis.config().background,
    });
    let mut recorder = Recorder::new();
    let stats = record_playback(&mut vis, &mut renderer, &mut recorder, Box::new(sink), fps)?;

    eprintln!("{}", vis.status(stats.duration_ms));
    eprintln!(
        "wrote {} ({} frames, {:.1}s)",
        args.out.display(),
        stats.frames,
        stats.duration_ms / 1000.0
    );
    Ok(())
}
