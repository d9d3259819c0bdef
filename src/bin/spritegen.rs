use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "spritegen", version)]
struct Cli {
    /// Backend base URL (defaults to $SPRITEGEN_BACKEND_URL or http://localhost:8188).
    #[arg(long, global = true)]
    url: Option<String>,

    /// Per-frame completion timeout in seconds (defaults to $SPRITEGEN_TIMEOUT_SECS or 120).
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether the backend answers.
    Probe,
    /// Generate walk cycles for the demo entities.
    Generate(GenerateArgs),
    /// Pack a directory of PNG frames into a sprite sheet.
    Pack(PackArgs),
    /// Score the consistency of a directory of PNG frames.
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Output root; one directory per entity.
    #[arg(long, env = "SPRITEGEN_OUT_DIR", default_value = "output")]
    out: PathBuf,

    /// Entity to generate (repeatable). Defaults to all demo entities.
    #[arg(long = "entity")]
    entities: Vec<String>,

    /// Resolution requested from the backend.
    #[arg(long, default_value = "128x128")]
    source_size: spritegen::SpriteSize,

    /// Size frames are normalized to.
    #[arg(long, default_value = "32x32")]
    sprite_size: spritegen::SpriteSize,

    /// Checkpoint to load on the backend.
    #[arg(long)]
    checkpoint: Option<String>,

    /// Sampling steps.
    #[arg(long)]
    steps: Option<u32>,
}

#[derive(Parser, Debug)]
struct PackArgs {
    /// Directory holding the frames, sorted by file name.
    #[arg(long)]
    frames: PathBuf,

    /// Entity name; also the output subdirectory.
    #[arg(long)]
    entity: String,

    /// Animation name in the metadata.
    #[arg(long, default_value = "walk")]
    animation: String,

    /// Output root.
    #[arg(long, default_value = "output")]
    out: PathBuf,

    /// Per-frame display duration in milliseconds.
    #[arg(long, default_value_t = spritegen::sprite::pack::DEFAULT_FRAME_DURATION_MS)]
    duration_ms: u32,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Directory holding the frames, sorted by file name.
    #[arg(long)]
    frames: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Probe => cmd_probe(&client_config(&cli.url, cli.timeout_secs)?).await,
        Command::Generate(ref args) => {
            cmd_generate(&client_config(&cli.url, cli.timeout_secs)?, args).await
        }
        Command::Pack(args) => cmd_pack(args),
        Command::Validate(args) => cmd_validate(args),
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("spritegen=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn client_config(
    url: &Option<String>,
    timeout_secs: Option<u64>,
) -> anyhow::Result<spritegen::ClientConfig> {
    let mut cfg = spritegen::ClientConfig::from_env()?;
    if let Some(url) = url {
        cfg.base_url = url.clone();
    }
    if let Some(secs) = timeout_secs {
        cfg = cfg.with_completion_timeout(Duration::from_secs(secs));
    }
    cfg.validate()?;
    Ok(cfg)
}

async fn cmd_probe(cfg: &spritegen::ClientConfig) -> anyhow::Result<()> {
    let client = spritegen::JobClient::connect(cfg.clone())?;
    if !client.is_available().await {
        anyhow::bail!("backend at {} is not available", cfg.base_url);
    }
    println!("backend at {} is available", cfg.base_url);
    Ok(())
}

async fn cmd_generate(cfg: &spritegen::ClientConfig, args: &GenerateArgs) -> anyhow::Result<()> {
    let mut sampler = spritegen::SamplerSettings::default();
    if let Some(checkpoint) = &args.checkpoint {
        sampler.checkpoint = checkpoint.clone();
    }
    if let Some(steps) = args.steps {
        sampler.steps = steps;
    }
    sampler.validate()?;

    let settings = spritegen::GenerationSettings {
        source_width: args.source_size.w,
        source_height: args.source_size.h,
        sprite_size: args.sprite_size,
        ..spritegen::GenerationSettings::default()
    };
    settings.validate()?;

    let entities = if args.entities.is_empty() {
        spritegen::demo_entities()
    } else {
        spritegen::generation::presets::select_entities(&args.entities)?
    };

    let client = spritegen::JobClient::connect(cfg.clone())?
        .with_builder(spritegen::WorkflowBuilder::new(sampler))
        .with_observer(Arc::new(spritegen::TracingObserver));

    tracing::info!(url = %cfg.base_url, "connecting to backend");
    if !client.is_available().await {
        anyhow::bail!(
            "backend at {} is not available; start it and retry",
            cfg.base_url
        );
    }

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;
    let store = spritegen::SpriteStore::new(&args.out);
    let summary = spritegen::generate_entities(
        &client,
        &store,
        &entities,
        &spritegen::AnimationSpec::walk(),
        &settings,
    )
    .await;

    eprintln!(
        "{}/{} entities generated, {} frames in {:.1}s (avg {:.1}s per frame)",
        summary.reports.len(),
        summary.attempted(),
        summary.total_frames(),
        summary.elapsed.as_secs_f64(),
        summary.avg_frame_time().as_secs_f64(),
    );
    for report in &summary.reports {
        let v = &report.validation;
        eprintln!(
            "  {}: {} (similarity {:.0}%)",
            report.entity,
            if v.passes { "PASS" } else { "FAIL" },
            v.visual_similarity * 100.0
        );
    }
    for failure in &summary.failures {
        eprintln!("  {}: ERROR {}", failure.entity, failure.error);
    }
    eprintln!("output in {}", args.out.display());

    if !summary.failures.is_empty() {
        anyhow::bail!("{} entities failed", summary.failures.len());
    }
    Ok(())
}

fn cmd_pack(args: PackArgs) -> anyhow::Result<()> {
    let frames = spritegen::load_frames_from_dir(&args.frames)?;
    let packer = spritegen::SheetPacker::with_frame_duration(args.duration_ms);
    let (sheet, metadata) = packer.pack(&frames, &args.entity, &args.animation)?;

    let store = spritegen::SpriteStore::new(&args.out);
    let (sheet_path, metadata_path) = store.save_sprite_sheet(&args.entity, &sheet, &metadata)?;
    eprintln!("wrote {}", sheet_path.display());
    eprintln!("wrote {}", metadata_path.display());
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let frames = spritegen::load_frames_from_dir(&args.frames)?;
    let result = spritegen::validate_frames(&frames)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
