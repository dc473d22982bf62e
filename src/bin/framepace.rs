use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use framepace::pattern::DiagnosticOverlay;
use framepace::{
    FramepaceConfig, HeadlessHost, HostOpts, LogicalSize, PatternKind,
    PatternSynthesizer, PixelRatio, PngSnapshotSink, RenderLoop, Surface, SurfaceGeometry,
    SystemClock, VirtualClock,
};

/// Particle physics steps per second of elapsed time when rendering a single frame.
const STEPS_PER_SEC: f64 = 60.0;

#[derive(Parser, Debug)]
#[command(name = "framepace", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single pattern frame as a PNG.
    Frame(FrameArgs),
    /// Run the headless host and log FPS readings.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Pattern to render.
    #[arg(long, default_value_t = PatternKind::Gradient)]
    pattern: PatternKind,

    /// Elapsed time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Logical width.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Logical height.
    #[arg(long, default_value_t = 450.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Seed for particle placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Initial pattern.
    #[arg(long, default_value_t = PatternKind::Gradient)]
    pattern: PatternKind,

    /// Refresh rate in Hz (defaults to the configured target).
    #[arg(long)]
    rate: Option<f64>,

    /// Run length in seconds.
    #[arg(long, default_value_t = 5.0)]
    seconds: f64,

    /// Use a virtual clock instead of sleeping.
    #[arg(long = "virtual")]
    virtual_clock: bool,

    /// Advance to the next pattern every N seconds.
    #[arg(long)]
    cycle: Option<f64>,

    /// Logical width.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Logical height.
    #[arg(long, default_value_t = 450.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Write the last presented frame to this PNG.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Seed for particle placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("framepace=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<FramepaceConfig> {
    match path {
        Some(p) => FramepaceConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(FramepaceConfig::default()),
    }
}

fn geometry(width: f64, height: f64, dpr: f64) -> anyhow::Result<SurfaceGeometry> {
    let ratio = PixelRatio::new(dpr).context("parse --dpr")?;
    Ok(SurfaceGeometry::new(LogicalSize::new(width, height), ratio))
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let geometry = geometry(args.width, args.height, args.dpr)?;
    let t = args.time.max(0.0);

    let mut rng = rng_from(args.seed);
    let mut synth =
        PatternSynthesizer::new(args.pattern, geometry.logical, cfg.particle_count, &mut rng)
            .with_tile_size(cfg.tile_size)?;
    let steps = synth.advance_to(t, STEPS_PER_SEC, geometry.logical);
    tracing::debug!(steps, "particle physics advanced");

    let mut overlay = cfg.overlay.then(|| DiagnosticOverlay::new(cfg.resolve_font()));
    let mut surface = Surface::new(geometry);
    let drawn = surface.render_frame(|painter| {
        synth.draw_still(t, painter)?;
        if let Some(overlay) = overlay.as_mut() {
            overlay.draw(painter, args.pattern, t);
        }
        Ok(())
    })?;
    if !drawn {
        anyhow::bail!(
            "surface {}x{} has no pixels",
            geometry.logical.width,
            geometry.logical.height
        );
    }
    let frame = surface
        .front_frame()
        .context("read back presented frame")?;
    framepace::sink::write_png(&args.out, &frame)
        .with_context(|| format!("write '{}'", args.out.display()))?;

    println!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    if !args.seconds.is_finite() || args.seconds < 0.0 {
        anyhow::bail!("--seconds must be a non-negative number");
    }
    let cycle_every = match args.cycle {
        Some(c) if c.is_finite() && c > 0.0 => Some(Duration::from_secs_f64(c)),
        Some(c) => anyhow::bail!("--cycle must be > 0, got {c}"),
        None => None,
    };

    let render_loop = RenderLoop::new(args.pattern, cfg.render_loop_opts())?
        .with_rng(rng_from(args.seed))
        .with_font(cfg.resolve_font());
    let opts = HostOpts {
        rate_hz: args.rate.unwrap_or(f64::from(cfg.target_fps)),
        duration: Duration::from_secs_f64(args.seconds),
        cycle_every,
        geometry: geometry(args.width, args.height, args.dpr)?,
        ..cfg.host_opts()
    };

    let mut snapshot = args.snapshot.as_ref().map(PngSnapshotSink::new);
    let sink = snapshot
        .as_mut()
        .map(|s| s as &mut dyn framepace::FrameSink);
    let report = if args.virtual_clock {
        HeadlessHost::new(VirtualClock::default(), render_loop, opts)?.run(sink)?
    } else {
        HeadlessHost::new(SystemClock::new(), render_loop, opts)?.run(sink)?
    };

    let json = serde_json::to_string_pretty(&report).context("serialize run report")?;
    println!("{json}");
    Ok(())
}
