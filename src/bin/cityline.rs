use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;

use cityline::{
    ChartLayout, CurveSet, ReduceData, Renderer, RevealMode, YearAxis, aggregate_features,
    load_features,
};

#[derive(Parser, Debug)]
#[command(name = "cityline", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one frame of the buildout chart as draw-command JSON.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input feature file (JSON array of land-use records).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based; the loop is 3600 frames).
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Seed for cohort jitter and curve noise.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Reveal mode for the animated curves.
    #[arg(long, value_enum, default_value_t = RevealChoice::ArcLength)]
    reveal: RevealChoice,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RevealChoice {
    ArcLength,
    SpanX,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is reserved for the draw-command JSON.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let features = load_features(&args.in_path)?;

    let axis = YearAxis::chart();
    let layout = ChartLayout::default();
    let mode = match args.reveal {
        RevealChoice::ArcLength => RevealMode::ByArcLength,
        RevealChoice::SpanX => RevealMode::BySpanX,
    };

    let totals = aggregate_features(&features, &axis);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let data = ReduceData::from_totals(&totals, &mut rng);
    let curves = CurveSet::build(&data, &layout, &axis, &mut rng);

    let mut renderer = Renderer::new(layout, axis, mode);
    renderer.install(curves);
    let cmds = renderer.render_frame(args.frame);

    let json = serde_json::to_string_pretty(&cmds).context("serialize draw commands")?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
