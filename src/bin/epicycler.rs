use std::{
    fs::File,
    io::Write as _,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use epicycler::{Coefficient, Config, Loader, Point, TraceEngine, TrailBatcher, TrailSegment};

#[derive(Parser, Debug)]
#[command(name = "epicycler", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the ranked DFT coefficient set from an SVG and write it as JSON.
    Analyze(AnalyzeArgs),
    /// Simulate the epicycle trace and write the batched trail as JSON.
    Trace(TraceArgs),
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Input SVG. When omitted, the built-in heart curve is analyzed.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Harmonic count n (the coefficient set has 2n+1 entries).
    #[arg(long, default_value_t = 400)]
    harmonics: usize,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TraceArgs {
    /// Input SVG. When omitted, the built-in heart curve is traced.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Harmonic count n (the coefficient set has 2n+1 entries).
    #[arg(long, default_value_t = 400)]
    harmonics: usize,

    /// Visual trace speed multiplier.
    #[arg(long, default_value_t = 2.0)]
    speed: f64,

    /// Number of simulated frames.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(serde::Serialize)]
struct AnalyzeReport {
    point_count: usize,
    total_length: f64,
    coefficients: Vec<Coefficient>,
}

#[derive(serde::Serialize)]
struct TraceReport {
    frames: u64,
    time: f64,
    total_recorded: usize,
    final_position: [f64; 2],
    batches: Vec<TrailSegment>,
    #[serde(with = "epicycler::point::as_pairs")]
    active: Vec<Point>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Analyze(args) => cmd_analyze(args),
        Command::Trace(args) => cmd_trace(args),
    }
}

fn cmd_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = Config {
        harmonics: args.harmonics,
        ..Config::default()
    };
    config.validate()?;

    let result = load_with_progress(args.in_path, config)?;

    let report = AnalyzeReport {
        point_count: result.curve.points.len(),
        total_length: result.curve.total_length,
        coefficients: result.coefficients,
    };
    write_json(args.out.as_deref(), &report)?;

    eprintln!(
        "analyzed {} points (length {:.1}) into {} coefficients",
        report.point_count,
        report.total_length,
        report.coefficients.len()
    );
    Ok(())
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    let config = Config {
        harmonics: args.harmonics,
        ..Config::default()
    };
    config.validate()?;

    let result = load_with_progress(args.in_path, config.clone())?;
    let batch_size = config.batch_size(result.curve.total_length);
    let mut trail = TrailBatcher::new(batch_size);
    let mut engine = TraceEngine::new(result.coefficients, result.curve.total_length, &config);

    let mut head = Point::new(0.0, 0.0);
    for _ in 0..args.frames {
        head = engine.advance_frame(args.speed, &mut trail);
    }

    let report = TraceReport {
        frames: args.frames,
        time: engine.time(),
        total_recorded: trail.total_recorded(),
        final_position: [head.re, head.im],
        batches: trail.batches().to_vec(),
        active: trail.active_points().to_vec(),
    };
    write_json(args.out.as_deref(), &report)?;

    eprintln!(
        "traced {} frames: {} points in {} closed batches (+{} active)",
        report.frames,
        report.total_recorded,
        report.batches.len(),
        report.active.len()
    );
    Ok(())
}

fn load_with_progress(
    input: Option<PathBuf>,
    config: Config,
) -> anyhow::Result<epicycler::LoadResult> {
    let mut loader = Loader::spawn(input, config);
    let mut last_pct = u32::MAX;
    loop {
        if let Some(result) = loader.try_take().context("background load failed")? {
            eprintln!("\rloading 100%");
            return Ok(result);
        }
        let pct = (loader.progress() * 100.0) as u32;
        if pct != last_pct {
            eprint!("\rloading {pct:3}%");
            let _ = std::io::stderr().flush();
            last_pct = pct;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

fn write_json<T: serde::Serialize>(out: Option<&Path>, value: &T) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(path)
                .with_context(|| format!("create output '{}'", path.display()))?;
            serde_json::to_writer_pretty(f, value)
                .with_context(|| format!("write json '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            serde_json::to_writer_pretty(std::io::stdout().lock(), value)
                .context("write json to stdout")?;
            println!();
        }
    }
    Ok(())
}
