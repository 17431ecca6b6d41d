use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "mdl-anim", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a script: render its frames and assemble the animation.
    Render(RenderArgs),
    /// Run both analysis passes and print the schedule without rendering.
    Check(CheckArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Gif,
    Mp4,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory animation frames are written to (overrides the script).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Animation container.
    #[arg(long, value_enum, default_value_t = Format::Gif)]
    format: Format,

    /// Playback rate of the assembled animation.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Screen width in pixels (overrides the script).
    #[arg(long)]
    width: Option<u32>,

    /// Screen height in pixels (overrides the script).
    #[arg(long)]
    height: Option<u32>,

    /// Sphere/torus subdivisions (overrides the script).
    #[arg(long)]
    step: Option<u32>,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Print every frame's knob values to stderr.
    #[arg(long, default_value_t = false)]
    dump_knobs: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn load(path: &std::path::Path) -> anyhow::Result<mdl_anim::Program> {
    mdl_anim::Program::from_path(path).with_context(|| format!("load script '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let program = load(&args.in_path)?;

    let mut settings = program.settings().cloned().unwrap_or_default();
    if let Some(out_dir) = args.out_dir {
        settings.out_dir = out_dir;
    }
    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(height) = args.height {
        settings.height = height;
    }
    if let Some(step) = args.step {
        settings.step = step;
    }

    let threading = mdl_anim::RenderThreading {
        parallel: args.parallel,
        threads: args.threads,
    };
    let mut sink = mdl_anim::FileSink::new(mdl_anim::AssembleConfig {
        format: match args.format {
            Format::Gif => mdl_anim::AssembleFormat::Gif,
            Format::Mp4 => mdl_anim::AssembleFormat::Mp4,
        },
        fps: args.fps,
        out_dir: None,
    });

    let report = mdl_anim::render_program_with(&program, settings, &threading, &mut sink)
        .with_context(|| format!("render '{}'", args.in_path.display()))?;

    for w in &report.config.warnings {
        eprintln!("warning: {w}");
    }
    if args.dump_knobs {
        for frame in &report.frames {
            let knobs: Vec<String> = frame
                .knobs
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            eprintln!("frame {:>4}: {}", frame.index.0, knobs.join(" "));
        }
    }
    for path in report.frame_files() {
        eprintln!("wrote {}", path.display());
    }
    if let Some(out) = sink.assembled() {
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let program = load(&args.in_path)?;
    let plan = mdl_anim::build_plan(&program)
        .with_context(|| format!("check '{}'", args.in_path.display()))?;

    for w in &plan.config.warnings {
        eprintln!("warning: {w}");
    }
    println!("frames: {}", plan.config.num_frames);
    println!("basename: {}", plan.config.basename);
    if let Some(timeline) = &plan.timeline {
        for (f, knobs) in timeline.iter().enumerate() {
            let knobs: Vec<String> = knobs
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            println!("frame {f:>4}: {}", knobs.join(" "));
        }
    }
    Ok(())
}
