use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "circle-maze", version)]
struct Cli {
    /// Log to stderr; repeat for more detail (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a maze and write it as SVG.
    Svg(GenerateArgs),
    /// Generate a maze and write it as JSON.
    Json(GenerateArgs),
    /// Render a previously written JSON maze as SVG.
    Load(LoadArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of rings, 3 to 20.
    #[arg(long, allow_negative_numbers = true)]
    rings: i64,

    /// Seed for reproducible output; random when absent.
    #[arg(long)]
    seed: Option<u64>,

    /// Generation options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path; stdout when absent.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// Input maze JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Generation options JSON (only the render section is used).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output SVG path; stdout when absent.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Svg(args) => cmd_generate(args, Format::Svg),
        Command::Json(args) => cmd_generate(args, Format::Json),
        Command::Load(args) => cmd_load(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Clone, Copy, Debug)]
enum Format {
    Svg,
    Json,
}

fn read_opts(path: Option<&Path>) -> anyhow::Result<circle_maze::GenerateOpts> {
    let Some(path) = path else {
        return Ok(circle_maze::GenerateOpts::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    circle_maze::GenerateOpts::from_json_str(&text)
        .with_context(|| format!("parse config '{}'", path.display()))
}

fn cmd_generate(args: GenerateArgs, format: Format) -> anyhow::Result<()> {
    let opts = read_opts(args.config.as_deref())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let generated = circle_maze::generate_with_seed(args.rings, seed, &opts)?;
    tracing::info!(rings = args.rings, seed, exit = %generated.maze.exit(), "generated maze");

    let text = match format {
        Format::Svg => generated.to_svg(&opts.render)?,
        Format::Json => generated.to_json()?,
    };
    write_output(args.out.as_deref(), &text)
}

fn cmd_load(args: LoadArgs) -> anyhow::Result<()> {
    let opts = read_opts(args.config.as_deref())?;
    let json = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read maze '{}'", args.in_path.display()))?;
    let svg = circle_maze::load_maze_svg_with(&json, &opts.render)
        .with_context(|| format!("load maze '{}'", args.in_path.display()))?;
    write_output(args.out.as_deref(), &svg)
}

fn write_output(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    let Some(path) = out else {
        print!("{text}");
        return Ok(());
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
