use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use printmock::{ClassifierParams, PollConfig, PrintArea};

#[derive(Parser, Debug)]
#[command(name = "printmock", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect the placeholder print area of a template image.
    Detect(DetectArgs),
    /// Composite a design into a template's print area and write a PNG.
    Composite(CompositeArgs),
    /// Render the local preview next to a provider mockup for inspection.
    Compare(CompareArgs),
    /// Submit a generation job to the rendering provider and wait for it.
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Clone, Copy)]
struct ClassifierArgs {
    /// Target placeholder hue in degrees.
    #[arg(long, default_value_t = 300.0)]
    target_hue: f64,

    /// Hue tolerance in degrees (inclusive).
    #[arg(long, default_value_t = 15.0)]
    hue_tolerance: f64,

    /// Minimum saturation in [0,1].
    #[arg(long, default_value_t = 0.4)]
    min_saturation: f64,

    /// Minimum lightness in [0,1].
    #[arg(long, default_value_t = 0.15)]
    min_lightness: f64,
}

impl ClassifierArgs {
    fn to_params(self) -> ClassifierParams {
        ClassifierParams {
            target_hue: self.target_hue,
            hue_tolerance: self.hue_tolerance,
            min_saturation: self.min_saturation,
            min_lightness: self.min_lightness,
        }
    }
}

#[derive(Parser, Debug)]
struct DetectArgs {
    /// Input template image.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    classifier: ClassifierArgs,
}

#[derive(Parser, Debug)]
struct CompositeArgs {
    /// Template image.
    #[arg(long)]
    template: PathBuf,

    /// Design image to place into the print area.
    #[arg(long)]
    design: PathBuf,

    /// Print area as JSON (`{"x":..,"y":..,"width":..,"height":..}`).
    /// When omitted, the area is detected from the template.
    #[arg(long)]
    area: Option<String>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Directory to dump each intermediate stage image into.
    #[arg(long)]
    stages_dir: Option<PathBuf>,

    #[command(flatten)]
    classifier: ClassifierArgs,
}

#[derive(Parser, Debug)]
struct CompareArgs {
    /// Template image.
    #[arg(long)]
    template: PathBuf,

    /// Design image.
    #[arg(long)]
    design: PathBuf,

    /// Authoritative provider mockup to place on the right panel.
    #[arg(long)]
    provider_mockup: Option<PathBuf>,

    /// Output PNG path for the side-by-side raster.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    classifier: ClassifierArgs,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Provider API base URL.
    #[arg(long)]
    base_url: String,

    /// Provider API key.
    #[arg(long)]
    api_key: String,

    /// Variant to render.
    #[arg(long)]
    variant: u64,

    /// Publicly reachable design image URL.
    #[arg(long)]
    design_url: String,

    /// Seconds between polls.
    #[arg(long, default_value_t = 2)]
    interval_secs: u64,

    /// Poll attempt ceiling.
    #[arg(long, default_value_t = 30)]
    max_attempts: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Detect(args) => cmd_detect(args),
        Command::Composite(args) => cmd_composite(args),
        Command::Compare(args) => cmd_compare(args),
        Command::Generate(args) => cmd_generate(args).await,
    }
}

fn read_rgba(path: &Path) -> anyhow::Result<image::RgbaImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    Ok(printmock::assets::decode_rgba(&bytes)?)
}

fn write_png(path: &Path, image: &image::RgbaImage) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
    }
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))
}

fn resolve_area(
    area_json: Option<&str>,
    template: &image::RgbaImage,
    params: &ClassifierParams,
) -> anyhow::Result<PrintArea> {
    match area_json {
        Some(json) => {
            let area: PrintArea =
                serde_json::from_str(json).context("parse --area JSON")?;
            // Re-validate: hand-written JSON can carry out-of-range values.
            Ok(PrintArea::new(area.x, area.y, area.width, area.height)?)
        }
        None => Ok(printmock::detect_print_area(template, params)?),
    }
}

fn cmd_detect(args: DetectArgs) -> anyhow::Result<()> {
    let template = read_rgba(&args.in_path)?;
    let area = printmock::detect_print_area(&template, &args.classifier.to_params())?;
    println!("{}", serde_json::to_string_pretty(&area)?);
    Ok(())
}

fn cmd_composite(args: CompositeArgs) -> anyhow::Result<()> {
    let template = read_rgba(&args.template)?;
    let design = read_rgba(&args.design)?;
    let params = args.classifier.to_params();
    let area = resolve_area(args.area.as_deref(), &template, &params)?;

    let (out, stages) = printmock::compose_mockup(&template, &design, area)?;

    if let Some(dir) = &args.stages_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create stages dir '{}'", dir.display()))?;
        for (i, stage) in stages.iter().enumerate() {
            let Some(image) = &stage.image else { continue };
            let name = stage.name.replace(' ', "_");
            write_png(&dir.join(format!("{:02}_{name}.png", i + 1)), image)?;
        }
    }

    write_png(&args.out, &out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_compare(args: CompareArgs) -> anyhow::Result<()> {
    let template = read_rgba(&args.template)?;
    let design = read_rgba(&args.design)?;
    let params = args.classifier.to_params();
    let area = printmock::detect_print_area(&template, &params)?;

    let provider = args
        .provider_mockup
        .as_deref()
        .map(read_rgba)
        .transpose()?;
    let comparison = printmock::build_comparison(&template, &design, area, provider.as_ref())?;

    for line in comparison.stage_summary() {
        eprintln!("{line}");
    }

    write_png(&args.out, &comparison.side_by_side())?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let provider = printmock::HttpRenderProvider::new(&args.base_url, &args.api_key);
    let cfg = PollConfig {
        interval: std::time::Duration::from_secs(args.interval_secs),
        max_attempts: args.max_attempts,
    };

    let result =
        printmock::pipeline::generate_mockup(&provider, args.variant, &args.design_url, &cfg)
            .await?;

    eprintln!(
        "task {} completed after {} poll(s)",
        result.key, result.polls
    );
    for mockup in &result.mockups {
        println!("{}\t{}", mockup.placement, mockup.url);
    }
    Ok(())
}
