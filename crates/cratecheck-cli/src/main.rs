//! cratecheck CLI: command-line interface for crate quality inspection.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use cratecheck::{Analyzer, FaultIcon, InspectionConfig};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "cratecheck")]
#[command(about = "Inspect bottle crates: segment slots, match mouth circles, annotate the verdict")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect one crate image.
    Inspect(CliInspectArgs),

    /// Print the configured template and its detected circle.
    TemplateInfo(CliSettingsArgs),
}

#[derive(Debug, Clone, Args)]
struct CliSettingsArgs {
    /// Path to the settings file (JSON). The template path it names is
    /// resolved against the working directory.
    #[arg(long, default_value = "config/settings.json")]
    settings: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct CliInspectArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    #[command(flatten)]
    settings: CliSettingsArgs,

    /// Path to write the annotated image.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Path to write the per-slot quality report (JSON).
    #[arg(long)]
    report: Option<PathBuf>,

    /// Image stamped over faulty slots (a built-in icon is used otherwise).
    #[arg(long)]
    fault_icon: Option<PathBuf>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect(args) => run_inspect(&args),
        Commands::TemplateInfo(args) => run_template_info(&args),
    }
}

fn load_analyzer(args: &CliSettingsArgs) -> CliResult<Analyzer> {
    tracing::info!("Loading settings: {}", args.settings.display());
    let config = InspectionConfig::from_json_file(&args.settings)?;
    Ok(Analyzer::from_config(config)?)
}

// ── template-info ──────────────────────────────────────────────────────

fn run_template_info(args: &CliSettingsArgs) -> CliResult<()> {
    let analyzer = load_analyzer(args)?;
    let config = analyzer.config();
    let template = analyzer.template();
    let (w, h) = template.dimensions();

    println!("cratecheck template");
    println!("  path:           {}", config.template.path.display());
    println!("  normalized to:  {}x{}", w, h);
    println!(
        "  radius bounds:  {}..={} px",
        config.circle.min_radius, config.circle.max_radius
    );
    match template.circle() {
        Some(c) => println!("  circle:         ({}, {}) r={}", c.x, c.y, c.r),
        None => println!("  circle:         none (every slot will be FAULTY)"),
    }

    Ok(())
}

// ── inspect ────────────────────────────────────────────────────────────

fn run_inspect(args: &CliInspectArgs) -> CliResult<()> {
    let mut analyzer = load_analyzer(&args.settings)?;
    if let Some(icon_path) = &args.fault_icon {
        analyzer = analyzer.with_fault_icon(FaultIcon::from_path(icon_path)?);
    }

    tracing::info!("Loading image: {}", args.image.display());
    let img = image::open(&args.image).map_err(|e| -> CliError {
        format!("Failed to open image {}: {}", args.image.display(), e).into()
    })?;
    tracing::info!("Image size: {}x{}", img.width(), img.height());

    let inspection = analyzer.inspect_detailed(&img)?;
    println!("Crate quality: {}", inspection.verdict);
    tracing::info!(
        "{}/{} slots faulty",
        inspection.report.n_faulty(),
        inspection.report.len()
    );

    if let Some(out) = &args.out {
        inspection.annotated.save(out)?;
        tracing::info!("Annotated image written to {}", out.display());
    }

    if let Some(report_path) = &args.report {
        let json = serde_json::to_string_pretty(&inspection.report)?;
        std::fs::write(report_path, &json)?;
        tracing::info!("Report written to {}", report_path.display());
    }

    Ok(())
}
