//! Formosa CLI binary.
//!
//! Command-line front-end over the industry pipeline and ranking registry.

use clap::{Parser, Subcommand, ValueEnum};
use formosa::{Engine, IndustryAnalysis, PipelineConfig, PreloadStep};
use formosa_data::{CsvDirectory, RecordSource, coverage, stock_directory};
use formosa_output::{ExportFormat, Exporter, TableView};
use formosa_rules::{Evaluation, RuleCategory, available_rules};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DATA_DIR_ENV: &str = "FORMOSA_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "finmind_data";

#[derive(Parser)]
#[command(name = "formosa")]
#[command(about = "Formosa: Buffett and Feroldi screens for Taiwan equities", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding one <industry>.csv per industry
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List industries with their data coverage
    Industries,

    /// Print the stock directory
    Stocks {
        /// Only stocks listed under this industry
        #[arg(long)]
        industry: Option<String>,
    },

    /// Run the three rule sets over one industry
    Analyze {
        /// Industry name
        industry: String,

        /// Only this rule category (balance, income, cashflow)
        #[arg(long)]
        category: Option<RuleCategory>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Analyze every industry and fill the ranking registry
    Preload {
        /// Re-run industries that are already registered
        #[arg(long)]
        force: bool,
    },

    /// Top ranked stocks of an industry
    Best {
        /// Industry name
        industry: String,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Write an industry's ranking tables to files
    Export {
        /// Industry name
        industry: String,

        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// File format (csv, json, pretty)
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
    },

    /// Describe the available rule sets
    Rules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    // a missing .env file is fine
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let data_dir = resolve_data_dir(cli.data_dir);
    debug!(data_dir = %data_dir.display(), "using data directory");

    match cli.command {
        Commands::Industries => list_industries(&CsvDirectory::new(&data_dir))?,
        Commands::Stocks { industry } => {
            list_stocks(&CsvDirectory::new(&data_dir), industry.as_deref())?;
        }
        Commands::Analyze {
            industry,
            category,
            format,
        } => {
            let engine = Engine::new(CsvDirectory::new(&data_dir), PipelineConfig::default());
            let analysis = engine.analyze(&industry)?;
            print_analysis(&analysis, category, format)?;
        }
        Commands::Preload { force } => {
            let config = PipelineConfig {
                skip_loaded: !force,
                ..Default::default()
            };
            let engine = Engine::new(CsvDirectory::new(&data_dir), config);
            preload(&engine)?;
        }
        Commands::Best { industry, format } => {
            let engine = Engine::new(CsvDirectory::new(&data_dir), PipelineConfig::default());
            let report = engine.best_stock(&industry)?;
            match format {
                OutputFormat::Text => print!("{}", report.to_ascii_table()),
                OutputFormat::Markdown => print!("{}", report.to_markdown()),
                OutputFormat::Json => {
                    println!("{}", report.export_to_string(ExportFormat::PrettyJson)?);
                }
            }
        }
        Commands::Export {
            industry,
            out,
            format,
        } => {
            let engine = Engine::new(CsvDirectory::new(&data_dir), PipelineConfig::default());
            let analysis = engine.analyze(&industry)?;
            export_rankings(&analysis, &out, format)?;
        }
        Commands::Rules => list_rules(),
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "formosa=debug,formosa_bin=debug"
    } else {
        "formosa=info,formosa_bin=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn list_industries(source: &CsvDirectory) -> Result<(), Box<dyn std::error::Error>> {
    let industries = source.industries()?;

    println!("Industries in {}", source.root().display());
    println!("{}\n", "=".repeat(40));

    for industry in &industries {
        let records = source.load(industry)?;
        match coverage(&records) {
            Some(c) => println!(
                "  {:<16} {:>5} stocks  {:>3} periods  {} .. {}  ({} records)",
                industry, c.stocks, c.periods, c.first_period, c.last_period, c.records
            ),
            None => println!("  {:<16} (no records)", industry),
        }
    }
    println!("\nTotal: {} industries", industries.len());

    Ok(())
}

fn list_stocks(
    source: &CsvDirectory,
    industry: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let entries = stock_directory(source)?;
    let mut shown = 0usize;

    for entry in entries
        .iter()
        .filter(|e| industry.is_none_or(|i| e.industry_category == i))
    {
        println!(
            "{:<8} {:<12} {}",
            entry.stock_id, entry.stock_name, entry.industry_category
        );
        shown += 1;
    }
    println!("\n{} stocks", shown);

    Ok(())
}

fn print_analysis(
    analysis: &IndustryAnalysis,
    category: Option<RuleCategory>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let categories: Vec<RuleCategory> =
        category.map_or_else(|| RuleCategory::all().to_vec(), |c| vec![c]);

    if format == OutputFormat::Json {
        let rankings: Vec<_> = categories
            .iter()
            .map(|c| &analysis.evaluation(*c).ranking)
            .collect();
        println!("{}", serde_json::to_string_pretty(&rankings)?);
        return Ok(());
    }

    match format {
        OutputFormat::Markdown => println!("# {}\n", analysis.industry),
        _ => {
            println!("\n{}", analysis.industry);
            println!("{}", "=".repeat(60));
        }
    }
    if let Some(c) = &analysis.coverage {
        println!(
            "Data period: {} to {} ({} stocks, {} records)\n",
            c.first_period, c.last_period, c.stocks, c.records
        );
    }

    for category in categories {
        print_evaluation(analysis.evaluation(category), format);
    }

    Ok(())
}

fn print_evaluation(eval: &Evaluation, format: OutputFormat) {
    let title = eval.category.title();
    let markdown = format == OutputFormat::Markdown;

    if markdown {
        println!("## {}\n", title);
    } else {
        println!("\n{}\n{}", title, "-".repeat(title.len()));
    }

    if eval.pass_rates.is_empty() {
        println!("No periods on or after the cutoff.\n");
        return;
    }

    println!("Pass rates:");
    for rate in &eval.pass_rates {
        println!("  {}", rate.label());
    }
    println!();

    if markdown {
        println!("{}", eval.heatmap.to_markdown());
        println!("{}", eval.ranking.to_markdown());
    } else {
        println!("{}", eval.heatmap.to_ascii_table());
        println!("{}", eval.ranking.to_ascii_table());
    }
}

fn preload(engine: &Engine) -> Result<(), Box<dyn std::error::Error>> {
    let total = engine.source().industries()?.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Preloading rankings...");

    let report = engine.preload_with_progress(|step| {
        let msg = match step {
            PreloadStep::Loaded(industry) => format!("loaded {}", industry),
            PreloadStep::Skipped(industry) => format!("skipped {}", industry),
            PreloadStep::Failed(industry) => format!("failed {}", industry),
        };
        pb.set_message(msg);
        pb.inc(1);
    });

    let report = match report {
        Ok(report) => {
            pb.finish_with_message(format!("Preloaded {} industries", report.loaded.len()));
            report
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(format!("Preload failed: {}", e).into());
        }
    };

    println!("\nLoaded:  {}", report.loaded.len());
    println!("Skipped: {}", report.skipped.len());
    println!("Failed:  {}", report.failed.len());
    for failure in &report.failed {
        println!("  {}: {}", failure.industry, failure.error);
    }
    println!("\nRegistered industries: {}", engine.registry().len());

    Ok(())
}

fn export_rankings(
    analysis: &IndustryAnalysis,
    out: &Path,
    format: ExportFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(out)?;

    for category in RuleCategory::all() {
        let eval = analysis.evaluation(category);
        let stem = format!("{}_{}", analysis.industry, category.key());

        let ranking_path = out.join(format!("{}_ranking.{}", stem, format.extension()));
        eval.ranking.export_to_file(&ranking_path, format)?;

        let heatmap_path = out.join(format!("{}_heatmap.{}", stem, format.extension()));
        eval.heatmap.export_to_file(&heatmap_path, format)?;

        info!(path = %ranking_path.display(), "wrote ranking");
        println!("  ✓ {}", ranking_path.display());
        println!("  ✓ {}", heatmap_path.display());
    }

    Ok(())
}

fn list_rules() {
    println!("Rule sets:");
    println!("==========\n");

    for info in available_rules() {
        println!("{} ({})", info.name, info.category);
        println!("  {}", info.description);
        println!("  requires: {}\n", info.required_columns.join(", "));
    }
}
