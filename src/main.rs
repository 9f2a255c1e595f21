/*!
# RESYS CLI

Command-line interface for the RESYS refactoring recommender.
*/

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use resys::catalog::RefactoringCatalog;
use resys::cli_common::{self, CommonArgs, ConfigArgs, OutputFormat, OutputWriter};
use resys::config::ResysConfig;
use resys::service::{ExportOutcome, RecommendationOutcome, ResysService, VERSION};
use resys::smells::SmellKind;

#[derive(Parser)]
#[command(
    name = "resys",
    version = env!("CARGO_PKG_VERSION"),
    author = "RESYS Team",
    about = "Recommends refactorings for code smells mined into OCEAN ontologies"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the service version
    Version,

    /// List the smells refactorings can be recommended for
    Smells,

    /// Print the refactoring catalog loaded from osore.owl
    Catalog,

    /// Recommend refactorings for an uploaded OCEAN ontology
    Recommend {
        /// File name of the ontology in ontologies.input_path
        ocean: String,

        /// Correlation dataset in datasets.input_path
        #[arg(long, requires = "min_correlation")]
        dataset: Option<String>,

        /// Minimum effort correlation of the commits to keep
        #[arg(long, requires = "dataset")]
        min_correlation: Option<f64>,
    },

    /// Export CSV reports from an augmented ontology
    Export {
        #[command(subcommand)]
        report: ExportCommands,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ExportCommands {
    /// Smells of one kind per committer, newest first
    Committers {
        /// File name of the ontology in ontologies.output_path
        ocean: String,

        /// Smell kind to report
        #[arg(long, default_value = "LongMethod")]
        smell: String,
    },

    /// Monthly incidence of recommended refactorings
    Incidence { ocean: String },

    /// Monthly incidence of effort-contextualized recommendations
    EffortIncidence { ocean: String },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write an example configuration file
    Init {
        #[arg(default_value = "resys.toml")]
        output: PathBuf,
    },

    /// Check that configured directories exist
    Validate,
}

#[derive(Serialize)]
struct VersionInfo {
    version: &'static str,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    cli_common::init_logging_with_level(cli.common.log_level())?;

    if let Err(e) = run(cli) {
        cli_common::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut out = OutputWriter::stdout(cli.common.format);

    match cli.command {
        Commands::Version => out.write_object(&VersionInfo { version: VERSION })?,
        Commands::Smells => {
            let smells = SmellKind::all_labels();
            match out.format() {
                OutputFormat::Json => out.write_object(&smells)?,
                OutputFormat::Text => {
                    out.write_header("Smells")?;
                    for smell in smells {
                        out.write_list_item(smell)?;
                    }
                }
            }
        }
        Commands::Catalog => {
            let config = load_config(&cli.config)?;
            let catalog = RefactoringCatalog::load(&config.osore_file())
                .with_context(|| format!("Failed to load {}", config.osore_file().display()))?;
            print_catalog(&mut out, &catalog)?;
        }
        Commands::Recommend {
            ocean,
            dataset,
            min_correlation,
        } => {
            let service = create_service(&cli.config)?;
            let outcome = match (dataset, min_correlation) {
                (Some(dataset), Some(min)) => service
                    .recommend_by_effort_correlation(&ocean, &dataset, min)
                    .with_context(|| format!("Recommendation by effort failed for {}", ocean))?,
                _ => service
                    .recommend(&ocean)
                    .with_context(|| format!("Recommendation failed for {}", ocean))?,
            };
            print_recommendation(&mut out, &outcome)?;
        }
        Commands::Export { report } => {
            let config = load_config(&cli.config)?;
            cli_common::ensure_dir_exists(&config.datasets.output_path)?;
            let service = ResysService::with_catalog(config, Arc::new(RefactoringCatalog::default()));

            let outcome = match report {
                ExportCommands::Committers { ocean, smell } => {
                    let kind = parse_smell(&smell)?;
                    service.export_refactorings_by_committers_of(&ocean, kind)
                }
                ExportCommands::Incidence { ocean } => service.export_incidence_of_refactorings(&ocean),
                ExportCommands::EffortIncidence { ocean } => {
                    service.export_effort_contextualized_incidence(&ocean)
                }
            }
            .context("Export failed")?;
            print_export(&mut out, &outcome)?;
        }
        Commands::Config { command } => match command {
            ConfigCommands::Init { output } => {
                ResysConfig::create_example_config(&output)?;
                cli_common::print_success(&format!("Configuration written to {}", output.display()));
            }
            ConfigCommands::Validate => {
                let config = load_config(&cli.config)?;
                let warnings = config.validate()?;
                if warnings.is_empty() {
                    cli_common::print_success("Configuration is valid");
                }
                for warning in &warnings {
                    cli_common::print_warning(warning);
                }
            }
        },
    }

    out.flush()
}

fn load_config(args: &ConfigArgs) -> Result<ResysConfig> {
    args.validate().map_err(|e| anyhow::anyhow!(e))?;

    let config = match (&args.config, &args.base_dir) {
        (Some(path), _) => ResysConfig::load(path)?,
        (None, Some(base)) => ResysConfig::with_base_dir(base),
        (None, None) => ResysConfig::default(),
    };
    info!("Ontologies input: {}", config.ontologies.input_path.display());
    Ok(config)
}

fn create_service(args: &ConfigArgs) -> Result<ResysService> {
    let config = load_config(args)?;
    cli_common::validate_path(&config.ontologies.input_path, "Ontologies input directory")?;
    ResysService::new(config).context("Failed to start RESYS service")
}

fn parse_smell(label: &str) -> Result<SmellKind> {
    SmellKind::KNOWN
        .iter()
        .copied()
        .find(|kind| {
            kind.onto_type().eq_ignore_ascii_case(label) || kind.label().eq_ignore_ascii_case(label)
        })
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown smell: {}. Must be one of: {}",
                label,
                SmellKind::all_labels().join(", ")
            )
        })
}

fn print_catalog(out: &mut OutputWriter, catalog: &RefactoringCatalog) -> Result<()> {
    let rows: Vec<Vec<String>> = catalog
        .acronyms_by_smell()
        .into_iter()
        .map(|(kind, acronyms)| vec![kind.label().to_string(), acronyms.join(", ")])
        .collect();

    if out.format() == OutputFormat::Text {
        out.write_header(&format!("Refactoring catalog ({} pairs)", catalog.len()))?;
    }
    out.write_table(&["smell", "refactorings"], rows)
}

fn print_recommendation(out: &mut OutputWriter, outcome: &RecommendationOutcome) -> Result<()> {
    match out.format() {
        OutputFormat::Json => out.write_object(outcome),
        OutputFormat::Text => {
            cli_common::print_success(&format!(
                "{} refactorings recommended in {}",
                outcome.refactorings,
                cli_common::format_millis(outcome.millis)
            ));
            cli_common::print_info(&format!("Ontology: {}", outcome.onto));
            cli_common::print_info(&format!("Package: {}", outcome.zip));
            Ok(())
        }
    }
}

fn print_export(out: &mut OutputWriter, outcome: &ExportOutcome) -> Result<()> {
    match out.format() {
        OutputFormat::Json => out.write_object(outcome),
        OutputFormat::Text => {
            cli_common::print_success(&format!(
                "Exported {} in {}",
                outcome.csv,
                cli_common::format_millis(outcome.millis)
            ));
            Ok(())
        }
    }
}
