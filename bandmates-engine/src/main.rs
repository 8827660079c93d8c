//! bandmates - command-line front end for the group formation engine
//!
//! Subcommands:
//! - `form`: build profiles, form groups, write CSV or JSON
//! - `twins`: most compatible respondents for one email
//! - `stats`: cohort statistics as JSON

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use bandmates_common::config::{clamp_group_size, ConfigResolver, TomlConfig};
use bandmates_engine::{
    export, form_groups, load_records, CohortStats, CompatibilityMatrix, ProfileBuilder, RawRecord,
    RespondentProfile,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for bandmates
#[derive(Parser, Debug)]
#[command(name = "bandmates")]
#[command(about = "Form music-compatibility groups from survey responses")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "BANDMATES_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Form groups and export them
    Form {
        /// JSON array of survey records
        #[arg(short, long, env = "BANDMATES_INPUT")]
        input: PathBuf,

        /// Preferred group size, clamped to 3-8
        #[arg(short, long, env = "BANDMATES_GROUP_SIZE")]
        group_size: Option<usize>,

        /// Seed for reproducible group names
        #[arg(long, env = "BANDMATES_SEED")]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv", env = "BANDMATES_FORMAT")]
        format: OutputFormat,

        /// Output file (stdout when omitted)
        #[arg(short, long, env = "BANDMATES_OUTPUT")]
        output: Option<PathBuf>,
    },

    /// List a respondent's music twins
    Twins {
        /// JSON array of survey records
        #[arg(short, long, env = "BANDMATES_INPUT")]
        input: PathBuf,

        /// Respondent email
        #[arg(short, long)]
        email: String,

        /// Maximum number of twins
        #[arg(short, long, default_value = "5")]
        top: usize,

        /// Minimum compatibility to count as a twin
        #[arg(short, long, default_value = "0.7")]
        min_similarity: f64,
    },

    /// Print cohort statistics
    Stats {
        /// JSON array of survey records
        #[arg(short, long, env = "BANDMATES_INPUT")]
        input: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Serialize)]
struct Twin<'a> {
    name: &'a str,
    email: &'a str,
    compatibility: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Config first so its log level can seed the filter
    let config = ConfigResolver::new(args.config.clone())
        .load()
        .context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match args.command {
        Command::Form {
            input,
            group_size,
            seed,
            format,
            output,
        } => run_form(&config, &input, group_size, seed, format, output.as_deref()),
        Command::Twins {
            input,
            email,
            top,
            min_similarity,
        } => run_twins(&config, &input, &email, top, min_similarity),
        Command::Stats { input } => {
            let profiles = ProfileBuilder::new().build_cohort(&read_records(&input)?);
            write_json(&CohortStats::compute(&profiles), None)
        }
    }
}

fn run_form(
    config: &TomlConfig,
    input: &Path,
    group_size: Option<usize>,
    seed: Option<u64>,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let records = read_records(input)?;
    let target_size = match group_size {
        Some(requested) => clamp_group_size(requested),
        None => config.effective_group_size(None),
    };

    let groups = form_groups(&records, &config.engine, target_size, seed.or(config.seed));

    match format {
        OutputFormat::Csv => {
            let sink = open_output(output)?;
            export::write_table(&groups, sink).context("Failed to export groups")?;
        }
        OutputFormat::Json => write_json(&groups, output)?,
    }

    if let Some(path) = output {
        info!("Wrote {} groups to {}", groups.len(), path.display());
    }
    Ok(())
}

fn run_twins(
    config: &TomlConfig,
    input: &Path,
    email: &str,
    top: usize,
    min_similarity: f64,
) -> Result<()> {
    let profiles = ProfileBuilder::new().build_cohort(&read_records(input)?);
    let matrix = CompatibilityMatrix::score(&profiles, &config.engine);

    let id = email.trim().to_lowercase();
    let index = matrix
        .position(&id)
        .ok_or_else(|| anyhow!("No respondent with email {}", email))?;

    let twins: Vec<Twin> = matrix
        .find_twins(index, top, min_similarity)
        .into_iter()
        .map(|(j, compatibility)| twin(&profiles[j], compatibility))
        .collect();
    write_json(&twins, None)
}

fn twin(profile: &RespondentProfile, compatibility: f64) -> Twin<'_> {
    Twin {
        name: &profile.name,
        email: &profile.email,
        compatibility,
    }
}

fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let records = load_records(BufReader::new(file))
        .with_context(|| format!("Failed to parse records from {}", path.display()))?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    })
}

fn write_json<T: Serialize + ?Sized>(value: &T, output: Option<&Path>) -> Result<()> {
    let mut sink = open_output(output)?;
    serde_json::to_writer_pretty(&mut sink, value).context("Failed to serialize output")?;
    writeln!(sink)?;
    Ok(())
}
