//! cooc - Entity co-occurrence matrix CLI
//!
//! Command-line interface for building cleaned co-occurrence matrices from
//! pairwise entity count tables.

use clap::{Parser, Subcommand};
use cooc_matrix::data::TripleTable;
use cooc_matrix::error::Result;
use cooc_matrix::pipeline::{Pipeline, PipelineConfig};
use cooc_matrix::pivot::{pivot_cooccurrence, PivotOptions};
use cooc_matrix::profile::{profile_frequencies, profile_sparsity};
use std::path::PathBuf;

/// Entity co-occurrence matrix construction
#[derive(Parser)]
#[command(name = "cooc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a pipeline from a YAML configuration file
    Run {
        /// Path to pipeline configuration YAML
        #[arg(short, long)]
        config: PathBuf,

        /// Path to the co-occurrence triple CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the matrix CSV
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Build a matrix directly from command-line parameters
    Build {
        /// Path to the co-occurrence triple CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the matrix CSV
        #[arg(short, long)]
        output: PathBuf,

        /// Percentile threshold for frequency filtering (default: 0.0)
        #[arg(short, long, default_value = "0.0")]
        percentile: f64,

        /// Lowercase entity names before aggregation
        #[arg(long)]
        lowercase: bool,

        /// Keep only the first N rows in label order
        #[arg(long)]
        limit_rows: Option<usize>,

        /// Keep only the first N columns in label order
        #[arg(long)]
        limit_columns: Option<usize>,

        /// Row exclusion pattern (repeatable)
        #[arg(long = "exclude-row")]
        exclude_rows: Vec<String>,

        /// Column exclusion pattern (repeatable)
        #[arg(long = "exclude-column")]
        exclude_columns: Vec<String>,
    },

    /// Profile a triple table
    Profile {
        /// Path to the co-occurrence triple CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output format: text, json, or yaml
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Generate an example pipeline configuration
    Example {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "pipeline.yaml")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            input,
            output,
        } => cmd_run(&config, &input, &output),

        Commands::Build {
            input,
            output,
            percentile,
            lowercase,
            limit_rows,
            limit_columns,
            exclude_rows,
            exclude_columns,
        } => cmd_build(
            &input,
            &output,
            percentile,
            lowercase,
            limit_rows,
            limit_columns,
            exclude_rows,
            exclude_columns,
        ),

        Commands::Profile { input, format } => cmd_profile(&input, &format),

        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Run a pipeline from configuration
fn cmd_run(config_path: &PathBuf, input_path: &PathBuf, output_path: &PathBuf) -> Result<()> {
    eprintln!("Loading pipeline configuration from {:?}...", config_path);
    let config_str = std::fs::read_to_string(config_path)?;
    let config = PipelineConfig::from_yaml(&config_str)?;

    eprintln!("Loading triples...");
    let triples = TripleTable::from_csv(input_path)?;
    eprintln!("Loaded {} triples", triples.len());

    eprintln!("Running pipeline '{}'...", config.name);
    let pipeline = Pipeline::from_config(&config);
    let (matrix, report) = pipeline.run(&triples)?;

    eprintln!("Writing matrix to {:?}...", output_path);
    matrix.to_csv(output_path)?;

    eprintln!("Done! {} rows x {} columns", matrix.n_rows(), matrix.n_cols());
    eprintln!("{}", report);

    Ok(())
}

/// Build a matrix from command-line parameters
fn cmd_build(
    input_path: &PathBuf,
    output_path: &PathBuf,
    percentile: f64,
    lowercase: bool,
    limit_rows: Option<usize>,
    limit_columns: Option<usize>,
    exclude_rows: Vec<String>,
    exclude_columns: Vec<String>,
) -> Result<()> {
    eprintln!("Loading triples...");
    let triples = TripleTable::from_csv(input_path)?;
    eprintln!("Loaded {} triples", triples.len());

    eprintln!("Building matrix...");
    eprintln!("  Percentile: {:.2}", percentile);
    eprintln!("  Lowercase:  {}", lowercase);

    let (matrix, report) = Pipeline::new()
        .name("build")
        .percentile(percentile)
        .lowercase(lowercase)
        .limit_rows(limit_rows)
        .limit_columns(limit_columns)
        .exclude_rows(exclude_rows)
        .exclude_columns(exclude_columns)
        .run(&triples)?;

    eprintln!("Writing matrix to {:?}...", output_path);
    matrix.to_csv(output_path)?;

    eprintln!("Done! {} rows x {} columns", matrix.n_rows(), matrix.n_cols());
    eprintln!("{}", report);

    Ok(())
}

/// Profile a triple table
fn cmd_profile(input_path: &PathBuf, format: &str) -> Result<()> {
    eprintln!("Loading triples...");
    let triples = TripleTable::from_csv(input_path)?;

    let frequency = profile_frequencies(&triples);
    let sparsity = if triples.is_empty() {
        None
    } else {
        let matrix = pivot_cooccurrence(&triples, &PivotOptions::default())?;
        Some(profile_sparsity(&matrix))
    };

    match format {
        "json" => {
            let profile = serde_json::json!({
                "frequency": frequency,
                "sparsity": sparsity,
            });
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        "yaml" => {
            let profile = serde_json::json!({
                "frequency": frequency,
                "sparsity": sparsity,
            });
            println!("{}", serde_yaml::to_string(&profile)?);
        }
        _ => {
            println!("Data Profile");
            println!("============");
            println!();
            println!("{}", frequency);
            if let Some(sparsity) = sparsity {
                println!("{}", sparsity);
            }
        }
    }

    Ok(())
}

/// Write an example pipeline configuration
fn cmd_example(output_path: &PathBuf) -> Result<()> {
    let config = Pipeline::new()
        .name("envidis")
        .percentile(0.6)
        .lowercase(true)
        .exclude_rows(vec![
            "current".to_string(),
            "wave".to_string(),
            "precipitation".to_string(),
            "stream".to_string(),
        ])
        .exclude_columns(vec![
            "fire".to_string(),
            "earthquake".to_string(),
            "drought".to_string(),
            "flood".to_string(),
            "ad".to_string(),
        ])
        .to_config(Some(
            "Environment-disease co-occurrence matrix with ambiguous entities excluded",
        ));

    std::fs::write(output_path, config.to_yaml()?)?;
    eprintln!("Wrote example configuration to {:?}", output_path);
    eprintln!("Run it with: cooc run -c {:?} -i cooc.csv -o cooc_matrix.csv", output_path);

    Ok(())
}
