//! Trends CLI - Command-line interface for health-trends
//!
//! Commands:
//! - summarize: Run metric series through the engine (batch mode)
//! - vitality: Score a single check-in
//! - dass21: Label DASS-21 sub-scale scores or raw answers
//! - path: Build a smooth curve path from values
//! - demo: Print a synthetic series for a metric
//! - config: Print the default engine configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Utc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use health_trends::bands::BandTable;
use health_trends::curve::{build_area_path, build_smooth_path, CurveOptions};
use health_trends::fallback::synthetic_series;
use health_trends::pipeline::{build_report, MetricProcessor, MetricSummary};
use health_trends::score::{vitality_score, Dass21Scores};
use health_trends::series::{parse_series_array, parse_series_ndjson};
use health_trends::{EngineConfig, MetricError, MetricId, ENGINE_VERSION};

/// Trends - time-series engine for health dashboard metrics
#[derive(Parser)]
#[command(name = "trends")]
#[command(author = "Synheart AI Inc")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Summarize health metric series into trends, scores and curves", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize metric series (batch mode)
    Summarize {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Engine configuration JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Wrap output in a report envelope with producer provenance
        #[arg(long)]
        report: bool,
    },

    /// Score a single check-in (each input 1-10, out-of-range inputs are clamped)
    Vitality {
        #[arg(long, allow_hyphen_values = true)]
        mood: f64,
        #[arg(long, allow_hyphen_values = true)]
        energy: f64,
        #[arg(long, allow_hyphen_values = true)]
        sleep: f64,
        #[arg(long, allow_hyphen_values = true)]
        stress: f64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Label DASS-21 results
    Dass21 {
        /// Depression sub-scale score (0-42)
        #[arg(long, required_unless_present = "answers")]
        depression: Option<f64>,

        /// Anxiety sub-scale score (0-42)
        #[arg(long, required_unless_present = "answers")]
        anxiety: Option<f64>,

        /// Stress sub-scale score (0-42)
        #[arg(long, required_unless_present = "answers")]
        stress: Option<f64>,

        /// 21 comma-separated item answers (0-3) in questionnaire order
        #[arg(long, value_delimiter = ',', conflicts_with_all = ["depression", "anxiety", "stress"])]
        answers: Option<Vec<u8>>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a smooth curve path from comma-separated values
    Path {
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<f64>,

        #[arg(long, default_value = "300")]
        width: f64,

        #[arg(long, default_value = "100")]
        height: f64,

        #[arg(long, default_value = "0.3")]
        tension: f64,

        /// Close the curve to the baseline for filled areas
        #[arg(long)]
        area: bool,
    },

    /// Print a synthetic demo series for a metric
    Demo {
        /// Metric id (e.g. mood, ldl, sleep_quality)
        #[arg(long)]
        metric: String,

        #[arg(long, default_value = "30")]
        days: usize,

        #[arg(long, default_value = "1")]
        seed: u64,

        /// Print the engine summary instead of raw samples
        #[arg(long)]
        summarize: bool,
    },

    /// Print the default engine configuration
    Config,
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one series per line)
    Ndjson,
    /// JSON array of series
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one summary per line)
    Ndjson,
    /// JSON array of summaries
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), TrendsCliError> {
    match cli.command {
        Commands::Summarize {
            input,
            output,
            input_format,
            output_format,
            config,
            report,
        } => cmd_summarize(
            &input,
            &output,
            input_format,
            output_format,
            config.as_deref(),
            report,
        ),

        Commands::Vitality {
            mood,
            energy,
            sleep,
            stress,
            json,
        } => cmd_vitality(mood, energy, sleep, stress, json),

        Commands::Dass21 {
            depression,
            anxiety,
            stress,
            answers,
            json,
        } => cmd_dass21(depression, anxiety, stress, answers, json),

        Commands::Path {
            values,
            width,
            height,
            tension,
            area,
        } => cmd_path(&values, width, height, tension, area),

        Commands::Demo {
            metric,
            days,
            seed,
            summarize,
        } => cmd_demo(&metric, days, seed, summarize),

        Commands::Config => {
            println!("{}", EngineConfig::default().to_json()?);
            Ok(())
        }
    }
}

fn read_input(input: &Path) -> Result<String, TrendsCliError> {
    if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(TrendsCliError::NoInput);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn cmd_summarize(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    config: Option<&Path>,
    report: bool,
) -> Result<(), TrendsCliError> {
    let engine_config = match config {
        Some(path) => EngineConfig::from_json(&fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    let processor = MetricProcessor::with_config(engine_config)?;

    let input_data = read_input(input)?;
    let all = match input_format {
        InputFormat::Ndjson => parse_series_ndjson(&input_data)?,
        InputFormat::Json => parse_series_array(&input_data)?,
    };

    if all.is_empty() {
        return Err(TrendsCliError::NoSeries);
    }
    info!(series = all.len(), "summarizing input");

    let summaries = processor.summarize_all(&all)?;

    let output_data = if report {
        let envelope = build_report(summaries);
        match output_format {
            OutputFormat::JsonPretty => serde_json::to_string_pretty(&envelope)? + "\n",
            _ => serde_json::to_string(&envelope)? + "\n",
        }
    } else {
        format_output(&summaries, &output_format)?
    };

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
        debug!(path = %output.display(), "wrote summaries");
    }

    Ok(())
}

fn cmd_vitality(
    mood: f64,
    energy: f64,
    sleep: f64,
    stress: f64,
    json: bool,
) -> Result<(), TrendsCliError> {
    let score = vitality_score(mood, energy, sleep, stress);
    let band = BandTable::vitality().map(score as f64).clone();

    if json {
        let out = serde_json::json!({
            "score": score,
            "label": band.label,
            "color": band.color,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Vitality: {} ({}, {})", score, band.label, band.color.as_str());
    }
    Ok(())
}

fn cmd_dass21(
    depression: Option<f64>,
    anxiety: Option<f64>,
    stress: Option<f64>,
    answers: Option<Vec<u8>>,
    json: bool,
) -> Result<(), TrendsCliError> {
    let scores = match answers {
        Some(answers) => Dass21Scores::from_answers(&answers)?,
        None => Dass21Scores {
            depression: depression.unwrap_or(0.0),
            anxiety: anxiety.unwrap_or(0.0),
            stress: stress.unwrap_or(0.0),
        },
    };
    let assessment = scores.assess();

    if json {
        let out = serde_json::json!({ "scores": scores, "assessment": assessment });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("DASS-21 Assessment");
        println!("==================");
        println!(
            "Depression: {:>4} {}",
            scores.depression,
            assessment.depression.as_str()
        );
        println!("Anxiety:    {:>4} {}", scores.anxiety, assessment.anxiety.as_str());
        println!("Stress:     {:>4} {}", scores.stress, assessment.stress.as_str());
    }
    Ok(())
}

fn cmd_path(
    values: &[f64],
    width: f64,
    height: f64,
    tension: f64,
    area: bool,
) -> Result<(), TrendsCliError> {
    let options = CurveOptions::new(width, height).with_tension(tension);
    options.validate()?;

    let path = if area {
        build_area_path(values, &options)?
    } else {
        build_smooth_path(values, &options)?
    };
    if path.is_empty() {
        return Err(TrendsCliError::NoSeries);
    }
    println!("{}", path);
    Ok(())
}

fn cmd_demo(metric: &str, days: usize, seed: u64, summarize: bool) -> Result<(), TrendsCliError> {
    let id: MetricId = metric.parse()?;
    let series = synthetic_series(&id.profile(), days, seed, Utc::now())?;

    if summarize {
        let summary: MetricSummary = MetricProcessor::new().summarize_synthetic(&series)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&series)?);
    }
    Ok(())
}

// Helper functions

fn format_output(
    summaries: &[MetricSummary],
    format: &OutputFormat,
) -> Result<String, TrendsCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for summary in summaries {
                lines.push(serde_json::to_string(summary)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(summaries)? + "\n"),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(summaries)? + "\n"),
    }
}

// Error types

#[derive(Debug)]
enum TrendsCliError {
    Io(io::Error),
    Metric(MetricError),
    Json(serde_json::Error),
    NoInput,
    NoSeries,
}

impl From<io::Error> for TrendsCliError {
    fn from(e: io::Error) -> Self {
        TrendsCliError::Io(e)
    }
}

impl From<MetricError> for TrendsCliError {
    fn from(e: MetricError) -> Self {
        TrendsCliError::Metric(e)
    }
}

impl From<serde_json::Error> for TrendsCliError {
    fn from(e: serde_json::Error) -> Self {
        TrendsCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<TrendsCliError> for CliError {
    fn from(e: TrendsCliError) -> Self {
        match e {
            TrendsCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            TrendsCliError::Metric(e) => {
                let hint = match &e {
                    MetricError::UnknownMetric(_) => {
                        "Use one of the catalog ids, e.g. mood, ldl, sleep_quality"
                    }
                    MetricError::InvalidArgument(_) => "Check configuration values",
                    MetricError::NonFiniteValue(_) => "Values must be finite numbers",
                    _ => "Ensure each series is { metric_id, samples: [{ timestamp, value }] }",
                };
                CliError {
                    code: "METRIC_ERROR".to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            TrendsCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            TrendsCliError::NoInput => CliError {
                code: "NO_INPUT".to_string(),
                message: "stdin is a terminal, nothing to read".to_string(),
                hint: Some("Pipe series JSON into the command or pass --input <file>".to_string()),
            },
            TrendsCliError::NoSeries => CliError {
                code: "NO_SERIES".to_string(),
                message: "No series or values found in input".to_string(),
                hint: Some("Ensure input is not empty".to_string()),
            },
        }
    }
}
