use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

use creeper_core::{
    format_outcome, parse_candidates, BatchRunner, Outcome, OutputFormat, ReportCallback,
    ValidWriter, Validator,
};

#[derive(Debug, Parser)]
#[command(name = "creeper")]
#[command(about = "Enumerates valid O365 email addresses without submitting login attempts")]
#[command(version)]
#[command(group(ArgGroup::new("input").required(true).args(["email", "file"])))]
struct Cli {
    /// Single email address to validate
    #[arg(short, long)]
    email: Option<String>,

    /// File containing a list of email addresses to validate, one per line
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// File to save valid email addresses (append mode)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Throttle time in seconds between requests
    #[arg(short, long, default_value_t = 0.5)]
    throttle: f64,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 10.0)]
    timeout: f64,

    /// Output format (human or json)
    #[arg(long, default_value = "human")]
    format: OutputFormat,

    /// Override the credential-type endpoint URL
    #[arg(long, hide = true)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let output_format = cli.format;

    let candidates = match &cli.file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(content) => parse_candidates(&content),
            Err(e) => {
                eprintln!("Error: File '{}' could not be read: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        // The input arg group guarantees -e is present when -f is not
        None => vec![cli.email.clone().unwrap_or_default()],
    };

    let mut validator =
        Validator::new().with_timeout(Duration::from_secs_f64(cli.timeout.max(0.0)));
    if let Some(endpoint) = &cli.endpoint {
        validator = validator.with_endpoint(endpoint);
    }

    let mut runner =
        BatchRunner::new(validator).with_throttle(Duration::from_secs_f64(cli.throttle.max(0.0)));
    if let Some(path) = &cli.output {
        runner = runner.with_valid_writer(ValidWriter::new(path));
    }

    // Human output streams one line per address as results arrive; JSON is
    // emitted as a single array once the batch completes.
    let report: Option<ReportCallback> = match output_format {
        OutputFormat::Human => Some(Box::new(|_done: usize, _total: usize, outcome: &Outcome| {
            println!("{}", format_outcome(outcome));
        })),
        OutputFormat::Json => None,
    };

    let outcomes = runner.run(&candidates, report).await;

    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    }

    Ok(())
}
