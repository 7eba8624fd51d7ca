use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use timeoff_digest::config::AppConfig;
use timeoff_digest::error::AppError;
use timeoff_digest::telemetry;
use timeoff_digest::workflows::timeoff::{
    DailyDigestWorkflow, DigestRunReport, HttpChatNotifier, HttpHrClient, StageStatus,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "Time-Off Digest",
    about = "Fetch today's approved time-off requests from the HR platform and post a digest to team chat",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the digest pipeline (default command)
    Run(RunArgs),
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Digest date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Override the configured artifact output path
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Run(RunArgs::default()));

    let outcome = match command {
        Command::Run(args) => run_digest(args),
    };

    match outcome {
        Ok(report) if report.empty_due_to_upstream_failure() => {
            eprintln!("digest is empty because an upstream stage failed");
            std::process::exit(2);
        }
        Ok(_) => {}
        Err(err) => {
            eprintln!("application error: {err}");
            std::process::exit(1);
        }
    }
}

fn run_digest(args: RunArgs) -> Result<DigestRunReport, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let digest_date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let artifact_path = args
        .output
        .unwrap_or_else(|| config.output.artifact_path.clone());

    let hr = HttpHrClient::new(&config.hr)?;
    let notifier = HttpChatNotifier::new(&config.webhook)?;
    let workflow = DailyDigestWorkflow::new(Box::new(hr), Box::new(notifier));

    info!(%digest_date, "starting daily time-off digest");
    let report = workflow.run(digest_date, &artifact_path);
    render_run_report(&report, &artifact_path);

    Ok(report)
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn render_run_report(report: &DigestRunReport, artifact_path: &Path) {
    println!("Daily time-off digest");
    println!("Digest date: {}", report.digest_date);
    println!("Records published: {}", report.record_count);
    println!("Artifact: {}", artifact_path.display());

    println!();
    render_stage("time-off fetch", &report.requests_stage);
    render_stage("directory fetch", &report.directory_stage);
    render_stage("artifact write", &report.artifact_stage);
    render_stage("webhook delivery", &report.delivery_stage);
}

fn render_stage(label: &str, status: &StageStatus) {
    match status {
        StageStatus::Completed => println!("- {label}: ok"),
        StageStatus::Failed { detail } => println!("- {label}: failed ({detail})"),
    }
}
