use crate::commands::{run_analyze, run_export};
use crate::server;
use clap::{Args, Parser, Subcommand, ValueEnum};
use region_audit::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "region-audit",
    about = "Infer a site's target region and audience and audit its localization",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Analyze a page or site evidence bundle and print the verdict
    Analyze(AnalyzeArgs),
    /// Write the recommendations for an evidence bundle to CSV
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Evidence bundle (single page or site) in JSON
    pub(crate) file: PathBuf,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
    /// Describe the intended audience instead of inferring it
    #[arg(long)]
    pub(crate) target_audience: Option<String>,
    /// Skip the localization audit
    #[arg(long)]
    pub(crate) no_recommendations: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Evidence bundle (single page or site) in JSON
    pub(crate) file: PathBuf,
    /// Destination CSV file
    #[arg(long, short)]
    pub(crate) output: PathBuf,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Analyze(args) => run_analyze(args),
        Command::Export(args) => run_export(args),
    }
}
