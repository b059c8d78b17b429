use crate::cli::{AnalyzeArgs, ExportArgs, OutputFormat};
use crate::infra::AuditDefaults;
use crate::render::{PageReport, SiteReport};
use chrono::{DateTime, Utc};
use region_audit::audit::{
    analyze_page, analyze_site, AuditOptions, OptimizationReport, PageAnalysis, SiteAnalysis,
};
use region_audit::bundle::{write_recommendations_csv, BundleError, EvidenceBundle};
use region_audit::config::AppConfig;
use region_audit::error::AppError;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum AuditOutcome {
    Page(Box<PageAnalysis>),
    Site(SiteAnalysis),
}

impl AuditOutcome {
    fn optimization(&self) -> Option<&OptimizationReport> {
        match self {
            Self::Page(page) => page.optimization.as_ref(),
            Self::Site(site) => site.site_optimization.as_ref(),
        }
    }
}

pub(crate) fn audit_bundle(
    bundle: EvidenceBundle,
    options: &AuditOptions,
    analyzed_at: DateTime<Utc>,
) -> AuditOutcome {
    match bundle {
        EvidenceBundle::Page(page) => AuditOutcome::Page(Box::new(analyze_page(page, options))),
        EvidenceBundle::Site { url, pages } => {
            AuditOutcome::Site(analyze_site(&url, pages, options, analyzed_at))
        }
    }
}

fn log_bundle(bundle: &EvidenceBundle, file: &Path) {
    info!(
        file = %file.display(),
        url = bundle.url(),
        site = bundle.is_site(),
        pages = bundle.page_count(),
        "evidence bundle loaded"
    );
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        file,
        format,
        target_audience,
        no_recommendations,
    } = args;

    let config = AppConfig::load()?;
    let defaults = AuditDefaults::new(config.audit);
    let options = defaults.options(no_recommendations.then_some(false), target_audience);

    let bundle = EvidenceBundle::from_path(&file)?;
    log_bundle(&bundle, &file);
    let outcome = audit_bundle(bundle, &options, Utc::now());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => match &outcome {
            AuditOutcome::Page(page) => print!("{}", PageReport(page)),
            AuditOutcome::Site(site) => print!("{}", SiteReport(site)),
        },
    }

    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs { file, output } = args;

    let config = AppConfig::load()?;
    let defaults = AuditDefaults::new(config.audit);
    let options = defaults.options(Some(true), None);

    let bundle = EvidenceBundle::from_path(&file)?;
    log_bundle(&bundle, &file);
    let outcome = audit_bundle(bundle, &options, Utc::now());
    let report = outcome.optimization().ok_or(BundleError::Empty)?;

    let out = BufWriter::new(File::create(&output)?);
    write_recommendations_csv(report, out)?;

    info!(
        output = %output.display(),
        issues = report.summary.total_issues,
        "recommendations exported"
    );
    println!(
        "Wrote {} recommendations to {}",
        report.recommendations.len(),
        output.display()
    );
    Ok(())
}
