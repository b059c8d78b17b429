use super::BundleError;
use crate::audit::recommendations::OptimizationReport;
use std::io::Write;

const HEADERS: [&str; 5] = ["severity", "category", "issue", "recommendation", "code_example"];

/// Write `report` as CSV, one row per recommendation in report order.
pub fn write_recommendations_csv<W: Write>(
    report: &OptimizationReport,
    writer: W,
) -> Result<(), BundleError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(HEADERS)?;

    for rec in &report.recommendations {
        out.write_record([
            rec.severity.label().to_ascii_lowercase().as_str(),
            rec.category.key(),
            rec.issue.as_str(),
            rec.recommendation.as_str(),
            rec.code_example.as_deref().unwrap_or_default(),
        ])?;
    }

    out.flush()?;
    Ok(())
}
