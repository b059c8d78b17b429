//! Site-level roll-ups of per-page audience results and optimization reports.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::recommendations::{Category, OptimizationReport, Recommendation, Severity};
use super::scoring::{round_to, AudienceLabels, AudienceResult, ScoringAccumulator};

/// Issue prefix length used when deduplicating recommendations across pages.
const DEDUP_ISSUE_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteResult {
    pub primary_region: Option<String>,
    pub primary_region_name: Option<String>,
    pub primary_language: Option<String>,
    pub primary_language_name: Option<String>,
    pub likely_audience: String,
    /// Mean of the per-page confidences.
    pub region_confidence: f64,
    /// Share of pages whose own primary region matches the site's.
    pub region_consistency: f64,
    pub pages_analyzed: usize,
    pub region_distribution: IndexMap<String, f64>,
    pub language_distribution: IndexMap<String, usize>,
}

/// Fold per-page results into a site verdict.
///
/// The site region is the argmax of the summed per-page breakdowns, while
/// the site language is a plain majority vote over page languages.
pub fn aggregate_site_results(pages: &[AudienceResult]) -> Option<SiteResult> {
    if pages.is_empty() {
        return None;
    }

    let mut acc = ScoringAccumulator::new();
    let mut language_counts: IndexMap<String, usize> = IndexMap::new();

    for page in pages {
        for (region, score) in &page.signal_breakdown {
            acc.add(region, *score);
        }
        if let Some(language) = page.primary_language.as_deref().filter(|l| !l.is_empty()) {
            *language_counts.entry(language.to_string()).or_insert(0) += 1;
        }
    }

    let primary_region = acc.leader().map(|(region, _)| region.to_string());
    let primary_language = majority(&language_counts).map(str::to_string);

    let region_consistency = match primary_region.as_deref() {
        Some(site_region) => {
            let agreeing = pages
                .iter()
                .filter(|page| page.primary_region.as_deref() == Some(site_region))
                .count();
            round_to(agreeing as f64 / pages.len() as f64, 2)
        }
        None => 0.0,
    };

    let confidence_sum: f64 = pages.iter().map(|page| page.region_confidence).sum();
    let region_confidence = round_to(confidence_sum / pages.len() as f64, 2);

    let labels = AudienceLabels::describe(primary_region.as_deref(), primary_language.as_deref());

    Some(SiteResult {
        primary_region,
        primary_region_name: labels.region_name,
        primary_language,
        primary_language_name: labels.language_name,
        likely_audience: labels.likely_audience,
        region_confidence,
        region_consistency,
        pages_analyzed: pages.len(),
        region_distribution: acc.breakdown(),
        language_distribution: language_counts,
    })
}

/// Merge page reports, dropping recommendations already seen on an earlier
/// page, and re-score the merged set.
pub fn aggregate_site_optimization<'a, I>(reports: I) -> Option<OptimizationReport>
where
    I: IntoIterator<Item = &'a OptimizationReport>,
{
    let mut seen: IndexSet<(Severity, Category, String)> = IndexSet::new();
    let mut merged: Vec<Recommendation> = Vec::new();
    let mut any_report = false;

    for report in reports {
        any_report = true;
        for rec in &report.recommendations {
            let prefix: String = rec.issue.chars().take(DEDUP_ISSUE_CHARS).collect();
            if seen.insert((rec.severity, rec.category, prefix)) {
                merged.push(rec.clone());
            }
        }
    }

    any_report.then(|| OptimizationReport::from_recommendations(merged))
}

/// Most frequent key; ties go to the first key inserted.
fn majority(counts: &IndexMap<String, usize>) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;
    for (key, count) in counts {
        if best.map_or(true, |(_, leading)| *count > leading) {
            best = Some((key.as_str(), *count));
        }
    }
    best.map(|(key, _)| key)
}
