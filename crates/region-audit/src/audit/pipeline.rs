use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::aggregation::{aggregate_site_optimization, aggregate_site_results, SiteResult};
use super::evidence::Evidence;
use super::persona::{
    aggregate_persona_analysis, build_persona_analysis, resolve_target_audience, PersonaAnalysis,
    PersonaContext,
};
use super::recommendations::{generate_recommendations, OptimizationReport};
use super::scoring::{compute_result, AudienceResult};

/// Knobs shared by single-page and site audits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditOptions {
    pub include_recommendations: bool,
    pub target_audience: Option<String>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            include_recommendations: true,
            target_audience: None,
        }
    }
}

impl AuditOptions {
    fn target_audience(&self) -> Option<&str> {
        self.target_audience.as_deref()
    }
}

/// Extracted evidence for one crawled page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageEvidence {
    pub url: String,
    pub depth: u32,
    pub evidence: Evidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnalysis {
    pub url: String,
    pub depth: u32,
    pub result: AudienceResult,
    pub evidence: Evidence,
    pub optimization: Option<OptimizationReport>,
    pub persona_analysis: PersonaAnalysis,
    pub persona_context: PersonaContext,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlSummary {
    pub pages_analyzed: usize,
    pub max_depth_reached: u32,
    pub page_urls: Vec<String>,
}

impl CrawlSummary {
    fn from_pages(pages: &[PageEvidence]) -> Self {
        Self {
            pages_analyzed: pages.len(),
            max_depth_reached: pages.iter().map(|page| page.depth).max().unwrap_or(0),
            page_urls: pages.iter().map(|page| page.url.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAnalysis {
    pub url: String,
    pub analyzed_at: DateTime<Utc>,
    pub crawl_summary: Option<CrawlSummary>,
    pub site_result: Option<SiteResult>,
    pub site_optimization: Option<OptimizationReport>,
    pub persona_analysis: Option<PersonaAnalysis>,
    pub persona_context: PersonaContext,
    pub pages: Vec<PageAnalysis>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Score and audit a single page.
pub fn analyze_page(page: PageEvidence, options: &AuditOptions) -> PageAnalysis {
    let PageEvidence {
        url,
        depth,
        evidence,
    } = page;

    let result = compute_result(&evidence);
    let optimization = options
        .include_recommendations
        .then(|| generate_recommendations(&evidence, &result));
    let persona_analysis = build_persona_analysis(&result, &evidence, options.target_audience());
    let persona_context = PersonaContext::from_resolution(&persona_analysis.audience);

    let warnings: Vec<String> = ip_warning(&evidence)
        .into_iter()
        .chain(language_warning(&evidence))
        .collect();

    debug!(
        %url,
        depth,
        region = result.primary_region.as_deref().unwrap_or("unknown"),
        confidence = result.region_confidence,
        issues = optimization.as_ref().map_or(0, |report| report.summary.total_issues),
        "page analyzed"
    );

    PageAnalysis {
        url,
        depth,
        result,
        evidence,
        optimization,
        persona_analysis,
        persona_context,
        warnings,
    }
}

/// Analyze every page of a site and roll the results up.
///
/// An empty page list is reported in `errors` with all aggregates absent.
pub fn analyze_site(
    url: &str,
    pages: Vec<PageEvidence>,
    options: &AuditOptions,
    analyzed_at: DateTime<Utc>,
) -> SiteAnalysis {
    let mut analysis = SiteAnalysis {
        url: url.to_string(),
        analyzed_at,
        crawl_summary: None,
        site_result: None,
        site_optimization: None,
        persona_analysis: None,
        persona_context: PersonaContext::from_resolution(&resolve_target_audience(
            options.target_audience(),
            &AudienceResult::unknown(),
        )),
        pages: Vec::new(),
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    if pages.is_empty() {
        warn!(%url, "site audit received no pages");
        analysis
            .errors
            .push(format!("Crawl failed: no pages could be fetched from {url}"));
        return analysis;
    }

    analysis.crawl_summary = Some(CrawlSummary::from_pages(&pages));
    info!(%url, pages = pages.len(), "analyzing site");

    // Geolocation is shared by every page of a site, so its failure is reported once.
    let site_warnings: IndexSet<String> = pages
        .iter()
        .filter_map(|page| ip_warning(&page.evidence))
        .collect();
    analysis.warnings.extend(site_warnings);

    analysis.pages = pages
        .into_iter()
        .map(|page| analyze_page(page, options))
        .collect();

    let results: Vec<AudienceResult> = analysis
        .pages
        .iter()
        .map(|page| page.result.clone())
        .collect();
    analysis.site_result = aggregate_site_results(&results);

    if options.include_recommendations {
        analysis.site_optimization = aggregate_site_optimization(
            analysis
                .pages
                .iter()
                .filter_map(|page| page.optimization.as_ref()),
        );
    }

    let personas: Vec<PersonaAnalysis> = analysis
        .pages
        .iter()
        .map(|page| page.persona_analysis.clone())
        .collect();
    analysis.persona_analysis = aggregate_persona_analysis(&personas);

    if let Some(persona) = &analysis.persona_analysis {
        analysis.persona_context = PersonaContext::from_resolution(&persona.audience);
    }

    let focus = analysis.persona_context.focus_areas.active();
    info!(
        %url,
        audience = %analysis.persona_context.final_audience,
        source = analysis.persona_context.source.label(),
        focus = %focus.join(", "),
        region = analysis
            .site_result
            .as_ref()
            .and_then(|site| site.primary_region.as_deref())
            .unwrap_or("unknown"),
        "site analysis complete"
    );

    analysis
}

fn ip_warning(evidence: &Evidence) -> Option<String> {
    evidence
        .ip_geolocation
        .as_ref()
        .and_then(|geo| geo.error.as_deref())
        .map(|error| format!("IP geolocation warning: {error}"))
}

fn language_warning(evidence: &Evidence) -> Option<String> {
    evidence
        .language_detection
        .as_ref()
        .and_then(|detection| detection.error.as_deref())
        .map(|error| format!("Language detection: {error}"))
}
