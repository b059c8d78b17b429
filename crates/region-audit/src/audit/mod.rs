pub mod aggregation;
pub mod evidence;
pub mod persona;
pub mod pipeline;
pub mod recommendations;
pub mod scoring;
pub mod tables;

pub use aggregation::{aggregate_site_optimization, aggregate_site_results, SiteResult};
pub use evidence::{
    ContentSignals, DetectedLanguage, Evidence, HtmlSignals, ImageSample, InputField,
    IpGeolocation, LanguageDetection, PaymentMethodSignal, SocialMediaSignal, SpellingCounts,
    UnitCounts, UxSignals,
};
pub use persona::{
    aggregate_persona_analysis, build_persona_analysis, resolve_target_audience,
    AudienceResolution, AudienceSource, FocusAreas, PersonaAnalysis, PersonaContext, PersonaFit,
    RegionalPersona,
};
pub use pipeline::{
    analyze_page, analyze_site, AuditOptions, CrawlSummary, PageAnalysis, PageEvidence,
    SiteAnalysis,
};
pub use recommendations::{
    generate_recommendations, Category, Grade, OptimizationReport, Recommendation, ReportSummary,
    Severity,
};
pub use scoring::{compute_result, AudienceResult, ScoringAccumulator};

#[cfg(test)]
mod tests;
