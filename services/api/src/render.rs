use region_audit::audit::{
    AudienceResult, OptimizationReport, PageAnalysis, PersonaAnalysis, SiteAnalysis, SiteResult,
};
use std::fmt;

/// Plain-text rendering of a single page audit.
pub(crate) struct PageReport<'a>(pub(crate) &'a PageAnalysis);

/// Plain-text rendering of a site audit.
pub(crate) struct SiteReport<'a>(pub(crate) &'a SiteAnalysis);

impl fmt::Display for PageReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = self.0;
        writeln!(f, "Page audit: {}", display_url(&page.url))?;
        write_verdict(f, &page.result)?;
        write_persona(f, &page.persona_analysis)?;
        write_notes(f, "Warnings", &page.warnings)?;
        match &page.optimization {
            Some(report) => write_report(f, report),
            None => writeln!(f, "\nLocalization audit: skipped"),
        }
    }
}

impl fmt::Display for SiteReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let site = self.0;
        writeln!(f, "Site audit: {} (analyzed {})", site.url, site.analyzed_at.to_rfc3339())?;

        if let Some(crawl) = &site.crawl_summary {
            writeln!(
                f,
                "Pages analyzed: {} | Max depth {}",
                crawl.pages_analyzed, crawl.max_depth_reached
            )?;
        }

        write_notes(f, "Errors", &site.errors)?;
        write_notes(f, "Warnings", &site.warnings)?;

        if let Some(result) = &site.site_result {
            write_site_result(f, result)?;
        }

        if let Some(persona) = &site.persona_analysis {
            write_persona(f, persona)?;
        }

        let focus = site.persona_context.focus_areas.active();
        if !focus.is_empty() {
            writeln!(f, "Focus areas: {}", focus.join(", "))?;
        }

        if let Some(report) = &site.site_optimization {
            write_report(f, report)?;
        }

        if !site.pages.is_empty() {
            writeln!(f, "\nPages")?;
            for page in &site.pages {
                writeln!(
                    f,
                    "- {} (depth {}): {} | {:.0}% confidence",
                    display_url(&page.url),
                    page.depth,
                    page.result.primary_region.as_deref().unwrap_or("unknown"),
                    page.result.region_confidence * 100.0
                )?;
            }
        }

        Ok(())
    }
}

fn display_url(url: &str) -> &str {
    if url.is_empty() {
        "(no url)"
    } else {
        url
    }
}

fn write_verdict(f: &mut fmt::Formatter<'_>, result: &AudienceResult) -> fmt::Result {
    writeln!(f, "Likely audience: {}", result.likely_audience)?;
    writeln!(
        f,
        "Region: {} ({:.0}% confidence)",
        result
            .primary_region_name
            .as_deref()
            .or(result.primary_region.as_deref())
            .unwrap_or("unknown"),
        result.region_confidence * 100.0
    )?;
    if let Some(language) = result
        .primary_language_name
        .as_deref()
        .or(result.primary_language.as_deref())
    {
        writeln!(f, "Language: {}", language)?;
    }

    if !result.signal_breakdown.is_empty() {
        writeln!(f, "\nSignal breakdown")?;
        for (region, score) in &result.signal_breakdown {
            writeln!(f, "- {}: {:.2}", region, score)?;
        }
    }
    Ok(())
}

fn write_site_result(f: &mut fmt::Formatter<'_>, result: &SiteResult) -> fmt::Result {
    writeln!(f, "\nLikely audience: {}", result.likely_audience)?;
    writeln!(
        f,
        "Region: {} ({:.0}% confidence, {:.0}% of pages agree)",
        result
            .primary_region_name
            .as_deref()
            .or(result.primary_region.as_deref())
            .unwrap_or("unknown"),
        result.region_confidence * 100.0,
        result.region_consistency * 100.0
    )?;

    if !result.language_distribution.is_empty() {
        let languages: Vec<String> = result
            .language_distribution
            .iter()
            .map(|(lang, pages)| format!("{lang} x{pages}"))
            .collect();
        writeln!(f, "Languages: {}", languages.join(", "))?;
    }
    Ok(())
}

fn write_persona(f: &mut fmt::Formatter<'_>, persona: &PersonaAnalysis) -> fmt::Result {
    writeln!(
        f,
        "\nAudience: {} ({})",
        persona.audience.final_audience,
        persona.audience.source.label()
    )?;
    writeln!(
        f,
        "Persona: {} | fit {:.1}/10{}",
        persona.regional_persona.persona_label,
        persona.persona_fit.score,
        if persona.persona_fit.is_fit { "" } else { " (weak fit)" }
    )?;
    writeln!(f, "  {}", persona.persona_fit.summary)
}

fn write_notes(f: &mut fmt::Formatter<'_>, title: &str, notes: &[String]) -> fmt::Result {
    if notes.is_empty() {
        return Ok(());
    }
    writeln!(f, "\n{}", title)?;
    for note in notes {
        writeln!(f, "- {}", note)?;
    }
    Ok(())
}

fn write_report(f: &mut fmt::Formatter<'_>, report: &OptimizationReport) -> fmt::Result {
    let summary = &report.summary;
    writeln!(
        f,
        "\nLocalization score: {}/100 (grade {})",
        summary.score,
        summary.grade.label()
    )?;
    writeln!(
        f,
        "{} issues | {} critical | {} warnings | {} info",
        summary.total_issues, summary.critical, summary.warnings, summary.info
    )?;

    if report.recommendations.is_empty() {
        return writeln!(f, "Recommendations: none");
    }

    writeln!(f, "\nRecommendations")?;
    for rec in &report.recommendations {
        writeln!(
            f,
            "- [{}] {}: {}",
            rec.severity.label(),
            rec.category.key(),
            rec.issue
        )?;
        writeln!(f, "  -> {}", rec.recommendation)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use region_audit::audit::{analyze_page, analyze_site, AuditOptions, Evidence, PageEvidence};

    fn swiss_page() -> PageEvidence {
        let evidence: Evidence = serde_json::from_value(serde_json::json!({
            "htmlSignals": {"lang": "de-CH", "tld": ".ch"},
            "ipGeolocation": {"error": "lookup timed out"}
        }))
        .expect("evidence");
        PageEvidence {
            url: "https://laden.ch/".to_string(),
            depth: 0,
            evidence,
        }
    }

    #[test]
    fn page_report_lists_recommendations() {
        let page = analyze_page(swiss_page(), &AuditOptions::default());
        let text = PageReport(&page).to_string();

        assert!(text.starts_with("Page audit: https://laden.ch/"));
        assert!(text.contains("Localization score: "));
        assert!(text.contains("- [Critical] hreflang: "));
        assert!(text.contains("IP geolocation warning: lookup timed out"));
    }

    #[test]
    fn page_report_notes_skipped_audit() {
        let options = AuditOptions {
            include_recommendations: false,
            target_audience: None,
        };
        let page = analyze_page(PageEvidence::default(), &options);
        let text = PageReport(&page).to_string();

        assert!(text.contains("Page audit: (no url)"));
        assert!(text.contains("Localization audit: skipped"));
    }

    #[test]
    fn site_report_summarises_pages() {
        let site = analyze_site(
            "https://laden.ch/",
            vec![swiss_page(), swiss_page()],
            &AuditOptions::default(),
            Utc::now(),
        );
        let text = SiteReport(&site).to_string();

        assert!(text.contains("Pages analyzed: 2 | Max depth 0"));
        assert!(text.contains("100% of pages agree"));
        assert_eq!(text.matches("- https://laden.ch/ (depth 0): CH").count(), 2);
    }

    #[test]
    fn empty_site_report_shows_errors() {
        let site = analyze_site(
            "https://gone.example/",
            Vec::new(),
            &AuditOptions::default(),
            Utc::now(),
        );
        let text = SiteReport(&site).to_string();

        assert!(text
            .contains("Errors\n- Crawl failed: no pages could be fetched from https://gone.example/"));
        assert!(!text.contains("Recommendations"));
    }
}
