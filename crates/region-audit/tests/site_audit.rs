use chrono::{TimeZone, Utc};
use region_audit::audit::{
    analyze_site, compute_result, generate_recommendations, AuditOptions, Category, Evidence,
    Severity,
};
use region_audit::bundle::{write_recommendations_csv, EvidenceBundle};
use std::io::Cursor;

const SITE_BUNDLE: &str = r#"{
    "url": "https://boutique.fr/",
    "pages": [
        {
            "url": "https://boutique.fr/",
            "depth": 0,
            "evidence": {
                "htmlSignals": {
                    "lang": "fr-FR",
                    "metaLocale": "fr_FR",
                    "charset": "utf-8",
                    "hreflangTags": ["fr", "x-default"],
                    "tld": ".fr"
                },
                "contentSignals": {
                    "currencyCodes": ["EUR"],
                    "uxSignals": {"viewport": "width=device-width, initial-scale=1"}
                },
                "ipGeolocation": {"countryCode": "FR", "isp": "OVH SAS", "org": "OVH"},
                "languageDetection": {"results": [{"lang": "fr", "confidence": 0.97}], "method": "langdetect"}
            }
        },
        {
            "url": "https://boutique.fr/contact",
            "depth": 1,
            "evidence": {
                "htmlSignals": {"lang": "fr", "tld": ".fr"},
                "contentSignals": {
                    "uxSignals": {
                        "inputs": [{"name": "email", "type": "text"}],
                        "images": [{"alt": null}, {"alt": ""}, {"alt": "Plan"}]
                    }
                },
                "ipGeolocation": {"countryCode": "FR", "isp": "OVH SAS", "org": "OVH"},
                "languageDetection": {"error": "Insufficient text", "method": "none"}
            }
        }
    ]
}"#;

fn analyzed_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

#[test]
fn site_bundle_runs_through_the_full_audit() {
    let bundle = EvidenceBundle::from_reader(Cursor::new(SITE_BUNDLE)).expect("bundle parses");
    let (url, pages) = match bundle {
        EvidenceBundle::Site { url, pages } => (url, pages),
        other => panic!("expected site bundle, got {other:?}"),
    };

    let site = analyze_site(&url, pages, &AuditOptions::default(), analyzed_at());

    let result = site.site_result.as_ref().expect("site result");
    assert_eq!(result.primary_region.as_deref(), Some("FR"));
    assert_eq!(result.region_consistency, 1.0);
    assert_eq!(result.likely_audience, "French-speaking audience in France");

    let contact = &site.pages[1];
    assert_eq!(contact.warnings, vec!["Language detection: Insufficient text".to_string()]);
    let contact_report = contact.optimization.as_ref().expect("page report");
    assert!(contact_report
        .by_category(Category::UxForms)
        .any(|rec| rec.severity == Severity::Info));
    assert!(contact_report.by_category(Category::Accessibility).count() == 1);

    let optimization = site.site_optimization.as_ref().expect("site report");
    let ranks: Vec<u8> = optimization
        .recommendations
        .iter()
        .map(|rec| rec.severity.rank())
        .collect();
    assert!(ranks.windows(2).all(|pair| pair[0] <= pair[1]));

    let mut csv = Vec::new();
    write_recommendations_csv(optimization, &mut csv).expect("csv export");
    let csv = String::from_utf8(csv).expect("utf8 csv");
    assert_eq!(
        csv.lines().count(),
        optimization.recommendations.len() + 1
    );
}

#[test]
fn partial_json_evidence_is_accepted() {
    let evidence: Evidence =
        serde_json::from_str(r#"{"htmlSignals": {"tld": ".kr"}}"#).expect("partial evidence");
    let result = compute_result(&evidence);
    let report = generate_recommendations(&evidence, &result);

    assert_eq!(result.primary_region.as_deref(), Some("KR"));
    assert!(report.summary.score < 100);
    assert!(report
        .recommendations
        .iter()
        .any(|rec| rec.category == Category::Hreflang && rec.severity == Severity::Critical));
}

#[test]
fn report_json_uses_wire_names() {
    let evidence = Evidence::default();
    let report = generate_recommendations(&evidence, &compute_result(&evidence));
    let json = serde_json::to_value(&report).expect("serializes");

    assert_eq!(json["summary"]["grade"], "F");
    assert_eq!(json["summary"]["totalIssues"], report.recommendations.len());
    assert_eq!(json["recommendations"][0]["severity"], "critical");
}
