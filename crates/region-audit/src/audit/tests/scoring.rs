use super::common::*;
use crate::audit::evidence::{Evidence, IpGeolocation, LanguageDetection, SocialMediaSignal};
use crate::audit::scoring::compute_result;

#[test]
fn empty_evidence_is_unknown() {
    let result = compute_result(&Evidence::default());

    assert!(result.primary_region.is_none());
    assert!(result.primary_language.is_none());
    assert_eq!(result.region_confidence, 0.0);
    assert_eq!(result.likely_audience, "Unknown");
    assert!(result.language_confidence.is_none());
    assert!(result.signal_breakdown.is_empty());
}

#[test]
fn country_tld_alone_names_the_region() {
    let result = compute_result(&with_tld(".de"));

    assert_eq!(result.primary_region.as_deref(), Some("DE"));
    assert_eq!(result.primary_region_name.as_deref(), Some("Germany"));
    assert!(result.region_confidence > 0.0);
    assert_eq!(result.likely_audience, "German-speaking audience in Germany");
}

#[test]
fn tld_lookup_ignores_case() {
    let result = compute_result(&with_tld(".DE"));
    assert_eq!(result.primary_region.as_deref(), Some("DE"));
}

#[test]
fn bare_language_maps_through_default_region() {
    let result = compute_result(&with_lang("ja"));
    assert_eq!(result.primary_region.as_deref(), Some("JP"));
    assert_eq!(result.primary_language.as_deref(), Some("ja"));

    let english = compute_result(&with_lang("en"));
    assert!(english.primary_region.is_none());
    assert_eq!(english.primary_language.as_deref(), Some("en"));
    assert_eq!(english.likely_audience, "Unknown");
}

#[test]
fn region_subtag_outranks_bare_code() {
    let result = compute_result(&with_lang("de-AT"));

    assert_eq!(result.primary_region.as_deref(), Some("AT"));
    assert_eq!(result.primary_language.as_deref(), Some("de-at"));
    assert_eq!(result.signal_breakdown.get("AT"), Some(&0.9));
}

#[test]
fn conflicting_ip_never_raises_confidence() {
    let clean = compute_result(&with_tld(".de"));

    let mut conflicting = with_tld(".de");
    conflicting.ip_geolocation = Some(hosted_in("US", "DigitalOcean"));
    let conflicted = compute_result(&conflicting);

    assert_eq!(conflicted.primary_region.as_deref(), Some("DE"));
    assert!(clean.region_confidence >= conflicted.region_confidence);
}

#[test]
fn weak_detector_guess_is_ignored() {
    let mut evidence = Evidence::default();
    evidence.language_detection = Some(LanguageDetection::detected("de", 0.5));
    let result = compute_result(&evidence);

    assert!(result.signal_breakdown.get("DE").is_none());
    assert!(result.primary_region.is_none());
    assert_eq!(result.primary_language.as_deref(), Some("de"));
    assert_eq!(result.language_confidence, Some(0.5));

    evidence.language_detection = Some(LanguageDetection::detected("de", 0.51));
    let result = compute_result(&evidence);
    assert_eq!(result.signal_breakdown.get("DE"), Some(&0.306));
}

#[test]
fn japanese_shop_is_confidently_japanese() {
    let result = compute_result(&japanese_shop());

    assert_eq!(result.primary_region.as_deref(), Some("JP"));
    assert_eq!(result.primary_language.as_deref(), Some("ja"));
    assert!(result.region_confidence > 0.5);
    assert_eq!(result.language_confidence, Some(0.99));
    assert_eq!(result.likely_audience, "Japanese-speaking audience in Japan");
}

#[test]
fn cdn_hosting_halves_ip_weight() {
    let mut evidence = Evidence::default();
    evidence.ip_geolocation = Some(hosted_in("US", "Cloudflare, Inc."));
    assert_eq!(compute_result(&evidence).signal_breakdown.get("US"), Some(&0.2));

    evidence.ip_geolocation = Some(hosted_in("US", "Twitter Inc."));
    assert_eq!(compute_result(&evidence).signal_breakdown.get("US"), Some(&0.2));

    evidence.ip_geolocation = Some(hosted_in("US", "Linode"));
    assert_eq!(compute_result(&evidence).signal_breakdown.get("US"), Some(&0.4));
}

#[test]
fn ties_go_to_the_first_signal_seen() {
    let mut evidence = Evidence::default();
    evidence.content_signals.phone_formats = vec!["FR".to_string(), "DE".to_string()];

    let result = compute_result(&evidence);
    assert_eq!(result.primary_region.as_deref(), Some("FR"));
    let order: Vec<&str> = result.signal_breakdown.keys().map(String::as_str).collect();
    assert_eq!(order, vec!["FR", "DE"]);
}

#[test]
fn repeated_currencies_and_phones_count_once() {
    let mut evidence = Evidence::default();
    evidence.content_signals.currency_codes = vec!["JPY".into(), "JPY".into(), "XYZ".into()];
    evidence.content_signals.phone_formats = vec!["JP".into(), "JP".into()];

    let result = compute_result(&evidence);
    assert_eq!(result.signal_breakdown.get("JP"), Some(&0.6));
}

#[test]
fn script_subtag_resolves_through_bare_language() {
    let result = compute_result(&with_lang("zh-Hans"));

    assert_eq!(result.primary_region.as_deref(), Some("CN"));
    assert_eq!(result.primary_language.as_deref(), Some("zh"));
    assert_eq!(result.signal_breakdown.get("CN"), Some(&0.7));
    assert!(!result.signal_breakdown.contains_key("HANS"));
}

#[test]
fn unmapped_currencies_leave_confidence_alone() {
    let baseline = compute_result(&with_tld(".tw"));

    let mut evidence = with_tld(".tw");
    evidence.content_signals.currency_codes = vec!["TWD".into(), "XYZ".into()];
    let result = compute_result(&evidence);

    assert_eq!(result.primary_region.as_deref(), Some("TW"));
    assert_eq!(result.region_confidence, baseline.region_confidence);
    assert_eq!(result.signal_breakdown, baseline.signal_breakdown);
}

#[test]
fn social_signals_skip_ambiguous_regions() {
    let mut evidence = Evidence::default();
    evidence.content_signals.social_media_signals = vec![
        SocialMediaSignal {
            domain: "line.me".into(),
            region: "JP/TW".into(),
        },
        SocialMediaSignal {
            domain: "vk.com".into(),
            region: "RU".into(),
        },
    ];

    let result = compute_result(&evidence);
    assert_eq!(result.primary_region.as_deref(), Some("RU"));
    assert_eq!(result.signal_breakdown.len(), 1);
}

#[test]
fn errored_collaborators_contribute_nothing() {
    let mut evidence = with_tld(".fr");
    evidence.ip_geolocation = Some(IpGeolocation::failed("DNS resolution failed"));
    evidence.language_detection = Some(LanguageDetection::failed("Insufficient text"));

    let result = compute_result(&evidence);
    assert_eq!(result.primary_region.as_deref(), Some("FR"));
    assert_eq!(result.signal_breakdown.len(), 1);
    assert!(result.language_confidence.is_none());
}

#[test]
fn confidence_stays_within_unit_interval() {
    let mut stacked = localized_german_store();
    stacked.content_signals.phone_formats = vec!["DE".into(); 3];
    stacked.content_signals.social_media_signals = (0..20)
        .map(|_| SocialMediaSignal {
            domain: "xing.com".into(),
            region: "DE".into(),
        })
        .collect();

    for evidence in [
        Evidence::default(),
        with_tld(".de"),
        japanese_shop(),
        localized_german_store(),
        stacked,
    ] {
        let confidence = compute_result(&evidence).region_confidence;
        assert!((0.0..=1.0).contains(&confidence), "confidence {confidence} out of range");
    }
}

#[test]
fn result_serializes_with_camel_case_keys() {
    let json = serde_json::to_value(compute_result(&japanese_shop())).expect("serializes");

    assert_eq!(json["primaryRegion"], "JP");
    assert_eq!(json["primaryLanguageName"], "Japanese");
    assert!(json["signalBreakdown"]["JP"].as_f64().is_some());
}
