//! Weighted multi-signal fusion of page evidence into a target region,
//! language and audience.
//!
//! | Source                        | Weight                          |
//! |-------------------------------|---------------------------------|
//! | ccTLD                         | 1.0                             |
//! | `<html lang>` region subtag   | 0.9 (bare code via table: 0.7)  |
//! | `og:locale` region            | 0.8 (bare code via table: 0.5)  |
//! | `content-language` region     | 0.7 (bare code via table: 0.5)  |
//! | language detector             | 0.6 x confidence, above 0.5     |
//! | IP geolocation                | 0.4 (CDN-hosted: 0.2)           |
//! | currency / phone / social     | 0.3 per match                   |

mod accumulator;

pub use accumulator::ScoringAccumulator;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::evidence::{Evidence, HtmlSignals};
use super::tables;

pub const TLD_WEIGHT: f64 = 1.0;
pub const HTML_LANG_REGION_WEIGHT: f64 = 0.9;
pub const HTML_LANG_BARE_WEIGHT: f64 = 0.7;
pub const OG_LOCALE_REGION_WEIGHT: f64 = 0.8;
pub const OG_LOCALE_BARE_WEIGHT: f64 = 0.5;
pub const CONTENT_LANGUAGE_REGION_WEIGHT: f64 = 0.7;
pub const CONTENT_LANGUAGE_BARE_WEIGHT: f64 = 0.5;
pub const DETECTOR_WEIGHT: f64 = 0.6;
pub const DETECTOR_MIN_CONFIDENCE: f64 = 0.5;
pub const IP_WEIGHT: f64 = 0.4;
pub const CDN_IP_WEIGHT: f64 = 0.2;
pub const MATCH_WEIGHT: f64 = 0.3;

/// Best-guess audience for a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceResult {
    pub primary_region: Option<String>,
    pub primary_region_name: Option<String>,
    pub primary_language: Option<String>,
    pub primary_language_name: Option<String>,
    pub likely_audience: String,
    /// Always within [0, 1], two decimals.
    pub region_confidence: f64,
    pub language_confidence: Option<f64>,
    /// Accumulated score per region, highest first.
    #[serde(default)]
    pub signal_breakdown: IndexMap<String, f64>,
}

impl AudienceResult {
    pub fn unknown() -> Self {
        let labels = AudienceLabels::describe(None, None);
        Self {
            primary_region: None,
            primary_region_name: labels.region_name,
            primary_language: None,
            primary_language_name: labels.language_name,
            likely_audience: labels.likely_audience,
            region_confidence: 0.0,
            language_confidence: None,
            signal_breakdown: IndexMap::new(),
        }
    }
}

/// Display names and audience sentence for a resolved region/language pair.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AudienceLabels {
    pub region_name: Option<String>,
    pub language_name: Option<String>,
    pub likely_audience: String,
}

impl AudienceLabels {
    pub(crate) fn describe(region: Option<&str>, language: Option<&str>) -> Self {
        let region_name = region.map(tables::country_name);
        let language_name = language.map(tables::language_name);

        let likely_audience = match (&region_name, &language_name) {
            (Some(country), Some(language)) => {
                format!("{language}-speaking audience in {country}")
            }
            (Some(country), None) => format!("Audience in {country}"),
            _ => "Unknown".to_string(),
        };

        Self {
            region_name,
            language_name,
            likely_audience,
        }
    }
}

/// Fuse every signal in `evidence` into a single audience verdict.
///
/// Absent or unresolvable sources still count toward the total weight, so
/// sparse or conflicting evidence yields lower confidence instead of an error.
pub fn compute_result(evidence: &Evidence) -> AudienceResult {
    let html = &evidence.html_signals;
    let content = &evidence.content_signals;
    let mut acc = ScoringAccumulator::new();

    score_tld(html, &mut acc);
    let declared_language = score_html_lang(html, &mut acc);
    score_locale(
        html.meta_locale(),
        &['_'],
        OG_LOCALE_REGION_WEIGHT,
        OG_LOCALE_BARE_WEIGHT,
        &mut acc,
    );
    score_locale(
        html.meta_language(),
        &['-', '_'],
        CONTENT_LANGUAGE_REGION_WEIGHT,
        CONTENT_LANGUAGE_BARE_WEIGHT,
        &mut acc,
    );
    let detected_language = score_detector(evidence, &mut acc);
    score_ip(evidence, &mut acc);

    let mut seen_currencies = HashSet::new();
    for code in &content.currency_codes {
        let code = code.trim();
        if code.is_empty() || !seen_currencies.insert(code) {
            continue;
        }
        if let Some(region) = tables::region_for_currency(code) {
            acc.add(region, MATCH_WEIGHT);
        }
    }

    let mut seen_phones = HashSet::new();
    for region in &content.phone_formats {
        let region = region.trim();
        if !region.is_empty() && seen_phones.insert(region) {
            acc.add(region, MATCH_WEIGHT);
        }
    }

    for signal in &content.social_media_signals {
        let region = signal.region.trim();
        if !region.is_empty() && !region.contains('/') {
            acc.add(region, MATCH_WEIGHT);
        }
    }

    let primary_region = acc.leader().map(|(region, _)| region.to_string());
    let region_confidence = acc.leader_confidence();

    let primary_language = declared_language.or(detected_language).or_else(|| {
        primary_region
            .as_deref()
            .and_then(tables::first_language_for_region)
            .map(str::to_string)
    });

    let language_confidence = evidence
        .top_detected_language()
        .map(|top| top.confidence)
        .filter(|confidence| *confidence != 0.0)
        .map(|confidence| round_to(confidence, 4));

    let labels = AudienceLabels::describe(primary_region.as_deref(), primary_language.as_deref());

    AudienceResult {
        primary_region,
        primary_region_name: labels.region_name,
        primary_language,
        primary_language_name: labels.language_name,
        likely_audience: labels.likely_audience,
        region_confidence,
        language_confidence,
        signal_breakdown: acc.breakdown(),
    }
}

fn score_tld(html: &HtmlSignals, acc: &mut ScoringAccumulator) {
    let region = html
        .tld()
        .map(str::to_ascii_lowercase)
        .and_then(|tld| tables::region_for_tld(&tld));

    match region {
        Some(region) => acc.add(region, TLD_WEIGHT),
        None => acc.miss(TLD_WEIGHT),
    }
}

/// Scores `<html lang>` and returns the declared language, if any.
///
/// Languages missing from the bare-code table (English among them) still set
/// the page language but name no region.
fn score_html_lang(html: &HtmlSignals, acc: &mut ScoringAccumulator) -> Option<String> {
    let Some(lang) = html.lang() else {
        acc.miss(HTML_LANG_REGION_WEIGHT);
        return None;
    };

    let tag = LocaleTag::parse(lang, &['-', '_']);
    if let Some(region) = &tag.region {
        acc.add(region, HTML_LANG_REGION_WEIGHT);
        return Some(lang.trim().to_ascii_lowercase());
    }

    match tables::region_for_language(&tag.language) {
        Some(region) => acc.add(region, HTML_LANG_BARE_WEIGHT),
        None => acc.miss(HTML_LANG_BARE_WEIGHT),
    }
    Some(tag.language)
}

fn score_locale(
    value: Option<&str>,
    separators: &[char],
    region_weight: f64,
    bare_weight: f64,
    acc: &mut ScoringAccumulator,
) {
    let Some(value) = value else {
        acc.miss(region_weight);
        return;
    };

    let tag = LocaleTag::parse(value, separators);
    if let Some(region) = &tag.region {
        acc.add(region, region_weight);
        return;
    }

    match tables::region_for_language(&tag.language) {
        Some(region) => acc.add(region, bare_weight),
        None => acc.miss(bare_weight),
    }
}

/// Scores the detector's top guess and returns its language.
///
/// Guesses at or below the confidence floor add nothing to any region but
/// still count their nominal weight.
fn score_detector(evidence: &Evidence, acc: &mut ScoringAccumulator) -> Option<String> {
    let Some(top) = evidence.top_detected_language() else {
        acc.miss(DETECTOR_WEIGHT);
        return None;
    };

    let language = top.lang.trim().to_ascii_lowercase();
    match tables::region_for_language(&language) {
        Some(region) if top.confidence > DETECTOR_MIN_CONFIDENCE => {
            acc.add(region, DETECTOR_WEIGHT * top.confidence)
        }
        _ => acc.miss(DETECTOR_WEIGHT),
    }

    Some(language)
}

fn score_ip(evidence: &Evidence, acc: &mut ScoringAccumulator) {
    let located = evidence
        .located_ip()
        .and_then(|geo| geo.country_code().map(|code| (geo, code)));

    let Some((geo, country)) = located else {
        acc.miss(IP_WEIGHT);
        return;
    };

    let weight = if tables::matches_provider(&geo.provider_text(), tables::SCORING_CDN_PROVIDERS) {
        CDN_IP_WEIGHT
    } else {
        IP_WEIGHT
    };
    acc.add(&country.to_ascii_uppercase(), weight);
}

/// Language and optional region parsed from a BCP-47 tag or POSIX locale.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LocaleTag {
    language: String,
    region: Option<String>,
}

impl LocaleTag {
    /// Script subtags such as `zh-Hans` are not regions; the tag then
    /// resolves through its bare language code.
    fn parse(raw: &str, separators: &[char]) -> Self {
        let lowered = raw.trim().to_ascii_lowercase();
        let mut parts = lowered.split(separators);
        let language = parts.next().unwrap_or_default().to_string();
        let region = parts
            .next()
            .filter(|subtag| is_region_subtag(subtag))
            .map(str::to_ascii_uppercase);

        Self { language, region }
    }
}

/// ISO 3166 alpha-2 or UN M.49 numeric region subtag.
fn is_region_subtag(subtag: &str) -> bool {
    (subtag.len() == 2 && subtag.chars().all(|c| c.is_ascii_alphabetic()))
        || (subtag.len() == 3 && subtag.chars().all(|c| c.is_ascii_digit()))
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_tag_reads_region_subtag() {
        let tag = LocaleTag::parse("zh-CN", &['-', '_']);
        assert_eq!(tag.language, "zh");
        assert_eq!(tag.region.as_deref(), Some("CN"));

        let tag = LocaleTag::parse("de_DE", &['_']);
        assert_eq!(tag.region.as_deref(), Some("DE"));
    }

    #[test]
    fn script_subtags_are_not_regions() {
        let tag = LocaleTag::parse("zh-Hans", &['-', '_']);
        assert_eq!(tag.language, "zh");
        assert!(tag.region.is_none());

        let tag = LocaleTag::parse("es-419", &['-']);
        assert_eq!(tag.region.as_deref(), Some("419"));
    }

    #[test]
    fn og_locale_only_splits_on_underscore() {
        let tag = LocaleTag::parse("de-DE", &['_']);
        assert_eq!(tag.language, "de-de");
        assert!(tag.region.is_none());
    }

    #[test]
    fn audience_labels_degrade_gracefully() {
        let both = AudienceLabels::describe(Some("JP"), Some("ja"));
        assert_eq!(both.likely_audience, "Japanese-speaking audience in Japan");

        let region_only = AudienceLabels::describe(Some("XX"), None);
        assert_eq!(region_only.likely_audience, "Audience in XX");

        let neither = AudienceLabels::describe(None, Some("en"));
        assert_eq!(neither.likely_audience, "Unknown");
    }

    #[test]
    fn round_to_handles_places() {
        assert_eq!(round_to(0.666_666, 2), 0.67);
        assert_eq!(round_to(1.23456, 3), 1.235);
    }
}
