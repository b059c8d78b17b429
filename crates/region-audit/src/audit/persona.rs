//! Rule-based persona fit: who the page is for, and how well it serves them.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::evidence::Evidence;
use super::scoring::{round_to, AudienceResult};

pub const UNKNOWN_AUDIENCE: &str = "Unknown audience";
pub const FIT_THRESHOLD: f64 = 7.0;
const MAX_SCORE: f64 = 10.0;
const LANG_BONUS: f64 = 0.4;
const CURRENCY_BONUS: f64 = 0.6;
const HREFLANG_BONUS: f64 = 0.4;
const PAYMENT_BONUS: f64 = 0.3;
const MAX_PAGE_SIGNALS: usize = 10;
const MAX_SITE_SIGNALS: usize = 20;
const MAX_SITE_TRAITS: usize = 10;
const CURRENCIES_LISTED: usize = 3;

const PRICE_KEYWORDS: &[&str] = &[
    "discount", "save", "value", "cheap", "budget", "deal", "价格", "便宜", "优惠", "性价比",
];
const MOBILE_KEYWORDS: &[&str] = &[
    "mobile", "app", "quick", "phone", "on-the-go", "手机", "移动", "快速",
];
const TRUST_KEYWORDS: &[&str] = &[
    "local", "trust", "review", "guarantee", "warranty", "本地", "当地", "信任", "评价", "保障",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudienceSource {
    UserInput,
    RuleBased,
}

impl AudienceSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::UserInput => "user_input",
            Self::RuleBased => "rule_based",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceResolution {
    pub source: AudienceSource,
    pub user_input: Option<String>,
    pub inferred_audience: Option<String>,
    pub final_audience: String,
}

/// Pick the audience to evaluate against: explicit input first, then the
/// scoring verdict, then a fixed placeholder.
pub fn resolve_target_audience(
    user_input: Option<&str>,
    result: &AudienceResult,
) -> AudienceResolution {
    if let Some(input) = user_input.map(str::trim).filter(|input| !input.is_empty()) {
        return AudienceResolution {
            source: AudienceSource::UserInput,
            user_input: Some(input.to_string()),
            inferred_audience: None,
            final_audience: input.to_string(),
        };
    }

    let inferred = Some(result.likely_audience.trim())
        .filter(|likely| !likely.is_empty())
        .unwrap_or(UNKNOWN_AUDIENCE)
        .to_string();

    AudienceResolution {
        source: AudienceSource::RuleBased,
        user_input: None,
        inferred_audience: Some(inferred.clone()),
        final_audience: inferred,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FocusAreas {
    pub price_sensitive: bool,
    pub mobile_first: bool,
    pub local_trust: bool,
}

impl FocusAreas {
    pub fn active(&self) -> Vec<&'static str> {
        [
            ("price_sensitive", self.price_sensitive),
            ("mobile_first", self.mobile_first),
            ("local_trust", self.local_trust),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaContext {
    pub source: AudienceSource,
    pub final_audience: String,
    pub focus_areas: FocusAreas,
}

impl PersonaContext {
    pub fn from_resolution(resolution: &AudienceResolution) -> Self {
        let lowered = resolution.final_audience.to_lowercase();
        let mentions = |keywords: &[&str]| keywords.iter().any(|kw| lowered.contains(kw));

        Self {
            source: resolution.source,
            final_audience: resolution.final_audience.clone(),
            focus_areas: FocusAreas {
                price_sensitive: mentions(PRICE_KEYWORDS),
                mobile_first: mentions(MOBILE_KEYWORDS),
                local_trust: mentions(TRUST_KEYWORDS),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalPersona {
    pub region_code: String,
    pub region_name: String,
    pub language: String,
    pub persona_label: String,
    pub traits: Vec<String>,
    pub motivations: Vec<String>,
    pub pain_points: Vec<String>,
    pub purchase_drivers: Vec<String>,
}

impl RegionalPersona {
    fn baseline(result: &AudienceResult, audience: &AudienceResolution) -> Self {
        let region_name = result
            .primary_region_name
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        let owned = |items: &[&str]| items.iter().map(|item| item.to_string()).collect();

        Self {
            region_code: result
                .primary_region
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            persona_label: format!("{region_name} {}", audience.final_audience),
            region_name,
            language: result
                .primary_language_name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            traits: owned(&[
                "Weighs price against perceived value",
                "Prefers clear shipping and returns information",
                "Tends to decide quickly on mobile",
            ]),
            motivations: owned(&[
                "Products and copy that fit their region",
                "Less uncertainty around payment and fulfilment",
            ]),
            pain_points: owned(&[
                "Inconsistent language or currency raises decision cost",
                "Too few local trust elements (reviews, guarantees, payment)",
            ]),
            purchase_drivers: owned(&[
                "Transparent pricing",
                "Local payment methods",
                "Fast delivery and clear after-sales support",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaFit {
    /// 0-10, one decimal.
    pub score: f64,
    pub is_fit: bool,
    pub matching_signals: Vec<String>,
    pub mismatch_signals: Vec<String>,
    pub summary: String,
}

impl PersonaFit {
    fn new(score: f64, matching: Vec<String>, mismatch: Vec<String>, scope: FitScope) -> Self {
        let is_fit = score >= FIT_THRESHOLD;
        let summary = match (scope, is_fit) {
            (FitScope::Page, true) => "The page matches this audience well.",
            (FitScope::Page, false) => {
                "The page has localization gaps for this audience; fix the key localization elements first."
            }
            (FitScope::Site, true) => "The site as a whole fits the target persona.",
            (FitScope::Site, false) => {
                "The site falls noticeably short of the target persona; prioritise the critical localization gaps."
            }
        };

        Self {
            score,
            is_fit,
            matching_signals: matching,
            mismatch_signals: mismatch,
            summary: summary.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FitScope {
    Page,
    Site,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaAnalysis {
    pub audience: AudienceResolution,
    pub regional_persona: RegionalPersona,
    pub persona_fit: PersonaFit,
}

/// Deterministic persona fit for one page.
pub fn build_persona_analysis(
    result: &AudienceResult,
    evidence: &Evidence,
    target_audience: Option<&str>,
) -> PersonaAnalysis {
    let audience = resolve_target_audience(target_audience, result);
    let html = &evidence.html_signals;
    let content = &evidence.content_signals;

    let mut score = clamp_score(round_to(result.region_confidence * 10.0, 1));
    let mut matching = Vec::new();
    let mut mismatch = Vec::new();

    match html.lang() {
        Some(lang) => {
            matching.push(format!("Page language declared: {lang}"));
            score += LANG_BONUS;
        }
        None => mismatch.push("No <html lang> declared, so the language target is unclear".to_string()),
    }

    let currencies: IndexSet<&str> = content
        .currency_symbols
        .iter()
        .chain(&content.currency_codes)
        .map(|currency| currency.trim())
        .filter(|currency| !currency.is_empty())
        .collect();
    if !currencies.is_empty() {
        let listed: Vec<&str> = currencies.iter().copied().take(CURRENCIES_LISTED).collect();
        matching.push(format!("Currency signals detected: {}", listed.join(", ")));
        score += CURRENCY_BONUS;
    }

    if html.hreflang_tags.is_empty() {
        mismatch.push("No hreflang tags, so multi-region audience coverage is unclear".to_string());
    } else {
        matching.push("hreflang tags present, supporting multi-region targeting".to_string());
        score += HREFLANG_BONUS;
    }

    if content.payment_methods.is_empty() {
        mismatch.push("No visible local payment method signals".to_string());
    } else {
        matching.push("Local payment method signals detected".to_string());
        score += PAYMENT_BONUS;
    }

    let score = clamp_score(round_to(score, 1));
    matching.truncate(MAX_PAGE_SIGNALS);
    mismatch.truncate(MAX_PAGE_SIGNALS);

    PersonaAnalysis {
        regional_persona: RegionalPersona::baseline(result, &audience),
        audience,
        persona_fit: PersonaFit::new(score, matching, mismatch, FitScope::Page),
    }
}

/// Combine per-page persona analyses; the first page supplies the persona.
pub fn aggregate_persona_analysis(pages: &[PersonaAnalysis]) -> Option<PersonaAnalysis> {
    let first = pages.first()?;

    let source = if pages
        .iter()
        .any(|page| page.audience.source == AudienceSource::UserInput)
    {
        AudienceSource::UserInput
    } else {
        AudienceSource::RuleBased
    };

    let audience_value = pages
        .iter()
        .map(|page| page.audience.final_audience.as_str())
        .find(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_AUDIENCE)
        .to_string();

    let mean = pages.iter().map(|page| page.persona_fit.score).sum::<f64>() / pages.len() as f64;
    let score = round_to(mean, 1);

    let traits = dedup_capped(
        pages.iter().flat_map(|page| &page.regional_persona.traits),
        MAX_SITE_TRAITS,
    );
    let matching = dedup_capped(
        pages.iter().flat_map(|page| &page.persona_fit.matching_signals),
        MAX_SITE_SIGNALS,
    );
    let mismatch = dedup_capped(
        pages.iter().flat_map(|page| &page.persona_fit.mismatch_signals),
        MAX_SITE_SIGNALS,
    );

    Some(PersonaAnalysis {
        audience: AudienceResolution {
            source,
            user_input: None,
            inferred_audience: Some(audience_value.clone()),
            final_audience: audience_value,
        },
        regional_persona: RegionalPersona {
            traits,
            ..first.regional_persona.clone()
        },
        persona_fit: PersonaFit::new(score, matching, mismatch, FitScope::Site),
    })
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, MAX_SCORE)
}

fn dedup_capped<'a>(items: impl Iterator<Item = &'a String>, cap: usize) -> Vec<String> {
    items
        .filter(|item| !item.is_empty())
        .collect::<IndexSet<_>>()
        .into_iter()
        .take(cap)
        .cloned()
        .collect()
}
