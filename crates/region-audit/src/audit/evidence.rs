//! Per-page signal bag consumed by scoring and the localization audit.
//!
//! The shapes mirror what the extraction step emits as JSON. Every field is
//! defaulted so partial or empty objects deserialize cleanly, and failures
//! reported by collaborators (`{"error": "..."}`) surface as absent signals.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Evidence {
    pub html_signals: HtmlSignals,
    pub content_signals: ContentSignals,
    pub ip_geolocation: Option<IpGeolocation>,
    pub language_detection: Option<LanguageDetection>,
}

impl Evidence {
    /// Geolocation data, ignoring errored lookups.
    pub fn located_ip(&self) -> Option<&IpGeolocation> {
        self.ip_geolocation
            .as_ref()
            .filter(|geo| geo.country_code().is_some())
    }

    /// Highest-confidence detector result, ignoring errored detections.
    pub fn top_detected_language(&self) -> Option<&DetectedLanguage> {
        self.language_detection
            .as_ref()
            .and_then(LanguageDetection::top)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HtmlSignals {
    pub lang: Option<String>,
    pub meta_locale: Option<String>,
    pub meta_language: Option<String>,
    pub meta_geo_region: Option<String>,
    pub meta_geo_placename: Option<String>,
    pub charset: Option<String>,
    pub hreflang_tags: Vec<String>,
    pub tld: Option<String>,
}

impl HtmlSignals {
    pub fn lang(&self) -> Option<&str> {
        non_blank(&self.lang)
    }

    pub fn meta_locale(&self) -> Option<&str> {
        non_blank(&self.meta_locale)
    }

    pub fn meta_language(&self) -> Option<&str> {
        non_blank(&self.meta_language)
    }

    pub fn charset(&self) -> Option<&str> {
        non_blank(&self.charset)
    }

    pub fn tld(&self) -> Option<&str> {
        non_blank(&self.tld)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentSignals {
    pub currency_codes: Vec<String>,
    /// Symbol tokens; ambiguous symbols are encoded as e.g. `CNY/JPY`.
    pub currency_symbols: Vec<String>,
    /// Regions inferred from international phone prefixes.
    pub phone_formats: Vec<String>,
    pub social_media_signals: Vec<SocialMediaSignal>,
    pub payment_methods: Vec<PaymentMethodSignal>,
    pub spelling_counts: SpellingCounts,
    pub unit_counts: UnitCounts,
    pub ux_signals: UxSignals,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialMediaSignal {
    pub domain: String,
    pub region: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentMethodSignal {
    pub method: String,
    pub region: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellingCounts {
    #[serde(rename = "US")]
    pub us: u32,
    #[serde(rename = "UK")]
    pub uk: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitCounts {
    #[serde(rename = "Imperial")]
    pub imperial: u32,
    #[serde(rename = "Metric")]
    pub metric: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UxSignals {
    pub viewport: Option<String>,
    pub inputs: Vec<InputField>,
    pub images: Vec<ImageSample>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputField {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub input_type: Option<String>,
}

impl InputField {
    pub fn normalized_name(&self) -> String {
        self.name.as_deref().unwrap_or_default().to_lowercase()
    }

    /// Declared type, defaulting to `text` like browsers do.
    pub fn normalized_type(&self) -> String {
        self.input_type
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or("text")
            .to_lowercase()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSample {
    pub alt: Option<String>,
}

impl ImageSample {
    pub fn has_alt(&self) -> bool {
        self.alt.as_deref().is_some_and(|alt| !alt.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IpGeolocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IpGeolocation {
    pub fn located(country_code: &str, isp: &str, org: &str) -> Self {
        Self {
            country_code: Some(country_code.to_string()),
            isp: Some(isp.to_string()),
            org: Some(org.to_string()),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn country_code(&self) -> Option<&str> {
        if self.error.is_some() {
            return None;
        }
        non_blank(&self.country_code)
    }

    /// ISP and organisation joined for provider matching.
    pub fn provider_text(&self) -> String {
        format!(
            "{} {}",
            self.isp.as_deref().unwrap_or_default(),
            self.org.as_deref().unwrap_or_default()
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageDetection {
    /// Ordered by descending confidence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<DetectedLanguage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl LanguageDetection {
    pub fn detected(lang: &str, confidence: f64) -> Self {
        Self {
            results: vec![DetectedLanguage {
                lang: lang.to_string(),
                confidence,
            }],
            ..Self::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn top(&self) -> Option<&DetectedLanguage> {
        if self.error.is_some() {
            return None;
        }
        self.results.first().filter(|result| !result.lang.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectedLanguage {
    pub lang: String,
    pub confidence: f64,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
