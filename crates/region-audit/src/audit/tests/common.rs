use indexmap::IndexMap;

use crate::audit::evidence::{
    Evidence, ImageSample, InputField, IpGeolocation, LanguageDetection, PaymentMethodSignal,
};
use crate::audit::recommendations::{Category, Recommendation, Severity};
use crate::audit::scoring::AudienceResult;

pub(super) fn with_tld(tld: &str) -> Evidence {
    let mut evidence = Evidence::default();
    evidence.html_signals.tld = Some(tld.to_string());
    evidence
}

pub(super) fn with_lang(lang: &str) -> Evidence {
    let mut evidence = Evidence::default();
    evidence.html_signals.lang = Some(lang.to_string());
    evidence
}

pub(super) fn hosted_in(country: &str, isp: &str) -> IpGeolocation {
    IpGeolocation::located(country, isp, isp)
}

/// German storefront with every locale signal aligned.
pub(super) fn localized_german_store() -> Evidence {
    let mut evidence = Evidence::default();

    let html = &mut evidence.html_signals;
    html.lang = Some("de-DE".to_string());
    html.meta_locale = Some("de_DE".to_string());
    html.meta_language = Some("de".to_string());
    html.charset = Some("UTF-8".to_string());
    html.hreflang_tags = vec!["de".to_string(), "en".to_string(), "x-default".to_string()];
    html.tld = Some(".de".to_string());

    let content = &mut evidence.content_signals;
    content.currency_codes = vec!["EUR".to_string()];
    content.currency_symbols = vec!["€".to_string()];
    content.payment_methods = vec![PaymentMethodSignal {
        method: "Sofort".to_string(),
        region: "DE".to_string(),
    }];
    content.ux_signals.viewport = Some("width=device-width, initial-scale=1".to_string());
    content.ux_signals.inputs = vec![input("email", "email"), input("phone", "tel")];
    content.ux_signals.images = vec![image(Some("Logo")), image(Some("Produktfoto"))];

    evidence.ip_geolocation = Some(hosted_in("DE", "Hetzner Online GmbH"));
    evidence.language_detection = Some(LanguageDetection::detected("de", 0.98));
    evidence
}

/// Japanese shop: `.jp`, bare `ja`, local hosting and a confident detector.
pub(super) fn japanese_shop() -> Evidence {
    let mut evidence = with_tld(".jp");
    evidence.html_signals.lang = Some("ja".to_string());
    evidence.ip_geolocation = Some(hosted_in("JP", "Sakura Internet"));
    evidence.language_detection = Some(LanguageDetection::detected("ja", 0.99));
    evidence
}

pub(super) fn input(name: &str, kind: &str) -> InputField {
    InputField {
        name: Some(name.to_string()),
        input_type: Some(kind.to_string()),
    }
}

pub(super) fn image(alt: Option<&str>) -> ImageSample {
    ImageSample {
        alt: alt.map(str::to_string),
    }
}

pub(super) fn page_result(region: Option<&str>, language: Option<&str>, confidence: f64) -> AudienceResult {
    let mut breakdown = IndexMap::new();
    if let Some(region) = region {
        breakdown.insert(region.to_string(), confidence * 4.0);
    }

    AudienceResult {
        primary_region: region.map(str::to_string),
        primary_language: language.map(str::to_string),
        region_confidence: confidence,
        signal_breakdown: breakdown,
        ..AudienceResult::unknown()
    }
}

pub(super) fn in_category<'a>(
    recommendations: &'a [Recommendation],
    category: Category,
) -> Vec<&'a Recommendation> {
    recommendations
        .iter()
        .filter(|rec| rec.category == category)
        .collect()
}

pub(super) fn has(recommendations: &[Recommendation], category: Category, severity: Severity) -> bool {
    recommendations
        .iter()
        .any(|rec| rec.category == category && rec.severity == severity)
}
