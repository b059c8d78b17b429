use std::collections::BTreeSet;

use super::{Category, Recommendation, Severity};
use crate::audit::evidence::{ContentSignals, Evidence, HtmlSignals};
use crate::audit::scoring::AudienceResult;
use crate::audit::tables::{self, base_language};

/// Detector confidence above which a mismatch with `<html lang>` is reported.
const LOCALE_MISMATCH_MIN_CONFIDENCE: f64 = 0.7;
const MAX_SAMPLED_IMAGES: usize = 20;
const MAX_MISSING_MAJOR_MARKETS: usize = 7;
const X_DEFAULT: &str = "x-default";

pub(super) type Rule = fn(&AuditContext<'_>, &mut Vec<Recommendation>);

/// Rule groups in evaluation order.
pub(super) const RULES: &[Rule] = &[
    hreflang_audit,
    locale_declarations,
    locale_consistency,
    tld_content_mismatch,
    hosting_alignment,
    charset,
    local_currency,
    regional_social_platforms,
    local_payment_methods,
    spelling_variant,
    measurement_units,
    mobile_viewport,
    form_input_types,
    image_alt_text,
    market_coverage,
];

pub(super) struct AuditContext<'a> {
    evidence: &'a Evidence,
    html: &'a HtmlSignals,
    content: &'a ContentSignals,
    primary_region: Option<&'a str>,
    primary_language: Option<&'a str>,
}

impl<'a> AuditContext<'a> {
    pub(super) fn new(evidence: &'a Evidence, result: &'a AudienceResult) -> Self {
        Self {
            evidence,
            html: &evidence.html_signals,
            content: &evidence.content_signals,
            primary_region: result.primary_region.as_deref().filter(|r| !r.is_empty()),
            primary_language: result.primary_language.as_deref().filter(|l| !l.is_empty()),
        }
    }

    fn hreflang_tags(&self) -> impl Iterator<Item = &'a str> {
        self.html
            .hreflang_tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
    }

    fn target_name(&self) -> Option<String> {
        self.primary_region.map(tables::country_name)
    }
}

fn hreflang_audit(ctx: &AuditContext<'_>, out: &mut Vec<Recommendation>) {
    let tags: Vec<&str> = ctx.hreflang_tags().collect();

    if tags.is_empty() {
        out.push(
            Recommendation::new(
                Severity::Critical,
                Category::Hreflang,
                "No hreflang tags found. Search engines cannot identify alternate language/region versions of this page.",
                "Add <link rel=\"alternate\" hreflang=\"...\"> tags for every language/region variant of the page so each market is served its own version and duplicate-content penalties are avoided.",
            )
            .with_example(
                "<link rel=\"alternate\" hreflang=\"en\" href=\"https://example.com/en/\" />\n\
                 <link rel=\"alternate\" hreflang=\"de\" href=\"https://example.com/de/\" />\n\
                 <link rel=\"alternate\" hreflang=\"ja\" href=\"https://example.com/ja/\" />\n\
                 <link rel=\"alternate\" hreflang=\"x-default\" href=\"https://example.com/\" />",
            ),
        );
        return;
    }

    if !tags.iter().any(|tag| tag.eq_ignore_ascii_case(X_DEFAULT)) {
        out.push(
            Recommendation::new(
                Severity::Critical,
                Category::Hreflang,
                "hreflang tags exist but \"x-default\" is missing. Visitors from unmatched regions have no fallback page.",
                "Add an x-default hreflang tag pointing at the default page (usually English or a language selector) so search engines know what to show in regions no other tag covers.",
            )
            .with_example(
                "<link rel=\"alternate\" hreflang=\"x-default\" href=\"https://example.com/\" />",
            ),
        );
    }

    if let Some(language) = ctx.primary_language {
        let own_base = base_language(language);
        let has_self_reference = tags
            .iter()
            .filter(|tag| !tag.eq_ignore_ascii_case(X_DEFAULT))
            .any(|tag| base_language(tag) == own_base);

        if !has_self_reference {
            out.push(
                Recommendation::new(
                    Severity::Warning,
                    Category::Hreflang,
                    format!(
                        "Current page language \"{language}\" has no matching self-referencing hreflang tag. Found hreflangs: {}.",
                        tags.join(", ")
                    ),
                    "Include a self-referencing hreflang tag for the page's own language/region to confirm which version this page represents.",
                )
                .with_example(format!(
                    "<link rel=\"alternate\" hreflang=\"{language}\" href=\"[this page URL]\" />"
                )),
            );
        }
    }
}

fn locale_declarations(ctx: &AuditContext<'_>, out: &mut Vec<Recommendation>) {
    if ctx.html.lang().is_none() {
        out.push(
            Recommendation::new(
                Severity::Critical,
                Category::LocaleDeclaration,
                "Missing <html lang=\"...\"> attribute. Browsers and screen readers cannot determine the page language.",
                "Add a lang attribute to the <html> element that reflects the language of this page variant.",
            )
            .with_example("<html lang=\"en\">  <!-- or \"de\", \"ja\", \"zh-CN\", etc. -->"),
        );
    }

    if ctx.html.meta_locale().is_none() {
        out.push(
            Recommendation::new(
                Severity::Warning,
                Category::LocaleDeclaration,
                "Missing og:locale meta tag. Social platforms cannot determine the content locale when the page is shared.",
                "Add og:locale for correct social card rendering, plus og:locale:alternate for the other locales the site offers.",
            )
            .with_example(
                "<meta property=\"og:locale\" content=\"en_US\" />\n\
                 <meta property=\"og:locale:alternate\" content=\"de_DE\" />\n\
                 <meta property=\"og:locale:alternate\" content=\"ja_JP\" />",
            ),
        );
    }

    if ctx.html.meta_language().is_none() {
        out.push(
            Recommendation::new(
                Severity::Info,
                Category::LocaleDeclaration,
                "No content-language meta tag found. It is a weaker signal than <html lang> but still helps crawlers.",
                "Consider adding a content-language meta tag, especially when the server does not send a Content-Language header.",
            )
            .with_example("<meta http-equiv=\"content-language\" content=\"en\" />"),
        );
    }
}

fn locale_consistency(ctx: &AuditContext<'_>, out: &mut Vec<Recommendation>) {
    let declared: Vec<(&str, String)> = [
        ("html lang", ctx.html.lang()),
        ("og:locale", ctx.html.meta_locale()),
        ("content-language", ctx.html.meta_language()),
    ]
    .into_iter()
    .filter_map(|(source, value)| value.map(|value| (source, base_language(value))))
    .collect();

    let distinct: BTreeSet<&str> = declared.iter().map(|(_, base)| base.as_str()).collect();
    if distinct.len() > 1 {
        let detail = declared
            .iter()
            .map(|(source, base)| format!("{source}=\"{base}\""))
            .collect::<Vec<_>>()
            .join(", ");
        out.push(
            Recommendation::new(
                Severity::Critical,
                Category::LocaleConsistency,
                format!("Conflicting language declarations detected: {detail}. Search engines receive mixed signals."),
                "Make every locale declaration agree on the same language for each page variant; conflicting signals can get the page indexed for the wrong region.",
            )
            .with_example(
                "<!-- All three should agree -->\n\
                 <html lang=\"de\">\n\
                 <meta property=\"og:locale\" content=\"de_DE\" />\n\
                 <meta http-equiv=\"content-language\" content=\"de\" />",
            ),
        );
    }

    let (Some(lang), Some(top)) = (ctx.html.lang(), ctx.evidence.top_detected_language()) else {
        return;
    };
    let detected = top.lang.trim().to_ascii_lowercase();
    if detected != base_language(lang) && top.confidence > LOCALE_MISMATCH_MIN_CONFIDENCE {
        out.push(Recommendation::new(
            Severity::Warning,
            Category::LocaleConsistency,
            format!(
                "Declared language \"{lang}\" does not match detected content language \"{detected}\" (confidence: {:.1}%). The page content may be in a different language than declared.",
                top.confidence * 100.0
            ),
            "Verify the content matches the declared language. Mixed-language pages should declare their dominant language in <html lang>.",
        ));
    }
}

fn tld_content_mismatch(ctx: &AuditContext<'_>, out: &mut Vec<Recommendation>) {
    let Some(tld) = ctx.html.tld() else {
        return;
    };
    let Some(tld_region) = tables::region_for_tld(&tld.to_ascii_lowercase()) else {
        return;
    };
    let Some(language) = ctx.primary_language else {
        return;
    };

    let mut expected = tables::languages_for_region(tld_region);
    expected.sort_unstable();
    let base = base_language(language);

    // English on a ccTLD is ordinary cross-border practice.
    if expected.is_empty() || base == "en" || expected.contains(&base.as_str()) {
        return;
    }

    let expected_names = expected
        .iter()
        .map(|code| tables::language_name(code))
        .collect::<Vec<_>>()
        .join(", ");
    out.push(
        Recommendation::new(
            Severity::Warning,
            Category::TldContentMismatch,
            format!(
                "Country-code TLD \"{tld}\" suggests {}, but page content is primarily in {}. Expected language(s) for this TLD: {expected_names}.",
                tables::country_name(tld_region),
                tables::language_name(&base),
            ),
            "Serve content in the local language on a ccTLD, or mark this page as an alternate-language version with hreflang. A gTLD with per-market subdirectories suits multi-region targeting better when content does not match the ccTLD.",
        )
        .with_example(format!(
            "<!-- Option A: serve local content on the ccTLD -->\n\
             <!-- {tld} domain -> provide {expected_names} content -->\n\n\
             <!-- Option B: gTLD with subdirectories -->\n\
             <!-- example.com/de/ for German, example.com/en/ for English -->"
        )),
    );
}

fn hosting_alignment(ctx: &AuditContext<'_>, out: &mut Vec<Recommendation>) {
    let Some(geo) = ctx.evidence.located_ip() else {
        return;
    };
    let (Some(server_region), Some(target_region)) = (geo.country_code(), ctx.primary_region)
    else {
        return;
    };
    let server_region = server_region.to_ascii_uppercase();
    let behind_cdn = tables::matches_provider(&geo.provider_text(), tables::HOSTING_CDN_PROVIDERS);

    if behind_cdn {
        out.push(Recommendation::new(
            Severity::Info,
            Category::HostingAlignment,
            format!(
                "CDN detected ({}). Server resolved to {} but content is likely served from edge nodes worldwide.",
                geo.org.as_deref().filter(|org| !org.is_empty()).unwrap_or("unknown"),
                tables::country_name(&server_region),
            ),
            "CDN is configured for cross-border delivery. No action needed.",
        ));
    } else if server_region != target_region {
        out.push(Recommendation::new(
            Severity::Warning,
            Category::HostingAlignment,
            format!(
                "Server is hosted in {} ({server_region}) but the target audience is in {} ({target_region}). No CDN detected, so target users may see higher latency.",
                tables::country_name(&server_region),
                tables::country_name(target_region),
            ),
            "Serve content through a CDN (Cloudflare, AWS CloudFront, Fastly) with edge nodes near the target audience; page speed directly affects cross-border conversion.",
        ));
    }
}

fn charset(ctx: &AuditContext<'_>, out: &mut Vec<Recommendation>) {
    let Some(charset) = ctx.html.charset() else {
        out.push(
            Recommendation::new(
                Severity::Warning,
                Category::Charset,
                "No charset declaration found. Multilingual content (especially CJK, Arabic, Cyrillic) may render incorrectly.",
                "Declare UTF-8 as the first element in <head> so every script on the page is parsed correctly.",
            )
            .with_example("<meta charset=\"UTF-8\">"),
        );
        return;
    };

    let normalized = charset.to_ascii_lowercase().replace('-', "");
    if normalized != "utf8" && normalized != "utf16" {
        out.push(
            Recommendation::new(
                Severity::Warning,
                Category::Charset,
                format!("Charset is \"{charset}\" instead of UTF-8. Legacy encodings cannot represent every script multilingual content needs."),
                "Migrate to UTF-8: update the meta tag and make the server send Content-Type: text/html; charset=UTF-8.",
            )
            .with_example("<meta charset=\"UTF-8\">"),
        );
    }
}

fn local_currency(ctx: &AuditContext<'_>, out: &mut Vec<Recommendation>) {
    let Some(region) = ctx.primary_region else {
        return;
    };
    let Some(expected) = tables::expected_currencies(region) else {
        return;
    };

    let codes: Vec<&str> = ctx
        .content
        .currency_codes
        .iter()
        .map(|code| code.trim())
        .filter(|code| !code.is_empty())
        .collect();
    let symbols = ctx.content.currency_symbols.iter().map(|symbol| symbol.trim());
    let mut found = codes.iter().copied().chain(symbols);
    let shows_local = found.any(|currency| expected.contains(&currency));

    if !shows_local && !codes.is_empty() {
        out.push(Recommendation::new(
            Severity::Warning,
            Category::MarketAdaptation,
            format!(
                "Page targets {} but does not display local currency ({}). Found currencies: {}. Shoppers expect prices in their own currency.",
                tables::country_name(region),
                expected.join(", "),
                codes.join(", "),
            ),
            "Display prices in each market's local currency, via a currency switcher or region-based conversion; at minimum show the local price next to the base price.",
        ));
    }
}

fn regional_social_platforms(ctx: &AuditContext<'_>, out: &mut Vec<Recommendation>) {
    let (Some(region), Some(target)) = (ctx.primary_region, ctx.target_name()) else {
        return;
    };
    let Some(expected) = tables::expected_social_platforms(region) else {
        return;
    };

    let missing: Vec<&str> = expected
        .iter()
        .copied()
        .filter(|platform| {
            !ctx.content
                .social_media_signals
                .iter()
                .any(|signal| signal.domain == *platform)
        })
        .collect();

    if !missing.is_empty() {
        out.push(Recommendation::new(
            Severity::Info,
            Category::MarketAdaptation,
            format!(
                "Page targets {target} but does not link to key regional social platforms: {}. These platforms dominate the target market.",
                missing.join(", ")
            ),
            format!(
                "For {target} market penetration, establish a presence on the regional platforms and link to them for region-appropriate sharing and trust."
            ),
        ));
    }
}

fn local_payment_methods(ctx: &AuditContext<'_>, out: &mut Vec<Recommendation>) {
    let (Some(region), Some(target)) = (ctx.primary_region, ctx.target_name()) else {
        return;
    };
    let Some(expected) = tables::expected_payment_methods(region) else {
        return;
    };

    let offers_local = ctx
        .content
        .payment_methods
        .iter()
        .any(|signal| signal.region == region);

    if !offers_local {
        out.push(Recommendation::new(
            Severity::Info,
            Category::MarketAdaptation,
            format!(
                "Page targets {target} but does not mention popular local payment methods ({}). Trust signals are crucial for conversion.",
                expected.join(", ")
            ),
            format!(
                "Offer {target}-specific payment options and show their logos; shoppers there strongly prefer local methods over generic card payments."
            ),
        ));
    }
}

fn spelling_variant(ctx: &AuditContext<'_>, out: &mut Vec<Recommendation>) {
    let Some(region) = ctx.primary_region else {
        return;
    };
    let counts = ctx.content.spelling_counts;

    if tables::US_SPELLING_REGIONS.contains(&region) && counts.uk > counts.us && counts.uk > 0 {
        out.push(Recommendation::new(
            Severity::Info,
            Category::CulturalAdaptation,
            format!("Page targets {region} but uses British spelling variants (e.g. colour, centre) more often than American ones."),
            "Localize spelling to match the target audience (American English).",
        ));
    } else if tables::UK_SPELLING_REGIONS.contains(&region)
        && counts.us > counts.uk
        && counts.us > 0
    {
        out.push(Recommendation::new(
            Severity::Info,
            Category::CulturalAdaptation,
            format!("Page targets {region} but uses American spelling variants (e.g. color, center) more often than British ones."),
            "Localize spelling to match the target audience (British/Commonwealth English).",
        ));
    }
}

fn measurement_units(ctx: &AuditContext<'_>, out: &mut Vec<Recommendation>) {
    let Some(region) = ctx.primary_region else {
        return;
    };
    let units = ctx.content.unit_counts;

    if region == "US" && units.metric > units.imperial && units.metric > 0 {
        out.push(Recommendation::new(
            Severity::Info,
            Category::CulturalAdaptation,
            "Page targets US but uses metric units (cm, kg) more often than imperial units (inch, lbs).",
            "Show product dimensions and weights in imperial units (or both) for US customers.",
        ));
    } else if !tables::IMPERIAL_REGIONS.contains(&region)
        && units.imperial > units.metric
        && units.imperial > 0
    {
        out.push(Recommendation::new(
            Severity::Info,
            Category::CulturalAdaptation,
            format!(
                "Page targets {} but uses imperial units (inch, lbs) more often than metric units.",
                tables::country_name(region)
            ),
            "Show product dimensions and weights in metric units (cm, kg) for this market.",
        ));
    }
}

fn mobile_viewport(ctx: &AuditContext<'_>, out: &mut Vec<Recommendation>) {
    const RESPONSIVE_VIEWPORT: &str =
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">";

    let viewport = ctx
        .content
        .ux_signals
        .viewport
        .as_deref()
        .map(str::trim)
        .filter(|viewport| !viewport.is_empty());

    let Some(viewport) = viewport else {
        out.push(
            Recommendation::new(
                Severity::Critical,
                Category::UxMobile,
                "No viewport meta tag found. The site will not render correctly on mobile devices.",
                "Add a viewport meta tag to make the layout responsive.",
            )
            .with_example(RESPONSIVE_VIEWPORT),
        );
        return;
    };

    let lowered = viewport.to_ascii_lowercase();
    if !lowered.contains("width=device-width") && !lowered.contains("initial-scale=1") {
        out.push(
            Recommendation::new(
                Severity::Warning,
                Category::UxMobile,
                format!("Viewport meta tag exists (\"{viewport}\") but may not be configured for responsive design."),
                "Set the viewport to \"width=device-width, initial-scale=1\".",
            )
            .with_example(RESPONSIVE_VIEWPORT),
        );
    }
}

fn form_input_types(ctx: &AuditContext<'_>, out: &mut Vec<Recommendation>) {
    let inputs = &ctx.content.ux_signals.inputs;

    let email = inputs
        .iter()
        .map(|input| (input.normalized_name(), input.normalized_type()))
        .find(|(name, kind)| name.contains("email") && kind != "email");
    if let Some((name, kind)) = email {
        out.push(
            Recommendation::new(
                Severity::Info,
                Category::UxForms,
                format!("Input field \"{name}\" uses type=\"{kind}\" instead of type=\"email\"."),
                "Use type=\"email\" so mobile devices show the keyboard with the @ symbol.",
            )
            .with_example("<input type=\"email\" name=\"email\" ...>"),
        );
    }

    let phone = inputs
        .iter()
        .map(|input| (input.normalized_name(), input.normalized_type()))
        .find(|(name, kind)| {
            ["phone", "tel", "mobile"]
                .iter()
                .any(|hint| name.contains(hint))
                && kind != "tel"
        });
    if let Some((name, kind)) = phone {
        out.push(
            Recommendation::new(
                Severity::Info,
                Category::UxForms,
                format!("Input field \"{name}\" uses type=\"{kind}\" instead of type=\"tel\"."),
                "Use type=\"tel\" so mobile devices show the numeric keypad.",
            )
            .with_example("<input type=\"tel\" name=\"phone\" ...>"),
        );
    }
}

fn image_alt_text(ctx: &AuditContext<'_>, out: &mut Vec<Recommendation>) {
    let sampled: Vec<_> = ctx
        .content
        .ux_signals
        .images
        .iter()
        .take(MAX_SAMPLED_IMAGES)
        .collect();
    if sampled.is_empty() {
        return;
    }

    let missing = sampled.iter().filter(|image| !image.has_alt()).count();
    if missing > 0 && missing * 2 > sampled.len() {
        out.push(
            Recommendation::new(
                Severity::Warning,
                Category::Accessibility,
                format!("{missing}/{} sampled images are missing \"alt\" text.", sampled.len()),
                "Add descriptive alt text to images for screen readers and image search.",
            )
            .with_example("<img src=\"...\" alt=\"Description of image\">"),
        );
    }
}

fn market_coverage(ctx: &AuditContext<'_>, out: &mut Vec<Recommendation>) {
    let tags: Vec<&str> = ctx.hreflang_tags().collect();
    if tags.len() < 2 {
        return;
    }

    let covered: BTreeSet<String> = tags
        .iter()
        .filter(|tag| !tag.eq_ignore_ascii_case(X_DEFAULT))
        .map(|tag| base_language(tag))
        .collect();

    let missing: Vec<String> = tables::MAJOR_MARKETS
        .iter()
        .filter(|market| !covered.contains(**market))
        .map(|market| tables::language_name(market))
        .collect();

    if missing.is_empty() || missing.len() > MAX_MISSING_MAJOR_MARKETS {
        return;
    }

    let covered_names = covered
        .iter()
        .map(|code| tables::language_name(code))
        .collect::<Vec<_>>()
        .join(", ");
    out.push(Recommendation::new(
        Severity::Info,
        Category::MarketCoverage,
        format!(
            "Site covers {} language(s) via hreflang ({covered_names}). Major markets not covered: {}.",
            covered.len(),
            missing.join(", ")
        ),
        "Expand into further major markets based on traffic data and business goals, each with properly localized rather than machine-translated content.",
    ));
}
