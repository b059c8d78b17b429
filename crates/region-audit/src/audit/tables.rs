//! Static lookup tables shared by scoring, recommendations and persona fit.
//!
//! Tables are ordered slices rather than hash maps so that "first match"
//! lookups (reverse language lookup, tie-breaking) are deterministic.

/// Country-code TLD to ISO region.
pub const TLD_REGIONS: &[(&str, &str)] = &[
    (".cn", "CN"), (".de", "DE"), (".jp", "JP"), (".uk", "GB"), (".fr", "FR"), (".ru", "RU"),
    (".br", "BR"), (".in", "IN"), (".kr", "KR"), (".au", "AU"), (".ca", "CA"), (".it", "IT"),
    (".es", "ES"), (".nl", "NL"), (".se", "SE"), (".no", "NO"), (".dk", "DK"), (".fi", "FI"),
    (".pl", "PL"), (".tr", "TR"), (".id", "ID"), (".vn", "VN"), (".th", "TH"), (".my", "MY"),
    (".sg", "SG"), (".ph", "PH"), (".mx", "MX"), (".ar", "AR"), (".cl", "CL"), (".co", "CO"),
    (".za", "ZA"), (".eg", "EG"), (".sa", "SA"), (".ae", "AE"), (".il", "IL"), (".nz", "NZ"),
    (".ie", "IE"), (".ch", "CH"), (".at", "AT"), (".be", "BE"), (".pt", "PT"), (".gr", "GR"),
    (".cz", "CZ"), (".hu", "HU"), (".ro", "RO"), (".ua", "UA"), (".tw", "TW"), (".hk", "HK"),
];

/// Bare language code to its default region.
///
/// English is intentionally absent: it is spoken too widely to imply a
/// single market.
pub const LANGUAGE_REGIONS: &[(&str, &str)] = &[
    ("zh", "CN"), ("ja", "JP"), ("ko", "KR"), ("de", "DE"), ("fr", "FR"), ("ru", "RU"),
    ("pt", "BR"), ("it", "IT"), ("es", "ES"), ("nl", "NL"), ("pl", "PL"), ("tr", "TR"),
    ("vi", "VN"), ("th", "TH"), ("id", "ID"), ("ms", "MY"), ("tl", "PH"), ("ar", "SA"),
    ("he", "IL"), ("hi", "IN"), ("bn", "BD"), ("uk", "UA"), ("cs", "CZ"), ("hu", "HU"),
    ("ro", "RO"), ("el", "GR"), ("sv", "SE"), ("no", "NO"), ("da", "DK"), ("fi", "FI"),
    ("fa", "IR"), ("sw", "KE"),
];

pub const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("CN", "China"), ("US", "United States"), ("DE", "Germany"), ("JP", "Japan"),
    ("GB", "United Kingdom"), ("FR", "France"), ("RU", "Russia"), ("BR", "Brazil"),
    ("IN", "India"), ("KR", "South Korea"), ("AU", "Australia"), ("CA", "Canada"),
    ("IT", "Italy"), ("ES", "Spain"), ("NL", "Netherlands"), ("SE", "Sweden"),
    ("NO", "Norway"), ("DK", "Denmark"), ("FI", "Finland"), ("PL", "Poland"),
    ("TR", "Turkey"), ("ID", "Indonesia"), ("VN", "Vietnam"), ("TH", "Thailand"),
    ("MY", "Malaysia"), ("SG", "Singapore"), ("PH", "Philippines"), ("MX", "Mexico"),
    ("AR", "Argentina"), ("CL", "Chile"), ("CO", "Colombia"), ("ZA", "South Africa"),
    ("EG", "Egypt"), ("SA", "Saudi Arabia"), ("AE", "UAE"), ("IL", "Israel"),
    ("NZ", "New Zealand"), ("IE", "Ireland"), ("CH", "Switzerland"), ("AT", "Austria"),
    ("BE", "Belgium"), ("PT", "Portugal"), ("GR", "Greece"), ("CZ", "Czech Republic"),
    ("HU", "Hungary"), ("RO", "Romania"), ("UA", "Ukraine"), ("TW", "Taiwan"),
    ("HK", "Hong Kong"), ("BD", "Bangladesh"), ("IR", "Iran"), ("KE", "Kenya"),
    ("EU", "European Union"),
];

pub const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("en", "English"), ("zh", "Chinese"), ("zh-cn", "Simplified Chinese"),
    ("zh-tw", "Traditional Chinese"), ("ja", "Japanese"), ("ko", "Korean"),
    ("de", "German"), ("fr", "French"), ("es", "Spanish"), ("pt", "Portuguese"),
    ("ru", "Russian"), ("ar", "Arabic"), ("hi", "Hindi"), ("it", "Italian"),
    ("nl", "Dutch"), ("pl", "Polish"), ("tr", "Turkish"), ("vi", "Vietnamese"),
    ("th", "Thai"), ("id", "Indonesian"), ("ms", "Malay"), ("sv", "Swedish"),
    ("no", "Norwegian"), ("da", "Danish"), ("fi", "Finnish"), ("he", "Hebrew"),
    ("uk", "Ukrainian"), ("cs", "Czech"), ("hu", "Hungarian"), ("ro", "Romanian"),
    ("el", "Greek"), ("fa", "Persian"), ("bn", "Bengali"), ("tl", "Filipino"),
];

/// ISO currency code to the region it signals. `EUR` maps to the EU as a whole.
pub const CURRENCY_REGIONS: &[(&str, &str)] = &[
    ("USD", "US"), ("EUR", "EU"), ("CNY", "CN"), ("RMB", "CN"), ("GBP", "GB"), ("JPY", "JP"),
    ("INR", "IN"), ("RUB", "RU"), ("BRL", "BR"), ("KRW", "KR"), ("AUD", "AU"), ("CAD", "CA"),
    ("CHF", "CH"), ("HKD", "HK"), ("SGD", "SG"), ("SEK", "SE"), ("NOK", "NO"), ("DKK", "DK"),
    ("PLN", "PL"), ("TRY", "TR"), ("THB", "TH"), ("IDR", "ID"), ("MYR", "MY"), ("PHP", "PH"),
    ("VND", "VN"), ("MXN", "MX"), ("ZAR", "ZA"), ("ILS", "IL"), ("SAR", "SA"), ("AED", "AE"),
];

/// Local currencies a page targeting the region is expected to display.
pub const REGION_CURRENCIES: &[(&str, &[&str])] = &[
    ("US", &["USD"]), ("GB", &["GBP"]), ("EU", &["EUR"]), ("DE", &["EUR"]), ("FR", &["EUR"]),
    ("IT", &["EUR"]), ("ES", &["EUR"]), ("NL", &["EUR"]), ("BE", &["EUR"]), ("AT", &["EUR"]),
    ("PT", &["EUR"]), ("GR", &["EUR"]), ("FI", &["EUR"]), ("IE", &["EUR"]),
    ("JP", &["JPY"]), ("CN", &["CNY", "RMB"]), ("KR", &["KRW"]), ("IN", &["INR"]),
    ("BR", &["BRL"]), ("RU", &["RUB"]), ("AU", &["AUD"]), ("CA", &["CAD"]),
    ("MX", &["MXN"]), ("TH", &["THB"]), ("VN", &["VND"]), ("ID", &["IDR"]),
    ("MY", &["MYR"]), ("PH", &["PHP"]), ("SG", &["SGD"]), ("HK", &["HKD"]),
    ("SE", &["SEK"]), ("NO", &["NOK"]), ("DK", &["DKK"]), ("PL", &["PLN"]),
    ("TR", &["TRY"]), ("CH", &["CHF"]), ("ZA", &["ZAR"]), ("SA", &["SAR"]),
    ("AE", &["AED"]), ("IL", &["ILS"]), ("TW", &["TWD"]),
];

/// Social platforms that dominate the region.
pub const REGION_SOCIAL_PLATFORMS: &[(&str, &[&str])] = &[
    ("CN", &["weixin.qq.com", "weibo.com", "douyin.com"]),
    ("RU", &["vk.com", "ok.ru"]),
    ("JP", &["line.me"]),
    ("KR", &["kakaotalk.com", "naver.com"]),
];

/// Payment methods shoppers in the region expect to see offered.
pub const REGION_PAYMENT_METHODS: &[(&str, &[&str])] = &[
    ("NL", &["iDEAL"]),
    ("DE", &["Sofort", "Giropay", "Klarna", "SEPA", "Rechnung"]),
    ("AT", &["EPS"]),
    ("PL", &["BLIK", "Przelewy24"]),
    ("BR", &["Pix", "Boleto"]),
    ("BE", &["Bancontact"]),
    ("CN", &["Alipay", "WeChat Pay", "UnionPay"]),
    ("JP", &["Konbini", "JCB", "PayPay"]),
    ("RU", &["Mir", "Yandex"]),
    ("IN", &["UPI", "RuPay", "Paytm"]),
    ("SE", &["Swish"]),
    ("CH", &["TWINT"]),
];

/// Languages with the largest online shopping populations.
pub const MAJOR_MARKETS: &[&str] = &["en", "zh", "ja", "ko", "de", "fr", "es", "pt", "ru", "ar"];

/// Providers whose edge IPs say little about the target market.
pub const SCORING_CDN_PROVIDERS: &[&str] = &[
    "cloudflare", "akamai", "fastly", "cloudfront", "twitter",
    "edgecast", "stackpath", "incapsula", "sucuri",
];

/// Providers treated as globally distributed hosting by the alignment audit.
pub const HOSTING_CDN_PROVIDERS: &[&str] = &[
    "cloudflare", "akamai", "fastly", "cloudfront", "edgecast",
    "stackpath", "incapsula", "sucuri", "google", "microsoft", "amazon",
];

/// Regions that still default to imperial units.
pub const IMPERIAL_REGIONS: &[&str] = &["US", "LR", "MM"];

/// Regions whose audience expects American spelling.
pub const US_SPELLING_REGIONS: &[&str] = &["US", "PH"];

/// Regions whose audience expects British/Commonwealth spelling.
pub const UK_SPELLING_REGIONS: &[&str] = &["GB", "AU", "NZ", "IE", "ZA"];

fn lookup<V: Copy>(table: &[(&str, V)], key: &str) -> Option<V> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, value)| *value)
}

pub fn region_for_tld(tld: &str) -> Option<&'static str> {
    lookup(TLD_REGIONS, tld)
}

pub fn region_for_language(code: &str) -> Option<&'static str> {
    lookup(LANGUAGE_REGIONS, code)
}

pub fn region_for_currency(code: &str) -> Option<&'static str> {
    lookup(CURRENCY_REGIONS, code)
}

/// All bare language codes whose default region is `region`, in table order.
pub fn languages_for_region(region: &str) -> Vec<&'static str> {
    LANGUAGE_REGIONS
        .iter()
        .filter(|(_, candidate)| *candidate == region)
        .map(|(code, _)| *code)
        .collect()
}

pub fn first_language_for_region(region: &str) -> Option<&'static str> {
    LANGUAGE_REGIONS
        .iter()
        .find(|(_, candidate)| *candidate == region)
        .map(|(code, _)| *code)
}

pub fn expected_currencies(region: &str) -> Option<&'static [&'static str]> {
    lookup(REGION_CURRENCIES, region)
}

pub fn expected_social_platforms(region: &str) -> Option<&'static [&'static str]> {
    lookup(REGION_SOCIAL_PLATFORMS, region)
}

pub fn expected_payment_methods(region: &str) -> Option<&'static [&'static str]> {
    lookup(REGION_PAYMENT_METHODS, region)
}

/// Human-readable country name, or the code itself when unknown.
pub fn country_name(code: &str) -> String {
    lookup(COUNTRY_NAMES, code)
        .map(str::to_string)
        .unwrap_or_else(|| code.to_string())
}

/// Human-readable language name, or the code itself when unknown.
pub fn language_name(code: &str) -> String {
    lookup(LANGUAGE_NAMES, code)
        .map(str::to_string)
        .unwrap_or_else(|| code.to_string())
}

/// Case-insensitive substring match of `provider_text` against `providers`.
pub(crate) fn matches_provider(provider_text: &str, providers: &[&str]) -> bool {
    let lowered = provider_text.to_ascii_lowercase();
    providers.iter().any(|provider| lowered.contains(provider))
}

/// Lowercased primary subtag of a BCP-47 tag or POSIX locale (`de-DE`, `de_DE` -> `de`).
pub(crate) fn base_language(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}
