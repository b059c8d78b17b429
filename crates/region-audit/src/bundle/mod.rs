mod export;

pub use export::write_recommendations_csv;

use crate::audit::pipeline::PageEvidence;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum BundleError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    Empty,
}

impl std::fmt::Display for BundleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BundleError::Io(err) => write!(f, "failed to read evidence bundle: {}", err),
            BundleError::Json(err) => write!(f, "invalid evidence bundle JSON: {}", err),
            BundleError::Csv(err) => write!(f, "failed to write recommendations CSV: {}", err),
            BundleError::Empty => write!(f, "evidence bundle is empty"),
        }
    }
}

impl std::error::Error for BundleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BundleError::Io(err) => Some(err),
            BundleError::Json(err) => Some(err),
            BundleError::Csv(err) => Some(err),
            BundleError::Empty => None,
        }
    }
}

impl From<std::io::Error> for BundleError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for BundleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<csv::Error> for BundleError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Evidence for one page or a whole crawled site, as produced by the
/// extraction step.
#[derive(Debug, Clone, PartialEq)]
pub enum EvidenceBundle {
    Page(PageEvidence),
    Site { url: String, pages: Vec<PageEvidence> },
}

#[derive(Deserialize)]
struct SiteFile {
    url: String,
    pages: Vec<PageEvidence>,
}

impl EvidenceBundle {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BundleError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, BundleError> {
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;
        if raw.trim().is_empty() {
            return Err(BundleError::Empty);
        }

        // A `pages` key marks a site bundle.
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        if value.get("pages").is_some() {
            let SiteFile { url, pages } = serde_json::from_value(value)?;
            Ok(Self::Site { url, pages })
        } else {
            Ok(Self::Page(serde_json::from_value(value)?))
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Page(page) => &page.url,
            Self::Site { url, .. } => url,
        }
    }

    pub fn is_site(&self) -> bool {
        matches!(self, Self::Site { .. })
    }

    pub fn page_count(&self) -> usize {
        match self {
            Self::Page(_) => 1,
            Self::Site { pages, .. } => pages.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_single_page_bundle() {
        let raw = r#"{"url": "https://example.de/", "evidence": {"htmlSignals": {"tld": ".de"}}}"#;
        let bundle = EvidenceBundle::from_reader(Cursor::new(raw)).expect("bundle parses");

        assert!(!bundle.is_site());
        assert_eq!(bundle.url(), "https://example.de/");
        match bundle {
            EvidenceBundle::Page(page) => {
                assert_eq!(page.depth, 0);
                assert_eq!(page.evidence.html_signals.tld(), Some(".de"));
            }
            other => panic!("expected page bundle, got {other:?}"),
        }
    }

    #[test]
    fn reads_site_bundle() {
        let raw = r#"{
            "url": "https://example.jp/",
            "pages": [
                {"url": "https://example.jp/", "depth": 0, "evidence": {}},
                {"url": "https://example.jp/about", "depth": 1, "evidence": {"htmlSignals": {"lang": "ja"}}}
            ]
        }"#;
        let bundle = EvidenceBundle::from_reader(Cursor::new(raw)).expect("bundle parses");

        assert!(bundle.is_site());
        assert_eq!(bundle.page_count(), 2);
    }

    #[test]
    fn bad_page_in_site_bundle_fails_the_bundle() {
        let raw = r#"{
            "url": "https://shop.example.jp",
            "pages": [
                {"url": "https://shop.example.jp/", "evidence": {"htmlSignals": {"lang": "ja"}}},
                {"evidence": {"htmlSignals": {"lang": 5}}}
            ]
        }"#;
        let err = EvidenceBundle::from_reader(Cursor::new(raw)).expect_err("type error surfaces");
        assert!(matches!(err, BundleError::Json(_)));
    }

    #[test]
    fn site_bundle_without_url_fails() {
        let raw = r#"{"pages": [{"evidence": {}}]}"#;
        let err = EvidenceBundle::from_reader(Cursor::new(raw)).expect_err("url is required");
        assert!(matches!(err, BundleError::Json(_)));
    }

    #[test]
    fn blank_input_is_rejected() {
        let err = EvidenceBundle::from_reader(Cursor::new("  \n")).expect_err("blank input fails");
        assert!(matches!(err, BundleError::Empty));
    }

    #[test]
    fn malformed_json_reports_json_error() {
        let err = EvidenceBundle::from_reader(Cursor::new("{not json")).expect_err("bad json fails");
        assert!(matches!(err, BundleError::Json(_)));
        assert!(err.to_string().starts_with("invalid evidence bundle JSON"));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = EvidenceBundle::from_path("/definitely/not/here.json").expect_err("missing file");
        assert!(matches!(err, BundleError::Io(_)));
    }
}
