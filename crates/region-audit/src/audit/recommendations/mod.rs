//! Localization audit: turns page evidence plus the scoring verdict into a
//! severity-ranked list of issues and a 0-100 grade.

mod rules;

use serde::{Deserialize, Serialize};

use super::evidence::Evidence;
use super::scoring::AudienceResult;

pub const CRITICAL_PENALTY: u32 = 20;
pub const WARNING_PENALTY: u32 = 10;
pub const INFO_PENALTY: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub const fn ordered() -> [Self; 3] {
        [Self::Critical, Self::Warning, Self::Info]
    }

    /// Sort key: critical first.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::Warning => 1,
            Self::Info => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Warning => "Warning",
            Self::Info => "Info",
        }
    }

    const fn penalty(self) -> u32 {
        match self {
            Self::Critical => CRITICAL_PENALTY,
            Self::Warning => WARNING_PENALTY,
            Self::Info => INFO_PENALTY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Hreflang,
    LocaleDeclaration,
    LocaleConsistency,
    TldContentMismatch,
    HostingAlignment,
    Charset,
    MarketAdaptation,
    CulturalAdaptation,
    UxMobile,
    UxForms,
    Accessibility,
    MarketCoverage,
}

impl Category {
    /// Wire name, as serialized.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Hreflang => "hreflang",
            Self::LocaleDeclaration => "locale-declaration",
            Self::LocaleConsistency => "locale-consistency",
            Self::TldContentMismatch => "tld-content-mismatch",
            Self::HostingAlignment => "hosting-alignment",
            Self::Charset => "charset",
            Self::MarketAdaptation => "market-adaptation",
            Self::CulturalAdaptation => "cultural-adaptation",
            Self::UxMobile => "ux-mobile",
            Self::UxForms => "ux-forms",
            Self::Accessibility => "accessibility",
            Self::MarketCoverage => "market-coverage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub const fn from_score(score: u8) -> Self {
        if score >= 80 {
            Self::A
        } else if score >= 60 {
            Self::B
        } else if score >= 40 {
            Self::C
        } else if score >= 20 {
            Self::D
        } else {
            Self::F
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub severity: Severity,
    pub category: Category,
    pub issue: String,
    pub recommendation: String,
    #[serde(default)]
    pub code_example: Option<String>,
}

impl Recommendation {
    pub(crate) fn new(
        severity: Severity,
        category: Category,
        issue: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            issue: issue.into(),
            recommendation: recommendation.into(),
            code_example: None,
        }
    }

    pub(crate) fn with_example(mut self, example: impl Into<String>) -> Self {
        self.code_example = Some(example.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub score: u8,
    pub grade: Grade,
    pub total_issues: usize,
    pub critical: usize,
    pub warnings: usize,
    pub info: usize,
}

impl ReportSummary {
    fn tally(recommendations: &[Recommendation]) -> Self {
        let count = |severity: Severity| {
            recommendations
                .iter()
                .filter(|rec| rec.severity == severity)
                .count()
        };
        let critical = count(Severity::Critical);
        let warnings = count(Severity::Warning);
        let info = count(Severity::Info);

        let deductions: u64 = Severity::ordered()
            .into_iter()
            .zip([critical, warnings, info])
            .map(|(severity, n)| u64::from(severity.penalty()) * n as u64)
            .sum();
        let score = 100u64.saturating_sub(deductions) as u8;

        Self {
            score,
            grade: Grade::from_score(score),
            total_issues: recommendations.len(),
            critical,
            warnings,
            info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationReport {
    pub summary: ReportSummary,
    pub recommendations: Vec<Recommendation>,
}

impl OptimizationReport {
    /// Orders recommendations by severity (stable within a severity) and scores them.
    pub fn from_recommendations(mut recommendations: Vec<Recommendation>) -> Self {
        recommendations.sort_by_key(|rec| rec.severity.rank());
        let summary = ReportSummary::tally(&recommendations);
        Self {
            summary,
            recommendations,
        }
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Recommendation> {
        self.recommendations
            .iter()
            .filter(move |rec| rec.category == category)
    }
}

/// Audit `evidence` against localization best practice.
///
/// Every rule group runs unconditionally and in a fixed order; no rule sees
/// another rule's output.
pub fn generate_recommendations(evidence: &Evidence, result: &AudienceResult) -> OptimizationReport {
    let ctx = rules::AuditContext::new(evidence, result);
    let mut recommendations = Vec::new();

    for rule in rules::RULES {
        rule(&ctx, &mut recommendations);
    }

    OptimizationReport::from_recommendations(recommendations)
}
