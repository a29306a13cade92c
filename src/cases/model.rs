//! Case data model: investigation records as supplied by the case source.
//!
//! Only the fields the copilot reads are typed. Everything else on each
//! record stays as raw JSON in a flattened `extra` map, so ids, amounts and
//! scores reach the assistant endpoint exactly as they were loaded.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Workflow status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    New,
    InProgress,
    Closed,
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "NEW"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Case priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Risk level from a risk assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// HIGH or CRITICAL.
    pub fn is_elevated(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Kind of investigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CaseType {
    AmlAlert,
    Sanctions,
    KycReview,
    /// Any type this build does not know about, kept verbatim.
    Other(String),
}

impl CaseType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::AmlAlert => "AML_ALERT",
            Self::Sanctions => "SANCTIONS",
            Self::KycReview => "KYC_REVIEW",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for CaseType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "AML_ALERT" => Self::AmlAlert,
            "SANCTIONS" => Self::Sanctions,
            "KYC_REVIEW" => Self::KycReview,
            _ => Self::Other(s),
        }
    }
}

impl From<CaseType> for String {
    fn from(t: CaseType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for CaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}


/// The customer under investigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    /// Display name (person or organization).
    pub full_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    /// Score, factors, method and dates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Detection scenario that raised an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub scenario: Scenario,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A financial-crime investigation case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Human-facing case number, e.g. `FCRM-2025-001234`.
    pub case_number: String,
    pub status: CaseStatus,
    pub priority: Priority,
    pub case_type: CaseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub party: Party,
    /// Only presence is inspected; entries are passed through as loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_assessment: Option<RiskAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<Alert>,
    /// Case id, account, KYC profile, screening hit, notes and anything else
    /// the source provides.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Case {
    pub fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or_default()
    }

    /// Whether the case has at least one transaction.
    pub fn has_transactions(&self) -> bool {
        self.transactions.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// Risk level, if an assessment is attached.
    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.risk_assessment.as_ref().map(|r| r.risk_level)
    }

    /// Assessed risk level is HIGH or CRITICAL.
    pub fn is_high_risk(&self) -> bool {
        self.risk_level().is_some_and(RiskLevel::is_elevated)
    }

    pub fn is_sanctions(&self) -> bool {
        self.case_type == CaseType::Sanctions
    }
}
