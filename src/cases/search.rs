//! Case search and dashboard views: pure functions over the case list.

use super::model::{Case, CaseStatus, Priority};

/// Case-insensitive substring search over case number, party name,
/// summary and case type. An empty (or blank) query matches everything.
pub fn search<'a>(cases: &'a [Case], query: &str) -> Vec<&'a Case> {
    let needle = query.trim().to_lowercase();
    cases
        .iter()
        .filter(|c| needle.is_empty() || matches_query(c, &needle))
        .collect()
}

fn matches_query(case: &Case, needle: &str) -> bool {
    [
        case.case_number.as_str(),
        case.party.full_name.as_str(),
        case.summary(),
        case.case_type.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Headline counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub new: usize,
    pub in_progress: usize,
    pub closed: usize,
    pub critical: usize,
    pub high: usize,
}

impl DashboardStats {
    pub fn compute(cases: &[Case]) -> Self {
        cases.iter().fold(
            Self {
                total: cases.len(),
                ..Self::default()
            },
            |mut stats, case| {
                match case.status {
                    CaseStatus::New => stats.new += 1,
                    CaseStatus::InProgress => stats.in_progress += 1,
                    CaseStatus::Closed => stats.closed += 1,
                }
                match case.priority {
                    Priority::Critical => stats.critical += 1,
                    Priority::High => stats.high += 1,
                    _ => {}
                }
                stats
            },
        )
    }
}

/// One of the clickable dashboard stat cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardFilter {
    New,
    InProgress,
    Closed,
    Critical,
    High,
}

impl DashboardFilter {
    pub fn matches(self, case: &Case) -> bool {
        match self {
            Self::New => case.status == CaseStatus::New,
            Self::InProgress => case.status == CaseStatus::InProgress,
            Self::Closed => case.status == CaseStatus::Closed,
            Self::Critical => case.priority == Priority::Critical,
            Self::High => case.priority == Priority::High,
        }
    }

    /// Clicking the active card clears the filter; any other card replaces it.
    pub fn toggle(active: Option<Self>, clicked: Self) -> Option<Self> {
        if active == Some(clicked) {
            None
        } else {
            Some(clicked)
        }
    }
}

impl std::str::FromStr for DashboardFilter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(Self::New),
            "in_progress" | "inprogress" | "in-progress" => Ok(Self::InProgress),
            "closed" => Ok(Self::Closed),
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown filter: {}", s)),
        }
    }
}

/// Cases shown under the given filter; `None` shows all.
pub fn filter_cases(cases: &[Case], filter: Option<DashboardFilter>) -> Vec<&Case> {
    cases
        .iter()
        .filter(|c| filter.is_none_or(|f| f.matches(c)))
        .collect()
}
