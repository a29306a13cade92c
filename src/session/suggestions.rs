//! Contextual suggestion chips.

use crate::cases::Case;

/// Most chips ever shown.
pub const MAX_SUGGESTIONS: usize = 6;

const FALLBACK: [&str; 5] = [
    "Give me a summary of all cases",
    "What are the critical and high priority cases?",
    "Compare risk scores across all cases",
    "Show me cases with sanctions screening hits",
    "Explain why Global Innovations B.V. was flagged",
];

/// Suggested queries for the current case list and selection.
///
/// Selected-case prompts come first, then prompts triggered by the list as a
/// whole, then the fixed fallback list; the result is cut to
/// [`MAX_SUGGESTIONS`].
pub fn suggestions(cases: &[Case], selected: Option<&Case>) -> Vec<String> {
    let mut out = Vec::with_capacity(MAX_SUGGESTIONS + FALLBACK.len());

    if let Some(case) = selected {
        out.push(format!(
            "Give me a detailed summary of case {}",
            case.case_number
        ));
        out.push(format!("Why was {} flagged?", case.party.full_name));
        if case.has_transactions() {
            out.push("Analyze the transaction patterns in this case".to_string());
        }
        if case.risk_assessment.is_some() {
            out.push("Explain the risk factors contributing to this case".to_string());
        }
        if let Some(alert) = &case.alert {
            out.push(format!(
                "Explain the alert scenario: {}",
                alert.scenario.name
            ));
        }
    }

    if cases.iter().any(Case::is_high_risk) {
        out.push("What are all the high-risk cases and why?".to_string());
    }
    if cases.iter().any(Case::is_sanctions) {
        out.push("Tell me about the sanctions screening cases".to_string());
    }

    out.extend(FALLBACK.iter().map(|s| s.to_string()));
    out.truncate(MAX_SUGGESTIONS);
    out
}
