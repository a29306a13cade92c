//! Case detail view: one case's sections rendered as plain text.
//!
//! Sections read straight from the raw record; missing sections and fields
//! are skipped rather than reported.

use std::fmt::Write as _;

use serde_json::{Map, Value};

use crate::cases::Case;

/// Scalar field as display text. `null` and nested values count as absent.
fn field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "Yes" } else { "No" }.to_string()),
        _ => None,
    }
}

fn object<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    map.get(key).and_then(Value::as_object)
}

/// Objects of an array field; non-object entries are skipped.
fn objects<'a>(map: &'a Map<String, Value>, key: &str) -> Vec<&'a Map<String, Value>> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}

fn line(out: &mut String, label: &str, value: Option<String>) {
    if let Some(value) = value {
        let _ = writeln!(out, "  {}: {}", label, value);
    }
}

/// Non-empty fields joined with `sep`.
fn joined(map: &Map<String, Value>, keys: &[&str], sep: &str) -> String {
    keys.iter()
        .filter_map(|k| field(map, k))
        .collect::<Vec<_>>()
        .join(sep)
}

/// Full detail view of a case.
pub fn render_case(case: &Case) -> String {
    let mut out = format!(
        "{}  {}  {}  {}\n",
        case.case_number, case.status, case.priority, case.case_type
    );
    if !case.summary().is_empty() {
        let _ = writeln!(out, "{}", case.summary());
    }
    if let Some(opened) = field(&case.extra, "opened_at") {
        let _ = writeln!(out, "Opened: {}", opened);
    }

    if let Some(alert) = &case.alert {
        out.push_str("\nAlert\n");
        line(&mut out, "Scenario", Some(alert.scenario.name.clone()));
        line(&mut out, "Description", field(&alert.scenario.extra, "description"));
        line(&mut out, "Alert ID", field(&alert.extra, "alert_id"));
        line(&mut out, "Generated", field(&alert.extra, "generated_at"));
        line(&mut out, "Priority", field(&alert.extra, "priority"));
    }

    render_party(&mut out, case);

    if let Some(account) = object(&case.extra, "account") {
        out.push_str("\nAccount\n");
        line(&mut out, "Account ID", field(account, "account_id"));
        line(&mut out, "Account number", field(account, "account_number_hash"));
        line(&mut out, "Product", field(account, "product_type_code"));
        line(&mut out, "Status", field(account, "status"));
        line(&mut out, "Currency", field(account, "currency_code"));
        line(&mut out, "Opened", field(account, "open_date"));
    }

    if let Some(risk) = &case.risk_assessment {
        out.push_str("\nRisk assessment\n");
        let score = field(&risk.extra, "risk_score").unwrap_or_else(|| "-".to_string());
        line(&mut out, "Score", Some(format!("{} ({})", score, risk.risk_level)));
        line(&mut out, "Assessed", field(&risk.extra, "as_of_date"));
        line(&mut out, "Method", field(&risk.extra, "method"));
        for factor in objects(&risk.extra, "risk_factors") {
            let name = field(factor, "factor_code").unwrap_or_else(|| "FACTOR".to_string());
            let mut text = format!("  - {}", name);
            if let Some(value) = field(factor, "value_text") {
                let _ = write!(text, ": {}", value);
            }
            if let Some(contribution) = field(factor, "contribution") {
                let _ = write!(text, " ({}%)", contribution);
            }
            let _ = writeln!(out, "{}", text);
        }
    }

    if let Some(transactions) = &case.transactions {
        let _ = writeln!(out, "\nTransactions ({})", transactions.len());
        for txn in transactions.iter().filter_map(Value::as_object) {
            let amount = joined(txn, &["currency_code", "amount"], " ");
            let place = object(txn, "location")
                .map(|l| joined(l, &["city", "country_code"], ", "))
                .unwrap_or_default();
            let cols = [
                field(txn, "txn_id").unwrap_or_default(),
                field(txn, "txn_ts").unwrap_or_default(),
                field(txn, "txn_type_code").unwrap_or_default(),
                amount,
                field(txn, "channel_code").unwrap_or_default(),
                place,
                field(txn, "description").unwrap_or_default(),
            ];
            let row = cols
                .iter()
                .filter(|c| !c.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join("  ");
            let _ = writeln!(out, "  {}", row);
        }
    }

    if let Some(hit) = object(&case.extra, "screening_hit") {
        out.push_str("\nScreening hit\n");
        line(&mut out, "List", field(hit, "list_code"));
        line(&mut out, "Match score", field(hit, "match_score"));
        line(&mut out, "Status", field(hit, "hit_status"));
        line(&mut out, "Disposition", field(hit, "disposition"));
        line(&mut out, "Decided", field(hit, "decided_at"));
    }

    let notes = objects(&case.extra, "case_notes");
    if !notes.is_empty() {
        let _ = writeln!(out, "\nNotes ({})", notes.len());
        for note in notes {
            let _ = writeln!(
                out,
                "  [{}] {}",
                field(note, "created_at").unwrap_or_default(),
                field(note, "author").unwrap_or_else(|| "unknown".to_string())
            );
            if let Some(text) = field(note, "note_text") {
                let _ = writeln!(out, "    {}", text);
            }
        }
    }

    out.trim_end().to_string()
}

fn render_party(out: &mut String, case: &Case) {
    let party = &case.party.extra;
    out.push_str("\nParty\n");
    line(out, "Name", Some(case.party.full_name.clone()));
    line(out, "Type", field(party, "party_type"));
    line(out, "Party ID", field(party, "party_id"));
    line(out, "Date of birth", field(party, "date_of_birth"));
    line(out, "Incorporated", field(party, "incorporation_date"));
    line(out, "Nationality", field(party, "nationality_country_code"));
    line(
        out,
        "TIN/Tax ID",
        Some(field(party, "tin_tax_id").unwrap_or_else(|| "N/A".to_string())),
    );
    line(out, "PEP", field(party, "pep_flag"));
    let category = match (field(party, "risk_category"), field(party, "risk_score")) {
        (Some(cat), Some(score)) => Some(format!("{} (score {})", cat, score)),
        (cat, score) => cat.or(score),
    };
    line(out, "Risk category", category);
    for address in objects(party, "addresses") {
        if address.get("is_current").and_then(Value::as_bool) == Some(false) {
            continue;
        }
        line(
            out,
            "Address",
            Some(joined(address, &["line1", "city", "postal_code", "country_code"], ", ")),
        );
    }
}
