//! Console input parsing.

use crate::cases::DashboardFilter;

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the assistant panel (prints the transcript).
    Open,
    /// Hide the assistant panel.
    Close,
    /// List cases under the active dashboard filter.
    Cases,
    Search(String),
    /// Select a case by case number.
    Select(String),
    Unselect,
    /// Case detail view for the named case, or the selected one.
    Show(Option<String>),
    Stats,
    /// Toggle a dashboard filter card; `None` clears the filter.
    Filter(Option<DashboardFilter>),
    /// List suggestion chips.
    Suggest,
    /// Send the suggestion with this zero-based index.
    Pick(usize),
    Help,
    Quit,
    /// Free text for the assistant.
    Query(String),
    /// A slash command that could not be parsed.
    Invalid(String),
}

/// Parses console lines into commands.
pub struct CommandParser;

impl CommandParser {
    pub fn parse(line: &str) -> Command {
        let trimmed = line.trim();
        let lower = trimmed.to_lowercase();

        match lower.as_str() {
            "/open" => Command::Open,
            "/close" | "/hide" => Command::Close,
            "/cases" | "/list" => Command::Cases,
            "/unselect" | "/deselect" => Command::Unselect,
            "/stats" | "/dashboard" => Command::Stats,
            "/suggest" | "/suggestions" => Command::Suggest,
            "/help" | "/?" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            _ => parse_complex(line, trimmed),
        }
    }
}

fn parse_complex(line: &str, trimmed: &str) -> Command {
    if !trimmed.starts_with('/') {
        return Command::Query(line.to_string());
    }

    let (name, rest) = trimmed
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((trimmed, ""));

    match name.to_lowercase().as_str() {
        "/search" => Command::Search(rest.to_string()),
        "/select" if !rest.is_empty() => Command::Select(rest.to_string()),
        "/show" | "/view" => Command::Show((!rest.is_empty()).then(|| rest.to_string())),
        "/filter" => parse_filter(rest),
        "/pick" => parse_pick(rest),
        _ => Command::Invalid(format!("Unknown command: {}", trimmed)),
    }
}

fn parse_filter(arg: &str) -> Command {
    if arg.is_empty() || arg.eq_ignore_ascii_case("all") {
        return Command::Filter(None);
    }
    match arg.parse() {
        Ok(filter) => Command::Filter(Some(filter)),
        Err(e) => Command::Invalid(e),
    }
}

/// `/pick <n>` is one-based, matching the numbered suggestion list.
fn parse_pick(arg: &str) -> Command {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Command::Pick(n - 1),
        _ => Command::Invalid(format!("Expected a suggestion number, got {:?}", arg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_query() {
        assert_eq!(
            CommandParser::parse("What are the critical cases?"),
            Command::Query("What are the critical cases?".into())
        );
        assert_eq!(CommandParser::parse(""), Command::Query("".into()));
    }

    #[test]
    fn simple_commands() {
        assert_eq!(CommandParser::parse("/open"), Command::Open);
        assert_eq!(CommandParser::parse("  /CLOSE "), Command::Close);
        assert_eq!(CommandParser::parse("/stats"), Command::Stats);
        assert_eq!(CommandParser::parse("/exit"), Command::Quit);
    }

    #[test]
    fn arguments_keep_case() {
        assert_eq!(
            CommandParser::parse("/select FCRM-2025-001234"),
            Command::Select("FCRM-2025-001234".into())
        );
        assert_eq!(
            CommandParser::parse("/search Global Innovations"),
            Command::Search("Global Innovations".into())
        );
    }

    #[test]
    fn show_takes_optional_case() {
        assert_eq!(CommandParser::parse("/show"), Command::Show(None));
        assert_eq!(
            CommandParser::parse("/VIEW  FCRM-2025-001189 "),
            Command::Show(Some("FCRM-2025-001189".into()))
        );
    }

    #[test]
    fn select_requires_argument() {
        assert!(matches!(CommandParser::parse("/select"), Command::Invalid(_)));
    }

    #[test]
    fn filters() {
        assert_eq!(
            CommandParser::parse("/filter critical"),
            Command::Filter(Some(DashboardFilter::Critical))
        );
        assert_eq!(CommandParser::parse("/filter all"), Command::Filter(None));
        assert_eq!(CommandParser::parse("/filter"), Command::Filter(None));
        assert!(matches!(CommandParser::parse("/filter urgent"), Command::Invalid(_)));
    }

    #[test]
    fn pick_is_one_based() {
        assert_eq!(CommandParser::parse("/pick 1"), Command::Pick(0));
        assert_eq!(CommandParser::parse("/pick 6"), Command::Pick(5));
        assert!(matches!(CommandParser::parse("/pick 0"), Command::Invalid(_)));
        assert!(matches!(CommandParser::parse("/pick two"), Command::Invalid(_)));
    }

    #[test]
    fn unknown_slash_command() {
        assert!(matches!(CommandParser::parse("/model gpt"), Command::Invalid(_)));
    }
}
