//! Workbench: owns the case list and the selected-case signal.
//!
//! The session controller never reads cases from globals: it gets a shared
//! handle to the list and a receiver for the selection when it is built.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::model::Case;
use super::search::{self, DashboardFilter, DashboardStats};
use crate::assistant::AssistantEndpoint;
use crate::error::WorkbenchError;
use crate::session::AssistantSession;

/// Read side of the selected-case signal.
pub type Selection = watch::Receiver<Option<Case>>;

pub struct Workbench {
    cases: Arc<Vec<Case>>,
    selection: watch::Sender<Option<Case>>,
    active_filter: Option<DashboardFilter>,
}

impl Workbench {
    pub fn new(cases: Vec<Case>) -> Self {
        let (selection, _rx) = watch::channel(None);
        Self {
            cases: Arc::new(cases),
            selection,
            active_filter: None,
        }
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// Shared handle to the case list.
    pub fn shared_cases(&self) -> Arc<Vec<Case>> {
        Arc::clone(&self.cases)
    }

    /// A receiver that always sees the current selection.
    pub fn selection(&self) -> Selection {
        self.selection.subscribe()
    }

    pub fn selected(&self) -> Option<Case> {
        self.selection.borrow().clone()
    }

    /// Look up a case by its case number, ignoring ASCII case.
    pub fn get(&self, case_number: &str) -> Result<&Case, WorkbenchError> {
        let case_number = case_number.trim();
        self.cases
            .iter()
            .find(|c| c.case_number.eq_ignore_ascii_case(case_number))
            .ok_or_else(|| WorkbenchError::CaseNotFound {
                case_number: case_number.to_string(),
            })
    }

    /// Select a case by its case number.
    pub fn select(&self, case_number: &str) -> Result<&Case, WorkbenchError> {
        let case = self.get(case_number)?;
        self.selection.send_replace(Some(case.clone()));
        debug!(case_number = %case.case_number, "Case selected");
        Ok(case)
    }

    pub fn clear_selection(&self) {
        self.selection.send_replace(None);
        debug!("Case selection cleared");
    }

    pub fn search(&self, query: &str) -> Vec<&Case> {
        search::search(&self.cases, query)
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::compute(&self.cases)
    }

    /// Toggle a dashboard filter card, returning the filter now in effect.
    pub fn toggle_filter(&mut self, clicked: DashboardFilter) -> Option<DashboardFilter> {
        self.active_filter = DashboardFilter::toggle(self.active_filter, clicked);
        self.active_filter
    }

    pub fn clear_filter(&mut self) {
        self.active_filter = None;
    }

    pub fn active_filter(&self) -> Option<DashboardFilter> {
        self.active_filter
    }

    /// Cases under the active dashboard filter.
    pub fn filtered(&self) -> Vec<&Case> {
        search::filter_cases(&self.cases, self.active_filter)
    }

    /// Build an assistant session over this workbench's cases and selection.
    pub fn session(&self, endpoint: Arc<dyn AssistantEndpoint>) -> Arc<AssistantSession> {
        AssistantSession::new(endpoint, self.shared_cases(), self.selection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::demo_cases;

    #[test]
    fn select_and_clear() {
        let bench = Workbench::new(demo_cases());
        let rx = bench.selection();
        assert!(rx.borrow().is_none());

        let case = bench.select("fcrm-2025-001189").unwrap();
        assert_eq!(case.party.full_name, "Alex M. Davidson");
        assert_eq!(
            rx.borrow().as_ref().map(|c| c.case_number.as_str()),
            Some("FCRM-2025-001189")
        );

        bench.clear_selection();
        assert!(rx.borrow().is_none());
        assert!(bench.selected().is_none());
    }

    #[test]
    fn unknown_case_keeps_selection() {
        let bench = Workbench::new(demo_cases());
        bench.select("FCRM-2025-001234").unwrap();

        let err = bench.select("FCRM-0000-000000").unwrap_err();
        assert!(matches!(err, WorkbenchError::CaseNotFound { .. }));
        assert_eq!(
            bench.selected().map(|c| c.case_number),
            Some("FCRM-2025-001234".to_string())
        );
    }

    #[test]
    fn get_does_not_select() {
        let bench = Workbench::new(demo_cases());
        let case = bench.get(" fcrm-2025-001256 ").unwrap();
        assert_eq!(case.party.full_name, "Maria Santos");
        assert!(bench.selected().is_none());
        assert!(bench.get("FCRM-0000-000000").is_err());
    }

    #[test]
    fn dashboard_filter_toggles() {
        let mut bench = Workbench::new(demo_cases());
        assert_eq!(bench.filtered().len(), 3);

        assert_eq!(bench.toggle_filter(DashboardFilter::Closed), Some(DashboardFilter::Closed));
        assert_eq!(bench.filtered().len(), 1);

        assert_eq!(bench.toggle_filter(DashboardFilter::Closed), None);
        assert_eq!(bench.filtered().len(), 3);

        bench.toggle_filter(DashboardFilter::High);
        bench.clear_filter();
        assert!(bench.active_filter().is_none());
    }

    #[test]
    fn stats_and_search_delegate() {
        let bench = Workbench::new(demo_cases());
        assert_eq!(bench.stats().total, 3);
        assert_eq!(bench.search("maria").len(), 1);
    }
}
