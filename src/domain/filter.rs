use crate::domain::issue::{Issue, UserId};
use serde::{Deserialize, Serialize};

/// Filter applied to the board before issues are grouped into columns.
///
/// An issue is shown only when all three predicates hold. `None` for the
/// assignee or priority, and a blank search term, match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub assignee_id: Option<UserId>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub search_term: String,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assignee(mut self, assignee: Option<UserId>) -> Self {
        self.assignee_id = assignee;
        self
    }

    /// An empty priority string from a select box clears the filter
    pub fn priority(mut self, priority: Option<impl Into<String>>) -> Self {
        self.priority = priority.map(Into::into).filter(|p| !p.is_empty());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    /// True when no predicate narrows the board
    pub fn is_empty(&self) -> bool {
        self.assignee_id.is_none()
            && self.priority.as_deref().map_or(true, str::is_empty)
            && self.search_term.trim().is_empty()
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        self.matches_assignee(issue) && self.matches_priority(issue) && self.matches_search(issue)
    }

    fn matches_assignee(&self, issue: &Issue) -> bool {
        match self.assignee_id {
            None => true,
            Some(wanted) => issue.assignee_id == Some(wanted),
        }
    }

    fn matches_priority(&self, issue: &Issue) -> bool {
        match self.priority.as_deref() {
            None | Some("") => true,
            Some(wanted) => issue.priority.to_lowercase() == wanted.to_lowercase(),
        }
    }

    fn matches_search(&self, issue: &Issue) -> bool {
        let term = self.search_term.trim();
        term.is_empty() || issue.title.to_lowercase().contains(&term.to_lowercase())
    }
}
