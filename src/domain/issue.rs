use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::HashSet, fmt, str::FromStr};

use crate::error::{KanbanError, Result};

/// Unique identifier for an issue (e.g., a creation timestamp in milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(i64);

impl IssueId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Allocates an ID from the current wall clock
    pub fn from_timestamp(now: DateTime<Utc>) -> Self {
        Self(now.timestamp_millis())
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Returns the next candidate ID, used when re-rolling a collision
    pub fn successor(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the four fixed workflow columns, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    ToDo = 0,
    InProgress = 1,
    Review = 2,
    Done = 3,
}

/// Column, display label, status key. Indexed by the column discriminant.
const COLUMN_TABLE: [(Column, &str, &str); 4] = [
    (Column::ToDo, "To Do", "todo"),
    (Column::InProgress, "In Progress", "inprogress"),
    (Column::Review, "Review", "review"),
    (Column::Done, "Done", "done"),
];

impl Column {
    pub const ALL: [Column; 4] = [Column::ToDo, Column::InProgress, Column::Review, Column::Done];

    /// Display label shown as the column heading
    pub fn label(self) -> &'static str {
        COLUMN_TABLE[self as usize].1
    }

    /// Status key stored on issues belonging to this column
    pub fn status_key(self) -> &'static str {
        COLUMN_TABLE[self as usize].2
    }

    pub fn from_label(label: &str) -> Option<Self> {
        COLUMN_TABLE
            .iter()
            .find(|(_, l, _)| *l == label)
            .map(|(column, _, _)| *column)
    }

    pub fn from_status_key(key: &str) -> Option<Self> {
        COLUMN_TABLE
            .iter()
            .find(|(_, _, k)| *k == key)
            .map(|(column, _, _)| *column)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Column {
    type Err = KanbanError;

    /// Parses a display label as emitted by the drag gesture provider
    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s).ok_or_else(|| KanbanError::UnknownColumn(s.to_string()))
    }
}

/// Status of an issue. Unrecognised keys are kept verbatim so they survive
/// a save/load round trip, but they belong to no column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IssueStatus {
    Known(Column),
    Other(String),
}

impl IssueStatus {
    pub fn column(&self) -> Option<Column> {
        match self {
            Self::Known(column) => Some(*column),
            Self::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(column) => column.status_key(),
            Self::Other(raw) => raw,
        }
    }
}

impl From<Column> for IssueStatus {
    fn from(column: Column) -> Self {
        Self::Known(column)
    }
}

impl From<String> for IssueStatus {
    fn from(raw: String) -> Self {
        match Column::from_status_key(&raw) {
            Some(column) => Self::Known(column),
            None => Self::Other(raw),
        }
    }
}

impl From<IssueStatus> for String {
    fn from(status: IssueStatus) -> Self {
        match status {
            IssueStatus::Known(column) => column.status_key().to_string(),
            IssueStatus::Other(raw) => raw,
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A board user that issues can be assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A kanban issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: IssueId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: IssueStatus,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub priority: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<UserId>,
    /// Informational only; unreadable values load as `None`
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339 or a bare `YYYY-MM-DD` date; anything else becomes `None`
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error> {
    let raw = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(raw)) => raw,
        _ => return Ok(None),
    };
    if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(at.with_timezone(&Utc)));
    }
    Ok(NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc()))
}

impl Issue {
    /// Creates a new issue in the To Do column. No creation time is stamped.
    pub fn new(id: IssueId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            status: IssueStatus::Known(Column::ToDo),
            priority: String::new(),
            assignee_id: None,
            created_at: None,
        }
    }

    /// Builds an issue from a creation draft. Status is always To Do.
    pub fn from_draft(id: IssueId, draft: IssueDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            status: IssueStatus::Known(Column::ToDo),
            priority: draft.priority,
            assignee_id: draft.assignee_id,
            created_at: Some(created_at),
        }
    }

    /// The column this issue is shown in, if its status is recognised
    pub fn column(&self) -> Option<Column> {
        self.status.column()
    }

    /// Assignee, treating a zero ID as unassigned
    pub fn assignee(&self) -> Option<UserId> {
        self.assignee_id.filter(|id| id.value() != 0)
    }

    pub fn with_status(mut self, status: impl Into<IssueStatus>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee_id = Some(assignee);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Replaces the editable fields, keeping ID, status and creation time
    pub fn apply_edit(&mut self, draft: IssueDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.priority = draft.priority;
        self.assignee_id = draft.assignee_id;
    }
}

/// Input from the issue creation/edit form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "IssueDraft::default_priority")]
    pub priority: String,
    #[serde(default)]
    pub assignee_id: Option<UserId>,
    /// ID proposed by the form; re-rolled if it collides
    #[serde(default)]
    pub id: Option<IssueId>,
}

impl IssueDraft {
    fn default_priority() -> String {
        "low".to_string()
    }

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Self::default_priority(),
            assignee_id: None,
            id: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn assignee(mut self, assignee: UserId) -> Self {
        self.assignee_id = Some(assignee);
        self
    }

    pub fn suggested_id(mut self, id: IssueId) -> Self {
        self.id = Some(id);
        self
    }

    /// A title made only of whitespace is rejected
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(KanbanError::EmptyTitle);
        }
        Ok(())
    }
}

/// Fails with the first ID that appears twice in the collection
pub fn ensure_unique_ids(issues: &[Issue]) -> Result<()> {
    let mut seen = HashSet::with_capacity(issues.len());
    for issue in issues {
        if !seen.insert(issue.id) {
            return Err(KanbanError::DuplicateId(issue.id));
        }
    }
    Ok(())
}
