use crate::{
    domain::{
        filter::FilterCriteria,
        issue::{Column, Issue},
    },
    error::{KanbanError, Result},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Board configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub name: String,
    /// Write a snapshot fetched from the remote source back to storage
    pub cache_remote_snapshot: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: "Issue Tracker Kanban Board".to_string(),
            cache_remote_snapshot: true,
        }
    }
}

impl BoardConfig {
    /// Loads configuration from a JSON file. Missing keys take their defaults.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        serde_json::from_str(&contents).map_err(|e| {
            KanbanError::ConfigError(format!("{}: {}", path.as_ref().display(), e))
        })
    }
}

/// The issues shown under one column heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    pub column: Column,
    pub issues: Vec<Issue>,
}

impl ColumnView {
    fn empty(column: Column) -> Self {
        Self {
            column,
            issues: Vec::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.column.label()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// All four columns, always in `Column::ALL` order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub columns: [ColumnView; 4],
}

impl BoardView {
    pub fn column(&self, column: Column) -> &ColumnView {
        &self.columns[column as usize]
    }

    /// Total number of visible issues across all columns
    pub fn visible_count(&self) -> usize {
        self.columns.iter().map(ColumnView::len).sum()
    }
}

/// Groups the issues that pass `criteria` into their columns.
///
/// Within a column, issues keep the order they have in `issues`. Issues whose
/// status does not map to a column are dropped.
pub fn project(issues: &[Issue], criteria: &FilterCriteria) -> BoardView {
    let mut columns = Column::ALL.map(ColumnView::empty);

    for issue in issues.iter().filter(|issue| criteria.matches(issue)) {
        if let Some(column) = issue.column() {
            columns[column as usize].issues.push(issue.clone());
        }
    }

    tracing::debug!(
        total = issues.len(),
        visible = columns.iter().map(ColumnView::len).sum::<usize>(),
        "projected board"
    );

    BoardView { columns }
}
