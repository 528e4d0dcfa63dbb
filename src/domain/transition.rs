//! Drag-and-drop transitions over the full issue collection.
//!
//! Ordering is positional: an issue's place within its column is its place
//! among the issues of the same status in the collection. A transition never
//! mutates its input; it either reports `Unchanged` or hands back a new
//! collection.

use crate::{
    domain::issue::{Column, Issue},
    error::{KanbanError, Result},
};

/// A position inside a column view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragLocation {
    pub column: Column,
    pub index: usize,
}

impl DragLocation {
    pub fn new(column: Column, index: usize) -> Self {
        Self { column, index }
    }

    /// Builds a location from the display label reported by the drag provider
    pub fn from_label(label: &str, index: usize) -> Result<Self> {
        Ok(Self::new(label.parse()?, index))
    }
}

/// A completed drag gesture. No destination means the drag was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEvent {
    pub source: DragLocation,
    pub destination: Option<DragLocation>,
}

impl DragEvent {
    pub fn new(source: DragLocation, destination: DragLocation) -> Self {
        Self {
            source,
            destination: Some(destination),
        }
    }

    pub fn cancelled(source: DragLocation) -> Self {
        Self {
            source,
            destination: None,
        }
    }

    /// Cancelled, or dropped back where it started
    pub fn is_noop(&self) -> bool {
        self.destination.map_or(true, |dest| dest == self.source)
    }
}

/// Result of applying a drag to the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Nothing moved; callers should not persist
    Unchanged,
    /// The new full collection
    Moved(Vec<Issue>),
}

impl DragOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Moved(_))
    }
}

/// Applies a drag event to the full issue collection.
///
/// Same-column drops reorder the column in place, leaving every other issue
/// at its original position. Cross-column drops change the dragged issue's
/// status and rebuild the collection as the untouched issues followed by the
/// source column then the destination column.
///
/// Indices are checked against the column sequences before anything is
/// rebuilt; a stale index yields `KanbanError::OutOfRange`.
pub fn apply_drag(issues: &[Issue], event: &DragEvent) -> Result<DragOutcome> {
    let Some(destination) = event.destination else {
        return Ok(DragOutcome::Unchanged);
    };
    let source = event.source;
    if source == destination {
        return Ok(DragOutcome::Unchanged);
    }

    let moved = if source.column == destination.column {
        reorder(issues, source.column, source.index, destination.index)?
    } else {
        move_across(issues, source, destination)?
    };

    tracing::info!(
        from = %source.column,
        from_index = source.index,
        to = %destination.column,
        to_index = destination.index,
        "applied drag"
    );

    Ok(DragOutcome::Moved(moved))
}

/// Issues in `column`, in collection order
fn local_sequence(issues: &[Issue], column: Column) -> Vec<Issue> {
    issues
        .iter()
        .filter(|issue| issue.column() == Some(column))
        .cloned()
        .collect()
}

fn check_index(column: Column, index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(KanbanError::OutOfRange { column, index, len });
    }
    Ok(())
}

fn reorder(issues: &[Issue], column: Column, from: usize, to: usize) -> Result<Vec<Issue>> {
    let mut local = local_sequence(issues, column);
    check_index(column, from, local.len())?;
    check_index(column, to, local.len())?;

    let dragged = local.remove(from);
    local.insert(to, dragged);

    // Refill the column's slots in collection order
    let mut reordered = local.into_iter();
    Ok(issues
        .iter()
        .map(|issue| {
            if issue.column() == Some(column) {
                reordered.next().unwrap_or_else(|| issue.clone())
            } else {
                issue.clone()
            }
        })
        .collect())
}

fn move_across(
    issues: &[Issue],
    source: DragLocation,
    destination: DragLocation,
) -> Result<Vec<Issue>> {
    let mut source_local = local_sequence(issues, source.column);
    let mut dest_local = local_sequence(issues, destination.column);
    check_index(source.column, source.index, source_local.len())?;
    // Inserting at the end of the destination is allowed
    if destination.index > dest_local.len() {
        return Err(KanbanError::OutOfRange {
            column: destination.column,
            index: destination.index,
            len: dest_local.len(),
        });
    }

    let mut dragged = source_local.remove(source.index);
    dragged.status = destination.column.into();
    dest_local.insert(destination.index, dragged);

    let untouched = issues.iter().filter(|issue| {
        let column = issue.column();
        column != Some(source.column) && column != Some(destination.column)
    });

    Ok(untouched
        .cloned()
        .chain(source_local)
        .chain(dest_local)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        board::project,
        filter::FilterCriteria,
        issue::{IssueId, IssueStatus},
    };

    fn issue(id: i64, column: Column) -> Issue {
        Issue::new(IssueId::new(id), format!("Issue {id}")).with_status(column)
    }

    fn ids(issues: &[Issue]) -> Vec<i64> {
        issues.iter().map(|i| i.id.value()).collect()
    }

    fn moved(outcome: DragOutcome) -> Vec<Issue> {
        match outcome {
            DragOutcome::Moved(issues) => issues,
            DragOutcome::Unchanged => panic!("expected a move"),
        }
    }

    fn drag(from: (Column, usize), to: (Column, usize)) -> DragEvent {
        DragEvent::new(DragLocation::new(from.0, from.1), DragLocation::new(to.0, to.1))
    }

    #[test]
    fn test_cancelled_drag_is_noop() {
        let issues = vec![issue(1, Column::ToDo)];
        let event = DragEvent::cancelled(DragLocation::new(Column::ToDo, 0));

        assert!(event.is_noop());
        assert_eq!(apply_drag(&issues, &event).unwrap(), DragOutcome::Unchanged);
    }

    #[test]
    fn test_drop_in_place_is_noop() {
        let issues = vec![issue(1, Column::ToDo), issue(2, Column::ToDo)];
        let event = drag((Column::ToDo, 1), (Column::ToDo, 1));

        assert!(event.is_noop());
        assert_eq!(apply_drag(&issues, &event).unwrap(), DragOutcome::Unchanged);
    }

    #[test]
    fn test_single_element_column_drop_is_noop() {
        let issues = vec![issue(1, Column::Review)];
        let event = drag((Column::Review, 0), (Column::Review, 0));
        assert!(!apply_drag(&issues, &event).unwrap().is_changed());
    }

    #[test]
    fn test_reorder_forward_keeps_other_columns_in_place() {
        let issues = vec![
            issue(1, Column::ToDo),
            issue(9, Column::Done),
            issue(2, Column::ToDo),
            issue(3, Column::ToDo),
        ];

        let result = moved(apply_drag(&issues, &drag((Column::ToDo, 0), (Column::ToDo, 2))).unwrap());

        assert_eq!(ids(&result), vec![2, 9, 3, 1]);
        assert!(result.iter().filter(|i| i.id.value() != 9).all(|i| i.column() == Some(Column::ToDo)));
    }

    #[test]
    fn test_reorder_backward() {
        let issues = vec![issue(1, Column::Review), issue(2, Column::Review), issue(3, Column::Review)];

        let result = moved(apply_drag(&issues, &drag((Column::Review, 2), (Column::Review, 0))).unwrap());

        assert_eq!(ids(&result), vec![3, 1, 2]);
    }

    #[test]
    fn test_reorder_is_visible_in_projection() {
        let issues = vec![issue(1, Column::ToDo), issue(2, Column::ToDo)];

        let result = moved(apply_drag(&issues, &drag((Column::ToDo, 0), (Column::ToDo, 1))).unwrap());
        let view = project(&result, &FilterCriteria::new());

        assert_eq!(ids(&view.column(Column::ToDo).issues), vec![2, 1]);
    }

    #[test]
    fn test_cross_column_scenario() {
        let issues = vec![
            issue(1, Column::ToDo),
            issue(2, Column::ToDo),
            issue(3, Column::InProgress),
        ];

        let result = moved(
            apply_drag(&issues, &drag((Column::ToDo, 1), (Column::InProgress, 0))).unwrap(),
        );

        assert_eq!(result.len(), 3);
        let dragged = result.iter().find(|i| i.id.value() == 2).unwrap();
        assert_eq!(dragged.status, IssueStatus::Known(Column::InProgress));

        let view = project(&result, &FilterCriteria::new());
        assert_eq!(ids(&view.column(Column::InProgress).issues), vec![2, 3]);
        assert_eq!(ids(&view.column(Column::ToDo).issues), vec![1]);
    }

    #[test]
    fn test_cross_column_puts_touched_columns_last() {
        let issues = vec![
            issue(1, Column::ToDo),
            issue(7, Column::Review),
            issue(2, Column::ToDo),
            issue(8, Column::Done),
            issue(3, Column::InProgress),
        ];

        let result = moved(
            apply_drag(&issues, &drag((Column::ToDo, 0), (Column::InProgress, 1))).unwrap(),
        );

        assert_eq!(ids(&result), vec![7, 8, 2, 3, 1]);
    }

    #[test]
    fn test_cross_column_append_to_end_and_into_empty() {
        let issues = vec![issue(1, Column::ToDo), issue(2, Column::Done)];

        let result = moved(apply_drag(&issues, &drag((Column::ToDo, 0), (Column::Done, 1))).unwrap());
        let view = project(&result, &FilterCriteria::new());
        assert_eq!(ids(&view.column(Column::Done).issues), vec![2, 1]);

        let result = moved(apply_drag(&issues, &drag((Column::ToDo, 0), (Column::Review, 0))).unwrap());
        let view = project(&result, &FilterCriteria::new());
        assert_eq!(ids(&view.column(Column::Review).issues), vec![1]);
        assert!(view.column(Column::ToDo).is_empty());
    }

    #[test]
    fn test_unmapped_issues_survive_moves() {
        let stray = Issue::new(IssueId::new(50), "stray").with_status(IssueStatus::Other("icebox".into()));
        let issues = vec![stray.clone(), issue(1, Column::ToDo)];

        let result = moved(apply_drag(&issues, &drag((Column::ToDo, 0), (Column::Done, 0))).unwrap());

        assert_eq!(result.len(), 2);
        assert!(result.contains(&stray));
    }

    #[test]
    fn test_source_index_out_of_range() {
        let issues = vec![issue(1, Column::ToDo)];

        let err = apply_drag(&issues, &drag((Column::ToDo, 3), (Column::Done, 0))).unwrap_err();
        assert!(matches!(
            err,
            KanbanError::OutOfRange { column: Column::ToDo, index: 3, len: 1 }
        ));
    }

    #[test]
    fn test_destination_index_out_of_range() {
        let issues = vec![issue(1, Column::ToDo), issue(2, Column::ToDo)];

        assert!(matches!(
            apply_drag(&issues, &drag((Column::ToDo, 0), (Column::ToDo, 2))),
            Err(KanbanError::OutOfRange { .. })
        ));
        assert!(matches!(
            apply_drag(&issues, &drag((Column::ToDo, 0), (Column::Done, 1))),
            Err(KanbanError::OutOfRange { column: Column::Done, index: 1, len: 0 })
        ));
    }

    #[test]
    fn test_input_is_never_mutated() {
        let issues = vec![issue(1, Column::ToDo), issue(2, Column::InProgress)];
        let before = issues.clone();

        let _ = apply_drag(&issues, &drag((Column::ToDo, 0), (Column::InProgress, 0))).unwrap();

        assert_eq!(issues, before);
    }

    #[test]
    fn test_location_from_label() {
        let location = DragLocation::from_label("In Progress", 2).unwrap();
        assert_eq!(location, DragLocation::new(Column::InProgress, 2));
        assert!(DragLocation::from_label("inprogress", 0).is_err());
    }
}
