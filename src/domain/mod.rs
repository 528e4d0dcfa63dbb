pub mod board;
pub mod filter;
pub mod issue;
pub mod transition;

pub use board::{project, BoardConfig, BoardView, ColumnView};
pub use filter::FilterCriteria;
pub use issue::{ensure_unique_ids, Column, Issue, IssueDraft, IssueId, IssueStatus, User, UserId};
pub use transition::{apply_drag, DragEvent, DragLocation, DragOutcome};
