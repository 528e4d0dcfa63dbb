//! # Kanban Core
//!
//! Board state machine for a four-column kanban issue tracker.
//!
//! The full issue collection is the single source of truth. Column views are
//! derived from it with [`project`], drag gestures rewrite it with
//! [`apply_drag`], and [`BoardController`] ties both to a persisted store and
//! a remote seed source.

pub mod controller;
pub mod domain;
pub mod error;
pub mod remote;
pub mod storage;

// Re-export commonly used types
pub use controller::{BoardController, LoadOutcome};
pub use domain::{
    apply_drag, project, BoardConfig, BoardView, Column, ColumnView, DragEvent, DragLocation,
    DragOutcome, FilterCriteria, Issue, IssueDraft, IssueId, IssueStatus, User, UserId,
};
pub use error::{KanbanError, Result};
pub use remote::{JsonFileSource, RemoteSource, Snapshot};
pub use storage::{FileStorage, MemoryStorage, Slot, Storage};
