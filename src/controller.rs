//! Board controller: owns the canonical issue collection and mediates
//! between the pure board functions and the fallible collaborators.

use crate::{
    domain::{
        apply_drag, ensure_unique_ids, project, BoardConfig, BoardView, DragEvent, DragOutcome,
        FilterCriteria, Issue, IssueDraft, IssueId, User, UserId,
    },
    error::{KanbanError, Result},
    remote::{RemoteSource, Snapshot},
    storage::Storage,
};
use chrono::Utc;
use std::collections::HashSet;
use tokio::sync::Mutex;

/// Where a `load` got its data from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    FromStorage,
    FromRemote,
    /// Neither collaborator produced usable data; the board stays empty
    Unavailable,
    /// A local change landed while the remote fetch was pending
    Superseded,
}

#[derive(Debug, Default)]
struct BoardState {
    issues: Vec<Issue>,
    users: Vec<User>,
    filter: FilterCriteria,
    /// Bumped on every committed local change to the issue collection
    generation: u64,
    last_error: Option<String>,
}

pub struct BoardController<S, R> {
    config: BoardConfig,
    storage: S,
    remote: R,
    state: Mutex<BoardState>,
}

impl<S: Storage, R: RemoteSource> BoardController<S, R> {
    pub fn new(storage: S, remote: R, config: BoardConfig) -> Self {
        Self {
            config,
            storage,
            remote,
            state: Mutex::new(BoardState::default()),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Loads the board, preferring the persisted store over the remote source.
    ///
    /// Failures are not fatal: they are logged, recorded in `last_error`, and
    /// the board keeps whatever state it had.
    pub async fn load(&self) -> LoadOutcome {
        let mut state = self.state.lock().await;

        if let Some(issues) = self.stored_issues().await {
            tracing::debug!(count = issues.len(), "loaded issues from storage");
            state.issues = issues;
            state.last_error = None;
            match self.stored_users().await {
                Some(users) => state.users = users,
                None => {
                    drop(state);
                    self.refresh_users().await;
                }
            }
            return LoadOutcome::FromStorage;
        }

        let generation = state.generation;
        drop(state);

        let fetched = self.fetch_snapshot().await;
        let mut state = self.state.lock().await;
        let superseded = state.generation != generation;

        let snapshot = match fetched {
            Ok(snapshot) => snapshot,
            Err(_) if superseded => return LoadOutcome::Superseded,
            Err(e) => {
                tracing::warn!("failed to load board data: {e}");
                state.last_error = Some(KanbanError::DataUnavailable.to_string());
                return LoadOutcome::Unavailable;
            }
        };

        // Only the issues can be stale; users are never edited locally
        if superseded {
            tracing::warn!("discarding remote issues superseded by a local change");
            if self.config.cache_remote_snapshot {
                if let Err(e) = self.storage.save_users(&snapshot.users).await {
                    tracing::warn!("failed to cache users: {e}");
                }
            }
            state.users = snapshot.users;
            return LoadOutcome::Superseded;
        }

        if self.config.cache_remote_snapshot {
            if let Err(e) = self.cache_snapshot(&snapshot).await {
                tracing::warn!("failed to cache remote snapshot: {e}");
            }
        }

        tracing::debug!(
            issues = snapshot.issues.len(),
            users = snapshot.users.len(),
            "loaded board from remote source"
        );
        state.issues = snapshot.issues;
        state.users = snapshot.users;
        state.last_error = None;
        LoadOutcome::FromRemote
    }

    async fn stored_issues(&self) -> Option<Vec<Issue>> {
        let issues = match self.storage.load_issues().await {
            Ok(issues) => issues?,
            Err(e) => {
                tracing::warn!("stored issues unusable, refetching: {e}");
                return None;
            }
        };
        if let Err(e) = ensure_unique_ids(&issues) {
            tracing::warn!("stored issues unusable, refetching: {e}");
            return None;
        }
        Some(issues)
    }

    async fn stored_users(&self) -> Option<Vec<User>> {
        match self.storage.load_users().await {
            Ok(users) => users,
            Err(e) => {
                tracing::warn!("stored users unusable, refetching: {e}");
                None
            }
        }
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let snapshot = self.remote.fetch().await?;
        ensure_unique_ids(&snapshot.issues)
            .map_err(|e| KanbanError::MalformedSnapshot(e.to_string()))?;
        Ok(snapshot)
    }

    async fn cache_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        self.storage.save_issues(&snapshot.issues).await?;
        self.storage.save_users(&snapshot.users).await
    }

    /// Issues came from storage but users did not: take users from the remote
    async fn refresh_users(&self) {
        match self.remote.fetch().await {
            Ok(snapshot) => {
                if self.config.cache_remote_snapshot {
                    if let Err(e) = self.storage.save_users(&snapshot.users).await {
                        tracing::warn!("failed to cache users: {e}");
                    }
                }
                self.state.lock().await.users = snapshot.users;
            }
            Err(e) => {
                tracing::warn!("failed to load users: {e}");
                self.state.lock().await.last_error = Some(e.to_string());
            }
        }
    }

    /// Current board, projected through the active filter
    pub async fn view(&self) -> BoardView {
        let state = self.state.lock().await;
        project(&state.issues, &state.filter)
    }

    pub async fn issues(&self) -> Vec<Issue> {
        self.state.lock().await.issues.clone()
    }

    pub async fn users(&self) -> Vec<User> {
        self.state.lock().await.users.clone()
    }

    pub async fn filter(&self) -> FilterCriteria {
        self.state.lock().await.filter.clone()
    }

    /// Most recent non-fatal condition, for display
    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.last_error.clone()
    }

    pub async fn set_filter(&self, filter: FilterCriteria) {
        self.state.lock().await.filter = filter;
    }

    pub async fn set_assignee_filter(&self, assignee: Option<UserId>) {
        self.state.lock().await.filter.assignee_id = assignee;
    }

    pub async fn set_priority_filter(&self, priority: Option<String>) {
        self.state.lock().await.filter.priority = priority.filter(|p| !p.is_empty());
    }

    pub async fn set_search_term(&self, term: impl Into<String>) {
        self.state.lock().await.filter.search_term = term.into();
    }

    /// Applies a completed drag and persists the result.
    ///
    /// No-op drops write nothing. A rejected drag leaves the collection as it
    /// was.
    pub async fn on_drag_end(&self, event: &DragEvent) -> Result<DragOutcome> {
        let mut state = self.state.lock().await;

        let outcome = match apply_drag(&state.issues, event) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("rejected drag: {e}");
                state.last_error = Some(e.to_string());
                return Err(e);
            }
        };

        if let DragOutcome::Moved(issues) = &outcome {
            self.commit(&mut state, issues.clone()).await?;
        }
        Ok(outcome)
    }

    /// Adds a new issue to the To Do column and persists the collection
    pub async fn create_issue(&self, draft: IssueDraft) -> Result<Issue> {
        draft.validate()?;
        let mut state = self.state.lock().await;

        let now = Utc::now();
        let candidate = draft.id.unwrap_or_else(|| IssueId::from_timestamp(now));
        let id = allocate_id(&state.issues, candidate);
        let issue = Issue::from_draft(id, draft, now);

        let mut issues = state.issues.clone();
        issues.push(issue.clone());
        self.commit(&mut state, issues).await?;

        tracing::info!(id = %issue.id, title = %issue.title, "created issue");
        Ok(issue)
    }

    /// Edits an existing issue in place, keeping its column and position
    pub async fn update_issue(&self, id: IssueId, draft: IssueDraft) -> Result<Issue> {
        draft.validate()?;
        let mut state = self.state.lock().await;

        let mut issues = state.issues.clone();
        let issue = issues
            .iter_mut()
            .find(|issue| issue.id == id)
            .ok_or(KanbanError::IssueNotFound(id))?;
        issue.apply_edit(draft);
        let updated = issue.clone();

        self.commit(&mut state, issues).await?;

        tracing::info!(id = %updated.id, "updated issue");
        Ok(updated)
    }

    /// Persists `issues` then makes it the canonical collection
    async fn commit(&self, state: &mut BoardState, issues: Vec<Issue>) -> Result<()> {
        if let Err(e) = self.storage.save_issues(&issues).await {
            tracing::warn!("failed to persist issues: {e}");
            state.last_error = Some(e.to_string());
            return Err(e);
        }
        state.issues = issues;
        state.generation += 1;
        Ok(())
    }
}

/// Returns `candidate`, or the next free ID after it if taken
fn allocate_id(existing: &[Issue], candidate: IssueId) -> IssueId {
    let taken: HashSet<IssueId> = existing.iter().map(|issue| issue.id).collect();
    let mut id = candidate;
    while taken.contains(&id) {
        tracing::warn!(%id, "issue id already taken, re-rolling");
        id = id.successor();
    }
    id
}
