use std::{cell::RefCell, rc::Rc};

use super::{
    ordering::{self, sort_lists, CardMove, ListMove},
    repository::BoardRepository,
};
use crate::api::{ApiError, Board, BoardList};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    pub board: Option<Board>,
    pub lists: Vec<BoardList>,
}

/// Result of a local board edit and its write-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Nothing moved and nothing was sent.
    Unchanged,
    Persisted,
    /// The local change stands but the backend did not take it; reload the
    /// board to reconcile.
    PersistFailed,
}

#[derive(Debug, Clone, PartialEq)]
enum SaveJob {
    ListMove(ListMove),
    CardMove(CardMove),
    DeleteList(String),
    DeleteCard(String),
}

/// Write-back of an edit that is already visible in local state. Owns
/// everything it needs, so it can be handed to `spawn_local`. Dropping it
/// skips the backend call but keeps the local change.
#[must_use = "the edit is only local until `persist` runs"]
pub struct PendingSave {
    repository: BoardRepository,
    job: Option<SaveJob>,
}

impl PendingSave {
    fn unchanged(repository: &BoardRepository) -> Self {
        Self {
            repository: repository.clone(),
            job: None,
        }
    }

    fn job(repository: &BoardRepository, job: SaveJob) -> Self {
        Self {
            repository: repository.clone(),
            job: Some(job),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.job.is_none()
    }

    pub async fn persist(self) -> ReorderOutcome {
        let Some(job) = self.job else {
            return ReorderOutcome::Unchanged;
        };
        let repository = &self.repository;
        match job {
            SaveJob::ListMove(change) => {
                settle(repository.save_list_move(&change).await, "list order")
            }
            SaveJob::CardMove(change) => {
                settle(repository.save_card_move(&change).await, "card position")
            }
            SaveJob::DeleteList(list_id) => {
                settle(repository.delete_list(&list_id).await, "list removal")
            }
            SaveJob::DeleteCard(card_id) => {
                settle(repository.delete_card(&card_id).await, "card removal")
            }
        }
    }
}

type Listener = Rc<dyn Fn(BoardState)>;

/// Owns the board shown on screen. Edits change local state before they
/// return; the backend write-back comes after and is not rolled back when
/// it fails.
pub struct BoardCoordinator {
    repository: BoardRepository,
    state: RefCell<BoardState>,
    listener: RefCell<Option<Listener>>,
}

impl BoardCoordinator {
    pub fn new(repository: BoardRepository) -> Self {
        Self {
            repository,
            state: RefCell::new(BoardState::default()),
            listener: RefCell::new(None),
        }
    }

    pub fn snapshot(&self) -> BoardState {
        self.state.borrow().clone()
    }

    /// Calls `listener` with a fresh snapshot after every local change.
    pub fn subscribe(&self, listener: impl Fn(BoardState) + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    fn publish(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener(self.snapshot());
        }
    }

    pub async fn boards(&self) -> Result<Vec<Board>, ApiError> {
        self.repository.list_boards().await
    }

    pub async fn create_board(&self, title: &str) -> Result<Board, ApiError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::InvalidRequest("Board title is required".into()));
        }
        self.repository.create_board(title).await
    }

    pub async fn load_board(&self, board_id: &str) -> Result<(), ApiError> {
        let board = self.repository.board(board_id).await?;
        let mut lists = self.repository.lists(board_id).await?;
        sort_lists(&mut lists);
        log::debug!("Loaded board {} with {} lists", board.id, lists.len());
        *self.state.borrow_mut() = BoardState {
            board: Some(board),
            lists,
        };
        self.publish();
        Ok(())
    }

    pub fn reorder_list(&self, source_index: usize, dest_index: usize) -> PendingSave {
        let change = ordering::move_list(
            &mut self.state.borrow_mut().lists,
            source_index,
            dest_index,
        );
        self.applied(change.map(SaveJob::ListMove))
    }

    pub fn reorder_card(
        &self,
        source_list_id: &str,
        source_index: usize,
        dest_list_id: &str,
        dest_index: usize,
    ) -> PendingSave {
        let change = ordering::move_card(
            &mut self.state.borrow_mut().lists,
            source_list_id,
            source_index,
            dest_list_id,
            dest_index,
        );
        self.applied(change.map(SaveJob::CardMove))
    }

    pub async fn add_list(&self, title: &str) -> Result<BoardList, ApiError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::InvalidRequest("List title is required".into()));
        }
        let board_id = self
            .state
            .borrow()
            .board
            .as_ref()
            .map(|board| board.id.clone())
            .ok_or_else(|| ApiError::InvalidRequest("No board loaded".into()))?;

        let mut list = self.repository.create_list(&board_id, title).await?;
        {
            let mut state = self.state.borrow_mut();
            list.order = state.lists.len() as i64;
            state.lists.push(list.clone());
        }
        self.publish();
        Ok(list)
    }

    pub fn remove_list(&self, list_id: &str) -> PendingSave {
        let removed = ordering::remove_list(&mut self.state.borrow_mut().lists, list_id);
        if removed.is_none() {
            log::warn!("Ignoring removal of unknown list {}", list_id);
        }
        self.applied(removed.map(|list| SaveJob::DeleteList(list.id)))
    }

    pub fn remove_card(&self, list_id: &str, card_id: &str) -> PendingSave {
        let removed =
            ordering::remove_card(&mut self.state.borrow_mut().lists, list_id, card_id);
        if removed.is_none() {
            log::warn!("Ignoring removal of unknown card {} in list {}", card_id, list_id);
        }
        self.applied(removed.map(|card| SaveJob::DeleteCard(card.id)))
    }

    fn applied(&self, job: Option<SaveJob>) -> PendingSave {
        match job {
            Some(job) => {
                self.publish();
                PendingSave::job(&self.repository, job)
            }
            None => PendingSave::unchanged(&self.repository),
        }
    }
}

fn settle(result: Result<(), ApiError>, what: &str) -> ReorderOutcome {
    match result {
        Ok(()) => ReorderOutcome::Persisted,
        Err(err) => {
            log::error!("Failed to save {}: {}", what, err);
            ReorderOutcome::PersistFailed
        }
    }
}
