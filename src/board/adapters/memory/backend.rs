//! In-memory persistence backend.
//!
//! Assigns identifiers and timestamps, appends new ordered records after
//! their last sibling, cascades deletes, and echoes every write through an
//! [`InMemoryChangeFeed`] the way a hosted database with change streams
//! would.

use async_trait::async_trait;
use mockable::Clock;
use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use super::InMemoryChangeFeed;
use crate::board::{
    domain::{
        Board, BoardDraft, BoardId, BoardPatch, BoardScope, ChecklistItem, ChecklistItemDraft,
        ChecklistItemId, ChecklistItemPatch, Comment, CommentDraft, CommentId, CommentPatch,
        Entity, EntityKind, Label, LabelDraft, LabelId, LabelPatch, List, ListDraft, ListId,
        ListPatch, Member, MemberDraft, MemberId, MemberPatch, Positioned, PositionUpdateOf,
        Priority, Record, Task, TaskDraft, TaskId, TaskLabel, TaskPatch,
    },
    feed::{Change, Notification},
    ports::{
        BackendError, BackendResult, BoardTemplateBackend, EntityBackend, PositionBackend,
        TaskLabelBackend,
    },
};

type Published = Vec<(Notification, Option<BoardId>)>;

/// Thread-safe in-memory implementation of every backend port.
#[derive(Debug, Clone)]
pub struct InMemoryBoardBackend<C: Clock + Send + Sync> {
    state: Arc<RwLock<BackendState>>,
    feed: InMemoryChangeFeed,
    clock: C,
}

#[derive(Debug, Default)]
struct BackendState {
    boards: Vec<Board>,
    lists: Vec<List>,
    tasks: Vec<Task>,
    labels: Vec<Label>,
    members: Vec<Member>,
    checklist_items: Vec<ChecklistItem>,
    comments: Vec<Comment>,
    task_labels: Vec<TaskLabel>,
    failures: VecDeque<String>,
}

impl BackendState {
    fn board_of_list(&self, list_id: ListId) -> Option<BoardId> {
        self.lists
            .iter()
            .find(|list| list.id == list_id)
            .map(|list| list.board_id)
    }

    fn board_of_task(&self, task_id: TaskId) -> Option<BoardId> {
        self.tasks
            .iter()
            .find(|task| task.id == task_id)
            .and_then(|task| self.board_of_list(task.list_id))
    }

    fn has_task(&self, task_id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id == task_id)
    }

    fn purge_task(&mut self, task_id: TaskId) {
        self.checklist_items.retain(|item| item.task_id != task_id);
        self.comments.retain(|comment| comment.task_id != task_id);
        self.task_labels.retain(|join| join.task_id != task_id);
    }

    fn purge_list(&mut self, list_id: ListId) {
        let doomed: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|task| task.list_id == list_id)
            .map(|task| task.id)
            .collect();
        self.tasks.retain(|task| task.list_id != list_id);
        for task_id in doomed {
            self.purge_task(task_id);
        }
    }

    fn purge_label(&mut self, label_id: LabelId) {
        self.task_labels.retain(|join| join.label_id != label_id);
    }

    fn purge_board(&mut self, board_id: BoardId) {
        let lists: Vec<ListId> = self
            .lists
            .iter()
            .filter(|list| list.board_id == board_id)
            .map(|list| list.id)
            .collect();
        self.lists.retain(|list| list.board_id != board_id);
        for list_id in lists {
            self.purge_list(list_id);
        }
        let labels: Vec<LabelId> = self
            .labels
            .iter()
            .filter(|label| label.board_id == board_id)
            .map(|label| label.id)
            .collect();
        self.labels.retain(|label| label.board_id != board_id);
        for label_id in labels {
            self.purge_label(label_id);
        }
    }
}

/// Storage table for one record kind.
trait Table: Record {
    fn rows(state: &BackendState) -> &[Self];
    fn rows_mut(state: &mut BackendState) -> &mut Vec<Self>;
    fn board_of(state: &BackendState, record: &Self) -> Option<BoardId>;
}

impl Table for Board {
    fn rows(state: &BackendState) -> &[Self] {
        &state.boards
    }
    fn rows_mut(state: &mut BackendState) -> &mut Vec<Self> {
        &mut state.boards
    }
    fn board_of(_state: &BackendState, _record: &Self) -> Option<BoardId> {
        None
    }
}

impl Table for List {
    fn rows(state: &BackendState) -> &[Self] {
        &state.lists
    }
    fn rows_mut(state: &mut BackendState) -> &mut Vec<Self> {
        &mut state.lists
    }
    fn board_of(_state: &BackendState, record: &Self) -> Option<BoardId> {
        Some(record.board_id)
    }
}

impl Table for Task {
    fn rows(state: &BackendState) -> &[Self] {
        &state.tasks
    }
    fn rows_mut(state: &mut BackendState) -> &mut Vec<Self> {
        &mut state.tasks
    }
    fn board_of(state: &BackendState, record: &Self) -> Option<BoardId> {
        state.board_of_list(record.list_id)
    }
}

impl Table for Label {
    fn rows(state: &BackendState) -> &[Self] {
        &state.labels
    }
    fn rows_mut(state: &mut BackendState) -> &mut Vec<Self> {
        &mut state.labels
    }
    fn board_of(_state: &BackendState, record: &Self) -> Option<BoardId> {
        Some(record.board_id)
    }
}

impl Table for Member {
    fn rows(state: &BackendState) -> &[Self] {
        &state.members
    }
    fn rows_mut(state: &mut BackendState) -> &mut Vec<Self> {
        &mut state.members
    }
    fn board_of(_state: &BackendState, _record: &Self) -> Option<BoardId> {
        None
    }
}

impl Table for ChecklistItem {
    fn rows(state: &BackendState) -> &[Self] {
        &state.checklist_items
    }
    fn rows_mut(state: &mut BackendState) -> &mut Vec<Self> {
        &mut state.checklist_items
    }
    fn board_of(state: &BackendState, record: &Self) -> Option<BoardId> {
        state.board_of_task(record.task_id)
    }
}

impl Table for Comment {
    fn rows(state: &BackendState) -> &[Self] {
        &state.comments
    }
    fn rows_mut(state: &mut BackendState) -> &mut Vec<Self> {
        &mut state.comments
    }
    fn board_of(state: &BackendState, record: &Self) -> Option<BoardId> {
        state.board_of_task(record.task_id)
    }
}

/// Ordered table whose rows live inside a parent record.
trait OrderedTable: Table + Positioned {
    const PARENT_KIND: EntityKind;

    fn has_parent(state: &BackendState, parent: Self::Parent) -> bool;
}

impl OrderedTable for List {
    const PARENT_KIND: EntityKind = EntityKind::Board;

    fn has_parent(state: &BackendState, parent: BoardId) -> bool {
        state.boards.iter().any(|board| board.id == parent)
    }
}

impl OrderedTable for Task {
    const PARENT_KIND: EntityKind = EntityKind::List;

    fn has_parent(state: &BackendState, parent: ListId) -> bool {
        state.board_of_list(parent).is_some()
    }
}

impl OrderedTable for ChecklistItem {
    const PARENT_KIND: EntityKind = EntityKind::Task;

    fn has_parent(state: &BackendState, parent: TaskId) -> bool {
        state.has_task(parent)
    }
}

fn next_position<'a, E: Positioned + 'a>(
    siblings: impl Iterator<Item = &'a E>,
    parent: E::Parent,
) -> i64 {
    siblings
        .filter(|sibling| sibling.parent_id() == parent)
        .map(Positioned::position)
        .max()
        .map_or(0, |max| max.saturating_add(1))
}

fn sorted_by_position<E: Positioned>(mut records: Vec<E>) -> Vec<E> {
    records.sort_by_key(Positioned::position);
    records
}

impl<C: Clock + Send + Sync> InMemoryBoardBackend<C> {
    /// Creates an empty backend publishing through `feed`.
    #[must_use]
    pub fn new(feed: InMemoryChangeFeed, clock: C) -> Self {
        Self {
            state: Arc::new(RwLock::new(BackendState::default())),
            feed,
            clock,
        }
    }

    /// Returns the feed this backend publishes to.
    #[must_use]
    pub const fn feed(&self) -> &InMemoryChangeFeed {
        &self.feed
    }

    /// Makes the next backend call fail with `reason`. Queued failures are
    /// consumed one per call.
    pub fn fail_next_call(&self, reason: impl Into<String>) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .failures
            .push_back(reason.into());
    }

    /// Stores a template board with one list per title, without publishing.
    #[must_use]
    pub fn seed_template(&self, title: &str, category: &str, list_titles: &[&str]) -> Board {
        let board = Board {
            id: BoardId::new(),
            title: title.to_owned(),
            description: None,
            background: None,
            is_template: true,
            template_category: Some(category.to_owned()),
            created_at: self.clock.utc(),
        };
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.lists.extend(
            list_titles
                .iter()
                .zip(0_i64..)
                .map(|(list_title, position)| List {
                    id: ListId::new(),
                    board_id: board.id,
                    title: (*list_title).to_owned(),
                    position,
                }),
        );
        state.boards.push(board.clone());
        board
    }

    fn state(&self) -> BackendResult<RwLockWriteGuard<'_, BackendState>> {
        let mut state = self
            .state
            .write()
            .map_err(|err| BackendError::unavailable(std::io::Error::other(err.to_string())))?;
        if let Some(reason) = state.failures.pop_front() {
            return Err(BackendError::unavailable(std::io::Error::other(reason)));
        }
        Ok(state)
    }

    fn select<E: Table>(&self, keep: impl Fn(&BackendState, &E) -> bool) -> BackendResult<Vec<E>> {
        let guard = self.state()?;
        let state = &*guard;
        Ok(E::rows(state)
            .iter()
            .filter(|record| keep(state, record))
            .cloned()
            .collect())
    }

    async fn insert<E>(
        &self,
        build: impl FnOnce(&BackendState) -> BackendResult<E>,
    ) -> BackendResult<E>
    where
        E: Table,
        Notification: From<Change<E>>,
    {
        let (created, board) = {
            let mut state = self.state()?;
            let record = build(&*state)?;
            let board = E::board_of(&state, &record);
            E::rows_mut(&mut state).push(record.clone());
            (record, board)
        };
        self.feed
            .publish(Change::Insert(created.clone()).into(), board)
            .await;
        Ok(created)
    }

    async fn patch<E>(&self, id: E::Id, patch: &E::Patch) -> BackendResult<E>
    where
        E: Table,
        Notification: From<Change<E>>,
    {
        let (updated, board) = {
            let mut state = self.state()?;
            let row = E::rows_mut(&mut state)
                .iter_mut()
                .find(|record| record.id() == id)
                .ok_or_else(|| BackendError::not_found(E::KIND, id))?;
            row.apply_patch(patch);
            let record = row.clone();
            let board = E::board_of(&state, &record);
            (record, board)
        };
        self.feed
            .publish(Change::Update(updated.clone()).into(), board)
            .await;
        Ok(updated)
    }

    async fn erase<E>(
        &self,
        id: E::Id,
        purge: impl FnOnce(&mut BackendState, &E),
    ) -> BackendResult<()>
    where
        E: Table,
        Notification: From<Change<E>>,
    {
        let board = {
            let mut state = self.state()?;
            let rows = E::rows_mut(&mut state);
            let index = rows
                .iter()
                .position(|record| record.id() == id)
                .ok_or_else(|| BackendError::not_found(E::KIND, id))?;
            let removed = rows.remove(index);
            let board = E::board_of(&state, &removed);
            purge(&mut state, &removed);
            board
        };
        self.feed
            .publish(Change::<E>::Delete(id).into(), board)
            .await;
        Ok(())
    }

    async fn move_rows<E>(&self, updates: Vec<PositionUpdateOf<E>>) -> BackendResult<()>
    where
        E: OrderedTable,
        Notification: From<Change<E>>,
    {
        let mut outcome = Ok(());
        let mut moved: Published = Vec::with_capacity(updates.len());
        {
            let mut state = self.state()?;
            for update in updates {
                if !E::has_parent(&state, update.parent_id) {
                    outcome = Err(BackendError::not_found(E::PARENT_KIND, update.parent_id));
                    break;
                }
                let Some(row) = E::rows_mut(&mut state)
                    .iter_mut()
                    .find(|record| record.id() == update.id)
                else {
                    outcome = Err(BackendError::not_found(E::KIND, update.id));
                    break;
                };
                row.place(update.parent_id, update.position);
                let record = row.clone();
                let board = E::board_of(&state, &record);
                moved.push((Change::Update(record).into(), board));
            }
        }
        self.feed.publish_all(moved).await;
        outcome
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> EntityBackend<Board> for InMemoryBoardBackend<C> {
    async fn list(&self, scope: &BoardScope) -> BackendResult<Vec<Board>> {
        let templates = matches!(scope, BoardScope::Templates);
        let mut boards = self.select(|_, board: &Board| board.is_template == templates)?;
        if templates {
            boards.sort_by(|a, b| a.template_category.cmp(&b.template_category));
        } else {
            boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        Ok(boards)
    }

    async fn create(&self, draft: BoardDraft) -> BackendResult<Board> {
        let created_at = self.clock.utc();
        self.insert(|_| {
            Ok(Board {
                id: BoardId::new(),
                title: draft.title,
                description: draft.description,
                background: None,
                is_template: false,
                template_category: None,
                created_at,
            })
        })
        .await
    }

    async fn update(&self, id: BoardId, patch: BoardPatch) -> BackendResult<Board> {
        self.patch(id, &patch).await
    }

    async fn delete(&self, id: BoardId) -> BackendResult<()> {
        self.erase(id, |state, board: &Board| state.purge_board(board.id))
            .await
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> BoardTemplateBackend for InMemoryBoardBackend<C> {
    async fn create_from_template(&self, template: BoardId, title: String) -> BackendResult<Board> {
        let created_at = self.clock.utc();
        let mut published: Published = Vec::new();
        let board = {
            let mut state = self.state()?;
            let source = state
                .boards
                .iter()
                .find(|board| board.id == template && board.is_template)
                .cloned()
                .ok_or_else(|| BackendError::not_found(EntityKind::Board, template))?;
            let board = Board {
                id: BoardId::new(),
                title,
                description: source.description,
                background: source.background,
                is_template: false,
                template_category: None,
                created_at,
            };
            let copies: Vec<List> = sorted_by_position(
                state
                    .lists
                    .iter()
                    .filter(|list| list.board_id == template)
                    .cloned()
                    .collect(),
            )
            .into_iter()
            .map(|list| List {
                id: ListId::new(),
                board_id: board.id,
                ..list
            })
            .collect();
            state.boards.push(board.clone());
            published.push((Change::Insert(board.clone()).into(), None));
            for copy in copies {
                state.lists.push(copy.clone());
                published.push((Change::Insert(copy).into(), Some(board.id)));
            }
            board
        };
        self.feed.publish_all(published).await;
        Ok(board)
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> EntityBackend<List> for InMemoryBoardBackend<C> {
    async fn list(&self, scope: &BoardId) -> BackendResult<Vec<List>> {
        let board_id = *scope;
        self.select(|_, list: &List| list.board_id == board_id)
            .map(sorted_by_position)
    }

    async fn create(&self, draft: ListDraft) -> BackendResult<List> {
        self.insert(|state| {
            if !state.boards.iter().any(|board| board.id == draft.board_id) {
                return Err(BackendError::not_found(EntityKind::Board, draft.board_id));
            }
            Ok(List {
                id: ListId::new(),
                board_id: draft.board_id,
                title: draft.title,
                position: next_position(state.lists.iter(), draft.board_id),
            })
        })
        .await
    }

    async fn update(&self, id: ListId, patch: ListPatch) -> BackendResult<List> {
        self.patch(id, &patch).await
    }

    async fn delete(&self, id: ListId) -> BackendResult<()> {
        self.erase(id, |state, list: &List| state.purge_list(list.id))
            .await
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> PositionBackend<List> for InMemoryBoardBackend<C> {
    async fn update_positions(&self, updates: Vec<PositionUpdateOf<List>>) -> BackendResult<()> {
        self.move_rows::<List>(updates).await
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> EntityBackend<Task> for InMemoryBoardBackend<C> {
    async fn list(&self, scope: &BoardId) -> BackendResult<Vec<Task>> {
        let board_id = *scope;
        self.select(|state, task: &Task| state.board_of_list(task.list_id) == Some(board_id))
            .map(sorted_by_position)
    }

    async fn create(&self, draft: TaskDraft) -> BackendResult<Task> {
        let created_at = self.clock.utc();
        self.insert(|state| {
            if state.board_of_list(draft.list_id).is_none() {
                return Err(BackendError::not_found(EntityKind::List, draft.list_id));
            }
            Ok(Task {
                id: TaskId::new(),
                list_id: draft.list_id,
                title: draft.title,
                description: draft.description,
                position: next_position(state.tasks.iter(), draft.list_id),
                priority: Priority::default(),
                due_date: None,
                assigned_to: None,
                card_color: None,
                created_at,
            })
        })
        .await
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> BackendResult<Task> {
        self.patch(id, &patch).await
    }

    async fn delete(&self, id: TaskId) -> BackendResult<()> {
        self.erase(id, |state, task: &Task| state.purge_task(task.id))
            .await
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> PositionBackend<Task> for InMemoryBoardBackend<C> {
    async fn update_positions(&self, updates: Vec<PositionUpdateOf<Task>>) -> BackendResult<()> {
        self.move_rows::<Task>(updates).await
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> EntityBackend<Label> for InMemoryBoardBackend<C> {
    async fn list(&self, scope: &BoardId) -> BackendResult<Vec<Label>> {
        let board_id = *scope;
        self.select(|_, label: &Label| label.board_id == board_id)
    }

    async fn create(&self, draft: LabelDraft) -> BackendResult<Label> {
        self.insert(|state| {
            if !state.boards.iter().any(|board| board.id == draft.board_id) {
                return Err(BackendError::not_found(EntityKind::Board, draft.board_id));
            }
            Ok(Label {
                id: LabelId::new(),
                board_id: draft.board_id,
                name: draft.name,
                color: draft.color,
            })
        })
        .await
    }

    async fn update(&self, id: LabelId, patch: LabelPatch) -> BackendResult<Label> {
        self.patch(id, &patch).await
    }

    async fn delete(&self, id: LabelId) -> BackendResult<()> {
        self.erase(id, |state, label: &Label| state.purge_label(label.id))
            .await
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> EntityBackend<Member> for InMemoryBoardBackend<C> {
    async fn list(&self, _scope: &()) -> BackendResult<Vec<Member>> {
        let mut members = self.select(|_, _: &Member| true)?;
        members.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(members)
    }

    async fn create(&self, draft: MemberDraft) -> BackendResult<Member> {
        self.insert(|_| {
            Ok(Member {
                id: MemberId::new(),
                name: draft.name,
                email: draft.email,
                color: draft.color,
            })
        })
        .await
    }

    async fn update(&self, id: MemberId, patch: MemberPatch) -> BackendResult<Member> {
        self.patch(id, &patch).await
    }

    async fn delete(&self, id: MemberId) -> BackendResult<()> {
        self.erase(id, |state, member: &Member| {
            for task in &mut state.tasks {
                if task.assigned_to == Some(member.id) {
                    task.assigned_to = None;
                }
            }
        })
        .await
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> EntityBackend<ChecklistItem> for InMemoryBoardBackend<C> {
    async fn list(&self, scope: &TaskId) -> BackendResult<Vec<ChecklistItem>> {
        let task_id = *scope;
        self.select(|_, item: &ChecklistItem| item.task_id == task_id)
            .map(sorted_by_position)
    }

    async fn create(&self, draft: ChecklistItemDraft) -> BackendResult<ChecklistItem> {
        self.insert(|state| {
            if !state.has_task(draft.task_id) {
                return Err(BackendError::not_found(EntityKind::Task, draft.task_id));
            }
            Ok(ChecklistItem {
                id: ChecklistItemId::new(),
                task_id: draft.task_id,
                title: draft.title,
                completed: false,
                position: next_position(state.checklist_items.iter(), draft.task_id),
            })
        })
        .await
    }

    async fn update(
        &self,
        id: ChecklistItemId,
        patch: ChecklistItemPatch,
    ) -> BackendResult<ChecklistItem> {
        self.patch(id, &patch).await
    }

    async fn delete(&self, id: ChecklistItemId) -> BackendResult<()> {
        self.erase(id, |_, _: &ChecklistItem| {}).await
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> PositionBackend<ChecklistItem> for InMemoryBoardBackend<C> {
    async fn update_positions(
        &self,
        updates: Vec<PositionUpdateOf<ChecklistItem>>,
    ) -> BackendResult<()> {
        self.move_rows::<ChecklistItem>(updates).await
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> EntityBackend<Comment> for InMemoryBoardBackend<C> {
    async fn list(&self, scope: &TaskId) -> BackendResult<Vec<Comment>> {
        let task_id = *scope;
        let mut comments = self.select(|_, comment: &Comment| comment.task_id == task_id)?;
        comments.sort_by_key(|comment| comment.created_at);
        Ok(comments)
    }

    async fn create(&self, draft: CommentDraft) -> BackendResult<Comment> {
        let created_at = self.clock.utc();
        self.insert(|state| {
            if !state.has_task(draft.task_id) {
                return Err(BackendError::not_found(EntityKind::Task, draft.task_id));
            }
            Ok(Comment {
                id: CommentId::new(),
                task_id: draft.task_id,
                member_id: draft.member_id,
                content: draft.content,
                created_at,
            })
        })
        .await
    }

    async fn update(&self, id: CommentId, patch: CommentPatch) -> BackendResult<Comment> {
        self.patch(id, &patch).await
    }

    async fn delete(&self, id: CommentId) -> BackendResult<()> {
        self.erase(id, |_, _: &Comment| {}).await
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> TaskLabelBackend for InMemoryBoardBackend<C> {
    async fn list_task_labels(&self, board: BoardId) -> BackendResult<Vec<TaskLabel>> {
        let state = self.state()?;
        Ok(state
            .task_labels
            .iter()
            .filter(|join| state.board_of_task(join.task_id) == Some(board))
            .copied()
            .collect())
    }

    async fn attach_label(&self, association: TaskLabel) -> BackendResult<()> {
        let board = {
            let mut state = self.state()?;
            if !state.has_task(association.task_id) {
                return Err(BackendError::not_found(
                    EntityKind::Task,
                    association.task_id,
                ));
            }
            if !state.labels.iter().any(|label| label.id == association.label_id) {
                return Err(BackendError::not_found(
                    EntityKind::Label,
                    association.label_id,
                ));
            }
            if state.task_labels.contains(&association) {
                return Ok(());
            }
            state.task_labels.push(association);
            state.board_of_task(association.task_id)
        };
        self.feed
            .publish(Change::Insert(association).into(), board)
            .await;
        Ok(())
    }

    async fn detach_label(&self, association: TaskLabel) -> BackendResult<()> {
        let board = {
            let mut state = self.state()?;
            let before = state.task_labels.len();
            state.task_labels.retain(|join| *join != association);
            if state.task_labels.len() == before {
                return Ok(());
            }
            state.board_of_task(association.task_id)
        };
        self.feed
            .publish(Change::<TaskLabel>::Delete(association.id()).into(), board)
            .await;
        Ok(())
    }
}
