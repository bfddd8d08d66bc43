//! Task records, priorities, due status, and label associations.

use super::{
    BoardDomainError, Entity, EntityKind, HexColor, LabelId, ListId, MemberId,
    ParsePriorityError, Positioned, Record, TaskId, TaskLabelKey, Title,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority, the default for new tasks.
    #[default]
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

/// How close a task is to its due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DueStatus {
    /// No due date is set.
    Unscheduled,
    /// The due date has passed.
    Overdue,
    /// The due date falls within the next 24 hours.
    DueSoon,
    /// The due date is further out.
    Upcoming,
}

impl DueStatus {
    /// Classifies `due_date` against `now`.
    ///
    /// Due dates are calendar days; a task is due at the start of that day
    /// (UTC).
    #[must_use]
    pub fn at(due_date: Option<NaiveDate>, now: DateTime<Utc>) -> Self {
        let Some(date) = due_date else {
            return Self::Unscheduled;
        };
        let due_at = date.and_time(chrono::NaiveTime::MIN).and_utc();
        if due_at < now {
            Self::Overdue
        } else if due_at < now + Duration::hours(24) {
            Self::DueSoon
        } else {
            Self::Upcoming
        }
    }
}

/// Atomic unit of work, ordered within a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task identifier.
    pub id: TaskId,
    /// Owning list.
    pub list_id: ListId,
    /// Card title.
    pub title: String,
    /// Free-text description, empty when unset.
    #[serde(default)]
    pub description: String,
    /// Top-to-bottom order within the list.
    pub position: i64,
    /// Priority.
    #[serde(default)]
    pub priority: Priority,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Optional assignee.
    pub assigned_to: Option<MemberId>,
    /// Optional card color.
    pub card_color: Option<String>,
    /// Creation timestamp assigned by the backend.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Returns the due status relative to the clock's current time.
    #[must_use]
    pub fn due_status(&self, clock: &impl Clock) -> DueStatus {
        DueStatus::at(self.due_date, clock.utc())
    }
}

impl Entity for Task {
    type Id = TaskId;
    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn order_key(&self) -> Option<i64> {
        Some(self.position)
    }
}

impl Positioned for Task {
    type Parent = ListId;

    fn parent_id(&self) -> Self::Parent {
        self.list_id
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn place(&mut self, parent: Self::Parent, position: i64) {
        self.list_id = parent;
        self.position = position;
    }
}

impl Record for Task {
    type Draft = TaskDraft;
    type Patch = TaskPatch;
    type Scope = super::BoardId;

    fn apply_patch(&mut self, patch: &Self::Patch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(assigned_to) = patch.assigned_to {
            self.assigned_to = assigned_to;
        }
        if let Some(card_color) = &patch.card_color {
            self.card_color.clone_from(card_color);
        }
    }
}

/// Validated payload for creating a task. The backend appends it after the
/// list's last task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Owning list.
    pub list_id: ListId,
    /// Card title.
    pub title: String,
    /// Description, possibly empty.
    pub description: String,
}

impl TaskDraft {
    /// Creates a task draft.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] for a blank title.
    pub fn new(list_id: ListId, title: impl Into<String>) -> Result<Self, BoardDomainError> {
        Ok(Self {
            list_id,
            title: Title::new(title)?.into_inner(),
            description: String::new(),
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Partial task update. Optional fields use `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New or cleared due date.
    pub due_date: Option<Option<NaiveDate>>,
    /// New or cleared assignee.
    pub assigned_to: Option<Option<MemberId>>,
    /// New or cleared card color.
    pub card_color: Option<Option<String>>,
}

impl TaskPatch {
    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets or clears the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, member: Option<MemberId>) -> Self {
        self.assigned_to = Some(member);
        self
    }

    /// Sets or clears the card color.
    #[must_use]
    pub fn with_card_color(mut self, color: Option<String>) -> Self {
        self.card_color = Some(color);
        self
    }

    /// Validates and normalizes the set fields.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError`] for a blank title or malformed color.
    pub fn validated(self) -> Result<Self, BoardDomainError> {
        let title = self
            .title
            .map(|raw| Title::new(raw).map(Title::into_inner))
            .transpose()?;
        let card_color = match self.card_color {
            Some(Some(color)) => Some(Some(HexColor::new(color)?.into_inner())),
            other => other,
        };
        Ok(Self {
            title,
            card_color,
            ..self
        })
    }
}

/// Join record associating a task with a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskLabel {
    /// Labelled task.
    pub task_id: TaskId,
    /// Attached label.
    pub label_id: LabelId,
}

impl TaskLabel {
    /// Creates an association.
    #[must_use]
    pub const fn new(task_id: TaskId, label_id: LabelId) -> Self {
        Self { task_id, label_id }
    }
}

impl Entity for TaskLabel {
    type Id = TaskLabelKey;
    const KIND: EntityKind = EntityKind::TaskLabel;

    fn id(&self) -> Self::Id {
        TaskLabelKey::new(self.task_id, self.label_id)
    }
}
