//! Search and filter predicate applied to task views.

use super::{BoardDomainError, LabelId, MemberId, ParseAssigneeError, Priority, Task};
use chrono::{Duration, NaiveDate};
use mockable::Clock;
use std::collections::BTreeSet;
use std::str::FromStr;
use uuid::Uuid;

/// Assignee criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssigneeFilter {
    /// Keep tasks with no assignee.
    Unassigned,
    /// Keep tasks assigned to this member.
    Member(MemberId),
}

impl AssigneeFilter {
    /// Returns whether `task` satisfies the criterion.
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::Unassigned => task.assigned_to.is_none(),
            Self::Member(member) => task.assigned_to == Some(member),
        }
    }
}

impl FromStr for AssigneeFilter {
    type Err = ParseAssigneeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("unassigned") {
            return Ok(Self::Unassigned);
        }
        Uuid::parse_str(trimmed)
            .map(|uuid| Self::Member(MemberId::from_uuid(uuid)))
            .map_err(|_| ParseAssigneeError(value.to_owned()))
    }
}

/// Inclusive due-date window. Open bounds are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DueDateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DueDateRange {
    /// Creates a window.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvertedDueRange`] when `to` precedes
    /// `from`.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, BoardDomainError> {
        if let (Some(start), Some(end)) = (from, to)
            && end < start
        {
            return Err(BoardDomainError::InvertedDueRange {
                from: start,
                to: end,
            });
        }
        Ok(Self { from, to })
    }

    /// Tasks due strictly before today.
    #[must_use]
    pub fn overdue(clock: &impl Clock) -> Self {
        let today = clock.utc().date_naive();
        Self {
            from: None,
            to: today.pred_opt(),
        }
    }

    /// Tasks due from today through the next `days` days.
    #[must_use]
    pub fn upcoming(clock: &impl Clock, days: u32) -> Self {
        let today = clock.utc().date_naive();
        Self {
            from: Some(today),
            to: today.checked_add_signed(Duration::days(i64::from(days))),
        }
    }

    /// Returns the inclusive lower bound.
    #[must_use]
    pub const fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    /// Returns the inclusive upper bound.
    #[must_use]
    pub const fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    /// Returns whether `due_date` lies inside the window. Undated tasks
    /// never match.
    #[must_use]
    pub fn contains(&self, due_date: Option<NaiveDate>) -> bool {
        let Some(date) = due_date else {
            return false;
        };
        self.from.is_none_or(|start| date >= start) && self.to.is_none_or(|end| date <= end)
    }
}

/// Conjunctive task filter. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Exact priority.
    pub priority: Option<Priority>,
    /// Assignee criterion.
    pub assignee: Option<AssigneeFilter>,
    /// Keep tasks carrying at least one of these labels.
    pub labels: BTreeSet<LabelId>,
    /// Due-date window.
    pub due: Option<DueDateRange>,
}

impl TaskFilter {
    /// Returns whether any criterion is set.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.priority.is_some()
            || self.assignee.is_some()
            || !self.labels.is_empty()
            || self.due.is_some()
    }

    /// Sets the priority criterion.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the assignee criterion.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: AssigneeFilter) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Adds a label to the selected set, or removes it when already
    /// selected.
    #[must_use]
    pub fn toggle_label(mut self, label: LabelId) -> Self {
        if !self.labels.remove(&label) {
            self.labels.insert(label);
        }
        self
    }

    /// Sets the due-date window.
    #[must_use]
    pub const fn with_due(mut self, due: DueDateRange) -> Self {
        self.due = Some(due);
        self
    }
}
