//! Record builders shared by the unit tests.

use crate::board::domain::{
    Board, BoardId, ChecklistItem, ChecklistItemId, Comment, CommentId, Label, LabelId, List,
    ListId, Member, MemberId, Priority, Task, TaskId,
};
use chrono::{DateTime, TimeZone, Utc};

pub fn timestamp(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0)
        .single()
        .expect("valid timestamp")
}

pub fn board(title: &str) -> Board {
    Board {
        id: BoardId::new(),
        title: title.to_owned(),
        description: None,
        background: None,
        is_template: false,
        template_category: None,
        created_at: timestamp(0),
    }
}

pub fn list(board_id: BoardId, title: &str, position: i64) -> List {
    List {
        id: ListId::new(),
        board_id,
        title: title.to_owned(),
        position,
    }
}

pub fn task(list_id: ListId, title: &str, position: i64) -> Task {
    Task {
        id: TaskId::new(),
        list_id,
        title: title.to_owned(),
        description: String::new(),
        position,
        priority: Priority::Medium,
        due_date: None,
        assigned_to: None,
        card_color: None,
        created_at: timestamp(position),
    }
}

pub fn label(board_id: BoardId, name: &str) -> Label {
    Label {
        id: LabelId::new(),
        board_id,
        name: name.to_owned(),
        color: "#ff0000".to_owned(),
    }
}

pub fn member(name: &str) -> Member {
    Member {
        id: MemberId::new(),
        name: name.to_owned(),
        email: None,
        color: "#00ff00".to_owned(),
    }
}

pub fn checklist_item(task_id: TaskId, title: &str, position: i64) -> ChecklistItem {
    ChecklistItem {
        id: ChecklistItemId::new(),
        task_id,
        title: title.to_owned(),
        completed: false,
        position,
    }
}

pub fn comment(task_id: TaskId, member_id: MemberId, content: &str, seconds: i64) -> Comment {
    Comment {
        id: CommentId::new(),
        task_id,
        member_id,
        content: content.to_owned(),
        created_at: timestamp(seconds),
    }
}
