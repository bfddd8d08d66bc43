//! Positional reorder engine tests.

use super::support::{board, checklist_item, list, task};
use crate::board::domain::{ListId, PositionUpdate, Task, TaskId};
use crate::board::reorder::{
    DragSession, DropTarget, PositionPlan, array_move, drag_start, plan_drag_end,
    plan_drag_over, plan_move_within,
};
use crate::board::store::EntityStore;
use rstest::{fixture, rstest};

struct TwoLists {
    store: EntityStore,
    x: ListId,
    y: ListId,
}

impl TwoLists {
    fn add(&mut self, list_id: ListId, title: &str, position: i64) -> TaskId {
        let record = task(list_id, title, position);
        let id = record.id;
        self.store.upsert(record);
        id
    }

    fn layout(&self, list_id: ListId) -> Vec<(String, i64)> {
        self.store
            .all_tasks_in_list(list_id)
            .into_iter()
            .map(|task| (task.title.clone(), task.position))
            .collect()
    }

    fn apply(&mut self, plan: &PositionPlan<Task>) {
        self.store.apply_positions::<Task>(plan.updates());
    }
}

#[fixture]
fn lists() -> TwoLists {
    let owner = board("Roadmap");
    let x = list(owner.id, "X", 0);
    let y = list(owner.id, "Y", 1);
    let mut store = EntityStore::new();
    store.upsert(owner);
    store.upsert_all(vec![x.clone(), y.clone()]);
    TwoLists {
        store,
        x: x.id,
        y: y.id,
    }
}

fn pairs(items: &[(&str, i64)]) -> Vec<(String, i64)> {
    items
        .iter()
        .map(|(title, position)| ((*title).to_owned(), *position))
        .collect()
}

#[rstest]
#[case(0, 2, vec!['b', 'c', 'a'])]
#[case(2, 0, vec!['c', 'a', 'b'])]
#[case(1, 1, vec!['a', 'b', 'c'])]
#[case(0, 3, vec!['a', 'b', 'c'])]
fn array_move_relocates_one_element(
    #[case] from: usize,
    #[case] to: usize,
    #[case] expected: Vec<char>,
) {
    let mut items = vec!['a', 'b', 'c'];
    array_move(&mut items, from, to);
    assert_eq!(items, expected);
}

#[rstest]
fn same_list_drop_renumbers_every_task(mut lists: TwoLists) {
    let x = lists.x;
    let a = lists.add(x, "A", 0);
    lists.add(x, "B", 1);
    let c = lists.add(x, "C", 2);

    let session = drag_start(&lists.store, c).expect("task loaded");
    let plan = plan_drag_end(&lists.store, session, DropTarget::Task(a));
    assert_eq!(plan.len(), 3);
    lists.apply(&plan);

    assert_eq!(lists.layout(x), pairs(&[("C", 0), ("A", 1), ("B", 2)]));
}

#[rstest]
fn same_list_drop_closes_gaps(mut lists: TwoLists) {
    let x = lists.x;
    let a = lists.add(x, "A", 0);
    let b = lists.add(x, "B", 4);
    lists.add(x, "C", 9);

    let plan = plan_drag_end(&lists.store, DragSession::new(a), DropTarget::Task(b));
    lists.apply(&plan);

    assert_eq!(lists.layout(x), pairs(&[("B", 0), ("A", 1), ("C", 2)]));
}

#[rstest]
fn drag_over_task_in_other_list_takes_its_slot(mut lists: TwoLists) {
    let (x, y) = (lists.x, lists.y);
    let t = lists.add(x, "T", 0);
    lists.add(y, "S", 1);
    let u = lists.add(y, "U", 2);
    lists.add(y, "V", 3);

    let plan = plan_drag_over(&lists.store, DragSession::new(t), DropTarget::Task(u));
    assert_eq!(
        plan.updates().first(),
        Some(&PositionUpdate::new(t, y, 2))
    );
    lists.apply(&plan);

    let moved = lists.store.get::<Task>(t).expect("task kept");
    assert_eq!((moved.list_id, moved.position), (y, 2));
    assert!(lists.store.tasks_for_list(x).is_empty());
    assert_eq!(
        lists.layout(y),
        pairs(&[("S", 1), ("T", 2), ("U", 3), ("V", 4)])
    );
}

#[rstest]
fn drag_over_empty_list_appends(mut lists: TwoLists) {
    let (x, y) = (lists.x, lists.y);
    let t = lists.add(x, "T", 0);

    let plan = plan_drag_over(&lists.store, DragSession::new(t), DropTarget::List(y));
    lists.apply(&plan);

    assert_eq!(lists.layout(y), pairs(&[("T", 0)]));
}

#[rstest]
fn append_skips_occupied_count_slot(mut lists: TwoLists) {
    let (x, y) = (lists.x, lists.y);
    let t = lists.add(x, "T", 0);
    lists.add(y, "A", 0);
    lists.add(y, "B", 5);

    let plan = plan_drag_over(&lists.store, DragSession::new(t), DropTarget::List(y));
    assert_eq!(plan.updates(), [PositionUpdate::new(t, y, 2)]);

    lists.add(y, "C", 3);
    let crowded = plan_drag_over(&lists.store, DragSession::new(t), DropTarget::List(y));
    assert_eq!(crowded.updates(), [PositionUpdate::new(t, y, 6)]);
}

#[rstest]
#[case::own_list(true)]
#[case::nowhere(false)]
fn drag_over_without_a_foreign_target_is_a_no_op(mut lists: TwoLists, #[case] own_list: bool) {
    let x = lists.x;
    let t = lists.add(x, "T", 0);
    let target = if own_list {
        DropTarget::List(x)
    } else {
        DropTarget::Nowhere
    };
    assert!(plan_drag_over(&lists.store, DragSession::new(t), target).is_empty());
}

#[rstest]
fn drag_over_unloaded_list_keeps_the_task_and_its_details(mut lists: TwoLists) {
    let x = lists.x;
    let t = lists.add(x, "T", 0);
    lists.store.upsert(checklist_item(t, "Repro", 0));
    let gone = ListId::new();

    let plan = plan_drag_over(&lists.store, DragSession::new(t), DropTarget::List(gone));

    assert!(plan.is_empty());
    assert_eq!(lists.layout(x), pairs(&[("T", 0)]));
    assert_eq!(lists.store.checklist_items_for_task(t).len(), 1);
}

#[rstest]
fn moves_into_an_unloaded_list_are_skipped(mut lists: TwoLists) {
    let x = lists.x;
    let t = lists.add(x, "T", 0);
    lists.store.upsert(checklist_item(t, "Repro", 0));

    let changed = lists
        .store
        .apply_positions::<Task>(&[PositionUpdate::new(t, ListId::new(), 4)]);

    assert_eq!(changed, 0);
    assert_eq!(lists.layout(x), pairs(&[("T", 0)]));
    assert_eq!(lists.store.checklist_items_for_task(t).len(), 1);
}

#[rstest]
fn drop_on_itself_or_nowhere_changes_nothing(mut lists: TwoLists) {
    let x = lists.x;
    let t = lists.add(x, "T", 0);
    lists.add(x, "U", 1);
    let session = DragSession::new(t);

    assert!(plan_drag_end(&lists.store, session, DropTarget::Task(t)).is_empty());
    assert!(plan_drag_end(&lists.store, session, DropTarget::Nowhere).is_empty());
    assert!(plan_drag_end(&lists.store, session, DropTarget::List(x)).is_empty());
}

#[rstest]
fn drop_on_task_in_other_list_leaves_cross_list_slot_alone(mut lists: TwoLists) {
    let (x, y) = (lists.x, lists.y);
    let t = lists.add(x, "T", 0);
    let u = lists.add(y, "U", 0);
    assert!(plan_drag_end(&lists.store, DragSession::new(t), DropTarget::Task(u)).is_empty());
}

#[rstest]
fn full_cross_list_drag_then_same_list_drop(mut lists: TwoLists) {
    let (x, y) = (lists.x, lists.y);
    let t = lists.add(x, "T", 0);
    let a = lists.add(y, "A", 0);
    let b = lists.add(y, "B", 1);

    let session = drag_start(&lists.store, t).expect("task loaded");
    let over = plan_drag_over(&lists.store, session, DropTarget::Task(b));
    lists.apply(&over);
    let end = plan_drag_end(&lists.store, session, DropTarget::Task(a));
    lists.apply(&end);

    assert_eq!(lists.layout(y), pairs(&[("T", 0), ("A", 1), ("B", 2)]));
}

#[test]
fn drag_start_requires_loaded_task() {
    assert!(drag_start(&EntityStore::new(), TaskId::new()).is_none());
}

#[test]
fn move_within_ignores_unknown_ids() {
    let owner = board("B");
    let column = list(owner.id, "L", 0);
    let first = task(column.id, "A", 0);
    let second = task(column.id, "B", 1);
    let siblings = [&first, &second];
    assert!(plan_move_within(&siblings, first.id, TaskId::new()).is_empty());
    assert_eq!(plan_move_within(&siblings, first.id, second.id).len(), 2);
}
