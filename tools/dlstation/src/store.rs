use crate::types::Task;

/// Ordered collection of task records. Newest entries sit at the front;
/// a refresh replaces the whole collection at once so readers never see a
/// half-updated list.
#[derive(Debug, Default, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard prior contents and install `tasks` as the new collection.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Add one record as the newest entry (optimistic add pending the next
    /// refresh).
    pub fn insert_front(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    /// Remove by identity. Returns false when no record carries `id`.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Sum of all instantaneous speeds, (download, upload).
    pub fn total_speeds(&self) -> (u64, u64) {
        self.tasks.iter().fold((0, 0), |(down, up), task| {
            (
                down.saturating_add(task.speed_down_bps),
                up.saturating_add(task.speed_up_bps),
            )
        })
    }
}

/// Tracks the highlighted task by id. The id is re-resolved against the
/// store on every access, so the cursor can never point at a freed record;
/// mutations that remove the target are followed by a repair.
#[derive(Debug, Default, Clone)]
pub struct SelectionCursor {
    selected: Option<String>,
}

impl SelectionCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current<'a>(&self, store: &'a TaskStore) -> Option<&'a Task> {
        let id = self.selected.as_deref()?;
        let index = store.position(id)?;
        store.get(index)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Ordinal position of the selection, 0 when nothing is selected.
    pub fn ordinal(&self, store: &TaskStore) -> usize {
        self.selected
            .as_deref()
            .and_then(|id| store.position(id))
            .unwrap_or(0)
    }

    pub fn first(&mut self, store: &TaskStore) {
        self.select_index(store, 0);
    }

    pub fn last(&mut self, store: &TaskStore) {
        if store.is_empty() {
            self.selected = None;
            return;
        }
        self.select_index(store, store.len() - 1);
    }

    pub fn prev(&mut self, store: &TaskStore) {
        self.step_back(store, 1);
    }

    pub fn next(&mut self, store: &TaskStore) {
        self.step_forward(store, 1);
    }

    pub fn prev_page(&mut self, store: &TaskStore, page: usize) {
        self.step_back(store, page.max(1));
    }

    pub fn next_page(&mut self, store: &TaskStore, page: usize) {
        self.step_forward(store, page.max(1));
    }

    /// Re-resolve after a store mutation: keep the selection when its record
    /// survived, otherwise fall back to the first record (or none).
    pub fn reconcile(&mut self, store: &TaskStore) {
        match self.selected.as_deref() {
            Some(id) if store.position(id).is_some() => {}
            _ => self.first(store),
        }
    }

    /// Repair after the record at `removed_index` was deleted: prefer the
    /// record that moved into its slot, fall back to the previous one, and
    /// clear when the store emptied out.
    pub fn repair_after_remove(&mut self, store: &TaskStore, removed_index: usize) {
        let index = if removed_index < store.len() {
            removed_index
        } else if store.is_empty() {
            self.selected = None;
            return;
        } else {
            store.len() - 1
        };
        self.select_index(store, index);
    }

    fn step_back(&mut self, store: &TaskStore, steps: usize) {
        let Some(index) = self.resolved_index(store) else {
            return;
        };
        self.select_index(store, index.saturating_sub(steps));
    }

    fn step_forward(&mut self, store: &TaskStore, steps: usize) {
        let Some(index) = self.resolved_index(store) else {
            return;
        };
        let last = store.len().saturating_sub(1);
        self.select_index(store, (index + steps).min(last));
    }

    fn resolved_index(&self, store: &TaskStore) -> Option<usize> {
        store.position(self.selected.as_deref()?)
    }

    fn select_index(&mut self, store: &TaskStore, index: usize) {
        self.selected = store.get(index).map(|task| task.id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectionCursor, TaskStore};
    use crate::types::{Task, TaskStatus};

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            title: format!("{id}.iso"),
            status: TaskStatus::Downloading,
            size_bytes: 1000,
            downloaded_bytes: 100,
            uploaded_bytes: 0,
            speed_down_bps: 10,
            speed_up_bps: 5,
        }
    }

    fn store_with(ids: &[&str]) -> TaskStore {
        let mut store = TaskStore::new();
        for id in ids {
            store.insert_front(task(id));
        }
        store
    }

    #[test]
    fn insert_front_yields_newest_first() {
        let store = store_with(&["a", "b", "c"]);
        let order = store.iter().map(|t| t.id.as_str()).collect::<Vec<_>>();
        assert_eq!(order, ["c", "b", "a"]);
    }

    #[test]
    fn remove_reports_missing_ids() {
        let mut store = store_with(&["a"]);
        assert!(store.remove("a"));
        assert!(!store.remove("a"));
        assert!(store.is_empty());
    }

    #[test]
    fn replace_all_is_idempotent() {
        let mut store = TaskStore::new();
        let tasks = vec![task("x"), task("y")];
        store.replace_all(tasks.clone());
        let first = store.iter().cloned().collect::<Vec<_>>();
        store.replace_all(tasks);
        let second = store.iter().cloned().collect::<Vec<_>>();
        assert_eq!(first, second);
    }

    #[test]
    fn total_speeds_sum_over_all_tasks() {
        let store = store_with(&["a", "b", "c"]);
        assert_eq!(store.total_speeds(), (30, 15));
    }

    #[test]
    fn navigation_stops_at_boundaries_without_wrapping() {
        let store = store_with(&["a", "b", "c"]);
        let mut cursor = SelectionCursor::new();
        cursor.first(&store);
        assert_eq!(cursor.selected_id(), Some("c"));

        cursor.prev(&store);
        assert_eq!(cursor.selected_id(), Some("c"), "prev at first is a no-op");

        cursor.last(&store);
        assert_eq!(cursor.selected_id(), Some("a"));
        cursor.next(&store);
        assert_eq!(cursor.selected_id(), Some("a"), "next at last is a no-op");
    }

    #[test]
    fn paging_stops_early_at_boundaries() {
        let store = store_with(&["a", "b", "c", "d", "e"]);
        let mut cursor = SelectionCursor::new();
        cursor.first(&store);

        cursor.next_page(&store, 3);
        assert_eq!(cursor.ordinal(&store), 3);
        cursor.next_page(&store, 3);
        assert_eq!(cursor.ordinal(&store), 4, "clipped to the last record");
        cursor.prev_page(&store, 10);
        assert_eq!(cursor.ordinal(&store), 0, "clipped to the first record");
    }

    #[test]
    fn empty_store_leaves_cursor_at_none() {
        let store = TaskStore::new();
        let mut cursor = SelectionCursor::new();
        cursor.first(&store);
        assert!(cursor.current(&store).is_none());
        cursor.last(&store);
        cursor.next(&store);
        cursor.prev(&store);
        assert!(cursor.selected_id().is_none());
    }

    #[test]
    fn repair_prefers_next_then_previous_then_none() {
        let mut store = store_with(&["a", "b", "c"]);
        let mut cursor = SelectionCursor::new();
        cursor.first(&store); // "c" at index 0

        let index = store.position("c").unwrap_or_default();
        store.remove("c");
        cursor.repair_after_remove(&store, index);
        assert_eq!(cursor.selected_id(), Some("b"), "prefers the next record");

        cursor.last(&store); // "a"
        let index = store.position("a").unwrap_or_default();
        store.remove("a");
        cursor.repair_after_remove(&store, index);
        assert_eq!(cursor.selected_id(), Some("b"), "falls back to previous");

        let index = store.position("b").unwrap_or_default();
        store.remove("b");
        cursor.repair_after_remove(&store, index);
        assert!(cursor.selected_id().is_none(), "empty store clears selection");
    }

    #[test]
    fn reconcile_keeps_selection_by_id_across_refresh() {
        let mut store = store_with(&["a", "b", "c"]);
        let mut cursor = SelectionCursor::new();
        cursor.last(&store); // "a"

        store.replace_all(vec![task("b"), task("a")]);
        cursor.reconcile(&store);
        assert_eq!(cursor.selected_id(), Some("a"));

        store.replace_all(vec![task("x"), task("y")]);
        cursor.reconcile(&store);
        assert_eq!(cursor.selected_id(), Some("x"), "vanished id resets to first");

        store.replace_all(Vec::new());
        cursor.reconcile(&store);
        assert!(cursor.selected_id().is_none());
    }
}
