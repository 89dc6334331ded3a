use crate::storage::Persistence;
use crate::task::{Priority, Task};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterOption {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterOption {
    pub const ALL: [FilterOption; 3] = [
        FilterOption::All,
        FilterOption::Active,
        FilterOption::Completed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterOption::All => "All",
            FilterOption::Active => "Active",
            FilterOption::Completed => "Completed",
        }
    }

    pub fn next(self) -> Self {
        match self {
            FilterOption::All => FilterOption::Active,
            FilterOption::Active => FilterOption::Completed,
            FilterOption::Completed => FilterOption::All,
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            FilterOption::All => true,
            FilterOption::Active => !task.is_completed,
            FilterOption::Completed => task.is_completed,
        }
    }
}

/// Owns the task collection and writes it back after every change.
///
/// `tasks` keeps insertion order; the sorted presentation order is derived on
/// demand by [`TaskStore::filtered_tasks`]. A failing [`Persistence`] never
/// surfaces to callers: the in-memory state is updated regardless.
#[derive(Debug)]
pub struct TaskStore<P: Persistence> {
    tasks: Vec<Task>,
    filter: FilterOption,
    persistence: P,
}

impl<P: Persistence> TaskStore<P> {
    pub fn new(persistence: P) -> Self {
        let tasks = match persistence.load() {
            Ok(Some(tasks)) => {
                info!(count = tasks.len(), "loaded saved tasks");
                dedup_ids(tasks)
            }
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("Failed to load tasks, starting empty: {}", err);
                Vec::new()
            }
        };
        Self {
            tasks,
            filter: FilterOption::default(),
            persistence,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn filter(&self) -> FilterOption {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FilterOption) {
        self.filter = filter;
    }

    pub fn add_task(
        &mut self,
        title: String,
        description: String,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> Uuid {
        let task = Task::new(title)
            .with_description(description)
            .with_priority(priority)
            .with_due_date(due_date);
        let id = task.id;
        debug!(%id, "adding task");
        self.tasks.push(task);
        self.save();
        id
    }

    /// Flips completion of the matching task. Returns `false` if no task has `id`.
    pub fn toggle_task(&mut self, id: Uuid) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.is_completed = !task.is_completed;
        debug!(%id, completed = task.is_completed, "toggled task");
        self.save();
        true
    }

    /// Replaces the stored record that shares `task.id`. The stored
    /// `created_at` is kept whatever the incoming record carries.
    pub fn update_task(&mut self, mut task: Task) -> bool {
        let Some(index) = self.tasks.iter().position(|t| t.id == task.id) else {
            return false;
        };
        debug!(id = %task.id, "updating task");
        task.created_at = self.tasks[index].created_at;
        self.tasks[index] = task;
        self.save();
        true
    }

    pub fn delete_task(&mut self, id: Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        debug!(%id, "deleted task");
        self.save();
        true
    }

    pub fn delete_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.is_completed);
        let removed = before - self.tasks.len();
        debug!(removed, "deleted completed tasks");
        self.save();
        removed
    }

    /// Tasks matching the current filter, highest priority first, then newest
    /// first. The sort is stable so full ties keep insertion order.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| self.filter.matches(t))
            .collect();
        tasks.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        tasks
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_completed).count()
    }

    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_completed).count()
    }

    pub fn total_count(&self) -> usize {
        self.tasks.len()
    }

    fn save(&self) {
        if let Err(err) = self.persistence.save(&self.tasks) {
            warn!("Failed to save tasks: {}", err);
        }
    }
}

/// Keeps the first record for each id.
fn dedup_ids(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    let before = tasks.len();
    let tasks: Vec<Task> = tasks.into_iter().filter(|t| seen.insert(t.id)).collect();
    if tasks.len() != before {
        warn!(
            dropped = before - tasks.len(),
            "saved tasks contained duplicate ids"
        );
    }
    tasks
}
