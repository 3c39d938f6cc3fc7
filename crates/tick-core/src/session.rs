use std::path::Path;

use tracing::info;
use uuid::Uuid;

use tick_shared::{Filter, TaskView, Theme, ViewSnapshot};

use crate::datastore::DataStore;
use crate::error::Error;
use crate::filter::{FilterController, FilterMode};
use crate::store::TaskStore;
use crate::task::Task;
use crate::theme::{ThemeMode, ThemePreference};

// One explicitly constructed context object owns the whole core; no ambient
// singletons. The presentation host holds this and nothing else.
#[derive(Debug)]
pub struct Session {
    persist: DataStore,
    tasks: TaskStore,
    filter: FilterController,
    theme: ThemePreference,
}

impl Session {
    #[tracing::instrument(skip(data_dir))]
    pub fn load(data_dir: &Path) -> Self {
        let persist = DataStore::open(data_dir);

        let mut tasks = TaskStore::default();
        tasks.load_from(persist.load_tasks());

        let mut theme = ThemePreference::default();
        theme.load_from(persist.load_theme());

        info!(
            tasks = tasks.len(),
            active = tasks.active_count(),
            theme = %theme.current(),
            "session loaded"
        );

        Self {
            persist,
            tasks,
            filter: FilterController::default(),
            theme,
        }
    }

    pub fn add(&mut self, description: &str) -> Result<Task, Error> {
        self.tasks.add(&self.persist, description)
    }

    pub fn toggle(&mut self, id: Uuid) -> Result<Task, Error> {
        self.tasks.toggle(&self.persist, id)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Task, Error> {
        self.tasks.remove(&self.persist, id)
    }

    pub fn clear_completed(&mut self) -> usize {
        self.tasks.clear_completed(&self.persist)
    }

    pub fn set_filter(&mut self, mode: FilterMode) {
        self.filter.set_mode(mode);
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter.mode()
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme.toggle(&self.persist)
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme.current()
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn active_count(&self) -> usize {
        self.tasks.active_count()
    }

    pub fn degraded(&self) -> bool {
        self.persist.degraded()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let rows = self
            .tasks
            .tasks()
            .iter()
            .map(|task| TaskView {
                id: task.id,
                description: task.description.clone(),
                completed: task.completed,
                visible: self.filter.is_visible(task),
            })
            .collect();

        ViewSnapshot {
            tasks: rows,
            active_count: self.tasks.active_count(),
            filter: view_filter(self.filter.mode()),
            theme: view_theme(self.theme.current()),
            show_controls: !self.tasks.is_empty(),
        }
    }
}

fn view_filter(mode: FilterMode) -> Filter {
    match mode {
        FilterMode::All => Filter::All,
        FilterMode::Active => Filter::Active,
        FilterMode::Completed => Filter::Completed,
    }
}

fn view_theme(mode: ThemeMode) -> Theme {
    match mode {
        ThemeMode::Light => Theme::Light,
        ThemeMode::Dark => Theme::Dark,
    }
}
