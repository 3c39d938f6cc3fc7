use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::datastore::DataStore;
use crate::error::Error;
use crate::task::{Task, TaskRecord};

#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    active_count: usize,
}

impl TaskStore {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[instrument(skip(self, persist, description))]
    pub fn add(&mut self, persist: &DataStore, description: &str) -> Result<Task, Error> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        let task = Task::new(description.to_string());
        self.tasks.push(task.clone());
        self.active_count += 1;
        self.persist_into(persist);

        info!(id = %task.id, count = self.tasks.len(), "added task");
        Ok(task)
    }

    #[instrument(skip(self, persist), fields(id = %id))]
    pub fn toggle(&mut self, persist: &DataStore, id: Uuid) -> Result<Task, Error> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id))?;

        task.completed = !task.completed;
        let task = task.clone();
        if task.completed {
            self.active_count -= 1;
        } else {
            self.active_count += 1;
        }
        self.persist_into(persist);

        info!(completed = task.completed, "toggled task");
        Ok(task)
    }

    #[instrument(skip(self, persist), fields(id = %id))]
    pub fn remove(&mut self, persist: &DataStore, id: Uuid) -> Result<Task, Error> {
        let idx = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id))?;

        let task = self.tasks.remove(idx);
        if !task.completed {
            self.active_count -= 1;
        }
        self.persist_into(persist);

        info!(remaining = self.tasks.len(), "removed task");
        Ok(task)
    }

    // Batch removal; a run with nothing completed performs no storage write.
    #[instrument(skip(self, persist))]
    pub fn clear_completed(&mut self, persist: &DataStore) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        let removed = before - self.tasks.len();

        if removed > 0 {
            self.persist_into(persist);
        }

        info!(removed, remaining = self.tasks.len(), "cleared completed tasks");
        removed
    }

    // Wholesale replacement at startup. Never writes back what was just read.
    #[instrument(skip(self, records))]
    pub fn load_from(&mut self, records: Vec<TaskRecord>) {
        self.tasks = records.into_iter().map(Task::from_record).collect();
        self.active_count = self.tasks.iter().filter(|task| !task.completed).count();
        debug!(count = self.tasks.len(), active = self.active_count, "loaded tasks");
    }

    fn persist_into(&self, persist: &DataStore) {
        let records: Vec<TaskRecord> = self.tasks.iter().map(Task::record).collect();
        persist.save_tasks(&records);
        debug_assert_eq!(
            self.active_count,
            self.tasks.iter().filter(|task| !task.completed).count()
        );
    }
}
