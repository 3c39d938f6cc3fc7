use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Task {
    pub id: Uuid,
    pub description: String,
    pub completed: bool,
}

// On-disk shape. Ids are not persisted; a fresh one is minted on every load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub description: String,

    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            completed: false,
        }
    }

    pub fn from_record(record: TaskRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: record.description,
            completed: record.completed,
        }
    }

    pub fn record(&self) -> TaskRecord {
        TaskRecord {
            description: self.description.clone(),
            completed: self.completed,
        }
    }
}
