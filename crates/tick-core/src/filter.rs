use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::Error;
use crate::task::Task;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default
)]
pub enum FilterMode {
  #[default]
  All,
  Active,
  Completed
}

impl FilterMode {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::All => "all",
      | Self::Active => "active",
      | Self::Completed => "completed"
    }
  }
}

impl fmt::Display for FilterMode {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for FilterMode {
  type Err = Error;

  fn from_str(
    raw: &str
  ) -> Result<Self, Self::Err> {
    match raw
      .to_ascii_lowercase()
      .as_str()
    {
      | "all" => Ok(Self::All),
      | "active" => Ok(Self::Active),
      | "completed" => {
        Ok(Self::Completed)
      }
      | _ => {
        Err(Error::UnknownFilterMode(
          raw.to_string()
        ))
      }
    }
  }
}

#[derive(Debug, Default)]
pub struct FilterController {
  mode: FilterMode
}

impl FilterController {
  pub fn mode(&self) -> FilterMode {
    self.mode
  }

  pub fn set_mode(
    &mut self,
    mode: FilterMode
  ) {
    debug!(mode = %mode, "set filter mode");
    self.mode = mode;
  }

  pub fn is_visible(
    &self,
    task: &Task
  ) -> bool {
    match self.mode {
      | FilterMode::All => true,
      | FilterMode::Active => {
        !task.completed
      }
      | FilterMode::Completed => {
        task.completed
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::{
    FilterController,
    FilterMode
  };
  use crate::error::Error;
  use crate::task::Task;

  fn sample_tasks() -> Vec<Task> {
    let mut tasks = vec![
      Task::new("a".to_string()),
      Task::new("b".to_string()),
      Task::new("c".to_string()),
    ];
    tasks[1].completed = true;
    tasks
  }

  #[test]
  fn modes_partition_the_task_list() {
    let tasks = sample_tasks();
    let mut controller =
      FilterController::default();

    controller
      .set_mode(FilterMode::Active);
    let active: Vec<&Task> = tasks
      .iter()
      .filter(|task| {
        controller.is_visible(task)
      })
      .collect();

    controller
      .set_mode(FilterMode::Completed);
    let completed: Vec<&Task> = tasks
      .iter()
      .filter(|task| {
        controller.is_visible(task)
      })
      .collect();

    assert_eq!(active.len(), 2);
    assert_eq!(completed.len(), 1);
    assert_eq!(
      active.len() + completed.len(),
      tasks.len()
    );
    assert!(active.iter().all(|task| {
      completed
        .iter()
        .all(|other| other.id != task.id)
    }));

    controller.set_mode(FilterMode::All);
    assert!(tasks.iter().all(|task| {
      controller.is_visible(task)
    }));
  }

  #[test]
  fn default_mode_is_all() {
    let controller =
      FilterController::default();
    assert_eq!(
      controller.mode(),
      FilterMode::All
    );
  }

  #[test]
  fn parse_accepts_known_modes_only() {
    assert_eq!(
      "Active"
        .parse::<FilterMode>()
        .expect("parse active"),
      FilterMode::Active
    );
    assert!(matches!(
      "urgent".parse::<FilterMode>(),
      Err(Error::UnknownFilterMode(_))
    ));
  }
}
