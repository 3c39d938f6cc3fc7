use serde::{
  Deserialize,
  Serialize
};
use uuid::Uuid;

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  Light,
  Dark
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
  All,
  Active,
  Completed
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct TaskView {
  pub id:          Uuid,
  pub description: String,
  #[serde(default)]
  pub completed:   bool,
  #[serde(default)]
  pub visible:     bool
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct ViewSnapshot {
  pub tasks:         Vec<TaskView>,
  pub active_count:  usize,
  pub filter:        Filter,
  pub theme:         Theme,
  pub show_controls: bool
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::{
    Filter,
    TaskView,
    Theme,
    ViewSnapshot
  };

  #[test]
  fn snapshot_serializes_lowercase_modes() {
    let snapshot = ViewSnapshot {
      tasks:         vec![TaskView {
        id:          Uuid::new_v4(),
        description: "Buy milk".to_string(),
        completed:   false,
        visible:     true
      }],
      active_count:  1,
      filter:        Filter::Active,
      theme:         Theme::Dark,
      show_controls: true
    };

    let json = serde_json::to_string(&snapshot).expect("serialize snapshot");
    assert!(json.contains("\"filter\":\"active\""));
    assert!(json.contains("\"theme\":\"dark\""));

    let back: ViewSnapshot = serde_json::from_str(&json).expect("parse snapshot");
    assert_eq!(back, snapshot);
  }
}
