//! Free-text task list, persisted under the `tasks` key.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::storage::KeyValueStore;

pub const TASKS_KEY: &str = "tasks";

/// Label used for micro sessions when nothing is pending.
pub const FALLBACK_TASK: &str = "Any pending work";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

pub struct TaskList {
    tasks: Vec<Task>,
    store: Rc<dyn KeyValueStore>,
}

impl TaskList {
    /// Load the stored list; missing or malformed data gives an empty list.
    pub fn load(store: Rc<dyn KeyValueStore>) -> Self {
        let tasks = match store.get(TASKS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring malformed task list");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read task list");
                Vec::new()
            }
        };
        Self { tasks, store }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Every label, completed or not, in list order.
    pub fn labels(&self) -> Vec<String> {
        self.tasks.iter().map(|t| t.text.clone()).collect()
    }

    pub fn first_pending(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| !t.completed)
    }

    /// Append a task. Surrounding whitespace is trimmed; blank text is rejected.
    pub fn add(&mut self, text: &str) -> Result<&Task> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText("task text".into()).into());
        }
        self.tasks.push(Task {
            text: text.to_string(),
            completed: false,
        });
        self.save()?;
        let idx = self.tasks.len() - 1;
        Ok(&self.tasks[idx])
    }

    pub fn set_completed(&mut self, index: usize, completed: bool) -> Result<()> {
        self.check_index(index)?;
        self.tasks[index].completed = completed;
        self.save()
    }

    pub fn remove(&mut self, index: usize) -> Result<Task> {
        self.check_index(index)?;
        let task = self.tasks.remove(index);
        self.save()?;
        Ok(task)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.tasks.len() {
            return Err(ValidationError::OutOfBounds {
                collection: "tasks".into(),
                index,
                len: self.tasks.len(),
            }
            .into());
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string(&self.tasks)?;
        self.store.set(TASKS_KEY, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::storage::MemoryStore;

    #[test]
    fn add_trims_and_persists() {
        let store = Rc::new(MemoryStore::new());
        let mut list = TaskList::load(store.clone());
        list.add("  Write report ").unwrap();

        let reloaded = TaskList::load(store);
        assert_eq!(reloaded.labels(), vec!["Write report".to_string()]);
        assert!(!reloaded.tasks()[0].completed);
    }

    #[test]
    fn blank_text_is_rejected() {
        let mut list = TaskList::load(Rc::new(MemoryStore::new()));
        assert!(matches!(
            list.add("   "),
            Err(CoreError::Validation(ValidationError::EmptyText(_)))
        ));
        assert!(list.is_empty());
    }

    #[test]
    fn completion_toggles_and_first_pending_skips_done() {
        let mut list = TaskList::load(Rc::new(MemoryStore::new()));
        list.add("a").unwrap();
        list.add("b").unwrap();
        list.set_completed(0, true).unwrap();
        assert_eq!(list.first_pending().map(|t| t.text.as_str()), Some("b"));
        list.set_completed(0, false).unwrap();
        assert_eq!(list.first_pending().map(|t| t.text.as_str()), Some("a"));
    }

    #[test]
    fn remove_out_of_bounds_fails() {
        let mut list = TaskList::load(Rc::new(MemoryStore::new()));
        list.add("a").unwrap();
        assert!(list.remove(3).is_err());
        assert_eq!(list.remove(0).unwrap().text, "a");
        assert!(list.is_empty());
    }

    #[test]
    fn stored_tasks_without_completed_flag_load() {
        let store = Rc::new(MemoryStore::new().with_entry(TASKS_KEY, r#"[{"text":"old"}]"#));
        let list = TaskList::load(store);
        assert_eq!(list.len(), 1);
        assert!(!list.tasks()[0].completed);
    }

    #[test]
    fn malformed_list_loads_empty() {
        let store = Rc::new(MemoryStore::new().with_entry(TASKS_KEY, "{}"));
        assert!(TaskList::load(store).is_empty());
    }
}
