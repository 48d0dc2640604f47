//! Task list commands. Indexes are 1-based, as printed by `task list`.

use clap::Subcommand;
use pomotrack_core::{TaskList, ValidationError};

use super::open_store;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task text
        text: String,
    },
    /// List tasks
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a task completed
    Done {
        /// Task number from `task list`
        index: usize,
    },
    /// Mark a task not completed
    Undo {
        /// Task number from `task list`
        index: usize,
    },
    /// Delete a task
    Delete {
        /// Task number from `task list`
        index: usize,
    },
}

fn zero_based(index: usize, list: &TaskList) -> Result<usize, ValidationError> {
    index
        .checked_sub(1)
        .filter(|&i| i < list.len())
        .ok_or(ValidationError::OutOfBounds {
            collection: "tasks".into(),
            index,
            len: list.len(),
        })
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut list = TaskList::load(open_store()?);

    match action {
        TaskAction::Add { text } => {
            let task = list.add(&text)?;
            println!("Task added: {}", task.text);
        }
        TaskAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(list.tasks())?);
            } else if list.is_empty() {
                println!("No tasks.");
            } else {
                for (i, task) in list.tasks().iter().enumerate() {
                    let mark = if task.completed { "x" } else { " " };
                    println!("{:>3}. [{mark}] {}", i + 1, task.text);
                }
            }
        }
        TaskAction::Done { index } => {
            let i = zero_based(index, &list)?;
            list.set_completed(i, true)?;
            println!("Task {index} completed");
        }
        TaskAction::Undo { index } => {
            let i = zero_based(index, &list)?;
            list.set_completed(i, false)?;
            println!("Task {index} reopened");
        }
        TaskAction::Delete { index } => {
            let i = zero_based(index, &list)?;
            let task = list.remove(i)?;
            println!("Task deleted: {}", task.text);
        }
    }
    Ok(())
}
