//! Day plan: ordered work blocks returned by the planner, and the cursor
//! tracking which block is being worked on.

mod client;

pub use client::{HttpPlanner, PlanRequest, PlannedBlock};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanBlock {
    pub task_title: String,
    pub duration_min: u32,
    pub done: bool,
}

impl From<PlannedBlock> for PlanBlock {
    fn from(block: PlannedBlock) -> Self {
        Self {
            task_title: block.task_title,
            duration_min: block.duration_minutes,
            done: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DayPlan {
    blocks: Vec<PlanBlock>,
    current: Option<usize>,
}

impl DayPlan {
    pub fn new(blocks: impl IntoIterator<Item = PlannedBlock>) -> Self {
        Self {
            blocks: blocks.into_iter().map(PlanBlock::from).collect(),
            current: None,
        }
    }

    pub fn blocks(&self) -> &[PlanBlock] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_block(&self) -> Option<&PlanBlock> {
        self.current.and_then(|i| self.blocks.get(i))
    }

    pub fn all_done(&self) -> bool {
        self.blocks.iter().all(|b| b.done)
    }

    /// Move the cursor to the next unfinished block.
    ///
    /// Looks after the cursor first, then wraps to the start. Returns `None`
    /// when every block is done.
    pub fn advance(&mut self) -> Option<&PlanBlock> {
        let after = self.current.map_or(0, |i| i + 1);
        let next = self
            .blocks
            .iter()
            .enumerate()
            .skip(after)
            .find(|(_, b)| !b.done)
            .or_else(|| self.blocks.iter().enumerate().find(|(_, b)| !b.done))
            .map(|(i, _)| i)?;
        self.current = Some(next);
        self.blocks.get(next)
    }

    /// Mark the block under the cursor done. Returns false if there is none.
    pub fn finish_current(&mut self) -> bool {
        match self.current.and_then(|i| self.blocks.get_mut(i)) {
            Some(block) => {
                block.done = true;
                true
            }
            None => false,
        }
    }
}
