use std::time::Duration;

use pomotrack_core::{Config, HttpPlanner, PlanRequest, TaskList};

use super::open_store;

pub fn run(minutes: u32) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let tasks = TaskList::load(open_store()?);
    let request = PlanRequest::new(minutes, tasks.labels())?;
    let planner = HttpPlanner::with_timeout(
        &config.planner.base_url,
        Duration::from_secs(config.planner.timeout_secs),
    )?;

    let rt = tokio::runtime::Runtime::new()?;
    let blocks = rt.block_on(planner.plan_day(&request))?;
    println!("{}", serde_json::to_string_pretty(&blocks)?);
    Ok(())
}
