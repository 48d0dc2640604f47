//! Interactive timer session.
//!
//! Reads one command per line from stdin while the countdown ticks. Stdin,
//! ticks, an outstanding planner request, the idle check and Ctrl-C are
//! multiplexed on a single task, so every dashboard mutation happens in
//! order and a slow planner never holds up the countdown.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use pomotrack_core::{
    Config, Dashboard, HttpPlanner, IntervalTicker, KeyValueStore, Mode, Notification, Notifier,
    PlanRequest, PlannedBlock, PlannerError, SystemClock, TickSource,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::open_store;

const HELP: &str = "\
commands:
  start | pause | reset         timer controls
  mode <focus|short|long|deep|micro>
  next                          start the next plan block
  micro                         5-minute session on the first pending task
  close                         hide the break overlay
  plan <minutes>                request a day plan for the current tasks
  add <text> | done <n> | undo <n> | del <n>
  ask <question>                study assistant
  join <code>                   join a study room
  status | help | quit";

const IDLE_CHECK: Duration = Duration::from_secs(60);

type PlanCall<'a> = Pin<Box<dyn Future<Output = Result<Vec<PlannedBlock>, PlannerError>> + 'a>>;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    Mode(Mode),
    Next,
    Micro,
    Close,
    Plan(u32),
    Add(String),
    Done(usize),
    Undo(usize),
    Delete(usize),
    Ask(String),
    Join(String),
    Status,
    Help,
    Quit,
}

fn task_number(arg: &str) -> Result<usize, String> {
    match arg.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("expected a task number, got '{}'", arg.trim())),
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        match word.to_ascii_lowercase().as_str() {
            "start" => Ok(Command::Start),
            "pause" => Ok(Command::Pause),
            "reset" => Ok(Command::Reset),
            "mode" => rest.parse().map(Command::Mode),
            "next" => Ok(Command::Next),
            "micro" => Ok(Command::Micro),
            "close" => Ok(Command::Close),
            "plan" => rest
                .parse()
                .map(Command::Plan)
                .map_err(|_| format!("expected minutes, got '{rest}'")),
            "add" => Ok(Command::Add(rest.to_string())),
            "done" => task_number(rest).map(Command::Done),
            "undo" => task_number(rest).map(Command::Undo),
            "del" | "delete" => task_number(rest).map(Command::Delete),
            "ask" => Ok(Command::Ask(rest.to_string())),
            "join" => Ok(Command::Join(rest.to_string())),
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err("empty command".into()),
            other => Err(format!("unknown command '{other}' (try 'help')")),
        }
    }
}

/// Prints notifications as plain lines.
#[derive(Debug, Default)]
pub struct TerminalNotifier {
    last_display: String,
}

impl Notifier for TerminalNotifier {
    fn notify(&mut self, notification: Notification) {
        match notification {
            Notification::Display(time) => {
                if time != self.last_display {
                    println!("  {time}");
                    self.last_display = time;
                }
            }
            Notification::ModeChanged(mode) => println!("mode: {mode}"),
            Notification::Overlay(true) => println!("--- break time! type 'close' to dismiss ---"),
            Notification::Overlay(false) => {}
            Notification::SessionDots { filled, total } => {
                let dots: String = (0..total)
                    .map(|i| if i < filled { '●' } else { '○' })
                    .collect();
                println!("sessions: {dots}");
            }
            Notification::Habits(h) => println!(
                "xp: {}  streak: {} day(s)  today: {} session(s)",
                h.xp, h.day_streak, h.sessions_today
            ),
            Notification::Celebrate(message) => println!("{message}"),
            Notification::BlockText(text) => println!("current block: {text}"),
            Notification::Plan(blocks) => {
                for block in blocks {
                    let mark = if block.done { "x" } else { " " };
                    println!("  [{mark}] {} - {} min", block.task_title, block.duration_min);
                }
            }
            Notification::Tasks(tasks) => {
                for (i, task) in tasks.iter().enumerate() {
                    let mark = if task.completed { "x" } else { " " };
                    println!("  {:>2}. [{mark}] {}", i + 1, task.text);
                }
            }
            Notification::Chat { speaker, text } => println!("{speaker}> {text}"),
            Notification::Room { status, members } => {
                println!("{status}");
                for member in members {
                    println!("  {member}");
                }
            }
            Notification::Error(message) => eprintln!("error: {message}"),
        }
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = open_store()?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(session(config, store))
}

async fn session(
    config: Config,
    store: Rc<dyn KeyValueStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    let planner = HttpPlanner::with_timeout(
        &config.planner.base_url,
        Duration::from_secs(config.planner.timeout_secs),
    )?;
    let (ticker, mut ticks) = IntervalTicker::channel(Duration::from_secs(1));
    let mut dashboard = Dashboard::new(
        &config,
        ticker,
        TerminalNotifier::default(),
        store,
        Rc::new(SystemClock),
    );
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut idle_check = tokio::time::interval(IDLE_CHECK);
    idle_check.tick().await;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut plan_call: Option<PlanCall<'_>> = None;

    loop {
        tokio::select! {
            Some(_) = ticks.recv() => {
                if let Some(event) = dashboard.on_tick() {
                    tracing::debug!(?event, "tick event");
                }
            }
            result = async {
                match plan_call.as_mut() {
                    Some(call) => call.await,
                    None => std::future::pending().await,
                }
            }, if plan_call.is_some() => {
                plan_call = None;
                match result {
                    Ok(blocks) => dashboard.apply_plan(blocks),
                    Err(e) => dashboard.report_error(&e),
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => {
                        if let Some(request) = apply(&mut dashboard, command) {
                            if plan_call.is_some() {
                                eprintln!("a plan request is already in progress");
                            } else {
                                let planner = &planner;
                                plan_call =
                                    Some(Box::pin(async move { planner.plan_day(&request).await }));
                                println!("Requesting plan...");
                            }
                        }
                    }
                    Err(e) => eprintln!("{e}"),
                }
            }
            _ = idle_check.tick() => {
                if dashboard.idle_nudge_due(Utc::now()) {
                    tracing::info!("Idle nudge");
                    println!("Still there? Type 'start' to begin a session.");
                }
            }
            _ = &mut ctrl_c => break,
        }
    }
    Ok(())
}

/// Apply a command to the dashboard. A validated plan request is returned
/// for the caller to send.
fn apply<T: TickSource>(
    dashboard: &mut Dashboard<T, TerminalNotifier>,
    command: Command,
) -> Option<PlanRequest> {
    let result = match command {
        Command::Start => {
            dashboard.start();
            Ok(())
        }
        Command::Pause => {
            dashboard.pause();
            Ok(())
        }
        Command::Reset => {
            dashboard.reset();
            Ok(())
        }
        Command::Mode(mode) => {
            dashboard.select_mode(mode);
            Ok(())
        }
        Command::Next => {
            if dashboard.start_next_block().is_none() && dashboard.plan().is_empty() {
                println!("No plan yet. Use 'plan <minutes>'.");
            }
            Ok(())
        }
        Command::Micro => {
            dashboard.start_micro_session();
            Ok(())
        }
        Command::Close => {
            dashboard.dismiss_overlay();
            Ok(())
        }
        Command::Plan(minutes) => match dashboard.plan_request(minutes) {
            Ok(request) => return Some(request),
            Err(e) => {
                dashboard.report_error(&e);
                Ok(())
            }
        },
        Command::Add(text) => dashboard.add_task(&text),
        Command::Done(i) => dashboard.set_task_completed(i, true),
        Command::Undo(i) => dashboard.set_task_completed(i, false),
        Command::Delete(i) => dashboard.remove_task(i),
        Command::Ask(question) => {
            dashboard.ask(&question);
            Ok(())
        }
        Command::Join(code) => {
            dashboard.join_room(&code);
            Ok(())
        }
        Command::Status => {
            print_status(dashboard);
            Ok(())
        }
        Command::Help => {
            println!("{HELP}");
            Ok(())
        }
        Command::Quit => Ok(()),
    };

    if let Err(e) = result {
        dashboard.report_error(&e);
    }
    None
}

fn print_status<T: TickSource>(dashboard: &Dashboard<T, TerminalNotifier>) {
    let engine = dashboard.engine();
    let state = if engine.is_running() { "running" } else { "paused" };
    println!(
        "{} {} [{}]{}",
        engine.mode(),
        engine.display(),
        state,
        engine
            .label()
            .map(|l| format!(" {l}"))
            .unwrap_or_default()
    );
    if let Some(block) = dashboard.plan().current_block() {
        println!("block: {} - {} min", block.task_title, block.duration_min);
    }
    if let Some(room) = dashboard.room() {
        println!("room {}: {} member(s)", room.code(), room.members().len());
    }
}
