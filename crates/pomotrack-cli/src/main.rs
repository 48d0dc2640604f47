use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pomotrack", version, about = "Focus timer with habit tracking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive timer
    Run,
    /// Habit statistics
    Habits {
        #[command(subcommand)]
        action: commands::habits::HabitsAction,
    },
    /// Task list management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Ask the planner to split the available time across tasks
    Plan {
        /// Minutes available today
        minutes: u32,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run => commands::run::run(),
        Commands::Habits { action } => commands::habits::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Plan { minutes } => commands::plan::run(minutes),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pomotrack", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_plan_minutes() {
        let cli = Cli::try_parse_from(["pomotrack", "plan", "90"]).unwrap();
        assert!(matches!(cli.command, Commands::Plan { minutes: 90 }));
    }

    #[test]
    fn rejects_negative_minutes() {
        assert!(Cli::try_parse_from(["pomotrack", "plan", "-5"]).is_err());
    }
}
