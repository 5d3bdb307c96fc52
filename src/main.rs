use anyhow::Result;
use avec::core::goal::{Goal, GoalType};
use avec::core::log::init_logging;
use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// A goal that is not saved yet
#[derive(Args)]
struct NewGoalArgs {
    /// Name of the goal
    name: String,
    /// Amount to reach
    target: f64,
    /// Desired monthly contribution; leave out to let the planner decide
    #[arg(short, long)]
    monthly: Option<f64>,
    /// Priority, lower numbers are funded first
    #[arg(short, long, default_value_t = avec::core::goal::DEFAULT_PRIORITY)]
    priority: u32,
    /// Target date (YYYY-MM-DD)
    #[arg(short, long)]
    by: Option<String>,
    /// One of payoff, savings, purchase
    #[arg(short, long, default_value = "savings")]
    goal_type: GoalType,
}

impl From<NewGoalArgs> for Goal {
    fn from(args: NewGoalArgs) -> Goal {
        let mut goal = Goal::new(args.name, args.goal_type, args.target)
            .with_priority(args.priority)
            .with_monthly_contribution(args.monthly.unwrap_or_default());
        if let Some(date) = args.by {
            goal = goal.with_target_date(date);
        }
        goal
    }
}

impl From<Commands> for avec::AppCommand {
    fn from(cmd: Commands) -> avec::AppCommand {
        match cmd {
            Commands::Plan => avec::AppCommand::Plan,
            Commands::Simulate(args) => avec::AppCommand::Simulate(args.into()),
            Commands::Rebalance(args) => avec::AppCommand::Rebalance(args.into()),
            Commands::Deadline { goal } => avec::AppCommand::Deadline(goal),
            Commands::Budget => avec::AppCommand::Budget,
            Commands::Milestones => avec::AppCommand::Milestones,
            Commands::Pay { goal, amount } => avec::AppCommand::Pay { goal, amount },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the monthly allocation plan
    Plan,
    /// Show how adding a goal would change the plan
    Simulate(NewGoalArgs),
    /// Suggest reductions that make room for a new goal
    Rebalance(NewGoalArgs),
    /// Check what a goal needs per month to meet its target date
    Deadline {
        /// Name of an existing goal
        goal: String,
    },
    /// Show the needs/wants/savings/extra budget split
    Budget,
    /// Report payoff milestones reached since the last check
    Milestones,
    /// Record a payment towards a goal
    Pay {
        /// Name of an existing goal
        goal: String,
        /// Amount paid
        amount: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => avec::cli::setup::setup_at_path(path),
            None => avec::cli::setup::setup(),
        },
        Some(cmd) => avec::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
