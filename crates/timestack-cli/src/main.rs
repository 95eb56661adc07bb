use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "timestack", version, about = "Timestack daily time ledger")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a day's timeline
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
    /// Log, move and judge blocks
    Block {
        #[command(subcommand)]
        action: commands::block::BlockAction,
    },
    /// Live stopwatch tracking
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Capture items to schedule later
    Inbox {
        #[command(subcommand)]
        action: commands::inbox::InboxAction,
    },
    /// Recurring blocks
    Routine {
        #[command(subcommand)]
        action: commands::routine::RoutineAction,
    },
    /// Weekly review and reset
    Review {
        #[command(subcommand)]
        action: commands::review::ReviewAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Day { action } => commands::day::run(action),
        Commands::Block { action } => commands::block::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Inbox { action } => commands::inbox::run(action),
        Commands::Routine { action } => commands::routine::run(action),
        Commands::Review { action } => commands::review::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
