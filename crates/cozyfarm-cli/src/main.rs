use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cozyfarm-cli", version, about = "Cozy Habit Farm CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the farm owner if there is none yet
    Init,
    /// Mark onboarding as completed
    Onboard,
    /// Adopt and inspect animals
    Animal {
        #[command(subcommand)]
        action: commands::animal::AnimalAction,
    },
    /// Check in an animal's habit for today
    Checkin {
        /// Animal ID
        id: String,
    },
    /// Whether an animal can still check in today
    CanCheckin {
        /// Animal ID
        id: String,
    },
    /// Reclassify every animal's mood now
    Refresh,
    /// Keep refreshing moods and print farm events until Ctrl-C
    Watch {
        /// Seconds between refreshes (default: refresh.interval_secs)
        #[arg(long)]
        interval_secs: Option<u64>,
    },
    /// Coin balance
    Coins {
        #[command(subcommand)]
        action: commands::coins::CoinsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Init => commands::user::init(),
        Commands::Onboard => commands::user::onboard(),
        Commands::Animal { action } => commands::animal::run(action),
        Commands::Checkin { id } => commands::progress::check_in(&id),
        Commands::CanCheckin { id } => commands::progress::can_check_in(&id),
        Commands::Refresh => commands::progress::refresh(),
        Commands::Watch { interval_secs } => commands::progress::watch(interval_secs),
        Commands::Coins { action } => commands::coins::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
