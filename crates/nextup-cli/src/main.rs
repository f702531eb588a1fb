use clap::{CommandFactory, Parser, Subcommand};
use nextup_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "nextup", version, about = "What's next, and how soon")]
struct Cli {
    /// Reminder source: a board JSON file or an http(s) base URL.
    /// Overrides `source.location` from the config.
    #[arg(long, global = true)]
    source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or watch the board
    Board {
        #[command(subcommand)]
        action: commands::board::BoardAction,
    },
    /// Inspect individual reminders
    Reminder {
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load config, install logging, then hand a context to `f`. With
/// `recover`, an unreadable config file falls back to defaults instead of
/// failing, so commands that repair it can still run.
fn with_context<F>(
    source: Option<String>,
    recover: bool,
    f: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(commands::Context) -> Result<(), Box<dyn std::error::Error>>,
{
    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) if recover => (Config::default(), Some(e)),
        Err(e) => return Err(e.into()),
    };
    init_tracing(&config);
    if let Some(e) = load_error {
        tracing::warn!(error = %e, "config unreadable, using defaults");
    }
    f(commands::Context::new(config, source))
}

fn main() {
    let cli = Cli::parse();
    let source = cli.source;

    let result = match cli.command {
        Commands::Board { action } => {
            with_context(source, false, |ctx| commands::board::run(&ctx, action))
        }
        Commands::Reminder { action } => {
            with_context(source, false, |ctx| commands::reminder::run(&ctx, action))
        }
        Commands::Config { action } => {
            let recover = action.repairs_config();
            with_context(source, recover, |ctx| commands::config::run(ctx, action))
        }
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
