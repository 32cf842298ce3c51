use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "letterpad")]
#[command(about = "Letterpad CLI - write and manage letters", long_about = None)]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Work against an in-memory store instead of the backend
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the signed-in user
    Whoami,
    /// List letters
    List {
        /// Only letters whose title or text contains this
        #[arg(long)]
        search: Option<String>,
        /// Oldest first
        #[arg(long)]
        asc: bool,
    },
    /// Print one letter
    Show { id: String },
    /// Create or update a letter
    Write {
        /// Letter to update; a new letter is created when omitted
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        title: String,
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,
        /// Read the body (HTML) from a file
        #[arg(long)]
        body_file: Option<PathBuf>,
    },
    /// Delete a letter
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;
    init_tracing(&config.logging.level);

    let app = commands::App::build(&config, cli.offline).await?;

    let result = match cli.command {
        Commands::Whoami => commands::auth::whoami(&app),
        Commands::List { search, asc } => {
            commands::documents::list(&app, search.as_deref(), asc).await
        }
        Commands::Show { id } => commands::documents::show(&app, &id).await,
        Commands::Write {
            id,
            title,
            body,
            body_file,
        } => commands::write::run(&app, id.as_deref(), &title, body, body_file.as_deref()).await,
        Commands::Delete { id } => commands::documents::delete(&app, &id).await,
    };

    if !app.is_signed_in() {
        commands::auth::print_login_hint(&app);
        std::process::exit(1);
    }

    result
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
