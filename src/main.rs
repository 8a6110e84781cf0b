use std::fs::File;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::info;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use pollcall::api::HttpBackend;
use pollcall::console::{AdminPanel, ConsoleView, HomeSession};
use pollcall::core::config::{self, ResolvedConfig};

#[derive(Parser)]
#[command(name = "pollcall", about = "Console client for a phone-poll backend")]
struct Args {
    /// Backend base URL (overrides config file and POLLCALL_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the survey form and the caller whitelist
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Run an interactive calling session
    Call,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Replace the survey form key
    SetFormKey { key: String },
    /// Add an email to the caller whitelist
    AddUser { email: String },
    /// Remove an email from the caller whitelist
    DeleteUser { email: String },
    /// Bulk-load recipient numbers from a one-column CSV file
    UploadNumbers { file: PathBuf },
    /// Show the current admin page state
    Show,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to pollcall.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("pollcall.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let resolved = config::resolve(&config::load_config()?, args.base_url.as_deref());
    info!("Pollcall starting up against {}", resolved.base_url);

    let backend = Arc::new(HttpBackend::new(resolved.base_url.clone()));

    match args.command {
        Command::Admin { action } => {
            let mut panel = AdminPanel::new(backend, ConsoleView);
            match action {
                AdminAction::SetFormKey { key } => panel.set_form_key(&key).await?,
                AdminAction::AddUser { email } => panel.add_user(&email).await?,
                AdminAction::DeleteUser { email } => panel.delete_user(&email).await?,
                AdminAction::UploadNumbers { file } => {
                    let csv = std::fs::read_to_string(&file)?;
                    panel.upload_numbers(&csv).await?;
                }
                AdminAction::Show => panel.refresh().await?,
            }
        }
        Command::Call => run_call_loop(backend, &resolved).await?,
    }

    Ok(())
}

/// Drives an interactive landing session from stdin.
///
/// `submitted` stands in for the embed's load event after a respondent
/// finishes the survey; any other word is posted as the outcome of the
/// current call.
async fn run_call_loop(
    backend: Arc<HttpBackend>,
    resolved: &ResolvedConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session =
        HomeSession::new(backend, ConsoleView, resolved.embed_base_url.clone()).with_journal();

    if session.start().await? {
        // The freshly rendered embed reports its own load, the same way the
        // page's first paint did.
        session.form_loaded().await?;
    }

    println!(
        "Commands: an outcome label (e.g. 'answered', 'no answer') records the call, \
         'submitted' reports a survey submission, 'quit' exits."
    );
    prompt()?;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            "" => {}
            "quit" | "q" => break,
            "submitted" => {
                if session.form_loaded().await? {
                    // Deliver the fresh embed's own load event.
                    session.form_loaded().await?;
                }
            }
            outcome => session.record_outcome(outcome).await?,
        }
        prompt()?;
    }

    info!(
        "Call session finished after {} embed loads",
        session.state().load_count
    );
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}
