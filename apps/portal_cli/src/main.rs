use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use portal_core::{
    config::{build_auth_service, load_settings_with, SETTINGS_FILE},
    search::{DirectoryRecord, RecordKind},
    SessionController,
};
use shared::domain::FederatedProvider;
use tracing_subscriber::EnvFilter;

mod controller;
mod terminal;

use controller::orchestration::{Orchestrator, PortalCommand};
use terminal::{TerminalNavigator, TerminalSurface};

#[derive(Parser, Debug)]
#[command(name = "portal", version, about = "EduVerse portal sign-in flow from the terminal")]
struct Cli {
    /// Role to sign in as (student, teacher, parent); defaults to the configured role
    #[arg(long)]
    role: Option<String>,
    #[arg(long, default_value = SETTINGS_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every role profile as JSON
    Roles,
    Validate {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        remember: bool,
    },
    Demo,
    Federated {
        provider: FederatedProvider,
    },
    /// Search the sample teacher directory
    Search {
        query: String,
    },
}

impl From<Command> for PortalCommand {
    fn from(value: Command) -> Self {
        match value {
            Command::Roles => PortalCommand::Roles,
            Command::Validate { email, password } => PortalCommand::Validate { email, password },
            Command::Login {
                email,
                password,
                remember,
            } => PortalCommand::Login {
                email,
                password,
                remember,
            },
            Command::Demo => PortalCommand::Demo,
            Command::Federated { provider } => PortalCommand::Federated { provider },
            Command::Search { query } => PortalCommand::Search { query },
        }
    }
}

fn sample_directory() -> Vec<DirectoryRecord> {
    vec![
        DirectoryRecord::new(RecordKind::Student, "Isha Sharma", "Grade: 96.5%"),
        DirectoryRecord::new(RecordKind::Student, "Rohan Patel", "Grade: 94.2%"),
        DirectoryRecord::new(RecordKind::Lecture, "Calculus II", "Math Department"),
        DirectoryRecord::new(RecordKind::Assignment, "Physics Quiz", "Due: Tomorrow"),
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = load_settings_with(&cli.config, |key| std::env::var(key).ok());
    let auth = build_auth_service(&settings)?;

    let controller = Arc::new(
        SessionController::with_default_role(auth, Arc::new(TerminalSurface), settings.default_role)
            .with_redirect_delay(settings.redirect_delay()),
    );

    let mut events = controller.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match serde_json::to_string(&event) {
                Ok(raw) => tracing::debug!(event = %raw, "session event"),
                Err(err) => tracing::warn!(error = %err, "failed to encode session event"),
            }
        }
    });

    let mut orchestrator = Orchestrator::new(
        controller,
        Arc::new(TerminalNavigator),
        sample_directory(),
    );
    if let Some(role) = cli.role.as_deref() {
        orchestrator.select_role(role)?;
    }
    orchestrator.dispatch(cli.command.into()).await
}
