mod file_store;
mod http;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use classroom::net::api::{AuthGateway, GatewayConfig};
use classroom::net::types::RegistrationRequest;
use classroom::state::auth::AuthContext;
use classroom::state::session_store::SessionStore;
use serde_json::{Value, json};

use crate::file_store::FileStorage;
use crate::http::ReqwestTransport;

type CliAuth = AuthContext<ReqwestTransport, FileStorage>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("{op} failed: {message}")]
    Rejected { op: &'static str, message: String },
}

#[derive(Parser, Debug)]
#[command(name = "classroom-cli", about = "Classroom auth API CLI")]
struct Cli {
    #[arg(long, env = "CLASSROOM_BASE_URL", default_value = "http://127.0.0.1:3000/api/auth")]
    base_url: String,

    #[arg(long, env = "CLASSROOM_STATE_FILE", default_value = ".classroom-session.json")]
    state_file: PathBuf,

    #[arg(long, env = "CLASSROOM_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account (does not log in).
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, default_value = "")]
        teacher_id: String,
    },
    /// Log in and cache the session in the state file.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log out; the state file is cleared only if the server confirms.
    Logout,
    /// Validate the cached session with the server.
    Session,
    /// Run startup reconciliation and print who is signed in.
    Whoami,
}

fn build_auth(cli: &Cli) -> Result<CliAuth, CliError> {
    let transport = ReqwestTransport::new(Duration::from_secs(cli.timeout_secs))?;
    let store = SessionStore::new(FileStorage::new(cli.state_file.clone()));
    let gateway = AuthGateway::new(GatewayConfig::new(cli.base_url.as_str()), transport, store);
    Ok(AuthContext::new(gateway))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let auth = build_auth(&cli)?;
    tracing::debug!(base_url = %cli.base_url, state_file = %cli.state_file.display(), "classroom-cli");

    match cli.command {
        Command::Register { email, password, first_name, last_name, teacher_id } => {
            let request = RegistrationRequest::new(email, password, first_name, last_name).with_teacher_id(teacher_id);
            let result = auth.register(&request).await;
            print_json(&serde_json::to_value(&result)?)?;
            ensure_success("register", result.success, result.error)
        }
        Command::Login { email, password } => {
            let result = auth.login(&email, &password).await;
            print_json(&serde_json::to_value(&result)?)?;
            ensure_success("login", result.success, result.error)
        }
        Command::Logout => {
            let result = auth.logout().await;
            print_json(&serde_json::to_value(&result)?)?;
            ensure_success("logout", result.success, result.error)
        }
        Command::Session => {
            let check = auth.gateway().get_session().await;
            print_json(&serde_json::to_value(&check)?)?;
            Ok(())
        }
        Command::Whoami => {
            let phase = auth.initialize().await;
            print_json(&whoami_json(&auth, &phase.to_string()))?;
            Ok(())
        }
    }
}

fn whoami_json(auth: &CliAuth, phase: &str) -> Value {
    json!({ "phase": phase, "user": auth.snapshot().user })
}

fn ensure_success(op: &'static str, success: bool, error: Option<String>) -> Result<(), CliError> {
    if success {
        return Ok(());
    }
    Err(CliError::Rejected { op, message: error.unwrap_or_else(|| "unknown error".to_owned()) })
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
