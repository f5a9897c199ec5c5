pub mod config;
pub mod controller;
pub mod dashboard;
pub mod errors;
pub mod format;
pub mod hotkeys;
pub mod logging;
pub mod report;
pub mod runtime;
pub mod service;
pub mod store;
pub mod syno;
pub mod tui;
pub mod types;
pub mod viewport;
pub mod worker;

use clap::{error::ErrorKind, Parser};
use config::{load_config, AppConfig};
use errors::StationError;
use logging::JsonlLogger;
use runtime::ProductionRuntime;
use serde_json::json;
use service::RemoteTaskService;
use std::sync::Arc;
use syno::SynoClient;

#[derive(Debug, Clone, Parser)]
#[command(name = "dlstation")]
#[command(about = "Terminal dashboard for DownloadStation download tasks")]
#[command(version)]
pub struct Cli {
    /// URL to add as a download task before showing the list
    pub url: Option<String>,
    /// Path to the configuration file
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,
    /// Print the task list once instead of opening the dashboard
    #[arg(long, default_value_t = false)]
    pub plain: bool,
}

pub fn run() -> Result<i32, StationError> {
    let args = std::env::args_os().collect::<Vec<_>>();
    let runtime = ProductionRuntime::new();

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(error) => match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{error}");
                return Ok(0);
            }
            _ => return Err(StationError::Cli(error.to_string())),
        },
    };

    let config = load_config(runtime.file_system.as_ref(), cli.config.as_deref())?;
    let logger = JsonlLogger::new(config.cache_dir().join("session.jsonl"));
    let service: Arc<dyn RemoteTaskService> = Arc::new(SynoClient::new(&config.url));
    run_session(&cli, &config, service, &runtime, &logger)
}

/// Session lifecycle around either frontend: login, optional one-shot add,
/// then the plain report or the interactive dashboard, then logout. A
/// failed login is fatal; everything after login logs out on the way down.
pub fn run_session(
    cli: &Cli,
    config: &AppConfig,
    service: Arc<dyn RemoteTaskService>,
    runtime: &ProductionRuntime,
    logger: &JsonlLogger,
) -> Result<i32, StationError> {
    let session = service.login(&config.user, &config.password)?;
    logger.try_append("info", "login", json!({"user": config.user}));

    let outcome = session_body(cli, &service, &session, runtime, logger);

    if service.logout(&session).is_ok() {
        logger.try_append("info", "logout", json!({"user": config.user}));
    }
    outcome.map(|()| 0)
}

fn session_body(
    cli: &Cli,
    service: &Arc<dyn RemoteTaskService>,
    session: &service::Session,
    runtime: &ProductionRuntime,
    logger: &JsonlLogger,
) -> Result<(), StationError> {
    if let Some(url) = &cli.url {
        service.add(session, url)?;
        logger.try_append("info", "task_added", json!({"url": url}));
    }

    if cli.plain || !runtime.terminal.stdin_is_tty() {
        let tasks = service.list(session)?;
        report::print_tasks(runtime.terminal.as_ref(), &tasks)
    } else {
        controller::run_dashboard(Arc::clone(service), session.clone(), logger)
    }
}
