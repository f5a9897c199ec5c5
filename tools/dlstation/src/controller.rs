use crate::dashboard::{Command, Dashboard};
use crate::errors::StationError;
use crate::logging::JsonlLogger;
use crate::service::{RemoteTaskService, Session};
use crate::tui::draw_dashboard;
use crate::viewport::Viewport;
use crate::worker::{service_channel, ServiceEvent, ServiceWorker};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use serde_json::json;
use std::io;
use std::sync::Arc;
use std::time::Duration;

const INPUT_POLL: Duration = Duration::from_millis(150);

/// Run the interactive dashboard until the operator quits. Remote calls go
/// out on worker threads; this loop is the only place that touches the
/// store, the cursor, or the screen.
pub fn run_dashboard(
    service: Arc<dyn RemoteTaskService>,
    session: Session,
    logger: &JsonlLogger,
) -> Result<(), StationError> {
    enable_raw_mode().map_err(|e| StationError::Terminal(e.to_string()))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| StationError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| StationError::Terminal(e.to_string()))?;

    let result = event_loop(&mut terminal, service, session, logger);

    // Always restore the terminal, even when the loop failed.
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    service: Arc<dyn RemoteTaskService>,
    session: Session,
    logger: &JsonlLogger,
) -> Result<(), StationError> {
    let (width, height) =
        crossterm::terminal::size().map_err(|e| StationError::Terminal(e.to_string()))?;
    let mut dash = Dashboard::new(Viewport::new(width, height));

    let (tx, mut rx) = service_channel();
    let worker = ServiceWorker::new(service, session, tx);

    let mut resize_pending = false;
    dispatch(&worker, dash.request_refresh());
    dash.set_status("Refreshing...");

    loop {
        if resize_pending {
            // Full re-layout from the loop's own context, never from the
            // notification itself.
            terminal
                .clear()
                .map_err(|e| StationError::Terminal(e.to_string()))?;
            resize_pending = false;
        }

        terminal
            .draw(|frame| draw_dashboard(frame, &dash))
            .map_err(|e| StationError::Terminal(e.to_string()))?;

        // Completed remote calls first, then input.
        while let Ok(event) = rx.try_recv() {
            log_event(logger, &event);
            if let Some(follow_up) = dash.apply_service_event(event) {
                dispatch(&worker, follow_up);
            }
        }

        let has_input =
            event::poll(INPUT_POLL).map_err(|e| StationError::Terminal(e.to_string()))?;
        if has_input {
            match event::read().map_err(|e| StationError::Terminal(e.to_string()))? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(command) = dash.handle_key(key) {
                        dispatch(&worker, command);
                    }
                }
                Event::Resize(new_width, new_height) => {
                    dash.set_viewport(new_width, new_height);
                    resize_pending = true;
                }
                _ => {}
            }
        }

        if dash.should_quit() {
            return Ok(());
        }
    }
}

fn dispatch(worker: &ServiceWorker, command: Command) {
    match command {
        Command::Refresh { generation } => worker.spawn_list(generation),
        Command::Add { url } => worker.spawn_add(url),
        Command::Delete { id } => worker.spawn_delete(id),
    }
}

fn log_event(logger: &JsonlLogger, event: &ServiceEvent) {
    match event {
        ServiceEvent::Listed {
            generation,
            result: Err(err),
        } => logger.try_append(
            "error",
            "api_error",
            json!({"call": "list", "generation": generation, "error": err.to_string()}),
        ),
        ServiceEvent::Added {
            url,
            result: Err(err),
        } => logger.try_append(
            "error",
            "api_error",
            json!({"call": "add", "url": url, "error": err.to_string()}),
        ),
        ServiceEvent::Deleted {
            id,
            result: Err(err),
        } => logger.try_append(
            "error",
            "api_error",
            json!({"call": "delete", "id": id, "error": err.to_string()}),
        ),
        _ => {}
    }
}
