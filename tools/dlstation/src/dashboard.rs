use crate::hotkeys::{action_for_key, Action};
use crate::store::{SelectionCursor, TaskStore};
use crate::types::{Task, TaskStatus};
use crate::viewport::Viewport;
use crate::worker::ServiceEvent;
use crossterm::event::{KeyCode, KeyEvent};

pub const DEFAULT_HINT: &str = "Press '?' for help.";

/// Transient overlay above the task list. While one is open it owns the
/// keyboard; a resize keeps it on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Help,
    AddPrompt { input: String },
    ConfirmDelete { id: String, title: String },
    Alert { message: String },
}

/// Remote call the controller should start on a worker thread. Produced by
/// key handling and by service-event follow-ups; the dashboard itself never
/// blocks on the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh { generation: u64 },
    Add { url: String },
    Delete { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub stamp: String,
    pub message: String,
}

/// All mutable dashboard state, owned by the controller and mutated only on
/// the event-loop thread.
pub struct Dashboard {
    pub store: TaskStore,
    pub cursor: SelectionCursor,
    pub viewport: Viewport,
    pub modal: Option<Modal>,
    pub status: StatusLine,
    should_quit: bool,
    refresh_generation: u64,
}

impl Dashboard {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            store: TaskStore::new(),
            cursor: SelectionCursor::new(),
            viewport,
            modal: None,
            status: StatusLine {
                stamp: current_stamp(),
                message: DEFAULT_HINT.to_string(),
            },
            should_quit: false,
            refresh_generation: 0,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = StatusLine {
            stamp: current_stamp(),
            message: message.into(),
        };
    }

    /// Issue a new refresh. Results from earlier generations are discarded
    /// when they arrive; the latest request wins.
    pub fn request_refresh(&mut self) -> Command {
        self.refresh_generation += 1;
        Command::Refresh {
            generation: self.refresh_generation,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }

        match action_for_key(key)? {
            Action::MoveUp => self.cursor.prev(&self.store),
            Action::MoveDown => self.cursor.next(&self.store),
            Action::PageUp => {
                let page = self.viewport.body_height();
                self.cursor.prev_page(&self.store, page);
            }
            Action::PageDown => {
                let page = self.viewport.body_height();
                self.cursor.next_page(&self.store, page);
            }
            Action::Home => self.cursor.first(&self.store),
            Action::End => self.cursor.last(&self.store),
            Action::AddTask => {
                self.modal = Some(Modal::AddPrompt {
                    input: String::new(),
                });
            }
            Action::DeleteTask => {
                let selected = self
                    .cursor
                    .current(&self.store)
                    .map(|task| (task.id.clone(), task.title.clone()));
                if let Some((id, title)) = selected {
                    self.modal = Some(Modal::ConfirmDelete { id, title });
                }
            }
            Action::Refresh => {
                self.set_status("Refreshing...");
                return Some(self.request_refresh());
            }
            Action::Help => self.modal = Some(Modal::Help),
            Action::Quit => {
                self.set_status("Terminating...");
                self.should_quit = true;
            }
        }
        None
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Option<Command> {
        let modal = self.modal.take()?;
        match modal {
            // Any key dismisses these.
            Modal::Help => None,
            Modal::Alert { .. } => {
                self.set_status(DEFAULT_HINT);
                None
            }
            Modal::AddPrompt { mut input } => match key.code {
                KeyCode::Enter => {
                    if input.is_empty() {
                        self.set_status("Aborted");
                        None
                    } else {
                        self.set_status("Adding task...");
                        Some(Command::Add { url: input })
                    }
                }
                KeyCode::Esc => {
                    self.set_status("Aborted");
                    None
                }
                KeyCode::Backspace => {
                    input.pop();
                    self.modal = Some(Modal::AddPrompt { input });
                    None
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    self.modal = Some(Modal::AddPrompt { input });
                    None
                }
                _ => {
                    self.modal = Some(Modal::AddPrompt { input });
                    None
                }
            },
            Modal::ConfirmDelete { id, title } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.set_status("Deleting task...");
                    Some(Command::Delete { id })
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => None,
                _ => {
                    self.modal = Some(Modal::ConfirmDelete { id, title });
                    None
                }
            },
        }
    }

    /// Fold a completed remote call back into the model. Failures become
    /// alerts and never tear the dashboard down; an add success chains a
    /// refresh to confirm the optimistic entry.
    pub fn apply_service_event(&mut self, event: ServiceEvent) -> Option<Command> {
        match event {
            ServiceEvent::Listed { generation, result } => {
                if generation != self.refresh_generation {
                    // Superseded by a newer refresh; drop the stale result.
                    return None;
                }
                match result {
                    Ok(tasks) => {
                        self.store.replace_all(tasks);
                        self.cursor.reconcile(&self.store);
                        self.set_status(DEFAULT_HINT);
                    }
                    Err(err) => self.alert(format!("Refresh failed: {err}")),
                }
                None
            }
            ServiceEvent::Added { url, result } => match result {
                Ok(()) => {
                    self.store.insert_front(optimistic_task(&url));
                    self.cursor.reconcile(&self.store);
                    self.set_status("Download task added");
                    Some(self.request_refresh())
                }
                Err(err) => {
                    self.alert(format!("Add failed: {err}"));
                    None
                }
            },
            ServiceEvent::Deleted { id, result } => match result {
                Ok(()) => {
                    let removed_index = self.store.position(&id);
                    if self.store.remove(&id) {
                        if let Some(index) = removed_index {
                            self.cursor.repair_after_remove(&self.store, index);
                        }
                    }
                    self.set_status("Task deleted");
                    None
                }
                Err(err) => {
                    self.alert(format!("Delete failed: {err}"));
                    None
                }
            },
        }
    }

    fn alert(&mut self, message: String) {
        // The modal is the failure surface; the status line resets to the
        // hint once the operator acknowledges it.
        self.modal = Some(Modal::Alert { message });
    }
}

/// Placeholder record shown until the next refresh reports the real task.
fn optimistic_task(url: &str) -> Task {
    Task {
        id: format!("pending:{url}"),
        title: url.to_string(),
        status: TaskStatus::Waiting,
        size_bytes: 0,
        downloaded_bytes: 0,
        uploaded_bytes: 0,
        speed_down_bps: 0,
        speed_up_bps: 0,
    }
}

fn current_stamp() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::{Command, Dashboard, Modal, DEFAULT_HINT};
    use crate::errors::StationError;
    use crate::types::{Task, TaskStatus};
    use crate::viewport::Viewport;
    use crate::worker::ServiceEvent;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            title: format!("{id}.iso"),
            status: TaskStatus::Downloading,
            size_bytes: 1000,
            downloaded_bytes: 250,
            uploaded_bytes: 0,
            speed_down_bps: 0,
            speed_up_bps: 0,
        }
    }

    fn dashboard_with(ids: &[&str]) -> Dashboard {
        let mut dash = Dashboard::new(Viewport::new(80, 24));
        let generation = match dash.request_refresh() {
            Command::Refresh { generation } => generation,
            other => panic!("unexpected {other:?}"),
        };
        dash.apply_service_event(ServiceEvent::Listed {
            generation,
            result: Ok(ids.iter().map(|id| task(id)).collect()),
        });
        dash
    }

    #[test]
    fn refresh_key_emits_a_generation_tagged_command() {
        let mut dash = dashboard_with(&["a"]);
        let command = dash.handle_key(key(KeyCode::Char('r')));
        assert_eq!(command, Some(Command::Refresh { generation: 2 }));
        assert!(dash.status.message.contains("Refreshing"));
    }

    #[test]
    fn stale_refresh_results_are_discarded() {
        let mut dash = dashboard_with(&["a", "b"]);
        let _ = dash.handle_key(key(KeyCode::Char('r'))); // generation 2
        let _ = dash.handle_key(key(KeyCode::Char('r'))); // generation 3

        dash.apply_service_event(ServiceEvent::Listed {
            generation: 2,
            result: Ok(vec![task("stale")]),
        });
        assert_eq!(dash.store.len(), 2, "stale generation left the store alone");

        dash.apply_service_event(ServiceEvent::Listed {
            generation: 3,
            result: Ok(vec![task("fresh")]),
        });
        assert_eq!(dash.store.len(), 1);
        assert_eq!(dash.cursor.selected_id(), Some("fresh"));
    }

    #[test]
    fn failed_refresh_keeps_prior_contents_and_alerts() {
        let mut dash = dashboard_with(&["a", "b"]);
        let _ = dash.handle_key(key(KeyCode::Char('r')));
        dash.apply_service_event(ServiceEvent::Listed {
            generation: 2,
            result: Err(StationError::Api("connection reset".to_string())),
        });
        assert_eq!(dash.store.len(), 2);
        assert!(matches!(dash.modal, Some(Modal::Alert { .. })));
        assert!(!dash.should_quit());
    }

    #[test]
    fn add_prompt_collects_input_and_submits() {
        let mut dash = dashboard_with(&[]);
        let _ = dash.handle_key(key(KeyCode::Char('a')));
        assert!(matches!(dash.modal, Some(Modal::AddPrompt { .. })));

        for c in "http://x/y".chars() {
            let _ = dash.handle_key(key(KeyCode::Char(c)));
        }
        let _ = dash.handle_key(key(KeyCode::Backspace));
        let command = dash.handle_key(key(KeyCode::Enter));
        assert_eq!(
            command,
            Some(Command::Add {
                url: "http://x/".to_string()
            })
        );
        assert!(dash.modal.is_none());
    }

    #[test]
    fn empty_add_prompt_aborts() {
        let mut dash = dashboard_with(&[]);
        let _ = dash.handle_key(key(KeyCode::Char('a')));
        let command = dash.handle_key(key(KeyCode::Enter));
        assert_eq!(command, None);
        assert_eq!(dash.status.message, "Aborted");
    }

    #[test]
    fn add_success_inserts_optimistic_entry_and_chains_refresh() {
        let mut dash = dashboard_with(&["a"]);
        let follow_up = dash.apply_service_event(ServiceEvent::Added {
            url: "http://x/big.iso".to_string(),
            result: Ok(()),
        });
        assert!(matches!(follow_up, Some(Command::Refresh { .. })));
        let newest = dash.store.iter().next().map(|t| t.id.clone());
        assert_eq!(newest.as_deref(), Some("pending:http://x/big.iso"));
    }

    #[test]
    fn delete_requires_confirmation_and_repairs_cursor() {
        let mut dash = dashboard_with(&["c", "b", "a"]);
        assert_eq!(dash.cursor.selected_id(), Some("c"));

        let _ = dash.handle_key(key(KeyCode::Char('d')));
        assert!(matches!(dash.modal, Some(Modal::ConfirmDelete { .. })));

        let command = dash.handle_key(key(KeyCode::Char('y')));
        assert_eq!(
            command,
            Some(Command::Delete {
                id: "c".to_string()
            })
        );

        dash.apply_service_event(ServiceEvent::Deleted {
            id: "c".to_string(),
            result: Ok(()),
        });
        assert_eq!(dash.store.len(), 2);
        assert_eq!(dash.cursor.selected_id(), Some("b"), "nearest neighbor");
    }

    #[test]
    fn delete_confirmation_can_be_declined() {
        let mut dash = dashboard_with(&["a"]);
        let _ = dash.handle_key(key(KeyCode::Char('d')));
        let command = dash.handle_key(key(KeyCode::Char('n')));
        assert_eq!(command, None);
        assert!(dash.modal.is_none());
        assert_eq!(dash.store.len(), 1);
    }

    #[test]
    fn delete_with_empty_store_is_a_noop() {
        let mut dash = dashboard_with(&[]);
        let command = dash.handle_key(key(KeyCode::Char('d')));
        assert_eq!(command, None);
        assert!(dash.modal.is_none());
    }

    #[test]
    fn help_overlay_dismisses_on_any_key() {
        let mut dash = dashboard_with(&[]);
        let _ = dash.handle_key(key(KeyCode::Char('?')));
        assert_eq!(dash.modal, Some(Modal::Help));
        let _ = dash.handle_key(key(KeyCode::Char('x')));
        assert!(dash.modal.is_none());
    }

    #[test]
    fn quit_keys_terminate_the_loop() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut dash = dashboard_with(&["a"]);
            let _ = dash.handle_key(key(code));
            assert!(dash.should_quit());
        }
    }

    #[test]
    fn end_to_end_add_delete_refresh_scenario() {
        // Add A, B, C in that order: the store yields C, B, A.
        let mut dash = dashboard_with(&[]);
        for id in ["A", "B", "C"] {
            dash.store.insert_front(task(id));
        }
        dash.cursor.reconcile(&dash.store);
        let order = dash.store.iter().map(|t| t.id.as_str()).collect::<Vec<_>>();
        assert_eq!(order, ["C", "B", "A"]);
        assert_eq!(dash.cursor.selected_id(), Some("C"));

        // Delete C: B, A remain and the cursor lands on B.
        let _ = dash.handle_key(key(KeyCode::Char('d')));
        let _ = dash.handle_key(key(KeyCode::Char('y')));
        dash.apply_service_event(ServiceEvent::Deleted {
            id: "C".to_string(),
            result: Ok(()),
        });
        let order = dash.store.iter().map(|t| t.id.as_str()).collect::<Vec<_>>();
        assert_eq!(order, ["B", "A"]);
        assert_eq!(dash.cursor.selected_id(), Some("B"));

        // Refresh with an empty remote list: everything clears out.
        let command = dash.handle_key(key(KeyCode::Char('r')));
        let Some(Command::Refresh { generation }) = command else {
            panic!("expected refresh");
        };
        dash.apply_service_event(ServiceEvent::Listed {
            generation,
            result: Ok(Vec::new()),
        });
        assert!(dash.store.is_empty());
        assert!(dash.cursor.selected_id().is_none());
        let _ = dash.handle_key(key(KeyCode::Down));
        let _ = dash.handle_key(key(KeyCode::Up));
        assert!(dash.cursor.selected_id().is_none());
        assert_eq!(dash.status.message, DEFAULT_HINT);
    }
}
