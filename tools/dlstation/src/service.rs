use crate::errors::StationError;
use crate::types::Task;
use std::sync::{Arc, Mutex};

/// Authenticated session handle issued by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub sid: String,
}

/// The remote download service as the dashboard consumes it. All calls
/// block; the controller runs them on worker threads so the event loop
/// stays responsive. `add` is the one non-idempotent operation and is
/// never retried automatically.
pub trait RemoteTaskService: Send + Sync {
    fn login(&self, user: &str, password: &str) -> Result<Session, StationError>;
    fn logout(&self, session: &Session) -> Result<(), StationError>;
    fn list(&self, session: &Session) -> Result<Vec<Task>, StationError>;
    fn add(&self, session: &Session, url: &str) -> Result<(), StationError>;
    fn delete(&self, session: &Session, id: &str) -> Result<(), StationError>;
    fn pause(&self, session: &Session, id: &str) -> Result<(), StationError>;
    fn resume(&self, session: &Session, id: &str) -> Result<(), StationError>;
}

/// Scripted in-memory service for tests. List responses are consumed in
/// order; the last one sticks. Mutating calls are recorded.
#[derive(Default, Clone)]
pub struct FakeRemoteTaskService {
    list_responses: Arc<Mutex<Vec<Result<Vec<Task>, StationError>>>>,
    fail_next: Arc<Mutex<Option<String>>>,
    added: Arc<Mutex<Vec<String>>>,
    deleted: Arc<Mutex<Vec<String>>>,
    paused: Arc<Mutex<Vec<String>>>,
    resumed: Arc<Mutex<Vec<String>>>,
    logouts: Arc<Mutex<u32>>,
}

impl FakeRemoteTaskService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_list(&self, response: Result<Vec<Task>, StationError>) {
        self.list_responses
            .lock()
            .expect("list lock")
            .push(response);
    }

    /// Make the next mutating call (add/delete/pause/resume) fail.
    pub fn set_fail_next(&self, message: impl Into<String>) {
        *self.fail_next.lock().expect("fail lock") = Some(message.into());
    }

    pub fn added(&self) -> Vec<String> {
        self.added.lock().expect("added lock").clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().expect("deleted lock").clone()
    }

    pub fn paused(&self) -> Vec<String> {
        self.paused.lock().expect("paused lock").clone()
    }

    pub fn resumed(&self) -> Vec<String> {
        self.resumed.lock().expect("resumed lock").clone()
    }

    pub fn logout_count(&self) -> u32 {
        *self.logouts.lock().expect("logout lock")
    }

    fn maybe_fail(&self) -> Result<(), StationError> {
        if let Some(message) = self.fail_next.lock().expect("fail lock").take() {
            return Err(StationError::Api(message));
        }
        Ok(())
    }
}

impl RemoteTaskService for FakeRemoteTaskService {
    fn login(&self, user: &str, _password: &str) -> Result<Session, StationError> {
        if user.is_empty() {
            return Err(StationError::Api("login rejected".to_string()));
        }
        Ok(Session {
            sid: format!("sid-{user}"),
        })
    }

    fn logout(&self, _session: &Session) -> Result<(), StationError> {
        *self.logouts.lock().expect("logout lock") += 1;
        Ok(())
    }

    fn list(&self, _session: &Session) -> Result<Vec<Task>, StationError> {
        let mut responses = self.list_responses.lock().expect("list lock");
        match responses.len() {
            0 => Ok(Vec::new()),
            1 => match &responses[0] {
                Ok(tasks) => Ok(tasks.clone()),
                Err(err) => Err(StationError::Api(err.to_string())),
            },
            _ => responses.remove(0),
        }
    }

    fn add(&self, _session: &Session, url: &str) -> Result<(), StationError> {
        self.maybe_fail()?;
        self.added.lock().expect("added lock").push(url.to_string());
        Ok(())
    }

    fn delete(&self, _session: &Session, id: &str) -> Result<(), StationError> {
        self.maybe_fail()?;
        self.deleted.lock().expect("deleted lock").push(id.to_string());
        Ok(())
    }

    fn pause(&self, _session: &Session, id: &str) -> Result<(), StationError> {
        self.maybe_fail()?;
        self.paused.lock().expect("paused lock").push(id.to_string());
        Ok(())
    }

    fn resume(&self, _session: &Session, id: &str) -> Result<(), StationError> {
        self.maybe_fail()?;
        self.resumed.lock().expect("resumed lock").push(id.to_string());
        Ok(())
    }
}
