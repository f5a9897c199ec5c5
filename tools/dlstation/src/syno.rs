use crate::errors::StationError;
use crate::service::{RemoteTaskService, Session};
use crate::types::{Task, TaskStatus};
use serde_json::Value;
use std::time::Duration;

const AUTH_PATH: &str = "/webapi/auth.cgi";
const TASK_PATH: &str = "/webapi/DownloadStation/task.cgi";

/// Client for the DownloadStation web API. Every endpoint is a GET with
/// query parameters and a JSON reply carrying a `success` flag.
pub struct SynoClient {
    base: String,
    agent: ureq::Agent,
}

impl SynoClient {
    pub fn new(base: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build();
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            agent,
        }
    }

    fn call(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, StationError> {
        let mut request = self.agent.get(&format!("{}{}", self.base, path));
        for (name, value) in params {
            request = request.query(name, value);
        }
        let response = request
            .call()
            .map_err(|e| StationError::Api(e.to_string()))?;
        response
            .into_json::<Value>()
            .map_err(|e| StationError::Api(format!("invalid json reply: {e}")))
    }

    fn task_op(&self, session: &Session, method: &str, id: &str) -> Result<(), StationError> {
        let reply = self.call(
            TASK_PATH,
            &[
                ("api", "SYNO.DownloadStation.Task"),
                ("version", "1"),
                ("method", method),
                ("id", id),
                ("_sid", &session.sid),
            ],
        )?;
        check_success(&reply)
    }
}

impl RemoteTaskService for SynoClient {
    fn login(&self, user: &str, password: &str) -> Result<Session, StationError> {
        let reply = self.call(
            AUTH_PATH,
            &[
                ("api", "SYNO.API.Auth"),
                ("version", "2"),
                ("method", "login"),
                ("account", user),
                ("passwd", password),
                ("session", "DownloadStation"),
                ("format", "sid"),
            ],
        )?;
        decode_session(&reply)
    }

    fn logout(&self, session: &Session) -> Result<(), StationError> {
        let reply = self.call(
            AUTH_PATH,
            &[
                ("api", "SYNO.API.Auth"),
                ("version", "1"),
                ("method", "logout"),
                ("session", "DownloadStation"),
                ("_sid", &session.sid),
            ],
        )?;
        check_success(&reply)
    }

    fn list(&self, session: &Session) -> Result<Vec<Task>, StationError> {
        let reply = self.call(
            TASK_PATH,
            &[
                ("api", "SYNO.DownloadStation.Task"),
                ("version", "2"),
                ("method", "list"),
                ("additional", "transfer"),
                ("_sid", &session.sid),
            ],
        )?;
        decode_tasks(&reply)
    }

    fn add(&self, session: &Session, url: &str) -> Result<(), StationError> {
        let reply = self.call(
            TASK_PATH,
            &[
                ("api", "SYNO.DownloadStation.Task"),
                ("version", "2"),
                ("method", "create"),
                ("uri", url),
                ("_sid", &session.sid),
            ],
        )?;
        check_success(&reply)
    }

    fn delete(&self, session: &Session, id: &str) -> Result<(), StationError> {
        self.task_op(session, "delete", id)
    }

    fn pause(&self, session: &Session, id: &str) -> Result<(), StationError> {
        self.task_op(session, "pause", id)
    }

    fn resume(&self, session: &Session, id: &str) -> Result<(), StationError> {
        self.task_op(session, "resume", id)
    }
}

fn check_success(reply: &Value) -> Result<(), StationError> {
    match reply.get("success") {
        Some(Value::Bool(true)) => Ok(()),
        Some(Value::Bool(false)) => Err(StationError::Api(format!(
            "server reported failure: {reply}"
        ))),
        _ => Err(StationError::Api(format!(
            "value 'success' missing from {reply}"
        ))),
    }
}

fn decode_session(reply: &Value) -> Result<Session, StationError> {
    check_success(reply)?;
    let sid = reply
        .pointer("/data/sid")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if sid.is_empty() {
        return Err(StationError::Api("login reply carried no sid".to_string()));
    }
    Ok(Session {
        sid: sid.to_string(),
    })
}

/// Decode a task list. Per-record fields the server omits decode as empty
/// or zero so one malformed record never poisons the whole refresh.
fn decode_tasks(reply: &Value) -> Result<Vec<Task>, StationError> {
    check_success(reply)?;
    let tasks = reply
        .pointer("/data/tasks")
        .and_then(Value::as_array)
        .ok_or_else(|| StationError::Api(format!("no tasks found in {reply}")))?;

    Ok(tasks.iter().map(decode_task).collect())
}

fn decode_task(raw: &Value) -> Task {
    let transfer = raw.pointer("/additional/transfer");
    let transfer_u64 = |field: &str| {
        transfer
            .and_then(|t| t.get(field))
            .and_then(Value::as_u64)
            .unwrap_or(0)
    };

    Task {
        id: string_field(raw, "id"),
        title: string_field(raw, "title"),
        status: TaskStatus::parse(raw.get("status").and_then(Value::as_str).unwrap_or("")),
        size_bytes: raw.get("size").and_then(Value::as_u64).unwrap_or(0),
        downloaded_bytes: transfer_u64("size_downloaded"),
        uploaded_bytes: transfer_u64("size_uploaded"),
        speed_down_bps: transfer_u64("speed_download"),
        speed_up_bps: transfer_u64("speed_upload"),
    }
}

fn string_field(raw: &Value, field: &str) -> String {
    raw.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
