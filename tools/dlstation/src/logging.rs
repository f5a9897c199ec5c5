use crate::errors::StationError;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only JSONL log of session and remote-call events, kept under the
/// cache directory. Oversized payloads are truncated, never dropped.
#[derive(Debug, Clone)]
pub struct JsonlLogger {
    pub path: PathBuf,
    pub max_payload_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEvent<'a> {
    pub level: &'a str,
    pub event_type: &'a str,
    pub payload: Value,
}

impl JsonlLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_payload_bytes: 4096,
        }
    }

    pub fn append(&self, event: &LogEvent<'_>) -> Result<(), StationError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StationError::Io(e.to_string()))?;
        }
        let truncated = truncate_json(event.payload.clone(), self.max_payload_bytes);
        let line = serde_json::to_string(&LogEvent {
            level: event.level,
            event_type: event.event_type,
            payload: truncated,
        })
        .map_err(|e| StationError::Io(e.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StationError::Io(e.to_string()))?;
        file.write_all(line.as_bytes())
            .map_err(|e| StationError::Io(e.to_string()))?;
        file.write_all(b"\n")
            .map_err(|e| StationError::Io(e.to_string()))?;
        Ok(())
    }

    /// Best-effort logging: a failing logger must never take the dashboard
    /// down with it.
    pub fn try_append(&self, level: &str, event_type: &str, payload: Value) {
        let _ = self.append(&LogEvent {
            level,
            event_type,
            payload,
        });
    }
}

fn truncate_json(value: Value, max_bytes: usize) -> Value {
    let rendered = serde_json::to_string(&value).unwrap_or_default();
    if rendered.len() <= max_bytes {
        return value;
    }
    let mut truncated = rendered;
    truncated.truncate(max_bytes.saturating_sub(3));
    Value::String(format!("{truncated}..."))
}
