use serde::{Deserialize, Serialize};

/// Closed status taxonomy reported by the download service. Anything the
/// server sends outside this set decodes as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Waiting,
    Downloading,
    Paused,
    Finishing,
    Finished,
    HashChecking,
    Seeding,
    FilehostingWaiting,
    Extracting,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "waiting" => Self::Waiting,
            "downloading" => Self::Downloading,
            "paused" => Self::Paused,
            "finishing" => Self::Finishing,
            "finished" => Self::Finished,
            "hash_checking" => Self::HashChecking,
            "seeding" => Self::Seeding,
            "filehosting_waiting" => Self::FilehostingWaiting,
            "extracting" => Self::Extracting,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Downloading => "downloading",
            Self::Paused => "paused",
            Self::Finishing => "finishing",
            Self::Finished => "finished",
            Self::HashChecking => "hash_checking",
            Self::Seeding => "seeding",
            Self::FilehostingWaiting => "filehosting_waiting",
            Self::Extracting => "extracting",
            Self::Unknown => "unknown",
        }
    }

    pub fn category(self) -> DisplayCategory {
        match self {
            Self::Waiting | Self::FilehostingWaiting => DisplayCategory::Warn,
            Self::Downloading | Self::Finishing | Self::HashChecking | Self::Extracting => {
                DisplayCategory::Active
            }
            Self::Paused => DisplayCategory::Paused,
            Self::Finished => DisplayCategory::Done,
            Self::Seeding => DisplayCategory::Transfer,
            Self::Unknown => DisplayCategory::Error,
        }
    }
}

/// Color class a status renders as; the mapping is fixed data, not policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayCategory {
    Warn,
    Active,
    Paused,
    Done,
    Transfer,
    Error,
}

/// One download task as reported by the remote service. Records are value
/// objects; refreshes replace them wholesale instead of mutating fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub size_bytes: u64,
    pub downloaded_bytes: u64,
    pub uploaded_bytes: u64,
    pub speed_down_bps: u64,
    pub speed_up_bps: u64,
}

impl Task {
    /// Completed percentage, clamped to 0-100. A zero size means the total
    /// is unknown and renders as 0.
    pub fn percent_downloaded(&self) -> u8 {
        if self.size_bytes == 0 {
            return 0;
        }
        let percent = self.downloaded_bytes.saturating_mul(100) / self.size_bytes;
        percent.min(100) as u8
    }

    /// Share ratio, or `None` when the size is unknown (no zero division).
    pub fn ratio(&self) -> Option<f64> {
        if self.size_bytes == 0 {
            return None;
        }
        Some(self.uploaded_bytes as f64 / self.size_bytes as f64)
    }
}
