use crate::errors::StationError;
use crate::runtime::Terminal;
use crate::types::{DisplayCategory, Task, TaskStatus};

const RESET: &str = "\u{1b}[0m";

fn ansi_color(category: DisplayCategory) -> &'static str {
    match category {
        DisplayCategory::Warn => "\u{1b}[0;33m",
        DisplayCategory::Active => "\u{1b}[0;36m",
        DisplayCategory::Paused => "\u{1b}[0;35m",
        DisplayCategory::Done => "\u{1b}[0;32m",
        DisplayCategory::Transfer => "\u{1b}[0;34m",
        DisplayCategory::Error => "\u{1b}[0;31m",
    }
}

/// Non-interactive rendering: two lines per task, no cursor, no screen
/// state. Used for `--plain` and when stdout is not a terminal.
pub fn print_tasks(terminal: &dyn Terminal, tasks: &[Task]) -> Result<(), StationError> {
    for task in tasks {
        terminal.write_line(&format!("* [{}] {}", task.id, task.title))?;

        let mut line = format!(
            "  {}{}{} [{}%]",
            ansi_color(task.status.category()),
            task.status.as_str(),
            RESET,
            task.percent_downloaded()
        );
        if task.status == TaskStatus::Downloading {
            line.push_str(&format!(
                ", \u{2193} {} B/s, \u{2191} {} B/s",
                task.speed_down_bps, task.speed_up_bps
            ));
        }
        match task.ratio() {
            Some(ratio) => line.push_str(&format!(", ratio: {ratio:.2}")),
            None => line.push_str(", ratio: n/a"),
        }
        terminal.write_line(&line)?;
    }
    Ok(())
}
