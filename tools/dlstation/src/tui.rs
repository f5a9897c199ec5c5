use crate::dashboard::{Dashboard, Modal};
use crate::format::format_size;
use crate::hotkeys::controls_legend;
use crate::types::DisplayCategory;
use ratatui::backend::TestBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};

/// Everything around the title column: markers, separators, size, status,
/// progress.
const FIXED_COLUMNS: u16 = 25;

pub fn category_color(category: DisplayCategory) -> Color {
    match category {
        DisplayCategory::Warn => Color::Yellow,
        DisplayCategory::Active => Color::Cyan,
        DisplayCategory::Paused => Color::Magenta,
        DisplayCategory::Done => Color::Green,
        DisplayCategory::Transfer => Color::Blue,
        DisplayCategory::Error => Color::Red,
    }
}

fn bar_style() -> Style {
    Style::default().fg(Color::White).bg(Color::Blue)
}

fn header_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::White)
}

pub fn draw_dashboard(frame: &mut Frame, dash: &Dashboard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let title_width = title_column_width(dash.viewport.width);

    let title_bar = Paragraph::new(format!(
        " dlstation {}. Type '?' for help information.",
        env!("CARGO_PKG_VERSION")
    ))
    .style(bar_style());
    frame.render_widget(title_bar, chunks[0]);

    let column_header = Paragraph::new(format!(
        " {:<w$.w$}|{:<5}|{:<11}|Prog",
        "Download task",
        "Size",
        "Status",
        w = title_width as usize,
    ))
    .style(header_style());
    frame.render_widget(column_header, chunks[1]);

    let ordinal = dash.cursor.ordinal(&dash.store);
    let range = dash.viewport.visible_range(ordinal, dash.store.len());
    let selected_id = dash.cursor.selected_id();

    let mut lines = Vec::new();
    for index in range {
        let Some(task) = dash.store.get(index) else {
            break;
        };
        let selected = selected_id == Some(task.id.as_str());
        let row_style = if selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let marker_left = if selected { ">" } else { " " };
        let marker_right = if selected { "<" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(marker_left.to_string(), row_style),
            Span::styled(
                format!("{:<w$.w$}", task.title, w = title_width as usize),
                row_style,
            ),
            Span::styled(format!("|{:<5}|", format_size(task.size_bytes)), row_style),
            Span::styled(
                format!("{:<11.11}", task.status.as_str()),
                row_style.fg(category_color(task.status.category())),
            ),
            Span::styled(
                format!("|{:>3}%", task.percent_downloaded()),
                row_style,
            ),
            Span::styled(marker_right.to_string(), row_style),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), chunks[2]);

    let (down, up) = dash.store.total_speeds();
    let footer = Paragraph::new(format!(
        "[{}] \u{2191} {}/s, \u{2193} {}/s.  {}",
        dash.status.stamp,
        format_size(up),
        format_size(down),
        dash.status.message
    ))
    .style(bar_style());
    frame.render_widget(footer, chunks[3]);

    if let Some(modal) = &dash.modal {
        draw_modal(frame, modal);
    }
}

fn draw_modal(frame: &mut Frame, modal: &Modal) {
    match modal {
        Modal::Help => {
            let area = centered(frame.area(), 36, 10);
            let body = Paragraph::new(controls_legend()).style(bar_style()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("[ Keyboard shortcuts ]")
                    .style(bar_style()),
            );
            frame.render_widget(Clear, area);
            frame.render_widget(body, area);
        }
        Modal::AddPrompt { input } => {
            let area = centered(frame.area(), frame.area().width.saturating_sub(4).max(20), 4);
            let body = Paragraph::new(format!("Enter URL: {input}_"))
                .style(bar_style())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("[ Add download task ]")
                        .style(bar_style()),
                );
            frame.render_widget(Clear, area);
            frame.render_widget(body, area);
        }
        Modal::ConfirmDelete { title, .. } => {
            let area = centered(frame.area(), frame.area().width.saturating_sub(4).max(20), 4);
            let body = Paragraph::new(Line::from(vec![
                Span::raw(format!("Delete '{title}'? ")),
                Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("/"),
                Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
            ]))
            .style(bar_style())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("[ Delete task ]")
                    .style(bar_style()),
            );
            frame.render_widget(Clear, area);
            frame.render_widget(body, area);
        }
        Modal::Alert { message } => {
            let area = centered(frame.area(), frame.area().width.saturating_sub(4).max(20), 4);
            let body = Paragraph::new(format!("{message} (press any key)"))
                .style(Style::default().fg(Color::White).bg(Color::Red))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("[ Error ]")
                        .style(Style::default().fg(Color::White).bg(Color::Red)),
                );
            frame.render_widget(Clear, area);
            frame.render_widget(body, area);
        }
    }
}

fn title_column_width(terminal_width: u16) -> u16 {
    terminal_width.saturating_sub(FIXED_COLUMNS).max(8)
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

/// Render one frame into a plain string, for assertions about layout.
pub fn render_to_string(dash: &Dashboard, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal.draw(|frame| draw_dashboard(frame, dash)).expect("draw");

    let buffer = terminal.backend().buffer().clone();
    let mut out = String::new();
    for y in 0..height {
        for x in 0..width {
            if let Some(cell) = buffer.cell((x, y)) {
                out.push_str(cell.symbol());
            }
        }
        out.push('\n');
    }
    out
}
