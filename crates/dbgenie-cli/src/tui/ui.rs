use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use crate::tui::commands::{command_palette_matches, display_name};
use crate::tui::state::{App, PaletteEntry};
use crate::tui::utils::clipped_input;

pub const INPUT_HEIGHT: u16 = 3;
pub const FOOTER_HEIGHT: u16 = 1;
pub const HEADER_HEIGHT: u16 = 6;
pub const HEADER_WIDTH: u16 = 62;
pub const SCHEMA_WIDTH_PERCENT: u16 = 45;
pub const MAX_PALETTE_LINES: usize = 8;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn draw_ui(frame: &mut ratatui::Frame, app: &App) {
    let size = frame.size();

    let palette = command_palette_matches(app, &app.input);
    let palette_height = palette.len().min(MAX_PALETTE_LINES) as u16;
    let bottom_reserved = INPUT_HEIGHT + FOOTER_HEIGHT + palette_height + 1;

    let body_height = size
        .height
        .saturating_sub(HEADER_HEIGHT)
        .saturating_sub(bottom_reserved)
        .max(1);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(body_height),
            Constraint::Length(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(FOOTER_HEIGHT),
            Constraint::Length(palette_height),
        ])
        .split(size);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(HEADER_WIDTH), Constraint::Min(1)])
        .split(layout[0]);
    frame.render_widget(render_header(app), header_layout[0]);

    let body_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(SCHEMA_WIDTH_PERCENT),
            Constraint::Percentage(100 - SCHEMA_WIDTH_PERCENT),
        ])
        .split(layout[1]);
    frame.render_widget(render_schema(app), body_layout[0]);
    let messages = render_messages(app, body_layout[1].height as usize);
    frame.render_widget(messages, body_layout[1]);

    let (input_area, cursor) = render_input_bar(app, layout[3]);
    frame.render_widget(input_area, layout[3]);

    frame.render_widget(render_status_line(app), layout[4]);

    if palette_height > 0 {
        let palette_view = render_palette(&palette, app.palette_select);
        frame.render_widget(palette_view, layout[5]);
    }
    if let Some((x, y)) = cursor {
        frame.set_cursor(x, y);
    }
}

fn render_header(app: &App) -> Paragraph<'static> {
    let title = Line::from(vec![
        Span::styled(">_ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("dbgenie (v{})", env!("CARGO_PKG_VERSION")),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);

    let line_server = Line::from(vec![
        Span::styled("server:    ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.service.base_url().to_string(),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("  timeout {}s", app.settings.request_timeout().as_secs()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let line_dir = Line::from(vec![
        Span::styled("workspace: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{}", app.paths.root.display()),
            Style::default().fg(Color::White),
        ),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .border_type(BorderType::Rounded);

    Paragraph::new(Text::from(vec![
        title,
        Line::from(""),
        line_server,
        line_dir,
    ]))
    .block(block)
}

/// Left pane: every table and column as it would be submitted, with the
/// options hint for columns that have none yet.
fn render_schema(app: &App) -> Paragraph<'static> {
    let state = app.session.state();
    let mut lines: Vec<Line<'static>> = Vec::new();

    for (table_idx, table) in state.tables().iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>2} ", table_idx + 1),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                display_name(&table.name).to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        if table.is_empty() {
            lines.push(Line::from(Span::styled(
                "     no columns (skipped)",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (column_idx, column) in table.columns.iter().enumerate() {
            let mut spans = vec![
                Span::styled(
                    format!("   {:>2}. ", column_idx + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    display_name(&column.name).to_string(),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("  {}", column.kind),
                    Style::default().fg(Color::Cyan),
                ),
            ];
            if column.unique {
                spans.push(Span::styled(" unique", Style::default().fg(Color::Magenta)));
            }
            if column.nullable {
                spans.push(Span::styled(
                    format!(" null {}%", column.nullable_chance),
                    Style::default().fg(Color::Magenta),
                ));
            }
            let hint = column.options_hint();
            if !column.options.trim().is_empty() {
                spans.push(Span::raw(format!("  {}", column.options.trim())));
            } else if hint.visible {
                spans.push(Span::styled(
                    format!("  {}", hint.placeholder),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ));
            }
            lines.push(Line::from(spans));
        }
    }

    let title = format!(
        " schema · {} rows · {} ",
        state.num_rows, state.requested_format
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .border_type(BorderType::Rounded)
        .title(Span::styled(title, Style::default().fg(Color::Gray)));

    Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
}

fn render_messages(app: &App, height: usize) -> Paragraph<'static> {
    let total_lines = app.messages.len();
    if total_lines == 0 {
        return Paragraph::new("");
    }

    let view_end = total_lines.saturating_sub(app.scroll_offset as usize);
    let view_start = view_end.saturating_sub(height);

    let lines: Vec<Line<'static>> = app.messages[view_start..view_end]
        .iter()
        .map(|line| {
            if line.starts_with('►') {
                let text = line.trim_start_matches(['►', ' ']);
                Line::from(vec![
                    Span::styled("●", Style::default().fg(Color::Green)),
                    Span::raw(" "),
                    Span::styled(
                        text.to_string(),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else if line.starts_with("error: ") || line.contains(" failed: ") {
                Line::from(Span::styled(line.clone(), Style::default().fg(Color::Red)))
            } else {
                Line::from(Span::raw(line.clone()))
            }
        })
        .collect();

    Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false })
}

fn render_input_bar(app: &App, area: Rect) -> (Paragraph<'static>, Option<(u16, u16)>) {
    let prefix = "> ";
    let prefix_len = prefix.len();
    let (visible, cursor_x) = clipped_input(&app.input, area.width as usize, prefix_len);

    let content = if app.input.is_empty() {
        vec![
            Span::styled(prefix, Style::default().fg(Color::Cyan)),
            Span::styled(
                "Describe your database, or type / for commands...",
                Style::default().fg(Color::DarkGray),
            ),
        ]
    } else {
        vec![
            Span::styled(prefix, Style::default().fg(Color::Cyan)),
            Span::raw(visible),
        ]
    };

    let padding_line = Line::from("");
    let content_line = Line::from(content);
    let paragraph = Paragraph::new(vec![padding_line.clone(), content_line, padding_line])
        .style(Style::default().bg(Color::Rgb(30, 30, 30)));

    let cursor = Some((area.x + cursor_x + prefix_len as u16, area.y + 1));
    (paragraph, cursor)
}

fn render_status_line(app: &App) -> Paragraph<'static> {
    let mut spans = Vec::new();
    if let Some(label) = app.busy_label() {
        let spinner = SPINNER[app.spinner_idx % SPINNER.len()];
        spans.push(Span::styled(
            format!("{spinner} {label}"),
            Style::default().fg(Color::Yellow),
        ));
    } else {
        spans.push(Span::styled(
            "Tip: Use /help to list commands.",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let state = app.session.state();
    spans.push(Span::raw("   "));
    spans.push(Span::styled(
        format!("context: {}", state.effective_context()),
        Style::default().fg(Color::DarkGray),
    ));
    if let Some(status) = app.session.status() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Gray),
        ));
    }
    Paragraph::new(Line::from(spans))
}

fn render_palette(entries: &[PaletteEntry], selected_idx: usize) -> Paragraph<'static> {
    let total_cnt = entries.len();
    let max_lines = MAX_PALETTE_LINES;

    // Scroll so the selection stays on screen.
    let start_idx = if selected_idx >= max_lines {
        selected_idx - max_lines + 1
    } else {
        0
    };
    let end_idx = (start_idx + max_lines).min(total_cnt);

    let lines: Vec<Line<'static>> = entries[start_idx..end_idx]
        .iter()
        .enumerate()
        .map(|(offset, entry)| {
            let is_selected = start_idx + offset == selected_idx;
            let raw_str = format!("{:<20}  {}", entry.command, entry.description);

            if is_selected {
                Line::from(Span::styled(
                    raw_str,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(raw_str, Style::default().fg(Color::DarkGray)))
            }
        })
        .collect();
    Paragraph::new(Text::from(lines))
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::tui::commands::execute_command;
    use crate::tui::test_support::test_app;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn schema_pane_shows_columns_and_hints() {
        let (_dir, _runtime, mut app, _rx) = test_app("http://127.0.0.1:9");
        execute_command(&mut app, "/col set 1 1 type date").expect("type");

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).expect("terminal");
        terminal.draw(|frame| draw_ui(frame, &app)).expect("draw");
        let screen = screen_text(&terminal);
        assert!(screen.contains("Table1"));
        assert!(screen.contains("col1"));
        assert!(screen.contains("start=2020-01-01,end=today"));
    }
}
