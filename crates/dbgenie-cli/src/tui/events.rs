use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::CliError;
use crate::tui::commands::{command_palette_matches, execute_command};
use crate::tui::state::App;

pub fn handle_key(app: &mut App, key: KeyEvent) -> Result<(), CliError> {
    if key.kind == KeyEventKind::Release {
        return Ok(());
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Esc => {
            app.input.clear();
            app.palette_select = 0;
        }
        KeyCode::PageUp => {
            app.scroll_offset = app.scroll_offset.saturating_add(5);
        }
        KeyCode::PageDown => {
            app.scroll_offset = app.scroll_offset.saturating_sub(5);
        }
        KeyCode::Down => {
            if app.input.starts_with('/') {
                let matches = command_palette_matches(app, &app.input);
                if !matches.is_empty() {
                    app.palette_select =
                        (app.palette_select + 1).min(matches.len().saturating_sub(1));
                }
            }
        }
        KeyCode::Up => {
            if app.input.starts_with('/') {
                app.palette_select = app.palette_select.saturating_sub(1);
            }
        }
        KeyCode::Tab => {
            let matches = command_palette_matches(app, &app.input);
            if let Some(entry) = matches.get(app.palette_select) {
                app.input = format!("{} ", entry.command);
                app.palette_select = 0;
            }
        }
        KeyCode::Enter => {
            if app.input.starts_with('/') && !app.input.contains(' ') {
                let matches = command_palette_matches(app, &app.input);
                if let Some(entry) = matches.get(app.palette_select) {
                    app.input = entry.command.to_string();
                }
            }

            let input = app.input.drain(..).collect::<String>();
            let input = input.trim();
            if !input.is_empty() {
                app.record_command(input);
                if let Err(err) = execute_command(app, input) {
                    app.push_message(format!("error: {err}"));
                }
                app.scroll_offset = 0;
                app.palette_select = 0;
            }
        }
        KeyCode::Backspace => {
            app.input.pop();
            app.palette_select = 0;
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(());
            }
            app.input.push(ch);
            app.palette_select = 0;
        }
        _ => {}
    }
    Ok(())
}
