use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, InputMode};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Composing => handle_compose_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('r') | KeyCode::F(5) => app.refresh(),
        KeyCode::Enter => app.retry(),

        // Limit selector
        KeyCode::Char(']') => app.change_limit(true),
        KeyCode::Char('[') => app.change_limit(false),

        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('g') => app.content_scroll = 0,

        KeyCode::Char('n') => app.start_composing(),

        _ => {}
    }
}

fn handle_compose_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_composing(),
        KeyCode::Enter => app.submit_compose(),
        KeyCode::Backspace => {
            if app.compose_cursor > 0 {
                app.compose_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.compose_input, app.compose_cursor);
                app.compose_input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.compose_input.chars().count();
            if app.compose_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.compose_input, app.compose_cursor);
                app.compose_input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.compose_cursor = app.compose_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.compose_input.chars().count();
            app.compose_cursor = (app.compose_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.compose_cursor = 0;
        }
        KeyCode::End => {
            app.compose_cursor = app.compose_input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.compose_input, app.compose_cursor);
            app.compose_input.insert(byte_pos, c);
            app.compose_cursor += 1;
        }
        _ => {}
    }
}
