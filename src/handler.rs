use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crate::app::App;
use crate::tui::TerminalEvent;

/// Lines scrolled per mouse wheel notch
const WHEEL_SCROLL_LINES: u16 = 3;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: TerminalEvent) -> Result<()> {
    match event {
        TerminalEvent::Key(key) => handle_key(app, key),
        TerminalEvent::Mouse(mouse) => handle_mouse(app, mouse),
        TerminalEvent::Resize(_, _) => {}
        TerminalEvent::Tick => app.tick_animation(),
    }
    app.poll_reply().await;
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.show_model_picker {
        handle_model_picker(app, key);
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab => app.open_model_picker(),
        KeyCode::Enter => app.submit(),

        // Panel scrolling
        KeyCode::PageUp => app.view.panel.page_up(),
        KeyCode::PageDown => app.view.panel.page_down(),
        KeyCode::Up => app.view.panel.scroll_up(1),
        KeyCode::Down => app.view.panel.scroll_down(1),

        _ => handle_input_editing(app, key),
    }
}

fn handle_model_picker(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.show_model_picker = false;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.model_picker_nav_down();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.model_picker_nav_up();
        }
        KeyCode::Enter => {
            app.select_model();
        }
        _ => {}
    }
}

/// Edit the input box. Typing is allowed while a reply is pending; only
/// sending is blocked.
fn handle_input_editing(app: &mut App, key: KeyEvent) {
    let view = &mut app.view;
    match key.code {
        KeyCode::Backspace => {
            if view.cursor > 0 {
                view.cursor -= 1;
                let byte_pos = char_to_byte_index(&view.input, view.cursor);
                view.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = view.input.chars().count();
            if view.cursor < char_count {
                let byte_pos = char_to_byte_index(&view.input, view.cursor);
                view.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            view.cursor = view.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = view.input.chars().count();
            view.cursor = (view.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            view.cursor = 0;
        }
        KeyCode::End => {
            view.cursor = view.input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&view.input, view.cursor);
            view.input.insert(byte_pos, c);
            view.cursor += 1;
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.view.panel.scroll_down(WHEEL_SCROLL_LINES),
        MouseEventKind::ScrollUp => app.view.panel.scroll_up(WHEEL_SCROLL_LINES),
        _ => {}
    }
}
