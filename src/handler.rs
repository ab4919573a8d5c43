use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::{App, FocusMode};
use crate::tui::AppEvent;

const MOUSE_SCROLL_LINES: usize = 3;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
    }
    app.poll_fetch().await;
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Quits from either mode, even with a lookup in flight
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.focus {
        FocusMode::Input => handle_input_mode(app, key),
        FocusMode::Scroll => handle_scroll_mode(app, key),
    }
}

fn handle_input_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.focus = FocusMode::Scroll,
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => app.delete_char_before_cursor(),
        KeyCode::Delete => app.delete_char_at_cursor(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Home => app.move_cursor_home(),
        KeyCode::End => app.move_cursor_end(),
        // Let the pane scroll without leaving the input line
        KeyCode::PageDown => app.scroll_half_page_down(),
        KeyCode::PageUp => app.scroll_half_page_up(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

fn handle_scroll_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('i') | KeyCode::Enter => app.focus = FocusMode::Input,

        // Half-page scroll (must be before plain 'd'/'u' to match first)
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_down();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_up();
        }
        KeyCode::PageDown => app.scroll_half_page_down(),
        KeyCode::PageUp => app.scroll_half_page_up(),

        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.scroll_to_bottom(),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Before the first draw there is no area to test against
    let in_output = app
        .output_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(true);
    if !in_output {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            for _ in 0..MOUSE_SCROLL_LINES {
                app.scroll_down();
            }
        }
        MouseEventKind::ScrollUp => {
            for _ in 0..MOUSE_SCROLL_LINES {
                app.scroll_up();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use ratatui::text::Text;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn wheel(kind: MouseEventKind, column: u16, row: u16) -> AppEvent {
        AppEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn test_app(dir: &TempDir) -> App {
        let config = Config {
            favorites_path: Some(dir.path().join("favorites.json")),
            ..Config::default()
        };
        let mut app = App::new(&config);
        app.output = Text::from((0..40).map(|i| i.to_string()).collect::<Vec<_>>().join("\n"));
        app.output_height = 10;
        app
    }

    #[tokio::test]
    async fn test_typing_and_submitting() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        for c in "refs".chars() {
            handle_event(&mut app, key(KeyCode::Char(c))).await.unwrap();
        }
        assert_eq!(app.input, "refs");

        handle_event(&mut app, key(KeyCode::Enter)).await.unwrap();
        assert!(app.session.show_references);
        assert!(app.input.is_empty());
    }

    #[tokio::test]
    async fn test_q_is_text_while_typing() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        handle_event(&mut app, key(KeyCode::Char('q'))).await.unwrap();
        assert!(!app.should_quit);
        assert_eq!(app.input, "q");
    }

    #[tokio::test]
    async fn test_escape_then_scroll_then_back_to_input() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        handle_event(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.focus, FocusMode::Scroll);

        handle_event(&mut app, key(KeyCode::Char('j'))).await.unwrap();
        handle_event(&mut app, key(KeyCode::Char('j'))).await.unwrap();
        handle_event(&mut app, key(KeyCode::Char('k'))).await.unwrap();
        assert_eq!(app.output_scroll, 1);

        handle_event(&mut app, ctrl('d')).await.unwrap();
        assert_eq!(app.output_scroll, 6);

        handle_event(&mut app, key(KeyCode::Char('G'))).await.unwrap();
        assert_eq!(app.output_scroll, 30);

        handle_event(&mut app, key(KeyCode::Char('i'))).await.unwrap();
        assert_eq!(app.focus, FocusMode::Input);
        assert!(app.input.is_empty());
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        handle_event(&mut app, ctrl('c')).await.unwrap();
        assert!(app.should_quit);

        let mut app = test_app(&dir);
        handle_event(&mut app, key(KeyCode::Esc)).await.unwrap();
        handle_event(&mut app, key(KeyCode::Char('q'))).await.unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_mouse_wheel_scrolls_inside_output() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.output_area = Some(Rect::new(10, 2, 50, 12));

        handle_event(&mut app, wheel(MouseEventKind::ScrollDown, 20, 5)).await.unwrap();
        assert_eq!(app.output_scroll, 3);

        handle_event(&mut app, wheel(MouseEventKind::ScrollDown, 0, 0)).await.unwrap();
        assert_eq!(app.output_scroll, 3);

        handle_event(&mut app, wheel(MouseEventKind::ScrollUp, 20, 5)).await.unwrap();
        assert_eq!(app.output_scroll, 0);
    }
}
