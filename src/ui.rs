use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, FocusMode};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let [body_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_output(app, frame, centered_rect(70, 85, body_area));
    render_input(app, frame, input_area);
}

/// A rect of the given percentage size in the middle of `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    rect
}

fn render_output(app: &mut App, frame: &mut Frame, area: Rect) {
    let border_color = match app.focus {
        FocusMode::Scroll => Color::Cyan,
        FocusMode::Input => Color::White,
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if let Some(query) = &app.pending_query {
        let dots = ".".repeat(app.animation_frame as usize + 1);
        block = block.title(Span::styled(
            format!(" Loading {}{:<3} ", query, dots),
            Style::default().fg(Color::Yellow),
        ));
    } else if app.focus == FocusMode::Scroll {
        block = block.title(Span::styled(
            " j/k scroll  i insert  q quit ",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let inner_area = block.inner(area);
    app.output_area = Some(area);
    app.output_height = inner_area.height;
    app.output_width = inner_area.width;
    app.clamp_scroll();

    let total_rows = app.output_rows();
    let paragraph = Paragraph::new(app.output.clone())
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.output_scroll, 0));

    frame.render_widget(paragraph, area);

    if total_rows > app.output_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        let mut scrollbar_state = ScrollbarState::new(total_rows as usize)
            .position(app.output_scroll as usize);

        frame.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// Chars to skip and the caret column so the caret stays inside `width`
/// display columns.
fn input_window(input: &str, cursor: usize, width: usize) -> (usize, usize) {
    let widths: Vec<usize> = input.chars().map(|c| c.width().unwrap_or(0)).collect();
    let cursor_col: usize = widths.iter().take(cursor).sum();

    let mut skip = 0;
    let mut skipped_cols = 0;
    if width > 0 {
        while cursor_col - skipped_cols >= width && skip < widths.len() {
            skipped_cols += widths[skip];
            skip += 1;
        }
    }
    (skip, cursor_col - skipped_cols)
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    // One column of left padding
    let inner_width = area.width.saturating_sub(1) as usize;
    let (skip, cursor_x) = input_window(&app.input, app.cursor, inner_width);

    let mut used = 0;
    let visible_text: String = app.input
        .chars()
        .skip(skip)
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= inner_width
        })
        .collect();

    let style = match app.focus {
        FocusMode::Input => Style::default().fg(Color::White),
        FocusMode::Scroll => Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
    };
    let input = Paragraph::new(Line::from(vec![Span::raw(" "), Span::styled(visible_text, style)]));
    frame.render_widget(input, area);

    if app.focus == FocusMode::Input {
        frame.set_cursor_position((area.x + cursor_x as u16 + 1, area.y));
    }
}
