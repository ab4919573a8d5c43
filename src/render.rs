use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};
use textwrap::Options;

use crate::bible::Passage;
use crate::favorites::Favorite;

pub const WRAP_WIDTH: usize = 75;

/// Prefix for wrapped continuation lines.
const INDENT: &str = "";

const HELP_WIDTH: usize = 50;

const HELP_ENTRIES: &[(&str, &str)] = &[
    ("search a passage", "1 thes 1:2-5"),
    ("", ""),
    ("scroll through text", "escape, then j/k"),
    ("insert mode", "i"),
    ("", ""),
    ("favorite the last searched verse", "save"),
    ("show saved favorites", "favs"),
    ("remove verse from favs", "delete john 3:16"),
    ("", ""),
    ("show verse locations", "refs"),
    ("change text color", "green, purple, ..."),
    ("", ""),
    ("quit the app", "q"),
    ("show these instructions", "help"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerseColor {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
}

impl VerseColor {
    /// Parses a color name, accepting `purple` and `orange` as aliases for
    /// colors the basic terminal palette has.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "red" => Some(VerseColor::Red),
            "green" => Some(VerseColor::Green),
            "yellow" | "orange" => Some(VerseColor::Yellow),
            "blue" => Some(VerseColor::Blue),
            "magenta" | "purple" => Some(VerseColor::Magenta),
            "cyan" => Some(VerseColor::Cyan),
            "white" => Some(VerseColor::White),
            "gray" => Some(VerseColor::Gray),
            _ => None,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            VerseColor::Red => Color::Red,
            VerseColor::Green => Color::Green,
            VerseColor::Yellow => Color::Yellow,
            VerseColor::Blue => Color::Blue,
            VerseColor::Magenta => Color::Magenta,
            VerseColor::Cyan => Color::Cyan,
            VerseColor::White => Color::White,
            VerseColor::Gray => Color::Gray,
        }
    }
}

pub fn wrap_and_indent(text: &str, width: usize) -> String {
    wrap_with_indent(text, width, INDENT)
}

/// Hard-wraps `text` so no line is wider than `width`, splitting words that
/// do not fit on a line of their own.
pub fn wrap_with_indent(text: &str, width: usize, indent: &str) -> String {
    let options = Options::new(width.max(1))
        .subsequent_indent(indent)
        .break_words(true);
    textwrap::wrap(text, options).join("\n")
}

pub fn format_help_line(command: &str, example: &str) -> String {
    let used = command.chars().count() + example.chars().count();
    let gap = HELP_WIDTH.saturating_sub(used).max(1);
    format!("{}{}{}", command, " ".repeat(gap), example)
}

fn help_lines() -> Vec<Line<'static>> {
    let style = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);
    HELP_ENTRIES
        .iter()
        .map(|(command, example)| {
            Line::from(Span::styled(format_help_line(command, example), style)).centered()
        })
        .collect()
}

pub fn home_page() -> Text<'static> {
    let banner = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled("Welcome to Terminal Bible!", banner)).centered(),
        Line::default(),
    ];
    lines.extend(help_lines());
    Text::from(lines)
}

pub fn help_page() -> Text<'static> {
    let mut lines = vec![Line::default()];
    lines.extend(help_lines());
    Text::from(lines)
}

pub fn passage_view(
    passage: &Passage,
    show_references: bool,
    color: Option<VerseColor>,
    width: usize,
) -> Text<'static> {
    let body_style = Style::default()
        .fg(color.map(|c| c.color()).unwrap_or(Color::White))
        .add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(Span::styled(
            passage.reference().to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::default(),
    ];

    let push_body = |lines: &mut Vec<Line<'static>>, text: &str| {
        for row in wrap_and_indent(text.trim(), width).lines() {
            lines.push(Line::from(Span::styled(row.to_string(), body_style)).centered());
        }
    };

    match passage {
        Passage::Single { text, .. } => push_body(&mut lines, text),
        Passage::List { verses, .. } => {
            for verse in verses {
                if show_references {
                    lines.push(Line::from(Span::styled(verse.label(), label_style)).centered());
                }
                push_body(&mut lines, &verse.text);
            }
        }
    }

    Text::from(lines)
}

pub fn favorites_view(favorites: &[Favorite], width: usize) -> Text<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);

    if favorites.is_empty() {
        return Text::from(Line::from(Span::styled(
            "No favorite verses saved yet.",
            bold.fg(Color::White),
        )));
    }

    let mut lines = vec![
        Line::from(Span::styled("Favorite Verses:", bold)),
        Line::default(),
    ];
    for (i, favorite) in favorites.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("{}. {}", i + 1, favorite.reference),
            bold,
        )));
        for row in wrap_and_indent(favorite.text.trim(), width).lines() {
            lines.push(Line::from(Span::styled(row.to_string(), bold)));
        }
        lines.push(Line::default());
    }
    Text::from(lines)
}

pub fn notice(message: impl Into<String>) -> Text<'static> {
    Text::from(Line::from(Span::styled(
        message.into(),
        Style::default().add_modifier(Modifier::BOLD),
    )))
}

pub fn error_view(message: impl Into<String>) -> Text<'static> {
    Text::from(Line::from(vec![
        Span::styled("Error:", Style::default().fg(Color::Red)),
        Span::raw(" "),
        Span::raw(message.into()),
    ]))
}

pub fn color_confirmation(color: VerseColor, name: &str) -> Text<'static> {
    Text::from(Line::from(Span::styled(
        format!("Text color set to {}.", name),
        Style::default().fg(color.color()).add_modifier(Modifier::BOLD),
    )))
}

/// Flattens styled text to plain strings, one per line.
#[cfg(test)]
pub fn plain_lines(text: &Text) -> Vec<String> {
    text.lines
        .iter()
        .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
        .collect()
}
