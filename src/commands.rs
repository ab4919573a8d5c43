use crate::render::VerseColor;

/// What a submitted input line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Noop,
    Color { color: VerseColor, name: String },
    Quit,
    Favorites,
    ToggleReferences,
    Help,
    Save,
    Delete(String),
    Lookup(String),
}

type Rule = fn(&str) -> Option<Command>;

/// Checked in order, first match wins. Color names come before everything
/// else, so a passage query that is also a color word (`green`) can never
/// reach the lookup rule.
const RULES: &[Rule] = &[empty, color, keyword, delete, lookup];

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        RULES
            .iter()
            .find_map(|rule| rule(line))
            .unwrap_or(Command::Noop)
    }
}

fn empty(line: &str) -> Option<Command> {
    line.is_empty().then_some(Command::Noop)
}

fn color(line: &str) -> Option<Command> {
    VerseColor::from_name(line).map(|color| Command::Color {
        color,
        name: line.to_lowercase(),
    })
}

fn keyword(line: &str) -> Option<Command> {
    match line {
        "q" => Some(Command::Quit),
        "favs" => Some(Command::Favorites),
        "refs" => Some(Command::ToggleReferences),
        "help" => Some(Command::Help),
        "save" => Some(Command::Save),
        _ => None,
    }
}

fn delete(line: &str) -> Option<Command> {
    line.strip_prefix("delete ")
        .map(|reference| Command::Delete(reference.trim().to_lowercase()))
}

fn lookup(line: &str) -> Option<Command> {
    Some(Command::Lookup(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_noop() {
        assert_eq!(Command::parse(""), Command::Noop);
        assert_eq!(Command::parse("   \t"), Command::Noop);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(Command::parse("favs"), Command::Favorites);
        assert_eq!(Command::parse("  refs "), Command::ToggleReferences);
        assert_eq!(Command::parse("help"), Command::Help);
        assert_eq!(Command::parse("save"), Command::Save);
        assert_eq!(Command::parse("q"), Command::Quit);
    }

    #[test]
    fn test_keywords_are_exact() {
        assert_eq!(Command::parse("Favs"), Command::Lookup("Favs".to_string()));
        assert_eq!(Command::parse("saved"), Command::Lookup("saved".to_string()));
    }

    #[test]
    fn test_delete_normalizes_reference() {
        assert_eq!(
            Command::parse("delete   John 3:16  "),
            Command::Delete("john 3:16".to_string())
        );
        assert_eq!(Command::parse("delete"), Command::Lookup("delete".to_string()));
    }

    #[test]
    fn test_color_words_shadow_lookups() {
        assert_eq!(
            Command::parse("Green"),
            Command::Color { color: VerseColor::Green, name: "green".to_string() }
        );
        assert_eq!(
            Command::parse("purple"),
            Command::Color { color: VerseColor::Magenta, name: "purple".to_string() }
        );
    }

    #[test]
    fn test_everything_else_is_a_lookup() {
        assert_eq!(
            Command::parse(" 1 thes 1:2-5 "),
            Command::Lookup("1 thes 1:2-5".to_string())
        );
    }
}
