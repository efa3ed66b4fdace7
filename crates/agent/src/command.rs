//! Slash-command parsing.

/// A recognised bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Categories,
    /// `/feedback <text>`; the text may be empty.
    Feedback(String),
}

impl Command {
    /// Parse `/name[@bot] [args]`. Unknown commands and ordinary text
    /// yield `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim_start();
        let rest = text.strip_prefix('/')?;

        let (head, args) = match rest.find(char::is_whitespace) {
            Some(idx) => (&rest[..idx], rest[idx..].trim()),
            None => (rest, ""),
        };
        let name = head.split_once('@').map_or(head, |(name, _bot)| name);

        match name {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "categories" => Some(Command::Categories),
            "feedback" => Some(Command::Feedback(args.to_string())),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Categories => "categories",
            Command::Feedback(_) => "feedback",
        }
    }
}
