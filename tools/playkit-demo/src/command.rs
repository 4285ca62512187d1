//! Parsing of the demo's stdin commands.

use std::fmt;

/// A line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the catalogue.
    List,
    /// Select by catalogue index (1-based) or display name.
    Select(Selector),
    Play,
    Pause,
    Stop,
    /// Seek to an absolute position in seconds.
    Seek(i64),
    /// Print the current snapshot.
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Index(usize),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseError {}

pub const HELP: &str = "\
commands:
  list                 show the catalogue
  select <n|name>      pick an entry by number or name
  play | pause | stop  transport controls
  seek <secs|m:ss>     jump to a position
  status               show the current position
  quit                 leave";

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        match verb.to_ascii_lowercase().as_str() {
            "l" | "ls" | "list" => Ok(Self::List),
            "s" | "select" => Self::parse_selector(rest).map(Self::Select),
            "p" | "play" => Ok(Self::Play),
            "pause" => Ok(Self::Pause),
            "stop" => Ok(Self::Stop),
            "seek" => parse_position(rest).map(Self::Seek),
            "" | "status" => Ok(Self::Status),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(ParseError(format!("unknown command `{other}`, try `help`"))),
        }
    }

    fn parse_selector(rest: &str) -> Result<Selector, ParseError> {
        if rest.is_empty() {
            return Err(ParseError("select needs a number or a name".into()));
        }
        Ok(rest
            .parse::<usize>()
            .map_or_else(|_| Selector::Name(rest.to_owned()), Selector::Index))
    }
}

/// Accepts plain seconds (`-5`, `125`) or `m:ss`.
fn parse_position(rest: &str) -> Result<i64, ParseError> {
    let invalid = || ParseError(format!("cannot seek to `{rest}`"));
    match rest.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: i64 = minutes.parse().map_err(|_| invalid())?;
            let seconds: i64 = seconds.parse().map_err(|_| invalid())?;
            minutes
                .checked_mul(60)
                .and_then(|secs| secs.checked_add(seconds))
                .ok_or_else(invalid)
        }
        None => rest.parse().map_err(|_| invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_transport() {
        assert_eq!(Command::parse("play"), Ok(Command::Play));
        assert_eq!(Command::parse("  PAUSE "), Ok(Command::Pause));
        assert_eq!(Command::parse("stop"), Ok(Command::Stop));
        assert_eq!(Command::parse(""), Ok(Command::Status));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
    }

    #[test]
    fn parses_selection() {
        assert_eq!(
            Command::parse("select 3"),
            Ok(Command::Select(Selector::Index(3)))
        );
        assert_eq!(
            Command::parse("select Can't Take My Eyes Off You"),
            Ok(Command::Select(Selector::Name(
                "Can't Take My Eyes Off You".into()
            )))
        );
        assert!(Command::parse("select").is_err());
    }

    #[test]
    fn parses_seek_targets() {
        assert_eq!(Command::parse("seek 125"), Ok(Command::Seek(125)));
        assert_eq!(Command::parse("seek -5"), Ok(Command::Seek(-5)));
        assert_eq!(Command::parse("seek 2:05"), Ok(Command::Seek(125)));
        assert!(Command::parse("seek soon").is_err());
        assert!(Command::parse("seek 999999999999999999:00").is_err());
        assert!(Command::parse("seek 153722867280912930:59").is_err());
    }

    #[test]
    fn rejects_unknown_verbs() {
        let err = Command::parse("shuffle").unwrap_err();
        assert!(err.to_string().contains("shuffle"));
    }
}
