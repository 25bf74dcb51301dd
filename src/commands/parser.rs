//! Command parsing
//!
//! Parses user input from the command bar into structured Command enums.
//! Commands use `/` prefix (e.g., `/open shop.users`, `/quit`); tab numbers
//! are 1-based as shown in the tab strip.

use crate::error::{CommandError, CommandResult};
use crate::tabs::TabData;

/// Commands that can be executed from the command bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open (or re-select) the tab for `db.table`
    Open(TabData),

    /// Close the selected tab, or the tab at a 0-based index
    Close(Option<usize>),

    /// Select the tab at a 0-based index
    Tab(usize),

    /// Execute the selected tab's query
    Exec,

    /// Discard the selected tab's query
    Discard,

    /// Format the selected tab's query
    Format,

    /// Reload the database list
    Refresh,

    /// Show help
    Help,

    /// Quit the application
    Quit,
}

/// Parse a command string into a Command enum
pub fn parse_command(input: &str) -> CommandResult<Command> {
    let input = input.trim();
    let input = input.strip_prefix('/').unwrap_or(input);
    let parts: Vec<&str> = input.split_whitespace().collect();

    let Some((&name, args)) = parts.split_first() else {
        return Err(CommandError::Unknown(String::new()));
    };

    match name {
        "open" | "o" => {
            let target = args.first().ok_or(CommandError::MissingArgument("db.table"))?;
            TabData::parse(target)
                .map(Command::Open)
                .ok_or_else(|| CommandError::InvalidArgument(format!("expected db.table, got '{}'", target)))
        }
        "close" | "c" => match args.first() {
            Some(n) => Ok(Command::Close(Some(parse_tab_number(n)?))),
            None => Ok(Command::Close(None)),
        },
        "tab" | "t" => {
            let n = args.first().ok_or(CommandError::MissingArgument("tab number"))?;
            Ok(Command::Tab(parse_tab_number(n)?))
        }
        "exec" | "x" | "run" => Ok(Command::Exec),
        "discard" | "d" => Ok(Command::Discard),
        "format" | "fmt" => Ok(Command::Format),
        "refresh" | "r" => Ok(Command::Refresh),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        unknown => Err(CommandError::Unknown(unknown.to_string())),
    }
}

/// 1-based tab number to 0-based index
fn parse_tab_number(raw: &str) -> CommandResult<usize> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::InvalidArgument(format!(
            "tab number must be 1 or greater, got '{}'",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open() {
        assert_eq!(
            parse_command("/open shop.users").unwrap(),
            Command::Open(TabData::new("shop", "users"))
        );
        assert_eq!(
            parse_command("/o shop.users").unwrap(),
            Command::Open(TabData::new("shop", "users"))
        );
    }

    #[test]
    fn test_parse_open_errors() {
        assert!(matches!(
            parse_command("/open"),
            Err(CommandError::MissingArgument(_))
        ));
        assert!(matches!(
            parse_command("/open users"),
            Err(CommandError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_close() {
        assert_eq!(parse_command("/close").unwrap(), Command::Close(None));
        assert_eq!(parse_command("/close 2").unwrap(), Command::Close(Some(1)));
        assert!(matches!(
            parse_command("/close 0"),
            Err(CommandError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_tab() {
        assert_eq!(parse_command("/tab 1").unwrap(), Command::Tab(0));
        assert!(matches!(
            parse_command("/tab"),
            Err(CommandError::MissingArgument(_))
        ));
        assert!(matches!(
            parse_command("/tab two"),
            Err(CommandError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_query_commands() {
        assert_eq!(parse_command("/exec").unwrap(), Command::Exec);
        assert_eq!(parse_command("/run").unwrap(), Command::Exec);
        assert_eq!(parse_command("/discard").unwrap(), Command::Discard);
        assert_eq!(parse_command("/format").unwrap(), Command::Format);
    }

    #[test]
    fn test_parse_refresh() {
        assert_eq!(parse_command("/refresh").unwrap(), Command::Refresh);
        assert_eq!(parse_command("/r").unwrap(), Command::Refresh);
    }

    #[test]
    fn test_parse_quit_variants() {
        assert_eq!(parse_command("/quit").unwrap(), Command::Quit);
        assert_eq!(parse_command("/q").unwrap(), Command::Quit);
        assert_eq!(parse_command("/exit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_help() {
        assert_eq!(parse_command("/help").unwrap(), Command::Help);
        assert_eq!(parse_command("/?").unwrap(), Command::Help);
    }

    #[test]
    fn test_parse_unknown_command() {
        let result = parse_command("/foobar");
        assert!(matches!(result, Err(CommandError::Unknown(_))));
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(parse_command("  "), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn test_parse_without_prefix() {
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
    }
}
