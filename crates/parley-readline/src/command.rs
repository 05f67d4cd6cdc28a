//! REPL command parsing.

use std::path::PathBuf;

/// Every slash command, for completion and hints.
pub const COMMANDS: &[&str] = &[
    "/new",
    "/list",
    "/select",
    "/rename",
    "/delete",
    "/image",
    "/clear-image",
    "/gen",
    "/voice",
    "/tts",
    "/code",
    "/export",
    "/help",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New,
    List,
    /// 1-based position in `/list` order
    Select(usize),
    Rename(usize, String),
    Delete(usize),
    Image(PathBuf),
    ClearImage,
    ToggleGeneration,
    Voice,
    Tts,
    Code,
    Export(PathBuf),
    Help,
    Quit,
    /// Anything that is not a command goes to the composer.
    Message(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line == "quit" || line == "exit" {
            return Ok(Command::Quit);
        }
        if !line.starts_with('/') {
            return Ok(Command::Message(line.to_string()));
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "/new" => Ok(Command::New),
            "/list" => Ok(Command::List),
            "/select" => Ok(Command::Select(index(rest, "/select <n>")?)),
            "/rename" => {
                let (n, title) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Ok(Command::Rename(
                    index(n, "/rename <n> [title]")?,
                    title.trim().to_string(),
                ))
            }
            "/delete" => Ok(Command::Delete(index(rest, "/delete <n>")?)),
            "/image" => Ok(Command::Image(path(rest, "/image <path>")?)),
            "/clear-image" => Ok(Command::ClearImage),
            "/gen" => Ok(Command::ToggleGeneration),
            "/voice" => Ok(Command::Voice),
            "/tts" => Ok(Command::Tts),
            "/code" => Ok(Command::Code),
            "/export" => Ok(Command::Export(path(rest, "/export <file>")?)),
            "/help" => Ok(Command::Help),
            other => Err(format!("Unknown command: {} (try /help)", other)),
        }
    }
}

fn index(arg: &str, usage: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Usage: {}", usage)),
    }
}

fn path(arg: &str, usage: &str) -> Result<PathBuf, String> {
    if arg.is_empty() {
        return Err(format!("Usage: {}", usage));
    }
    Ok(PathBuf::from(arg))
}

pub const HELP: &str = "\
/new                  Start a new chat
/list                 List chats, newest first
/select <n>           Switch to chat n
/rename <n> [title]   Rename chat n (edit the title if none given)
/delete <n>           Delete chat n
/image <path>         Attach an image to the next message
/clear-image          Remove the attached image
/gen                  Toggle image generation mode
/voice                Record a voice message
/tts                  Read the last reply aloud
/code                 List code blocks of the last reply
/export <file>        Write the chat page as HTML
/help                 Show this help
quit                  Exit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_message() {
        assert_eq!(
            Command::parse("  hello world "),
            Ok(Command::Message("hello world".to_string()))
        );
    }

    #[test]
    fn test_quit_aliases() {
        assert_eq!(Command::parse("quit"), Ok(Command::Quit));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
    }

    #[test]
    fn test_rename_keeps_spaces_in_title() {
        assert_eq!(
            Command::parse("/rename 2 Weekend trip  ideas"),
            Ok(Command::Rename(2, "Weekend trip  ideas".to_string()))
        );
        assert_eq!(Command::parse("/rename 2"), Ok(Command::Rename(2, String::new())));
    }

    #[test]
    fn test_index_must_be_positive() {
        assert!(Command::parse("/select 0").is_err());
        assert!(Command::parse("/delete x").is_err());
        assert_eq!(Command::parse("/select 3"), Ok(Command::Select(3)));
    }

    #[test]
    fn test_path_arguments() {
        assert_eq!(
            Command::parse("/image ./cat photo.png"),
            Ok(Command::Image(PathBuf::from("./cat photo.png")))
        );
        assert!(Command::parse("/export").is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert!(Command::parse("/frobnicate").unwrap_err().contains("/frobnicate"));
    }

    #[test]
    fn test_every_command_is_listed_in_help() {
        for command in COMMANDS {
            assert!(HELP.contains(command), "{} missing from help", command);
        }
    }
}
