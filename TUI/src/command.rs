use crate::action::Action;
use crate::page::Section;

pub struct CommandParser;

impl CommandParser {
    pub fn parse(input: &str) -> Result<Action, String> {
        let input = input.trim();
        if !input.starts_with('/') {
            return Err("Not a command".to_string());
        }

        let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
        let args = args.trim();

        match cmd {
            "/help" => Ok(Action::Help),
            "/goto" => {
                if args.is_empty() {
                    return Err(goto_usage());
                }
                Section::from_name(args)
                    .or_else(|| {
                        args.parse::<usize>()
                            .ok()
                            .and_then(|n| n.checked_sub(1))
                            .and_then(Section::from_index)
                    })
                    .map(|section| Action::Goto { section })
                    .ok_or_else(goto_usage)
            }
            "/cv" => Ok(Action::ViewCv),
            "/contact" => Ok(Action::Contact),
            "/replay" => Ok(Action::Replay),
            "/quit" => Ok(Action::Quit),
            _ => Err(format!("Unknown command: {}. Type /help for available commands.", cmd)),
        }
    }
}

fn goto_usage() -> String {
    let names: Vec<&str> = Section::ALL.iter().map(|s| s.title()).collect();
    format!("Usage: /goto <section>  ({})", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(CommandParser::parse("/help"), Ok(Action::Help));
        assert_eq!(CommandParser::parse(" /cv "), Ok(Action::ViewCv));
        assert_eq!(CommandParser::parse("/contact"), Ok(Action::Contact));
        assert_eq!(CommandParser::parse("/replay"), Ok(Action::Replay));
        assert_eq!(CommandParser::parse("/quit"), Ok(Action::Quit));
    }

    #[test]
    fn test_parse_goto() {
        assert_eq!(
            CommandParser::parse("/goto projects"),
            Ok(Action::Goto { section: Section::Projects })
        );
        assert_eq!(
            CommandParser::parse("/goto 2"),
            Ok(Action::Goto { section: Section::Skills })
        );
        assert!(CommandParser::parse("/goto").unwrap_err().starts_with("Usage"));
        assert!(CommandParser::parse("/goto 0").is_err());
        assert!(CommandParser::parse("/goto blog").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(CommandParser::parse("hello"), Err("Not a command".to_string()));
        assert!(CommandParser::parse("/init")
            .unwrap_err()
            .starts_with("Unknown command: /init"));
    }
}
