//! Line-oriented interactive session.
//!
//! One shell run is one session: the theme chosen here lives only as long as
//! the process, like the session storage scope it is kept in.

use crate::paint::{paint, paint_notification};
use std::io::{self, BufRead, Write};
use taskboard_core::{TaskId, TaskListController};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add { title: String, description: String },
    Toggle(TaskId),
    Delete(TaskId),
    Theme,
    List,
    Form,
    Help,
    Quit,
}

pub const HELP: &str = "commands: add <title> [| <description>], toggle <id>, delete <id>, theme, list, form, help, quit";

/// Parses one input line; `Ok(None)` for blank lines.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    let command = match verb {
        "add" => {
            let (title, description) = rest.split_once('|').unwrap_or((rest, ""));
            ShellCommand::Add {
                title: title.trim().to_string(),
                description: description.trim().to_string(),
            }
        }
        "toggle" => ShellCommand::Toggle(parse_id(rest)?),
        "delete" | "rm" => ShellCommand::Delete(parse_id(rest)?),
        "theme" => ShellCommand::Theme,
        "list" | "ls" => ShellCommand::List,
        "form" => ShellCommand::Form,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command `{other}`")),
    };
    Ok(Some(command))
}

fn parse_id(value: &str) -> Result<TaskId, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("expected a numeric task id, got `{value}`"))
}

/// Asks on stdout and reads a yes/no answer from stdin.
pub fn confirm_on_terminal(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub fn run(controller: &mut TaskListController) -> io::Result<()> {
    println!("{HELP}");
    println!("{}", paint(&controller.render()));

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            ShellCommand::Add { title, description } => {
                controller.set_draft(title, description);
                if controller.submit_form().is_none() {
                    println!("title cannot be empty");
                }
            }
            ShellCommand::Toggle(id) => {
                if !controller.toggle_task(id) {
                    println!("no task with id {id}");
                }
            }
            ShellCommand::Delete(id) => {
                controller.delete_task(id, &mut confirm_on_terminal);
            }
            ShellCommand::Theme => {
                controller.toggle_theme();
            }
            ShellCommand::List => controller.show_task_list(),
            ShellCommand::Form => controller.show_add_form(),
            ShellCommand::Help => {
                println!("{HELP}");
                continue;
            }
            ShellCommand::Quit => return Ok(()),
        }

        for notification in controller.take_notifications() {
            println!("{}", paint_notification(&notification));
        }
        println!("{}", paint(&controller.render()));
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_line, ShellCommand};

    #[test]
    fn add_splits_title_and_description_on_pipe() {
        assert_eq!(
            parse_line("add Buy milk | 2%").unwrap(),
            Some(ShellCommand::Add {
                title: "Buy milk".to_string(),
                description: "2%".to_string(),
            })
        );
        assert_eq!(
            parse_line("add   ").unwrap(),
            Some(ShellCommand::Add {
                title: String::new(),
                description: String::new(),
            })
        );
    }

    #[test]
    fn ids_must_be_numeric() {
        assert_eq!(
            parse_line("toggle 1700000000000").unwrap(),
            Some(ShellCommand::Toggle(1_700_000_000_000))
        );
        assert!(parse_line("delete abc").is_err());
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert!(parse_line("frobnicate").is_err());
    }
}
