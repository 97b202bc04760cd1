//! # Shell Commands
//!
//! Parsing of the one-line commands typed at the `>` prompt.
//!
//! | Command              | Aliases             |
//! |----------------------|---------------------|
//! | `add`                | `a`                 |
//! | `list`               | `l`, `ls`           |
//! | `remove <n>`         | `rm <n>`, `r <n>`   |
//! | `total`              | `t`                 |
//! | `finalize`           | `f`, `checkout`     |
//! | `reset`              | `clear`             |
//! | `help`               | `h`, `?`            |
//! | `quit`               | `q`, `exit`         |
//!
//! Item numbers are 1-based, the way the list shows them.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    List,
    /// 1-based item number.
    Remove(usize),
    Total,
    Finalize,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Type a command, or 'help' to see them all")]
    Empty,

    #[error("Unknown command '{0}'. Type 'help' to see the commands")]
    Unknown(String),

    #[error("Usage: remove <item number>")]
    MissingItemNumber,

    #[error("'{0}' is not an item number; items are numbered from 1")]
    InvalidItemNumber(String),

    #[error("'{command}' takes no arguments")]
    UnexpectedArgument { command: &'static str },
}

impl Command {
    fn name(self) -> &'static str {
        match self {
            Command::Add => "add",
            Command::List => "list",
            Command::Remove(_) => "remove",
            Command::Total => "total",
            Command::Finalize => "finalize",
            Command::Reset => "reset",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandError::Empty);
        };
        let arg = words.next();

        let command = match verb.to_lowercase().as_str() {
            "add" | "a" => Command::Add,
            "list" | "ls" | "l" => Command::List,
            "remove" | "rm" | "r" => {
                let raw = arg.ok_or(CommandError::MissingItemNumber)?;
                match raw.parse::<usize>() {
                    Ok(n) if n >= 1 => Command::Remove(n),
                    _ => return Err(CommandError::InvalidItemNumber(raw.to_string())),
                }
            }
            "total" | "t" => Command::Total,
            "finalize" | "checkout" | "f" => Command::Finalize,
            "reset" | "clear" => Command::Reset,
            "help" | "h" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        let extra = match command {
            Command::Remove(_) => words.next(),
            _ => arg,
        };
        if extra.is_some() {
            return Err(CommandError::UnexpectedArgument {
                command: command.name(),
            });
        }

        Ok(command)
    }
}

pub const HELP: &str = "\
Commands:
  add          add a product (asks for name, price and quantity)
  list         show the cart
  remove <n>   remove item number n
  total        show total and remaining budget
  finalize     finish the purchase and print the summary
  reset        empty the cart and start over
  help         show this help
  quit         leave; the cart is kept for next time";
