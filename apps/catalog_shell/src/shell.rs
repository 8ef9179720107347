//! Line-oriented stand-in for page interaction: typed commands become slot
//! writes plus a [`UiEvent`].

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    thread,
};

use crossbeam_channel::{unbounded, Receiver};
use library_core::Route;
use shared::protocol::ProfileField;
use tracing::{debug, warn};

use crate::controller::events::UiEvent;
use crate::ui::{confirm::ConfirmationGate, page::Slot};

pub const HELP: &str = "\
commands:
  login <user> <password>      submit the login form
  profile key=value ...        submit the profile form (name, email, phone, birthDate, bio, interests)
  read|renew|return <id>       act on a book card
  category [id]                filter the grid (no id shows all)
  avatar <path> ...            pick an avatar image (first path wins)
  logout                       end the session
  open <login|index|profile>   navigate to a page
  show                         print the page document
  help                         this text
  quit                         leave the shell";

#[derive(Debug, PartialEq)]
pub enum ShellCommand {
    /// Write `fill` into the page inputs, then deliver `event`.
    Dispatch {
        fill: Vec<(Slot, String)>,
        event: UiEvent,
    },
    Open(Route),
    Show,
    Help,
    Quit,
}

impl ShellCommand {
    fn event(event: UiEvent) -> Self {
        Self::Dispatch {
            fill: Vec::new(),
            event,
        }
    }
}

/// `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match verb {
        "login" => ShellCommand::Dispatch {
            fill: vec![
                (Slot::LoginUsername, rest.first().copied().unwrap_or_default().to_string()),
                (Slot::LoginPassword, rest.get(1).copied().unwrap_or_default().to_string()),
            ],
            event: UiEvent::LoginSubmitted,
        },
        "profile" => ShellCommand::Dispatch {
            fill: profile_fill(&rest),
            event: UiEvent::ProfileSubmitted,
        },
        "read" | "renew" | "return" => {
            let Some(book_id) = rest.first() else {
                return Err(format!("usage: {verb} <id>"));
            };
            ShellCommand::event(UiEvent::BookAction {
                action: verb.to_string(),
                book_id: book_id.to_string(),
            })
        }
        "category" => ShellCommand::event(UiEvent::CategorySelected {
            category: rest.first().map(|id| id.to_string()),
        }),
        "avatar" => {
            if rest.is_empty() {
                return Err("usage: avatar <path> ...".to_string());
            }
            ShellCommand::event(UiEvent::AvatarFilesSelected {
                files: rest.iter().map(PathBuf::from).collect(),
            })
        }
        "logout" => ShellCommand::event(UiEvent::LogoutRequested),
        "open" => {
            let name = rest.first().copied().unwrap_or_default();
            let route = Route::from_name(name).ok_or_else(|| format!("unknown page '{name}'"))?;
            ShellCommand::Open(route)
        }
        "show" => ShellCommand::Show,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type help")),
    };
    Ok(Some(command))
}

/// Pairs `key=value` tokens; a token without `=` continues the previous
/// value, so `bio=likes old maps` keeps its spaces.
fn profile_fill(tokens: &[&str]) -> Vec<(Slot, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for token in tokens {
        match token.split_once('=') {
            Some((key, value)) => pairs.push((key.to_string(), value.to_string())),
            None => match pairs.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(token);
                }
                None => debug!(token, "ignoring profile token before the first key"),
            },
        }
    }

    pairs
        .into_iter()
        .filter_map(|(key, value)| match ProfileField::from_form_name(&key) {
            Some(field) => Some((Slot::ProfileInput(field), value)),
            None => {
                debug!(key, "ignoring unknown profile field");
                None
            }
        })
        .collect()
}

/// Forwards stdin lines until EOF; the channel closes when stdin does.
pub fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = unbounded();
    let spawned = thread::Builder::new()
        .name("catalog-stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "stdin read failed");
                        break;
                    }
                }
            }
            debug!("stdin closed");
        });
    if let Err(err) = spawned {
        warn!(error = %err, "could not start stdin reader; input is closed");
    }
    rx
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "نعم"
    )
}

/// Prints the prompt and takes the next input line as the answer. A closed
/// input counts as no.
pub struct StdinConfirmation {
    lines: Receiver<String>,
}

impl StdinConfirmation {
    pub fn new(lines: Receiver<String>) -> Self {
        Self { lines }
    }
}

impl ConfirmationGate for StdinConfirmation {
    fn confirm(&mut self, message: &str) -> bool {
        print!("{message} [y/N] ");
        let _ = io::stdout().flush();
        match self.lines.recv() {
            Ok(answer) => is_affirmative(&answer),
            Err(_) => false,
        }
    }
}
