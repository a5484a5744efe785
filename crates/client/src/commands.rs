//! Parsing of the interactive command line.
//!
//! Only presence of required arguments is checked here; everything else
//! (id format, vote range) is left for the backend to judge.

use anyhow::{anyhow, bail};

pub const HELP: &str = "\
Commands:
  create_user <username> [value ...]
  list_users
  create_element <title> [type]
  list_elements
  search_elements <query>
  link_elements <element_id> <element_id>
  create_action <user_id> <element_id|-> <action_type> [content ...]
  list_actions
  vote_action <action_id> <user_id> <-1|0|1>
  decision_outcome <action_id>
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateUser {
        username: String,
        guiding_values: Vec<String>,
    },
    ListUsers,
    CreateElement {
        title: String,
        element_type: Option<String>,
    },
    ListElements,
    SearchElements {
        query: String,
    },
    LinkElements {
        first: String,
        second: String,
    },
    CreateAction {
        user_id: String,
        element_id: Option<String>,
        action_type: String,
        content: String,
    },
    ListActions,
    VoteAction {
        action_id: String,
        user_id: String,
        value: i64,
    },
    DecisionOutcome {
        action_id: String,
    },
    Help,
    Quit,
}

impl Command {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> anyhow::Result<Option<Command>> {
        let words = split_words(line)?;
        let Some((name, args)) = words.split_first() else {
            return Ok(None);
        };
        let arg = |i: usize, what: &str| -> anyhow::Result<String> {
            args.get(i)
                .cloned()
                .ok_or_else(|| anyhow!("missing <{what}> for {name}"))
        };

        let command = match name.as_str() {
            "create_user" => Command::CreateUser {
                username: arg(0, "username")?,
                guiding_values: args.iter().skip(1).cloned().collect(),
            },
            "list_users" => Command::ListUsers,
            "create_element" => Command::CreateElement {
                title: arg(0, "title")?,
                element_type: args.get(1).cloned(),
            },
            "list_elements" => Command::ListElements,
            "search_elements" => {
                if args.is_empty() {
                    bail!("missing <query> for {name}");
                }
                Command::SearchElements {
                    query: args.join(" "),
                }
            }
            "link_elements" => Command::LinkElements {
                first: arg(0, "element_id")?,
                second: arg(1, "element_id")?,
            },
            "create_action" => {
                let user_id = arg(0, "user_id")?;
                let element_id = arg(1, "element_id")?;
                let action_type = arg(2, "action_type")?;
                Command::CreateAction {
                    user_id,
                    element_id: (element_id != "-").then_some(element_id),
                    action_type,
                    content: args.get(3..).unwrap_or_default().join(" "),
                }
            }
            "list_actions" => Command::ListActions,
            "vote_action" => {
                let action_id = arg(0, "action_id")?;
                let user_id = arg(1, "user_id")?;
                let raw = arg(2, "vote_value")?;
                let value = raw
                    .parse()
                    .map_err(|_| anyhow!("vote value must be a number, got {raw:?}"))?;
                Command::VoteAction {
                    action_id,
                    user_id,
                    value,
                }
            }
            "decision_outcome" => Command::DecisionOutcome {
                action_id: arg(0, "action_id")?,
            },
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" | "0" => Command::Quit,
            other => bail!("unknown command {other:?}, type `help` for the list"),
        };

        Ok(Some(command))
    }
}

/// Whitespace split that keeps `"double quoted"` runs together.
fn split_words(line: &str) -> anyhow::Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        bail!("unterminated quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
