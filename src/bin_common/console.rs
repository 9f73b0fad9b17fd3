//! Line commands accepted by the console dashboard

use shopsync::{Identity, OrderDraft};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("empty line")]
    Empty,

    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid {0}: {1}")]
    InvalidArgument(&'static str, String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Tear down the current session and start one for another user
    SwitchUser(Identity),
    Refresh,
    CreateAccount,
    Topup(f64),
    Order(OrderDraft),
    Show,
    Stats,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  user <id>                      switch to another user
  refresh                        reload account and orders
  account create                 open an account
  topup <amount>                 add funds to the account
  order <amount> [description]   place an order
  show                           print account and orders
  stats                          print dashboard statistics
  help                           print this help
  quit                           exit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "user" => {
                let id = rest
                    .parse::<u64>()
                    .ok()
                    .and_then(Identity::new)
                    .ok_or_else(|| CommandError::InvalidArgument("user id", rest.to_string()))?;
                Ok(Command::SwitchUser(id))
            }
            "refresh" => Ok(Command::Refresh),
            "account" if rest == "create" => Ok(Command::CreateAccount),
            "account" => Err(CommandError::Usage("account create")),
            "topup" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("topup <amount>"));
                }
                Ok(Command::Topup(parse_amount(rest)?))
            }
            "order" => {
                let (amount, description) = match rest.split_once(char::is_whitespace) {
                    Some((amount, description)) => (amount, description.trim()),
                    None => (rest, ""),
                };
                if amount.is_empty() {
                    return Err(CommandError::Usage("order <amount> [description]"));
                }
                Ok(Command::Order(OrderDraft::new(
                    parse_amount(amount)?,
                    description,
                )))
            }
            "show" => Ok(Command::Show),
            "stats" => Ok(Command::Stats),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    raw.parse::<f64>()
        .map_err(|_| CommandError::InvalidArgument("amount", raw.to_string()))
}
