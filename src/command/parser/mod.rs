pub mod create;
pub mod dotted;
pub mod tokens;

use serde_json::{Map, Value};

pub use create::{parse_params, CreateParam};
pub use dotted::{rewrite, Rewrite};
pub use tokens::{tokenize, unquote};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Show,
    Destroy,
    All,
    Count,
    Update,
}

impl Operation {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "create" => Some(Operation::Create),
            "show" => Some(Operation::Show),
            "destroy" => Some(Operation::Destroy),
            "all" => Some(Operation::All),
            "count" => Some(Operation::Count),
            "update" => Some(Operation::Update),
            _ => None,
        }
    }
}

/// A parsed command line. Arguments are raw tokens; validation happens
/// in the engine so checks run in the order users expect.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run { op: Operation, args: Vec<String> },
    UpdateDict { kind: String, id: String, attrs: Map<String, Value> },
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn new() -> Self {
        CommandParser
    }

    pub fn parse(&self, line: &str) -> Command {
        let line = line.trim();
        let rewritten = match rewrite(line) {
            Some(Rewrite::DictUpdate { kind, id, attrs }) => {
                return Command::UpdateDict { kind, id, attrs };
            }
            Some(Rewrite::Line(rewritten)) => rewritten,
            None => line.to_string(),
        };

        let mut tokens = tokenize(&rewritten);
        if tokens.is_empty() {
            return Command::Unknown(line.to_string());
        }
        match Operation::from_word(&tokens[0]) {
            Some(op) => {
                let args = tokens.split_off(1);
                Command::Run { op, args }
            }
            None => Command::Unknown(line.to_string()),
        }
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        CommandParser::new()
    }
}
