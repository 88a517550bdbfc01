#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Created(String),
    Shown(String),
    Destroyed,
    Listed(Vec<String>),
    Counted(usize),
    Updated,
}
