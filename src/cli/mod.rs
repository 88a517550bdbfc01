pub mod display;
pub mod help;
pub mod interface;

pub use interface::{Cli, Flow, PROMPT};
