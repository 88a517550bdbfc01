pub mod engine;
pub mod error;
pub mod parser;
pub mod result;

pub use engine::CommandEngine;
pub use error::CommandError;
pub use result::CommandResult;
