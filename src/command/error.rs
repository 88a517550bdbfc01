use thiserror::Error;

use crate::models::ModelError;
use crate::storage::StorageError;

/// Everything a command can fail with. The display strings are the
/// messages printed to the user.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("** class name missing **")]
    ClassNameMissing,

    #[error("** class doesn't exist **")]
    ClassDoesNotExist,

    #[error("** instance id missing **")]
    InstanceIdMissing,

    #[error("** no instance found **")]
    NoInstanceFound,

    #[error("** attribute name missing **")]
    AttributeNameMissing,

    #[error("** value missing **")]
    ValueMissing,

    #[error("** {0} **")]
    Model(#[from] ModelError),

    #[error("*** Unknown syntax: {0}")]
    UnknownSyntax(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CommandError {
    /// Storage failures end the session; everything else only aborts the command.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CommandError::Storage(_))
    }
}
