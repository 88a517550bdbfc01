use std::io::{self, Write};

use crate::command::CommandResult;

pub fn display_result<W: Write>(out: &mut W, result: &CommandResult) -> io::Result<()> {
    match result {
        CommandResult::Created(id) => writeln!(out, "{}", id),
        CommandResult::Shown(repr) => writeln!(out, "{}", repr),
        CommandResult::Listed(items) => {
            let rendered = serde_json::to_string(items).map_err(io::Error::from)?;
            writeln!(out, "{}", rendered)
        }
        CommandResult::Counted(count) => writeln!(out, "{}", count),
        CommandResult::Destroyed | CommandResult::Updated => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(result: CommandResult) -> String {
        let mut out = Vec::new();
        display_result(&mut out, &result).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_listing_is_json_array() {
        let out = rendered(CommandResult::Listed(vec!["[User] (1) a - b - c".into()]));
        assert_eq!(out, "[\"[User] (1) a - b - c\"]\n");
        assert_eq!(rendered(CommandResult::Listed(Vec::new())), "[]\n");
    }

    #[test]
    fn test_silent_results() {
        assert_eq!(rendered(CommandResult::Updated), "");
        assert_eq!(rendered(CommandResult::Destroyed), "");
        assert_eq!(rendered(CommandResult::Counted(3)), "3\n");
    }
}
