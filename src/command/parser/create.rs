use tracing::warn;

use super::tokens::{is_quoted, unquote};

/// One `key=value` argument of `create`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateParam {
    pub name: String,
    pub value: String,
}

/// Parse `key=value` arguments. Quoted values lose their quotes and have
/// underscores turned into spaces; arguments without `=` are skipped.
pub fn parse_params(args: &[String]) -> Vec<CreateParam> {
    let mut params = Vec::new();

    for arg in args {
        let Some((name, raw)) = arg.split_once('=') else {
            warn!(arg = %arg, "skipping create argument without '='");
            continue;
        };
        if name.is_empty() {
            warn!(arg = %arg, "skipping create argument without a name");
            continue;
        }

        let value = if is_quoted(raw) {
            unquote(raw).replace('_', " ")
        } else {
            raw.to_string()
        };
        params.push(CreateParam {
            name: name.to_string(),
            value,
        });
    }

    params
}
