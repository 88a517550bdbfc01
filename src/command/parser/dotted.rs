use serde_json::{Map, Value};

use super::tokens::split_args;

/// Result of rewriting a `<Kind>.<command>(<args>)` line.
#[derive(Debug, Clone, PartialEq)]
pub enum Rewrite {
    /// Equivalent space-separated command line.
    Line(String),
    /// `<Kind>.update(<id>, {...})`, which has no space-separated form.
    DictUpdate {
        kind: String,
        id: String,
        attrs: Map<String, Value>,
    },
}

const METHODS: [&str; 5] = ["all", "count", "show", "destroy", "update"];

/// Rewrite a dotted call, or `None` if the line is not one.
pub fn rewrite(line: &str) -> Option<Rewrite> {
    let line = line.trim();
    let (kind, rest) = line.split_once('.')?;
    let (method, rest) = rest.split_once('(')?;
    let args = rest.strip_suffix(')')?;

    if kind.is_empty() || !kind.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    if !METHODS.contains(&method) {
        return None;
    }

    if method == "update" {
        if let Some(dict) = dict_update(kind, args) {
            return Some(dict);
        }
    }

    let mut parts = vec![method.to_string(), kind.to_string()];
    parts.extend(split_args(args).into_iter().filter(|arg| !arg.is_empty()));
    Some(Rewrite::Line(parts.join(" ")))
}

fn dict_update(kind: &str, args: &str) -> Option<Rewrite> {
    let (id, dict) = args.split_once(',')?;
    let dict = dict.trim();
    if !dict.starts_with('{') {
        return None;
    }
    let attrs = serde_json::from_str::<Map<String, Value>>(dict).ok()?;
    Some(Rewrite::DictUpdate {
        kind: kind.to_string(),
        id: super::tokens::unquote(id.trim()),
        attrs,
    })
}
