use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrType {
    String,
    Integer,
    Float,
    StringList,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    String(String),
    Integer(i64),
    Float(f64),
    List(Vec<String>),
}

/// A declared attribute of an entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub attr_type: AttrType,
}

impl Attribute {
    pub const fn new(name: &'static str, attr_type: AttrType) -> Self {
        Self { name, attr_type }
    }

    pub fn default_value(&self) -> AttrValue {
        self.attr_type.default_value()
    }
}

impl AttrType {
    pub fn name(&self) -> &'static str {
        match self {
            AttrType::String => "string",
            AttrType::Integer => "integer",
            AttrType::Float => "float",
            AttrType::StringList => "list of strings",
        }
    }

    pub fn default_value(&self) -> AttrValue {
        match self {
            AttrType::String => AttrValue::String(String::new()),
            AttrType::Integer => AttrValue::Integer(0),
            AttrType::Float => AttrValue::Float(0.0),
            AttrType::StringList => AttrValue::List(Vec::new()),
        }
    }

    /// Coerce raw command-line text into a value of this type.
    pub fn coerce(&self, attr: &str, raw: &str) -> Result<AttrValue, ModelError> {
        match self {
            AttrType::String => Ok(AttrValue::String(raw.to_string())),
            AttrType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(AttrValue::Integer)
                .map_err(|_| self.invalid(attr, raw)),
            AttrType::Float => match raw.trim().parse::<f64>() {
                Ok(num) if num.is_finite() => Ok(AttrValue::Float(num)),
                _ => Err(self.invalid(attr, raw)),
            },
            AttrType::StringList => {
                let trimmed = raw.trim();
                if trimmed.starts_with('[') {
                    return serde_json::from_str::<Vec<String>>(trimmed)
                        .map(AttrValue::List)
                        .map_err(|_| self.invalid(attr, raw));
                }
                let items = trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect();
                Ok(AttrValue::List(items))
            }
        }
    }

    /// Convert a JSON value (from the backing file or a dictionary update).
    pub fn from_json(&self, attr: &str, value: &Value) -> Result<AttrValue, ModelError> {
        match (self, value) {
            (_, Value::String(raw)) if *self != AttrType::String => self.coerce(attr, raw),
            (AttrType::String, Value::String(s)) => Ok(AttrValue::String(s.clone())),
            (AttrType::String, Value::Number(n)) => Ok(AttrValue::String(n.to_string())),
            (AttrType::String, Value::Bool(b)) => Ok(AttrValue::String(b.to_string())),
            (AttrType::Integer, Value::Number(n)) => n
                .as_i64()
                .map(AttrValue::Integer)
                .ok_or_else(|| self.invalid(attr, &n.to_string())),
            (AttrType::Float, Value::Number(n)) => n
                .as_f64()
                .map(AttrValue::Float)
                .ok_or_else(|| self.invalid(attr, &n.to_string())),
            (AttrType::StringList, Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(AttrValue::List)
                .ok_or_else(|| self.invalid(attr, &value.to_string())),
            _ => Err(self.invalid(attr, &value.to_string())),
        }
    }

    fn invalid(&self, attr: &str, got: &str) -> ModelError {
        ModelError::InvalidValue {
            attr: attr.to_string(),
            expected: self.name(),
            got: got.to_string(),
        }
    }
}

impl AttrValue {
    pub fn to_json(&self) -> Value {
        match self {
            AttrValue::String(s) => Value::String(s.clone()),
            AttrValue::Integer(n) => Value::from(*n),
            AttrValue::Float(n) => Value::from(*n),
            AttrValue::List(items) => Value::from(items.clone()),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::String(s) => write!(f, "{}", s),
            AttrValue::Integer(n) => write!(f, "{}", n),
            // serde_json keeps the trailing ".0" that f64's Display drops
            AttrValue::Float(_) | AttrValue::List(_) => write!(f, "{}", self.to_json()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(
            AttrType::Integer.coerce("price_by_night", "12").unwrap(),
            AttrValue::Integer(12)
        );
        assert_eq!(
            AttrType::Float.coerce("latitude", "37.77").unwrap(),
            AttrValue::Float(37.77)
        );
        assert_eq!(AttrType::Float.coerce("latitude", "3").unwrap(), AttrValue::Float(3.0));
    }

    #[test]
    fn test_coerce_rejects_garbage() {
        let err = AttrType::Integer.coerce("max_guest", "many").unwrap_err();
        assert!(matches!(err, ModelError::InvalidValue { expected: "integer", .. }));
        assert!(AttrType::Float.coerce("longitude", "nan").is_err());
        assert!(AttrType::StringList.coerce("amenity_ids", "[1, 2]").is_err());
    }

    #[test]
    fn test_coerce_string_list() {
        assert_eq!(
            AttrType::StringList.coerce("amenity_ids", "a, b,c").unwrap(),
            AttrValue::List(vec!["a".into(), "b".into(), "c".into()])
        );
        assert_eq!(
            AttrType::StringList.coerce("amenity_ids", r#"["x y"]"#).unwrap(),
            AttrValue::List(vec!["x y".into()])
        );
        assert_eq!(
            AttrType::StringList.coerce("amenity_ids", "").unwrap(),
            AttrValue::List(Vec::new())
        );
    }

    #[test]
    fn test_from_json() {
        assert_eq!(
            AttrType::Float.from_json("latitude", &json!(2)).unwrap(),
            AttrValue::Float(2.0)
        );
        assert_eq!(
            AttrType::Integer.from_json("number_rooms", &json!("4")).unwrap(),
            AttrValue::Integer(4)
        );
        assert!(AttrType::Integer.from_json("number_rooms", &json!(1.5)).is_err());
        assert!(AttrType::StringList.from_json("amenity_ids", &json!({"a": 1})).is_err());
    }

    #[test]
    fn test_display_keeps_float_form() {
        assert_eq!(AttrValue::Float(0.0).to_string(), "0.0");
        assert_eq!(AttrValue::List(vec!["a".into()]).to_string(), r#"["a"]"#);
    }
}
