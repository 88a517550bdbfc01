use chrono::{DateTime, Duration, NaiveDateTime, SubsecRound, TimeZone, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use super::attribute::AttrValue;
use super::error::ModelError;
use super::kind::Kind;
use super::schema;

/// Key under which the kind name is embedded in the serialized form.
pub const CLASS_KEY: &str = "__class__";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

const RESERVED: [&str; 4] = ["id", "created_at", "updated_at", CLASS_KEY];

/// What to do with attributes a kind does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributePolicy {
    /// Undeclared attributes are kept in the extension map.
    #[default]
    Permissive,
    /// Undeclared attributes are rejected.
    Strict,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: String,
    kind: Kind,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    attrs: BTreeMap<&'static str, AttrValue>,
    extra: BTreeMap<String, Value>,
}

impl Entity {
    pub fn new(kind: Kind) -> Self {
        let now = now();
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            created_at: now,
            updated_at: now,
            attrs: schema::attributes(kind)
                .iter()
                .map(|attr| (attr.name, attr.default_value()))
                .collect(),
            extra: BTreeMap::new(),
        }
    }

    /// Rebuild an entity from its serialized mapping.
    ///
    /// `id` and both timestamps are restored verbatim; declared attributes
    /// missing from the record fall back to their defaults.
    pub fn from_record(kind: Kind, record: &Map<String, Value>) -> Result<Self, ModelError> {
        let mut entity = Entity::new(kind);

        match record.get("id") {
            Some(Value::String(id)) => entity.id = id.clone(),
            Some(other) => {
                return Err(ModelError::InvalidValue {
                    attr: "id".to_string(),
                    expected: "string",
                    got: other.to_string(),
                })
            }
            None => {}
        }
        if let Some(value) = record.get("created_at") {
            entity.created_at = parse_timestamp("created_at", value)?;
        }
        if let Some(value) = record.get("updated_at") {
            entity.updated_at = parse_timestamp("updated_at", value)?;
        }

        for (name, value) in record {
            if RESERVED.contains(&name.as_str()) {
                continue;
            }
            match schema::find_attribute(kind, name) {
                Some(attr) => {
                    let parsed = attr.attr_type.from_json(name, value)?;
                    entity.attrs.insert(attr.name, parsed);
                }
                None => {
                    entity.extra.insert(name.clone(), value.clone());
                }
            }
        }

        Ok(entity)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Composite store key, `Kind.id`.
    pub fn key(&self) -> String {
        format!("{}.{}", self.kind, self.id)
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn extra(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Set one attribute from command-line text, coercing declared attributes.
    pub fn set_attr(&mut self, name: &str, raw: &str, policy: AttributePolicy) -> Result<(), ModelError> {
        self.check_writable(name)?;
        match schema::find_attribute(self.kind, name) {
            Some(attr) => {
                let value = attr.attr_type.coerce(name, raw)?;
                self.attrs.insert(attr.name, value);
            }
            None => {
                self.check_undeclared(name, policy)?;
                self.extra.insert(name.to_string(), Value::String(raw.to_string()));
            }
        }
        Ok(())
    }

    /// Set one attribute from a JSON value.
    pub fn set_json_attr(&mut self, name: &str, value: &Value, policy: AttributePolicy) -> Result<(), ModelError> {
        self.check_writable(name)?;
        match schema::find_attribute(self.kind, name) {
            Some(attr) => {
                let value = attr.attr_type.from_json(name, value)?;
                self.attrs.insert(attr.name, value);
            }
            None => {
                self.check_undeclared(name, policy)?;
                self.extra.insert(name.to_string(), value.clone());
            }
        }
        Ok(())
    }

    /// Mark the entity as modified. `updated_at` always moves forward.
    pub fn touch(&mut self) {
        let now = now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }

    pub fn serialize(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for (name, value) in &self.extra {
            map.insert(name.clone(), value.clone());
        }
        for (name, value) in &self.attrs {
            map.insert(name.to_string(), value.to_json());
        }
        map.insert("id".to_string(), Value::String(self.id.clone()));
        map.insert("created_at".to_string(), Value::String(format_timestamp(&self.created_at)));
        map.insert("updated_at".to_string(), Value::String(format_timestamp(&self.updated_at)));
        map.insert(CLASS_KEY.to_string(), Value::String(self.kind.name().to_string()));
        map
    }

    fn check_writable(&self, name: &str) -> Result<(), ModelError> {
        if RESERVED.contains(&name) {
            return Err(ModelError::ReservedAttribute(name.to_string()));
        }
        Ok(())
    }

    fn check_undeclared(&self, name: &str, policy: AttributePolicy) -> Result<(), ModelError> {
        match policy {
            AttributePolicy::Permissive => Ok(()),
            AttributePolicy::Strict => Err(ModelError::UnknownAttribute {
                kind: self.kind.name().to_string(),
                attr: name.to_string(),
            }),
        }
    }

    fn text(&self, name: &str) -> String {
        self.attr(name).map(|value| value.to_string()).unwrap_or_default()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ({}) ", self.kind, self.id)?;
        match self.kind {
            Kind::BaseModel => write!(f, "{}", Value::Object(self.serialize())),
            Kind::User => write!(
                f,
                "{} - {} - {}",
                self.text("email"),
                self.text("first_name"),
                self.text("last_name")
            ),
            Kind::State | Kind::Amenity => write!(f, "{}", self.text("name")),
            Kind::City => write!(f, "{} - {}", self.text("name"), self.text("state_id")),
            Kind::Place => write!(
                f,
                "{} - {} - {}",
                self.text("name"),
                self.text("city_id"),
                self.text("user_id")
            ),
            Kind::Review => write!(f, "{} - {}", self.text("place_id"), self.text("user_id")),
        }
    }
}

fn now() -> DateTime<Utc> {
    // the file keeps microseconds, so in-memory values do too
    Utc::now().trunc_subsecs(6)
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse an ISO-8601 timestamp, with or without an offset. Naive values are UTC.
pub fn parse_timestamp(field: &'static str, value: &Value) -> Result<DateTime<Utc>, ModelError> {
    let invalid = || ModelError::InvalidTimestamp {
        field,
        value: value.to_string(),
    };
    let raw = value.as_str().ok_or_else(invalid)?;

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| invalid())
}
