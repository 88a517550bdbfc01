mod attribute;
mod entity;
mod error;
mod kind;
mod registry;
pub mod schema;

pub use attribute::{AttrType, AttrValue, Attribute};
pub use entity::{format_timestamp, parse_timestamp, AttributePolicy, Entity, CLASS_KEY, TIMESTAMP_FORMAT};
pub use error::ModelError;
pub use kind::Kind;
pub use registry::{Constructor, KindRegistry};
