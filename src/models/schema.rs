use super::attribute::{AttrType, Attribute};
use super::kind::Kind;

const USER: &[Attribute] = &[
    Attribute::new("email", AttrType::String),
    Attribute::new("password", AttrType::String),
    Attribute::new("first_name", AttrType::String),
    Attribute::new("last_name", AttrType::String),
];

const STATE: &[Attribute] = &[Attribute::new("name", AttrType::String)];

const CITY: &[Attribute] = &[
    Attribute::new("state_id", AttrType::String),
    Attribute::new("name", AttrType::String),
];

const AMENITY: &[Attribute] = &[Attribute::new("name", AttrType::String)];

const PLACE: &[Attribute] = &[
    Attribute::new("city_id", AttrType::String),
    Attribute::new("user_id", AttrType::String),
    Attribute::new("name", AttrType::String),
    Attribute::new("description", AttrType::String),
    Attribute::new("number_rooms", AttrType::Integer),
    Attribute::new("number_bathrooms", AttrType::Integer),
    Attribute::new("max_guest", AttrType::Integer),
    Attribute::new("price_by_night", AttrType::Integer),
    Attribute::new("latitude", AttrType::Float),
    Attribute::new("longitude", AttrType::Float),
    Attribute::new("amenity_ids", AttrType::StringList),
];

const REVIEW: &[Attribute] = &[
    Attribute::new("place_id", AttrType::String),
    Attribute::new("user_id", AttrType::String),
    Attribute::new("text", AttrType::String),
];

/// Declared attributes of a kind, in declaration order.
pub fn attributes(kind: Kind) -> &'static [Attribute] {
    match kind {
        Kind::BaseModel => &[],
        Kind::User => USER,
        Kind::Place => PLACE,
        Kind::City => CITY,
        Kind::State => STATE,
        Kind::Amenity => AMENITY,
        Kind::Review => REVIEW,
    }
}

pub fn find_attribute(kind: Kind, name: &str) -> Option<&'static Attribute> {
    attributes(kind).iter().find(|attr| attr.name == name)
}
