use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ModelError;

/// Logical type of an entity, fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    BaseModel,
    User,
    Place,
    City,
    State,
    Amenity,
    Review,
}

impl Kind {
    pub const ALL: [Kind; 7] = [
        Kind::BaseModel,
        Kind::User,
        Kind::Place,
        Kind::City,
        Kind::State,
        Kind::Amenity,
        Kind::Review,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Kind::BaseModel => "BaseModel",
            Kind::User => "User",
            Kind::Place => "Place",
            Kind::City => "City",
            Kind::State => "State",
            Kind::Amenity => "Amenity",
            Kind::Review => "Review",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ModelError::UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!("Place".parse::<Kind>().unwrap(), Kind::Place);
        assert!(matches!("place".parse::<Kind>(), Err(ModelError::UnknownKind(name)) if name == "place"));
    }

    #[test]
    fn test_names_round_trip() {
        for kind in Kind::ALL {
            assert_eq!(kind.name().parse::<Kind>().unwrap(), kind);
        }
    }
}
