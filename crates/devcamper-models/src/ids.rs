//! Typed ids so a `CourseId` can never be passed where a `BootcampId` is
//! expected. All of them are plain UUIDs on the wire and in Postgres.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
        #[serde(transparent)]
        #[sqlx(transparent)]
        #[schema(value_type = String, format = Uuid)]
        pub struct $name(pub Uuid);

        impl $name {
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[inline]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            #[inline]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            #[inline]
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            #[inline]
            fn from(id: $name) -> Uuid {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Id of a registered account.
    UserId
);

define_id!(BootcampId);

define_id!(CourseId);

define_id!(ReviewId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_bare_uuid() {
        let id = BootcampId::from_uuid(Uuid::from_u128(0x5d725a1b_7b29_2f4c_8a8b_37b37f5a1c01));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""5d725a1b-7b29-2f4c-8a8b-37b37f5a1c01""#);

        let back: BootcampId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_from_str() {
        assert!("5d725a1b-7b29-2f4c-8a8b-37b37f5a1c01".parse::<UserId>().is_ok());
        assert!("5d725a1b7b292f4c".parse::<UserId>().is_err());
    }

    #[test]
    fn test_id_debug_names_the_type() {
        let id = ReviewId::from_uuid(Uuid::nil());
        assert!(format!("{:?}", id).starts_with("ReviewId("));
    }
}
