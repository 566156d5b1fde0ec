//! Strongly-typed identifiers for Pritunl resources.
//!
//! Pritunl identifies most objects by an opaque string (usually a 24-character
//! hex object id). Nested resources are only unique within their parent, so
//! keeping one type per resource kind stops a location id from being passed
//! where a link id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Macro to generate string-backed identifier types.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parses and validates an identifier.
            ///
            /// # Errors
            ///
            /// Returns [`Error::InvalidId`] if the input is empty or would not fit
            /// in a single URL path segment.
            pub fn parse_str(input: &str) -> Result<Self> {
                validate_id(input).map(|id| Self(id.to_string()))
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Converts into the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse_str(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(value: String) -> Result<Self> {
                validate_id(&value)?;
                Ok(Self(value))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }
    };
}

id_type!(OrganizationId, "Organization identifier");
id_type!(UserId, "User identifier (unique within an organization)");
id_type!(ServerId, "VPN server identifier");
id_type!(RouteId, "Server route identifier (unique within a server)");
id_type!(HostId, "Pritunl host (node) identifier");
id_type!(LinkId, "Site-to-site link identifier");
id_type!(LocationId, "Link location identifier (unique within a link)");
id_type!(
    LocationRouteId,
    "Location route identifier (unique within a location)"
);
id_type!(
    LocationHostId,
    "Location host identifier (unique within a location)"
);

/// Validates an identifier string.
///
/// # Errors
///
/// Returns an error if the string is empty, contains whitespace or a `/`.
pub fn validate_id(s: &str) -> Result<&str> {
    if s.is_empty() {
        return Err(Error::InvalidId("identifier must not be empty".to_string()));
    }
    if s.chars().any(|c| c == '/' || c.is_whitespace()) {
        return Err(Error::InvalidId(s.to_string()));
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBJECT_ID: &str = "5f1e3c9a2b4d6e8f0a1b2c3d";

    #[test]
    fn test_parse_str_valid() {
        let id = LinkId::parse_str(OBJECT_ID).unwrap();
        assert_eq!(id.as_str(), OBJECT_ID);
        assert_eq!(id.to_string(), OBJECT_ID);
    }

    #[test]
    fn test_parse_str_rejects_empty() {
        let err = ServerId::parse_str("").unwrap_err();
        assert!(matches!(err, Error::InvalidId(_)));
    }

    #[test]
    fn test_parse_str_rejects_path_separator() {
        assert!(LocationId::parse_str("abc/def").is_err());
        assert!(LocationId::parse_str("abc def").is_err());
        assert!(LocationId::parse_str("abc\n").is_err());
    }

    #[test]
    fn test_from_str_and_try_from() {
        let parsed: OrganizationId = OBJECT_ID.parse().unwrap();
        let converted = OrganizationId::try_from(OBJECT_ID.to_string()).unwrap();
        assert_eq!(parsed, converted);
        assert!(OrganizationId::try_from(String::new()).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<LinkId>("\"\"").is_err());
        assert!(serde_json::from_str::<LinkId>("\"a/b\"").is_err());
        assert!(serde_json::from_str::<LinkId>("\"a b\"").is_err());
    }

    #[test]
    fn test_serde_plain_string() {
        let id = HostId::parse_str(OBJECT_ID).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{OBJECT_ID}\""));

        let back: HostId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_compare_with_str() {
        let id = RouteId::parse_str("31302e302e302e302f3234").unwrap();
        assert!(id == *"31302e302e302e302f3234");
        assert!(id != *"other");
    }

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id(OBJECT_ID).unwrap(), OBJECT_ID);
        assert!(validate_id("").is_err());
    }
}
